use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::tempdir;

use super::model::Track;
use super::scan::CancelFlag;
use super::tags::{TagError, TagReader};
use super::Library;

/// Builds tracks straight from the path, failing for any filename that
/// contains "corrupt". Lets the scan tests run on empty fixture files.
struct StubReader;

impl TagReader for StubReader {
    fn read_track(&self, path: &Path) -> Result<Track, TagError> {
        let filename = path.file_name().unwrap().to_string_lossy();
        if filename.contains("corrupt") {
            return Err(TagError::Unsupported(path.display().to_string()));
        }
        Ok(Track::new(path.to_path_buf(), Duration::from_secs(180)))
    }
}

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"").unwrap();
}

fn filenames(library: &Library) -> Vec<&str> {
    library
        .files()
        .iter()
        .map(|track| track.filename.as_str())
        .collect()
}

#[test]
fn reload_keeps_only_supported_extensions() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "a.mp3");
    touch(dir.path(), "b.FLAC");
    touch(dir.path(), "c.wma");
    touch(dir.path(), "notes.txt");
    touch(dir.path(), "cover.jpg");

    let mut library = Library::new();
    library.add_folder(dir.path().to_path_buf());
    library.reload_files(&StubReader);

    assert_eq!(filenames(&library), vec!["a.mp3", "b.FLAC", "c.wma"]);
}

#[test]
fn reload_recurses_into_subfolders() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("album").join("disc1");
    fs::create_dir_all(&sub).unwrap();
    touch(dir.path(), "root.mp3");
    touch(&sub, "deep.ogg");

    let mut library = Library::new();
    library.add_folder(dir.path().to_path_buf());
    library.reload_files(&StubReader);

    assert_eq!(filenames(&library), vec!["deep.ogg", "root.mp3"]);
}

#[test]
fn reload_sorts_by_filename_ordinal() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "b.mp3");
    touch(dir.path(), "A.mp3");
    touch(dir.path(), "C.mp3");

    let mut library = Library::new();
    library.add_folder(dir.path().to_path_buf());
    library.reload_files(&StubReader);

    // Ordinal, not case-folded: uppercase sorts before lowercase.
    assert_eq!(filenames(&library), vec!["A.mp3", "C.mp3", "b.mp3"]);
}

#[test]
fn reload_dedups_by_filename_first_folder_wins() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    touch(first.path(), "same.mp3");
    touch(first.path(), "only-first.mp3");
    touch(second.path(), "same.mp3");
    touch(second.path(), "only-second.mp3");

    let mut library = Library::new();
    library.add_folder(first.path().to_path_buf());
    library.add_folder(second.path().to_path_buf());
    library.reload_files(&StubReader);

    assert_eq!(
        filenames(&library),
        vec!["only-first.mp3", "only-second.mp3", "same.mp3"]
    );
    let kept = library.track_by_path(&first.path().join("same.mp3"));
    assert!(kept.is_some(), "the copy from the first folder should win");
}

#[test]
fn reload_silently_skips_missing_folders() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "a.mp3");

    let mut library = Library::new();
    library.add_folder(PathBuf::from("/definitely/not/a/folder"));
    library.add_folder(dir.path().to_path_buf());
    library.reload_files(&StubReader);

    assert_eq!(filenames(&library), vec!["a.mp3"]);
}

#[test]
fn reload_skips_unreadable_files_without_aborting() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "good.mp3");
    touch(dir.path(), "corrupt.mp3");
    touch(dir.path(), "zz.flac");

    let mut library = Library::new();
    library.add_folder(dir.path().to_path_buf());
    library.reload_files(&StubReader);

    assert_eq!(filenames(&library), vec!["good.mp3", "zz.flac"]);
}

#[test]
fn reload_is_idempotent_for_unchanged_folders() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "b.mp3");
    touch(dir.path(), "a.mp3");

    let mut library = Library::new();
    library.add_folder(dir.path().to_path_buf());
    library.reload_files(&StubReader);
    let first = library.files().to_vec();

    library.reload_files(&StubReader);
    assert_eq!(library.files(), first.as_slice());
}

#[test]
fn reload_replaces_the_catalog_wholesale() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "a.mp3");

    let mut library = Library::new();
    library.add_folder(dir.path().to_path_buf());
    library.reload_files(&StubReader);
    assert_eq!(library.files().len(), 1);

    library.remove_folder(dir.path());
    library.reload_files(&StubReader);
    assert!(library.files().is_empty());
}

#[test]
fn cancelled_reload_leaves_the_catalog_untouched() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "a.mp3");

    let mut library = Library::new();
    library.add_folder(dir.path().to_path_buf());
    library.reload_files(&StubReader);

    let other = tempdir().unwrap();
    touch(other.path(), "b.mp3");
    library.add_folder(other.path().to_path_buf());

    let cancel = CancelFlag::default();
    cancel.cancel();
    assert!(!library.reload_files_with_cancel(&StubReader, &cancel));
    assert_eq!(filenames(&library), vec!["a.mp3"]);
}

#[test]
fn garbage_bytes_are_not_a_track() {
    use super::tags::LoftyTagReader;

    let dir = tempdir().unwrap();
    let path = dir.path().join("junk.mp3");
    fs::write(&path, b"this is not an mp3 frame").unwrap();

    assert!(LoftyTagReader.read_track(&path).is_err());
}

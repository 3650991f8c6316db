use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};
use walkdir::WalkDir;

use super::model::Track;
use super::tags::TagReader;

/// File extensions the indexer considers audio, compared case-insensitively.
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "wma", "ogg", "flac"];

/// Cooperative cancellation for long scans, checked between folders.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A set of search folders and the catalog built from them.
///
/// The folder set is user-managed and keeps insertion order. The catalog is
/// rebuilt wholesale by [`Library::reload_files`]: it is deduplicated by
/// filename and sorted by filename ascending, and nothing outside this type
/// mutates it.
#[derive(Debug, Default)]
pub struct Library {
    folder_paths: Vec<PathBuf>,
    pub(crate) files: Vec<Track>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn folder_paths(&self) -> &[PathBuf] {
        &self.folder_paths
    }

    /// Append a search folder; duplicates are ignored. Returns whether the
    /// set changed. The catalog is not touched until the next reload.
    pub fn add_folder(&mut self, folder: PathBuf) -> bool {
        if self.folder_paths.contains(&folder) {
            return false;
        }
        self.folder_paths.push(folder);
        true
    }

    /// Remove a search folder. Returns whether the set changed.
    pub fn remove_folder(&mut self, folder: &Path) -> bool {
        let before = self.folder_paths.len();
        self.folder_paths.retain(|existing| existing != folder);
        self.folder_paths.len() != before
    }

    pub fn files(&self) -> &[Track] {
        &self.files
    }

    pub fn track_by_path(&self, path: &Path) -> Option<&Track> {
        self.files.iter().find(|track| track.path == path)
    }

    /// Rebuild the catalog from the current folder set.
    pub fn reload_files(&mut self, reader: &dyn TagReader) {
        if let Some(files) = scan_sources(&self.folder_paths, reader, &CancelFlag::default()) {
            self.files = files;
        }
    }

    /// Rebuild the catalog, giving up between folders once `cancel` is set.
    ///
    /// On cancellation the previous catalog is left untouched and `false`
    /// is returned.
    pub fn reload_files_with_cancel(
        &mut self,
        reader: &dyn TagReader,
        cancel: &CancelFlag,
    ) -> bool {
        match scan_sources(&self.folder_paths, reader, cancel) {
            Some(files) => {
                self.files = files;
                true
            }
            None => false,
        }
    }
}

/// Walk every existing folder, read tags for each supported file, dedup by
/// filename (first seen wins, in enumeration order) and sort by filename.
///
/// Returns `None` only when cancelled. The result is a fresh vector so the
/// caller can swap it in atomically.
fn scan_sources(
    folders: &[PathBuf],
    reader: &dyn TagReader,
    cancel: &CancelFlag,
) -> Option<Vec<Track>> {
    let mut files: Vec<Track> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for folder in folders {
        if cancel.is_cancelled() {
            debug!("scan cancelled before {}", folder.display());
            return None;
        }
        if !folder.is_dir() {
            debug!("skipping missing music folder {}", folder.display());
            continue;
        }

        for entry in WalkDir::new(folder).into_iter().filter_map(Result::ok) {
            let path = entry.path();
            if !path.is_file() || !is_audio_file(path) {
                continue;
            }

            match reader.read_track(path) {
                Ok(track) => {
                    if seen.insert(track.filename.clone()) {
                        files.push(track);
                    }
                }
                Err(err) => {
                    warn!("skipping unreadable audio file {}: {}", path.display(), err);
                }
            }
        }
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename));
    Some(files)
}

pub(crate) fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

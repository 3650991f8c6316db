//! The tag-reading collaborator boundary.
//!
//! The indexer does not parse audio containers itself; it asks a
//! [`TagReader`] to turn a path into a [`Track`]. The production reader is
//! backed by `lofty`; tests substitute a stub.

use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::prelude::{Accessor, ItemKey};
use lofty::probe::Probe;
use thiserror::Error;

use super::model::Track;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("unreadable or unsupported file: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}

/// Reads tag metadata and duration for a single audio file.
///
/// A failure means "skip this file"; the indexer never aborts a scan over
/// one bad entry.
pub trait TagReader {
    fn read_track(&self, path: &Path) -> Result<Track, TagError>;
}

/// `TagReader` backed by the `lofty` crate.
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn read_track(&self, path: &Path) -> Result<Track, TagError> {
        let tagged = Probe::open(path)?.read()?;
        let duration = tagged.properties().duration();

        let mut track = Track::new(path.to_path_buf(), duration);
        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            track.title = non_empty(tag.get_string(ItemKey::TrackTitle));
            track.artist = non_empty(tag.get_string(ItemKey::TrackArtist));
            track.album = non_empty(tag.get_string(ItemKey::AlbumTitle));
            track.album_artist = non_empty(tag.get_string(ItemKey::AlbumArtist));
            track.genre = non_empty(tag.get_string(ItemKey::Genre));
            track.comment = tag.comment().map(|comment| comment.into_owned());
            track.year = tag.date().map(|date| u32::from(date.year));
            track.track_number = tag.track();
        }

        Ok(track)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_trims_and_drops_blanks() {
        assert_eq!(non_empty(Some("  Nightswimming ")), Some("Nightswimming".to_string()));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn reading_a_missing_file_fails() {
        let reader = LoftyTagReader;
        assert!(reader.read_track(Path::new("/no/such/file.mp3")).is_err());
    }
}

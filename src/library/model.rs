use std::path::PathBuf;
use std::time::Duration;

/// One audio file in the catalog.
///
/// A `Track` is built once during a scan and never mutated afterwards; the
/// next scan produces fresh values. The `filename` is derived from the path
/// and doubles as the dedup key and the catalog sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    pub filename: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<u32>,
    pub track_number: Option<u32>,
    pub album_artist: Option<String>,
    pub genre: Option<String>,
    pub comment: Option<String>,
    pub duration: Duration,
}

impl Track {
    /// Create a track with no tag metadata; the filename is derived from
    /// the final path component.
    pub fn new(path: PathBuf, duration: Duration) -> Self {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path,
            filename,
            title: None,
            artist: None,
            album: None,
            year: None,
            track_number: None,
            album_artist: None,
            genre: None,
            comment: None,
            duration,
        }
    }
}

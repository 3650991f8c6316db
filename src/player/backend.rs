//! The media-backend collaborator boundary.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no usable audio output device: {0}")]
    Stream(#[from] rodio::StreamError),

    #[error(transparent)]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("audio output thread is gone")]
    Disconnected,
}

/// Synchronous playback backend the session drives.
///
/// Only [`open`](MediaBackend::open) can fail; every other call is a silent
/// no-op when no track is loaded (`set_position` records the pending value).
/// Implementations use interior mutability so the position ticker can share
/// the handle across threads.
pub trait MediaBackend: Send + Sync {
    /// Load the file at `path`, leaving playback paused at position zero.
    fn open(&self, path: &Path) -> Result<(), BackendError>;

    /// Drop the loaded file, if any.
    fn close(&self);

    fn play(&self);

    fn pause(&self);

    /// Halt playback and rewind to position zero, keeping the file loaded.
    fn stop(&self);

    /// Output gain as a fraction in `0.0..=1.0`.
    fn volume(&self) -> f32;

    fn set_volume(&self, volume: f32);

    /// Live playback position within the loaded file.
    fn position(&self) -> Duration;

    fn set_position(&self, position: Duration);
}

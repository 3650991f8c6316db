//! Sink construction for the audio output thread.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::backend::BackendError;

/// Create a paused `Sink` for the file at `path`, positioned at `start_at`.
///
/// Decoding starts at the beginning and skips forward, so this doubles as
/// the seek primitive.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<Sink, BackendError> {
    let file = File::open(path)?;
    let source = Decoder::new(BufReader::new(file))?.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}

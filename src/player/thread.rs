//! The audio output thread: owns the `rodio` stream and current sink.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::warn;
use rodio::{OutputStreamBuilder, Sink};

use super::backend::BackendError;
use super::output::{OutputClock, OutputCmd};
use super::sink::create_sink_at;

pub(super) fn spawn_output_thread(
    rx: Receiver<OutputCmd>,
    clock: Arc<Mutex<OutputClock>>,
    ready: Sender<Result<(), BackendError>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(err) => {
                let _ = ready.send(Err(BackendError::Stream(err)));
                return;
            }
        };
        // rodio logs to stderr when the stream is dropped; not ours to print.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut path: Option<PathBuf> = None;
        let mut sink: Option<Sink> = None;
        let mut paused = true;

        let volume = |clock: &Arc<Mutex<OutputClock>>| {
            clock.lock().map(|clock| clock.volume).unwrap_or(1.0)
        };

        while let Ok(cmd) = rx.recv() {
            match cmd {
                OutputCmd::Open { path: new_path, reply } => {
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                    if let Ok(mut clock) = clock.lock() {
                        clock.reset();
                    }
                    match create_sink_at(&stream, &new_path, Duration::ZERO) {
                        Ok(new_sink) => {
                            new_sink.set_volume(volume(&clock));
                            sink = Some(new_sink);
                            path = Some(new_path);
                            paused = true;
                            let _ = reply.send(Ok(()));
                        }
                        Err(err) => {
                            path = None;
                            let _ = reply.send(Err(err));
                        }
                    }
                }

                OutputCmd::Close => {
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                    path = None;
                    paused = true;
                }

                OutputCmd::Play => {
                    if let Some(sink) = &sink {
                        sink.play();
                        paused = false;
                    }
                }

                OutputCmd::Pause => {
                    if let Some(sink) = &sink {
                        sink.pause();
                        paused = true;
                    }
                }

                OutputCmd::Stop => {
                    // A stopped rodio sink has consumed its source, so
                    // rewinding means rebuilding the sink at zero.
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                    paused = true;
                    if let Some(path) = &path {
                        match create_sink_at(&stream, path, Duration::ZERO) {
                            Ok(new_sink) => {
                                new_sink.set_volume(volume(&clock));
                                sink = Some(new_sink);
                            }
                            Err(err) => {
                                warn!("failed to rewind {}: {}", path.display(), err);
                            }
                        }
                    }
                }

                OutputCmd::SetVolume(value) => {
                    if let Some(sink) = &sink {
                        sink.set_volume(value);
                    }
                }

                OutputCmd::SetPosition(position) => {
                    if sink.is_none() {
                        continue;
                    }
                    let Some(current) = path.clone() else {
                        continue;
                    };
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                    match create_sink_at(&stream, &current, position) {
                        Ok(new_sink) => {
                            new_sink.set_volume(volume(&clock));
                            if !paused {
                                new_sink.play();
                            }
                            sink = Some(new_sink);
                        }
                        Err(err) => {
                            warn!("failed to seek in {}: {}", current.display(), err);
                        }
                    }
                }

                OutputCmd::Quit => break,
            }
        }

        if let Some(sink) = sink {
            sink.stop();
        }
    })
}

//! `RodioBackend`: the production [`MediaBackend`] over a dedicated output
//! thread.
//!
//! The `rodio` output stream cannot leave the thread that created it, so the
//! handle talks to the thread over a command channel. Position and volume
//! bookkeeping live in a shared clock the handle updates synchronously;
//! reads never wait on the thread.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use super::backend::{BackendError, MediaBackend};
use super::thread::spawn_output_thread;

#[derive(Debug)]
pub(super) enum OutputCmd {
    Open {
        path: PathBuf,
        reply: Sender<Result<(), BackendError>>,
    },
    Close,
    Play,
    Pause,
    Stop,
    SetVolume(f32),
    SetPosition(Duration),
    Quit,
}

/// Position/volume bookkeeping shared between the handle, the output thread
/// and the position ticker.
#[derive(Debug)]
pub(super) struct OutputClock {
    pub(super) accumulated: Duration,
    pub(super) started_at: Option<Instant>,
    pub(super) volume: f32,
}

impl Default for OutputClock {
    fn default() -> Self {
        Self {
            accumulated: Duration::ZERO,
            started_at: None,
            volume: 1.0,
        }
    }
}

impl OutputClock {
    pub(super) fn position(&self) -> Duration {
        self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |started| started.elapsed())
    }

    pub(super) fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.started_at = None;
    }
}

pub struct RodioBackend {
    tx: Sender<OutputCmd>,
    clock: Arc<Mutex<OutputClock>>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioBackend {
    /// Spawn the output thread and wait for it to acquire the default
    /// output device.
    pub fn new() -> Result<Self, BackendError> {
        let (tx, rx) = mpsc::channel();
        let clock = Arc::new(Mutex::new(OutputClock::default()));
        let (ready_tx, ready_rx) = mpsc::channel();

        let join = spawn_output_thread(rx, clock.clone(), ready_tx);
        ready_rx.recv().map_err(|_| BackendError::Disconnected)??;

        Ok(Self {
            tx,
            clock,
            join: Mutex::new(Some(join)),
        })
    }

    fn send(&self, cmd: OutputCmd) {
        let _ = self.tx.send(cmd);
    }

    fn with_clock(&self, update: impl FnOnce(&mut OutputClock)) {
        if let Ok(mut clock) = self.clock.lock() {
            update(&mut clock);
        }
    }
}

impl MediaBackend for RodioBackend {
    fn open(&self, path: &Path) -> Result<(), BackendError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.send(OutputCmd::Open {
            path: path.to_path_buf(),
            reply: reply_tx,
        });
        reply_rx.recv().map_err(|_| BackendError::Disconnected)?
    }

    fn close(&self) {
        self.with_clock(OutputClock::reset);
        self.send(OutputCmd::Close);
    }

    fn play(&self) {
        self.with_clock(|clock| {
            if clock.started_at.is_none() {
                clock.started_at = Some(Instant::now());
            }
        });
        self.send(OutputCmd::Play);
    }

    fn pause(&self) {
        self.with_clock(|clock| {
            if let Some(started) = clock.started_at.take() {
                clock.accumulated += started.elapsed();
            }
        });
        self.send(OutputCmd::Pause);
    }

    fn stop(&self) {
        self.with_clock(OutputClock::reset);
        self.send(OutputCmd::Stop);
    }

    fn volume(&self) -> f32 {
        self.clock.lock().map(|clock| clock.volume).unwrap_or(1.0)
    }

    fn set_volume(&self, volume: f32) {
        self.with_clock(|clock| clock.volume = volume);
        self.send(OutputCmd::SetVolume(volume));
    }

    fn position(&self) -> Duration {
        self.clock
            .lock()
            .map(|clock| clock.position())
            .unwrap_or(Duration::ZERO)
    }

    fn set_position(&self, position: Duration) {
        self.with_clock(|clock| {
            clock.accumulated = position;
            if clock.started_at.is_some() {
                clock.started_at = Some(Instant::now());
            }
        });
        self.send(OutputCmd::SetPosition(position));
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        let _ = self.tx.send(OutputCmd::Quit);
        if let Ok(mut join) = self.join.lock() {
            if let Some(handle) = join.take() {
                let _ = handle.join();
            }
        }
    }
}

//! Once-per-second position reporting while playback is active.

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::timefmt;

use super::backend::MediaBackend;
use super::events::{EventHub, PlayerEvent};

/// A cancellable periodic publisher of the backend's live position.
///
/// [`stop`](PositionTicker::stop) signals the thread and joins it, so no
/// tick is delivered after it returns and a subsequent start cannot overlap
/// the old thread.
pub(super) struct PositionTicker {
    tx: Sender<()>,
    join: Option<JoinHandle<()>>,
}

impl PositionTicker {
    pub(super) fn start(
        backend: Arc<dyn MediaBackend>,
        events: EventHub,
        cap: Duration,
    ) -> Self {
        Self::start_with_period(backend, events, cap, Duration::from_secs(1))
    }

    pub(super) fn start_with_period(
        backend: Arc<dyn MediaBackend>,
        events: EventHub,
        cap: Duration,
        period: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<()>();
        let join = thread::spawn(move || {
            loop {
                match rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => {
                        let mut position = backend.position();
                        if cap > Duration::ZERO && position > cap {
                            position = cap;
                        }
                        events.publish(PlayerEvent::Position(position));
                        events.publish(PlayerEvent::PositionString(timefmt::duration_to_string(
                            position,
                        )));
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self {
            tx,
            join: Some(join),
        }
    }

    pub(super) fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.tx.send(());
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for PositionTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

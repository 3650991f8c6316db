//! Typed change notifications pushed to the presentation layer.
//!
//! Every mutation the session makes is announced through an [`EventHub`];
//! the engine never polls its consumers. Value events are immediately
//! followed by their formatted-string counterpart so subscribers never see
//! a torn value/string pair.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::types::PlaybackState;

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// The catalog was rebuilt; re-read it from the player.
    Catalog,
    Position(Duration),
    PositionString(String),
    Duration(Duration),
    DurationString(String),
    State(PlaybackState),
}

/// Fan-out hub for [`PlayerEvent`]s.
///
/// Cloning shares the subscriber list, so the ticker thread publishes
/// through the same hub as the engine. Subscribers that dropped their
/// receiver are discarded on the next publish.
#[derive(Clone, Default)]
pub struct EventHub {
    subscribers: Arc<Mutex<Vec<Sender<PlayerEvent>>>>,
}

impl EventHub {
    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(tx);
        }
        rx
    }

    pub(crate) fn publish(&self, event: PlayerEvent) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_reaches_every_subscriber_in_order() {
        let hub = EventHub::default();
        let a = hub.subscribe();
        let b = hub.subscribe();

        hub.publish(PlayerEvent::Position(Duration::from_secs(3)));
        hub.publish(PlayerEvent::PositionString("00:00:03".into()));

        for rx in [&a, &b] {
            assert_eq!(
                rx.try_recv().unwrap(),
                PlayerEvent::Position(Duration::from_secs(3))
            );
            assert_eq!(
                rx.try_recv().unwrap(),
                PlayerEvent::PositionString("00:00:03".into())
            );
        }
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let hub = EventHub::default();
        let keep = hub.subscribe();
        drop(hub.subscribe());

        hub.publish(PlayerEvent::Catalog);
        assert_eq!(keep.try_recv().unwrap(), PlayerEvent::Catalog);
    }
}

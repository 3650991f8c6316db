//! A local-file music player engine.
//!
//! rondo indexes audio files from user-chosen folders into a deduplicated,
//! filename-sorted catalog and drives playback over it, walking either the
//! sorted catalog or a per-reload shuffle permutation. Every change is
//! pushed to subscribers as a typed [`PlayerEvent`]; the presentation layer
//! never polls.
//!
//! Audio output goes through the [`MediaBackend`] seam ([`RodioBackend`] in
//! production) and tag reading through [`TagReader`] ([`LoftyTagReader`]),
//! so both collaborators can be substituted in tests.

pub mod config;
pub mod library;
pub mod player;
pub mod timefmt;

pub use config::Settings;
pub use library::{CancelFlag, Library, LoftyTagReader, TagError, TagReader, Track};
pub use player::{
    BackendError, EventHub, MediaBackend, PlaybackState, Player, PlayerEvent, RodioBackend,
};

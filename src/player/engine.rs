use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use log::debug;
use rand::rngs::SmallRng;
use rand::{RngExt, SeedableRng};

use crate::config::{LibrarySettings, PlaybackSettings, Settings};
use crate::library::{Library, TagReader, Track};
use crate::timefmt;

use super::backend::{BackendError, MediaBackend};
use super::events::{EventHub, PlayerEvent};
use super::ticker::PositionTicker;
use super::types::PlaybackState;

const SEEK_BACK_STEP: Duration = Duration::from_secs(15);

/// The playback session: current track, ordering mode, transport state and
/// the library it navigates.
///
/// All mutation goes through `&mut self`, so user-driven calls can never
/// overlap a reload on the same instance. The position ticker runs on its
/// own thread but only reads the backend and publishes events.
pub struct Player {
    pub(crate) library: Library,
    backend: Arc<dyn MediaBackend>,
    tag_reader: Box<dyn TagReader>,
    events: EventHub,
    pub(crate) source: Option<Track>,
    pub(crate) state: PlaybackState,
    pub(crate) is_shuffle: bool,
    pub(crate) is_repeat: bool,
    pub(crate) shuffle_order: Vec<PathBuf>,
    ticker: Option<PositionTicker>,
    rng: SmallRng,
}

impl Player {
    /// Build a session from explicit settings. The catalog starts empty;
    /// call [`reload_files`](Player::reload_files) to index the folders.
    pub fn new(
        settings: &Settings,
        backend: Arc<dyn MediaBackend>,
        tag_reader: Box<dyn TagReader>,
    ) -> Self {
        let mut library = Library::new();
        for folder in &settings.library.music_sources {
            library.add_folder(folder.clone());
        }
        backend.set_volume((settings.playback.volume / 100.0).clamp(0.0, 1.0));

        Self {
            library,
            backend,
            tag_reader,
            events: EventHub::default(),
            source: None,
            state: PlaybackState::Stopped,
            is_shuffle: settings.playback.shuffle,
            is_repeat: settings.playback.repeat,
            shuffle_order: Vec::new(),
            ticker: None,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    /// Receive every change notification from this session.
    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    /// Snapshot the current preferences for persistence by the caller.
    pub fn to_settings(&self) -> Settings {
        Settings {
            library: LibrarySettings {
                music_sources: self.library.folder_paths().to_vec(),
            },
            playback: PlaybackSettings {
                shuffle: self.is_shuffle,
                repeat: self.is_repeat,
                volume: self.volume(),
            },
        }
    }

    pub fn tracks(&self) -> &[Track] {
        self.library.files()
    }

    pub fn folder_paths(&self) -> &[PathBuf] {
        self.library.folder_paths()
    }

    /// Add a search folder; takes effect on the next reload.
    pub fn add_folder(&mut self, folder: PathBuf) -> bool {
        self.library.add_folder(folder)
    }

    /// Remove a search folder; takes effect on the next reload.
    pub fn remove_folder(&mut self, folder: &Path) -> bool {
        self.library.remove_folder(folder)
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.source.as_ref()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_shuffle(&self) -> bool {
        self.is_shuffle
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.is_shuffle = shuffle;
    }

    pub fn is_repeat(&self) -> bool {
        self.is_repeat
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.is_repeat = repeat;
    }

    /// The randomized navigation order, a permutation of the catalog's
    /// paths. Regenerated on every reload.
    pub fn shuffle_order(&self) -> &[PathBuf] {
        &self.shuffle_order
    }

    /// Rebuild the catalog from the configured folders and draw a fresh
    /// shuffle permutation over it.
    ///
    /// If the current track vanished from the catalog the session falls
    /// back to no source / Stopped before the notifications go out.
    pub fn reload_files(&mut self) {
        self.library.reload_files(self.tag_reader.as_ref());
        debug!("reloaded catalog: {} tracks", self.library.files().len());

        self.shuffle_order = self
            .library
            .files()
            .iter()
            .map(|track| track.path.clone())
            .collect();
        fisher_yates(&mut self.shuffle_order, &mut self.rng);

        if let Some(current) = self.source.clone() {
            if self.library.track_by_path(&current.path).is_none() {
                self.halt_transport();
                self.backend.close();
                self.source = None;
            }
        }

        self.events.publish(PlayerEvent::Catalog);
        self.publish_position(self.position());
        self.publish_duration(self.duration());
        self.events.publish(PlayerEvent::State(self.state));
    }

    /// Load a different track (paused, position zero) or unload with `None`.
    ///
    /// Setting the already-current track is a no-op. On open failure the
    /// session falls back to no source / Stopped and the error is returned.
    pub fn set_source(&mut self, track: Option<Track>) -> Result<(), BackendError> {
        let Some(track) = track else {
            self.close();
            return Ok(());
        };

        if self
            .source
            .as_ref()
            .is_some_and(|current| current.path == track.path)
        {
            return Ok(());
        }

        self.halt_transport();
        self.backend.close();

        if let Err(err) = self.backend.open(&track.path) {
            self.source = None;
            self.publish_position(Duration::ZERO);
            self.publish_duration(Duration::ZERO);
            self.events.publish(PlayerEvent::State(self.state));
            return Err(err);
        }

        self.source = Some(track);
        self.publish_position(Duration::ZERO);
        self.publish_duration(self.duration());
        self.events.publish(PlayerEvent::State(self.state));
        Ok(())
    }

    /// Unload the current track and release the backend handle.
    pub fn close(&mut self) {
        self.halt_transport();
        self.backend.close();
        self.source = None;
        self.publish_position(Duration::ZERO);
        self.publish_duration(Duration::ZERO);
        self.events.publish(PlayerEvent::State(self.state));
    }

    /// Start playback of the current track. No-op while already playing or
    /// with nothing loaded.
    pub fn play(&mut self) {
        if self.state == PlaybackState::Playing || self.source.is_none() {
            return;
        }
        self.backend.play();
        self.start_ticker();
        self.state = PlaybackState::Playing;
        self.events.publish(PlayerEvent::State(self.state));
    }

    /// Pause playback, republishing the exact pause position. No-op unless
    /// playing.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.stop_ticker();
        self.backend.pause();
        self.state = PlaybackState::Paused;
        self.publish_position(self.position());
        self.events.publish(PlayerEvent::State(self.state));
    }

    /// Halt playback and rewind to zero, whatever the prior state.
    pub fn stop(&mut self) {
        self.halt_transport();
        self.publish_position(Duration::ZERO);
        self.events.publish(PlayerEvent::State(self.state));
    }

    /// Advance along the active ordering and play.
    ///
    /// Shuffled mode walks the permutation and wraps at its end. Sequential
    /// mode wraps over the sorted catalog, except that with repeat on the
    /// current track is replayed instead. No-op with nothing loaded.
    pub fn next(&mut self) -> Result<(), BackendError> {
        let Some(current) = self.source.clone() else {
            return Ok(());
        };

        if self.is_shuffle {
            let Some(index) = self.index_in_shuffle(&current.path) else {
                return Ok(());
            };
            let next = (index + 1) % self.shuffle_order.len();
            let path = self.shuffle_order[next].clone();
            self.jump_to_path(&path)
        } else if self.is_repeat {
            self.play();
            Ok(())
        } else {
            let Some(index) = self.index_in_catalog(&current.path) else {
                return Ok(());
            };
            let count = self.library.files().len();
            let track = self.library.files()[(index + 1) % count].clone();
            self.set_source(Some(track))?;
            self.play();
            Ok(())
        }
    }

    /// Step back along the active ordering and play.
    ///
    /// Shuffled mode clamps at the first permutation slot instead of
    /// wrapping; sequential mode wraps to the end of the catalog. Repeat has
    /// no effect on this direction. No-op with nothing loaded.
    pub fn previous(&mut self) -> Result<(), BackendError> {
        let Some(current) = self.source.clone() else {
            return Ok(());
        };

        if self.is_shuffle {
            let Some(index) = self.index_in_shuffle(&current.path) else {
                return Ok(());
            };
            let previous = index.saturating_sub(1);
            let path = self.shuffle_order[previous].clone();
            self.jump_to_path(&path)
        } else {
            let Some(index) = self.index_in_catalog(&current.path) else {
                return Ok(());
            };
            let count = self.library.files().len();
            let track = self.library.files()[(index + count - 1) % count].clone();
            self.set_source(Some(track))?;
            self.play();
            Ok(())
        }
    }

    /// Step the position back by fifteen seconds when at least that far in;
    /// otherwise a no-op.
    pub fn seek_back_15s(&mut self) {
        if self.source.is_none() {
            return;
        }
        let position = self.position();
        if position >= SEEK_BACK_STEP {
            self.set_position(position - SEEK_BACK_STEP);
        }
    }

    /// Live position, clamped to the current track's duration.
    pub fn position(&self) -> Duration {
        let position = self.backend.position();
        let duration = self.duration();
        if duration > Duration::ZERO && position > duration {
            duration
        } else {
            position
        }
    }

    pub fn set_position(&mut self, position: Duration) {
        self.backend.set_position(position);
        self.publish_position(self.position());
    }

    pub fn position_string(&self) -> String {
        timefmt::duration_to_string(self.position())
    }

    /// Duration of the current track, zero with nothing loaded.
    pub fn duration(&self) -> Duration {
        self.source
            .as_ref()
            .map(|track| track.duration)
            .unwrap_or(Duration::ZERO)
    }

    pub fn duration_string(&self) -> String {
        timefmt::duration_to_string(self.duration())
    }

    /// Output volume in percent (0 to 100).
    pub fn volume(&self) -> f32 {
        self.backend.volume() * 100.0
    }

    pub fn set_volume(&mut self, percent: f32) {
        self.backend.set_volume((percent / 100.0).clamp(0.0, 1.0));
    }

    fn index_in_shuffle(&self, path: &Path) -> Option<usize> {
        self.shuffle_order.iter().position(|entry| entry == path)
    }

    fn index_in_catalog(&self, path: &Path) -> Option<usize> {
        self.library
            .files()
            .iter()
            .position(|track| track.path == path)
    }

    fn jump_to_path(&mut self, path: &Path) -> Result<(), BackendError> {
        let Some(track) = self.library.track_by_path(path).cloned() else {
            return Ok(());
        };
        self.set_source(Some(track))?;
        self.play();
        Ok(())
    }

    /// Stop playback and the ticker without publishing anything; callers
    /// sequence their own notifications afterwards.
    fn halt_transport(&mut self) {
        self.stop_ticker();
        self.backend.set_position(Duration::ZERO);
        self.backend.stop();
        self.state = PlaybackState::Stopped;
    }

    fn start_ticker(&mut self) {
        self.stop_ticker();
        self.ticker = Some(PositionTicker::start(
            Arc::clone(&self.backend),
            self.events.clone(),
            self.duration(),
        ));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    fn publish_position(&self, position: Duration) {
        self.events.publish(PlayerEvent::Position(position));
        self.events.publish(PlayerEvent::PositionString(
            timefmt::duration_to_string(position),
        ));
    }

    fn publish_duration(&self, duration: Duration) {
        self.events.publish(PlayerEvent::Duration(duration));
        self.events.publish(PlayerEvent::DurationString(
            timefmt::duration_to_string(duration),
        ));
    }
}

/// Fisher-Yates: walk the index down from the top, swapping each slot with
/// a uniformly drawn slot at or below it.
pub(crate) fn fisher_yates<T>(list: &mut [T], rng: &mut SmallRng) {
    for k in (1..list.len()).rev() {
        let r = rng.random_range(0..=k);
        list.swap(k, r);
    }
}

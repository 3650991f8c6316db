use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level player settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/rondo/config.toml` or
/// `~/.config/rondo/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `RONDO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
///
/// The engine takes a `Settings` borrow at construction and hands the
/// current values back through `Player::to_settings`; there is no global
/// configuration state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            library: LibrarySettings::default(),
            playback: PlaybackSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Folders scanned for audio files, in the order the user added them.
    pub music_sources: Vec<PathBuf>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            music_sources: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether navigation walks the shuffle permutation.
    pub shuffle: bool,
    /// Whether `next` replays the current track in sequential mode.
    pub repeat: bool,
    /// Output volume in percent (0 to 100).
    pub volume: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat: false,
            volume: 50.0,
        }
    }
}

use std::path::{Path, PathBuf};
use std::{env, fs};

use thiserror::Error;

use super::schema::Settings;

#[derive(Debug, Error)]
pub enum SettingsSaveError {
    #[error("no config path could be resolved")]
    NoPath,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),
}

/// Configuration loading and saving.
///
/// `Settings::load` tries environment variables first (prefix `RONDO__`),
/// then an optional config file and falls back to struct defaults.
/// `Settings::save` writes the values back so callers can persist what
/// `Player::to_settings` returns.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("RONDO")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.playback.volume) {
            return Err("playback.volume must be between 0 and 100".to_string());
        }
        Ok(())
    }

    /// Save to the resolved config path, creating parent directories.
    pub fn save(&self) -> Result<(), SettingsSaveError> {
        let path = resolve_config_path().ok_or(SettingsSaveError::NoPath)?;
        self.save_to(&path)
    }

    /// Save to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsSaveError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Resolve the config path from `RONDO_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os("RONDO_CONFIG_PATH") {
        return Some(PathBuf::from(path));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/rondo/config.toml`
/// or `~/.config/rondo/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|dir| dir.join("rondo").join("config.toml"))
}

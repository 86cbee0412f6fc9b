//! Configuration loading for HackMatch.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Get the HackMatch home directory (~/.hackmatch).
pub fn get_home_dir() -> Result<PathBuf> {
    let home = directories::UserDirs::new()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

    Ok(home.home_dir().join(".hackmatch"))
}

/// Get the settings file path.
pub fn get_settings_path() -> Result<PathBuf> {
    Ok(get_home_dir()?.join("settings.json"))
}

/// Load settings from ~/.hackmatch/settings.json
pub fn load_settings() -> Result<Settings> {
    let path = get_settings_path()?;

    if !path.exists() {
        return Err(Error::Config(format!(
            "Settings file not found at {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(&path)?;
    let settings = parse_settings(&content)?;

    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Parse and validate a settings document.
pub fn parse_settings(content: &str) -> Result<Settings> {
    let settings: Settings = serde_json::from_str(content)?;
    validate_settings(&settings)?;
    Ok(settings)
}

fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.current_user_id.trim().is_empty() {
        return Err(Error::Config("current_user_id must not be empty".to_string()));
    }
    if settings.remote.timeout_secs == 0 {
        return Err(Error::Config("remote.timeout_secs must be positive".to_string()));
    }
    if let Some(url) = settings.remote.base_url.as_deref() {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "remote.base_url '{}' must be an http(s) URL",
                url
            )));
        }
    }
    Ok(())
}

/// Load settings or return default if not found.
pub fn load_settings_or_default() -> Settings {
    match get_settings_path() {
        Ok(path) => settings_or_default(&path),
        Err(e) => {
            tracing::warn!("Failed to locate settings: {}, using defaults", e);
            Settings::default()
        }
    }
}

/// A missing file quietly yields defaults. A file that cannot be read or
/// fails validation also yields defaults, with a warning.
fn settings_or_default(path: &Path) -> Settings {
    if !path.exists() {
        tracing::debug!("No settings at {}, using defaults", path.display());
        return Settings::default();
    }

    let loaded = std::fs::read_to_string(path)
        .map_err(Error::from)
        .and_then(|content| parse_settings(&content));
    match loaded {
        Ok(settings) => {
            tracing::debug!("Loaded settings from {}", path.display());
            settings
        }
        Err(e) => {
            tracing::warn!("Ignoring invalid settings at {}: {}, using defaults", path.display(), e);
            Settings::default()
        }
    }
}

/// Storage backend selection.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Json,
    Sqlite,
    Memory,
}

/// Storage configuration.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Storage {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Overrides the data directory (defaults to ~/.hackmatch).
    pub path: Option<PathBuf>,
}

/// Remote profile source configuration.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Remote {
    /// When unset, profiles come from the bundled directory.
    pub base_url: Option<String>,
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,
}

fn default_remote_timeout() -> u64 {
    10
}

impl Default for Remote {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_remote_timeout(),
        }
    }
}

/// HackMatch settings.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Settings {
    /// Profile acting as "me".
    #[serde(default = "default_current_user")]
    pub current_user_id: String,

    #[serde(default)]
    pub storage: Storage,

    #[serde(default)]
    pub remote: Remote,
}

fn default_current_user() -> String {
    "1".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            current_user_id: default_current_user(),
            storage: Storage::default(),
            remote: Remote::default(),
        }
    }
}

impl Settings {
    /// Directory holding persisted slots.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.path {
            Some(path) => Ok(path.clone()),
            None => get_home_dir(),
        }
    }
}

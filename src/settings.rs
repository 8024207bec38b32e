//! Recorder settings persisted outside the session.
//!
//! The store publishes every update on a `watch` channel; the session reads
//! one snapshot per captured step, so changes never apply retroactively.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub capture_screenshots: bool,
    pub mask_sensitive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            capture_screenshots: true,
            mask_sensitive: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("config dir not found")]
    NoConfigDir,
    #[error("unknown setting: {0}")]
    UnknownKey(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Settings {
    /// Apply one keyed change, as delivered by a sync-storage change event.
    pub fn apply_change(&mut self, key: &str, value: bool) -> Result<(), SettingsError> {
        match key {
            "captureScreenshots" => self.capture_screenshots = value,
            "maskSensitive" => self.mask_sensitive = value,
            other => return Err(SettingsError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("workmap").join("settings.json"))
}

/// Missing or corrupt files load defaults.
pub fn load(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
        Err(_) => Settings::default(),
    }
}

pub fn save(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Persisted settings plus a channel that pushes updates to sessions.
pub struct SettingsStore {
    path: Option<PathBuf>,
    tx: watch::Sender<Settings>,
}

impl SettingsStore {
    /// Load from `path` (or start from defaults when `None`).
    pub fn open(path: Option<PathBuf>) -> Self {
        let initial = path.as_deref().map(load).unwrap_or_default();
        let (tx, _rx) = watch::channel(initial);
        Self { path, tx }
    }

    /// In-memory store with defaults; nothing is written to disk.
    pub fn in_memory() -> Self {
        Self::open(None)
    }

    pub fn current(&self) -> Settings {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    /// Replace the settings, persist them, and notify subscribers.
    pub fn set(&self, settings: Settings) -> Result<(), SettingsError> {
        if let Some(path) = &self.path {
            save(path, &settings)?;
        }
        self.tx.send_replace(settings);
        tracing::debug!(?settings, "settings updated");
        Ok(())
    }

    pub fn apply_change(&self, key: &str, value: bool) -> Result<(), SettingsError> {
        let mut next = self.current();
        next.apply_change(key, value)?;
        self.set(next)
    }
}

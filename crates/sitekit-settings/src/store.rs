//! Settings store
//!
//! Owns the loaded [`Config`] together with the file it came from, so the
//! editor can change values and write them back in one place.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{default_config_path, Config};
use crate::error::SettingsResult;

#[derive(Debug, Clone)]
pub struct SettingsStore {
    config: Config,
    path: PathBuf,
    dirty: bool,
}

impl SettingsStore {
    /// Opens the config at `path`, falling back to defaults when the file
    /// does not exist yet. An unreadable or invalid file is an error.
    pub fn open(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();
        let config = if path.exists() {
            let config = Config::load_from_file(&path)?;
            info!(path = %path.display(), "settings loaded");
            config
        } else {
            debug!(path = %path.display(), "no settings file, using defaults");
            Config::default()
        };
        Ok(Self {
            config,
            path,
            dirty: false,
        })
    }

    /// Opens the config in the platform config directory.
    pub fn open_default() -> SettingsResult<Self> {
        Self::open(default_config_path()?)
    }

    /// Like [`SettingsStore::open`], but an invalid file is logged and
    /// replaced by defaults in memory.
    pub fn open_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(path.clone()) {
            Ok(store) => store,
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring unusable settings file");
                Self {
                    config: Config::default(),
                    path,
                    dirty: false,
                }
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access; marks the store dirty.
    pub fn config_mut(&mut self) -> &mut Config {
        self.dirty = true;
        &mut self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Validates and writes the config to its file.
    pub fn save(&mut self) -> SettingsResult<()> {
        self.config.save_to_file(&self.path)?;
        self.dirty = false;
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// Restores defaults in memory. Call [`SettingsStore::save`] to persist.
    pub fn reset(&mut self) {
        self.config = Config::default();
        self.dirty = true;
    }
}

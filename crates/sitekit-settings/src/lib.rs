//! SiteKit Settings Crate
//!
//! Handles editor configuration: the engine tunables, display defaults for
//! new scenes and the recent-snapshot list, persisted as JSON or TOML.

pub mod config;
pub mod error;
pub mod store;

pub use config::{default_config_path, Config, FileSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use store::SettingsStore;

//! Configuration for the SiteKit editor
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in a platform-specific directory.
//!
//! Configuration is organized into sections:
//! - Engine tunables (zoom limits, gesture radii, snapping, history depth)
//! - Display defaults applied to new scenes (grid, labels, unit)
//! - File handling (recent snapshots)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use sitekit_core::{DisplaySettings, EngineTuning, InteractionTuning, ViewportLimits};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Largest snap tolerance that still leaves a gap between 45 degree steps.
const MAX_SNAP_TOLERANCE_DEG: f64 = 22.5;

/// File handling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    /// Most recently opened snapshots, newest first
    pub recent_snapshots: Vec<PathBuf>,
    /// Number of recent snapshots to track
    pub recent_files_count: usize,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            recent_snapshots: Vec::new(),
            recent_files_count: 10,
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Engine tunables and display defaults
    pub engine: EngineTuning,
    /// File handling
    pub files: FileSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
            })?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        validate_viewport(&self.engine.viewport)?;
        validate_interaction(&self.engine.interaction)?;
        validate_display(&self.engine.display)?;

        if self.engine.history_depth == 0 {
            return Err(ConfigError::out_of_range("history_depth", 0));
        }
        if self.files.recent_files_count == 0 {
            return Err(ConfigError::out_of_range("files.recent_files_count", 0));
        }
        Ok(())
    }

    /// Add snapshot to the recent list
    pub fn add_recent_snapshot(&mut self, path: PathBuf) {
        let recent = &mut self.files.recent_snapshots;
        recent.retain(|p| p != &path);
        recent.insert(0, path);
        recent.truncate(self.files.recent_files_count);
    }
}

fn positive(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(key, value))
    }
}

fn non_negative(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(key, value))
    }
}

fn validate_viewport(limits: &ViewportLimits) -> ConfigResult<()> {
    positive("viewport.min_scale", limits.min_scale)?;
    positive("viewport.max_scale", limits.max_scale)?;
    if limits.min_scale >= limits.max_scale {
        return Err(ConfigError::out_of_range(
            "viewport.min_scale",
            format!("{} >= max_scale {}", limits.min_scale, limits.max_scale),
        ));
    }

    let zoom_in = [
        ("viewport.wheel_zoom_in", limits.wheel_zoom_in),
        ("viewport.button_zoom_in", limits.button_zoom_in),
    ];
    for (key, factor) in zoom_in {
        if !(factor.is_finite() && factor > 1.0) {
            return Err(ConfigError::out_of_range(key, factor));
        }
    }

    let zoom_out = [
        ("viewport.wheel_zoom_out", limits.wheel_zoom_out),
        ("viewport.button_zoom_out", limits.button_zoom_out),
    ];
    for (key, factor) in zoom_out {
        if !(factor > 0.0 && factor < 1.0) {
            return Err(ConfigError::out_of_range(key, factor));
        }
    }
    Ok(())
}

fn validate_interaction(tuning: &InteractionTuning) -> ConfigResult<()> {
    let tolerance = tuning.snap_tolerance_deg;
    if !(0.0..=MAX_SNAP_TOLERANCE_DEG).contains(&tolerance) {
        return Err(ConfigError::out_of_range(
            "interaction.snap_tolerance_deg",
            tolerance,
        ));
    }

    positive("interaction.scroll_rotate_step_deg", tuning.scroll_rotate_step_deg)?;
    positive("interaction.nudge_px", tuning.nudge_px)?;
    positive("interaction.fast_nudge_px", tuning.fast_nudge_px)?;
    positive("interaction.handle_radius_px", tuning.handle_radius_px)?;
    non_negative("interaction.handle_offset_px", tuning.handle_offset_px)?;
    positive("interaction.min_instance_size_px", tuning.min_instance_size_px)?;
    non_negative("interaction.paste_offset_px", tuning.paste_offset_px)?;
    positive(
        "interaction.perimeter_close_radius_px",
        tuning.perimeter_close_radius_px,
    )?;
    positive(
        "interaction.calibration_point_radius_px",
        tuning.calibration_point_radius_px,
    )?;
    non_negative("interaction.drag_threshold_px", tuning.drag_threshold_px)?;
    Ok(())
}

fn validate_display(display: &DisplaySettings) -> ConfigResult<()> {
    positive("display.grid_spacing", display.grid_spacing)?;
    if !(0.0..=1.0).contains(&display.grid_opacity) {
        return Err(ConfigError::out_of_range(
            "display.grid_opacity",
            display.grid_opacity,
        ));
    }
    Ok(())
}

/// Platform config file location, e.g. `~/.config/sitekit/config.toml`.
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let dir = dirs::config_dir().ok_or_else(|| {
        ConfigError::UnsupportedPlatform("no user configuration directory".to_string())
    })?;
    Ok(dir.join("sitekit").join("config.toml"))
}

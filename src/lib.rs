//! # SiteKit
//!
//! Site-layout editor engine for placing equipment over calibrated aerial
//! photos, with live spacing checks and undo/redo.
//!
//! ## Architecture
//!
//! SiteKit is organized as a workspace with multiple crates:
//!
//! 1. **sitekit-core** - Error taxonomy, length units, engine tunables
//! 2. **sitekit-layout** - Viewport, calibration, scene model, validator,
//!    hit-testing, history and the interaction state machine
//! 3. **sitekit-settings** - Persistent configuration (JSON or TOML)
//! 4. **sitekit** - Command-line front end that inspects saved snapshots

use std::fmt;
use std::path::Path;

use anyhow::Context;

pub use sitekit_core::{format_length, EngineTuning, Error, LengthUnit, Result};
pub use sitekit_layout::{
    find_conflicts, Conflict, InteractionController, SceneEditor, SceneSnapshot, TemplateCatalog,
    Viewport,
};
pub use sitekit_settings::{Config, SettingsStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr
/// - RUST_LOG environment variable support
/// - JSON lines instead of text when `json` is set
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_line_number(true),
            )
            .try_init()?;
    }
    Ok(())
}

/// One spacing violation, resolved to instance names and real-world units.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictLine {
    pub first: String,
    pub second: String,
    pub required_spacing_px: f64,
    pub required_spacing: f64,
}

/// Summary of a saved scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotReport {
    pub instances: usize,
    pub hidden: usize,
    pub calibrated: bool,
    pub units_per_pixel: f64,
    pub unit: LengthUnit,
    pub measurements: usize,
    pub conflicts: Vec<ConflictLine>,
}

impl SnapshotReport {
    pub fn from_snapshot(snapshot: &SceneSnapshot) -> Self {
        let data = &snapshot.scene;
        let units_per_pixel = data
            .calibration
            .as_ref()
            .map(|line| line.units_per_pixel)
            .unwrap_or(sitekit_core::constants::DEFAULT_UNITS_PER_PIXEL);

        let name_of = |id: &sitekit_layout::InstanceId| {
            data.instances
                .iter()
                .find(|instance| &instance.id == id)
                .map(|instance| instance.name.clone())
                .unwrap_or_else(|| id.to_string())
        };

        // Stored pixel sizes may predate the stored calibration.
        let mut instances = data.instances.clone();
        for instance in &mut instances {
            instance.rescale(units_per_pixel);
        }

        let conflicts = find_conflicts(&instances, units_per_pixel)
            .into_iter()
            .map(|conflict| ConflictLine {
                first: name_of(&conflict.first),
                second: name_of(&conflict.second),
                required_spacing_px: conflict.required_spacing_px,
                required_spacing: conflict.required_spacing_px / units_per_pixel,
            })
            .collect();

        Self {
            instances: data.instances.len(),
            hidden: data.instances.iter().filter(|i| !i.visible).count(),
            calibrated: data.calibration.is_some(),
            units_per_pixel,
            unit: snapshot.display.unit,
            measurements: data.measurements.len(),
            conflicts,
        }
    }

    /// Re-expresses real-world lengths in `unit`.
    pub fn in_unit(mut self, unit: LengthUnit) -> Self {
        let from = self.unit;
        self.units_per_pixel *= unit.convert(1.0, from);
        for conflict in &mut self.conflicts {
            conflict.required_spacing = from.convert(conflict.required_spacing, unit);
        }
        self.unit = unit;
        self
    }

    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

impl fmt::Display for SnapshotReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "instances:    {} ({} hidden)", self.instances, self.hidden)?;
        if self.calibrated {
            writeln!(f, "calibration:  {:.4} px per {}", self.units_per_pixel, self.unit.symbol())?;
        } else {
            writeln!(f, "calibration:  none")?;
        }
        writeln!(f, "measurements: {}", self.measurements)?;
        if self.conflicts.is_empty() {
            write!(f, "conflicts:    none")
        } else {
            write!(f, "conflicts:    {}", self.conflicts.len())?;
            for conflict in &self.conflicts {
                write!(
                    f,
                    "\n  {} <-> {} (needs {})",
                    conflict.first,
                    conflict.second,
                    format_length(conflict.required_spacing, self.unit)
                )?;
            }
            Ok(())
        }
    }
}

/// Loads a snapshot file and checks it for spacing conflicts.
pub fn inspect_snapshot(path: &Path) -> anyhow::Result<SnapshotReport> {
    let snapshot = SceneSnapshot::load_from_file(path)
        .with_context(|| format!("failed to load snapshot {}", path.display()))?;
    let report = SnapshotReport::from_snapshot(&snapshot);
    tracing::info!(
        path = %path.display(),
        instances = report.instances,
        conflicts = report.conflicts.len(),
        "snapshot inspected"
    );
    Ok(report)
}

/// Builds an interaction controller configured from `config`.
pub fn controller_from_config<C: TemplateCatalog>(
    config: &Config,
    catalog: C,
) -> InteractionController<C> {
    InteractionController::new(
        SceneEditor::new(&config.engine),
        Viewport::new(config.engine.viewport),
        catalog,
    )
}

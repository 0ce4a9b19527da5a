//! Scene snapshots.
//!
//! A snapshot is the scene model plus viewport and display flags, encoded as
//! JSON. Loading validates everything before touching the live scene, so a
//! corrupt snapshot aborts without side effects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use sitekit_core::constants::SNAPSHOT_VERSION;
use sitekit_core::{DisplaySettings, SceneError, SnapshotError};

use crate::calibration::CalibrationLine;
use crate::commands::SceneCommand;
use crate::editor::SceneEditor;
use crate::model::{EquipmentInstance, InstanceId, MeasurementLine, Perimeter};
use crate::viewport::Viewport;

/// Viewport state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl From<&Viewport> for ViewportState {
    fn from(viewport: &Viewport) -> Self {
        Self {
            scale: viewport.scale(),
            offset_x: viewport.offset().x,
            offset_y: viewport.offset().y,
        }
    }
}

/// Persistent part of the scene model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneData {
    pub instances: Vec<EquipmentInstance>,
    #[serde(default)]
    pub calibration: Option<CalibrationLine>,
    #[serde(default)]
    pub perimeter: Option<Perimeter>,
    #[serde(default)]
    pub measurements: Vec<MeasurementLine>,
}

/// Complete saved scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub viewport: ViewportState,
    pub scene: SceneData,
    #[serde(default)]
    pub display: DisplaySettings,
}

/// How a snapshot is combined with the current scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Discard the current scene and its history
    #[default]
    Replace,
    /// Append the snapshot's instances as one undoable action
    Merge,
}

impl SceneSnapshot {
    pub fn capture(editor: &SceneEditor, viewport: &Viewport) -> Self {
        let scene = editor.scene();
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            viewport: ViewportState::from(viewport),
            scene: SceneData {
                instances: scene.instances().to_vec(),
                calibration: scene.calibration().cloned(),
                perimeter: scene.perimeter().cloned(),
                measurements: scene.measurements().to_vec(),
            },
            display: scene.display.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: SceneSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> sitekit_core::Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), "scene snapshot saved");
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> sitekit_core::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            instances = snapshot.scene.instances.len(),
            "scene snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Checks version, ids, geometry and calibration consistency.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let vp = &self.viewport;
        let finite = vp.scale.is_finite() && vp.offset_x.is_finite() && vp.offset_y.is_finite();
        if !finite || vp.scale <= 0.0 {
            return Err(corrupt("viewport is not finite"));
        }

        if let Some(line) = &self.scene.calibration {
            if !line.is_consistent() {
                return Err(corrupt("calibration ratio does not match its distances"));
            }
        }

        if let Some(perimeter) = &self.scene.perimeter {
            if perimeter.vertices.len() < 3 || perimeter.vertices.iter().any(|v| !v.is_finite()) {
                return Err(corrupt("perimeter is degenerate"));
            }
        }

        let mut seen = HashSet::new();
        for instance in &self.scene.instances {
            if !seen.insert(instance.id.as_str()) {
                return Err(SceneError::DuplicateId {
                    id: instance.id.to_string(),
                }
                .into());
            }
            instance.validate()?;
        }
        Ok(())
    }
}

fn corrupt(reason: &str) -> SnapshotError {
    SnapshotError::Corrupt {
        reason: reason.to_string(),
    }
}

impl SceneEditor {
    /// Loads a snapshot. Nothing changes if validation fails.
    pub fn restore(
        &mut self,
        snapshot: &SceneSnapshot,
        mode: LoadMode,
    ) -> Result<(), SnapshotError> {
        snapshot.validate()?;
        match mode {
            LoadMode::Replace => {
                self.scene.clear();
                for instance in &snapshot.scene.instances {
                    self.scene.push_instance(instance.clone());
                }
                self.scene.calibration = snapshot.scene.calibration.clone();
                self.scene.perimeter = snapshot.scene.perimeter.clone();
                self.scene.measurements = snapshot.scene.measurements.clone();
                self.scene.display = snapshot.display.clone();
                // Stored pixel sizes may predate the stored calibration.
                self.scene.rescale_all();
                self.log.clear();
                self.mark_saved();
                debug!(instances = self.scene.len(), "scene replaced from snapshot");
            }
            LoadMode::Merge => {
                let ratio = self.units_per_pixel();
                let instances: Vec<EquipmentInstance> = snapshot
                    .scene
                    .instances
                    .iter()
                    .map(|original| {
                        let mut copy = original.clone();
                        copy.id = InstanceId::generate();
                        copy.rescale(ratio);
                        copy
                    })
                    .collect();
                if instances.is_empty() {
                    return Ok(());
                }
                debug!(instances = instances.len(), "merging snapshot");
                self.push_command(SceneCommand::PasteInstances { instances });
            }
        }
        Ok(())
    }
}

//! Calibration commits for the scene editor.

use tracing::debug;

use sitekit_core::constants::DEFAULT_UNITS_PER_PIXEL;
use sitekit_core::CalibrationError;

use super::SceneEditor;
use crate::calibration::{CalibrationLine, CalibrationPoint};
use crate::commands::{GeometryChange, SceneCommand};
use crate::geometry::Point;

impl SceneEditor {
    /// Makes `line` the active calibration and rescales every instance, as
    /// one undoable action.
    pub fn apply_calibration(&mut self, line: CalibrationLine) {
        let ratio = line.units_per_pixel;
        let rescaled = self.rescale_changes(ratio);
        debug!(
            pixel_distance = line.pixel_distance,
            real_world_distance = line.real_world_distance,
            ratio,
            instances = rescaled.len(),
            "calibration committed"
        );
        self.push_command(SceneCommand::Calibrate {
            before: self.scene.calibration.clone(),
            after: Some(line),
            rescaled,
        });
    }

    /// Builds a line from two world points and a real-world length, then
    /// applies it. Nothing changes on error.
    pub fn calibrate(
        &mut self,
        start: Point,
        end: Point,
        real_world_distance: f64,
    ) -> Result<(), CalibrationError> {
        let line = CalibrationLine::new(
            CalibrationPoint::new(start),
            CalibrationPoint::new(end),
            real_world_distance,
        )
        .inspect_err(|err| debug!(%err, "calibration rejected"))?;
        self.apply_calibration(line);
        Ok(())
    }

    /// Re-enters a real-world length for the active line.
    pub fn recalibrate(&mut self, real_world_distance: f64) -> Result<(), CalibrationError> {
        let Some(current) = self.scene.calibration.clone() else {
            return Err(CalibrationError::NothingPending);
        };
        let line = CalibrationLine::new(current.start_point, current.end_point, real_world_distance)?;
        self.apply_calibration(line);
        Ok(())
    }

    /// Drops the active calibration, returning to the default ratio.
    pub fn clear_calibration(&mut self) -> bool {
        if self.scene.calibration.is_none() {
            return false;
        }
        let rescaled = self.rescale_changes(DEFAULT_UNITS_PER_PIXEL);
        self.push_command(SceneCommand::Calibrate {
            before: self.scene.calibration.clone(),
            after: None,
            rescaled,
        });
        true
    }

    fn rescale_changes(&self, ratio: f64) -> Vec<GeometryChange> {
        self.scene
            .instances()
            .iter()
            .map(|instance| {
                let mut scaled = instance.clone();
                scaled.rescale(ratio);
                GeometryChange {
                    id: instance.id.clone(),
                    before: instance.geometry(),
                    after: scaled.geometry(),
                }
            })
            .collect()
    }
}

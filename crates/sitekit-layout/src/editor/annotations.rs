//! Perimeter and ruler operations for the scene editor.

use tracing::trace;

use sitekit_core::constants::GEOMETRY_EPSILON;

use super::SceneEditor;
use crate::commands::SceneCommand;
use crate::geometry::Point;
use crate::model::{MeasurementLine, Perimeter};

impl SceneEditor {
    pub fn set_perimeter(&mut self, perimeter: Perimeter) -> bool {
        if self.scene.perimeter.as_ref() == Some(&perimeter) {
            return false;
        }
        self.push_command(SceneCommand::SetPerimeter {
            before: self.scene.perimeter.clone(),
            after: Some(perimeter),
        });
        true
    }

    pub fn clear_perimeter(&mut self) -> bool {
        if self.scene.perimeter.is_none() {
            return false;
        }
        self.push_command(SceneCommand::SetPerimeter {
            before: self.scene.perimeter.clone(),
            after: None,
        });
        true
    }

    /// Adds a ruler line. Zero-length lines are ignored.
    pub fn add_measurement(&mut self, start: Point, end: Point) -> Option<String> {
        if start.distance_to(&end) <= GEOMETRY_EPSILON {
            trace!("zero-length measurement ignored");
            return None;
        }
        let line = MeasurementLine::new(start, end);
        let id = line.id.clone();
        self.push_command(SceneCommand::AddMeasurement { line });
        Some(id)
    }

    pub fn remove_measurement(&mut self, id: &str) -> bool {
        let removed: Vec<(usize, MeasurementLine)> = self
            .scene
            .measurements
            .iter()
            .enumerate()
            .filter(|(_, m)| m.id == id)
            .map(|(index, m)| (index, m.clone()))
            .collect();
        if removed.is_empty() {
            trace!(id, "remove unknown measurement");
            return false;
        }
        self.push_command(SceneCommand::RemoveMeasurements { removed });
        true
    }

    pub fn clear_measurements(&mut self) -> bool {
        if self.scene.measurements.is_empty() {
            return false;
        }
        let removed = self.scene.measurements.iter().cloned().enumerate().collect();
        self.push_command(SceneCommand::RemoveMeasurements { removed });
        true
    }
}

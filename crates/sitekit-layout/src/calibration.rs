//! Calibration engine
//!
//! A calibration is a two-click reference line plus a user-entered real-world
//! length. The resulting ratio converts real-world sizes into world pixels for
//! every instance in the scene.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sitekit_core::constants::GEOMETRY_EPSILON;
use sitekit_core::CalibrationError;

use crate::geometry::Point;

/// An end point of a calibration line, in world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

impl CalibrationPoint {
    pub fn new(position: Point) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            x: position.x,
            y: position.y,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A committed calibration reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationLine {
    pub start_point: CalibrationPoint,
    pub end_point: CalibrationPoint,
    pub pixel_distance: f64,
    pub real_world_distance: f64,
    /// World pixels per real-world unit. `real_size * units_per_pixel` gives
    /// the pixel size.
    pub units_per_pixel: f64,
}

impl CalibrationLine {
    /// Builds a line, rejecting zero-length segments and non-positive lengths.
    pub fn new(
        start_point: CalibrationPoint,
        end_point: CalibrationPoint,
        real_world_distance: f64,
    ) -> Result<Self, CalibrationError> {
        let pixel_distance = start_point.position().distance_to(&end_point.position());
        if pixel_distance <= GEOMETRY_EPSILON {
            return Err(CalibrationError::ZeroLength);
        }
        if !(real_world_distance.is_finite() && real_world_distance > 0.0) {
            return Err(CalibrationError::NonPositiveDistance {
                distance: real_world_distance,
            });
        }

        Ok(Self {
            start_point,
            end_point,
            pixel_distance,
            real_world_distance,
            units_per_pixel: pixel_distance / real_world_distance,
        })
    }

    /// Checks the stored ratio against the stored distances.
    pub fn is_consistent(&self) -> bool {
        self.pixel_distance > 0.0
            && self.real_world_distance > 0.0
            && (self.units_per_pixel - self.pixel_distance / self.real_world_distance).abs()
                <= 1e-6 * self.units_per_pixel.abs().max(1.0)
    }
}

/// Progress of the two-click calibration gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CalibrationSession {
    /// Nothing recorded yet
    #[default]
    Idle,
    /// First point placed, waiting for the second click
    AwaitingEnd { start: CalibrationPoint },
    /// Both points placed, waiting for the real-world length
    AwaitingLength {
        start: CalibrationPoint,
        end: CalibrationPoint,
        pixel_distance: f64,
    },
}

/// What a calibration click did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationStep {
    /// First point recorded (or overwritten)
    Started,
    /// Second point recorded; the host should prompt for a length
    LengthRequested { pixel_distance: f64 },
    /// A length prompt is open; clicks are ignored until it resolves
    Ignored,
}

impl CalibrationSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, CalibrationSession::Idle)
    }

    pub fn is_awaiting_length(&self) -> bool {
        matches!(self, CalibrationSession::AwaitingLength { .. })
    }

    /// Pending start point, if any.
    pub fn start_point(&self) -> Option<&CalibrationPoint> {
        match self {
            CalibrationSession::Idle => None,
            CalibrationSession::AwaitingEnd { start }
            | CalibrationSession::AwaitingLength { start, .. } => Some(start),
        }
    }

    /// Pending end point, if any.
    pub fn end_point(&self) -> Option<&CalibrationPoint> {
        match self {
            CalibrationSession::AwaitingLength { end, .. } => Some(end),
            _ => None,
        }
    }

    /// Records the start point, replacing any pending one.
    pub fn begin(&mut self, position: Point) {
        *self = CalibrationSession::AwaitingEnd {
            start: CalibrationPoint::new(position),
        };
    }

    /// Feeds one world-space click into the gesture.
    ///
    /// A second click on top of the first is rejected and the start point
    /// stays pending.
    pub fn click(&mut self, position: Point) -> Result<CalibrationStep, CalibrationError> {
        match self {
            CalibrationSession::Idle => {
                self.begin(position);
                Ok(CalibrationStep::Started)
            }
            CalibrationSession::AwaitingEnd { start } => {
                let pixel_distance = start.position().distance_to(&position);
                if pixel_distance <= GEOMETRY_EPSILON {
                    return Err(CalibrationError::ZeroLength);
                }
                let start = start.clone();
                *self = CalibrationSession::AwaitingLength {
                    start,
                    end: CalibrationPoint::new(position),
                    pixel_distance,
                };
                Ok(CalibrationStep::LengthRequested { pixel_distance })
            }
            CalibrationSession::AwaitingLength { .. } => Ok(CalibrationStep::Ignored),
        }
    }

    /// Resolves the length prompt.
    ///
    /// On error the candidate line stays pending so the prompt can be retried.
    pub fn confirm(&mut self, real_world_distance: f64) -> Result<CalibrationLine, CalibrationError> {
        let CalibrationSession::AwaitingLength { start, end, .. } = self else {
            return Err(CalibrationError::NothingPending);
        };
        let line = CalibrationLine::new(start.clone(), end.clone(), real_world_distance)?;
        *self = CalibrationSession::Idle;
        Ok(line)
    }

    /// Discards any pending points.
    pub fn cancel(&mut self) {
        *self = CalibrationSession::Idle;
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sitekit_core::{format_length, LengthUnit};

use crate::geometry::{Bounds, Point};

/// Closed site boundary drawn in world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perimeter {
    pub vertices: Vec<Point>,
}

impl Perimeter {
    /// Returns `None` for fewer than three vertices.
    pub fn new(vertices: Vec<Point>) -> Option<Self> {
        (vertices.len() >= 3).then_some(Self { vertices })
    }

    /// Length of the closed outline in world pixels.
    pub fn length_px(&self) -> f64 {
        let n = self.vertices.len();
        (0..n)
            .map(|i| self.vertices[i].distance_to(&self.vertices[(i + 1) % n]))
            .sum()
    }

    /// Enclosed area in square world pixels (shoelace formula).
    pub fn area_px(&self) -> f64 {
        let n = self.vertices.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() / 2.0
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.vertices.iter().map(|v| Bounds::from_corners(*v, *v)))
    }
}

/// A ruler line between two world points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementLine {
    pub id: String,
    pub start: Point,
    pub end: Point,
}

impl MeasurementLine {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start,
            end,
        }
    }

    pub fn pixel_length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Length in real-world units.
    pub fn real_length(&self, units_per_pixel: f64) -> f64 {
        self.pixel_length() / units_per_pixel
    }

    /// Readout such as `"12.50 m"`.
    pub fn label(&self, units_per_pixel: f64, unit: LengthUnit) -> String {
        format_length(self.real_length(units_per_pixel), unit)
    }

    pub fn midpoint(&self) -> Point {
        (self.start + self.end) / 2.0
    }
}

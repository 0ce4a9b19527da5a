use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use sitekit_core::SceneError;

use crate::geometry::{normalize_degrees, Bounds, LocalFrame, Point, Vector2};

/// Unique id of a placed instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for InstanceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
}

/// User-facing size in real-world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum RealWorldSize {
    Rectangle { width: f64, height: f64 },
    Circle { radius: f64 },
}

impl RealWorldSize {
    pub fn shape(&self) -> ShapeKind {
        match self {
            RealWorldSize::Rectangle { .. } => ShapeKind::Rectangle,
            RealWorldSize::Circle { .. } => ShapeKind::Circle,
        }
    }

    /// True when every dimension is finite and positive.
    pub fn is_valid(&self) -> bool {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        match *self {
            RealWorldSize::Rectangle { width, height } => positive(width) && positive(height),
            RealWorldSize::Circle { radius } => positive(radius),
        }
    }

    /// Pixel `(width, height)` of the bounding box at the given ratio.
    pub fn to_pixels(&self, units_per_pixel: f64) -> (f64, f64) {
        match *self {
            RealWorldSize::Rectangle { width, height } => {
                (width * units_per_pixel, height * units_per_pixel)
            }
            RealWorldSize::Circle { radius } => {
                let d = 2.0 * radius * units_per_pixel;
                (d, d)
            }
        }
    }

    /// Inverse of [`RealWorldSize::to_pixels`] for the same shape.
    pub fn from_pixels(shape: ShapeKind, width: f64, height: f64, units_per_pixel: f64) -> Self {
        match shape {
            ShapeKind::Rectangle => RealWorldSize::Rectangle {
                width: width / units_per_pixel,
                height: height / units_per_pixel,
            },
            ShapeKind::Circle => RealWorldSize::Circle {
                radius: width / 2.0 / units_per_pixel,
            },
        }
    }
}

/// Extra margin drawn around an instance, in real-world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Clearance {
    Sides {
        left: f64,
        right: f64,
        top: f64,
        bottom: f64,
    },
    Radius {
        radius: f64,
    },
}

impl Clearance {
    pub fn none(shape: ShapeKind) -> Self {
        match shape {
            ShapeKind::Rectangle => Clearance::Sides {
                left: 0.0,
                right: 0.0,
                top: 0.0,
                bottom: 0.0,
            },
            ShapeKind::Circle => Clearance::Radius { radius: 0.0 },
        }
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            Clearance::Sides {
                left,
                right,
                top,
                bottom,
            } => left == 0.0 && right == 0.0 && top == 0.0 && bottom == 0.0,
            Clearance::Radius { radius } => radius == 0.0,
        }
    }

    fn values(&self) -> [f64; 4] {
        match *self {
            Clearance::Sides {
                left,
                right,
                top,
                bottom,
            } => [left, right, top, bottom],
            Clearance::Radius { radius } => [radius; 4],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.values().iter().all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Pixel geometry of an instance, the part that moves, rotates and rescales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstanceGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub real_size: RealWorldSize,
}

/// A placed piece of equipment.
///
/// Pixel geometry (`x`, `y`, `width`, `height`) drives rendering and picking;
/// `real_size` is what the user entered. The two are linked through the
/// scene's `units_per_pixel` and [`EquipmentInstance::rescale`] keeps them in
/// step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentInstance {
    pub id: InstanceId,
    pub template_id: String,
    pub shape: ShapeKind,
    /// Top-left corner of the unrotated box, world space
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees clockwise from up, `[0, 360)`
    pub rotation: f64,
    pub real_size: RealWorldSize,
    pub clearance: Clearance,
    /// Minimum distance to other instances, real-world units
    pub min_spacing: f64,
    pub name: String,
    pub color: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl EquipmentInstance {
    /// Axis-aligned box of the unrotated body.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_rect(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn frame(&self) -> LocalFrame {
        LocalFrame::new(self.center(), self.rotation)
    }

    /// Distance from the center to the top edge along the local up axis.
    pub fn extent(&self) -> f64 {
        match self.shape {
            ShapeKind::Rectangle => self.height / 2.0,
            ShapeKind::Circle => self.width.min(self.height) / 2.0,
        }
    }

    /// Rotation-aware containment test for a world point.
    pub fn contains_point(&self, world: Point) -> bool {
        let local = self.frame().to_local(world);
        match self.shape {
            ShapeKind::Rectangle => {
                local.x.abs() <= self.width / 2.0 && local.y.abs() <= self.height / 2.0
            }
            ShapeKind::Circle => local.length() <= self.width.min(self.height) / 2.0,
        }
    }

    pub fn geometry(&self) -> InstanceGeometry {
        InstanceGeometry {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
            real_size: self.real_size,
        }
    }

    pub fn set_geometry(&mut self, geometry: &InstanceGeometry) {
        self.x = geometry.x;
        self.y = geometry.y;
        self.width = geometry.width;
        self.height = geometry.height;
        self.rotation = geometry.rotation;
        self.real_size = geometry.real_size;
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, top_left: Point) {
        self.x = top_left.x;
        self.y = top_left.y;
    }

    pub fn translate(&mut self, delta: Vector2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees);
    }

    /// Recomputes pixel size from `real_size`; the top-left corner stays put.
    pub fn rescale(&mut self, units_per_pixel: f64) {
        let (width, height) = self.real_size.to_pixels(units_per_pixel);
        self.width = width;
        self.height = height;
    }

    /// Sets pixel size and derives `real_size` from it. Circles keep
    /// `width == height` using the given width.
    pub fn resize(&mut self, width: f64, height: f64, units_per_pixel: f64) {
        let height = match self.shape {
            ShapeKind::Rectangle => height,
            ShapeKind::Circle => width,
        };
        self.width = width;
        self.height = height;
        self.real_size = RealWorldSize::from_pixels(self.shape, width, height, units_per_pixel);
    }

    /// Clearance margins in world pixels as `[left, right, top, bottom]`.
    pub fn clearance_px(&self, units_per_pixel: f64) -> [f64; 4] {
        self.clearance.values().map(|v| v * units_per_pixel)
    }

    /// Rejects non-finite or degenerate geometry.
    pub fn validate(&self) -> Result<(), SceneError> {
        let invalid = |reason: &str| SceneError::InvalidGeometry {
            id: self.id.to_string(),
            reason: reason.to_string(),
        };

        let numbers = [self.x, self.y, self.width, self.height, self.rotation];
        if numbers.iter().any(|v| !v.is_finite()) {
            return Err(invalid("non-finite coordinate"));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(invalid("size must be positive"));
        }
        if !(0.0..360.0).contains(&self.rotation) {
            return Err(invalid("rotation must be in [0, 360)"));
        }
        if self.real_size.shape() != self.shape {
            return Err(invalid("real-world size does not match shape"));
        }
        if !self.real_size.is_valid() {
            return Err(invalid("real-world size must be positive"));
        }
        if !self.clearance.is_valid() {
            return Err(invalid("clearance must be non-negative"));
        }
        if !(self.min_spacing.is_finite() && self.min_spacing >= 0.0) {
            return Err(invalid("minimum spacing must be non-negative"));
        }
        Ok(())
    }
}

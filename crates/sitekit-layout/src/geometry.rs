//! Geometry primitives shared by the layout engine.
//!
//! World space is the background image's pixel grid: `+x` right, `+y` down.
//! Rotations are in degrees, clockwise on screen, with 0 pointing up.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

use sitekit_core::constants::ROTATION_SNAP_STEP_DEG;

/// A point or offset in 2D.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Offsets use the same representation as points.
pub type Vector2 = Point;

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    pub fn distance_squared_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Length when used as a vector.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Box with top-left corner `(x, y)`.
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Smallest box containing both points, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// Smallest box containing every box, or `None` for an empty input.
    pub fn enclosing(boxes: impl IntoIterator<Item = Bounds>) -> Option<Bounds> {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Grows the box by `margin` on all four sides.
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }

    /// Open-interval overlap test: boxes that only touch do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn union(&self, other: &Bounds) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }
}

/// Translate-then-rotate frame centered on an instance.
///
/// Hit-testing, rotation-handle placement and the render plan all go through
/// this type so the rotation convention lives in one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    center: Point,
    cos: f64,
    sin: f64,
}

impl LocalFrame {
    pub fn new(center: Point, rotation_deg: f64) -> Self {
        let radians = rotation_deg.to_radians();
        Self {
            center,
            cos: radians.cos(),
            sin: radians.sin(),
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// World point into the frame: translate by `-center`, rotate by `-rotation`.
    pub fn to_local(&self, world: Point) -> Point {
        let d = world - self.center;
        Point::new(
            d.x * self.cos + d.y * self.sin,
            -d.x * self.sin + d.y * self.cos,
        )
    }

    /// Local point back into world space.
    pub fn to_world(&self, local: Point) -> Point {
        Point::new(
            local.x * self.cos - local.y * self.sin,
            local.x * self.sin + local.y * self.cos,
        ) + self.center
    }

    /// World-space corners of the local rectangle `[-hw, hw] x [-hh, hh]`,
    /// clockwise from top-left.
    pub fn rect_corners(&self, left: f64, top: f64, right: f64, bottom: f64) -> [Point; 4] {
        [
            self.to_world(Point::new(left, top)),
            self.to_world(Point::new(right, top)),
            self.to_world(Point::new(right, bottom)),
            self.to_world(Point::new(left, bottom)),
        ]
    }
}

/// Maps any angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Snaps to the nearest multiple of 45 degrees when strictly closer than
/// `tolerance`.
pub fn snap_to_45(degrees: f64, tolerance: f64) -> f64 {
    let angle = normalize_degrees(degrees);
    let nearest = (angle / ROTATION_SNAP_STEP_DEG).round() * ROTATION_SNAP_STEP_DEG;
    if (angle - nearest).abs() < tolerance {
        normalize_degrees(nearest)
    } else {
        angle
    }
}

/// Rotation that points an instance at `center` towards `cursor`.
///
/// `atan2` measures from `+x`; adding 90 degrees moves zero to "up".
pub fn rotation_from_pointer(center: Point, cursor: Point) -> f64 {
    let angle = (cursor.y - center.y).atan2(cursor.x - center.x).to_degrees();
    normalize_degrees(angle + 90.0)
}

//! Viewport and coordinate transformation.
//!
//! Maps between screen pixels and world coordinates (background image pixels).
//! Both spaces have `+y` pointing down, so the transform is a uniform scale
//! plus an offset:
//!
//! ```text
//! world  = (screen - offset) / scale
//! screen = world * scale + offset
//! ```

use std::fmt;

use sitekit_core::constants::VIEW_PADDING;
use sitekit_core::ViewportLimits;

use crate::geometry::{Bounds, Point, Vector2};

/// Zoom and pan state of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    scale: f64,
    offset: Vector2,
    limits: ViewportLimits,
    canvas_size: (f64, f64),
}

impl Viewport {
    /// Creates a 1:1 viewport with no offset.
    pub fn new(limits: ViewportLimits) -> Self {
        Self {
            scale: 1.0,
            offset: Point::ORIGIN,
            limits,
            canvas_size: (1200.0, 800.0),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Vector2 {
        self.offset
    }

    pub fn limits(&self) -> &ViewportLimits {
        &self.limits
    }

    /// Replaces the limits and re-clamps the current scale.
    pub fn set_limits(&mut self, limits: ViewportLimits) {
        self.limits = limits;
        self.scale = self.clamp_scale(self.scale);
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        self.canvas_size
    }

    /// Sets the canvas dimensions (typically called when the window resizes).
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.canvas_size = (width, height);
        }
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        if !scale.is_finite() {
            return self.scale;
        }
        scale.clamp(self.limits.min_scale, self.limits.max_scale)
    }

    /// Sets the scale without moving the offset, clamped to the limits.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = self.clamp_scale(scale);
    }

    pub fn set_offset(&mut self, offset: Vector2) {
        if offset.is_finite() {
            self.offset = offset;
        }
    }

    /// Converts a screen point to world coordinates.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        (screen - self.offset) / self.scale
    }

    /// Converts a world point to screen coordinates.
    pub fn world_to_screen(&self, world: Point) -> Point {
        world * self.scale + self.offset
    }

    /// Converts a screen-space length to world space.
    pub fn screen_len_to_world(&self, len: f64) -> f64 {
        len / self.scale
    }

    /// Multiplies the scale by `factor`, keeping the world point under
    /// `screen` fixed on screen.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let anchor = self.screen_to_world(screen);
        self.scale = self.clamp_scale(self.scale * factor);
        self.offset = screen - anchor * self.scale;
    }

    /// Zoom step for one wheel notch. Positive `notches` zoom in.
    pub fn wheel_zoom(&mut self, screen: Point, notches: f64) {
        let step = if notches > 0.0 {
            self.limits.wheel_zoom_in
        } else {
            self.limits.wheel_zoom_out
        };
        self.zoom_at(screen, step.powf(notches.abs()));
    }

    fn canvas_center(&self) -> Point {
        Point::new(self.canvas_size.0 / 2.0, self.canvas_size.1 / 2.0)
    }

    /// Zooms in by the button step, anchored at the canvas center.
    pub fn zoom_in(&mut self) {
        self.zoom_at(self.canvas_center(), self.limits.button_zoom_in);
    }

    /// Zooms out by the button step, anchored at the canvas center.
    pub fn zoom_out(&mut self) {
        self.zoom_at(self.canvas_center(), self.limits.button_zoom_out);
    }

    /// Pans by a screen-space delta.
    pub fn pan_by(&mut self, delta: Vector2) {
        if delta.is_finite() {
            self.offset = self.offset + delta;
        }
    }

    /// Centers the canvas on a world point.
    pub fn center_on(&mut self, world: Point) {
        self.offset = self.canvas_center() - world * self.scale;
    }

    /// Fits `bounds` into the canvas, reserving `padding` (fraction of the
    /// canvas, per side) around it.
    pub fn fit_to_bounds(&mut self, bounds: Bounds, padding: f64) {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return;
        }

        let padding_factor = (1.0 - padding * 2.0).max(0.1);
        let (cw, ch) = self.canvas_size;
        let scale_x = cw * padding_factor / bounds.width();
        let scale_y = ch * padding_factor / bounds.height();

        self.scale = self.clamp_scale(scale_x.min(scale_y));
        self.center_on(bounds.center());
    }

    /// [`Viewport::fit_to_bounds`] with the default padding.
    pub fn fit_to_view(&mut self, bounds: Bounds) {
        self.fit_to_bounds(bounds, VIEW_PADDING);
    }

    /// World-space rectangle currently visible on the canvas.
    pub fn visible_world_bounds(&self) -> Bounds {
        let (cw, ch) = self.canvas_size;
        Bounds::from_corners(
            self.screen_to_world(Point::ORIGIN),
            self.screen_to_world(Point::new(cw, ch)),
        )
    }

    /// Resets to 1:1 with no offset.
    pub fn reset(&mut self) {
        self.scale = self.clamp_scale(1.0);
        self.offset = Point::ORIGIN;
    }

    /// Restores a saved scale and offset, clamped to the local limits.
    pub fn restore(&mut self, scale: f64, offset: Vector2) {
        self.scale = self.clamp_scale(scale);
        self.set_offset(offset);
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.0}% | Pan: ({:.1}, {:.1})",
            self.scale * 100.0,
            self.offset.x,
            self.offset.y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportLimits::default())
    }
}

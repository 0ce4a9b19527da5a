//! Engine tunables
//!
//! Plain serde structs with defaults. The settings crate persists them; the
//! layout engine reads them at construction.

use serde::{Deserialize, Serialize};

use crate::units::LengthUnit;

/// Zoom limits and zoom step factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportLimits {
    /// Smallest allowed scale
    pub min_scale: f64,
    /// Largest allowed scale
    pub max_scale: f64,
    /// Multiplier for one wheel notch towards the user
    pub wheel_zoom_in: f64,
    /// Multiplier for one wheel notch away from the user
    pub wheel_zoom_out: f64,
    /// Multiplier for the zoom-in button or shortcut
    pub button_zoom_in: f64,
    /// Multiplier for the zoom-out button or shortcut
    pub button_zoom_out: f64,
}

impl Default for ViewportLimits {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 5.0,
            wheel_zoom_in: 1.05,
            wheel_zoom_out: 0.95,
            button_zoom_in: 1.2,
            button_zoom_out: 1.0 / 1.2,
        }
    }
}

/// Pointer and keyboard behaviour.
///
/// Pixel values are screen pixels unless noted; the engine divides them by
/// the viewport scale before comparing against world geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionTuning {
    /// Rotations within this many degrees of a 45 degree multiple snap to it
    pub snap_tolerance_deg: f64,
    /// Degrees added per wheel notch when scroll-rotating
    pub scroll_rotate_step_deg: f64,
    /// Arrow-key nudge in world pixels
    pub nudge_px: f64,
    /// Arrow-key nudge with the fast modifier, in world pixels
    pub fast_nudge_px: f64,
    /// Pick radius of the rotation handle
    pub handle_radius_px: f64,
    /// Distance of the rotation handle beyond the shape's extent
    pub handle_offset_px: f64,
    /// Smallest width or height an instance may be resized to, in world pixels
    pub min_instance_size_px: f64,
    /// Offset applied to a paste without a drop point, in world pixels
    pub paste_offset_px: f64,
    /// Clicking this close to the first perimeter vertex closes the polygon
    pub perimeter_close_radius_px: f64,
    /// Pick radius of the calibration end points
    pub calibration_point_radius_px: f64,
    /// Pointer travel below this is treated as a click rather than a drag
    pub drag_threshold_px: f64,
}

impl Default for InteractionTuning {
    fn default() -> Self {
        Self {
            snap_tolerance_deg: 5.0,
            scroll_rotate_step_deg: 5.0,
            nudge_px: 1.0,
            fast_nudge_px: 10.0,
            handle_radius_px: 8.0,
            handle_offset_px: 20.0,
            min_instance_size_px: 10.0,
            paste_offset_px: 20.0,
            perimeter_close_radius_px: 10.0,
            calibration_point_radius_px: 8.0,
            drag_threshold_px: 2.0,
        }
    }
}

/// Grid and overlay display flags stored with the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Grid spacing in real-world units
    pub grid_spacing: f64,
    /// Grid line color as a CSS-style hex string
    pub grid_color: String,
    /// Grid line opacity in `[0, 1]`
    pub grid_opacity: f64,
    /// Draw the grid
    pub show_grid: bool,
    /// Draw instance name labels
    pub show_labels: bool,
    /// Draw clearance halos
    pub show_clearance: bool,
    /// Draw the active calibration line
    pub show_calibration_line: bool,
    /// Unit used for labels and measurement readouts
    pub unit: LengthUnit,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            grid_spacing: 1.0,
            grid_color: "#cccccc".to_string(),
            grid_opacity: 0.5,
            show_grid: true,
            show_labels: true,
            show_clearance: true,
            show_calibration_line: true,
            unit: LengthUnit::default(),
        }
    }
}

/// Everything the layout engine is configured with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineTuning {
    /// Zoom behaviour
    pub viewport: ViewportLimits,
    /// Pointer and keyboard behaviour
    pub interaction: InteractionTuning,
    /// Display flags for new scenes
    pub display: DisplaySettings,
    /// Maximum number of undo entries kept
    pub history_depth: usize,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            viewport: ViewportLimits::default(),
            interaction: InteractionTuning::default(),
            display: DisplaySettings::default(),
            history_depth: 100,
        }
    }
}

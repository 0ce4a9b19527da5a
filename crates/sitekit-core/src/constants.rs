//! Engine-wide constants.

/// Ratio used when no calibration line is active.
pub const DEFAULT_UNITS_PER_PIXEL: f64 = 1.0;

/// Grid lines closer than this on screen are skipped to avoid moire.
pub const MIN_GRID_SPACING_PX: f64 = 8.0;

/// Angular spacing of the rotation snap targets, in degrees.
pub const ROTATION_SNAP_STEP_DEG: f64 = 45.0;

/// Tolerance used when comparing floating-point geometry.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Per-edge padding fraction used by fit-to-content.
pub const VIEW_PADDING: f64 = 0.05;

/// Version written into scene snapshots.
pub const SNAPSHOT_VERSION: u32 = 1;

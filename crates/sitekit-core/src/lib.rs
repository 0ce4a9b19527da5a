//! # SiteKit Core
//!
//! Core types shared by the SiteKit crates: the error taxonomy, real-world
//! length units, display settings and the tunables that drive the layout
//! engine's viewport and interaction behaviour.

pub mod constants;
pub mod error;
pub mod tuning;
pub mod units;

pub use error::{CalibrationError, Error, ImageError, Result, SceneError, SnapshotError};
pub use tuning::{DisplaySettings, EngineTuning, InteractionTuning, ViewportLimits};
pub use units::{format_length, LengthUnit};

//! Error handling for SiteKit
//!
//! Provides the error types for the layers of the engine:
//! - Scene errors (instance and template bookkeeping)
//! - Calibration errors (rejected reference lines)
//! - Snapshot errors (corrupt or incompatible saved scenes)
//! - Image errors (background decode failures)
//!
//! Expected user-facing rejections such as a spacing conflict are not errors;
//! they are reported as typed outcomes by the layout engine. The types here
//! cover conditions that a caller has to handle explicitly.

use thiserror::Error;

/// Scene bookkeeping error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// No instance with the given id exists
    #[error("Unknown instance: {id}")]
    UnknownInstance {
        /// The id that was looked up.
        id: String,
    },

    /// The template catalog has no entry for the given id
    #[error("Unknown template: {id}")]
    UnknownTemplate {
        /// The template id that was looked up.
        id: String,
    },

    /// Instance geometry is degenerate or not finite
    #[error("Invalid geometry for {id}: {reason}")]
    InvalidGeometry {
        /// The offending instance id.
        id: String,
        /// What is wrong with the geometry.
        reason: String,
    },

    /// Two instances share an id
    #[error("Duplicate instance id: {id}")]
    DuplicateId {
        /// The repeated id.
        id: String,
    },
}

/// Calibration error type
///
/// Returned when a calibration line cannot be committed. None of these
/// mutate scene state.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CalibrationError {
    /// Start and end points coincide
    #[error("Calibration line has zero length")]
    ZeroLength,

    /// The entered real-world length is zero, negative or not finite
    #[error("Real-world distance must be positive, got {distance}")]
    NonPositiveDistance {
        /// The rejected distance.
        distance: f64,
    },

    /// Confirm was called without a candidate line
    #[error("No calibration line is awaiting a length")]
    NothingPending,
}

/// Snapshot error type
///
/// Raised when a saved scene cannot be restored. This is the one failure
/// that aborts the caller's operation.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Snapshot was written by an incompatible version
    #[error("Unsupported snapshot version {found} (expected {expected})")]
    VersionMismatch {
        /// Version found in the snapshot.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },

    /// Snapshot content is inconsistent
    #[error("Corrupt snapshot: {reason}")]
    Corrupt {
        /// Description of the inconsistency.
        reason: String,
    },

    /// An instance inside the snapshot is invalid
    #[error("Invalid scene data: {0}")]
    Scene(#[from] SceneError),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Background image error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// The bytes could not be decoded
    #[error("Failed to decode image: {reason}")]
    Decode {
        /// Decoder message.
        reason: String,
    },

    /// The decoded image has no pixels
    #[error("Image has zero size")]
    Empty,
}

/// Main error type for SiteKit
#[derive(Error, Debug)]
pub enum Error {
    /// Scene error
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Calibration error
    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    /// Snapshot error
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Image error
    #[error(transparent)]
    Image(#[from] ImageError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an error from a message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Result type alias for SiteKit operations
pub type Result<T> = std::result::Result<T, Error>;

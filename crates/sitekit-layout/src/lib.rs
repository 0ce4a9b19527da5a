//! # SiteKit Layout
//!
//! Interactive scene engine for laying out equipment over an aerial photo.
//! Users calibrate the photo's scale with a reference line, then place,
//! move, rotate and resize equipment while spacing rules are checked live.
//!
//! ## Core Components
//!
//! - **Viewport**: screen/world transform, anchor zoom and pan
//! - **Calibration**: two-click reference line and the pixel/unit ratio
//! - **Scene Model**: instances in z-order, selection, clipboard, overlays
//! - **Validator**: bounding-box spacing check for placements
//! - **Hit-Testing**: rotation-aware picking of bodies and handles
//! - **History**: closed set of undoable commands with bounded undo/redo
//! - **Interaction**: tool modes and pointer/keyboard gestures
//! - **Render Plan**: per-frame display list and redraw scheduling
//!
//! ## Architecture
//!
//! ```text
//! InteractionController
//!   ├── SceneEditor
//!   │     ├── SceneModel
//!   │     └── ActionLog
//!   ├── Viewport
//!   ├── TemplateCatalog
//!   └── ImageSlot / RenderScheduler
//! ```
//!
//! World coordinates are background-image pixels with `+y` down. Rotations
//! are degrees clockwise from up.

pub mod background;
pub mod calibration;
pub mod commands;
pub mod editor;
pub mod geometry;
pub mod history;
pub mod interaction;
pub mod model;
pub mod render;
pub mod scene;
pub mod serialization;
pub mod validator;
pub mod viewport;

pub use background::{BackgroundImage, ImageSlot, ImageState, LoadTicket};
pub use calibration::{CalibrationLine, CalibrationPoint, CalibrationSession, CalibrationStep};
pub use commands::{ActionKind, GeometryChange, PositionChange, SceneCommand};
pub use editor::{PlacementOutcome, SceneEditor};
pub use geometry::{
    normalize_degrees, rotation_from_pointer, snap_to_45, Bounds, LocalFrame, Point, Vector2,
};
pub use history::{ActionLog, UndoableAction};
pub use hit_test::{
    pick, pick_calibration_point, pick_instance, pick_rotation_handle, rotation_handle_position,
    CalibrationEnd, PickTarget,
};
pub use interaction::{
    Feedback, InteractionController, Key, KeyEvent, Modifiers, PointerButton, ToolMode,
};
pub use model::{
    Clearance, EquipmentInstance, EquipmentTemplate, InstanceGeometry, InstanceId,
    MeasurementLine, Perimeter, RealWorldSize, ShapeKind, TemplateCatalog, TemplateLibrary,
};
pub use render::{DrawCommand, Outline, Overlay, RenderPlan, RenderScheduler};
pub use scene::{SceneModel, Selection};
pub use serialization::{LoadMode, SceneData, SceneSnapshot, ViewportState};
pub use validator::{
    find_conflicts, validate_placement, Conflict, PlacementCandidate, PlacementRejection,
};
pub use viewport::Viewport;

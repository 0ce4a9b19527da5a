//! Interaction state machine.
//!
//! [`InteractionController`] owns the editor, viewport and template catalog
//! it drives. Pointer and keyboard events go in; each handler returns a
//! [`Feedback`] describing what happened, and redraws are coalesced through
//! the [`RenderScheduler`].
//!
//! Gestures are all-or-nothing: drags and rotations update the scene live
//! but only log an action on pointer-up, and cancelling restores the
//! pre-gesture geometry without logging.

mod keyboard;
mod pointer;

pub use keyboard::{Key, KeyEvent};

use std::fmt;

use tracing::debug;

use sitekit_core::{CalibrationError, ImageError, SnapshotError};

use crate::background::{BackgroundImage, ImageSlot, LoadTicket};
use crate::calibration::CalibrationSession;
use crate::editor::{PlacementOutcome, SceneEditor};
use crate::geometry::{Bounds, Point};
use crate::model::{InstanceId, TemplateCatalog, TemplateLibrary};
use crate::render::{build_plan, FrameInputs, Overlay, RenderPlan, RenderScheduler};
use crate::serialization::{LoadMode, SceneSnapshot};
use crate::viewport::Viewport;

/// Mutually exclusive tool modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    #[default]
    Select,
    Pan,
    Calibrate,
    PerimeterDraw,
    Ruler,
}

impl ToolMode {
    /// Modes during which dragging the canvas must not pan it.
    pub fn blocks_pan(&self) -> bool {
        matches!(self, ToolMode::Calibrate)
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ToolMode::Select => "Select",
            ToolMode::Pan => "Pan",
            ToolMode::Calibrate => "Calibrate",
            ToolMode::PerimeterDraw => "Perimeter",
            ToolMode::Ruler => "Ruler",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    /// Ctrl, or Cmd on macOS
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
    };

    /// Click toggles selection membership instead of replacing it.
    pub fn additive(&self) -> bool {
        self.shift || self.ctrl
    }

    /// Arrow keys use the large nudge step.
    pub fn fast(&self) -> bool {
        self.shift
    }
}

/// What an input event did.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    /// Nothing changed
    Ignored,
    /// View, selection or a gesture preview changed; nothing was logged
    Updated,
    /// The history changed: an action was committed, undone or redone
    Committed,
    /// Expected rejection, suitable for a transient message
    Rejected(String),
    /// The calibration line is drawn; the host should prompt for its length
    LengthRequested { pixel_distance: f64 },
}

impl Feedback {
    pub fn is_committed(&self) -> bool {
        matches!(self, Feedback::Committed)
    }

    fn needs_redraw(&self) -> bool {
        !matches!(self, Feedback::Ignored)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
enum Gesture {
    #[default]
    Idle,
    /// Pointer is down on an instance but has not moved past the threshold
    Pressed {
        id: InstanceId,
        press_screen: Point,
        press_world: Point,
        origins: Vec<(InstanceId, Point)>,
        reselect_on_click: bool,
    },
    Dragging {
        press_world: Point,
        origins: Vec<(InstanceId, Point)>,
    },
    Rotating {
        id: InstanceId,
        from: f64,
    },
    Marquee {
        press_screen: Point,
        start: Point,
        current: Point,
        additive: bool,
        active: bool,
    },
    Panning {
        last_screen: Point,
    },
}

/// Drives a [`SceneEditor`] and [`Viewport`] from pointer and keyboard input.
pub struct InteractionController<C: TemplateCatalog = TemplateLibrary> {
    editor: SceneEditor,
    viewport: Viewport,
    catalog: C,
    mode: ToolMode,
    gesture: Gesture,
    calibration: CalibrationSession,
    perimeter_draft: Vec<Point>,
    ruler_start: Option<Point>,
    pointer: Option<Point>,
    image_locked: bool,
    background: ImageSlot,
    scheduler: RenderScheduler,
}

impl<C: TemplateCatalog> InteractionController<C> {
    pub fn new(editor: SceneEditor, viewport: Viewport, catalog: C) -> Self {
        let mut scheduler = RenderScheduler::new();
        scheduler.request();
        Self {
            editor,
            viewport,
            catalog,
            mode: ToolMode::default(),
            gesture: Gesture::Idle,
            calibration: CalibrationSession::Idle,
            perimeter_draft: Vec::new(),
            ruler_start: None,
            pointer: None,
            image_locked: false,
            background: ImageSlot::new(),
            scheduler,
        }
    }

    pub fn editor(&self) -> &SceneEditor {
        &self.editor
    }

    /// Direct access for panels that edit properties. Request a redraw after
    /// mutating.
    pub fn editor_mut(&mut self) -> &mut SceneEditor {
        &mut self.editor
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn calibration_session(&self) -> &CalibrationSession {
        &self.calibration
    }

    /// True while a drag, rotation, marquee or pan is in progress.
    pub fn is_gesture_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Switches tool mode, discarding the previous mode's pending state and
    /// the selection.
    pub fn set_mode(&mut self, mode: ToolMode) {
        if mode == self.mode {
            return;
        }
        self.reset_tool_state();
        debug!(from = %self.mode, to = %mode, "tool mode changed");
        self.mode = mode;
    }

    fn reset_tool_state(&mut self) {
        self.cancel_gesture();
        self.calibration.cancel();
        self.perimeter_draft.clear();
        self.ruler_start = None;
        self.editor.deselect_all();
        self.scheduler.request();
    }

    pub fn is_image_locked(&self) -> bool {
        self.image_locked
    }

    /// While locked, canvas panning is disabled.
    pub fn set_image_locked(&mut self, locked: bool) {
        self.image_locked = locked;
    }

    fn pan_allowed(&self) -> bool {
        !self.image_locked && !self.mode.blocks_pan()
    }

    /// Handle radius and offset converted to world pixels.
    fn handle_metrics(&self) -> (f64, f64) {
        let tuning = self.editor.tuning();
        (
            self.viewport.screen_len_to_world(tuning.handle_offset_px),
            self.viewport.screen_len_to_world(tuning.handle_radius_px),
        )
    }

    /// Places a template dropped at a screen point.
    pub fn drop_template(&mut self, screen: Point, template_id: &str) -> PlacementOutcome {
        let world = self.viewport.screen_to_world(screen);
        let outcome = self
            .editor
            .place_from_catalog(&self.catalog, template_id, world);
        if outcome.is_placed() {
            self.scheduler.request();
        }
        outcome
    }

    /// Resolves the length prompt opened by the second calibration click.
    /// The candidate stays pending on error so the prompt can be retried.
    pub fn confirm_calibration(&mut self, real_world_distance: f64) -> Result<(), CalibrationError> {
        let line = self.calibration.confirm(real_world_distance).inspect_err(|err| {
            debug!(%err, "calibration length rejected");
        })?;
        self.editor.apply_calibration(line);
        self.scheduler.request();
        Ok(())
    }

    /// Discards the pending calibration line.
    pub fn cancel_calibration(&mut self) {
        if !self.calibration.is_idle() {
            self.calibration.cancel();
            self.scheduler.request();
        }
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let undone = self.editor.undo();
        if undone {
            self.scheduler.request();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let redone = self.editor.redo();
        if redone {
            self.scheduler.request();
        }
        redone
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.scheduler.request();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.scheduler.request();
    }

    /// Fits every instance, or the background image when the scene is empty.
    pub fn fit_to_content(&mut self) -> bool {
        let bounds = self.editor.scene().content_bounds().or_else(|| {
            self.background
                .image()
                .map(|img| Bounds::from_rect(0.0, 0.0, img.width() as f64, img.height() as f64))
        });
        match bounds {
            Some(bounds) => {
                self.viewport.fit_to_view(bounds);
                self.scheduler.request();
                true
            }
            None => false,
        }
    }

    /// Starts a background load; pass the ticket back on completion.
    pub fn begin_background_load(&mut self) -> LoadTicket {
        self.background.begin_load()
    }

    /// Stores a finished background load. Stale tickets are dropped.
    pub fn finish_background_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<BackgroundImage, ImageError>,
    ) -> bool {
        let stored = self.background.complete(ticket, result);
        if stored {
            self.scheduler.request();
        }
        stored
    }

    pub fn background(&self) -> &ImageSlot {
        &self.background
    }

    /// Marks the canvas dirty, e.g. after editing through [`Self::editor_mut`].
    pub fn request_redraw(&mut self) {
        self.scheduler.request();
    }

    /// Gesture state for the renderer.
    pub fn overlay(&self) -> Overlay {
        let marquee = match &self.gesture {
            Gesture::Marquee {
                start,
                current,
                active: true,
                ..
            } => Some(Bounds::from_corners(*start, *current)),
            _ => None,
        };
        Overlay {
            marquee,
            perimeter_draft: self.perimeter_draft.clone(),
            ruler_draft: self.ruler_start.zip(self.pointer),
            calibration: self.calibration.clone(),
            pointer: self.pointer,
        }
    }

    /// Builds the current display list.
    pub fn plan(&self) -> RenderPlan {
        let overlay = self.overlay();
        let (handle_offset, _) = self.handle_metrics();
        build_plan(&FrameInputs {
            scene: self.editor.scene(),
            viewport: &self.viewport,
            background: self.background.image(),
            overlay: &overlay,
            handle_offset,
        })
    }

    /// Called once per display tick. Returns a plan only when something
    /// changed since the last frame.
    pub fn render_frame(&mut self) -> Option<RenderPlan> {
        if self.scheduler.take_frame() {
            Some(self.plan())
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::capture(&self.editor, &self.viewport)
    }

    /// Loads a snapshot. Replace also restores the saved viewport and drops
    /// any pending tool state.
    pub fn load_snapshot(
        &mut self,
        snapshot: &SceneSnapshot,
        mode: LoadMode,
    ) -> Result<(), SnapshotError> {
        self.cancel_gesture();
        self.editor.restore(snapshot, mode)?;
        if mode == LoadMode::Replace {
            let saved = snapshot.viewport;
            self.viewport
                .restore(saved.scale, Point::new(saved.offset_x, saved.offset_y));
            self.reset_tool_state();
        }
        self.scheduler.request();
        Ok(())
    }

    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    fn finish(&mut self, feedback: Feedback) -> Feedback {
        if feedback.needs_redraw() {
            self.scheduler.request();
        }
        feedback
    }
}

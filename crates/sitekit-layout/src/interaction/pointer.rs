//! Pointer and wheel handling.

use tracing::{debug, trace};

use super::{Feedback, Gesture, InteractionController, Modifiers, PointerButton, ToolMode};
use crate::calibration::CalibrationStep;
use crate::commands::PositionChange;
use crate::geometry::{rotation_from_pointer, snap_to_45, Bounds, Point};
use crate::hit_test::{pick, pick_calibration_point, CalibrationEnd, PickTarget};
use crate::model::{InstanceId, Perimeter, TemplateCatalog};

impl<C: TemplateCatalog> InteractionController<C> {
    pub fn pointer_down(
        &mut self,
        screen: Point,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> Feedback {
        let world = self.viewport.screen_to_world(screen);
        self.pointer = Some(world);
        if self.gesture != Gesture::Idle {
            return Feedback::Ignored;
        }

        let feedback = match (button, self.mode) {
            (PointerButton::Secondary, _) => Feedback::Ignored,
            (PointerButton::Middle, _) | (PointerButton::Primary, ToolMode::Pan) => {
                if self.pan_allowed() {
                    self.gesture = Gesture::Panning {
                        last_screen: screen,
                    };
                    Feedback::Updated
                } else {
                    trace!(mode = %self.mode, "pan blocked");
                    Feedback::Ignored
                }
            }
            (PointerButton::Primary, ToolMode::Calibrate) => self.calibration_click(world),
            (PointerButton::Primary, ToolMode::PerimeterDraw) => self.perimeter_click(world),
            (PointerButton::Primary, ToolMode::Ruler) => self.ruler_click(world),
            (PointerButton::Primary, ToolMode::Select) => {
                self.select_press(screen, world, modifiers)
            }
        };
        self.finish(feedback)
    }

    pub fn pointer_move(&mut self, screen: Point) -> Feedback {
        let world = self.viewport.screen_to_world(screen);
        self.pointer = Some(world);
        let threshold = self.editor.tuning().drag_threshold_px;

        let feedback = match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {
                let previewing = (self.mode == ToolMode::Calibrate && !self.calibration.is_idle())
                    || !self.perimeter_draft.is_empty()
                    || self.ruler_start.is_some();
                if previewing {
                    Feedback::Updated
                } else {
                    Feedback::Ignored
                }
            }
            Gesture::Pressed {
                id,
                press_screen,
                press_world,
                origins,
                reselect_on_click,
            } => {
                if screen.distance_to(&press_screen) < threshold {
                    self.gesture = Gesture::Pressed {
                        id,
                        press_screen,
                        press_world,
                        origins,
                        reselect_on_click,
                    };
                    Feedback::Ignored
                } else {
                    self.drag_to(world, press_world, &origins);
                    self.gesture = Gesture::Dragging {
                        press_world,
                        origins,
                    };
                    Feedback::Updated
                }
            }
            Gesture::Dragging {
                press_world,
                origins,
            } => {
                self.drag_to(world, press_world, &origins);
                self.gesture = Gesture::Dragging {
                    press_world,
                    origins,
                };
                Feedback::Updated
            }
            Gesture::Rotating { id, from } => {
                if let Some(center) = self.editor.scene().instance(&id).map(|i| i.center()) {
                    let tolerance = self.editor.tuning().snap_tolerance_deg;
                    let angle = snap_to_45(rotation_from_pointer(center, world), tolerance);
                    self.editor.set_rotation_live(&id, angle);
                }
                self.gesture = Gesture::Rotating { id, from };
                Feedback::Updated
            }
            Gesture::Marquee {
                press_screen,
                start,
                additive,
                active,
                ..
            } => {
                let active = active || screen.distance_to(&press_screen) >= threshold;
                self.gesture = Gesture::Marquee {
                    press_screen,
                    start,
                    current: world,
                    additive,
                    active,
                };
                if active {
                    Feedback::Updated
                } else {
                    Feedback::Ignored
                }
            }
            Gesture::Panning { last_screen } => {
                self.viewport.pan_by(screen - last_screen);
                self.gesture = Gesture::Panning {
                    last_screen: screen,
                };
                Feedback::Updated
            }
        };
        self.finish(feedback)
    }

    pub fn pointer_up(&mut self, screen: Point) -> Feedback {
        let world = self.viewport.screen_to_world(screen);
        self.pointer = Some(world);

        let feedback = match std::mem::take(&mut self.gesture) {
            Gesture::Idle => Feedback::Ignored,
            Gesture::Pressed {
                id,
                reselect_on_click,
                ..
            } => {
                // A click on an already-selected instance narrows the selection to it.
                if reselect_on_click && self.editor.scene().selection().len() > 1 {
                    self.editor.select_only(&id);
                    Feedback::Updated
                } else {
                    Feedback::Ignored
                }
            }
            Gesture::Dragging { origins, .. } => {
                let changes: Vec<PositionChange> = origins
                    .into_iter()
                    .filter_map(|(id, from)| {
                        let to = self.editor.scene().instance(&id)?.position();
                        Some(PositionChange { id, from, to })
                    })
                    .collect();
                if self.editor.commit_move(changes) {
                    Feedback::Committed
                } else {
                    Feedback::Updated
                }
            }
            Gesture::Rotating { id, from } => {
                if self.editor.commit_rotation(&id, from) {
                    Feedback::Committed
                } else {
                    Feedback::Updated
                }
            }
            Gesture::Marquee {
                start,
                current,
                additive,
                active,
                ..
            } => {
                if active {
                    self.finish_marquee(Bounds::from_corners(start, current), additive);
                    Feedback::Updated
                } else if !self.editor.scene().selection().is_empty() {
                    self.editor.deselect_all();
                    Feedback::Updated
                } else {
                    Feedback::Ignored
                }
            }
            Gesture::Panning { .. } => Feedback::Updated,
        };
        self.finish(feedback)
    }

    /// One wheel event. Positive `notches` scroll away from the user: zoom in,
    /// or rotate clockwise.
    ///
    /// With a selection outside Pan mode the wheel rotates the anchor
    /// instance; holding the shortcut modifier always zooms.
    pub fn wheel(&mut self, screen: Point, notches: f64, modifiers: Modifiers) -> Feedback {
        if notches == 0.0 || !notches.is_finite() || self.gesture != Gesture::Idle {
            return Feedback::Ignored;
        }

        let anchor = self.editor.scene().selection().first().cloned();
        let feedback = match anchor {
            Some(id) if self.mode != ToolMode::Pan && !modifiers.ctrl => {
                self.scroll_rotate(&id, notches)
            }
            _ => {
                self.viewport.wheel_zoom(screen, notches);
                Feedback::Updated
            }
        };
        self.finish(feedback)
    }

    /// Restores the pre-gesture state. Returns `true` if a gesture was active.
    pub fn cancel_gesture(&mut self) -> bool {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => false,
            Gesture::Dragging { origins, .. } => {
                self.editor.set_positions_live(&origins);
                debug!("drag cancelled");
                self.scheduler.request();
                true
            }
            Gesture::Rotating { id, from } => {
                self.editor.set_rotation_live(&id, from);
                debug!("rotation cancelled");
                self.scheduler.request();
                true
            }
            Gesture::Pressed { .. } | Gesture::Marquee { .. } | Gesture::Panning { .. } => {
                self.scheduler.request();
                true
            }
        }
    }

    fn select_press(&mut self, screen: Point, world: Point, modifiers: Modifiers) -> Feedback {
        let (handle_offset, handle_radius) = self.handle_metrics();
        match pick(self.editor.scene(), world, handle_offset, handle_radius) {
            PickTarget::RotationHandle(id) => {
                let from = self
                    .editor
                    .scene()
                    .instance(&id)
                    .map(|i| i.rotation)
                    .unwrap_or_default();
                self.gesture = Gesture::Rotating { id, from };
                Feedback::Updated
            }
            PickTarget::Instance(id) => {
                let already_selected = self.editor.scene().selection().contains(&id);
                if modifiers.additive() {
                    self.editor.toggle_selection(&id);
                    if already_selected {
                        return Feedback::Updated;
                    }
                } else if !already_selected {
                    self.editor.select_only(&id);
                }
                self.gesture = Gesture::Pressed {
                    origins: self.selection_origins(),
                    id,
                    press_screen: screen,
                    press_world: world,
                    reselect_on_click: already_selected && !modifiers.additive(),
                };
                Feedback::Updated
            }
            PickTarget::Empty => {
                self.gesture = Gesture::Marquee {
                    press_screen: screen,
                    start: world,
                    current: world,
                    additive: modifiers.additive(),
                    active: false,
                };
                Feedback::Ignored
            }
        }
    }

    /// Selection positions, anchor first.
    fn selection_origins(&self) -> Vec<(InstanceId, Point)> {
        let scene = self.editor.scene();
        scene
            .selection()
            .iter()
            .filter_map(|id| scene.instance(id).map(|i| (id.clone(), i.position())))
            .collect()
    }

    /// Moves every dragged instance by the pointer's travel since the press,
    /// measured from the pre-drag positions so the group cannot drift.
    fn drag_to(&mut self, world: Point, press_world: Point, origins: &[(InstanceId, Point)]) {
        let delta = world - press_world;
        let positions: Vec<(InstanceId, Point)> = origins
            .iter()
            .map(|(id, origin)| (id.clone(), *origin + delta))
            .collect();
        self.editor.set_positions_live(&positions);
    }

    fn finish_marquee(&mut self, rect: Bounds, additive: bool) {
        let hits: Vec<InstanceId> = self
            .editor
            .scene()
            .instances()
            .iter()
            .filter(|i| i.visible && i.bounds().intersects(&rect))
            .map(|i| i.id.clone())
            .collect();
        if additive {
            let mut ids = self.editor.scene().selection().to_vec();
            ids.extend(hits);
            self.editor.set_selection(ids);
        } else {
            self.editor.set_selection(hits);
        }
    }

    fn scroll_rotate(&mut self, id: &InstanceId, notches: f64) -> Feedback {
        let Some(current) = self.editor.scene().instance(id).map(|i| i.rotation) else {
            return Feedback::Ignored;
        };
        let tuning = self.editor.tuning();
        let target = snap_to_45(
            current + notches * tuning.scroll_rotate_step_deg,
            tuning.snap_tolerance_deg,
        );
        if self.editor.rotate(id, target) {
            Feedback::Committed
        } else {
            Feedback::Ignored
        }
    }

    fn calibration_click(&mut self, world: Point) -> Feedback {
        // Grabbing an end of the active line re-measures it from the other end.
        if self.calibration.is_idle() {
            let radius = self
                .viewport
                .screen_len_to_world(self.editor.tuning().calibration_point_radius_px);
            let anchor = self.editor.scene().calibration().and_then(|line| {
                pick_calibration_point(line, world, radius).map(|end| match end {
                    CalibrationEnd::Start => line.end_point.position(),
                    CalibrationEnd::End => line.start_point.position(),
                })
            });
            if let Some(anchor) = anchor {
                self.calibration.begin(anchor);
                return Feedback::Updated;
            }
        }

        match self.calibration.click(world) {
            Ok(CalibrationStep::Started) => Feedback::Updated,
            Ok(CalibrationStep::LengthRequested { pixel_distance }) => {
                Feedback::LengthRequested { pixel_distance }
            }
            Ok(CalibrationStep::Ignored) => Feedback::Ignored,
            Err(err) => {
                debug!(%err, "calibration click rejected");
                Feedback::Rejected(err.to_string())
            }
        }
    }

    fn perimeter_click(&mut self, world: Point) -> Feedback {
        let close_radius = self
            .viewport
            .screen_len_to_world(self.editor.tuning().perimeter_close_radius_px);
        let closes = self.perimeter_draft.len() >= 3
            && self.perimeter_draft[0].distance_to(&world) <= close_radius;
        if closes {
            return self.commit_perimeter_draft();
        }
        self.perimeter_draft.push(world);
        Feedback::Updated
    }

    /// Commits the in-progress perimeter polygon.
    pub fn commit_perimeter_draft(&mut self) -> Feedback {
        if self.perimeter_draft.is_empty() {
            return Feedback::Ignored;
        }
        let draft = std::mem::take(&mut self.perimeter_draft);
        let feedback = match Perimeter::new(draft) {
            Some(perimeter) => {
                if self.editor.set_perimeter(perimeter) {
                    Feedback::Committed
                } else {
                    Feedback::Updated
                }
            }
            None => Feedback::Rejected("A perimeter needs at least three points".to_string()),
        };
        self.finish(feedback)
    }

    fn ruler_click(&mut self, world: Point) -> Feedback {
        match self.ruler_start.take() {
            None => {
                self.ruler_start = Some(world);
                Feedback::Updated
            }
            Some(start) => match self.editor.add_measurement(start, world) {
                Some(_) => Feedback::Committed,
                None => {
                    self.ruler_start = Some(start);
                    Feedback::Ignored
                }
            },
        }
    }
}

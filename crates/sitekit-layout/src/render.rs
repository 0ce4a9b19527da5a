//! Render plan
//!
//! The engine does not rasterize. Each frame it produces a display list of
//! screen-space [`DrawCommand`]s in paint order:
//!
//! 1. background image
//! 2. calibration line (when enabled)
//! 3. in-progress calibration marker
//! 4. instances: clearance halo, body, label, rotation handle when selected
//! 5. perimeter and ruler lines
//! 6. grid
//! 7. gesture overlays (marquee, drafts)
//!
//! Building a plan only reads state.

use sitekit_core::constants::MIN_GRID_SPACING_PX;
use sitekit_core::format_length;

use crate::background::BackgroundImage;
use crate::calibration::CalibrationSession;
use crate::geometry::{Bounds, Point};
use crate::hit_test::rotation_handle_position;
use crate::model::{Clearance, EquipmentInstance, InstanceId, ShapeKind};
use crate::scene::SceneModel;
use crate::viewport::Viewport;

/// Gesture state the renderer needs but the scene does not hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub marquee: Option<Bounds>,
    pub perimeter_draft: Vec<Point>,
    pub ruler_draft: Option<(Point, Point)>,
    pub calibration: CalibrationSession,
    /// Pointer position in world space, for rubber-band previews
    pub pointer: Option<Point>,
}

/// Outline of a body or halo in screen space.
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    /// Corners clockwise from the local top-left
    Polygon([Point; 4]),
    Circle { center: Point, radius: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BackgroundImage {
        origin: Point,
        width: f64,
        height: f64,
    },
    CalibrationLine {
        start: Point,
        end: Point,
        label: String,
    },
    CalibrationMarker {
        at: Point,
        /// Second point while the length prompt is open
        end: Option<Point>,
    },
    ClearanceHalo {
        id: InstanceId,
        outline: Outline,
    },
    InstanceBody {
        id: InstanceId,
        outline: Outline,
        color: String,
        selected: bool,
    },
    Label {
        id: InstanceId,
        at: Point,
        text: String,
    },
    RotationHandle {
        id: InstanceId,
        stem_from: Point,
        at: Point,
        readout: String,
    },
    Perimeter {
        points: Vec<Point>,
        closed: bool,
    },
    Measurement {
        start: Point,
        end: Point,
        label: String,
    },
    Grid {
        vertical: Vec<f64>,
        horizontal: Vec<f64>,
        color: String,
        opacity: f64,
    },
    Marquee {
        rect: Bounds,
    },
}

pub type RenderPlan = Vec<DrawCommand>;

/// Inputs for one frame.
#[derive(Clone, Copy)]
pub struct FrameInputs<'a> {
    pub scene: &'a SceneModel,
    pub viewport: &'a Viewport,
    pub background: Option<&'a BackgroundImage>,
    pub overlay: &'a Overlay,
    /// Rotation handle distance beyond the shape, world pixels
    pub handle_offset: f64,
}

pub fn build_plan(frame: &FrameInputs<'_>) -> RenderPlan {
    let FrameInputs {
        scene,
        viewport,
        background,
        overlay,
        handle_offset,
    } = *frame;
    let to_screen = |p: Point| viewport.world_to_screen(p);
    let scale = viewport.scale();
    let display = &scene.display;
    let ratio = scene.units_per_pixel();
    let mut plan = RenderPlan::new();

    if let Some(image) = background {
        plan.push(DrawCommand::BackgroundImage {
            origin: to_screen(Point::ORIGIN),
            width: image.width() as f64 * scale,
            height: image.height() as f64 * scale,
        });
    }

    if display.show_calibration_line {
        if let Some(line) = scene.calibration() {
            plan.push(DrawCommand::CalibrationLine {
                start: to_screen(line.start_point.position()),
                end: to_screen(line.end_point.position()),
                label: format_length(line.real_world_distance, display.unit),
            });
        }
    }

    if let Some(start) = overlay.calibration.start_point() {
        let end = overlay
            .calibration
            .end_point()
            .map(|p| p.position())
            .or(overlay.pointer);
        plan.push(DrawCommand::CalibrationMarker {
            at: to_screen(start.position()),
            end: end.map(to_screen),
        });
    }

    for instance in scene.instances().iter().filter(|i| i.visible) {
        let selected = scene.selection().contains(&instance.id);

        if display.show_clearance && !instance.clearance.is_zero() {
            plan.push(DrawCommand::ClearanceHalo {
                id: instance.id.clone(),
                outline: halo_outline(instance, ratio, viewport),
            });
        }

        plan.push(DrawCommand::InstanceBody {
            id: instance.id.clone(),
            outline: body_outline(instance, viewport),
            color: instance.color.clone(),
            selected,
        });

        if display.show_labels && !instance.name.is_empty() {
            plan.push(DrawCommand::Label {
                id: instance.id.clone(),
                at: to_screen(instance.center()),
                text: instance.name.clone(),
            });
        }

        if selected {
            let stem = instance
                .frame()
                .to_world(Point::new(0.0, -instance.extent()));
            plan.push(DrawCommand::RotationHandle {
                id: instance.id.clone(),
                stem_from: to_screen(stem),
                at: to_screen(rotation_handle_position(instance, handle_offset)),
                readout: format!("{:.0}°", instance.rotation),
            });
        }
    }

    if let Some(perimeter) = scene.perimeter() {
        plan.push(DrawCommand::Perimeter {
            points: perimeter.vertices.iter().map(|p| to_screen(*p)).collect(),
            closed: true,
        });
    }
    for line in scene.measurements() {
        plan.push(DrawCommand::Measurement {
            start: to_screen(line.start),
            end: to_screen(line.end),
            label: line.label(ratio, display.unit),
        });
    }

    if display.show_grid {
        if let Some(grid) = grid_lines(display.grid_spacing * ratio, viewport) {
            plan.push(DrawCommand::Grid {
                vertical: grid.0,
                horizontal: grid.1,
                color: display.grid_color.clone(),
                opacity: display.grid_opacity,
            });
        }
    }

    if !overlay.perimeter_draft.is_empty() {
        let mut points: Vec<Point> = overlay
            .perimeter_draft
            .iter()
            .map(|p| to_screen(*p))
            .collect();
        if let Some(pointer) = overlay.pointer {
            points.push(to_screen(pointer));
        }
        plan.push(DrawCommand::Perimeter {
            points,
            closed: false,
        });
    }
    if let Some((start, end)) = overlay.ruler_draft {
        plan.push(DrawCommand::Measurement {
            start: to_screen(start),
            end: to_screen(end),
            label: format_length(start.distance_to(&end) / ratio, display.unit),
        });
    }
    if let Some(rect) = overlay.marquee {
        plan.push(DrawCommand::Marquee {
            rect: Bounds::from_corners(
                to_screen(Point::new(rect.min_x, rect.min_y)),
                to_screen(Point::new(rect.max_x, rect.max_y)),
            ),
        });
    }

    plan
}

fn body_outline(instance: &EquipmentInstance, viewport: &Viewport) -> Outline {
    let frame = instance.frame();
    match instance.shape {
        ShapeKind::Rectangle => {
            let (hw, hh) = (instance.width / 2.0, instance.height / 2.0);
            Outline::Polygon(
                frame
                    .rect_corners(-hw, -hh, hw, hh)
                    .map(|p| viewport.world_to_screen(p)),
            )
        }
        ShapeKind::Circle => Outline::Circle {
            center: viewport.world_to_screen(frame.center()),
            radius: instance.width.min(instance.height) / 2.0 * viewport.scale(),
        },
    }
}

fn halo_outline(instance: &EquipmentInstance, ratio: f64, viewport: &Viewport) -> Outline {
    let frame = instance.frame();
    let (hw, hh) = (instance.width / 2.0, instance.height / 2.0);
    match instance.clearance {
        Clearance::Sides { .. } => {
            let [left, right, top, bottom] = instance.clearance_px(ratio);
            Outline::Polygon(
                frame
                    .rect_corners(-hw - left, -hh - top, hw + right, hh + bottom)
                    .map(|p| viewport.world_to_screen(p)),
            )
        }
        Clearance::Radius { radius } => Outline::Circle {
            center: viewport.world_to_screen(frame.center()),
            radius: (hw.min(hh) + radius * ratio) * viewport.scale(),
        },
    }
}

/// Screen-space grid line positions, or `None` when lines would be closer
/// than the minimum spacing.
fn grid_lines(spacing_world: f64, viewport: &Viewport) -> Option<(Vec<f64>, Vec<f64>)> {
    let spacing = spacing_world * viewport.scale();
    if !(spacing.is_finite() && spacing >= MIN_GRID_SPACING_PX) {
        return None;
    }
    let (width, height) = viewport.canvas_size();
    let offset = viewport.offset();
    let lines = |start: f64, extent: f64| {
        let mut positions = Vec::new();
        let mut at = start.rem_euclid(spacing);
        while at <= extent {
            positions.push(at);
            at += spacing;
        }
        positions
    };
    Some((lines(offset.x, width), lines(offset.y, height)))
}

/// Coalesces redraw requests into at most one frame per tick.
#[derive(Debug, Clone, Default)]
pub struct RenderScheduler {
    dirty: bool,
    frames: u64,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the scene as needing a repaint.
    pub fn request(&mut self) {
        self.dirty = true;
    }

    pub fn is_pending(&self) -> bool {
        self.dirty
    }

    /// Called once per display tick. Returns `true` if a frame should be
    /// painted, clearing the request.
    pub fn take_frame(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        self.frames += 1;
        true
    }

    /// Frames painted so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

//! Undoable scene mutations.
//!
//! Every committed change to the scene is one [`SceneCommand`] variant
//! carrying enough data to redo and undo it without looking anything up.
//! Commands apply to a [`SceneModel`] directly; they never touch history.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calibration::CalibrationLine;
use crate::geometry::Point;
use crate::model::{EquipmentInstance, InstanceGeometry, InstanceId, MeasurementLine, Perimeter};
use crate::scene::SceneModel;

/// Position change of one instance during a move.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionChange {
    pub id: InstanceId,
    pub from: Point,
    pub to: Point,
}

/// Geometry change of one instance during a resize or rescale.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryChange {
    pub id: InstanceId,
    pub before: InstanceGeometry,
    pub after: InstanceGeometry,
}

/// Discriminant of [`SceneCommand`], used for introspection and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Place,
    Remove,
    Paste,
    Move,
    Rotate,
    Resize,
    SetVisibility,
    Update,
    Reorder,
    Calibrate,
    SetPerimeter,
    AddMeasurement,
    RemoveMeasurements,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionKind::Place => "place",
            ActionKind::Remove => "remove",
            ActionKind::Paste => "paste",
            ActionKind::Move => "move",
            ActionKind::Rotate => "rotate",
            ActionKind::Resize => "resize",
            ActionKind::SetVisibility => "set_visibility",
            ActionKind::Update => "update",
            ActionKind::Reorder => "reorder",
            ActionKind::Calibrate => "calibrate",
            ActionKind::SetPerimeter => "set_perimeter",
            ActionKind::AddMeasurement => "add_measurement",
            ActionKind::RemoveMeasurements => "remove_measurements",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// Insert one instance at a z-index
    PlaceInstance {
        index: usize,
        instance: EquipmentInstance,
    },
    /// Remove instances; entries are `(index, record)` in ascending index order
    RemoveInstances {
        removed: Vec<(usize, EquipmentInstance)>,
    },
    /// Append cloned instances on top of the stack
    PasteInstances { instances: Vec<EquipmentInstance> },
    MoveInstances { changes: Vec<PositionChange> },
    RotateInstance { id: InstanceId, from: f64, to: f64 },
    ResizeInstance(GeometryChange),
    SetVisibility {
        id: InstanceId,
        from: bool,
        to: bool,
    },
    /// Full-record swap for property edits
    UpdateInstance {
        before: EquipmentInstance,
        after: EquipmentInstance,
    },
    Reorder {
        id: InstanceId,
        from_index: usize,
        to_index: usize,
    },
    /// Replace the calibration and rescale every instance as one step
    Calibrate {
        before: Option<CalibrationLine>,
        after: Option<CalibrationLine>,
        rescaled: Vec<GeometryChange>,
    },
    SetPerimeter {
        before: Option<Perimeter>,
        after: Option<Perimeter>,
    },
    AddMeasurement { line: MeasurementLine },
    /// Entries are `(index, line)` in ascending index order
    RemoveMeasurements {
        removed: Vec<(usize, MeasurementLine)>,
    },
}

impl SceneCommand {
    pub fn kind(&self) -> ActionKind {
        match self {
            SceneCommand::PlaceInstance { .. } => ActionKind::Place,
            SceneCommand::RemoveInstances { .. } => ActionKind::Remove,
            SceneCommand::PasteInstances { .. } => ActionKind::Paste,
            SceneCommand::MoveInstances { .. } => ActionKind::Move,
            SceneCommand::RotateInstance { .. } => ActionKind::Rotate,
            SceneCommand::ResizeInstance(_) => ActionKind::Resize,
            SceneCommand::SetVisibility { .. } => ActionKind::SetVisibility,
            SceneCommand::UpdateInstance { .. } => ActionKind::Update,
            SceneCommand::Reorder { .. } => ActionKind::Reorder,
            SceneCommand::Calibrate { .. } => ActionKind::Calibrate,
            SceneCommand::SetPerimeter { .. } => ActionKind::SetPerimeter,
            SceneCommand::AddMeasurement { .. } => ActionKind::AddMeasurement,
            SceneCommand::RemoveMeasurements { .. } => ActionKind::RemoveMeasurements,
        }
    }

    /// Human-readable description for menus and logs.
    pub fn description(&self) -> String {
        match self {
            SceneCommand::PlaceInstance { instance, .. } => format!("Place {}", instance.name),
            SceneCommand::RemoveInstances { removed } => match removed.as_slice() {
                [(_, only)] => format!("Delete {}", only.name),
                _ => format!("Delete {} items", removed.len()),
            },
            SceneCommand::PasteInstances { instances } => match instances.as_slice() {
                [only] => format!("Paste {}", only.name),
                _ => format!("Paste {} items", instances.len()),
            },
            SceneCommand::MoveInstances { changes } => match changes.len() {
                1 => "Move item".to_string(),
                n => format!("Move {} items", n),
            },
            SceneCommand::RotateInstance { to, .. } => format!("Rotate to {:.0}°", to),
            SceneCommand::ResizeInstance(_) => "Resize item".to_string(),
            SceneCommand::SetVisibility { to, .. } => {
                if *to {
                    "Show item".to_string()
                } else {
                    "Hide item".to_string()
                }
            }
            SceneCommand::UpdateInstance { after, .. } => format!("Edit {}", after.name),
            SceneCommand::Reorder { .. } => "Bring to front".to_string(),
            SceneCommand::Calibrate { after, .. } => match after {
                Some(line) => format!(
                    "Calibrate ({:.1} px = {} units)",
                    line.pixel_distance, line.real_world_distance
                ),
                None => "Clear calibration".to_string(),
            },
            SceneCommand::SetPerimeter { after, .. } => match after {
                Some(_) => "Set perimeter".to_string(),
                None => "Clear perimeter".to_string(),
            },
            SceneCommand::AddMeasurement { .. } => "Add measurement".to_string(),
            SceneCommand::RemoveMeasurements { removed } => match removed.len() {
                1 => "Remove measurement".to_string(),
                n => format!("Remove {} measurements", n),
            },
        }
    }

    /// Applies the command (do or redo).
    pub fn apply(&self, scene: &mut SceneModel) {
        match self {
            SceneCommand::PlaceInstance { index, instance } => {
                scene.insert_instance(*index, instance.clone());
            }
            SceneCommand::RemoveInstances { removed } => {
                for (_, instance) in removed {
                    scene.remove_instance(&instance.id);
                }
            }
            SceneCommand::PasteInstances { instances } => {
                for instance in instances {
                    scene.push_instance(instance.clone());
                }
            }
            SceneCommand::MoveInstances { changes } => {
                for change in changes {
                    if let Some(instance) = scene.instance_mut(&change.id) {
                        instance.set_position(change.to);
                    }
                }
            }
            SceneCommand::RotateInstance { id, to, .. } => {
                if let Some(instance) = scene.instance_mut(id) {
                    instance.set_rotation(*to);
                }
            }
            SceneCommand::ResizeInstance(change) => {
                if let Some(instance) = scene.instance_mut(&change.id) {
                    instance.set_geometry(&change.after);
                }
            }
            SceneCommand::SetVisibility { id, to, .. } => {
                if let Some(instance) = scene.instance_mut(id) {
                    instance.visible = *to;
                }
            }
            SceneCommand::UpdateInstance { after, .. } => {
                if let Some(instance) = scene.instance_mut(&after.id) {
                    *instance = after.clone();
                }
            }
            SceneCommand::Reorder { id, to_index, .. } => {
                scene.move_in_stack(id, *to_index);
            }
            SceneCommand::Calibrate {
                after, rescaled, ..
            } => {
                scene.calibration = after.clone();
                for change in rescaled {
                    if let Some(instance) = scene.instance_mut(&change.id) {
                        instance.set_geometry(&change.after);
                    }
                }
            }
            SceneCommand::SetPerimeter { after, .. } => {
                scene.perimeter = after.clone();
            }
            SceneCommand::AddMeasurement { line } => {
                scene.measurements.push(line.clone());
            }
            SceneCommand::RemoveMeasurements { removed } => {
                scene
                    .measurements
                    .retain(|m| !removed.iter().any(|(_, r)| r.id == m.id));
            }
        }
    }

    /// Reverts the command (undo).
    pub fn revert(&self, scene: &mut SceneModel) {
        match self {
            SceneCommand::PlaceInstance { instance, .. } => {
                scene.remove_instance(&instance.id);
            }
            SceneCommand::RemoveInstances { removed } => {
                for (index, instance) in removed {
                    scene.insert_instance(*index, instance.clone());
                }
            }
            SceneCommand::PasteInstances { instances } => {
                for instance in instances {
                    scene.remove_instance(&instance.id);
                }
            }
            SceneCommand::MoveInstances { changes } => {
                for change in changes {
                    if let Some(instance) = scene.instance_mut(&change.id) {
                        instance.set_position(change.from);
                    }
                }
            }
            SceneCommand::RotateInstance { id, from, .. } => {
                if let Some(instance) = scene.instance_mut(id) {
                    instance.set_rotation(*from);
                }
            }
            SceneCommand::ResizeInstance(change) => {
                if let Some(instance) = scene.instance_mut(&change.id) {
                    instance.set_geometry(&change.before);
                }
            }
            SceneCommand::SetVisibility { id, from, .. } => {
                if let Some(instance) = scene.instance_mut(id) {
                    instance.visible = *from;
                }
            }
            SceneCommand::UpdateInstance { before, .. } => {
                if let Some(instance) = scene.instance_mut(&before.id) {
                    *instance = before.clone();
                }
            }
            SceneCommand::Reorder { id, from_index, .. } => {
                scene.move_in_stack(id, *from_index);
            }
            SceneCommand::Calibrate {
                before, rescaled, ..
            } => {
                scene.calibration = before.clone();
                for change in rescaled {
                    if let Some(instance) = scene.instance_mut(&change.id) {
                        instance.set_geometry(&change.before);
                    }
                }
            }
            SceneCommand::SetPerimeter { before, .. } => {
                scene.perimeter = before.clone();
            }
            SceneCommand::AddMeasurement { line } => {
                scene.measurements.retain(|m| m.id != line.id);
            }
            SceneCommand::RemoveMeasurements { removed } => {
                for (index, line) in removed {
                    let index = (*index).min(scene.measurements.len());
                    scene.measurements.insert(index, line.clone());
                }
            }
        }
    }
}

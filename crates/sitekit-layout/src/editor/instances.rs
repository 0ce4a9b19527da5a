//! Instance operations (place, move, rotate, resize, delete, copy, paste,
//! property edits) for the scene editor.

use tracing::{debug, trace};

use super::{PlacementOutcome, SceneEditor};
use crate::commands::{GeometryChange, PositionChange, SceneCommand};
use crate::geometry::{normalize_degrees, Bounds, Point, Vector2};
use crate::model::{
    Clearance, EquipmentInstance, EquipmentTemplate, InstanceId, ShapeKind, TemplateCatalog,
};
use crate::validator::{validate_placement, PlacementCandidate};

impl SceneEditor {
    /// Looks up `template_id` and places it with its top-left corner at
    /// `top_left`.
    pub fn place_from_catalog(
        &mut self,
        catalog: &dyn TemplateCatalog,
        template_id: &str,
        top_left: Point,
    ) -> PlacementOutcome {
        match catalog.template(template_id) {
            Some(template) => self.place(template, top_left),
            None => {
                debug!(template_id, "placement with unknown template");
                PlacementOutcome::UnknownTemplate(template_id.to_string())
            }
        }
    }

    /// Places a new instance if it clears every existing instance's spacing.
    pub fn place(&mut self, template: &EquipmentTemplate, top_left: Point) -> PlacementOutcome {
        let ratio = self.units_per_pixel();
        let instance = template.instantiate(top_left, ratio);
        if let Err(reason) = instance.validate() {
            debug!(template_id = %template.id, %reason, "placement has invalid geometry");
            return PlacementOutcome::InvalidGeometry(reason.to_string());
        }

        let candidate = PlacementCandidate::from_instance(&instance);
        if let Err(rejection) = validate_placement(&candidate, self.scene.instances(), &[], ratio) {
            debug!(template_id = %template.id, %rejection, "placement rejected");
            return PlacementOutcome::Rejected(rejection);
        }

        let id = instance.id.clone();
        let index = self.scene.len();
        self.push_command(SceneCommand::PlaceInstance { index, instance });
        PlacementOutcome::Placed(id)
    }

    /// Translates the given instances by one shared delta.
    pub fn move_by(&mut self, ids: &[InstanceId], delta: Vector2) -> bool {
        if !delta.is_finite() || (delta.x == 0.0 && delta.y == 0.0) {
            return false;
        }
        let changes: Vec<PositionChange> = ids
            .iter()
            .filter_map(|id| self.scene.instance(id))
            .map(|i| PositionChange {
                id: i.id.clone(),
                from: i.position(),
                to: i.position() + delta,
            })
            .collect();
        if changes.is_empty() {
            trace!("move with no known instances");
            return false;
        }
        self.push_command(SceneCommand::MoveInstances { changes });
        true
    }

    /// Moves the selection by a delta.
    pub fn move_selection(&mut self, delta: Vector2) -> bool {
        let ids = self.scene.selection.to_vec();
        self.move_by(&ids, delta)
    }

    /// Moves one instance so its top-left corner lands on `top_left`.
    pub fn move_to(&mut self, id: &InstanceId, top_left: Point) -> bool {
        let Some(instance) = self.scene.instance(id) else {
            trace!(%id, "move_to unknown instance");
            return false;
        };
        let delta = top_left - instance.position();
        self.move_by(std::slice::from_ref(id), delta)
    }

    /// Writes positions without logging. Used while a drag is in progress.
    pub(crate) fn set_positions_live(&mut self, positions: &[(InstanceId, Point)]) {
        for (id, position) in positions {
            if let Some(instance) = self.scene.instance_mut(id) {
                instance.set_position(*position);
            }
        }
    }

    /// Records a finished drag whose positions are already applied.
    pub(crate) fn commit_move(&mut self, changes: Vec<PositionChange>) -> bool {
        let changes: Vec<PositionChange> =
            changes.into_iter().filter(|c| c.from != c.to).collect();
        if changes.is_empty() {
            return false;
        }
        self.record_command(SceneCommand::MoveInstances { changes });
        true
    }

    /// Sets the rotation, normalized to `[0, 360)`. Callers apply snapping.
    pub fn rotate(&mut self, id: &InstanceId, degrees: f64) -> bool {
        if !degrees.is_finite() {
            return false;
        }
        let Some(instance) = self.scene.instance(id) else {
            trace!(%id, "rotate unknown instance");
            return false;
        };
        let from = instance.rotation;
        let to = normalize_degrees(degrees);
        if from == to {
            return false;
        }
        self.push_command(SceneCommand::RotateInstance {
            id: id.clone(),
            from,
            to,
        });
        true
    }

    pub(crate) fn set_rotation_live(&mut self, id: &InstanceId, degrees: f64) {
        if let Some(instance) = self.scene.instance_mut(id) {
            instance.set_rotation(degrees);
        }
    }

    /// Records a finished rotate gesture whose angle is already applied.
    pub(crate) fn commit_rotation(&mut self, id: &InstanceId, from: f64) -> bool {
        let Some(to) = self.scene.instance(id).map(|i| i.rotation) else {
            return false;
        };
        if from == to {
            return false;
        }
        self.record_command(SceneCommand::RotateInstance {
            id: id.clone(),
            from,
            to,
        });
        true
    }

    /// Sets pixel size. Sizes below the minimum are rejected.
    pub fn resize(&mut self, id: &InstanceId, width: f64, height: f64) -> bool {
        let min = self.tuning.min_instance_size_px;
        let Some(instance) = self.scene.instance(id) else {
            trace!(%id, "resize unknown instance");
            return false;
        };
        let height = match instance.shape {
            ShapeKind::Rectangle => height,
            ShapeKind::Circle => width,
        };
        if !(width.is_finite() && height.is_finite()) || width < min || height < min {
            debug!(%id, width, height, min, "resize below minimum size rejected");
            return false;
        }

        let before = instance.geometry();
        let mut resized = instance.clone();
        resized.resize(width, height, self.units_per_pixel());
        let after = resized.geometry();
        if before == after {
            return false;
        }
        self.push_command(SceneCommand::ResizeInstance(GeometryChange {
            id: id.clone(),
            before,
            after,
        }));
        true
    }

    /// Sets size in real-world units. Circles take `width` as the diameter.
    pub fn resize_real_world(&mut self, id: &InstanceId, width: f64, height: f64) -> bool {
        let ratio = self.units_per_pixel();
        self.resize(id, width * ratio, height * ratio)
    }

    /// Removes instances, storing full records for undo.
    pub fn remove(&mut self, ids: &[InstanceId]) -> bool {
        let mut removed: Vec<(usize, EquipmentInstance)> = self
            .scene
            .instances()
            .iter()
            .enumerate()
            .filter(|(_, i)| ids.contains(&i.id))
            .map(|(index, i)| (index, i.clone()))
            .collect();
        if removed.is_empty() {
            trace!("remove with no known instances");
            return false;
        }
        removed.sort_by_key(|(index, _)| *index);
        self.push_command(SceneCommand::RemoveInstances { removed });
        true
    }

    pub fn remove_selected(&mut self) -> bool {
        let ids = self.scene.selection.to_vec();
        self.remove(&ids)
    }

    /// Deep-copies instances to the clipboard. Returns how many were copied;
    /// the clipboard is left alone when none are known.
    pub fn copy(&mut self, ids: &[InstanceId]) -> usize {
        let copied: Vec<EquipmentInstance> = self
            .scene
            .instances()
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect();
        if copied.is_empty() {
            return 0;
        }
        let count = copied.len();
        self.scene.clipboard = copied;
        count
    }

    pub fn copy_selected(&mut self) -> usize {
        let ids = self.scene.selection.to_vec();
        self.copy(&ids)
    }

    /// Pastes the clipboard with its bounding-box center at `at`, or offset
    /// from the originals when `at` is `None`. Pasted instances get fresh ids
    /// and become the selection.
    pub fn paste(&mut self, at: Option<Point>) -> Vec<InstanceId> {
        let Some(bounds) = Bounds::enclosing(self.scene.clipboard.iter().map(|i| i.bounds()))
        else {
            trace!("paste with empty clipboard");
            return Vec::new();
        };
        let centroid = bounds.center();
        let target = at.unwrap_or_else(|| {
            let offset = self.tuning.paste_offset_px;
            centroid + Point::new(offset, offset)
        });
        let delta = target - centroid;

        let ratio = self.units_per_pixel();
        let instances: Vec<EquipmentInstance> = self
            .scene
            .clipboard
            .iter()
            .map(|original| {
                let mut copy = original.clone();
                copy.id = InstanceId::generate();
                copy.translate(delta);
                copy.rescale(ratio);
                copy
            })
            .collect();

        // Repeated default pastes cascade instead of stacking.
        if at.is_none() {
            for item in &mut self.scene.clipboard {
                item.translate(delta);
            }
        }

        let ids: Vec<InstanceId> = instances.iter().map(|i| i.id.clone()).collect();
        self.push_command(SceneCommand::PasteInstances { instances });
        self.scene.selection.replace(ids.clone());
        ids
    }

    pub fn toggle_visibility(&mut self, id: &InstanceId) -> bool {
        let Some(instance) = self.scene.instance(id) else {
            trace!(%id, "toggle visibility of unknown instance");
            return false;
        };
        let from = instance.visible;
        self.push_command(SceneCommand::SetVisibility {
            id: id.clone(),
            from,
            to: !from,
        });
        true
    }

    fn update_instance(
        &mut self,
        id: &InstanceId,
        edit: impl FnOnce(&mut EquipmentInstance),
    ) -> bool {
        let Some(before) = self.scene.instance(id).cloned() else {
            trace!(%id, "edit unknown instance");
            return false;
        };
        let mut after = before.clone();
        edit(&mut after);
        if after == before {
            return false;
        }
        self.push_command(SceneCommand::UpdateInstance { before, after });
        true
    }

    pub fn rename(&mut self, id: &InstanceId, name: &str) -> bool {
        self.update_instance(id, |i| i.name = name.to_string())
    }

    pub fn set_color(&mut self, id: &InstanceId, color: &str) -> bool {
        self.update_instance(id, |i| i.color = color.to_string())
    }

    /// Sets clearance. Negative values and a mismatched shape are rejected.
    pub fn set_clearance(&mut self, id: &InstanceId, clearance: Clearance) -> bool {
        let shape_matches = self.scene.instance(id).is_some_and(|i| {
            matches!(
                (i.shape, clearance),
                (ShapeKind::Rectangle, Clearance::Sides { .. })
                    | (ShapeKind::Circle, Clearance::Radius { .. })
            )
        });
        if !shape_matches || !clearance.is_valid() {
            debug!(%id, "clearance rejected");
            return false;
        }
        self.update_instance(id, |i| i.clearance = clearance)
    }

    pub fn set_min_spacing(&mut self, id: &InstanceId, min_spacing: f64) -> bool {
        if !(min_spacing.is_finite() && min_spacing >= 0.0) {
            return false;
        }
        self.update_instance(id, |i| i.min_spacing = min_spacing)
    }

    /// Moves an instance to the top of the z-order.
    pub fn bring_to_front(&mut self, id: &InstanceId) -> bool {
        let Some(from_index) = self.scene.index_of(id) else {
            trace!(%id, "reorder unknown instance");
            return false;
        };
        let to_index = self.scene.len() - 1;
        if from_index == to_index {
            return false;
        }
        self.push_command(SceneCommand::Reorder {
            id: id.clone(),
            from_index,
            to_index,
        });
        true
    }
}

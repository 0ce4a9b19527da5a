//! Authoritative scene state.
//!
//! `SceneModel` holds instances in z-order (last is topmost), the selection,
//! the clipboard, the active calibration and the annotation overlays. Its
//! mutators here are raw: they do not record history. Undoable edits go
//! through [`crate::editor::SceneEditor`], which applies
//! [`crate::commands::SceneCommand`]s to this model.

mod selection;

pub use selection::Selection;

use sitekit_core::constants::DEFAULT_UNITS_PER_PIXEL;
use sitekit_core::DisplaySettings;

use crate::calibration::CalibrationLine;
use crate::geometry::Bounds;
use crate::model::{EquipmentInstance, InstanceId, MeasurementLine, Perimeter};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneModel {
    instances: Vec<EquipmentInstance>,
    pub(crate) selection: Selection,
    pub(crate) clipboard: Vec<EquipmentInstance>,
    pub(crate) calibration: Option<CalibrationLine>,
    pub(crate) perimeter: Option<Perimeter>,
    pub(crate) measurements: Vec<MeasurementLine>,
    pub display: DisplaySettings,
}

impl SceneModel {
    pub fn new(display: DisplaySettings) -> Self {
        Self {
            display,
            ..Self::default()
        }
    }

    /// Derived from the active calibration, 1.0 without one.
    pub fn units_per_pixel(&self) -> f64 {
        self.calibration
            .as_ref()
            .map(|line| line.units_per_pixel)
            .unwrap_or(DEFAULT_UNITS_PER_PIXEL)
    }

    /// Instances in z-order, bottom first.
    pub fn instances(&self) -> &[EquipmentInstance] {
        &self.instances
    }

    pub fn instance(&self, id: &InstanceId) -> Option<&EquipmentInstance> {
        self.instances.iter().find(|i| i.id == *id)
    }

    pub(crate) fn instance_mut(&mut self, id: &InstanceId) -> Option<&mut EquipmentInstance> {
        self.instances.iter_mut().find(|i| i.id == *id)
    }

    pub fn index_of(&self, id: &InstanceId) -> Option<usize> {
        self.instances.iter().position(|i| i.id == *id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clipboard(&self) -> &[EquipmentInstance] {
        &self.clipboard
    }

    pub fn calibration(&self) -> Option<&CalibrationLine> {
        self.calibration.as_ref()
    }

    pub fn perimeter(&self) -> Option<&Perimeter> {
        self.perimeter.as_ref()
    }

    pub fn measurements(&self) -> &[MeasurementLine] {
        &self.measurements
    }

    /// Selected instances in z-order.
    pub fn selected_instances(&self) -> impl Iterator<Item = &EquipmentInstance> {
        self.instances
            .iter()
            .filter(|i| self.selection.contains(&i.id))
    }

    /// Box around every instance, or `None` for an empty scene.
    pub fn content_bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.instances.iter().map(|i| i.bounds()))
    }

    /// Inserts at `index`, clamped to the end of the list.
    pub(crate) fn insert_instance(&mut self, index: usize, instance: EquipmentInstance) {
        let index = index.min(self.instances.len());
        self.instances.insert(index, instance);
    }

    pub(crate) fn push_instance(&mut self, instance: EquipmentInstance) {
        self.instances.push(instance);
    }

    /// Removes an instance and drops it from the selection.
    pub(crate) fn remove_instance(&mut self, id: &InstanceId) -> Option<(usize, EquipmentInstance)> {
        let index = self.index_of(id)?;
        self.selection.remove(id);
        Some((index, self.instances.remove(index)))
    }

    /// Moves an instance to `to` in the z-order.
    pub(crate) fn move_in_stack(&mut self, id: &InstanceId, to: usize) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        let instance = self.instances.remove(from);
        let to = to.min(self.instances.len());
        self.instances.insert(to, instance);
        true
    }

    /// Recomputes every instance's pixel size from its real-world size.
    pub(crate) fn rescale_all(&mut self) {
        let ratio = self.units_per_pixel();
        for instance in &mut self.instances {
            instance.rescale(ratio);
        }
    }

    /// Drops selection entries whose instance no longer exists.
    pub(crate) fn prune_selection(&mut self) {
        let instances = &self.instances;
        self.selection
            .retain(|id| instances.iter().any(|i| i.id == *id));
    }

    /// Empties instances, overlays and ephemeral state.
    pub(crate) fn clear(&mut self) {
        self.instances.clear();
        self.selection.clear();
        self.clipboard.clear();
        self.calibration = None;
        self.perimeter = None;
        self.measurements.clear();
    }
}

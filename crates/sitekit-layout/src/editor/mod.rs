//! Undoable scene editing.
//!
//! `SceneEditor` owns the [`SceneModel`] and its [`ActionLog`] so that the
//! two are always updated together. Every public mutator either commits
//! exactly one action or leaves both untouched and reports `false`.

mod annotations;
mod calibration;
mod instances;

use tracing::{debug, trace};

use sitekit_core::{DisplaySettings, EngineTuning, InteractionTuning};

use crate::commands::SceneCommand;
use crate::history::{ActionLog, UndoableAction};
use crate::model::InstanceId;
use crate::scene::SceneModel;
use crate::validator::PlacementRejection;

/// Result of a placement request.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOutcome {
    Placed(InstanceId),
    /// Spacing conflict; nothing was created or logged
    Rejected(PlacementRejection),
    /// The catalog has no such template
    UnknownTemplate(String),
    /// The template produces degenerate geometry at the current scale
    InvalidGeometry(String),
}

impl PlacementOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementOutcome::Placed(_))
    }

    pub fn placed_id(&self) -> Option<&InstanceId> {
        match self {
            PlacementOutcome::Placed(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneEditor {
    pub(crate) scene: SceneModel,
    pub(crate) log: ActionLog,
    pub(crate) tuning: InteractionTuning,
    /// Set while undo/redo replays a command
    applying: bool,
    modified: bool,
}

impl SceneEditor {
    pub fn new(tuning: &EngineTuning) -> Self {
        Self {
            scene: SceneModel::new(tuning.display.clone()),
            log: ActionLog::with_depth(tuning.history_depth),
            tuning: tuning.interaction,
            applying: false,
            modified: false,
        }
    }

    pub fn scene(&self) -> &SceneModel {
        &self.scene
    }

    pub fn history(&self) -> &ActionLog {
        &self.log
    }

    pub fn tuning(&self) -> &InteractionTuning {
        &self.tuning
    }

    pub fn display(&self) -> &DisplaySettings {
        &self.scene.display
    }

    /// Display flags are presentation state and are not logged.
    pub fn display_mut(&mut self) -> &mut DisplaySettings {
        &mut self.scene.display
    }

    pub fn units_per_pixel(&self) -> f64 {
        self.scene.units_per_pixel()
    }

    /// True once anything has been committed since creation or the last
    /// [`SceneEditor::mark_saved`].
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Applies a command and records it.
    pub(crate) fn push_command(&mut self, command: SceneCommand) {
        if self.applying {
            trace!(kind = %command.kind(), "ignoring command pushed during undo/redo");
            return;
        }
        command.apply(&mut self.scene);
        self.record_command(command);
    }

    /// Records a command whose effect is already in the scene (live drags).
    pub(crate) fn record_command(&mut self, command: SceneCommand) {
        if self.applying {
            trace!(kind = %command.kind(), "ignoring command recorded during undo/redo");
            return;
        }
        let action = UndoableAction::new(command);
        debug!(kind = %action.kind(), "{}", action.description);
        self.log.push(action);
        self.modified = true;
    }

    /// Reverts the most recent action. Returns `false` on an empty stack.
    pub fn undo(&mut self) -> bool {
        let Some(action) = self.log.pop_undo() else {
            trace!("undo with empty stack");
            return false;
        };
        self.applying = true;
        action.command.revert(&mut self.scene);
        self.applying = false;
        self.scene.prune_selection();
        debug!(kind = %action.kind(), "undo: {}", action.description);
        self.log.push_redo(action);
        self.modified = true;
        true
    }

    /// Reapplies the most recently undone action.
    pub fn redo(&mut self) -> bool {
        let Some(action) = self.log.pop_redo() else {
            trace!("redo with empty stack");
            return false;
        };
        self.applying = true;
        action.command.apply(&mut self.scene);
        self.applying = false;
        self.scene.prune_selection();
        debug!(kind = %action.kind(), "redo: {}", action.description);
        self.log.push_undo_keep_redo(action);
        self.modified = true;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    /// Drops all history without touching the scene.
    pub fn clear_history(&mut self) {
        self.log.clear();
    }

    // Selection is ephemeral and never logged.

    pub fn select_only(&mut self, id: &InstanceId) -> bool {
        if self.scene.instance(id).is_none() {
            trace!(%id, "select unknown instance");
            return false;
        }
        self.scene.selection.select_only(id.clone());
        true
    }

    pub fn toggle_selection(&mut self, id: &InstanceId) -> bool {
        if self.scene.instance(id).is_none() {
            trace!(%id, "toggle unknown instance");
            return false;
        }
        self.scene.selection.toggle(id.clone());
        true
    }

    /// Replaces the selection, ignoring unknown ids.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = InstanceId>) {
        let known: Vec<InstanceId> = ids
            .into_iter()
            .filter(|id| self.scene.instance(id).is_some())
            .collect();
        self.scene.selection.replace(known);
    }

    /// Selects every visible instance.
    pub fn select_all(&mut self) {
        let ids: Vec<InstanceId> = self
            .scene
            .instances()
            .iter()
            .filter(|i| i.visible)
            .map(|i| i.id.clone())
            .collect();
        self.scene.selection.replace(ids);
    }

    pub fn deselect_all(&mut self) {
        self.scene.selection.clear();
    }

    /// Selected ids in z-order.
    pub fn selected_ids(&self) -> Vec<InstanceId> {
        self.scene
            .selected_instances()
            .map(|i| i.id.clone())
            .collect()
    }
}

impl Default for SceneEditor {
    fn default() -> Self {
        Self::new(&EngineTuning::default())
    }
}

//! Undo/redo action log
//!
//! Bounded undo and redo stacks of [`UndoableAction`]s. The log only stores
//! entries; applying them to the scene is the editor's job, which holds the
//! re-entrancy guard while it does so.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::commands::{ActionKind, SceneCommand};

/// One committed, reversible change.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoableAction {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub command: SceneCommand,
}

impl UndoableAction {
    pub fn new(command: SceneCommand) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            description: command.description(),
            command,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.command.kind()
    }
}

/// Manages the undo and redo stacks.
#[derive(Debug, Clone)]
pub struct ActionLog {
    undo_stack: Vec<UndoableAction>,
    redo_stack: Vec<UndoableAction>,
    max_depth: usize,
}

impl ActionLog {
    /// Create with default depth (100)
    pub fn new() -> Self {
        Self::with_depth(100)
    }

    /// Create with custom maximum undo depth
    pub fn with_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record a new action. Clears the redo stack.
    pub fn push(&mut self, action: UndoableAction) {
        self.redo_stack.clear();
        self.undo_stack.push(action);

        // Trim if exceeds max depth
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Pops the next action to undo.
    pub(crate) fn pop_undo(&mut self) -> Option<UndoableAction> {
        self.undo_stack.pop()
    }

    /// Pops the next action to redo.
    pub(crate) fn pop_redo(&mut self) -> Option<UndoableAction> {
        self.redo_stack.pop()
    }

    /// Returns an undone action to the redo stack.
    pub(crate) fn push_redo(&mut self, action: UndoableAction) {
        self.redo_stack.push(action);
    }

    /// Returns a redone action to the undo stack without touching redo.
    pub(crate) fn push_undo_keep_redo(&mut self, action: UndoableAction) {
        self.undo_stack.push(action);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Description of the action [`crate::editor::SceneEditor::undo`] would revert.
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|a| a.description.as_str())
    }

    /// Description of the action [`crate::editor::SceneEditor::redo`] would reapply.
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|a| a.description.as_str())
    }

    /// Most recent action, if any.
    pub fn last(&self) -> Option<&UndoableAction> {
        self.undo_stack.last()
    }

    /// Undo entries, oldest first.
    pub fn undo_entries(&self) -> &[UndoableAction] {
        &self.undo_stack
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

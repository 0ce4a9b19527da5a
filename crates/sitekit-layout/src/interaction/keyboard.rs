//! Keyboard shortcuts.
//!
//! | Key | Action |
//! |---|---|
//! | Arrows | Nudge selection (Shift for the large step) |
//! | Delete / Backspace | Delete selection |
//! | Ctrl+A | Select all |
//! | Ctrl+C / Ctrl+V | Copy / paste |
//! | Ctrl+Z / Ctrl+Shift+Z / Ctrl+Y | Undo / redo |
//! | `+` / `=` / `-` | Zoom in / out |
//! | H | Toggle Select and Pan |
//! | Enter | Close the perimeter being drawn |
//! | Escape | Cancel the gesture, then the pending tool state, then the selection |

use super::{Feedback, Gesture, InteractionController, Modifiers, ToolMode};
use crate::geometry::Point;
use crate::model::TemplateCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Delete,
    Backspace,
    Escape,
    Enter,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    /// Shortcuts are suppressed while a text field has focus
    pub text_input_focused: bool,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            text_input_focused: false,
        }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

impl<C: TemplateCatalog> InteractionController<C> {
    pub fn key_down(&mut self, event: KeyEvent) -> Feedback {
        if event.text_input_focused {
            return Feedback::Ignored;
        }
        if event.key == Key::Escape {
            let feedback = self.escape();
            return self.finish(feedback);
        }
        if self.gesture != Gesture::Idle {
            return Feedback::Ignored;
        }

        let modifiers = event.modifiers;
        let feedback = match event.key {
            Key::ArrowLeft | Key::ArrowRight | Key::ArrowUp | Key::ArrowDown => {
                self.nudge(event.key, modifiers)
            }
            Key::Delete | Key::Backspace => committed(self.editor.remove_selected()),
            Key::Enter if self.mode == ToolMode::PerimeterDraw => self.commit_perimeter_draft(),
            Key::Enter => Feedback::Ignored,
            Key::Char(c) if modifiers.ctrl => self.shortcut(c.to_ascii_lowercase(), modifiers),
            Key::Char('+') | Key::Char('=') => {
                self.viewport.zoom_in();
                Feedback::Updated
            }
            Key::Char('-') => {
                self.viewport.zoom_out();
                Feedback::Updated
            }
            Key::Char('h') | Key::Char('H') => {
                let next = if self.mode == ToolMode::Pan {
                    ToolMode::Select
                } else {
                    ToolMode::Pan
                };
                self.set_mode(next);
                Feedback::Updated
            }
            Key::Char(_) | Key::Escape => Feedback::Ignored,
        };
        self.finish(feedback)
    }

    fn shortcut(&mut self, c: char, modifiers: Modifiers) -> Feedback {
        match c {
            'a' => {
                self.editor.select_all();
                Feedback::Updated
            }
            'c' => {
                if self.editor.copy_selected() > 0 {
                    Feedback::Updated
                } else {
                    Feedback::Ignored
                }
            }
            'v' => {
                if self.editor.paste(None).is_empty() {
                    Feedback::Ignored
                } else {
                    Feedback::Committed
                }
            }
            'z' if modifiers.shift => committed(self.editor.redo()),
            'z' => committed(self.editor.undo()),
            'y' => committed(self.editor.redo()),
            '+' | '=' => {
                self.viewport.zoom_in();
                Feedback::Updated
            }
            '-' => {
                self.viewport.zoom_out();
                Feedback::Updated
            }
            _ => Feedback::Ignored,
        }
    }

    fn nudge(&mut self, key: Key, modifiers: Modifiers) -> Feedback {
        let tuning = self.editor.tuning();
        let step = if modifiers.fast() {
            tuning.fast_nudge_px
        } else {
            tuning.nudge_px
        };
        let delta = match key {
            Key::ArrowLeft => Point::new(-step, 0.0),
            Key::ArrowRight => Point::new(step, 0.0),
            Key::ArrowUp => Point::new(0.0, -step),
            Key::ArrowDown => Point::new(0.0, step),
            _ => return Feedback::Ignored,
        };
        committed(self.editor.move_selection(delta))
    }

    fn escape(&mut self) -> Feedback {
        if self.cancel_gesture() {
            return Feedback::Updated;
        }
        match self.mode {
            ToolMode::Calibrate if !self.calibration.is_idle() => {
                self.calibration.cancel();
                Feedback::Updated
            }
            ToolMode::PerimeterDraw if !self.perimeter_draft.is_empty() => {
                self.perimeter_draft.clear();
                Feedback::Updated
            }
            ToolMode::Ruler if self.ruler_start.is_some() => {
                self.ruler_start = None;
                Feedback::Updated
            }
            _ if !self.editor.scene().selection().is_empty() => {
                self.editor.deselect_all();
                Feedback::Updated
            }
            _ => Feedback::Ignored,
        }
    }
}

fn committed(changed: bool) -> Feedback {
    if changed {
        Feedback::Committed
    } else {
        Feedback::Ignored
    }
}

//! Input-event port.
//!
//! Hosts translate their toolkit's keyboard, mouse and clipboard events into
//! [`InputEvent`] values and feed them to [`Grid::handle_event`]. The
//! returned [`InputOutcome`] tells the host whether to suppress the default
//! action and, for native copy/cut, which text to place on the clipboard.

use crate::clipboard::SystemClipboard;
use crate::grid::Grid;
use crate::navigation::Direction;
use crate::selection::Arrow;
use datagrid_primitives::CellAddress;
use serde::{Deserialize, Serialize};

/// Modifier keys. `ctrl` also stands for Cmd/Meta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Tab,
    Enter,
    Escape,
    F2,
    Delete,
    Backspace,
    /// A single printable character
    Char(char),
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(name: &str) -> Key {
        match name {
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Tab" => Key::Tab,
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "F2" => Key::F2,
            "Delete" | "Del" => Key::Delete,
            "Backspace" => Key::Backspace,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if !ch.is_control() => Key::Char(ch),
                    _ => Key::Other(other.to_string()),
                }
            }
        }
    }

    fn arrow(&self) -> Option<Arrow> {
        match self {
            Key::ArrowUp => Some(Arrow::Up),
            Key::ArrowDown => Some(Arrow::Down),
            Key::ArrowLeft => Some(Arrow::Left),
            Key::ArrowRight => Some(Arrow::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    KeyDown { key: Key, modifiers: Modifiers },
    MouseDown { cell: CellAddress, modifiers: Modifiers },
    MouseEnter { cell: CellAddress },
    /// Observed globally, even outside the grid surface
    MouseUp,
    Click { cell: CellAddress, modifiers: Modifiers },
    DoubleClick { cell: CellAddress },
    /// The edit field's full text after a change
    EditInput { text: String },
    NativeCopy,
    NativeCut,
    NativePaste { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "camelCase")]
pub enum InputOutcome {
    /// Not for the grid; let the host's default action run
    Ignored,
    /// Consumed; the host should suppress its default action
    Handled,
    /// Consumed; place this text on the native clipboard
    Clipboard(String),
}

impl InputOutcome {
    pub fn is_handled(&self) -> bool {
        !matches!(self, InputOutcome::Ignored)
    }
}

impl Grid {
    /// Dispatch one host event
    pub fn handle_event(&mut self, event: InputEvent, system: &mut dyn SystemClipboard) -> InputOutcome {
        match event {
            InputEvent::KeyDown { key, modifiers } => self.handle_key(&key, modifiers, system),
            InputEvent::MouseDown { cell, modifiers } => {
                self.mouse_down(cell, modifiers.shift);
                InputOutcome::Handled
            }
            InputEvent::MouseEnter { cell } => {
                self.mouse_enter(cell);
                InputOutcome::Handled
            }
            InputEvent::MouseUp => {
                self.mouse_up();
                InputOutcome::Handled
            }
            InputEvent::Click { cell, modifiers } => {
                self.click(cell, modifiers.shift);
                InputOutcome::Handled
            }
            InputEvent::DoubleClick { cell } => {
                self.double_click(cell);
                InputOutcome::Handled
            }
            InputEvent::EditInput { text } => handled(self.edit_input(&text)),
            // While editing, clipboard events belong to the edit field.
            InputEvent::NativeCopy if !self.is_editing() => InputOutcome::Clipboard(self.native_copy()),
            InputEvent::NativeCut if !self.is_editing() => InputOutcome::Clipboard(self.native_cut()),
            InputEvent::NativePaste { text } if !self.is_editing() => {
                self.paste_text(&text);
                InputOutcome::Handled
            }
            InputEvent::NativeCopy | InputEvent::NativeCut | InputEvent::NativePaste { .. } => {
                InputOutcome::Ignored
            }
        }
    }

    fn handle_key(&mut self, key: &Key, modifiers: Modifiers, system: &mut dyn SystemClipboard) -> InputOutcome {
        if self.overlay_open() {
            return InputOutcome::Ignored;
        }
        let editing = self.is_editing();

        if modifiers.ctrl {
            if editing {
                return InputOutcome::Ignored;
            }
            let Key::Char(ch) = key else {
                return InputOutcome::Ignored;
            };
            return match ch.to_ascii_lowercase() {
                'z' if modifiers.shift => {
                    self.redo();
                    InputOutcome::Handled
                }
                'z' => {
                    self.undo();
                    InputOutcome::Handled
                }
                'y' => {
                    self.redo();
                    InputOutcome::Handled
                }
                'c' => {
                    self.copy(system);
                    InputOutcome::Handled
                }
                'x' => {
                    self.cut(system);
                    InputOutcome::Handled
                }
                'v' => {
                    self.paste(system);
                    InputOutcome::Handled
                }
                _ => InputOutcome::Ignored,
            };
        }

        if let Some(arrow) = key.arrow() {
            if modifiers.shift && !editing {
                self.extend_selection(arrow);
                return InputOutcome::Handled;
            }
            // Left/Right move the caret inside the edit field.
            if editing && matches!(arrow, Arrow::Left | Arrow::Right) {
                return InputOutcome::Ignored;
            }
            self.navigate(Direction::from(arrow));
            return InputOutcome::Handled;
        }

        match key {
            Key::Tab => {
                self.navigate(if modifiers.shift {
                    Direction::ShiftTab
                } else {
                    Direction::Tab
                });
                InputOutcome::Handled
            }
            Key::Enter if editing => {
                self.navigate(Direction::Enter);
                InputOutcome::Handled
            }
            Key::Enter | Key::F2 => {
                self.begin_edit();
                InputOutcome::Handled
            }
            Key::Escape => handled(self.cancel_edit()),
            Key::Delete | Key::Backspace if !editing => {
                self.clear_selected_cells();
                InputOutcome::Handled
            }
            Key::Char(ch) if !editing && !modifiers.alt => {
                self.begin_edit_with(&ch.to_string());
                InputOutcome::Handled
            }
            _ => InputOutcome::Ignored,
        }
    }
}

fn handled(consumed: bool) -> InputOutcome {
    if consumed {
        InputOutcome::Handled
    } else {
        InputOutcome::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::{MemoryClipboard, NoSystemClipboard};
    use crate::grid::GridOptions;

    fn grid() -> Grid {
        Grid::new(
            &[vec!["a", "b"], vec!["c", "d"]],
            GridOptions::default().with_rows(0).with_columns(0),
        )
    }

    fn key(grid: &mut Grid, name: &str, modifiers: Modifiers) -> InputOutcome {
        grid.handle_event(
            InputEvent::KeyDown {
                key: Key::from_dom(name),
                modifiers,
            },
            &mut NoSystemClipboard,
        )
    }

    #[test]
    fn test_key_from_dom() {
        assert_eq!(Key::from_dom("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_dom("x"), Key::Char('x'));
        assert_eq!(Key::from_dom("Shift"), Key::Other("Shift".to_string()));
        assert_eq!(Key::from_dom("F5"), Key::Other("F5".to_string()));
    }

    #[test]
    fn test_arrows_and_tab_navigate() {
        let mut g = grid();
        key(&mut g, "ArrowUp", Modifiers::NONE);
        assert_eq!(g.focus(), CellAddress::new(1, 0));
        key(&mut g, "Tab", Modifiers::NONE);
        assert_eq!(g.focus(), CellAddress::new(1, 1));
        key(&mut g, "Tab", Modifiers::shift());
        assert_eq!(g.focus(), CellAddress::new(1, 0));
    }

    #[test]
    fn test_shift_arrow_extends() {
        let mut g = grid();
        key(&mut g, "ArrowRight", Modifiers::shift());
        key(&mut g, "ArrowDown", Modifiers::shift());
        let rect = g.selection().rectangle().unwrap();
        assert_eq!(rect.end, CellAddress::new(1, 1));
        assert_eq!(g.focus(), CellAddress::new(0, 0));
    }

    #[test]
    fn test_typing_edits_and_enter_commits() {
        let mut g = grid();
        assert_eq!(key(&mut g, "q", Modifiers::NONE), InputOutcome::Handled);
        assert_eq!(g.editing().unwrap().buffer, "q");
        g.handle_event(InputEvent::EditInput { text: "qu".into() }, &mut NoSystemClipboard);
        assert_eq!(key(&mut g, "x", Modifiers::NONE), InputOutcome::Ignored);
        key(&mut g, "Enter", Modifiers::NONE);
        assert_eq!(g.store().cell(0, 0), Some("qu"));
        assert_eq!(g.focus(), CellAddress::new(1, 0));
        assert_eq!(g.history().len(), 2);
    }

    #[test]
    fn test_f2_and_escape() {
        let mut g = grid();
        key(&mut g, "F2", Modifiers::NONE);
        assert_eq!(g.editing().unwrap().buffer, "a");
        g.edit_input("zzz");
        key(&mut g, "Escape", Modifiers::NONE);
        assert!(!g.is_editing());
        assert_eq!(g.store().cell(0, 0), Some("a"));
        assert_eq!(key(&mut g, "Escape", Modifiers::NONE), InputOutcome::Ignored);
    }

    #[test]
    fn test_undo_redo_bindings() {
        let mut g = grid();
        g.update_cell(CellAddress::new(0, 0), "x");
        key(&mut g, "z", Modifiers::ctrl());
        assert_eq!(g.store().cell(0, 0), Some("a"));
        key(&mut g, "Z", Modifiers { ctrl: true, shift: true, alt: false });
        assert_eq!(g.store().cell(0, 0), Some("x"));
        key(&mut g, "z", Modifiers::ctrl());
        key(&mut g, "y", Modifiers::ctrl());
        assert_eq!(g.store().cell(0, 0), Some("x"));
    }

    #[test]
    fn test_delete_clears_focused_cell() {
        let mut g = grid();
        key(&mut g, "Delete", Modifiers::NONE);
        assert_eq!(g.store().cell(0, 0), Some(""));
        key(&mut g, "ArrowRight", Modifiers::NONE);
        key(&mut g, "Backspace", Modifiers::NONE);
        assert_eq!(g.store().cell(0, 1), Some(""));
    }

    #[test]
    fn test_overlay_blocks_keys() {
        let mut g = grid();
        g.set_overlay_open(true);
        assert_eq!(key(&mut g, "Delete", Modifiers::NONE), InputOutcome::Ignored);
        assert_eq!(g.store().cell(0, 0), Some("a"));
        g.set_overlay_open(false);
        assert!(key(&mut g, "Delete", Modifiers::NONE).is_handled());
    }

    #[test]
    fn test_clipboard_keys_and_native_events() {
        let mut g = grid();
        let mut system = MemoryClipboard::new();
        let ctrl_c = InputEvent::KeyDown {
            key: Key::Char('c'),
            modifiers: Modifiers::ctrl(),
        };
        g.handle_event(ctrl_c, &mut system);
        assert_eq!(system.text(), Some("a"));

        let outcome = g.handle_event(InputEvent::NativeCut, &mut system);
        assert_eq!(outcome, InputOutcome::Clipboard("a".to_string()));
        assert_eq!(g.store().cell(0, 0), Some(""));

        g.handle_event(InputEvent::NativePaste { text: "p\tq".into() }, &mut system);
        assert_eq!(g.store().to_array()[0], vec!["p", "q"]);
    }

    #[test]
    fn test_mouse_drag_ends_on_global_mouse_up() {
        let mut g = grid();
        let none = Modifiers::NONE;
        g.handle_event(InputEvent::MouseDown { cell: CellAddress::new(0, 0), modifiers: none }, &mut NoSystemClipboard);
        g.handle_event(InputEvent::MouseEnter { cell: CellAddress::new(1, 1) }, &mut NoSystemClipboard);
        g.handle_event(InputEvent::MouseUp, &mut NoSystemClipboard);
        g.handle_event(InputEvent::MouseEnter { cell: CellAddress::new(0, 1) }, &mut NoSystemClipboard);
        assert_eq!(g.selection().range.unwrap().end, CellAddress::new(1, 1));
        assert!(!g.selection().dragging);
    }

    #[test]
    fn test_event_json_shape() {
        let event: InputEvent = serde_json::from_str(
            r#"{"type":"keyDown","key":"Enter","modifiers":{"shift":true}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            InputEvent::KeyDown {
                key: Key::Enter,
                modifiers: Modifiers::shift()
            }
        );
    }
}

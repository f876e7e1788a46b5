//! Context-menu actions applied at the focused cell.

use crate::clipboard::SystemClipboard;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextAction {
    InsertRowAbove,
    InsertRowBelow,
    InsertColumnLeft,
    InsertColumnRight,
    Copy,
    Cut,
    Paste,
    DeleteRow,
    DeleteColumn,
    ClearCell,
}

impl ContextAction {
    pub fn label(self) -> &'static str {
        match self {
            ContextAction::InsertRowAbove => "Insert Row Above",
            ContextAction::InsertRowBelow => "Insert Row Below",
            ContextAction::InsertColumnLeft => "Insert Column Left",
            ContextAction::InsertColumnRight => "Insert Column Right",
            ContextAction::Copy => "Copy",
            ContextAction::Cut => "Cut",
            ContextAction::Paste => "Paste",
            ContextAction::DeleteRow => "Delete Row",
            ContextAction::DeleteColumn => "Delete Column",
            ContextAction::ClearCell => "Clear Cell",
        }
    }

    pub fn shortcut(self) -> Option<&'static str> {
        match self {
            ContextAction::Copy => Some("Ctrl+C"),
            ContextAction::Cut => Some("Ctrl+X"),
            ContextAction::Paste => Some("Ctrl+V"),
            _ => None,
        }
    }
}

/// Menu layout; `None` is a separator
pub const CONTEXT_MENU: &[Option<ContextAction>] = &[
    Some(ContextAction::InsertRowAbove),
    Some(ContextAction::InsertRowBelow),
    None,
    Some(ContextAction::InsertColumnLeft),
    Some(ContextAction::InsertColumnRight),
    None,
    Some(ContextAction::Copy),
    Some(ContextAction::Cut),
    Some(ContextAction::Paste),
    None,
    Some(ContextAction::DeleteRow),
    Some(ContextAction::DeleteColumn),
];

impl Grid {
    /// Run a context-menu action at the focused cell. Returns whether the
    /// store changed.
    pub fn apply_context_action(&mut self, action: ContextAction, system: &mut dyn SystemClipboard) -> bool {
        let focus = self.focus();
        tracing::debug!(?action, %focus, "context action");
        match action {
            ContextAction::InsertRowAbove => self.insert_row_above(focus.row),
            ContextAction::InsertRowBelow => self.insert_row_below(focus.row),
            ContextAction::InsertColumnLeft => self.insert_column_left(focus.col),
            ContextAction::InsertColumnRight => self.insert_column_right(focus.col),
            ContextAction::Copy => {
                self.copy(system);
                false
            }
            ContextAction::Cut => {
                let before = self.store().clone();
                self.cut(system);
                !before.is_same_snapshot(self.store())
            }
            ContextAction::Paste => self.paste(system),
            ContextAction::DeleteRow => self.delete_row(focus.row),
            ContextAction::DeleteColumn => self.delete_column(focus.col),
            ContextAction::ClearCell => self.update_cell(focus, ""),
        }
    }
}

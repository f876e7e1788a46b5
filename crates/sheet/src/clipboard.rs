//! Clipboard interchange.
//!
//! Selections travel as plain text: cells joined by tab, rows joined by
//! newline. Reading always goes through the current view, and every store
//! write is resolved through row ids so a later re-sort cannot redirect it.

use crate::error::{GridError, Result};
use crate::row::RowId;
use crate::view::View;
use datagrid_primitives::{CellAddress, CellRange};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardMode {
    Copy,
    Cut,
}

/// The grid's own copy of the last copied or cut text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardPayload {
    pub text: String,
    pub mode: ClipboardMode,
}

/// Access to the host's system clipboard. Either call may be denied.
pub trait SystemClipboard {
    fn read_text(&mut self) -> Result<String>;
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// A host without clipboard access; every call is denied
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSystemClipboard;

impl SystemClipboard for NoSystemClipboard {
    fn read_text(&mut self) -> Result<String> {
        Err(GridError::ClipboardUnavailable("no system clipboard".to_string()))
    }

    fn write_text(&mut self, _text: &str) -> Result<()> {
        Err(GridError::ClipboardUnavailable("no system clipboard".to_string()))
    }
}

/// Process-local clipboard, for hosts that manage the real one themselves
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl SystemClipboard for MemoryClipboard {
    fn read_text(&mut self) -> Result<String> {
        self.text
            .clone()
            .ok_or_else(|| GridError::ClipboardUnavailable("clipboard is empty".to_string()))
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.text = Some(text.to_string());
        Ok(())
    }
}

/// Tab/newline text of the view cells inside `range`
pub fn serialize_range(view: &View, range: CellRange) -> String {
    view.block(range)
        .iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split clipboard text into rows of cells.
///
/// Accepts `\n` and `\r\n` line endings; a single trailing line break (as
/// most spreadsheet applications append) does not produce an extra row.
pub fn parse_clipboard_text(text: &str) -> Vec<Vec<String>> {
    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.len() > 1 && lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
        .into_iter()
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

/// Row-id addressed cells under `range`, for clearing after a cut or delete.
/// View rows that do not exist are skipped.
pub fn resolve_cells(view: &View, range: CellRange) -> Vec<(RowId, usize)> {
    let range = range.normalized();
    (range.start.row..=range.end.row)
        .filter_map(|r| view.row_id(r))
        .flat_map(|id| (range.start.col..=range.end.col).map(move |c| (id, c)))
        .collect()
}

/// Resolve pasted rows to destination row ids, starting at view row
/// `origin.row`. Rows that would land past the end of the view are dropped.
pub fn resolve_paste(view: &View, origin: CellAddress, rows: Vec<Vec<String>>) -> Vec<(RowId, Vec<String>)> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(offset, values)| {
            view.row_id(origin.row + offset).map(|id| (id, values))
        })
        .collect()
}

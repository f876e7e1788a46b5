//! Host-agnostic grid session behind the browser widget.
//!
//! Everything here is plain Rust with `String` errors so it can be tested
//! natively; `lib.rs` only converts to and from `JsValue`.

use datagrid_primitives::{column_headers, CellAddress};
use datagrid_sheet::{
    dark_mode, set_dark_mode, toggle_dark_mode, ColumnFilter, ContextAction, ExportFormat,
    FilterSpec, Grid, GridError, GridOptions, GridStatus, ImportTicket, InputEvent, InputOutcome,
    Key, MatchType, MemoryPreferences, Modifiers, Page, PreferenceStore, Selection, SortSpec,
    SortType, Store, SystemClipboard,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Constructor options as sent by the host; missing fields take the grid
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionOptions {
    pub rows: Option<usize>,
    pub columns: Option<usize>,
    pub page_size: Option<usize>,
    pub history_limit: Option<usize>,
    pub dark_mode: bool,
}

impl SessionOptions {
    fn grid_options(&self) -> GridOptions {
        let defaults = GridOptions::default();
        let mut options = defaults
            .with_rows(self.rows.unwrap_or(defaults.rows))
            .with_columns(self.columns.unwrap_or(defaults.columns))
            .with_history_limit(self.history_limit);
        if let Some(page_size) = self.page_size {
            options = options.with_page_size(page_size);
        }
        options
    }
}

/// The browser clipboard as seen synchronously: text the host read ahead of
/// time, and text the grid wants written once control returns to the host.
#[derive(Debug, Default)]
pub struct HostClipboard {
    incoming: Option<String>,
    outgoing: Option<String>,
}

impl HostClipboard {
    /// Offer text read from the system clipboard for the next paste
    pub fn offer(&mut self, text: Option<String>) {
        self.incoming = text;
    }

    /// Text written by the last copy or cut, if any
    pub fn take_outgoing(&mut self) -> Option<String> {
        self.outgoing.take()
    }
}

impl SystemClipboard for HostClipboard {
    fn read_text(&mut self) -> datagrid_sheet::Result<String> {
        self.incoming
            .take()
            .ok_or_else(|| GridError::ClipboardUnavailable("no clipboard text offered".to_string()))
    }

    fn write_text(&mut self, text: &str) -> datagrid_sheet::Result<()> {
        self.outgoing = Some(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSnapshot {
    pub id: String,
    /// Position in the whole filtered, sorted view
    pub index: usize,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSnapshot {
    pub cell: CellAddress,
    pub buffer: String,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub headers: Vec<String>,
    /// Rows of the current page only
    pub rows: Vec<RowSnapshot>,
    pub page: Page,
    pub sort: SortSpec,
    pub filters: FilterSpec,
    pub selection: Selection,
    pub editing: Option<EditSnapshot>,
    pub status: GridStatus,
    pub can_undo: bool,
    pub can_redo: bool,
    pub dark_mode: bool,
}

/// Payload of one change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeNotice {
    pub rows: usize,
    pub columns: usize,
    pub data: Vec<Vec<String>>,
}

impl ChangeNotice {
    fn from_store(store: &Store) -> Self {
        Self {
            rows: store.row_count(),
            columns: store.column_count(),
            data: store.to_array(),
        }
    }
}

/// Result of dispatching one host event
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResult {
    /// The host should prevent the default action
    pub handled: bool,
    /// Text the host should put on the system clipboard
    pub clipboard: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub struct GridSession {
    grid: Grid,
    clipboard: HostClipboard,
    changes: Rc<RefCell<VecDeque<ChangeNotice>>>,
    prefs: Box<dyn PreferenceStore>,
    imports: HashMap<u32, ImportTicket>,
    next_import: u32,
}

impl GridSession {
    /// Build a session from a JSON array of rows (or any importable shape)
    pub fn from_json(data: &str, options: &SessionOptions) -> Result<Self, String> {
        let rows = if data.trim().is_empty() {
            Vec::new()
        } else {
            datagrid_sheet::parse_import_json(data).map_err(|e| e.to_string())?
        };
        Self::new(&rows, options)
    }

    /// Session whose dark-mode flag lives in memory only. Browser hosts that
    /// want the theme to survive a reload persist it themselves (for example
    /// under [`datagrid_sheet::DARK_MODE_KEY`] in `localStorage`) and pass it
    /// back through [`SessionOptions::dark_mode`].
    pub fn new(rows: &[Vec<String>], options: &SessionOptions) -> Result<Self, String> {
        Self::with_preferences(rows, options, Box::new(MemoryPreferences::new()))
    }

    /// Session over a caller-supplied preference store. The initial
    /// `options.dark_mode` is written to it; a failed write is returned.
    pub fn with_preferences(
        rows: &[Vec<String>],
        options: &SessionOptions,
        mut prefs: Box<dyn PreferenceStore>,
    ) -> Result<Self, String> {
        set_dark_mode(prefs.as_mut(), options.dark_mode).map_err(|e| e.to_string())?;

        let mut grid = Grid::new(rows, options.grid_options());
        let changes: Rc<RefCell<VecDeque<ChangeNotice>>> = Rc::default();
        let sink = Rc::clone(&changes);
        grid.on_change(move |store: &Store| {
            sink.borrow_mut().push_back(ChangeNotice::from_store(store));
        });

        Ok(Self {
            grid,
            clipboard: HostClipboard::default(),
            changes,
            prefs,
            imports: HashMap::new(),
            next_import: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    // ===== Events =====

    /// Dispatch one [`InputEvent`] given as JSON
    pub fn handle_event_json(&mut self, event: &str) -> Result<EventResult, String> {
        let event: InputEvent = serde_json::from_str(event).map_err(|e| format!("Invalid event: {e}"))?;
        Ok(self.handle_event(event))
    }

    pub fn handle_event(&mut self, event: InputEvent) -> EventResult {
        let outcome = self.grid.handle_event(event, &mut self.clipboard);
        let written = self.clipboard.take_outgoing();
        match outcome {
            InputOutcome::Ignored => EventResult::default(),
            InputOutcome::Handled => EventResult {
                handled: true,
                clipboard: written,
            },
            InputOutcome::Clipboard(text) => EventResult {
                handled: true,
                clipboard: Some(text),
            },
        }
    }

    /// Key press with a DOM `KeyboardEvent.key` name
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool) -> EventResult {
        self.handle_event(InputEvent::KeyDown {
            key: Key::from_dom(key),
            modifiers: Modifiers { ctrl, shift, alt },
        })
    }

    pub fn mouse_down(&mut self, row: usize, col: usize, shift: bool) {
        self.grid.mouse_down(CellAddress::new(row, col), shift);
    }

    pub fn mouse_enter(&mut self, row: usize, col: usize) {
        self.grid.mouse_enter(CellAddress::new(row, col));
    }

    pub fn mouse_up(&mut self) {
        self.grid.mouse_up();
    }

    pub fn click(&mut self, row: usize, col: usize, shift: bool) {
        self.grid.click(CellAddress::new(row, col), shift);
    }

    pub fn double_click(&mut self, row: usize, col: usize) -> bool {
        self.grid.double_click(CellAddress::new(row, col))
    }

    pub fn edit_input(&mut self, text: &str) -> bool {
        self.grid.edit_input(text)
    }

    pub fn set_overlay_open(&mut self, open: bool) {
        self.grid.set_overlay_open(open);
    }

    // ===== Clipboard =====

    /// Copy the selection; the host writes the returned text
    pub fn copy(&mut self) -> String {
        let text = self.grid.copy(&mut self.clipboard);
        self.clipboard.take_outgoing();
        text
    }

    pub fn cut(&mut self) -> String {
        let text = self.grid.cut(&mut self.clipboard);
        self.clipboard.take_outgoing();
        text
    }

    /// Paste `system_text` when the host could read the clipboard, otherwise
    /// the internal payload.
    pub fn paste(&mut self, system_text: Option<String>) -> bool {
        self.clipboard.offer(system_text);
        let changed = self.grid.paste(&mut self.clipboard);
        self.clipboard.offer(None);
        changed
    }

    // ===== Edits =====

    /// Run a context-menu action by its camelCase name at the focused cell
    pub fn apply_action(&mut self, action: &str) -> Result<bool, String> {
        let action: ContextAction = parse_name(action, "context action")?;
        Ok(self.grid.apply_context_action(action, &mut self.clipboard))
    }

    pub fn update_cell(&mut self, row: usize, col: usize, value: &str) -> bool {
        self.grid.update_cell(CellAddress::new(row, col), value)
    }

    pub fn undo(&mut self) -> bool {
        self.grid.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.grid.redo()
    }

    pub fn clear_all(&mut self) -> bool {
        self.grid.clear_all()
    }

    pub fn refresh(&mut self) -> bool {
        self.grid.refresh()
    }

    // ===== View configuration =====

    pub fn toggle_sort(&mut self, col: usize) {
        self.grid.toggle_sort(col);
    }

    /// `text`, `number` or `date`
    pub fn set_sort_type(&mut self, sort_type: &str) -> Result<(), String> {
        let sort_type: SortType = parse_name(sort_type, "sort type")?;
        self.grid.set_sort_type(sort_type);
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        self.grid.clear_sort();
    }

    pub fn set_filter(&mut self, col: usize, match_type: &str, value: &str) -> Result<(), String> {
        let match_type: MatchType = match_type.parse().map_err(|e: GridError| e.to_string())?;
        self.grid.set_filter(col, ColumnFilter::new(match_type, value));
        Ok(())
    }

    pub fn remove_filter(&mut self, col: usize) {
        self.grid.remove_filter(col);
    }

    pub fn clear_filters(&mut self) {
        self.grid.clear_filters();
    }

    pub fn set_page(&mut self, page: usize) {
        self.grid.set_page(page);
    }

    pub fn next_page(&mut self) {
        self.grid.next_page();
    }

    pub fn previous_page(&mut self) {
        self.grid.previous_page();
    }

    /// Sorted distinct values of a column, for a filter picker
    pub fn unique_values(&self, col: usize) -> Vec<String> {
        self.grid.unique_values(col)
    }

    // ===== Import / export =====

    /// Start reading a file; pass the returned id to [`Self::finish_import`]
    pub fn begin_import(&mut self) -> u32 {
        self.next_import = self.next_import.wrapping_add(1);
        self.imports.insert(self.next_import, self.grid.begin_import());
        self.next_import
    }

    /// Returns `Ok(false)` when a newer import superseded this one
    pub fn finish_import(&mut self, id: u32, content: &str) -> Result<bool, String> {
        let Some(ticket) = self.imports.remove(&id) else {
            return Ok(false);
        };
        self.grid
            .finish_import(ticket, content)
            .map_err(|e| e.to_string())
    }

    pub fn cancel_import(&mut self, id: u32) {
        if let Some(ticket) = self.imports.remove(&id) {
            self.grid.cancel_import(ticket);
        }
    }

    pub fn import_json(&mut self, content: &str) -> Result<bool, String> {
        self.grid.import_json(content).map_err(|e| e.to_string())
    }

    pub fn export(&self, format: &str, file_name: &str) -> Result<ExportedFile, String> {
        let format: ExportFormat = format.parse().map_err(|e: GridError| e.to_string())?;
        let file = self
            .grid
            .export(format, file_name)
            .map_err(|e| e.to_string())?;
        Ok(ExportedFile {
            file_name: file.file_name,
            mime_type: file.mime_type.to_string(),
            bytes: file.bytes,
        })
    }

    // ===== Theme =====

    pub fn dark_mode(&self) -> bool {
        dark_mode(self.prefs.as_ref())
    }

    /// Flip the theme and return the new value. The flag is not persisted
    /// by [`GridSession::new`]; see there.
    pub fn toggle_dark_mode(&mut self) -> Result<bool, String> {
        toggle_dark_mode(self.prefs.as_mut()).map_err(|e| e.to_string())
    }

    // ===== Rendering =====

    pub fn snapshot(&self) -> Snapshot {
        let view = self.grid.view();
        let page = view.page();
        let rows = view
            .page_rows()
            .iter()
            .enumerate()
            .map(|(offset, row)| RowSnapshot {
                id: row.id().to_string(),
                index: page.start + offset,
                cells: row.cells().to_vec(),
            })
            .collect();

        Snapshot {
            headers: column_headers(self.grid.store().column_count()),
            rows,
            page,
            sort: *self.grid.sort(),
            filters: self.grid.filters().clone(),
            selection: *self.grid.selection(),
            editing: self.grid.editing().map(|session| EditSnapshot {
                cell: session.cell,
                buffer: session.buffer.clone(),
            }),
            status: self.grid.status(),
            can_undo: self.grid.can_undo(),
            can_redo: self.grid.can_redo(),
            dark_mode: self.dark_mode(),
        }
    }

    /// Oldest undelivered change notification
    pub fn take_change(&mut self) -> Option<ChangeNotice> {
        self.changes.borrow_mut().pop_front()
    }

    pub fn pending_changes(&self) -> usize {
        self.changes.borrow().len()
    }
}

/// Parse a camelCase enum name through its serde representation
fn parse_name<T: DeserializeOwned>(name: &str, what: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| format!("Unknown {what}: {name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_fill_defaults() {
        let options: SessionOptions = serde_json::from_str(r#"{"pageSize": 50}"#).unwrap();
        let grid = options.grid_options();
        assert_eq!(grid.rows, 20);
        assert_eq!(grid.columns, 10);
        assert_eq!(grid.page_size, 50);
        assert_eq!(grid.history_limit, None);
    }

    #[test]
    fn test_host_clipboard_read_is_one_shot() {
        let mut clipboard = HostClipboard::default();
        assert!(clipboard.read_text().is_err());
        clipboard.offer(Some("x".to_string()));
        assert_eq!(clipboard.read_text().unwrap(), "x");
        assert!(clipboard.read_text().is_err());
    }

    #[test]
    fn test_parse_name() {
        let action: ContextAction = parse_name("insertRowAbove", "context action").unwrap();
        assert_eq!(action, ContextAction::InsertRowAbove);
        let sort: SortType = parse_name("date", "sort type").unwrap();
        assert_eq!(sort, SortType::Date);
        assert_eq!(
            parse_name::<SortType>("fuzzy", "sort type").unwrap_err(),
            "Unknown sort type: fuzzy"
        );
    }
}

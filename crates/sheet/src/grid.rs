//! The grid controller.
//!
//! `Grid` owns the canonical store and everything derived from it. Every
//! mutation follows the same path: build the next store, skip it if nothing
//! changed, record it in the history, recompute the view, re-clamp the page
//! and the selection, then notify listeners. Sort, filter, page and
//! selection changes only recompute the view.

use crate::clipboard::{self, ClipboardMode, ClipboardPayload, SystemClipboard};
use crate::column;
use crate::error::Result;
use crate::export::{ExportFile, ExportFormat};
use crate::history::History;
use crate::json::parse_import_json;
use crate::navigation::{next_focus, Direction};
use crate::row::RowId;
use crate::selection::{Arrow, Selection};
use crate::store::Store;
use crate::view::{ColumnFilter, FilterSpec, MatchType, Page, SortSpec, SortType, View, DEFAULT_PAGE_SIZE};
use chrono::Utc;
use datagrid_primitives::{column_headers, CellAddress, CellRange};
use serde::Serialize;
use std::fmt;

/// Construction options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOptions {
    /// Minimum row count; initial data may add more
    pub rows: usize,
    /// Minimum column count; initial data may add more
    pub columns: usize,
    pub page_size: usize,
    /// Maximum number of history snapshots, unbounded when `None`
    pub history_limit: Option<usize>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            rows: 20,
            columns: 10,
            page_size: DEFAULT_PAGE_SIZE,
            history_limit: None,
        }
    }
}

impl GridOptions {
    #[must_use]
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }
}

/// Token for one in-flight import. Only the most recently issued ticket can
/// apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImportTicket(u64);

/// An in-progress cell edit. The target is held by row id so a re-sort
/// while editing cannot redirect the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub row_id: RowId,
    /// View position when the edit started
    pub cell: CellAddress,
    pub buffer: String,
}

/// Counts shown in a status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridStatus {
    pub rows: usize,
    pub columns: usize,
    pub non_empty_rows: usize,
    pub non_empty_columns: usize,
    pub visible_rows: usize,
    pub page: usize,
    pub total_pages: usize,
}

pub type ChangeListener = Box<dyn FnMut(&Store)>;

pub struct Grid {
    initial: Vec<Vec<String>>,
    options: GridOptions,
    store: Store,
    history: History,
    filters: FilterSpec,
    sort: SortSpec,
    page: usize,
    view: View,
    selection: Selection,
    editing: Option<EditSession>,
    clipboard: Option<ClipboardPayload>,
    listeners: Vec<ChangeListener>,
    import_generation: u64,
    pending_import: Option<u64>,
    overlay_open: bool,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("options", &self.options)
            .field("rows", &self.store.row_count())
            .field("columns", &self.store.column_count())
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .field("page", &self.page)
            .field("selection", &self.selection)
            .field("editing", &self.editing)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Grid {
    /// Build a grid from initial data padded to the configured dimensions.
    /// The history starts with this store.
    pub fn new<T: AsRef<str>>(data: &[Vec<T>], options: GridOptions) -> Self {
        let initial: Vec<Vec<String>> = data
            .iter()
            .map(|row| row.iter().map(|cell| cell.as_ref().to_string()).collect())
            .collect();
        let store = Store::from_data(&initial, options.rows, options.columns);
        let history = History::new(store.clone()).with_limit(options.history_limit);
        let filters = FilterSpec::new();
        let sort = SortSpec::none();
        let view = View::compute(&store, &filters, &sort, 1, options.page_size);

        Grid {
            initial,
            options,
            store,
            history,
            filters,
            sort,
            page: 1,
            view,
            selection: Selection::default(),
            editing: None,
            clipboard: None,
            listeners: Vec::new(),
            import_generation: 0,
            pending_import: None,
            overlay_open: false,
        }
    }

    // ===== Accessors =====

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn page(&self) -> Page {
        self.view.page()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn focus(&self) -> CellAddress {
        self.selection.focus
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn clipboard_payload(&self) -> Option<&ClipboardPayload> {
        self.clipboard.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// A1-style column letters for the current width
    pub fn column_headers(&self) -> Vec<String> {
        column_headers(self.store.column_count())
    }

    /// Distinct non-blank values of a store column
    pub fn unique_values(&self, col: usize) -> Vec<String> {
        column::unique_values(self.store.rows(), col)
    }

    /// Suggested sort type for a store column
    pub fn detect_column_type(&self, col: usize) -> SortType {
        column::detect_column_type(self.store.rows(), col)
    }

    pub fn status(&self) -> GridStatus {
        let page = self.view.page();
        GridStatus {
            rows: self.store.row_count(),
            columns: self.store.column_count(),
            non_empty_rows: self.store.non_empty_row_count(),
            non_empty_columns: self.store.non_empty_column_count(),
            visible_rows: self.view.len(),
            page: page.number,
            total_pages: page.total_pages,
        }
    }

    /// Register a listener called with the new store after every mutation,
    /// undo, redo and import.
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&Store) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// While an overlay (dialog, context menu) is open, keyboard events are
    /// ignored.
    pub fn set_overlay_open(&mut self, open: bool) {
        self.overlay_open = open;
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay_open
    }

    // ===== Cell edits =====

    /// Write one cell addressed by view position
    pub fn update_cell(&mut self, addr: CellAddress, value: &str) -> bool {
        match self.view.row_id(addr.row) {
            Some(id) => self.update_cell_by_id(id, addr.col, value),
            None => false,
        }
    }

    pub fn update_cell_by_id(&mut self, id: RowId, col: usize, value: &str) -> bool {
        let next = self.store.update_cell(id, col, value);
        self.commit(next, "update cell")
    }

    // ===== Structural edits (rows addressed by view row) =====

    pub fn insert_row_above(&mut self, view_row: usize) -> bool {
        self.insert_rows_above(view_row, 1)
    }

    pub fn insert_row_below(&mut self, view_row: usize) -> bool {
        self.insert_rows_below(view_row, 1)
    }

    pub fn insert_rows_above(&mut self, view_row: usize, count: usize) -> bool {
        let Some(index) = self.store_index(view_row) else {
            return false;
        };
        let next = self.store.insert_rows(index, count, self.store.column_count());
        self.commit(next, "insert rows above")
    }

    pub fn insert_rows_below(&mut self, view_row: usize, count: usize) -> bool {
        let Some(index) = self.store_index(view_row) else {
            return false;
        };
        let next = self
            .store
            .insert_rows(index + 1, count, self.store.column_count());
        self.commit(next, "insert rows below")
    }

    pub fn add_row(&mut self) -> bool {
        self.add_rows(1)
    }

    pub fn add_rows(&mut self, count: usize) -> bool {
        let next = self
            .store
            .insert_rows(self.store.row_count(), count, self.store.column_count());
        self.commit(next, "add rows")
    }

    pub fn delete_row(&mut self, view_row: usize) -> bool {
        let Some(index) = self.store_index(view_row) else {
            return false;
        };
        let next = self.store.delete_row(index);
        self.commit(next, "delete row")
    }

    pub fn clear_row(&mut self, view_row: usize) -> bool {
        let Some(index) = self.store_index(view_row) else {
            return false;
        };
        let next = self.store.clear_row(index);
        self.commit(next, "clear row")
    }

    pub fn insert_column_left(&mut self, col: usize) -> bool {
        self.insert_columns_at(col, 1)
    }

    pub fn insert_column_right(&mut self, col: usize) -> bool {
        self.insert_columns_at(col.saturating_add(1), 1)
    }

    pub fn insert_columns_left(&mut self, col: usize, count: usize) -> bool {
        self.insert_columns_at(col, count)
    }

    pub fn insert_columns_right(&mut self, col: usize, count: usize) -> bool {
        self.insert_columns_at(col.saturating_add(1), count)
    }

    pub fn add_column(&mut self) -> bool {
        self.add_columns(1)
    }

    pub fn add_columns(&mut self, count: usize) -> bool {
        self.insert_columns_at(self.store.column_count(), count)
    }

    fn insert_columns_at(&mut self, at: usize, count: usize) -> bool {
        let at = at.min(self.store.column_count());
        let next = self.store.insert_columns(at, count);
        if next.is_same_snapshot(&self.store) {
            return false;
        }
        self.filters.shift_for_insert(at, count);
        self.sort.shift_for_insert(at, count);
        self.commit(next, "insert columns")
    }

    pub fn delete_column(&mut self, col: usize) -> bool {
        let next = self.store.delete_column(col);
        if next.is_same_snapshot(&self.store) {
            return false;
        }
        self.filters.shift_for_delete(col);
        self.sort.shift_for_delete(col);
        self.commit(next, "delete column")
    }

    pub fn clear_column(&mut self, col: usize) -> bool {
        let next = self.store.clear_column(col);
        self.commit(next, "clear column")
    }

    /// Blank every cell and reset filters and sort
    pub fn clear_all(&mut self) -> bool {
        self.filters.clear();
        self.sort = SortSpec::none();
        let next = self.store.clear_all();
        let changed = self.commit(next, "clear all");
        if !changed {
            self.recompute_view();
        }
        changed
    }

    /// Reset to the initial data (fresh row ids), filters, sort and focus
    pub fn refresh(&mut self) -> bool {
        self.filters.clear();
        self.sort = SortSpec::none();
        self.page = 1;
        self.selection = Selection::default();
        let next = Store::from_data(&self.initial, self.options.rows, self.options.columns);
        self.commit(next, "refresh")
    }

    /// Delete/Backspace: blank the selected rectangle, or the focused cell
    /// when there is no multi-cell selection.
    pub fn clear_selected_cells(&mut self) -> bool {
        let range = if self.selection.is_multi_cell() {
            self.selection.target()
        } else {
            CellRange::single(self.selection.focus)
        };
        let cells = clipboard::resolve_cells(&self.view, range);
        if cells.is_empty() {
            return false;
        }
        let next = self.store.clear_cells(&cells);
        self.commit(next, "clear cells")
    }

    // ===== History =====

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo().cloned() else {
            return false;
        };
        tracing::debug!(cursor = self.history.cursor(), "undo");
        self.store = previous;
        self.after_store_change();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo().cloned() else {
            return false;
        };
        tracing::debug!(cursor = self.history.cursor(), "redo");
        self.store = next;
        self.after_store_change();
        true
    }

    // ===== View configuration (never recorded) =====

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
        self.recompute_view();
    }

    /// Header click on `col`
    pub fn toggle_sort(&mut self, col: usize) {
        self.set_sort(self.sort.toggled(col));
    }

    pub fn set_sort_type(&mut self, sort_type: SortType) {
        self.set_sort(self.sort.with_type(sort_type));
    }

    pub fn clear_sort(&mut self) {
        self.set_sort(SortSpec::none());
    }

    pub fn set_filter(&mut self, col: usize, filter: ColumnFilter) {
        self.filters.set(col, filter);
        self.recompute_view();
    }

    pub fn set_filter_value(&mut self, col: usize, value: &str) {
        self.filters.set_value(col, value);
        self.recompute_view();
    }

    pub fn set_filter_type(&mut self, col: usize, match_type: MatchType) {
        self.filters.set_match_type(col, match_type);
        self.recompute_view();
    }

    pub fn remove_filter(&mut self, col: usize) {
        self.filters.remove(col);
        self.recompute_view();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.recompute_view();
    }

    /// Go to a 1-based page; out-of-range pages are clamped
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.recompute_view();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    // ===== Focus and selection =====

    /// Move focus without the extend modifier; drops the range
    pub fn focus_cell(&mut self, addr: CellAddress) {
        self.finish_edit_elsewhere(addr);
        let addr = self.clamp_to_view(addr);
        self.selection.move_to(addr);
    }

    /// Click: focus the cell; the range survives only with `extend`
    pub fn click(&mut self, addr: CellAddress, extend: bool) {
        self.finish_edit_elsewhere(addr);
        let addr = self.clamp_to_view(addr);
        if extend {
            self.selection.focus = addr;
        } else {
            self.selection.move_to(addr);
        }
    }

    pub fn double_click(&mut self, addr: CellAddress) -> bool {
        self.click(addr, false);
        self.begin_edit()
    }

    pub fn mouse_down(&mut self, addr: CellAddress, extend: bool) {
        self.finish_edit_elsewhere(addr);
        let addr = self.clamp_to_view(addr);
        self.selection.press(addr, extend);
    }

    pub fn mouse_enter(&mut self, addr: CellAddress) {
        let addr = self.clamp_to_view(addr);
        self.selection.drag_to(addr);
    }

    /// Global mouse-up, wherever it happened
    pub fn mouse_up(&mut self) {
        self.selection.release();
    }

    /// Keyboard navigation with wrap-around. A pending edit is committed first.
    pub fn navigate(&mut self, direction: Direction) {
        self.commit_edit();
        let next = next_focus(
            self.selection.focus,
            direction,
            self.view.len(),
            self.store.column_count(),
        );
        self.selection.move_to(next);
    }

    /// Shift+arrow: grow the range by one cell, clamped to the view
    pub fn extend_selection(&mut self, arrow: Arrow) {
        self.selection
            .extend(arrow, self.view.len(), self.store.column_count());
    }

    /// Select a rectangle programmatically; focus moves to its anchor
    pub fn select_range(&mut self, range: CellRange) {
        let range = range.clamped(self.view.len(), self.store.column_count());
        self.selection.focus = range.start;
        self.selection.range = Some(range);
    }

    // ===== Editing =====

    /// Start editing the focused cell with its current value
    pub fn begin_edit(&mut self) -> bool {
        let focus = self.selection.focus;
        let Some(row) = self.view.row(focus.row) else {
            return false;
        };
        if focus.col >= self.store.column_count() {
            return false;
        }
        self.editing = Some(EditSession {
            row_id: row.id(),
            cell: focus,
            buffer: row.cell(focus.col).to_string(),
        });
        true
    }

    /// Start editing with `text` replacing the current value (typing over a
    /// cell)
    pub fn begin_edit_with(&mut self, text: &str) -> bool {
        if !self.begin_edit() {
            return false;
        }
        self.edit_input(text)
    }

    /// Replace the edit buffer
    pub fn edit_input(&mut self, text: &str) -> bool {
        match self.editing.as_mut() {
            Some(session) => {
                session.buffer = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Write the edit buffer as one history entry
    pub fn commit_edit(&mut self) -> bool {
        let Some(session) = self.editing.take() else {
            return false;
        };
        self.update_cell_by_id(session.row_id, session.cell.col, &session.buffer)
    }

    /// Discard the edit buffer
    pub fn cancel_edit(&mut self) -> bool {
        self.editing.take().is_some()
    }

    // ===== Clipboard =====

    /// Copy the selection (or focused cell). The in-memory payload is always
    /// updated; a denied system clipboard write is ignored.
    pub fn copy(&mut self, system: &mut dyn SystemClipboard) -> String {
        let text = self.capture(ClipboardMode::Copy);
        write_system_clipboard(system, &text);
        text
    }

    /// Copy, then blank the copied cells (resolved by row id)
    pub fn cut(&mut self, system: &mut dyn SystemClipboard) -> String {
        let text = self.capture(ClipboardMode::Cut);
        write_system_clipboard(system, &text);
        text
    }

    /// Copy for a native clipboard event; the host places the text
    pub fn native_copy(&mut self) -> String {
        self.capture(ClipboardMode::Copy)
    }

    /// Cut for a native clipboard event; the host places the text
    pub fn native_cut(&mut self) -> String {
        self.capture(ClipboardMode::Cut)
    }

    /// Paste from the system clipboard, falling back to the in-memory payload
    /// when the read is denied or empty.
    pub fn paste(&mut self, system: &mut dyn SystemClipboard) -> bool {
        let from_system = match system.read_text() {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "system clipboard read denied");
                None
            }
        };
        let text = from_system.or_else(|| self.clipboard.as_ref().map(|p| p.text.clone()));
        match text {
            Some(text) => self.paste_text(&text),
            None => false,
        }
    }

    /// Paste `text` at the selection's top-left (or the focused cell).
    ///
    /// Destination rows come from the view, resolved to row ids. Columns past
    /// the store width and rows past the end of the view are dropped.
    pub fn paste_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let origin = self.selection.origin();
        let rows = clipboard::parse_clipboard_text(text);
        let block = clipboard::resolve_paste(&self.view, origin, rows);
        if block.is_empty() {
            return false;
        }
        let next = self.store.write_block(origin.col, &block);
        self.commit(next, "paste")
    }

    fn capture(&mut self, mode: ClipboardMode) -> String {
        let range = self.selection.target();
        let text = clipboard::serialize_range(&self.view, range);
        if mode == ClipboardMode::Cut {
            let cells = clipboard::resolve_cells(&self.view, range);
            let next = self.store.clear_cells(&cells);
            self.commit(next, "cut");
        }
        self.clipboard = Some(ClipboardPayload {
            text: text.clone(),
            mode,
        });
        text
    }

    // ===== Import / export =====

    /// Start an import. Any earlier ticket becomes stale.
    pub fn begin_import(&mut self) -> ImportTicket {
        self.import_generation += 1;
        self.pending_import = Some(self.import_generation);
        ImportTicket(self.import_generation)
    }

    /// Abandon an import; its result will be discarded
    pub fn cancel_import(&mut self, ticket: ImportTicket) {
        if self.pending_import == Some(ticket.0) {
            self.pending_import = None;
        }
    }

    /// Apply the JSON content read for `ticket`.
    ///
    /// Returns `Ok(false)` for a stale or cancelled ticket. A format error
    /// leaves the grid untouched. A successful import replaces the store
    /// (padded to the configured dimensions), records it, and clears filters
    /// and sort.
    pub fn finish_import(&mut self, ticket: ImportTicket, content: &str) -> Result<bool> {
        if self.pending_import != Some(ticket.0) {
            tracing::debug!(ticket = ticket.0, "stale import discarded");
            return Ok(false);
        }
        self.pending_import = None;

        let rows = match parse_import_json(content) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "import rejected");
                return Err(e);
            }
        };
        let next = Store::from_data(&rows, self.options.rows, self.options.columns);
        self.filters.clear();
        self.sort = SortSpec::none();
        Ok(self.commit(next, "import"))
    }

    /// Import JSON content synchronously
    pub fn import_json(&mut self, content: &str) -> Result<bool> {
        let ticket = self.begin_import();
        self.finish_import(ticket, content)
    }

    /// Encode the whole store (not just the view)
    pub fn export(&self, format: ExportFormat, file_name: &str) -> Result<ExportFile> {
        self.store.export(format, file_name, Utc::now())
    }

    // ===== Internals =====

    /// Canonical index of the row shown at `view_row`
    fn store_index(&self, view_row: usize) -> Option<usize> {
        self.view
            .row_id(view_row)
            .and_then(|id| self.store.find_row(id))
    }

    fn clamp_to_view(&self, addr: CellAddress) -> CellAddress {
        addr.clamped(self.view.len(), self.store.column_count())
    }

    /// Clicking away from the cell being edited commits the edit
    fn finish_edit_elsewhere(&mut self, addr: CellAddress) {
        if self
            .editing
            .as_ref()
            .is_some_and(|session| session.cell != addr)
        {
            self.commit_edit();
        }
    }

    /// Replace the store with `next` unless it is the current snapshot
    /// returned unchanged.
    fn commit(&mut self, next: Store, action: &'static str) -> bool {
        if next.is_same_snapshot(&self.store) {
            tracing::debug!(action, "nothing changed");
            return false;
        }
        self.history.record(next.clone());
        self.store = next;
        tracing::debug!(
            action,
            rows = self.store.row_count(),
            columns = self.store.column_count(),
            cursor = self.history.cursor(),
            "store committed"
        );
        self.after_store_change();
        true
    }

    fn after_store_change(&mut self) {
        self.editing = None;
        self.recompute_view();
        for listener in &mut self.listeners {
            listener(&self.store);
        }
    }

    fn recompute_view(&mut self) {
        self.view = View::compute(
            &self.store,
            &self.filters,
            &self.sort,
            self.page,
            self.options.page_size,
        );
        self.page = self.view.page().number;
        self.selection
            .clamp(self.view.len(), self.store.column_count());
    }
}

fn write_system_clipboard(system: &mut dyn SystemClipboard, text: &str) {
    if let Err(e) = system.write_text(text) {
        tracing::warn!(error = %e, "system clipboard write denied");
    }
}

//! Spreadsheet-style data grid core.
//!
//! A [`Store`] of rows with stable ids, a view pipeline (filter → sort →
//! paginate), focus and range selection, undo/redo history, clipboard
//! interchange and JSON/CSV/XLS/XLSX codecs. Rendering is left to the host:
//! it drives a [`Grid`] through its operations or the [`InputEvent`] port and
//! redraws from [`Grid::view`].
//!
//! # Examples
//!
//! ## Editing through the controller
//!
//! ```
//! use datagrid_sheet::{Grid, GridOptions};
//! use datagrid_primitives::CellAddress;
//!
//! let mut grid = Grid::new(
//!     &[vec!["Name", "Age"], vec!["Alice", "30"]],
//!     GridOptions::default(),
//! );
//!
//! grid.update_cell(CellAddress::new(1, 1), "31");
//! assert_eq!(grid.store().cell(1, 1), Some("31"));
//!
//! grid.undo();
//! assert_eq!(grid.store().cell(1, 1), Some("30"));
//! ```
//!
//! ## Sorting and filtering
//!
//! ```
//! use datagrid_sheet::{ColumnFilter, Grid, GridOptions, MatchType};
//!
//! let mut grid = Grid::new(
//!     &[vec!["pear"], vec!["apple"], vec!["plum"]],
//!     GridOptions::default().with_rows(0).with_columns(0),
//! );
//!
//! grid.toggle_sort(0);
//! grid.set_filter(0, ColumnFilter::new(MatchType::StartsWith, "p"));
//!
//! let visible: Vec<&str> = grid.view().rows().iter().map(|row| row.cell(0)).collect();
//! assert_eq!(visible, vec!["pear", "plum"]);
//! ```
//!
//! ## Pure store operations
//!
//! ```
//! use datagrid_sheet::Store;
//!
//! let store = Store::from_data(&[vec!["a", "b"]], 1, 2);
//! let wider = store.insert_column_right(0);
//! assert_eq!(wider.to_array(), vec![vec!["a", "", "b"]]);
//! // the input snapshot is untouched
//! assert_eq!(store.column_count(), 2);
//! ```

mod clipboard;
mod column;
mod csv;
mod error;
mod export;
mod grid;
mod history;
mod input;
mod json;
mod menu;
mod navigation;
mod ops;
mod prefs;
mod row;
mod selection;
mod store;
mod value;
mod view;
mod xls;
#[cfg(not(target_arch = "wasm32"))]
mod xlsx;

pub use clipboard::{
    parse_clipboard_text, resolve_cells, resolve_paste, serialize_range, ClipboardMode,
    ClipboardPayload, MemoryClipboard, NoSystemClipboard, SystemClipboard,
};
pub use column::{detect_column_type, unique_values};
pub use error::{GridError, Result};
pub use export::{ExportFile, ExportFormat};
pub use grid::{ChangeListener, EditSession, Grid, GridOptions, GridStatus, ImportTicket};
pub use history::History;
pub use input::{InputEvent, InputOutcome, Key, Modifiers};
pub use json::parse_import_json;
pub use menu::{ContextAction, CONTEXT_MENU};
pub use navigation::{next_focus, Direction};
pub use prefs::{
    dark_mode, set_dark_mode, toggle_dark_mode, JsonFilePreferences, MemoryPreferences,
    PreferenceStore, DARK_MODE_KEY,
};
pub use row::{Row, RowId};
pub use selection::{Arrow, Selection};
pub use store::Store;
pub use value::{is_blank, is_number, parse_date_millis, parse_number};
pub use view::{
    filter_rows, paginate, sort_rows, ColumnFilter, FilterSpec, MatchType, Page, SortDirection,
    SortSpec, SortType, View, DEFAULT_PAGE_SIZE,
};
#[cfg(not(target_arch = "wasm32"))]
pub use xlsx::SHEET_NAME;

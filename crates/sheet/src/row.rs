use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ROW_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a row, independent of its position in the store or
/// in any filtered/sorted view.
///
/// Ids come from a process-wide monotonic counter and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(u64);

impl RowId {
    /// Allocate a fresh, never-before-seen id.
    #[must_use]
    pub fn fresh() -> Self {
        RowId(NEXT_ROW_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row_{}", self.0)
    }
}

/// One row of the grid. Rows are immutable once built; an edit produces a new
/// `Row` carrying the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    id: RowId,
    cells: Vec<String>,
}

impl Row {
    /// A new row of `columns` empty cells with a fresh id
    #[must_use]
    pub fn blank(columns: usize) -> Self {
        Self::with_cells(vec![String::new(); columns])
    }

    /// A new row with a fresh id
    #[must_use]
    pub fn with_cells(cells: Vec<String>) -> Self {
        Row {
            id: RowId::fresh(),
            cells,
        }
    }

    /// Same identity, replacement cells
    #[must_use]
    pub(crate) fn with_same_id(&self, cells: Vec<String>) -> Self {
        Row { id: self.id, cells }
    }

    #[must_use]
    pub fn id(&self) -> RowId {
        self.id
    }

    #[must_use]
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Cell text, or "" past the end
    #[must_use]
    pub fn cell(&self, col: usize) -> &str {
        self.cells.get(col).map_or("", String::as_str)
    }

    /// Whether any cell holds non-blank text
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.cells.iter().any(|cell| !cell.trim().is_empty())
    }
}

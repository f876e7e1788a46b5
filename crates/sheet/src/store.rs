use crate::row::{Row, RowId};
use std::sync::Arc;

/// The canonical table of rows.
///
/// A `Store` is a snapshot: mutation operations (see `ops.rs`) take `&self` and
/// return a new `Store`. Untouched rows are shared between snapshots through
/// `Arc`, so keeping old snapshots in the history costs one pointer per row.
///
/// Invariants: every row has exactly `columns` cells, and there is always at
/// least one row and one column.
#[derive(Debug, Clone)]
pub struct Store {
    rows: Vec<Arc<Row>>,
    columns: usize,
}

impl Store {
    /// A blank store of the given shape (at least 1x1)
    #[must_use]
    pub fn new(rows: usize, columns: usize) -> Self {
        Self::from_data::<String>(&[], rows, columns)
    }

    /// Build a store from raw rows, padded to at least `rows` x `columns`.
    ///
    /// The actual shape is the larger of the requested size and the data's own
    /// extent; short rows are padded with empty cells.
    ///
    /// # Example
    /// ```
    /// use datagrid_sheet::Store;
    ///
    /// let store = Store::from_data(&[vec!["a", "b"], vec!["c"]], 3, 1);
    /// assert_eq!(store.row_count(), 3);
    /// assert_eq!(store.column_count(), 2);
    /// assert_eq!(store.cell(1, 1), Some(""));
    /// ```
    #[must_use]
    pub fn from_data<T: AsRef<str>>(data: &[Vec<T>], rows: usize, columns: usize) -> Self {
        let data_columns = data.iter().map(Vec::len).max().unwrap_or(0);
        let row_count = rows.max(data.len()).max(1);
        let columns = columns.max(data_columns).max(1);

        let rows = (0..row_count)
            .map(|r| {
                let source = data.get(r);
                let cells = (0..columns)
                    .map(|c| {
                        source
                            .and_then(|row| row.get(c))
                            .map(|cell| cell.as_ref().to_string())
                            .unwrap_or_default()
                    })
                    .collect();
                Arc::new(Row::with_cells(cells))
            })
            .collect();

        Store { rows, columns }
    }

    pub(crate) fn from_parts(rows: Vec<Arc<Row>>, columns: usize) -> Self {
        debug_assert!(rows.iter().all(|row| row.cells().len() == columns));
        Store { rows, columns }
    }

    /// Number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Arc<Row>] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Arc<Row>> {
        self.rows.get(index)
    }

    /// Position of a row id in store order
    #[must_use]
    pub fn find_row(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    #[must_use]
    pub fn row_by_id(&self, id: RowId) -> Option<&Arc<Row>> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Cell text by store position
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.cells().get(col))
            .map(String::as_str)
    }

    /// Plain cell grid (row ids dropped)
    #[must_use]
    pub fn to_array(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|row| row.cells().to_vec()).collect()
    }

    /// Equal cell contents, ignoring row ids
    #[must_use]
    pub fn content_eq(&self, other: &Store) -> bool {
        self.columns == other.columns
            && self.rows.len() == other.rows.len()
            && self
                .rows
                .iter()
                .zip(&other.rows)
                .all(|(a, b)| a.cells() == b.cells())
    }

    /// Same shape and the very same row allocations, i.e. `other` is this
    /// snapshot returned unchanged by a no-op mutation.
    #[must_use]
    pub fn is_same_snapshot(&self, other: &Store) -> bool {
        self.columns == other.columns
            && self.rows.len() == other.rows.len()
            && self
                .rows
                .iter()
                .zip(&other.rows)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }

    /// Rows with at least one non-blank cell
    #[must_use]
    pub fn non_empty_row_count(&self) -> usize {
        self.rows.iter().filter(|row| row.has_content()).count()
    }

    /// Columns with at least one non-blank cell
    #[must_use]
    pub fn non_empty_column_count(&self) -> usize {
        (0..self.columns)
            .filter(|&col| self.rows.iter().any(|row| !row.cell(col).trim().is_empty()))
            .count()
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_data_pads_to_requested_shape() {
        let store = Store::from_data(&[vec!["a"]], 3, 4);
        assert_eq!(store.row_count(), 3);
        assert_eq!(store.column_count(), 4);
        assert!(store.rows().iter().all(|row| row.cells().len() == 4));
        assert_eq!(store.cell(0, 0), Some("a"));
        assert_eq!(store.cell(2, 3), Some(""));
    }

    #[test]
    fn test_from_data_grows_to_data_extent() {
        let store = Store::from_data(&[vec!["a", "b", "c"], vec!["d"]], 1, 1);
        assert_eq!(store.row_count(), 2);
        assert_eq!(store.column_count(), 3);
        assert_eq!(store.cell(1, 2), Some(""));
    }

    #[test]
    fn test_empty_data_floors_at_one_cell() {
        let store = Store::from_data::<&str>(&[], 0, 0);
        assert_eq!(store.row_count(), 1);
        assert_eq!(store.column_count(), 1);
    }

    #[test]
    fn test_row_ids_unique() {
        let store = Store::new(50, 2);
        let mut ids: Vec<_> = store.rows().iter().map(|r| r.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_find_row_and_counts() {
        let store = Store::from_data(&[vec!["", ""], vec!["", "x"], vec![" ", ""]], 0, 0);
        let id = store.rows()[1].id();
        assert_eq!(store.find_row(id), Some(1));
        assert_eq!(store.non_empty_row_count(), 1);
        assert_eq!(store.non_empty_column_count(), 1);
    }

    #[test]
    fn test_snapshot_identity() {
        let store = Store::from_data(&[vec!["a"]], 2, 1);
        let copy = store.clone();
        assert!(store.is_same_snapshot(&copy));

        let rebuilt = Store::from_data(&[vec!["a"]], 2, 1);
        assert!(store.content_eq(&rebuilt));
        assert!(!store.is_same_snapshot(&rebuilt));
    }
}

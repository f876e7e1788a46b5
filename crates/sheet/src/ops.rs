//! Mutation operations.
//!
//! Every operation takes the current store by reference and returns a new
//! store. Rows whose cells change are rebuilt; all other rows are shared with
//! the input. Operations that cannot apply (unknown row id, index out of range,
//! deleting the last row or column) return a clone of the input, which
//! `Store::is_same_snapshot` recognises as "nothing happened".

use crate::row::{Row, RowId};
use crate::store::Store;
use std::sync::Arc;

impl Store {
    /// Replace one cell, located by row id. Writing the value a cell already
    /// holds changes nothing.
    #[must_use]
    pub fn update_cell(&self, id: RowId, col: usize, value: &str) -> Store {
        let unchanged = self
            .row_by_id(id)
            .and_then(|row| row.cells().get(col))
            .is_none_or(|current| current == value);
        if unchanged {
            return self.clone();
        }
        self.map_row_by_id(id, |row| {
            let mut cells = row.cells().to_vec();
            cells[col] = value.to_string();
            cells
        })
    }

    /// Insert one blank row of `columns` cells at `index`
    #[must_use]
    pub fn insert_row_above(&self, index: usize, columns: usize) -> Store {
        self.insert_rows(index, 1, columns)
    }

    /// Insert one blank row of `columns` cells after `index`
    #[must_use]
    pub fn insert_row_below(&self, index: usize, columns: usize) -> Store {
        self.insert_rows(index.saturating_add(1), 1, columns)
    }

    /// Insert `count` blank rows starting at `at` (clamped to the end)
    #[must_use]
    pub fn insert_rows(&self, at: usize, count: usize, columns: usize) -> Store {
        if count == 0 {
            return self.clone();
        }
        let width = self.column_count();
        if columns != width {
            // New rows always match the store width.
            tracing::debug!(requested = columns, width, "row width adjusted to store");
        }
        let at = at.min(self.row_count());
        let mut rows = self.rows().to_vec();
        rows.splice(at..at, (0..count).map(|_| Arc::new(Row::blank(width))));
        Store::from_parts(rows, self.column_count())
    }

    /// Append one blank row
    #[must_use]
    pub fn add_row(&self, columns: usize) -> Store {
        self.insert_rows(self.row_count(), 1, columns)
    }

    /// Insert one empty column at `col`
    #[must_use]
    pub fn insert_column_left(&self, col: usize) -> Store {
        self.insert_columns(col, 1)
    }

    /// Insert one empty column after `col`
    #[must_use]
    pub fn insert_column_right(&self, col: usize) -> Store {
        self.insert_columns(col.saturating_add(1), 1)
    }

    /// Insert `count` empty columns starting at `at` (clamped to the end)
    #[must_use]
    pub fn insert_columns(&self, at: usize, count: usize) -> Store {
        if count == 0 {
            return self.clone();
        }
        let at = at.min(self.column_count());
        let rows = self
            .rows()
            .iter()
            .map(|row| {
                let mut cells = row.cells().to_vec();
                cells.splice(at..at, std::iter::repeat(String::new()).take(count));
                Arc::new(row.with_same_id(cells))
            })
            .collect();
        Store::from_parts(rows, self.column_count() + count)
    }

    /// Append one empty column
    #[must_use]
    pub fn add_column(&self) -> Store {
        self.add_columns(1)
    }

    /// Append `count` empty columns
    #[must_use]
    pub fn add_columns(&self, count: usize) -> Store {
        self.insert_columns(self.column_count(), count)
    }

    /// Remove the row at `index`; refuses to remove the last row
    #[must_use]
    pub fn delete_row(&self, index: usize) -> Store {
        if self.row_count() <= 1 || index >= self.row_count() {
            return self.clone();
        }
        let mut rows = self.rows().to_vec();
        rows.remove(index);
        Store::from_parts(rows, self.column_count())
    }

    /// Remove the column at `col`; refuses to remove the last column
    #[must_use]
    pub fn delete_column(&self, col: usize) -> Store {
        if self.column_count() <= 1 || col >= self.column_count() {
            return self.clone();
        }
        let rows = self
            .rows()
            .iter()
            .map(|row| {
                let mut cells = row.cells().to_vec();
                cells.remove(col);
                Arc::new(row.with_same_id(cells))
            })
            .collect();
        Store::from_parts(rows, self.column_count() - 1)
    }

    /// Blank every cell, keeping shape and row ids. Rows that are already
    /// empty stay shared, so clearing an empty store returns it unchanged.
    #[must_use]
    pub fn clear_all(&self) -> Store {
        let columns = self.column_count();
        self.rewrite_rows(|row| {
            if is_empty_row(row) {
                None
            } else {
                Some(vec![String::new(); columns])
            }
        })
    }

    /// Blank every cell of one row
    #[must_use]
    pub fn clear_row(&self, index: usize) -> Store {
        match self.row(index) {
            Some(row) if !is_empty_row(row) => {
                let id = row.id();
                let columns = self.column_count();
                self.map_row_by_id(id, |_| vec![String::new(); columns])
            }
            _ => self.clone(),
        }
    }

    /// Blank one column in every row
    #[must_use]
    pub fn clear_column(&self, col: usize) -> Store {
        if col >= self.column_count() {
            return self.clone();
        }
        let cells: Vec<(RowId, usize)> = self.rows().iter().map(|row| (row.id(), col)).collect();
        self.clear_cells(&cells)
    }

    /// Blank a set of cells addressed by row id. Unknown ids, columns out of
    /// range and cells that are already empty are skipped.
    #[must_use]
    pub fn clear_cells(&self, cells: &[(RowId, usize)]) -> Store {
        let columns = self.column_count();
        self.rewrite_rows(|row| {
            let targets: Vec<usize> = cells
                .iter()
                .filter(|(id, col)| *id == row.id() && *col < columns)
                .map(|(_, col)| *col)
                .filter(|col| !row.cell(*col).is_empty())
                .collect();
            if targets.is_empty() {
                return None;
            }
            let mut updated = row.cells().to_vec();
            for col in targets {
                updated[col].clear();
            }
            Some(updated)
        })
    }

    /// Write a block of values, one entry per destination row id, starting at
    /// `origin_col`. Values past the last column are dropped; unknown ids are
    /// skipped.
    #[must_use]
    pub fn write_block(&self, origin_col: usize, block: &[(RowId, Vec<String>)]) -> Store {
        let columns = self.column_count();
        self.rewrite_rows(|row| {
            let mut updated: Option<Vec<String>> = None;
            for (_, values) in block.iter().filter(|(id, _)| *id == row.id()) {
                let cells = updated.get_or_insert_with(|| row.cells().to_vec());
                for (offset, value) in values.iter().enumerate() {
                    let col = origin_col + offset;
                    if col >= columns {
                        break;
                    }
                    cells[col].clone_from(value);
                }
            }
            updated
        })
    }

    fn map_row_by_id<F>(&self, id: RowId, f: F) -> Store
    where
        F: FnOnce(&Row) -> Vec<String>,
    {
        let Some(index) = self.find_row(id) else {
            return self.clone();
        };
        let mut rows = self.rows().to_vec();
        let cells = f(&rows[index]);
        rows[index] = Arc::new(rows[index].with_same_id(cells));
        Store::from_parts(rows, self.column_count())
    }

    /// Rebuild only the rows for which `f` returns new cells
    fn rewrite_rows<F>(&self, mut f: F) -> Store
    where
        F: FnMut(&Row) -> Option<Vec<String>>,
    {
        let rows = self
            .rows()
            .iter()
            .map(|row| match f(row) {
                Some(cells) => Arc::new(row.with_same_id(cells)),
                None => Arc::clone(row),
            })
            .collect();
        Store::from_parts(rows, self.column_count())
    }
}

fn is_empty_row(row: &Row) -> bool {
    row.cells().iter().all(String::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Store {
        Store::from_data(&[vec!["a", "b"], vec!["c", "d"], vec!["e", "f"]], 0, 0)
    }

    #[test]
    fn test_update_cell_copies_only_touched_row() {
        let store = sample();
        let id = store.rows()[1].id();
        let updated = store.update_cell(id, 0, "X");

        assert_eq!(updated.cell(1, 0), Some("X"));
        assert_eq!(store.cell(1, 0), Some("c"));
        assert!(Arc::ptr_eq(&store.rows()[0], &updated.rows()[0]));
        assert!(Arc::ptr_eq(&store.rows()[2], &updated.rows()[2]));
        assert!(!Arc::ptr_eq(&store.rows()[1], &updated.rows()[1]));
        assert_eq!(updated.rows()[1].id(), id);
    }

    #[test]
    fn test_update_cell_unknown_id_is_noop() {
        let store = sample();
        let other = Store::new(1, 1);
        let updated = store.update_cell(other.rows()[0].id(), 0, "X");
        assert!(store.is_same_snapshot(&updated));
    }

    #[test]
    fn test_update_cell_same_value_is_noop() {
        let store = sample();
        let id = store.rows()[0].id();
        assert!(store.is_same_snapshot(&store.update_cell(id, 0, "a")));
        assert!(store.is_same_snapshot(&store.update_cell(id, 5, "z")));
    }

    #[test]
    fn test_insert_rows() {
        let store = sample();
        let above = store.insert_row_above(1, 2);
        assert_eq!(above.row_count(), 4);
        assert_eq!(above.cell(1, 0), Some(""));
        assert_eq!(above.cell(2, 0), Some("c"));

        let below = store.insert_row_below(2, 2);
        assert_eq!(below.cell(3, 1), Some(""));
        assert_eq!(below.row_count(), 4);

        let many = store.insert_rows(0, 3, 2);
        assert_eq!(many.row_count(), 6);
        assert_eq!(many.cell(3, 0), Some("a"));

        let appended = store.add_row(2);
        assert_eq!(appended.row_count(), 4);
        assert_eq!(appended.cell(0, 0), Some("a"));
    }

    #[test]
    fn test_insert_row_uses_store_width() {
        let store = sample();
        let inserted = store.insert_row_above(0, 7);
        assert_eq!(inserted.rows()[0].cells().len(), 2);
    }

    #[test]
    fn test_insert_rows_past_end_is_clamped() {
        let store = sample();
        let inserted = store.insert_row_below(99, 2);
        assert_eq!(inserted.row_count(), 4);
        assert_eq!(inserted.cell(3, 0), Some(""));
    }

    #[test]
    fn test_insert_columns_keep_rows_in_lock_step() {
        let store = sample();
        let left = store.insert_column_left(1);
        assert_eq!(left.column_count(), 3);
        assert!(left.rows().iter().all(|row| row.cells().len() == 3));
        assert_eq!(left.cell(0, 1), Some(""));
        assert_eq!(left.cell(0, 2), Some("b"));

        let right = store.insert_column_right(1);
        assert_eq!(right.cell(0, 2), Some(""));

        let added = store.add_columns(5);
        assert_eq!(added.column_count(), 7);
        assert_eq!(added.rows()[0].id(), store.rows()[0].id());
    }

    #[test]
    fn test_delete_row_and_column_floor() {
        let single = Store::from_data(&[vec!["x"]], 1, 1);
        assert!(single.is_same_snapshot(&single.delete_row(0)));
        assert!(single.is_same_snapshot(&single.delete_column(0)));

        let store = sample();
        let fewer = store.delete_row(0);
        assert_eq!(fewer.row_count(), 2);
        assert_eq!(fewer.cell(0, 0), Some("c"));

        let narrower = store.delete_column(0);
        assert_eq!(narrower.column_count(), 1);
        assert_eq!(narrower.cell(2, 0), Some("f"));
    }

    #[test]
    fn test_delete_out_of_range_is_noop() {
        let store = sample();
        assert!(store.is_same_snapshot(&store.delete_row(3)));
        assert!(store.is_same_snapshot(&store.delete_column(2)));
    }

    #[test]
    fn test_insert_then_delete_restores_content() {
        let store = sample();
        let round_trip = store.insert_row_above(1, 2).delete_row(1);
        assert!(store.content_eq(&round_trip));
    }

    #[test]
    fn test_clear_variants() {
        let store = sample();
        let cleared = store.clear_all();
        assert_eq!(cleared.row_count(), 3);
        assert!(cleared.rows().iter().all(|row| !row.has_content()));
        assert_eq!(cleared.rows()[2].id(), store.rows()[2].id());

        let row_cleared = store.clear_row(1);
        assert_eq!(row_cleared.to_array()[1], vec!["", ""]);
        assert!(Arc::ptr_eq(&store.rows()[0], &row_cleared.rows()[0]));

        let col_cleared = store.clear_column(1);
        assert_eq!(col_cleared.cell(0, 0), Some("a"));
        assert_eq!(col_cleared.cell(2, 1), Some(""));
    }

    #[test]
    fn test_clear_cells_by_id() {
        let store = sample();
        let target = store.rows()[2].id();
        let cleared = store.clear_cells(&[(target, 1), (target, 9)]);
        assert_eq!(cleared.cell(2, 0), Some("e"));
        assert_eq!(cleared.cell(2, 1), Some(""));
        assert!(Arc::ptr_eq(&store.rows()[1], &cleared.rows()[1]));
    }

    #[test]
    fn test_clearing_empty_cells_is_noop() {
        let blank = Store::new(3, 2);
        assert!(blank.clear_all().is_same_snapshot(&blank));
        assert!(blank.clear_row(1).is_same_snapshot(&blank));
        assert!(blank.clear_column(0).is_same_snapshot(&blank));

        let store = Store::from_data(&[vec!["a", ""], vec!["", ""]], 0, 0);
        let first = store.rows()[0].id();
        let second = store.rows()[1].id();
        assert!(store.clear_cells(&[(first, 1), (second, 0)]).is_same_snapshot(&store));
        assert!(store.clear_row(1).is_same_snapshot(&store));

        let cleared = store.clear_all();
        assert!(!cleared.is_same_snapshot(&store));
        assert!(Arc::ptr_eq(&store.rows()[1], &cleared.rows()[1]));
        assert!(cleared.clear_all().is_same_snapshot(&cleared));
    }

    #[test]
    fn test_write_block_clips_at_last_column() {
        let store = sample();
        let id = store.rows()[0].id();
        let written = store.write_block(1, &[(id, vec!["p".into(), "q".into()])]);
        assert_eq!(written.cell(0, 1), Some("p"));
        assert_eq!(written.column_count(), 2);
        assert!(Arc::ptr_eq(&store.rows()[1], &written.rows()[1]));
    }
}

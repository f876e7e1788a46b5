//! # Datagrid Primitives
//!
//! Value types shared by the grid core and its hosts: cell addresses in view
//! coordinates, rectangular ranges, and A1-style column naming.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod address;

pub use address::{column_headers, column_index_to_letters, column_letters_to_index};

/// A cell position (0-based row and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellAddress {
    pub row: usize,
    pub col: usize,
}

impl CellAddress {
    /// Create a new cell address
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse from A1 notation (e.g., "A1", "B2")
    pub fn from_a1(s: &str) -> Result<Self, AddressError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AddressError::InvalidRange("Empty A1 reference".to_string()));
        }

        let split = trimmed
            .find(|ch: char| !ch.is_ascii_alphabetic())
            .ok_or_else(|| AddressError::InvalidRow(trimmed.to_string()))?;
        let (col_letters, row_digits) = trimmed.split_at(split);

        if col_letters.is_empty() {
            return Err(AddressError::InvalidColumn(trimmed.to_string()));
        }
        if row_digits.is_empty() || !row_digits.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(AddressError::InvalidRow(trimmed.to_string()));
        }

        let row_num: usize = row_digits
            .parse()
            .map_err(|_| AddressError::InvalidRow(row_digits.to_string()))?;
        if row_num == 0 {
            return Err(AddressError::InvalidRow(row_digits.to_string()));
        }

        Ok(Self {
            row: row_num - 1,
            col: column_letters_to_index(col_letters)?,
        })
    }

    /// Convert to A1 notation
    pub fn to_a1(&self) -> String {
        format!("{}{}", column_index_to_letters(self.col), self.row + 1)
    }

    /// Clamp into a `rows` x `cols` area. Empty dimensions clamp to 0.
    #[must_use]
    pub fn clamped(self, rows: usize, cols: usize) -> Self {
        Self {
            row: self.row.min(rows.saturating_sub(1)),
            col: self.col.min(cols.saturating_sub(1)),
        }
    }
}

/// A rectangle of cells defined by two corners in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new cell range
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self { start, end }
    }

    /// A range covering exactly one cell
    pub fn single(cell: CellAddress) -> Self {
        Self::new(cell, cell)
    }

    /// Parse "A1:B3" (or a single "A1")
    pub fn from_a1(s: &str) -> Result<Self, AddressError> {
        match s.split_once(':') {
            Some((start, end)) => Ok(Self::new(
                CellAddress::from_a1(start)?,
                CellAddress::from_a1(end)?,
            )),
            None => CellAddress::from_a1(s).map(Self::single),
        }
    }

    /// Return a normalized range where start <= end
    pub fn normalized(&self) -> Self {
        Self {
            start: CellAddress::new(
                self.start.row.min(self.end.row),
                self.start.col.min(self.end.col),
            ),
            end: CellAddress::new(
                self.start.row.max(self.end.row),
                self.start.col.max(self.end.col),
            ),
        }
    }

    /// Top-left corner
    pub fn top_left(&self) -> CellAddress {
        self.normalized().start
    }

    /// Number of rows in the range
    pub fn rows(&self) -> usize {
        let range = self.normalized();
        range.end.row - range.start.row + 1
    }

    /// Number of columns in the range
    pub fn cols(&self) -> usize {
        let range = self.normalized();
        range.end.col - range.start.col + 1
    }

    /// Whether the range covers more than one cell
    pub fn is_multi_cell(&self) -> bool {
        self.start != self.end
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        let range = self.normalized();
        addr.row >= range.start.row
            && addr.row <= range.end.row
            && addr.col >= range.start.col
            && addr.col <= range.end.col
    }

    /// Get total number of cells in range
    pub fn size(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Clamp both corners into a `rows` x `cols` area
    #[must_use]
    pub fn clamped(self, rows: usize, cols: usize) -> Self {
        Self::new(self.start.clamped(rows, cols), self.end.clamped(rows, cols))
    }

    /// Iterate over all addresses in row-major order
    pub fn iter(&self) -> CellRangeIter {
        let range = self.normalized();
        CellRangeIter {
            current: range.start,
            start: range.start,
            end: range.end,
            done: false,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid column: {0}")]
    InvalidColumn(String),
    #[error("Invalid row: {0}")]
    InvalidRow(String),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Iterator over a cell range in row-major order
pub struct CellRangeIter {
    current: CellAddress,
    start: CellAddress,
    end: CellAddress,
    done: bool,
}

impl Iterator for CellRangeIter {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        if self.current == self.end {
            self.done = true;
            return Some(result);
        }

        if self.current.col < self.end.col {
            self.current.col += 1;
        } else {
            self.current.col = self.start.col;
            self.current.row += 1;
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_range_contains() {
        let range = CellRange::new(
            CellAddress::new(1, 1), // B2
            CellAddress::new(3, 3), // D4
        );

        assert!(range.contains(&CellAddress::new(2, 2)));
        assert!(!range.contains(&CellAddress::new(0, 0)));
        assert!(!range.contains(&CellAddress::new(4, 4)));
    }

    #[test]
    fn test_range_normalized_contains() {
        let range = CellRange::new(CellAddress::new(3, 3), CellAddress::new(1, 1));
        assert!(range.contains(&CellAddress::new(2, 2)));
        assert_eq!(range.rows(), 3);
        assert_eq!(range.cols(), 3);
        assert_eq!(range.top_left(), CellAddress::new(1, 1));
    }

    #[test]
    fn test_range_iter_row_major() {
        let range = CellRange::new(CellAddress::new(1, 1), CellAddress::new(0, 0));
        let cells: Vec<_> = range.iter().collect();
        assert_eq!(
            cells,
            vec![
                CellAddress::new(0, 0),
                CellAddress::new(0, 1),
                CellAddress::new(1, 0),
                CellAddress::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_clamped() {
        let addr = CellAddress::new(10, 7).clamped(3, 2);
        assert_eq!(addr, CellAddress::new(2, 1));
        assert_eq!(CellAddress::new(4, 4).clamped(0, 0), CellAddress::new(0, 0));
    }
}

//! Keyboard focus movement. Every move wraps around the view edges.

use crate::selection::Arrow;
use datagrid_primitives::CellAddress;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    /// Next column, then the first column of the next row
    Tab,
    /// Previous column, then the last column of the previous row
    ShiftTab,
    /// Next row, same column
    Enter,
}

impl From<Arrow> for Direction {
    fn from(arrow: Arrow) -> Self {
        match arrow {
            Arrow::Up => Direction::Up,
            Arrow::Down => Direction::Down,
            Arrow::Left => Direction::Left,
            Arrow::Right => Direction::Right,
        }
    }
}

/// The cell focus moves to from `focus` in a `rows` x `cols` view.
///
/// An empty view leaves focus at the origin.
pub fn next_focus(focus: CellAddress, direction: Direction, rows: usize, cols: usize) -> CellAddress {
    if rows == 0 || cols == 0 {
        return CellAddress::default();
    }
    let CellAddress { row, col } = focus.clamped(rows, cols);
    let next_row = |r: usize| if r + 1 < rows { r + 1 } else { 0 };
    let prev_row = |r: usize| if r > 0 { r - 1 } else { rows - 1 };

    match direction {
        Direction::Up => CellAddress::new(prev_row(row), col),
        Direction::Down | Direction::Enter => CellAddress::new(next_row(row), col),
        Direction::Left => CellAddress::new(row, if col > 0 { col - 1 } else { cols - 1 }),
        Direction::Right => CellAddress::new(row, if col + 1 < cols { col + 1 } else { 0 }),
        Direction::Tab => {
            if col + 1 < cols {
                CellAddress::new(row, col + 1)
            } else {
                CellAddress::new(next_row(row), 0)
            }
        }
        Direction::ShiftTab => {
            if col > 0 {
                CellAddress::new(row, col - 1)
            } else {
                CellAddress::new(prev_row(row), cols - 1)
            }
        }
    }
}

//! Focus and range selection in view coordinates.

use datagrid_primitives::{CellAddress, CellRange};
use serde::{Deserialize, Serialize};

/// Arrow directions for range extension and navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Arrow {
    Up,
    Down,
    Left,
    Right,
}

/// The focused cell plus an optional selection rectangle.
///
/// `range.start` is the anchor and `range.end` the moving corner; the
/// rectangle itself is direction-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub focus: CellAddress,
    pub range: Option<CellRange>,
    pub dragging: bool,
}

impl Selection {
    /// Plain navigation: move focus and drop the range
    pub fn move_to(&mut self, addr: CellAddress) {
        self.focus = addr;
        self.range = None;
    }

    /// Mouse press. Without `extend` both endpoints collapse onto the pressed
    /// cell; with it the range runs from the focused cell to the pressed one,
    /// replacing any earlier anchor.
    pub fn press(&mut self, addr: CellAddress, extend: bool) {
        let start = if extend {
            self.focus
        } else {
            self.focus = addr;
            addr
        };
        self.range = Some(CellRange::new(start, addr));
        self.dragging = true;
    }

    /// Pointer moved onto `addr`; only matters while dragging
    pub fn drag_to(&mut self, addr: CellAddress) {
        if !self.dragging {
            return;
        }
        if let Some(range) = self.range.as_mut() {
            range.end = addr;
        }
    }

    /// Global mouse-up; ends any drag wherever it happened
    pub fn release(&mut self) {
        self.dragging = false;
    }

    /// Keyboard extension: move `end` by one cell, clamped to
    /// `rows` x `cols`. A missing range starts at the focus.
    pub fn extend(&mut self, arrow: Arrow, rows: usize, cols: usize) {
        let mut range = self
            .range
            .unwrap_or_else(|| CellRange::single(self.focus));
        let end = &mut range.end;
        match arrow {
            Arrow::Up => end.row = end.row.saturating_sub(1),
            Arrow::Down => end.row = (end.row + 1).min(rows.saturating_sub(1)),
            Arrow::Left => end.col = end.col.saturating_sub(1),
            Arrow::Right => end.col = (end.col + 1).min(cols.saturating_sub(1)),
        }
        self.range = Some(range);
    }

    /// Re-validate against new view bounds. An empty view clamps to row 0.
    pub fn clamp(&mut self, rows: usize, cols: usize) {
        self.focus = self.focus.clamped(rows, cols);
        self.range = self.range.map(|range| range.clamped(rows, cols));
    }

    /// The normalized rectangle, or `None` without a range
    pub fn rectangle(&self) -> Option<CellRange> {
        self.range.map(|range| range.normalized())
    }

    /// The rectangle, or the focused cell alone
    pub fn target(&self) -> CellRange {
        self.rectangle()
            .unwrap_or_else(|| CellRange::single(self.focus))
    }

    /// Top-left of the target area (paste origin)
    pub fn origin(&self) -> CellAddress {
        self.target().top_left()
    }

    pub fn is_multi_cell(&self) -> bool {
        self.range.is_some_and(|range| range.is_multi_cell())
    }

    pub fn contains(&self, addr: CellAddress) -> bool {
        self.rectangle().is_some_and(|range| range.contains(&addr))
    }
}

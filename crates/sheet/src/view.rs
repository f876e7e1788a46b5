//! The view pipeline: filter → sort → paginate.
//!
//! All three stages are pure functions over shared rows; the canonical store
//! is never touched. A [`View`] is recomputed from scratch whenever the store,
//! the filters, the sort or the page changes.

use crate::error::GridError;
use crate::row::{Row, RowId};
use crate::store::Store;
use crate::value::{is_blank, parse_date_millis, parse_number};
use datagrid_primitives::{CellAddress, CellRange};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Rows per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 500;

// ===== Filter stage =====

/// How a column filter compares cell text against its match value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchType {
    #[default]
    Contains,
    Equals,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    NotEmpty,
    Empty,
}

impl MatchType {
    pub const ALL: [MatchType; 8] = [
        MatchType::Contains,
        MatchType::Equals,
        MatchType::StartsWith,
        MatchType::EndsWith,
        MatchType::GreaterThan,
        MatchType::LessThan,
        MatchType::NotEmpty,
        MatchType::Empty,
    ];

    /// Wire name, as accepted by `FromStr`
    pub fn name(self) -> &'static str {
        match self {
            MatchType::Contains => "contains",
            MatchType::Equals => "equals",
            MatchType::StartsWith => "startsWith",
            MatchType::EndsWith => "endsWith",
            MatchType::GreaterThan => "greaterThan",
            MatchType::LessThan => "lessThan",
            MatchType::NotEmpty => "notEmpty",
            MatchType::Empty => "empty",
        }
    }

    /// Human label for filter menus
    pub fn label(self) -> &'static str {
        match self {
            MatchType::Contains => "Contains",
            MatchType::Equals => "Equals",
            MatchType::StartsWith => "Starts With",
            MatchType::EndsWith => "Ends With",
            MatchType::GreaterThan => "Greater Than",
            MatchType::LessThan => "Less Than",
            MatchType::NotEmpty => "Not Empty",
            MatchType::Empty => "Empty",
        }
    }

    /// `NotEmpty` and `Empty` test the cell alone and ignore the match value
    pub fn uses_value(self) -> bool {
        !matches!(self, MatchType::NotEmpty | MatchType::Empty)
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatchType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MatchType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GridError::UnknownMatchType(s.to_string()))
    }
}

/// Filter on a single column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFilter {
    pub match_type: MatchType,
    pub match_value: String,
}

impl ColumnFilter {
    pub fn new(match_type: MatchType, match_value: impl Into<String>) -> Self {
        Self {
            match_type,
            match_value: match_value.into(),
        }
    }

    /// A filter whose match value is empty never excludes anything, unless
    /// its type ignores the value.
    pub fn is_active(&self) -> bool {
        !self.match_type.uses_value() || !self.match_value.is_empty()
    }

    /// Whether `cell` passes this filter
    pub fn matches(&self, cell: &str) -> bool {
        if !self.is_active() {
            return true;
        }
        let needle = self.match_value.to_lowercase();
        let haystack = cell.to_lowercase();
        match self.match_type {
            MatchType::Contains => haystack.contains(&needle),
            MatchType::Equals => haystack == needle,
            MatchType::StartsWith => haystack.starts_with(&needle),
            MatchType::EndsWith => haystack.ends_with(&needle),
            MatchType::GreaterThan => {
                compare_numbers(cell, &self.match_value).is_some_and(Ordering::is_gt)
            }
            MatchType::LessThan => {
                compare_numbers(cell, &self.match_value).is_some_and(Ordering::is_lt)
            }
            MatchType::NotEmpty => !is_blank(cell),
            MatchType::Empty => is_blank(cell),
        }
    }
}

/// Non-numeric operands drop out of numeric comparisons entirely.
fn compare_numbers(cell: &str, value: &str) -> Option<Ordering> {
    let a = parse_number(cell)?;
    let b = parse_number(value)?;
    a.partial_cmp(&b)
}

/// Active filters keyed by column index. Columns without an entry are
/// unfiltered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec {
    columns: BTreeMap<usize, ColumnFilter>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterSpec::set`]
    #[must_use]
    pub fn with(mut self, col: usize, filter: ColumnFilter) -> Self {
        self.set(col, filter);
        self
    }

    pub fn set(&mut self, col: usize, filter: ColumnFilter) {
        self.columns.insert(col, filter);
    }

    /// Change the match value, keeping the column's match type (default
    /// `Contains`)
    pub fn set_value(&mut self, col: usize, value: impl Into<String>) {
        self.columns.entry(col).or_default().match_value = value.into();
    }

    /// Change the match type, keeping the column's match value
    pub fn set_match_type(&mut self, col: usize, match_type: MatchType) {
        self.columns.entry(col).or_default().match_type = match_type;
    }

    pub fn remove(&mut self, col: usize) -> Option<ColumnFilter> {
        self.columns.remove(&col)
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }

    pub fn get(&self, col: usize) -> Option<&ColumnFilter> {
        self.columns.get(&col)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ColumnFilter)> {
        self.columns.iter().map(|(col, filter)| (*col, filter))
    }

    /// Whether any filter would exclude rows
    pub fn is_active(&self) -> bool {
        self.columns.values().any(ColumnFilter::is_active)
    }

    /// Whether a row passes every column filter
    pub fn matches(&self, row: &Row) -> bool {
        self.columns
            .iter()
            .all(|(col, filter)| filter.matches(row.cell(*col)))
    }

    /// Keep filters attached to their columns after `count` columns are
    /// inserted at `at`.
    pub fn shift_for_insert(&mut self, at: usize, count: usize) {
        self.columns = std::mem::take(&mut self.columns)
            .into_iter()
            .map(|(col, f)| if col >= at { (col + count, f) } else { (col, f) })
            .collect();
    }

    /// Drop the filter on a deleted column and shift the ones to its right.
    pub fn shift_for_delete(&mut self, deleted: usize) {
        self.columns = std::mem::take(&mut self.columns)
            .into_iter()
            .filter(|(col, _)| *col != deleted)
            .map(|(col, f)| if col > deleted { (col - 1, f) } else { (col, f) })
            .collect();
    }
}

/// Keep the rows that pass every filter, in their original order.
pub fn filter_rows(rows: &[Arc<Row>], filters: &FilterSpec) -> Vec<Arc<Row>> {
    rows.iter()
        .filter(|row| filters.matches(row))
        .cloned()
        .collect()
}

// ===== Sort stage =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// How non-empty sort keys are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    /// Numeric when both values parse as numbers, otherwise case-insensitive text
    #[default]
    Text,
    /// Numeric; unparseable values compare as 0
    Number,
    /// Chronological; unparseable values compare as the epoch
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    /// Sort column, or `None` for store order
    pub key: Option<usize>,
    pub direction: SortDirection,
    #[serde(default)]
    pub sort_type: SortType,
}

impl SortSpec {
    /// Store order
    pub fn none() -> Self {
        Self::default()
    }

    pub fn by(col: usize, direction: SortDirection) -> Self {
        Self {
            key: Some(col),
            direction,
            sort_type: SortType::Text,
        }
    }

    #[must_use]
    pub fn with_type(mut self, sort_type: SortType) -> Self {
        self.sort_type = sort_type;
        self
    }

    /// Header-click behaviour: the same column flips ascending to descending,
    /// anything else starts ascending.
    #[must_use]
    pub fn toggled(self, col: usize) -> Self {
        let direction = if self.key == Some(col) && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Self {
            key: Some(col),
            direction,
            sort_type: self.sort_type,
        }
    }

    /// Follow the key column when `count` columns are inserted at `at`
    pub fn shift_for_insert(&mut self, at: usize, count: usize) {
        if let Some(key) = self.key.as_mut() {
            if *key >= at {
                *key += count;
            }
        }
    }

    /// Drop the key if its column was deleted, otherwise follow it
    pub fn shift_for_delete(&mut self, deleted: usize) {
        self.key = match self.key {
            Some(key) if key == deleted => None,
            Some(key) if key > deleted => Some(key - 1),
            other => other,
        };
    }

    fn key_of(&self, text: &str) -> SortKey {
        match self.sort_type {
            SortType::Text => match parse_number(text) {
                Some(n) => SortKey::Number(n),
                None => SortKey::Text(text.to_lowercase()),
            },
            SortType::Number => SortKey::Number(parse_number(text).unwrap_or(0.0)),
            SortType::Date => SortKey::Date(parse_date_millis(text).unwrap_or(0)),
        }
    }
}

/// Comparable form of one key cell. Numbers order before text.
#[derive(Debug, Clone)]
enum SortKey {
    Number(f64),
    Date(i64),
    Text(String),
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Date(_) => 1,
            SortKey::Text(_) => 2,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

/// Sort rows by `sort`'s key column.
///
/// Rows whose key cell is blank keep their exact positions; the remaining
/// rows are stably sorted into the positions left over.
pub fn sort_rows(rows: Vec<Arc<Row>>, sort: &SortSpec) -> Vec<Arc<Row>> {
    let Some(key) = sort.key else {
        return rows;
    };

    let blank_at: Vec<bool> = rows.iter().map(|row| is_blank(row.cell(key))).collect();
    let mut sortable: Vec<(SortKey, Arc<Row>)> = rows
        .iter()
        .zip(&blank_at)
        .filter(|(_, blank)| !**blank)
        .map(|(row, _)| (sort.key_of(row.cell(key)), Arc::clone(row)))
        .collect();
    // Reversing the comparison (not the result) keeps equal keys in order.
    match sort.direction {
        SortDirection::Asc => sortable.sort_by(|a, b| a.0.cmp(&b.0)),
        SortDirection::Desc => sortable.sort_by(|a, b| b.0.cmp(&a.0)),
    }

    let mut sorted = sortable.into_iter().map(|(_, row)| row);
    rows.into_iter()
        .zip(blank_at)
        .map(|(row, blank)| {
            if blank {
                row
            } else {
                // One sorted row exists for every non-blank slot.
                sorted.next().unwrap_or(row)
            }
        })
        .collect()
}

// ===== Paginate stage =====

/// One page window over the sorted sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// 1-based page number, already clamped
    pub number: usize,
    pub total_pages: usize,
    pub page_size: usize,
    /// First view row on this page
    pub start: usize,
    /// One past the last view row on this page
    pub end: usize,
}

/// Clamp `requested` into `[1, max(1, ceil(total / page_size))]` and compute
/// the window.
pub fn paginate(total: usize, requested: usize, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let total_pages = total.div_ceil(page_size).max(1);
    let number = requested.clamp(1, total_pages);
    let start = ((number - 1) * page_size).min(total);
    let end = (start + page_size).min(total);
    Page {
        number,
        total_pages,
        page_size,
        start,
        end,
    }
}

// ===== View =====

/// The filtered, sorted, paginated projection of a store.
///
/// View coordinates index the whole filtered and sorted sequence; the page
/// is a window over it.
#[derive(Debug, Clone)]
pub struct View {
    rows: Vec<Arc<Row>>,
    columns: usize,
    page: Page,
}

impl View {
    /// Run the full pipeline
    pub fn compute(
        store: &Store,
        filters: &FilterSpec,
        sort: &SortSpec,
        page: usize,
        page_size: usize,
    ) -> View {
        let filtered = filter_rows(store.rows(), filters);
        let rows = sort_rows(filtered, sort);
        let page = paginate(rows.len(), page, page_size);
        View {
            rows,
            columns: store.column_count(),
            page,
        }
    }

    /// Rows in view order
    pub fn rows(&self) -> &[Arc<Row>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn row(&self, index: usize) -> Option<&Arc<Row>> {
        self.rows.get(index)
    }

    /// Row id at a view position
    pub fn row_id(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).map(|row| row.id())
    }

    /// View position of a row id
    pub fn position_of(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    pub fn cell(&self, addr: CellAddress) -> Option<&str> {
        self.rows
            .get(addr.row)
            .and_then(|row| row.cells().get(addr.col))
            .map(String::as_str)
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Rows of the current page
    pub fn page_rows(&self) -> &[Arc<Row>] {
        &self.rows[self.page.start..self.page.end]
    }

    /// Cell text inside `range`; cells outside the view read as "".
    pub fn block(&self, range: CellRange) -> Vec<Vec<String>> {
        let range = range.normalized();
        (range.start.row..=range.end.row)
            .map(|r| {
                (range.start.col..=range.end.col)
                    .map(|c| {
                        self.cell(CellAddress::new(r, c))
                            .unwrap_or_default()
                            .to_string()
                    })
                    .collect()
            })
            .collect()
    }
}

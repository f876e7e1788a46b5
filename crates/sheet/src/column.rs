//! Per-column analysis used by filter menus and the sort-type picker.

use crate::row::Row;
use crate::value::{is_blank, is_number, parse_date_millis};
use crate::view::SortType;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Share of non-blank cells that must parse before a column counts as typed
const TYPE_THRESHOLD: f64 = 0.8;

/// Distinct non-blank values of a column, sorted
pub fn unique_values(rows: &[Arc<Row>], col: usize) -> Vec<String> {
    rows.iter()
        .map(|row| row.cell(col))
        .filter(|cell| !is_blank(cell))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Guess the natural sort type of a column.
///
/// More than 80% of the non-blank cells being whole numbers gives
/// [`SortType::Number`]; otherwise more than 80% parsing as dates gives
/// [`SortType::Date`]. Everything else, including an all-blank column, is
/// [`SortType::Text`].
pub fn detect_column_type(rows: &[Arc<Row>], col: usize) -> SortType {
    let values: Vec<&str> = rows
        .iter()
        .map(|row| row.cell(col))
        .filter(|cell| !is_blank(cell))
        .collect();
    if values.is_empty() {
        return SortType::Text;
    }
    let total = values.len() as f64;
    let numbers = values.iter().filter(|v| is_number(v)).count() as f64;
    if numbers / total > TYPE_THRESHOLD {
        return SortType::Number;
    }
    let dates = values
        .iter()
        .filter(|v| parse_date_millis(v).is_some())
        .count() as f64;
    if dates / total > TYPE_THRESHOLD {
        return SortType::Date;
    }
    SortType::Text
}

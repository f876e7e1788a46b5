//! A1-style column naming (A, B, ..., Z, AA, AB, ...).

use crate::AddressError;

/// Convert column letters to a 0-based index ("A" -> 0, "AA" -> 26).
pub fn column_letters_to_index(col: &str) -> Result<usize, AddressError> {
    if col.is_empty() {
        return Err(AddressError::InvalidColumn(col.to_string()));
    }
    let mut result: usize = 0;
    for ch in col.chars() {
        let upper = ch.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return Err(AddressError::InvalidColumn(col.to_string()));
        }
        let value = usize::from(upper as u8 - b'A' + 1);
        result = result
            .checked_mul(26)
            .and_then(|v| v.checked_add(value))
            .ok_or_else(|| AddressError::InvalidColumn(col.to_string()))?;
    }
    Ok(result - 1)
}

/// Convert a 0-based column index to letters.
pub fn column_index_to_letters(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Header labels for the first `count` columns.
pub fn column_headers(count: usize) -> Vec<String> {
    (0..count).map(column_index_to_letters).collect()
}

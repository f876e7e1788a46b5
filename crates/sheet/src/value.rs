//! Contextual interpretation of cell text. Cells are always stored as text;
//! filters and sorts read numbers and dates out of it on demand.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse the leading number out of cell text, so `"12px"` reads as 12 and
/// `"3 apples"` as 3. Leading whitespace is skipped; text that does not start
/// with a finite number yields `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let len = numeric_prefix_len(trimmed.as_bytes());
    if len == 0 {
        return None;
    }
    trimmed[..len].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Whether the whole cell, ignoring surrounding whitespace, is one finite
/// number. Dates such as `2024-01-02` are not.
pub fn is_number(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty()
        && numeric_prefix_len(trimmed.as_bytes()) == trimmed.len()
        && parse_number(trimmed).is_some()
}

/// Byte length of the longest `[+-]digits[.digits][e[+-]digits]` prefix, or 0
/// when there is no digit in the mantissa.
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut i = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(i);
    let mut mantissa_digits = int_end - i;
    i = int_end;
    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        mantissa_digits += frac_end - (i + 1);
        i = frac_end;
    }
    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }
    i
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse cell text as a date, returning milliseconds since the Unix epoch.
pub fn parse_date_millis(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.timestamp_millis());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis());
        }
    }
    None
}

/// Empty or whitespace-only
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

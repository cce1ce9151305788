//! Format standardization for date and email columns.
//!
//! Runs before imputation so that median/mode statistics are computed on
//! canonical values. Standardization is idempotent: canonical values
//! pass through unchanged.

use chrono::NaiveDate;
use scrub_model::{ColumnProfiles, ColumnType, Dataset, Value};
use tracing::debug;

/// Split a 3-part numeric date token. Parts are separated by `-`, `.`,
/// or `/` (independently per position) and limited to 1-4 / 1-2 / 1-4
/// digits. Anything else is not a date token.
pub(crate) fn split_date_token(text: &str) -> Option<[&str; 3]> {
    let mut parts = Vec::with_capacity(3);
    let mut start = 0;
    for (index, ch) in text.char_indices() {
        if matches!(ch, '-' | '.' | '/') {
            parts.push(&text[start..index]);
            start = index + 1;
        } else if !ch.is_ascii_digit() {
            return None;
        }
    }
    parts.push(&text[start..]);
    if parts.len() != 3 {
        return None;
    }
    let in_bounds = |part: &str, max: usize| !part.is_empty() && part.len() <= max;
    if in_bounds(parts[0], 4) && in_bounds(parts[1], 2) && in_bounds(parts[2], 4) {
        Some([parts[0], parts[1], parts[2]])
    } else {
        None
    }
}

/// Canonical ISO 8601 form of a date token, or `None` when the value
/// does not match the pattern or does not form a valid calendar date
/// once reordered.
///
/// Field order is resolved positionally: a 4-digit first part means
/// year-month-day, a 4-digit last part means day-month-year, otherwise
/// month-day-year. The year is zero-padded to 4 digits; without that,
/// re-running on short-year output would reshuffle the fields.
fn standardize_date(text: &str) -> Option<String> {
    let [first, middle, last] = split_date_token(text)?;
    let (year, month, day) = if first.len() == 4 {
        (first, middle, last)
    } else if last.len() == 4 {
        (last, middle, first)
    } else {
        (last, first, middle)
    };
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?;
    Some(format!("{year:04}-{month:02}-{day:02}"))
}

fn standardize_email(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Rewrite date and email columns to canonical form in place. Values
/// that fail to parse are left unchanged. Returns the number of cells
/// rewritten.
pub fn standardize_formats(dataset: &mut Dataset, profiles: &ColumnProfiles) -> usize {
    let mut changed = 0;
    for (column, profile) in profiles {
        match profile.inferred_type {
            ColumnType::Date => {
                for record in dataset.records_mut() {
                    let Some(text) = record.get(column).as_text() else {
                        continue;
                    };
                    if text.is_empty() {
                        continue;
                    }
                    if let Some(canonical) = standardize_date(text)
                        && canonical != text
                    {
                        record.set(column.clone(), Value::Text(canonical));
                        changed += 1;
                    }
                }
            }
            ColumnType::Email => {
                for record in dataset.records_mut() {
                    let Some(text) = record.get(column).as_text() else {
                        continue;
                    };
                    if text.is_empty() {
                        continue;
                    }
                    let canonical = standardize_email(text);
                    if canonical != text {
                        record.set(column.clone(), Value::Text(canonical));
                        changed += 1;
                    }
                }
            }
            _ => {}
        }
    }
    if changed > 0 {
        debug!(changed, "standardized values");
    }
    changed
}

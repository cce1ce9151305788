//! Exact-duplicate and empty-row removal.

use std::collections::BTreeSet;

use scrub_model::Dataset;
use tracing::debug;

use crate::data_utils::value_key;

/// Remove rows where every field is missing. Runs before duplicate
/// counting when requested. Returns the number of rows removed.
pub fn remove_empty_rows(dataset: &mut Dataset) -> usize {
    let columns: Vec<String> = dataset.columns().to_vec();
    let empty: Vec<bool> = dataset
        .records()
        .iter()
        .map(|record| columns.iter().all(|column| record.get(column).is_missing()))
        .collect();
    let removed = empty.iter().filter(|flag| **flag).count();
    if removed > 0 {
        dataset.retain_records(|index| !empty[index]);
        debug!(removed, "empty rows removed");
    }
    removed
}

/// Remove exact full-row duplicates (all fields identical); the first
/// occurrence survives. Returns the number of rows removed.
pub fn dedupe_exact(dataset: &mut Dataset) -> usize {
    let columns: Vec<String> = dataset.columns().to_vec();
    let mut seen = BTreeSet::new();
    let keep: Vec<bool> = dataset
        .records()
        .iter()
        .map(|record| {
            let mut composite = String::new();
            for (position, column) in columns.iter().enumerate() {
                if position > 0 {
                    composite.push('\u{1f}');
                }
                composite.push_str(&value_key(record.get(column)));
            }
            seen.insert(composite)
        })
        .collect();
    let removed = keep.iter().filter(|flag| !**flag).count();
    if removed > 0 {
        dataset.retain_records(|index| keep[index]);
        debug!(removed, "duplicate rows removed");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrub_model::{Record, Value};

    fn dataset(rows: &[&[(&str, Value)]]) -> Dataset {
        Dataset::from_records(
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|(name, value)| (name.to_string(), value.clone()))
                        .collect::<Record>()
                })
                .collect(),
        )
    }

    #[test]
    fn first_duplicate_survives() {
        let mut data = dataset(&[
            &[("id", Value::from("1")), ("name", Value::from("A"))],
            &[("id", Value::from("2")), ("name", Value::from("B"))],
            &[("id", Value::from("1")), ("name", Value::from("A"))],
        ]);
        assert_eq!(dedupe_exact(&mut data), 1);
        assert_eq!(data.len(), 2);
        assert_eq!(data.records()[0].get("name"), &Value::from("A"));
    }

    #[test]
    fn near_duplicates_are_kept() {
        let mut data = dataset(&[
            &[("id", Value::from("1")), ("name", Value::from("A"))],
            &[("id", Value::from("1")), ("name", Value::Missing)],
            &[("id", Value::from("1")), ("name", Value::from(""))],
        ]);
        // Null and empty string are distinct stored values.
        assert_eq!(dedupe_exact(&mut data), 0);
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn all_missing_rows_are_removed() {
        let mut data = dataset(&[
            &[("a", Value::Int(1)), ("b", Value::from("x"))],
            &[("a", Value::Missing), ("b", Value::from(""))],
            &[("a", Value::Missing)],
        ]);
        assert_eq!(remove_empty_rows(&mut data), 2);
        assert_eq!(data.len(), 1);
    }
}

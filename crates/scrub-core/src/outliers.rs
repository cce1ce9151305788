//! IQR-based outlier detection for numeric columns.
//!
//! Report-only: detection never mutates the dataset. Missing and
//! unparseable values are excluded from the percentile computation and
//! are never flagged.

use scrub_model::{ColumnProfiles, ColumnType, Dataset, OutlierReport};
use tracing::debug;

use crate::data_utils::percentile;

/// Flag values strictly outside `[Q1 - k*IQR, Q3 + k*IQR]` per numeric
/// column, by record index. A constant column has IQR 0 and bounds that
/// collapse onto the constant, so nothing is flagged there.
pub fn detect_outliers(
    dataset: &Dataset,
    profiles: &ColumnProfiles,
    iqr_factor: f64,
) -> OutlierReport {
    let mut report = OutlierReport::new();
    for (column, profile) in profiles {
        if profile.inferred_type != ColumnType::Numeric {
            continue;
        }
        let indexed: Vec<(usize, f64)> = dataset
            .column_values(column)
            .enumerate()
            .filter(|(_, value)| !value.is_missing())
            .filter_map(|(index, value)| value.as_f64().map(|parsed| (index, parsed)))
            .collect();
        if indexed.is_empty() {
            continue;
        }
        let mut sorted: Vec<f64> = indexed.iter().map(|(_, value)| *value).collect();
        sorted.sort_by(f64::total_cmp);
        let Some(q1) = percentile(&sorted, 0.25) else {
            continue;
        };
        let Some(q3) = percentile(&sorted, 0.75) else {
            continue;
        };
        let iqr = q3 - q1;
        let lower = q1 - iqr_factor * iqr;
        let upper = q3 + iqr_factor * iqr;
        let flagged: Vec<usize> = indexed
            .iter()
            .filter(|(_, value)| *value < lower || *value > upper)
            .map(|(index, _)| *index)
            .collect();
        if !flagged.is_empty() {
            debug!(
                column = column.as_str(),
                count = flagged.len(),
                lower,
                upper,
                "outliers flagged"
            );
            report.insert(column.clone(), flagged);
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::profile_columns;
    use scrub_model::{Record, Value};

    fn numeric_column(values: &[Value]) -> Dataset {
        Dataset::from_records(
            values
                .iter()
                .map(|value| {
                    [("n".to_string(), value.clone())]
                        .into_iter()
                        .collect::<Record>()
                })
                .collect(),
        )
    }

    #[test]
    fn flags_only_the_extreme_value() {
        let values: Vec<Value> = [10, 12, 12, 13, 14, 100]
            .iter()
            .map(|v| Value::Int(*v))
            .collect();
        let dataset = numeric_column(&values);
        let profiles = profile_columns(&dataset, 100);
        let report = detect_outliers(&dataset, &profiles, 1.5);
        assert_eq!(report.get("n"), Some(&vec![5]));
    }

    #[test]
    fn constant_column_flags_nothing() {
        let values: Vec<Value> = (0..6).map(|_| Value::Int(7)).collect();
        let dataset = numeric_column(&values);
        let profiles = profile_columns(&dataset, 100);
        let report = detect_outliers(&dataset, &profiles, 1.5);
        assert!(report.is_empty());
    }

    #[test]
    fn missing_values_are_never_flagged() {
        let values = vec![
            Value::Int(10),
            Value::Missing,
            Value::Int(12),
            Value::Int(12),
            Value::Int(13),
            Value::Int(14),
            Value::Int(100),
        ];
        let dataset = numeric_column(&values);
        let profiles = profile_columns(&dataset, 100);
        let report = detect_outliers(&dataset, &profiles, 1.5);
        // Indices refer to record positions, skipping the missing cell.
        assert_eq!(report.get("n"), Some(&vec![6]));
    }
}

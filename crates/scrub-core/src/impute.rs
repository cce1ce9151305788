//! Missing-value imputation.

use scrub_model::{CleaningStats, ColumnProfiles, ColumnType, Dataset, Value};
use tracing::debug;

use crate::data_utils::{median, mode, numeric_column_values, numeric_value};

/// Fill missing cells column by column: numeric columns take the median
/// of their parseable non-missing values, everything else takes the mode
/// (ties break toward the first-encountered value). An entirely-missing
/// column fills with the empty string. A column with no missing cells is
/// left byte-for-byte untouched and never enters `cleaned_columns`.
pub fn impute_missing(dataset: &mut Dataset, profiles: &ColumnProfiles, stats: &mut CleaningStats) {
    let columns: Vec<String> = dataset.columns().to_vec();
    for column in columns {
        let missing = dataset
            .column_values(&column)
            .filter(|value| value.is_missing())
            .count();
        if missing == 0 {
            continue;
        }
        let numeric = profiles
            .get(&column)
            .is_some_and(|profile| profile.inferred_type == ColumnType::Numeric);
        let fill = if numeric {
            let values = numeric_column_values(dataset, &column);
            median(&values).map_or(Value::Int(0), numeric_value)
        } else {
            mode(dataset, &column).unwrap_or_else(|| Value::Text(String::new()))
        };
        let changed = fill_missing_cells(dataset, &column, &fill);
        debug!(
            column = column.as_str(),
            missing,
            changed,
            fill = %fill,
            "imputed column"
        );
        stats.record_fill(&column, changed);
    }
}

/// Write `fill` into every missing cell of `column`, returning how many
/// cells actually changed.
pub(crate) fn fill_missing_cells(dataset: &mut Dataset, column: &str, fill: &Value) -> usize {
    let mut changed = 0;
    for record in dataset.records_mut() {
        let current = record.get(column);
        if current.is_missing() && current != fill {
            record.set(column.to_string(), fill.clone());
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::profile_columns;
    use scrub_model::Record;

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
    fn numeric_column_takes_median() {
        let mut data = dataset(&[
            &[("n", Value::from("10"))],
            &[("n", Value::Missing)],
            &[("n", Value::from("20"))],
            &[("n", Value::from("30"))],
        ]);
        let profiles = profile_columns(&data, 100);
        let mut stats = CleaningStats::new();
        impute_missing(&mut data, &profiles, &mut stats);
        assert_eq!(data.records()[1].get("n"), &Value::Int(20));
        assert_eq!(stats.values_filled, 1);
        assert!(stats.cleaned_columns.contains("n"));
    }

    #[test]
    fn text_column_takes_mode() {
        let mut data = dataset(&[
            &[("c", Value::from("red"))],
            &[("c", Value::from("blue"))],
            &[("c", Value::from("red"))],
            &[("c", Value::Missing)],
        ]);
        let profiles = profile_columns(&data, 100);
        let mut stats = CleaningStats::new();
        impute_missing(&mut data, &profiles, &mut stats);
        assert_eq!(data.records()[3].get("c"), &Value::from("red"));
    }

    #[test]
    fn entirely_missing_column_fills_empty_string() {
        let mut data = dataset(&[&[("c", Value::Missing)], &[("c", Value::Missing)]]);
        let profiles = profile_columns(&data, 100);
        let mut stats = CleaningStats::new();
        impute_missing(&mut data, &profiles, &mut stats);
        assert_eq!(data.records()[0].get("c"), &Value::Text(String::new()));
        assert_eq!(stats.values_filled, 2);
    }

    #[test]
    fn complete_column_is_untouched() {
        let mut data = dataset(&[
            &[("n", Value::Int(1)), ("c", Value::from("x"))],
            &[("n", Value::Int(2)), ("c", Value::from("y"))],
        ]);
        let before = data.clone();
        let profiles = profile_columns(&data, 100);
        let mut stats = CleaningStats::new();
        impute_missing(&mut data, &profiles, &mut stats);
        assert_eq!(data.records(), before.records());
        assert_eq!(stats.values_filled, 0);
        assert!(stats.cleaned_columns.is_empty());
    }
}

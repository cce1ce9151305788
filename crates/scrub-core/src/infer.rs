//! Column type inference from bounded samples.
//!
//! Classification is an ordered list of (type, predicate) rules evaluated
//! in fixed priority order; the first pattern whose sample match fraction
//! strictly exceeds the threshold wins, and everything else falls through
//! to `string`. Adding a new semantic type means adding a rule, not
//! touching call sites.

use scrub_model::{ColumnProfile, ColumnProfiles, ColumnType, Dataset, Value};
use tracing::debug;

use crate::standardize::split_date_token;

/// A pattern must beat this fraction of the sample to claim the column.
const MATCH_THRESHOLD: f64 = 0.8;

/// Priority-ordered classification rules. Numeric outranks date outranks
/// email; `string` is the fall-through and has no rule.
const RULES: &[(ColumnType, fn(&Value) -> bool)] = &[
    (ColumnType::Numeric, is_numeric_value),
    (ColumnType::Date, is_date_value),
    (ColumnType::Email, is_email_value),
];

fn is_numeric_value(value: &Value) -> bool {
    value.as_f64().is_some()
}

fn is_date_value(value: &Value) -> bool {
    value
        .as_text()
        .is_some_and(|text| split_date_token(text).is_some())
}

fn is_email_value(value: &Value) -> bool {
    let Some(text) = value.as_text() else {
        return false;
    };
    if text.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// Classify one column from its sampled non-missing values.
pub fn infer_column_type(sample: &[&Value]) -> (ColumnType, f64) {
    if sample.is_empty() {
        return (ColumnType::String, 0.0);
    }
    for (column_type, predicate) in RULES {
        let matches = sample.iter().filter(|value| predicate(value)).count();
        let fraction = matches as f64 / sample.len() as f64;
        if fraction > MATCH_THRESHOLD {
            return (*column_type, fraction);
        }
    }
    (ColumnType::String, 0.0)
}

/// Profile every column of the dataset from a first-N sample of
/// non-missing values. Computed once per pipeline invocation; profiles
/// are fixed for the lifetime of the run.
pub fn profile_columns(dataset: &Dataset, sample_cap: usize) -> ColumnProfiles {
    let mut profiles = ColumnProfiles::new();
    for column in dataset.columns() {
        let sample: Vec<&Value> = dataset
            .column_values(column)
            .filter(|value| !value.is_missing())
            .take(sample_cap)
            .collect();
        let (inferred_type, match_fraction) = infer_column_type(&sample);
        debug!(
            column = column.as_str(),
            %inferred_type,
            sample_size = sample.len(),
            match_fraction,
            "column profiled"
        );
        profiles.insert(
            column.clone(),
            ColumnProfile {
                name: column.clone(),
                inferred_type,
                sample_size: sample.len(),
                match_fraction,
            },
        );
    }
    profiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrub_model::Record;

    fn column_of(values: &[Value]) -> Dataset {
        Dataset::from_records(
            values
                .iter()
                .map(|value| {
                    [("col".to_string(), value.clone())]
                        .into_iter()
                        .collect::<Record>()
                })
                .collect(),
        )
    }

    fn inferred(values: &[Value]) -> ColumnType {
        let dataset = column_of(values);
        profile_columns(&dataset, 100)["col"].inferred_type
    }

    #[test]
    fn numeric_wins_over_later_rules() {
        let values: Vec<Value> = ["1", "2.5", "-3", "4", "5"]
            .iter()
            .map(|v| Value::from(*v))
            .collect();
        assert_eq!(inferred(&values), ColumnType::Numeric);
    }

    #[test]
    fn date_fraction_at_three_quarters_is_not_date() {
        // 3 of 4 match (0.75): the threshold is strict, so the column
        // falls through to string.
        let values: Vec<Value> = ["2024-01-02", "2024-01-03", "1/2/2024", "not a date"]
            .iter()
            .map(|v| Value::from(*v))
            .collect();
        assert_eq!(inferred(&values), ColumnType::String);
    }

    #[test]
    fn email_column_detected() {
        let values: Vec<Value> = ["a@b.com", "c@d.org", "E@F.NET", "g@h.io", "i@j.co"]
            .iter()
            .map(|v| Value::from(*v))
            .collect();
        assert_eq!(inferred(&values), ColumnType::Email);
    }

    #[test]
    fn empty_column_is_string_with_zero_confidence() {
        let dataset = column_of(&[Value::Missing, Value::from("")]);
        let profile = &profile_columns(&dataset, 100)["col"];
        assert_eq!(profile.inferred_type, ColumnType::String);
        assert_eq!(profile.sample_size, 0);
        assert_eq!(profile.match_fraction, 0.0);
    }

    #[test]
    fn sample_is_capped_first_n() {
        let mut values: Vec<Value> = (0..100).map(|i| Value::from(format!("{i}"))).collect();
        values.extend((0..50).map(|_| Value::from("text")));
        let dataset = column_of(&values);
        let profile = &profile_columns(&dataset, 100)["col"];
        // Only the first 100 non-missing values are sampled, all numeric.
        assert_eq!(profile.sample_size, 100);
        assert_eq!(profile.inferred_type, ColumnType::Numeric);
    }
}

//! Column statistics and value-key helpers shared across stages.

use std::collections::HashMap;

use scrub_model::{Dataset, Value, format_numeric};

/// Linear-interpolation percentile over ascending sorted values.
///
/// `fraction` is in [0, 1]; the rank is `fraction * (n - 1)` and
/// fractional ranks interpolate between neighbors. Returns `None` for an
/// empty slice.
pub fn percentile(sorted: &[f64], fraction: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }
    let rank = fraction.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let weight = rank - lower as f64;
    if lower + 1 >= sorted.len() {
        return Some(sorted[sorted.len() - 1]);
    }
    Some(sorted[lower] + weight * (sorted[lower + 1] - sorted[lower]))
}

pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile(&sorted, 0.5)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Non-missing values of `column` that have a numeric view, in record
/// order. Unparseable values are excluded, never an error.
pub fn numeric_column_values(dataset: &Dataset, column: &str) -> Vec<f64> {
    dataset
        .column_values(column)
        .filter(|value| !value.is_missing())
        .filter_map(|value| value.as_f64())
        .collect()
}

/// Most frequent non-missing value of `column`; ties break toward the
/// value encountered first in scan order.
pub fn mode(dataset: &Dataset, column: &str) -> Option<Value> {
    let mut counts: HashMap<String, (usize, usize, Value)> = HashMap::new();
    for (index, value) in dataset.column_values(column).enumerate() {
        if value.is_missing() {
            continue;
        }
        counts
            .entry(value_key(value))
            .and_modify(|(count, _, _)| *count += 1)
            .or_insert((1, index, value.clone()));
    }
    counts
        .into_values()
        .max_by(|(count_a, first_a, _), (count_b, first_b, _)| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(_, _, value)| value)
}

/// Discriminated key for grouping and joining: numerics canonicalize to
/// one spelling (`1` and `1.0` collide on purpose), text/bool/missing
/// stay distinct.
pub fn value_key(value: &Value) -> String {
    match value {
        Value::Missing => "m".to_string(),
        Value::Bool(value) => format!("b{value}"),
        Value::Int(value) => format!("n{value}"),
        Value::Float(value) => format!("n{}", format_numeric(*value)),
        Value::Text(text) => format!("s{text}"),
    }
}

/// Numeric value rendered back into the dataset: integral magnitudes
/// become `Int`, everything else `Float`.
pub fn numeric_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        Value::Int(value as i64)
    } else {
        Value::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrub_model::Record;

    #[test]
    fn percentile_interpolates() {
        let sorted = [10.0, 12.0, 12.0, 13.0, 14.0, 100.0];
        assert_eq!(percentile(&sorted, 0.25), Some(12.0));
        assert_eq!(percentile(&sorted, 0.5), Some(12.5));
        assert_eq!(percentile(&sorted, 1.0), Some(100.0));
    }

    #[test]
    fn median_of_two_is_midpoint() {
        assert_eq!(median(&[34.0, 29.0]), Some(31.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn mode_breaks_ties_by_first_seen() {
        let dataset = Dataset::from_records(vec![
            [("c".to_string(), Value::from("b"))].into_iter().collect::<Record>(),
            [("c".to_string(), Value::from("a"))].into_iter().collect::<Record>(),
            [("c".to_string(), Value::from("a"))].into_iter().collect::<Record>(),
            [("c".to_string(), Value::from("b"))].into_iter().collect::<Record>(),
        ]);
        assert_eq!(mode(&dataset, "c"), Some(Value::from("b")));
    }

    #[test]
    fn value_keys_canonicalize_numerics() {
        assert_eq!(value_key(&Value::Int(1)), value_key(&Value::Float(1.0)));
        assert_ne!(value_key(&Value::Int(1)), value_key(&Value::from("1")));
        assert_ne!(value_key(&Value::Missing), value_key(&Value::from("")));
    }
}

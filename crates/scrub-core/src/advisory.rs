//! Advisory-service consumption and the guaranteed fallback pass.
//!
//! The advisory service is strictly optional. Requests are bounded (at
//! most [`MAX_SUGGESTIONS`] suggestions are honored, at most 10 sample
//! rows are shared, and the serialized request is capped); responses are
//! untrusted and validated strictly at this boundary. Every failure mode
//! fails open: the pipeline proceeds with the deterministic fallback and
//! never surfaces advisory trouble as a pipeline error.

use std::collections::BTreeMap;

use scrub_model::{
    AdvisoryRequest, CleaningOptions, CleaningStats, ColumnProfiles, ColumnType, Dataset,
    QualityReport, SuggestedAction, TransformationSuggestion, Value,
};
use tracing::{debug, warn};

use crate::data_utils::{mean, median, mode, numeric_column_values, numeric_value};
use crate::impute::fill_missing_cells;

/// Upper bound on suggestions honored from one response.
pub const MAX_SUGGESTIONS: usize = 10;

/// External source of cleaning suggestions.
///
/// Implementations own transport and the round-trip timeout
/// ([`CleaningOptions::advisory_timeout_secs`]); the pipeline only sees
/// the raw response text. Returning an error is equivalent to returning
/// garbage: both degrade to the fallback pass.
pub trait AdvisoryProvider {
    fn suggest(&self, request: &AdvisoryRequest) -> anyhow::Result<String>;
}

/// Provider that never has suggestions. The default collaborator for
/// offline runs and tests.
pub struct NullAdvisor;

impl AdvisoryProvider for NullAdvisor {
    fn suggest(&self, _request: &AdvisoryRequest) -> anyhow::Result<String> {
        Ok("{}".to_string())
    }
}

/// Build the bounded request briefing the advisory service.
pub fn build_request(
    dataset: &Dataset,
    profiles: &ColumnProfiles,
    options: &CleaningOptions,
) -> AdvisoryRequest {
    let column_types: BTreeMap<String, ColumnType> = profiles
        .iter()
        .map(|(name, profile)| (name.clone(), profile.inferred_type))
        .collect();
    let sample_rows = dataset
        .records()
        .iter()
        .take(options.advisory_sample_rows)
        .cloned()
        .collect();
    AdvisoryRequest {
        columns: dataset.columns().to_vec(),
        column_types,
        sample_rows,
        quality: QualityReport::compute(dataset),
    }
}

/// Enforce the character cap on the serialized request by dropping
/// sample rows from the end until it fits.
pub fn bound_request(mut request: AdvisoryRequest, cap: usize) -> AdvisoryRequest {
    while serialized_len(&request) > cap && !request.sample_rows.is_empty() {
        request.sample_rows.pop();
    }
    request
}

fn serialized_len(request: &AdvisoryRequest) -> usize {
    serde_json::to_string(request)
        .map(|serialized| serialized.chars().count())
        .unwrap_or(0)
}

/// Parse suggestions out of untrusted response text.
///
/// The response may wrap its JSON in markdown code fences; strip them,
/// falling back to the outermost brace span. Individual list elements
/// that fail validation (unknown action, wrong shape) are dropped;
/// a response with no parseable shape at all yields `None`.
pub fn parse_suggestions(text: &str) -> Option<Vec<TransformationSuggestion>> {
    let body = extract_json(text)?;
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    let transformations = match parsed.get("transformations") {
        Some(serde_json::Value::Array(items)) => items.clone(),
        Some(_) => return None,
        None => Vec::new(),
    };
    let mut suggestions = Vec::new();
    for item in transformations {
        match serde_json::from_value::<TransformationSuggestion>(item) {
            Ok(suggestion) => suggestions.push(suggestion),
            Err(error) => debug!(%error, "dropped unparseable suggestion"),
        }
    }
    Some(suggestions)
}

fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + "```json".len()..];
        if let Some(end) = rest.find("```") {
            return Some(rest[..end].trim());
        }
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (end > start).then(|| &trimmed[start..=end])
}

/// One bounded round trip to the advisory service. Timeout, transport
/// errors, and malformed responses all degrade to "no suggestions".
pub fn fetch_suggestions(
    provider: &dyn AdvisoryProvider,
    dataset: &Dataset,
    profiles: &ColumnProfiles,
    options: &CleaningOptions,
) -> Vec<TransformationSuggestion> {
    let request = bound_request(
        build_request(dataset, profiles, options),
        options.advisory_request_cap,
    );
    debug!(
        sample_rows = request.sample_rows.len(),
        "advisory request prepared"
    );
    let response = match provider.suggest(&request) {
        Ok(response) => response,
        Err(error) => {
            warn!(%error, "advisory service unavailable, falling back");
            return Vec::new();
        }
    };
    match parse_suggestions(&response) {
        Some(mut suggestions) => {
            if suggestions.len() > MAX_SUGGESTIONS {
                debug!(
                    dropped = suggestions.len() - MAX_SUGGESTIONS,
                    "truncating advisory suggestions"
                );
                suggestions.truncate(MAX_SUGGESTIONS);
            }
            suggestions
        }
        None => {
            warn!("malformed advisory response, falling back");
            Vec::new()
        }
    }
}

/// Apply validated suggestions in list order, then the deterministic
/// fallback pass. After this layer no column retains a null value.
pub fn apply_advice(
    dataset: &mut Dataset,
    profiles: &ColumnProfiles,
    suggestions: &[TransformationSuggestion],
    stats: &mut CleaningStats,
) {
    for suggestion in suggestions.iter().take(MAX_SUGGESTIONS) {
        apply_suggestion(dataset, profiles, suggestion, stats);
    }
    apply_fallback(dataset, profiles, stats);
}

fn apply_suggestion(
    dataset: &mut Dataset,
    profiles: &ColumnProfiles,
    suggestion: &TransformationSuggestion,
    stats: &mut CleaningStats,
) {
    let column = suggestion.column.as_str();
    if !dataset.has_column(column) {
        debug!(column, "suggestion for unknown column skipped");
        return;
    }
    let numeric = profiles
        .get(column)
        .is_some_and(|profile| profile.inferred_type.is_numeric());
    if suggestion.action.requires_numeric() && !numeric {
        debug!(column, action = %suggestion.action, "numeric action on non-numeric column skipped");
        return;
    }
    if stats.cleaned_columns.contains(column) {
        return;
    }
    let fill = match suggestion.action {
        SuggestedAction::FillMean => {
            let values = numeric_column_values(dataset, column);
            mean(&values).map_or(Value::Int(0), numeric_value)
        }
        SuggestedAction::FillMedian => {
            let values = numeric_column_values(dataset, column);
            median(&values).map_or(Value::Int(0), numeric_value)
        }
        SuggestedAction::FillZero => Value::Int(0),
        SuggestedAction::FillMode => {
            mode(dataset, column).unwrap_or_else(|| Value::Text(String::new()))
        }
        SuggestedAction::FillEmpty => Value::Text(String::new()),
    };
    let changed = fill_missing_cells(dataset, column, &fill);
    if changed > 0 {
        debug!(column, action = %suggestion.action, changed, "suggestion applied");
        stats.record_fill(column, changed);
    }
}

/// Deterministic default cleaning for every column the suggestions left
/// untouched: mean (or 0) for numeric columns, mode (or empty string)
/// for everything else.
pub fn apply_fallback(dataset: &mut Dataset, profiles: &ColumnProfiles, stats: &mut CleaningStats) {
    let columns: Vec<String> = dataset.columns().to_vec();
    for column in columns {
        if stats.cleaned_columns.contains(&column) {
            continue;
        }
        let missing = dataset
            .column_values(&column)
            .filter(|value| value.is_missing())
            .count();
        if missing == 0 {
            continue;
        }
        let numeric = profiles
            .get(&column)
            .is_some_and(|profile| profile.inferred_type.is_numeric());
        let fill = if numeric {
            let values = numeric_column_values(dataset, &column);
            mean(&values).map_or(Value::Int(0), numeric_value)
        } else {
            mode(dataset, &column).unwrap_or_else(|| Value::Text(String::new()))
        };
        let changed = fill_missing_cells(dataset, &column, &fill);
        if changed > 0 {
            debug!(column = column.as_str(), changed, "fallback fill applied");
        }
        stats.record_fill(&column, changed);
    }
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
    fn parses_fenced_response() {
        let text = "Here you go:\n```json\n{\"analysis\": \"ok\", \"transformations\": \
                    [{\"column\": \"age\", \"action\": \"fill_median\", \"reason\": \"skewed\"}]}\n```";
        let suggestions = parse_suggestions(text).expect("parse");
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].action, SuggestedAction::FillMedian);
    }

    #[test]
    fn unknown_actions_are_dropped_not_fatal() {
        let text = r#"{"transformations": [
            {"column": "a", "action": "drop_rows", "reason": "x"},
            {"column": "b", "action": "fill_zero", "reason": "y"}
        ]}"#;
        let suggestions = parse_suggestions(text).expect("parse");
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].column, "b");
    }

    #[test]
    fn garbage_response_yields_none() {
        assert!(parse_suggestions("no json here").is_none());
        assert!(parse_suggestions("").is_none());
    }

    #[test]
    fn request_truncates_sample_rows_under_cap() {
        let data = Dataset::from_records(
            (0..8)
                .map(|_| {
                    [("text".to_string(), Value::from("x".repeat(200)))]
                        .into_iter()
                        .collect::<Record>()
                })
                .collect(),
        );
        let profiles = profile_columns(&data, 100);
        let request = build_request(&data, &profiles, &CleaningOptions::default());
        assert_eq!(request.sample_rows.len(), 8);
        let bounded = bound_request(request, 600);
        assert!(bounded.sample_rows.len() < 8);
        assert!(serde_json::to_string(&bounded).expect("serialize").chars().count() <= 600);
    }

    #[test]
    fn numeric_action_on_text_column_is_rejected() {
        let mut data = dataset(&[
            &[("name", Value::from("ada"))],
            &[("name", Value::Missing)],
        ]);
        let profiles = profile_columns(&data, 100);
        let mut stats = CleaningStats::new();
        let suggestion = TransformationSuggestion {
            column: "name".to_string(),
            action: SuggestedAction::FillZero,
            reason: "wrong".to_string(),
        };
        apply_suggestion(&mut data, &profiles, &suggestion, &mut stats);
        assert!(data.records()[1].get("name").is_missing());
        assert_eq!(stats.values_filled, 0);
    }

    #[test]
    fn fallback_fills_every_remaining_column() {
        let mut data = dataset(&[
            &[("n", Value::Int(4)), ("c", Value::from("x")), ("e", Value::Missing)],
            &[("n", Value::Missing), ("c", Value::Missing), ("e", Value::Missing)],
            &[("n", Value::Int(8)), ("c", Value::from("x")), ("e", Value::Missing)],
        ]);
        let profiles = profile_columns(&data, 100);
        let mut stats = CleaningStats::new();
        apply_fallback(&mut data, &profiles, &mut stats);
        // Numeric fallback is the mean, non-numeric the mode, entirely
        // missing the empty string.
        assert_eq!(data.records()[1].get("n"), &Value::Int(6));
        assert_eq!(data.records()[1].get("c"), &Value::from("x"));
        assert_eq!(data.records()[0].get("e"), &Value::Text(String::new()));
        assert_eq!(stats.cleaned_columns.len(), 3);
    }

    #[test]
    fn suggestion_for_cleaned_column_is_noop() {
        let mut data = dataset(&[
            &[("n", Value::Int(1))],
            &[("n", Value::Missing)],
            &[("n", Value::Int(3))],
        ]);
        let profiles = profile_columns(&data, 100);
        let mut stats = CleaningStats::new();
        let median_fill = TransformationSuggestion {
            column: "n".to_string(),
            action: SuggestedAction::FillMedian,
            reason: "first".to_string(),
        };
        let zero_fill = TransformationSuggestion {
            column: "n".to_string(),
            action: SuggestedAction::FillZero,
            reason: "second".to_string(),
        };
        apply_advice(&mut data, &profiles, &[median_fill, zero_fill], &mut stats);
        assert_eq!(data.records()[1].get("n"), &Value::Int(2));
        assert_eq!(stats.values_filled, 1);
    }
}

//! Advisory-service boundary types.
//!
//! The advisory service is an external collaborator consulted for
//! cleaning suggestions. Its vocabulary is closed: anything outside the
//! known action set is dropped at the boundary, never executed.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::Record;
use crate::profile::{ColumnType, QualityReport};

/// Closed set of cleaning actions the pipeline will execute on behalf of
/// the advisory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    FillMean,
    FillMedian,
    FillMode,
    FillZero,
    FillEmpty,
}

impl SuggestedAction {
    /// Whether the action is only meaningful on a numeric column.
    pub fn requires_numeric(self) -> bool {
        matches!(
            self,
            SuggestedAction::FillMean | SuggestedAction::FillMedian | SuggestedAction::FillZero
        )
    }
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SuggestedAction::FillMean => "fill_mean",
            SuggestedAction::FillMedian => "fill_median",
            SuggestedAction::FillMode => "fill_mode",
            SuggestedAction::FillZero => "fill_zero",
            SuggestedAction::FillEmpty => "fill_empty",
        };
        f.write_str(label)
    }
}

impl FromStr for SuggestedAction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "fill_mean" => Ok(SuggestedAction::FillMean),
            "fill_median" => Ok(SuggestedAction::FillMedian),
            "fill_mode" => Ok(SuggestedAction::FillMode),
            "fill_zero" => Ok(SuggestedAction::FillZero),
            "fill_empty" => Ok(SuggestedAction::FillEmpty),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

/// One externally produced cleaning suggestion. Consumed at most once,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationSuggestion {
    pub column: String,
    pub action: SuggestedAction,
    pub reason: String,
}

/// Request sent to the advisory service. The serialized form is capped
/// at [`crate::options::CleaningOptions::advisory_request_cap`]
/// characters; sample rows are dropped from the end until it fits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    pub columns: Vec<String>,
    pub column_types: BTreeMap<String, ColumnType>,
    pub sample_rows: Vec<Record>,
    pub quality: QualityReport,
}

/// Parsed advisory response. Any response that cannot be parsed into
/// this shape is treated identically to "no suggestions available".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub transformations: Vec<TransformationSuggestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_round_trips_snake_case() {
        let json = serde_json::to_string(&SuggestedAction::FillMean).expect("serialize");
        assert_eq!(json, "\"fill_mean\"");
        let parsed: SuggestedAction = serde_json::from_str("\"fill_zero\"").expect("deserialize");
        assert_eq!(parsed, SuggestedAction::FillZero);
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(serde_json::from_str::<SuggestedAction>("\"drop_column\"").is_err());
        assert!("drop_column".parse::<SuggestedAction>().is_err());
    }
}

//! Merge configuration for the schema reconciler.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How records from multiple sources are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    Inner,
    Outer,
    Left,
    Right,
    /// Vertical union of all records; no join logic.
    Concat,
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MergeMode::Inner => "inner",
            MergeMode::Outer => "outer",
            MergeMode::Left => "left",
            MergeMode::Right => "right",
            MergeMode::Concat => "concat",
        };
        f.write_str(label)
    }
}

impl FromStr for MergeMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inner" => Ok(MergeMode::Inner),
            "outer" => Ok(MergeMode::Outer),
            "left" => Ok(MergeMode::Left),
            "right" => Ok(MergeMode::Right),
            "concat" => Ok(MergeMode::Concat),
            other => Err(format!("unknown merge mode: {other}")),
        }
    }
}

/// Whether joins key on a named column or on the computed intersection
/// of all sources' column sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Auto,
    Specific,
}

impl FromStr for MatchStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(MatchStrategy::Auto),
            "specific" => Ok(MatchStrategy::Specific),
            other => Err(format!("unknown match strategy: {other}")),
        }
    }
}

/// Caller-supplied merge settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeSpec {
    pub mode: MergeMode,
    pub match_strategy: MatchStrategy,
    /// Required when `match_strategy` is `Specific`; ignored otherwise.
    pub match_column: Option<String>,
    /// Lowercase the match column's text values in every source before
    /// joining. The lowered value is retained in the output.
    pub case_insensitive: bool,
    /// Trim surrounding whitespace from every text cell in every source
    /// before reconciliation.
    pub trim_whitespace: bool,
    /// Remove rows where every field is missing, before duplicate
    /// counting.
    pub remove_empty_rows: bool,
}

impl Default for MergeSpec {
    fn default() -> Self {
        Self {
            mode: MergeMode::Inner,
            match_strategy: MatchStrategy::Auto,
            match_column: None,
            case_insensitive: true,
            trim_whitespace: true,
            remove_empty_rows: true,
        }
    }
}

impl MergeSpec {
    pub fn concat() -> Self {
        Self {
            mode: MergeMode::Concat,
            ..Self::default()
        }
    }

    pub fn join_on(column: impl Into<String>, mode: MergeMode) -> Self {
        Self {
            mode,
            match_strategy: MatchStrategy::Specific,
            match_column: Some(column.into()),
            ..Self::default()
        }
    }
}

//! Column profiles produced by type inference.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// Semantic column type, inferred from a bounded sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Numeric,
    Date,
    Email,
    String,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Numeric)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Date => "date",
            ColumnType::Email => "email",
            ColumnType::String => "string",
        };
        f.write_str(label)
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "numeric" => Ok(ColumnType::Numeric),
            "date" => Ok(ColumnType::Date),
            "email" => Ok(ColumnType::Email),
            "string" => Ok(ColumnType::String),
            other => Err(format!("unknown column type: {other}")),
        }
    }
}

/// Inference result for one column.
///
/// Fixed for the lifetime of a pipeline invocation; never recomputed
/// mid-pipeline on the same data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub inferred_type: ColumnType,
    /// Number of non-missing values actually sampled.
    pub sample_size: usize,
    /// Fraction of the sample matching the winning pattern; 0 for a
    /// column that fell through to `string`.
    pub match_fraction: f64,
}

/// Profiles for all columns of a dataset, keyed by column name.
pub type ColumnProfiles = BTreeMap<String, ColumnProfile>;

/// Dataset-level completeness summary used to brief the advisory service
/// and reported by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub rows: usize,
    pub columns: usize,
    pub total_missing: usize,
    /// Fraction of non-missing cells, in [0, 1]. 1.0 for an empty grid.
    pub completeness: f64,
}

impl QualityReport {
    pub fn compute(dataset: &Dataset) -> Self {
        let rows = dataset.len();
        let columns = dataset.columns().len();
        let cells = rows * columns;
        let total_missing = dataset.missing_cells();
        let completeness = if cells == 0 {
            1.0
        } else {
            1.0 - total_missing as f64 / cells as f64
        };
        Self {
            rows,
            columns,
            total_missing,
            completeness,
        }
    }
}

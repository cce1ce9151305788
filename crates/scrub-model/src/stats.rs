//! Aggregated cleaning statistics.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Record indices of flagged outliers, keyed by column name.
///
/// Entries exist only for numeric columns with at least one flagged
/// value. Detection is report-only; the indices refer to the dataset as
/// it stood when the detector ran.
pub type OutlierReport = BTreeMap<String, Vec<usize>>;

/// Counters accumulated across the pipeline stages.
///
/// Every count is derivable by diffing dataset state before and after
/// the stage that produced it: `values_filled` counts cells whose stored
/// value actually changed when a fill was written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningStats {
    /// Missing cells at pipeline start (after merge, before any fill).
    pub initial_missing: usize,
    /// Cells changed by imputation and advisory application combined.
    pub values_filled: usize,
    /// Missing cells remaining at pipeline end. Empty-string fills still
    /// count as missing here; only nulls are guaranteed gone.
    pub remaining_missing: usize,
    /// Columns that received at least one fill.
    pub cleaned_columns: BTreeSet<String>,
    /// Exact-duplicate rows dropped after cleaning.
    pub duplicates_removed: usize,
    /// All-missing rows dropped before duplicate counting, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_rows_removed: Option<usize>,
    pub outliers: OutlierReport,
}

impl CleaningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful fill of `count` cells in `column`.
    pub fn record_fill(&mut self, column: &str, count: usize) {
        if count > 0 {
            self.values_filled += count;
            self.cleaned_columns.insert(column.to_string());
        }
    }
}

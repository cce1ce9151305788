//! Configuration options for pipeline processing.

use serde::{Deserialize, Serialize};

/// Options controlling cleaning behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningOptions {
    /// Per-column sample cap for type inference (first-N policy).
    pub sample_cap: usize,
    /// IQR multiplier for outlier bounds.
    pub outlier_iqr_factor: f64,
    /// Consult the advisory service before the fallback pass. When false
    /// the advisory layer runs fallback only.
    pub use_advisory: bool,
    /// Upper bound on the advisory round trip, in seconds. Enforced by
    /// the advisory provider; expiry fails open.
    pub advisory_timeout_secs: u64,
    /// Sample records shared with the advisory service.
    pub advisory_sample_rows: usize,
    /// Cap on the serialized advisory request, in characters.
    pub advisory_request_cap: usize,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            sample_cap: 100,
            outlier_iqr_factor: 1.5,
            use_advisory: true,
            advisory_timeout_secs: 30,
            advisory_sample_rows: 10,
            advisory_request_cap: 30_000,
        }
    }
}

impl CleaningOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a run without the advisory round trip.
    pub fn offline() -> Self {
        Self {
            use_advisory: false,
            ..Self::default()
        }
    }
}

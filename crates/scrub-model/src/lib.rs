pub mod advice;
pub mod dataset;
pub mod error;
pub mod merge;
pub mod options;
pub mod profile;
pub mod stats;
pub mod value;

pub use advice::{AdvisoryRequest, AdvisoryResponse, SuggestedAction, TransformationSuggestion};
pub use dataset::{Dataset, Record};
pub use error::{Result, ScrubError};
pub use merge::{MatchStrategy, MergeMode, MergeSpec};
pub use options::CleaningOptions;
pub use profile::{ColumnProfile, ColumnProfiles, ColumnType, QualityReport};
pub use stats::{CleaningStats, OutlierReport};
pub use value::{Value, format_numeric, parse_f64};

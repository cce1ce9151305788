pub mod advisory;
pub mod data_utils;
pub mod dedupe;
pub mod impute;
pub mod infer;
pub mod outliers;
pub mod pipeline;
pub mod reconcile;
pub mod standardize;
pub mod store;

pub use advisory::{
    AdvisoryProvider, MAX_SUGGESTIONS, NullAdvisor, apply_advice, apply_fallback, bound_request,
    build_request, fetch_suggestions, parse_suggestions,
};
pub use data_utils::{mean, median, mode, numeric_column_values, percentile};
pub use dedupe::{dedupe_exact, remove_empty_rows};
pub use impute::impute_missing;
pub use infer::{infer_column_type, profile_columns};
pub use outliers::detect_outliers;
pub use pipeline::{
    AdvisoryStage, CleaningPipeline, CleaningStage, DedupStage, ImputeStage, OutlierStage,
    StandardizeStage, build_pipeline, clean_dataset, merge_and_clean,
};
pub use reconcile::reconcile;
pub use standardize::standardize_formats;
pub use store::{DEFAULT_TTL, MemoryStore, SessionStore};

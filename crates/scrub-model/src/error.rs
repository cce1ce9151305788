use thiserror::Error;

/// Fatal pipeline errors. Everything else in the pipeline is non-fatal
/// by design: coercion failures revert, advisory failures fall open, and
/// single-value parse failures leave the value in place.
#[derive(Debug, Error)]
pub enum ScrubError {
    /// No usable join schema: a named match column is missing from a
    /// source, or auto-match found no common columns.
    #[error("schema mismatch in source #{source_index}: {reason}")]
    SchemaMismatch { source_index: usize, reason: String },
    /// A merge source contributed zero records; no schema can be
    /// established from it.
    #[error("source #{source_index} contains no records")]
    EmptySource { source_index: usize },
}

pub type Result<T> = std::result::Result<T, ScrubError>;

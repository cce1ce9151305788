//! Pipeline orchestration with ordered stage execution.
//!
//! Each stage implements the [`CleaningStage`] trait and is executed in
//! a fixed order. Stages are independently invocable and idempotent in
//! isolation, so unit tests can drive any one of them without running
//! the full chain.
//!
//! # Standard stage order
//!
//! 1. **OutlierStage** - flag numeric outliers (report-only)
//! 2. **StandardizeStage** - canonicalize dates and emails
//! 3. **ImputeStage** - median/mode fills
//! 4. **AdvisoryStage** - apply external suggestions, then fallback
//! 5. **DedupStage** - drop empty rows (when requested) and duplicates
//!
//! Column profiles are computed once before the stages run and stay
//! fixed for the whole invocation.

use anyhow::Result;
use scrub_model::{
    CleaningOptions, CleaningStats, ColumnProfiles, Dataset, MergeSpec, TransformationSuggestion,
};
use tracing::info;

use crate::advisory::{AdvisoryProvider, apply_advice, fetch_suggestions};
use crate::dedupe::{dedupe_exact, remove_empty_rows};
use crate::impute::impute_missing;
use crate::infer::profile_columns;
use crate::outliers::detect_outliers;
use crate::reconcile::reconcile;
use crate::standardize::standardize_formats;

/// A single stage of the cleaning pipeline.
pub trait CleaningStage {
    /// Run this stage. The dataset is modified in place; counters go
    /// into `stats`.
    fn run(
        &self,
        dataset: &mut Dataset,
        profiles: &ColumnProfiles,
        stats: &mut CleaningStats,
    ) -> Result<()>;

    /// Human-readable name for logging.
    fn stage_name(&self) -> &str;
}

/// An ordered pipeline of cleaning stages.
pub struct CleaningPipeline {
    stages: Vec<Box<dyn CleaningStage>>,
}

impl CleaningPipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn add_stage(mut self, stage: Box<dyn CleaningStage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.stage_name()).collect()
    }

    /// Execute all stages in order, returning the executed names.
    pub fn execute(
        &self,
        dataset: &mut Dataset,
        profiles: &ColumnProfiles,
        stats: &mut CleaningStats,
    ) -> Result<Vec<String>> {
        let mut executed = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let span = tracing::info_span!("stage", name = stage.stage_name());
            let _guard = span.enter();
            stage.run(dataset, profiles, stats)?;
            executed.push(stage.stage_name().to_string());
        }
        Ok(executed)
    }
}

impl Default for CleaningPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Stage 1: flag numeric outliers into the stats report.
pub struct OutlierStage {
    pub iqr_factor: f64,
}

impl CleaningStage for OutlierStage {
    fn run(
        &self,
        dataset: &mut Dataset,
        profiles: &ColumnProfiles,
        stats: &mut CleaningStats,
    ) -> Result<()> {
        stats.outliers = detect_outliers(dataset, profiles, self.iqr_factor);
        Ok(())
    }

    fn stage_name(&self) -> &str {
        "outliers"
    }
}

/// Stage 2: canonicalize date and email formats.
pub struct StandardizeStage;

impl CleaningStage for StandardizeStage {
    fn run(
        &self,
        dataset: &mut Dataset,
        profiles: &ColumnProfiles,
        _stats: &mut CleaningStats,
    ) -> Result<()> {
        standardize_formats(dataset, profiles);
        Ok(())
    }

    fn stage_name(&self) -> &str {
        "standardize"
    }
}

/// Stage 3: fill missing values per column type.
pub struct ImputeStage;

impl CleaningStage for ImputeStage {
    fn run(
        &self,
        dataset: &mut Dataset,
        profiles: &ColumnProfiles,
        stats: &mut CleaningStats,
    ) -> Result<()> {
        impute_missing(dataset, profiles, stats);
        Ok(())
    }

    fn stage_name(&self) -> &str {
        "impute"
    }
}

/// Stage 4: apply external suggestions, then the guaranteed fallback.
pub struct AdvisoryStage {
    pub suggestions: Vec<TransformationSuggestion>,
}

impl CleaningStage for AdvisoryStage {
    fn run(
        &self,
        dataset: &mut Dataset,
        profiles: &ColumnProfiles,
        stats: &mut CleaningStats,
    ) -> Result<()> {
        apply_advice(dataset, profiles, &self.suggestions, stats);
        Ok(())
    }

    fn stage_name(&self) -> &str {
        "advisory"
    }
}

/// Stage 5: remove empty rows (when requested) and exact duplicates.
pub struct DedupStage {
    pub remove_empty_rows: bool,
}

impl CleaningStage for DedupStage {
    fn run(
        &self,
        dataset: &mut Dataset,
        _profiles: &ColumnProfiles,
        stats: &mut CleaningStats,
    ) -> Result<()> {
        if self.remove_empty_rows {
            stats.empty_rows_removed = Some(remove_empty_rows(dataset));
        }
        stats.duplicates_removed = dedupe_exact(dataset);
        Ok(())
    }

    fn stage_name(&self) -> &str {
        "dedup"
    }
}

/// Build the standard cleaning pipeline.
pub fn build_pipeline(
    options: &CleaningOptions,
    suggestions: Vec<TransformationSuggestion>,
    remove_empty_rows: bool,
) -> CleaningPipeline {
    CleaningPipeline::new()
        .add_stage(Box::new(OutlierStage {
            iqr_factor: options.outlier_iqr_factor,
        }))
        .add_stage(Box::new(StandardizeStage))
        .add_stage(Box::new(ImputeStage))
        .add_stage(Box::new(AdvisoryStage { suggestions }))
        .add_stage(Box::new(DedupStage { remove_empty_rows }))
}

fn run_stages(
    dataset: &mut Dataset,
    options: &CleaningOptions,
    advisor: &dyn AdvisoryProvider,
    remove_empty_rows: bool,
) -> Result<CleaningStats> {
    let profiles = profile_columns(dataset, options.sample_cap);
    let mut stats = CleaningStats {
        initial_missing: dataset.missing_cells(),
        ..CleaningStats::new()
    };
    let suggestions = if options.use_advisory {
        fetch_suggestions(advisor, dataset, &profiles, options)
    } else {
        Vec::new()
    };
    let pipeline = build_pipeline(options, suggestions, remove_empty_rows);
    pipeline.execute(dataset, &profiles, &mut stats)?;
    stats.remaining_missing = dataset.missing_cells();
    info!(
        initial_missing = stats.initial_missing,
        values_filled = stats.values_filled,
        remaining_missing = stats.remaining_missing,
        duplicates_removed = stats.duplicates_removed,
        "cleaning finished"
    );
    Ok(stats)
}

/// Clean a single dataset in place. The single-source entry point of
/// the pipeline contract.
pub fn clean_dataset(
    dataset: &mut Dataset,
    options: &CleaningOptions,
    advisor: &dyn AdvisoryProvider,
) -> Result<CleaningStats> {
    run_stages(dataset, options, advisor, false)
}

/// Reconcile multiple sources per `merge`, then clean the combined
/// dataset. The multi-source entry point of the pipeline contract.
///
/// Fatal merge errors (`SchemaMismatch`, `EmptySource`) are returned
/// without a dataset; there are no partial-commit semantics.
pub fn merge_and_clean(
    sources: Vec<Dataset>,
    merge: &MergeSpec,
    options: &CleaningOptions,
    advisor: &dyn AdvisoryProvider,
) -> Result<(Dataset, CleaningStats)> {
    let mut merged = reconcile(sources, merge)?;
    let stats = run_stages(&mut merged, options, advisor, merge.remove_empty_rows)?;
    Ok((merged, stats))
}

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use scrub_core::{DEFAULT_TTL, NullAdvisor, SessionStore, clean_dataset, merge_and_clean};
use scrub_model::{CleaningOptions, CleaningStats, MatchStrategy, MergeMode, MergeSpec};
use tracing::info;

use crate::cli::{CleanArgs, MergeArgs, MergeModeArg};
use scrub_cli::ingest::{load_dataset, write_json};

/// Outcome of one CLI run, stashed in the session store under `run_id`.
pub struct RunResult {
    pub run_id: String,
    pub rows: usize,
    pub columns: usize,
    pub stats: CleaningStats,
    pub output: PathBuf,
}

pub fn run_clean(args: &CleanArgs, store: &dyn SessionStore) -> Result<RunResult> {
    let mut dataset = load_dataset(&args.input)?;
    info!(
        rows = dataset.len(),
        columns = dataset.columns().len(),
        input = %args.input.display(),
        "dataset loaded"
    );
    let options = CleaningOptions {
        sample_cap: args.sample_cap,
        ..CleaningOptions::offline()
    };
    let stats = clean_dataset(&mut dataset, &options, &NullAdvisor)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("cleaned.json"));
    write_json(&output, &dataset)?;
    finish_run(store, &dataset, stats, output)
}

pub fn run_merge(args: &MergeArgs, store: &dyn SessionStore) -> Result<RunResult> {
    let mut sources = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        sources.push(load_dataset(input)?);
    }
    let spec = merge_spec_from_args(args);
    let options = CleaningOptions {
        sample_cap: args.sample_cap,
        ..CleaningOptions::offline()
    };
    let (dataset, stats) = merge_and_clean(sources, &spec, &options, &NullAdvisor)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.inputs[0].with_extension("merged.json"));
    write_json(&output, &dataset)?;
    finish_run(store, &dataset, stats, output)
}

fn merge_spec_from_args(args: &MergeArgs) -> MergeSpec {
    let mode = match args.mode {
        MergeModeArg::Inner => MergeMode::Inner,
        MergeModeArg::Outer => MergeMode::Outer,
        MergeModeArg::Left => MergeMode::Left,
        MergeModeArg::Right => MergeMode::Right,
        MergeModeArg::Concat => MergeMode::Concat,
    };
    let match_strategy = if args.match_column.is_some() {
        MatchStrategy::Specific
    } else {
        MatchStrategy::Auto
    };
    MergeSpec {
        mode,
        match_strategy,
        match_column: args.match_column.clone(),
        case_insensitive: !args.case_sensitive,
        trim_whitespace: !args.no_trim,
        remove_empty_rows: !args.keep_empty_rows,
    }
}

fn finish_run(
    store: &dyn SessionStore,
    dataset: &scrub_model::Dataset,
    stats: CleaningStats,
    output: PathBuf,
) -> Result<RunResult> {
    let run_id = next_run_id();
    let stored = serde_json::to_value(&stats).context("serialize stats")?;
    store.put(&run_id, stored, DEFAULT_TTL);
    Ok(RunResult {
        run_id,
        rows: dataset.len(),
        columns: dataset.columns().len(),
        stats,
        output,
    })
}

fn next_run_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    format!("run-{nanos:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrub_core::MemoryStore;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join("scrub-commands-test");
        std::fs::create_dir_all(&dir).expect("temp dir");
        dir
    }

    #[test]
    fn clean_command_writes_output_and_stashes_stats() {
        let dir = temp_dir();
        let input = dir.join("people.csv");
        std::fs::write(&input, "age,city\n30,Oslo\n,Oslo\n50,Turku\n").expect("write csv");
        let args = CleanArgs {
            input: input.clone(),
            output: Some(dir.join("people.cleaned.json")),
            sample_cap: 100,
        };
        let store = MemoryStore::new();
        let result = run_clean(&args, &store).expect("clean");
        assert_eq!(result.rows, 3);
        assert_eq!(result.stats.values_filled, 1);
        let stored = store.get(&result.run_id).expect("stored stats");
        assert_eq!(stored["values_filled"], serde_json::json!(1));
        assert!(args.output.unwrap().exists());
    }
}

//! CLI argument definitions for the cleaning pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "scrub",
    version,
    about = "Tabular data cleaner - infer, standardize, impute, merge, dedup",
    long_about = "Clean tabular data files.\n\n\
                  Infers column types, flags outliers, standardizes dates and\n\
                  emails, fills missing values, and deduplicates. Multiple\n\
                  sources can be reconciled by concatenation or sequential joins."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean a single data file.
    Clean(CleanArgs),

    /// Reconcile and clean two or more data files.
    Merge(MergeArgs),
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Input file (.csv or .json record array).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the cleaned records (default: <INPUT>.cleaned.json).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Per-column sample cap for type inference.
    #[arg(long = "sample-cap", default_value_t = 100)]
    pub sample_cap: usize,
}

#[derive(Parser)]
pub struct MergeArgs {
    /// Input files, processed in the order given. Order matters for
    /// left/right joins.
    #[arg(value_name = "INPUTS", num_args = 2..)]
    pub inputs: Vec<PathBuf>,

    /// Where to write the merged, cleaned records.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// How records are combined across sources.
    #[arg(long = "mode", value_enum, default_value = "inner")]
    pub mode: MergeModeArg,

    /// Join on a named column instead of the automatic column
    /// intersection.
    #[arg(long = "match-column", value_name = "COLUMN")]
    pub match_column: Option<String>,

    /// Match join keys with their original casing.
    #[arg(long = "case-sensitive")]
    pub case_sensitive: bool,

    /// Skip the whitespace-trimming pre-pass.
    #[arg(long = "no-trim")]
    pub no_trim: bool,

    /// Keep rows where every field is missing.
    #[arg(long = "keep-empty-rows")]
    pub keep_empty_rows: bool,

    /// Per-column sample cap for type inference.
    #[arg(long = "sample-cap", default_value_t = 100)]
    pub sample_cap: usize,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MergeModeArg {
    Inner,
    Outer,
    Left,
    Right,
    Concat,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

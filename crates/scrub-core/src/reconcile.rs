//! Schema reconciliation: aligning and merging heterogeneous sources.
//!
//! Sources are processed in caller-supplied order and joined pairwise,
//! strictly sequentially: `join(join(S0, S1), S2)`. The fold order is
//! load-bearing for the non-commutative `left`/`right` modes, so it must
//! not be reordered or batched.

use std::collections::{HashMap, HashSet};

use scrub_model::{
    Dataset, MatchStrategy, MergeMode, MergeSpec, Record, Result, ScrubError, Value,
};
use tracing::{debug, info};

use crate::data_utils::{mean, numeric_value, value_key};

/// Column receiving pre-join numeric coercion regardless of strategy.
/// Mismatched age representations are the most common cause of join
/// failure, so this runs ahead of the generic coercion.
const AGE_COLUMN: &str = "Age";

/// Merge `sources` into one dataset per `spec`.
///
/// Fatal errors: [`ScrubError::EmptySource`] when a source has no
/// records, [`ScrubError::SchemaMismatch`] when no join schema can be
/// established. Everything else is non-fatal; failed coercions revert
/// per column and processing continues.
pub fn reconcile(mut sources: Vec<Dataset>, spec: &MergeSpec) -> Result<Dataset> {
    for (index, source) in sources.iter().enumerate() {
        if source.is_empty() {
            return Err(ScrubError::EmptySource {
                source_index: index,
            });
        }
    }
    if spec.trim_whitespace {
        for source in &mut sources {
            trim_text_cells(source);
        }
    }
    if spec.mode == MergeMode::Concat {
        return Ok(concat(sources));
    }
    for source in &mut sources {
        coerce_age_column(source);
    }
    let keys = match spec.match_strategy {
        MatchStrategy::Specific => {
            let Some(key) = spec.match_column.as_deref() else {
                return Err(ScrubError::SchemaMismatch {
                    source_index: 0,
                    reason: "no match column named for specific matching".to_string(),
                });
            };
            for (index, source) in sources.iter().enumerate() {
                if !source.has_column(key) {
                    return Err(ScrubError::SchemaMismatch {
                        source_index: index,
                        reason: format!("match column `{key}` not found"),
                    });
                }
            }
            if spec.case_insensitive {
                for source in &mut sources {
                    lowercase_column(source, key);
                }
            }
            vec![key.to_string()]
        }
        MatchStrategy::Auto => {
            let keys = common_columns(&sources)?;
            for key in &keys {
                coerce_numeric_column(&mut sources, key);
            }
            keys
        }
    };
    info!(mode = %spec.mode, keys = ?keys, sources = sources.len(), "joining sources");
    let mut iter = sources.into_iter();
    let Some(mut merged) = iter.next() else {
        return Ok(Dataset::new());
    };
    for source in iter {
        merged = join_pair(&merged, &source, &keys, spec.mode);
    }
    Ok(merged)
}

/// Vertical union: all records in source order, columns the first-seen
/// union across sources. No join logic, no dedup.
fn concat(sources: Vec<Dataset>) -> Dataset {
    let mut combined = Dataset::new();
    for source in &sources {
        for column in source.columns() {
            combined.ensure_column(column);
        }
    }
    for source in sources {
        for record in source.records() {
            combined.push_record(record.clone());
        }
    }
    combined
}

fn trim_text_cells(source: &mut Dataset) {
    for record in source.records_mut() {
        for (_, value) in record.fields_mut() {
            if let Value::Text(text) = value {
                let trimmed = text.trim();
                if trimmed.len() != text.len() {
                    *value = Value::Text(trimmed.to_string());
                }
            }
        }
    }
}

fn lowercase_column(source: &mut Dataset, column: &str) {
    for record in source.records_mut() {
        if let Value::Text(text) = record.get(column) {
            let lowered = text.to_lowercase();
            if lowered != *text {
                record.set(column.to_string(), Value::Text(lowered));
            }
        }
    }
}

/// Coerce an `Age` column to integers: parseable entries truncate,
/// unparseable or missing entries take the column mean (0 when nothing
/// parses).
fn coerce_age_column(source: &mut Dataset) {
    if !source.has_column(AGE_COLUMN) {
        return;
    }
    let parseable: Vec<f64> = source
        .column_values(AGE_COLUMN)
        .filter_map(|value| value.as_f64())
        .collect();
    let fill = mean(&parseable).unwrap_or(0.0) as i64;
    for record in source.records_mut() {
        let coerced = match record.get(AGE_COLUMN).as_f64() {
            Some(parsed) => Value::Int(parsed as i64),
            None => Value::Int(fill),
        };
        record.set(AGE_COLUMN.to_string(), coerced);
    }
    debug!(fill, "age column coerced to integers");
}

/// Intersection of column names across all sources, in first-source
/// order. The source that empties the intersection is the one reported.
fn common_columns(sources: &[Dataset]) -> Result<Vec<String>> {
    let mut common: Vec<String> = sources[0].columns().to_vec();
    for (index, source) in sources.iter().enumerate().skip(1) {
        let names: HashSet<&String> = source.columns().iter().collect();
        common.retain(|column| names.contains(column));
        if common.is_empty() {
            return Err(ScrubError::SchemaMismatch {
                source_index: index,
                reason: "no common columns across sources".to_string(),
            });
        }
    }
    Ok(common)
}

/// Coerce a common column to numeric across all sources when every
/// non-missing value in every source parses; otherwise revert silently
/// (the failed cast keeps the original values, non-fatal by design).
fn coerce_numeric_column(sources: &mut [Dataset], column: &str) {
    let mut any_text = false;
    for source in sources.iter() {
        for value in source.column_values(column) {
            if value.is_missing() {
                continue;
            }
            match value {
                Value::Text(_) => {
                    if value.as_f64().is_none() {
                        debug!(column, "coercion reverted, column stays text");
                        return;
                    }
                    any_text = true;
                }
                Value::Int(_) | Value::Float(_) => {}
                Value::Bool(_) | Value::Missing => return,
            }
        }
    }
    if !any_text {
        return;
    }
    for source in sources.iter_mut() {
        for record in source.records_mut() {
            let value = record.get(column);
            if value.is_missing() {
                continue;
            }
            if let Some(parsed) = value.as_f64() {
                record.set(column.to_string(), numeric_value(parsed));
            }
        }
    }
    debug!(column, "common column coerced to numeric");
}

/// Composite join key for a record; `None` when any key cell is null,
/// which never matches anything.
fn join_key(record: &Record, keys: &[String]) -> Option<String> {
    let mut parts = Vec::with_capacity(keys.len());
    for key in keys {
        let value = record.get(key);
        if matches!(value, Value::Missing) {
            return None;
        }
        parts.push(value_key(value));
    }
    Some(parts.join("\u{1f}"))
}

/// One pairwise hash join. Many-to-many keys produce the cross product;
/// merged records coalesce (left fields win, right fields fill cells the
/// left leaves missing); output columns are the left list followed by
/// unseen right columns.
fn join_pair(left: &Dataset, right: &Dataset, keys: &[String], mode: MergeMode) -> Dataset {
    let mut joined = Dataset::new();
    for column in left.columns() {
        joined.ensure_column(column);
    }
    for column in right.columns() {
        joined.ensure_column(column);
    }
    let mut right_index: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, record) in right.records().iter().enumerate() {
        if let Some(key) = join_key(record, keys) {
            right_index.entry(key).or_default().push(index);
        }
    }
    match mode {
        MergeMode::Inner | MergeMode::Left | MergeMode::Outer => {
            let mut matched_right: HashSet<usize> = HashSet::new();
            for record in left.records() {
                let matches = join_key(record, keys)
                    .and_then(|key| right_index.get(&key))
                    .cloned()
                    .unwrap_or_default();
                if matches.is_empty() {
                    if mode != MergeMode::Inner {
                        joined.push_record(record.clone());
                    }
                    continue;
                }
                for right_idx in matches {
                    matched_right.insert(right_idx);
                    joined.push_record(coalesce(record, &right.records()[right_idx]));
                }
            }
            if mode == MergeMode::Outer {
                for (index, record) in right.records().iter().enumerate() {
                    if !matched_right.contains(&index) {
                        joined.push_record(record.clone());
                    }
                }
            }
        }
        MergeMode::Right => {
            let mut left_index: HashMap<String, Vec<usize>> = HashMap::new();
            for (index, record) in left.records().iter().enumerate() {
                if let Some(key) = join_key(record, keys) {
                    left_index.entry(key).or_default().push(index);
                }
            }
            for record in right.records() {
                let matches = join_key(record, keys)
                    .and_then(|key| left_index.get(&key))
                    .cloned()
                    .unwrap_or_default();
                if matches.is_empty() {
                    joined.push_record(record.clone());
                    continue;
                }
                for left_idx in matches {
                    joined.push_record(coalesce(&left.records()[left_idx], record));
                }
            }
        }
        MergeMode::Concat => unreachable!("concat never reaches the join fold"),
    }
    joined
}

fn coalesce(left: &Record, right: &Record) -> Record {
    let mut merged = left.clone();
    for (name, value) in right.fields() {
        if value.is_missing() {
            continue;
        }
        if merged.get(name).is_missing() {
            merged.set(name.clone(), value.clone());
        }
    }
    merged
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{MISSING, Value};

/// One row: a sparse mapping from column name to cell value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    cells: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell value for `column`; absent fields read as missing.
    pub fn get(&self, column: &str) -> &Value {
        self.cells.get(column).unwrap_or(&MISSING)
    }

    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.cells.insert(column.into(), value);
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.cells.iter()
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = (&String, &mut Value)> {
        self.cells.iter_mut()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// An ordered collection of records with a stable column list.
///
/// The column list is the union of record field names in first-seen
/// order; records stay sparse. The dataset is owned by one pipeline
/// invocation and mutated in place through the stages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from records, deriving the column list from the
    /// records' field names in first-seen order.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut dataset = Self::new();
        for record in records {
            dataset.push_record(record);
        }
        dataset
    }

    /// Append a record, registering any new columns it introduces.
    pub fn push_record(&mut self, record: Record) {
        for (name, _) in record.fields() {
            if !self.columns.iter().any(|column| column == name) {
                self.columns.push(name.clone());
            }
        }
        self.records.push(record);
    }

    /// Register a column without adding records. No-op if already present.
    pub fn ensure_column(&mut self, name: &str) {
        if !self.columns.iter().any(|column| column == name) {
            self.columns.push(name.to_string());
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keep only the records whose index passes `keep`. Used by dedup and
    /// empty-row removal; the column list is unchanged.
    pub fn retain_records(&mut self, mut keep: impl FnMut(usize) -> bool) {
        let mut index = 0;
        self.records.retain(|_| {
            let kept = keep(index);
            index += 1;
            kept
        });
    }

    /// Values of one column across all records, in record order. Absent
    /// fields read as missing.
    pub fn column_values(&self, name: &str) -> impl Iterator<Item = &Value> {
        self.records.iter().map(move |record| record.get(name))
    }

    /// Count of missing cells across the full column/record grid.
    pub fn missing_cells(&self) -> usize {
        self.records
            .iter()
            .map(|record| {
                self.columns
                    .iter()
                    .filter(|column| record.get(column).is_missing())
                    .count()
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn columns_follow_first_seen_order() {
        let dataset = Dataset::from_records(vec![
            record(&[("b", Value::Int(1)), ("a", Value::Int(2))]),
            record(&[("c", Value::Int(3))]),
        ]);
        // BTreeMap iteration is sorted within one record; new columns from
        // later records append after.
        assert_eq!(dataset.columns(), &["a", "b", "c"]);
    }

    #[test]
    fn absent_fields_read_as_missing() {
        let dataset = Dataset::from_records(vec![
            record(&[("a", Value::Int(1)), ("b", Value::Int(2))]),
            record(&[("a", Value::Int(3))]),
        ]);
        assert!(dataset.records()[1].get("b").is_missing());
        assert_eq!(dataset.missing_cells(), 1);
    }
}

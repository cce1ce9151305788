//! Local-file ingestion: the caller side of the pipeline contract.
//!
//! Decoders hand the core an already-parsed dataset; only CSV and JSON
//! record arrays are supported here. Cleaned output is written back as a
//! JSON record array.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result, bail};
use scrub_model::{Dataset, Record, Value};

/// Load a dataset, dispatching on the file extension.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => bail!("unsupported input format: `{other}` (expected csv or json)"),
    }
}

/// CSV ingestion: first row is the header, every cell arrives as text.
/// Empty cells read as missing downstream.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("read csv header")?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();
    let mut dataset = Dataset::new();
    for header in &headers {
        dataset.ensure_column(header);
    }
    for row in reader.records() {
        let row = row.context("read csv record")?;
        let mut record = Record::new();
        for (index, header) in headers.iter().enumerate() {
            let cell = row.get(index).unwrap_or_default();
            record.set(header.clone(), Value::Text(cell.to_string()));
        }
        dataset.push_record(record);
    }
    Ok(dataset)
}

/// JSON ingestion: an array of flat objects.
fn load_json(path: &Path) -> Result<Dataset> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let records: Vec<Record> =
        serde_json::from_reader(file).context("parse json record array")?;
    Ok(Dataset::from_records(records))
}

/// Write the cleaned dataset as a JSON record array.
pub fn write_json(path: &Path, dataset: &Dataset) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), dataset.records())
        .context("write json records")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_cells_arrive_as_text() {
        let dir = std::env::temp_dir().join("scrub-ingest-test");
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("sample.csv");
        std::fs::write(&path, "id,name\n1,A\n2,\n").expect("write csv");
        let dataset = load_dataset(&path).expect("load");
        assert_eq!(dataset.columns(), &["id", "name"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].get("id"), &Value::from("1"));
        assert!(dataset.records()[1].get("name").is_missing());
    }

    #[test]
    fn json_round_trips_through_output() {
        let dir = std::env::temp_dir().join("scrub-ingest-test");
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("sample.json");
        std::fs::write(&path, r#"[{"id": 1, "name": "A"}, {"id": 2, "name": null}]"#)
            .expect("write json");
        let dataset = load_dataset(&path).expect("load");
        assert_eq!(dataset.records()[0].get("id"), &Value::Int(1));
        assert!(dataset.records()[1].get("name").is_missing());

        let out = dir.join("out.json");
        write_json(&out, &dataset).expect("write");
        let round = load_dataset(&out).expect("reload");
        assert_eq!(round.records(), dataset.records());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(load_dataset(Path::new("data.parquet")).is_err());
    }
}

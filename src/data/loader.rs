use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array,
    Int64Array,
};
use arrow::datatypes::DataType;
use arrow::temporal_conversions::date32_to_datetime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Record, Value};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat columns of strings, integers, floats, booleans, dates
/// * `.json`    – `[{ "Employee_ID": 101, "Job_Title": "...", ... }, ...]`
/// * `.csv`     – header row, one record per line
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} records with columns {:?} from {}",
        dataset.len(),
        dataset.column_names(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Employee_ID": 101, "Job_Title": "Software Engineer", "Monthly_Salary": 75000 },
///   ...
/// ]
/// ```
///
/// Column order follows first appearance across the records.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut values = BTreeMap::new();
        for (key, val) in obj {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            values.insert(key.clone(), json_to_value(val));
        }
        records.push(Record::new(values));
    }

    Ok(Dataset::with_columns(columns, records))
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) if is_iso_date(s) => Value::Date(s.clone()),
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row.
/// Cell types are guessed (integer, float, bool, ISO date, string); empty
/// cells become `Null`.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        if row.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, found {}",
                headers.len(),
                row.len()
            );
        }

        let values = headers
            .iter()
            .zip(row.iter())
            .map(|(col, cell)| (col.clone(), guess_value_type(cell.trim())))
            .collect();
        records.push(Record::new(values));
    }

    Ok(Dataset::with_columns(headers, records))
}

fn guess_value_type(s: &str) -> Value {
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    if s == "true" || s == "false" {
        return Value::Bool(s == "true");
    }
    if is_iso_date(s) {
        return Value::Date(s.to_string());
    }
    Value::String(s.to_string())
}

/// `YYYY-MM-DD` with a plausible month and day.
fn is_iso_date(s: &str) -> bool {
    let parts: Vec<&str> = s.split('-').collect();
    let [y, m, d] = parts.as_slice() else {
        return false;
    };
    let digits = |p: &str, n: usize| p.len() == n && p.bytes().all(|b| b.is_ascii_digit());
    if !(digits(*y, 4) && digits(*m, 2) && digits(*d, 2)) {
        return false;
    }
    matches!(m.parse::<u8>(), Ok(1..=12)) && matches!(d.parse::<u8>(), Ok(1..=31))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Works with files written by **Pandas** (`df.to_parquet()`), **Polars**
/// (`df.write_parquet()`) and the `generate_sample` binary.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let mut values = BTreeMap::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = extract_value(batch.column(col_idx), row)
                    .with_context(|| format!("Row {row}, column '{}'", field.name()))?;
                values.insert(field.name().clone(), value);
            }
            records.push(Record::new(values));
        }
    }

    Ok(Dataset::with_columns(columns, records))
}

// -- Parquet / Arrow helpers --

fn downcast<'a, T: 'static>(col: &'a Arc<dyn Array>) -> Result<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array for {:?}", col.data_type()))
}

/// Extract a single value from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => Value::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Value::Integer(downcast::<Int32Array>(col)?.value(row) as i64),
        DataType::Int64 => Value::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => Value::Float(downcast::<Float32Array>(col)?.value(row) as f64),
        DataType::Float64 => Value::Float(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => Value::Bool(downcast::<BooleanArray>(col)?.value(row)),
        DataType::Date32 => {
            let days = downcast::<Date32Array>(col)?.value(row);
            let date = date32_to_datetime(days).context("date out of range")?;
            Value::Date(date.date().to_string())
        }
        other => {
            log::warn!("unsupported column type {other:?}, reading as text");
            Value::String(format!("{other:?}"))
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::batch::to_record_batch;
    use crate::data::employee::{self, sample_dataset};
    use crate::data::filter::FilteredView;
    use crate::data::model::ColumnKind;
    use parquet::arrow::ArrowWriter;
    use std::io::Write;

    #[test]
    fn test_guess_value_type() {
        assert_eq!(guess_value_type(""), Value::Null);
        assert_eq!(guess_value_type("42"), Value::Integer(42));
        assert_eq!(guess_value_type("4.5"), Value::Float(4.5));
        assert_eq!(guess_value_type("true"), Value::Bool(true));
        assert_eq!(guess_value_type("2019-06-15"), Value::Date("2019-06-15".into()));
        assert_eq!(guess_value_type("2019-13-15"), Value::from("2019-13-15"));
        assert_eq!(guess_value_type("PhD"), Value::from("PhD"));
    }

    #[test]
    fn test_load_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staff.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "Employee_ID, Job_Title ,Hire_Date,Monthly_Salary").unwrap();
        writeln!(f, "101,Software Engineer,2019-06-15,75000").unwrap();
        writeln!(f, "102,Data Scientist,2017-09-23,").unwrap();
        drop(f);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.column_names(), ["Employee_ID", "Job_Title", "Hire_Date", "Monthly_Salary"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].get("Monthly_Salary"), &Value::Null);
        assert_eq!(ds.column_kind("Hire_Date"), Some(ColumnKind::Date));
        assert_eq!(ds.column_kind("Monthly_Salary"), Some(ColumnKind::Numeric));
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staff.json");
        let json = serde_json::to_string(&employee::sample_employees()).unwrap();
        std::fs::write(&path, json).unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 5);
        assert_eq!(ds.records(), sample_dataset().records());
    }

    #[test]
    fn test_load_json_keeps_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unsorted.json");
        std::fs::write(&path, r#"[{"Zeta": 1, "Alpha": 2, "Mid": 3}, {"Alpha": 4, "Extra": 5}]"#)
            .unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.column_names(), ["Zeta", "Alpha", "Mid", "Extra"]);
    }

    #[test]
    fn test_load_empty_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "[]").unwrap();

        let ds = load_file(&path).unwrap();
        assert!(ds.is_empty());
        assert!(ds.column_names().is_empty());
    }

    #[test]
    fn test_load_json_rejects_non_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Row 0 is not a JSON object"));
    }

    #[test]
    fn test_load_parquet_written_from_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staff.parquet");
        let ds = sample_dataset();
        let batch = to_record_batch(&FilteredView::all(ds)).unwrap();

        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.column_names(), ds.column_names());
        assert_eq!(loaded.records(), ds.records());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("staff.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}

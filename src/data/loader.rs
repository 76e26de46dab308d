use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Column, TableView};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a numeric table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one column per field; numeric and string fields are cast to f64
/// * `.json`    – `[{ "TRIP_MILES": 1.2, "FARE": 7.5, ... }, ...]`
/// * `.csv`     – header row with column names, one record per row
///
/// Cells that are missing or cannot be read as a number become `NaN`.
pub fn load_file(path: &Path) -> Result<TableView> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::debug!(
        "loaded {} rows × {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

/// Interpret one text cell.  Empty and non-numeric text map to `NaN`.
pub fn parse_cell(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`).
///
/// Columns are the union of keys over all records; a record lacking a key
/// contributes `NaN` for that column.
fn load_json(path: &Path) -> Result<TableView> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let values = records
                .iter()
                .map(|rec| rec.get(&name).map(json_to_f64).unwrap_or(f64::NAN))
                .collect();
            Column::new(name, values)
        })
        .collect();

    Ok(TableView::new(columns)?)
}

fn json_to_f64(val: &JsonValue) -> f64 {
    match val {
        JsonValue::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        JsonValue::String(s) => parse_cell(s),
        _ => f64::NAN,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every other row one record.
fn load_csv(path: &Path) -> Result<TableView> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, column) in values.iter_mut().enumerate() {
            column.push(record.get(col_idx).map(parse_cell).unwrap_or(f64::NAN));
        }
    }

    let columns = headers
        .into_iter()
        .zip(values)
        .map(|(name, vals)| Column::new(name, vals))
        .collect();

    Ok(TableView::new(columns)?)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load every field of a Parquet file as a numeric column.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<TableView> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, column) in values.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            append_as_f64(column, array, &names[col_idx]);
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, vals)| Column::new(name, vals))
        .collect();

    Ok(TableView::new(columns)?)
}

// -- Arrow helpers --

/// Append an Arrow column to `out` as f64, nulls and uncastable types as `NaN`.
fn append_as_f64(out: &mut Vec<f64>, array: &ArrayRef, name: &str) {
    let casted = match array.data_type() {
        DataType::Float64 => Ok(array.clone()),
        _ => cast(array, &DataType::Float64),
    };

    match casted {
        Ok(arr) => {
            let floats = arr.as_primitive::<Float64Type>();
            out.extend(floats.iter().map(|v| v.unwrap_or(f64::NAN)));
        }
        Err(e) => {
            log::warn!(
                "column '{name}' of type {:?} is not numeric ({e}); filling with NaN",
                array.data_type()
            );
            out.extend(std::iter::repeat(f64::NAN).take(array.len()));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parse_cell_maps_garbage_to_nan() {
        assert_eq!(parse_cell(" 2.5 "), 2.5);
        assert!(parse_cell("").is_nan());
        assert!(parse_cell("n/a").is_nan());
    }

    #[test]
    fn csv_keeps_rows_aligned() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "trips.csv",
            "TRIP_MILES,FARE,COMPANY\n1.5,7.25,Flash\n,9.0,Taxi\n3.0,oops,Cab\n",
        );

        let table = load_file(&path).unwrap();
        assert_eq!(table.column_names(), vec!["TRIP_MILES", "FARE", "COMPANY"]);
        assert_eq!(table.row_count(), 3);

        let miles = table.column("TRIP_MILES").unwrap();
        assert_eq!(miles[0], 1.5);
        assert!(miles[1].is_nan());
        assert_eq!(miles[2], 3.0);
        assert!(table.column("FARE").unwrap()[2].is_nan());
        assert!(table.column("COMPANY").unwrap().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn json_records_union_of_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "trips.json",
            r#"[{"a": 1, "b": "2.5"}, {"a": 3.5}, {"b": null, "c": 4}]"#,
        );

        let table = load_file(&path).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column("a").unwrap()[1], 3.5);
        assert!(table.column("a").unwrap()[2].is_nan());
        assert_eq!(table.column("b").unwrap()[0], 2.5);
        assert!(table.column("b").unwrap()[2].is_nan());
        assert_eq!(table.column("c").unwrap()[2], 4.0);
    }

    #[test]
    fn parquet_casts_numeric_and_string_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trips.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("miles", DataType::Float64, true),
            Field::new("seconds", DataType::Int64, false),
            Field::new("label", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![Some(1.0), None])),
                Arc::new(Int64Array::from(vec![60, 120])),
                Arc::new(StringArray::from(vec!["1.25", "x"])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.column_names(), vec!["miles", "seconds", "label"]);
        assert!(table.column("miles").unwrap()[1].is_nan());
        assert_eq!(table.column("seconds").unwrap(), &[60.0, 120.0]);
        assert_eq!(table.column("label").unwrap()[0], 1.25);
        assert!(table.column("label").unwrap()[1].is_nan());
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        assert!(load_file(Path::new("table.xlsx")).is_err());
    }
}

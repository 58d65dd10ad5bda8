use std::io::Read;
use std::path::Path;
use std::time::Instant;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::compute::{can_cast_types, cast};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{LoadError, LoadResult};
use super::model::{CellValue, RawRow};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load raw rows from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one registration per line (the published layout)
/// * `.json`    – `[{ "Make": "TESLA", "Model Year": 2020, ... }, ...]`
/// * `.parquet` – one column per source field
pub fn load_file(path: &Path) -> LoadResult<Vec<RawRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let started = Instant::now();
    let rows = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }?;

    log::info!(
        "Read {} rows from {} in {:.1?}",
        rows.len(),
        path.display(),
        started.elapsed()
    );
    Ok(rows)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> LoadResult<Vec<RawRow>> {
    let file = std::fs::File::open(path)?;
    load_csv_reader(file)
}

/// Parse CSV text with a header row.
///
/// Blank lines are skipped, cells are trimmed, and rows shorter than the
/// header simply lack the trailing columns. Invalid UTF-8 is replaced with
/// U+FFFD per cell, so one bad byte only affects its own field.
pub fn load_csv_reader<R: Read>(source: R) -> LoadResult<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let mut rows = Vec::new();
    for result in reader.byte_records() {
        let record = result?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), guess_cell_type(&String::from_utf8_lossy(value))))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Best-effort dynamic typing of a CSV cell.
///
/// A number is only kept as a number when it prints back as the same text,
/// so IDs like `02134` or `1234567E12` stay strings.
pub fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        if i.to_string() == s {
            return CellValue::Integer(i);
        }
        return CellValue::String(s.to_string());
    }
    if let Ok(f) = s.parse::<f64>() {
        let cell = CellValue::Float(f);
        if f.is_finite() && cell.to_string() == s {
            return cell;
        }
        return CellValue::String(s.to_string());
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> LoadResult<Vec<RawRow>> {
    let text = std::fs::read_to_string(path)?;
    load_json_str(&text)
}

/// Parse a records-oriented JSON array (one object per registration).
pub fn load_json_str(text: &str) -> LoadResult<Vec<RawRow>> {
    let root: JsonValue = serde_json::from_str(text)?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::InvalidLayout("expected top-level JSON array".into()))?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .ok_or_else(|| LoadError::InvalidLayout(format!("row {i} is not a JSON object")))?;
            Ok(obj
                .iter()
                .map(|(key, val)| (key.clone(), json_to_cell(val)))
                .collect())
        })
        .collect()
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per source field.
///
/// Works with files written by **Pandas** (`df.to_parquet()`), **Polars**
/// (`df.write_parquet()`) and the bundled `generate_sample` tool.
fn load_parquet(path: &Path) -> LoadResult<Vec<RawRow>> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();
        let columns: Vec<(String, ColumnCells)> = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(field, col)| Ok((field.name().clone(), ColumnCells::new(field.name(), col)?)))
            .collect::<LoadResult<_>>()?;

        for row in 0..batch.num_rows() {
            let raw: RawRow = columns
                .iter()
                .map(|(name, col)| (name.clone(), col.cell(row)))
                .collect();
            rows.push(raw);
        }
    }

    Ok(rows)
}

/// A batch column prepared for per-row cell extraction.
enum ColumnCells {
    /// Types with a direct [`CellValue`] mapping.
    Native(ArrayRef),
    /// Anything else (Int16, UInt32, dictionaries, views, ...) cast to Utf8
    /// and re-typed like a CSV cell.
    Text(ArrayRef),
    /// No text representation; every cell reads as null.
    Unreadable,
}

impl ColumnCells {
    fn new(name: &str, col: &ArrayRef) -> LoadResult<Self> {
        match col.data_type() {
            DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Int32
            | DataType::Int64
            | DataType::Float32
            | DataType::Float64
            | DataType::Boolean => Ok(ColumnCells::Native(col.clone())),
            other if can_cast_types(other, &DataType::Utf8) => {
                Ok(ColumnCells::Text(cast(col, &DataType::Utf8)?))
            }
            other => {
                log::warn!("Column '{name}' has unsupported type {other:?}; reading as null");
                Ok(ColumnCells::Unreadable)
            }
        }
    }

    fn cell(&self, row: usize) -> CellValue {
        match self {
            ColumnCells::Native(col) => extract_cell(col, row),
            ColumnCells::Text(col) if col.is_null(row) => CellValue::Null,
            ColumnCells::Text(col) => guess_cell_type(col.as_string::<i32>().value(row).trim()),
            ColumnCells::Unreadable => CellValue::Null,
        }
    }
}

/// Extract a single cell from a natively mapped Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map_or(CellValue::Null, |a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map_or(CellValue::Null, |a| CellValue::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map_or(CellValue::Null, |a| CellValue::Bool(a.value(row))),
        _ => CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_cell_types() {
        assert_eq!(guess_cell_type(""), CellValue::Null);
        assert_eq!(guess_cell_type("2021"), CellValue::Integer(2021));
        assert_eq!(guess_cell_type("12.5"), CellValue::Float(12.5));
        assert_eq!(guess_cell_type("true"), CellValue::Bool(true));
        assert_eq!(guess_cell_type("NaN"), CellValue::String("NaN".into()));
        assert_eq!(guess_cell_type("-3"), CellValue::Integer(-3));
        assert_eq!(
            guess_cell_type("POINT (-122.3 47.6)"),
            CellValue::String("POINT (-122.3 47.6)".into())
        );
    }

    #[test]
    fn csv_skips_blank_lines_and_tolerates_short_rows() {
        let text = "Make,Model Year,City\nTESLA,2020,Seattle\n\nNISSAN,2019\n";
        let rows = load_csv_reader(text.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Make"], CellValue::String("TESLA".into()));
        assert_eq!(rows[0]["Model Year"], CellValue::Integer(2020));
        assert_eq!(rows[1].get("City"), None);
    }

    #[test]
    fn numeric_looking_ids_keep_their_text() {
        assert_eq!(guess_cell_type("1234567E12"), CellValue::String("1234567E12".into()));
        assert_eq!(guess_cell_type("02134"), CellValue::String("02134".into()));
        assert_eq!(guess_cell_type("+7"), CellValue::String("+7".into()));
        assert_eq!(guess_cell_type("2021.0"), CellValue::String("2021.0".into()));
        // Still usable as a number downstream.
        assert_eq!(guess_cell_type("1e30").as_f64(), Some(1e30));
    }

    #[test]
    fn invalid_utf8_only_affects_its_cell() {
        let mut text = b"Make,City\nTESLA,Seattle\nKIA,Sp".to_vec();
        text.push(0xFF);
        text.extend_from_slice(b"kane\nNISSAN,Tacoma\n");

        let rows = load_csv_reader(text.as_slice()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1]["Make"], CellValue::String("KIA".into()));
        assert_eq!(rows[1]["City"], CellValue::String("Sp\u{FFFD}kane".into()));
        assert_eq!(rows[2]["City"], CellValue::String("Tacoma".into()));
    }

    #[test]
    fn csv_handles_quoted_fields_with_commas() {
        let text = "Make,Electric Utility\nTESLA,\"PUGET SOUND ENERGY INC,CITY OF TACOMA\"\n";
        let rows = load_csv_reader(text.as_bytes()).unwrap();
        assert_eq!(
            rows[0]["Electric Utility"],
            CellValue::String("PUGET SOUND ENERGY INC,CITY OF TACOMA".into())
        );
    }

    #[test]
    fn json_requires_array_of_objects() {
        let rows = load_json_str(r#"[{"Make": "KIA", "Electric Range": 239, "Base MSRP": null}]"#)
            .unwrap();
        assert_eq!(rows[0]["Make"], CellValue::String("KIA".into()));
        assert_eq!(rows[0]["Electric Range"], CellValue::Integer(239));
        assert!(rows[0]["Base MSRP"].is_null());

        let err = load_json_str(r#"{"Make": "KIA"}"#).unwrap_err();
        assert!(matches!(err, LoadError::InvalidLayout(_)));

        let err = load_json_str("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("row 0 is not a JSON object"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("registrations.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ref e) if e == "xlsx"));
    }
}

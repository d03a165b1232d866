use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Dataset, PointRecord, ISOCHORE_COLUMNS};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Reload an exported isochores table. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the isochore columns
/// * `.parquet` – columns of the same names (Utf8 / numeric)
pub fn load_points(path: &Path) -> Result<Vec<PointRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported table extension: .{other}"),
    }
}

/// Reload a points table as a dataset without summary rows.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let points = load_points(path)?;
    log::info!("loaded {} points from {}", points.len(), path.display());
    Ok(Dataset::new(points, None))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<PointRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for col in ISOCHORE_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            bail!("CSV missing '{col}' column");
        }
    }

    reader
        .deserialize::<PointRecord>()
        .enumerate()
        .map(|(row_no, record)| record.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

fn load_parquet(path: &Path) -> Result<Vec<PointRecord>> {
    let file = File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut points = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let [code, sample, assemblage, inclusion, t, p] =
            ISOCHORE_COLUMNS.map(|name| column(&batch, name));
        let (code, sample, assemblage, inclusion, t, p) = (code?, sample?, assemblage?, inclusion?, t?, p?);

        for row in 0..batch.num_rows() {
            let cell = |col: &Arc<dyn Array>, name: &str| {
                extract_string(col, row).with_context(|| format!("Row {row}: failed to read '{name}'"))
            };
            let number = |col: &Arc<dyn Array>, name: &str| {
                extract_f64(col, row).with_context(|| format!("Row {row}: failed to read '{name}'"))
            };
            points.push(PointRecord {
                inclusion_code: cell(code, "Inclusion_code")?,
                sample: cell(sample, "Sample")?,
                assemblage: cell(assemblage, "Assemblage")?,
                inclusion: cell(inclusion, "Inclusion")?,
                temperature_c: number(t, "T (C)")?,
                pressure_bar: number(p, "P (bar)")?,
            });
        }
    }
    Ok(points)
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

// -- Arrow helpers --

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("Expected string column, got {other:?}"),
    }
}

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        other => bail!("Expected numeric column, got {other:?}"),
    };
    value.context("unexpected array layout")
}

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::{info, warn};
use parquet::arrow::ArrowWriter;
use serde::{Deserialize, Serialize};

use super::model::{Dataset, PointRecord, SummaryEntry, ISOCHORE_COLUMNS, SUMMARY_COLUMNS};

pub const ISOCHORES_TABLE: &str = "isochores";
pub const SUMMARY_TABLE: &str = "summary_data";

/// On-disk format of the exported tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    #[default]
    Csv,
    Parquet,
}

impl TableFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Parquet => "parquet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: TableFormat,
    /// Whether the summary table is written. Independent of whether it was
    /// computed.
    pub write_summary: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            format: TableFormat::Csv,
            write_summary: true,
        }
    }
}

/// Paths of the written tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedTables {
    pub isochores: PathBuf,
    pub summary: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write the isochores table (and the summary table, if requested and
/// available) into `out_dir`.
pub fn export_dataset(dataset: &Dataset, out_dir: &Path, options: &ExportOptions) -> Result<ExportedTables> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let table_path = |name: &str| out_dir.join(format!("{name}.{}", options.format.extension()));

    let isochores = table_path(ISOCHORES_TABLE);
    match options.format {
        TableFormat::Csv => write_csv(&isochores, &ISOCHORE_COLUMNS, &dataset.points)?,
        TableFormat::Parquet => write_points_parquet(&isochores, &dataset.points)?,
    }
    info!("wrote {} rows to {}", dataset.points.len(), isochores.display());

    let summary = match (&dataset.summary, options.write_summary) {
        (Some(rows), true) => {
            let path = table_path(SUMMARY_TABLE);
            match options.format {
                TableFormat::Csv => write_csv(&path, &SUMMARY_COLUMNS, rows)?,
                TableFormat::Parquet => write_summary_parquet(&path, rows)?,
            }
            info!("wrote {} rows to {}", rows.len(), path.display());
            Some(path)
        }
        (None, true) => {
            warn!("summary export requested but summary computation is disabled");
            None
        }
        (_, false) => None,
    };

    Ok(ExportedTables { isochores, summary })
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Header is written explicitly so empty tables still carry their columns.
fn write_csv<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(columns).context("writing CSV header")?;
    for (i, row) in rows.iter().enumerate() {
        writer
            .serialize(row)
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    writer.flush().context("flushing CSV writer")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

fn write_points_parquet(path: &Path, points: &[PointRecord]) -> Result<()> {
    let text = |f: fn(&PointRecord) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(points.iter().map(f).collect::<Vec<_>>()))
    };
    let number = |f: fn(&PointRecord) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(points.iter().map(f).collect::<Vec<_>>()))
    };

    let columns = vec![
        text(|p| p.inclusion_code.as_str()),
        text(|p| p.sample.as_str()),
        text(|p| p.assemblage.as_str()),
        text(|p| p.inclusion.as_str()),
        number(|p| p.temperature_c),
        number(|p| p.pressure_bar),
    ];
    write_parquet(path, &ISOCHORE_COLUMNS, 4, columns)
}

fn write_summary_parquet(path: &Path, rows: &[SummaryEntry]) -> Result<()> {
    let number = |f: fn(&SummaryEntry) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let columns = vec![
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.inclusion.as_str()).collect::<Vec<_>>(),
        )) as ArrayRef,
        number(|r| r.homogenization_temperature_c),
        number(|r| r.homogenization_pressure_bar),
        number(|r| r.salinity_wt_pct),
        number(|r| r.density_g_ccm),
    ];
    write_parquet(path, &SUMMARY_COLUMNS, 1, columns)
}

/// The first `n_text` columns are Utf8, the rest Float64.
fn write_parquet(path: &Path, names: &[&str], n_text: usize, columns: Vec<ArrayRef>) -> Result<()> {
    let fields: Vec<Field> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let dtype = if i < n_text { DataType::Utf8 } else { DataType::Float64 };
            Field::new(*name, dtype, false)
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

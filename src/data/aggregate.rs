use std::borrow::Cow;
use std::ffi::OsString;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{IsochoreError, Result};

use super::model::Dataset;
use super::parser::{parse_record, ParsedRecord};

/// Extension of SoWat output files picked up from an input directory.
pub const SOURCE_EXTENSION: &str = "txt";

/// One raw isochore file: filename stem plus its bytes, both undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub identifier: OsString,
    pub content: Vec<u8>,
}

impl SourceFile {
    pub fn new(identifier: impl Into<OsString>, content: impl Into<Vec<u8>>) -> Self {
        SourceFile {
            identifier: identifier.into(),
            content: content.into(),
        }
    }

    /// Identifier for messages; non-UTF-8 bytes are replaced.
    pub fn name(&self) -> Cow<'_, str> {
        self.identifier.to_string_lossy()
    }

    /// Decode and parse this file.
    pub fn parse(&self) -> Result<ParsedRecord> {
        let identifier = self
            .identifier
            .to_str()
            .ok_or_else(|| IsochoreError::identifier(&self.name(), "not valid UTF-8"))?;
        let content = std::str::from_utf8(&self.content).map_err(|err| {
            let valid = &self.content[..err.valid_up_to()];
            let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
            IsochoreError::format(identifier, line, "not valid UTF-8")
        })?;
        parse_record(identifier, content)
    }
}

/// What to do when a single file fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Fail the whole batch; no partial dataset is returned.
    #[default]
    Abort,
    /// Log and skip the file.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateOptions {
    /// Whether summary rows are computed at all.
    pub compute_summary: bool,
    pub on_error: ErrorPolicy,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        AggregateOptions {
            compute_summary: true,
            on_error: ErrorPolicy::Abort,
        }
    }
}

/// Aggregated dataset plus the files that were skipped.
#[derive(Debug)]
pub struct AggregateReport {
    pub dataset: Dataset,
    pub skipped: Vec<(String, IsochoreError)>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Parse every source and collect points (and summaries) into one dataset.
///
/// Row order is per source, in the order given, then per line.
pub fn aggregate(sources: &[SourceFile], options: &AggregateOptions) -> Result<AggregateReport> {
    let mut points = Vec::new();
    let mut summary = options.compute_summary.then(Vec::new);
    let mut skipped = Vec::new();

    let mut parsed = 0usize;

    for source in sources {
        let name = source.name();
        debug!("{name} initiated");
        match source.parse() {
            Ok(record) => {
                points.extend(record.points);
                if let Some(rows) = summary.as_mut() {
                    rows.push(record.summary);
                }
                parsed += 1;
                debug!("{name} completed");
            }
            Err(err) => match options.on_error {
                ErrorPolicy::Abort => return Err(err),
                ErrorPolicy::Skip => {
                    warn!("skipping {name}: {err}");
                    skipped.push((name.into_owned(), err));
                }
            },
        }
    }

    info!(
        "aggregated {} points from {parsed} of {} files",
        points.len(),
        sources.len()
    );

    Ok(AggregateReport {
        dataset: Dataset::new(points, summary),
        skipped,
    })
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> IsochoreError {
    let path = path.to_path_buf();
    move |source| IsochoreError::Io { path, source }
}

/// Read every `*.txt` file in `dir`, sorted by file name.
///
/// Contents are read as bytes; decoding happens per file in [`aggregate`].
pub fn discover_sources(dir: &Path) -> Result<Vec<SourceFile>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err(dir))? {
        let path = entry.map_err(io_err(dir))?.path();
        let is_source = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(SOURCE_EXTENSION));
        if is_source && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let identifier = path.file_stem().map(OsString::from).unwrap_or_default();
        let content = std::fs::read(&path).map_err(io_err(&path))?;
        sources.push(SourceFile { identifier, content });
    }

    info!("found {} isochore files in {}", sources.len(), dir.display());
    Ok(sources)
}

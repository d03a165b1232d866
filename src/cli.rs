use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use log::{info, warn};
use serde::Serialize;

use crate::config::Config;
use crate::data::aggregate::{aggregate, discover_sources, ErrorPolicy};
use crate::data::export::{export_dataset, TableFormat};
use crate::data::loader::load_dataset;
use crate::geometry::envelope::{EnvelopeBuilder, TrappingEnvelope};
use crate::plate::Plate;

pub const DEFAULT_OUTPUT_DIR: &str = "Output";

#[derive(Parser, Debug)]
#[command(name = "sowat-isochores", version, about = "SoWat isochore aggregation and trapping P-T envelopes")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse every *.txt isochore file in a directory and export the tables
    Aggregate {
        #[arg(value_hint = ValueHint::DirPath)]
        input: PathBuf,

        /// Directory the tables are written to
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR, value_hint = ValueHint::DirPath)]
        output: PathBuf,

        #[arg(long, value_enum)]
        format: Option<TableFormat>,

        /// Do not compute summary rows
        #[arg(long, action = ArgAction::SetTrue)]
        no_summary: bool,

        /// Compute summary rows but do not write the summary table
        #[arg(long, action = ArgAction::SetTrue)]
        no_summary_export: bool,

        /// Skip malformed files instead of failing the batch
        #[arg(long, action = ArgAction::SetTrue)]
        skip_invalid: bool,
    },
    /// Compute one trapping envelope per sample from an isochores table
    Envelope {
        #[arg(value_hint = ValueHint::FilePath)]
        table: PathBuf,

        /// Fail if any sample violates the model assumption
        #[arg(long, action = ArgAction::SetTrue)]
        strict: bool,
    },
    /// Write the plate plan (panels, traces, envelopes) as JSON
    Plate {
        #[arg(value_hint = ValueHint::FilePath)]
        table: PathBuf,

        /// Output JSON path (stdout when omitted)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
}

/// Envelope of one sample, or why it could not be built.
#[derive(Debug, Serialize)]
pub struct SampleEnvelope {
    pub sample: String,
    pub envelope: Option<TrappingEnvelope>,
    pub error: Option<String>,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Aggregate {
            input,
            output,
            format,
            no_summary,
            no_summary_export,
            skip_invalid,
        } => {
            let mut config = config;
            if let Some(format) = format {
                config.export.format = format;
            }
            if no_summary {
                config.aggregate.compute_summary = false;
            }
            if no_summary_export {
                config.export.write_summary = false;
            }
            if skip_invalid {
                config.aggregate.on_error = ErrorPolicy::Skip;
            }
            run_aggregate(&config, &input, &output)
        }
        Commands::Envelope { table, strict } => run_envelope(&config, &table, strict),
        Commands::Plate { table, output } => run_plate(&config, &table, output.as_deref()),
    }
}

fn run_aggregate(config: &Config, input: &Path, output: &Path) -> Result<()> {
    let sources = discover_sources(input)?;
    if sources.is_empty() {
        warn!("no .txt files in {}", input.display());
    }
    let report = aggregate(&sources, &config.aggregate).context("aggregating isochore files")?;
    let tables = export_dataset(&report.dataset, output, &config.export)?;

    println!("isochores: {}", tables.isochores.display());
    if let Some(summary) = &tables.summary {
        println!("summary: {}", summary.display());
    }
    for (identifier, err) in &report.skipped {
        println!("skipped {identifier}: {err}");
    }
    Ok(())
}

fn sample_envelopes(config: &Config, table: &Path) -> Result<Vec<SampleEnvelope>> {
    let dataset = load_dataset(table)?;
    let builder = EnvelopeBuilder::new(config.diagram.clone());
    Ok(dataset
        .samples()
        .map(|sample| match builder.build_sample(&dataset, sample) {
            Ok(env) => SampleEnvelope {
                sample: sample.to_string(),
                envelope: Some(env),
                error: None,
            },
            Err(err) => {
                warn!("{err}");
                SampleEnvelope {
                    sample: sample.to_string(),
                    envelope: None,
                    error: Some(err.to_string()),
                }
            }
        })
        .collect())
}

fn run_envelope(config: &Config, table: &Path, strict: bool) -> Result<()> {
    let envelopes = sample_envelopes(config, table)?;
    println!("{}", serde_json::to_string_pretty(&envelopes)?);

    let failed: Vec<&str> = envelopes
        .iter()
        .filter(|e| e.error.is_some())
        .map(|e| e.sample.as_str())
        .collect();
    if strict && !failed.is_empty() {
        bail!("no trapping envelope for: {}", failed.join(", "));
    }
    Ok(())
}

fn run_plate(config: &Config, table: &Path, output: Option<&Path>) -> Result<()> {
    let dataset = load_dataset(table)?;
    let builder = EnvelopeBuilder::new(config.diagram.clone());
    let json = Plate::build(&dataset, &builder).to_json()?;

    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!("plate plan written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn aggregate_flags_parse() {
        let cli = Cli::try_parse_from([
            "sowat-isochores",
            "aggregate",
            "Data/sowat_raw",
            "--format",
            "parquet",
            "--no-summary-export",
            "--skip-invalid",
        ])
        .unwrap();
        match cli.command {
            Commands::Aggregate {
                input,
                output,
                format,
                no_summary,
                no_summary_export,
                skip_invalid,
            } => {
                assert_eq!(input, PathBuf::from("Data/sowat_raw"));
                assert_eq!(output, PathBuf::from(DEFAULT_OUTPUT_DIR));
                assert_eq!(format, Some(TableFormat::Parquet));
                assert!(!no_summary);
                assert!(no_summary_export);
                assert!(skip_invalid);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

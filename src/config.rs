use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::aggregate::AggregateOptions;
use crate::data::export::ExportOptions;
use crate::geometry::boundaries::PhaseDiagram;

/// Configuration file contents. Every section is optional.
///
/// ```toml
/// [aggregate]
/// compute_summary = true
/// on_error = "skip"
///
/// [export]
/// format = "parquet"
/// write_summary = false
///
/// [diagram]
/// high_temperature_trail = [{ x = 708.0, y = 465.0 }, { x = 746.0, y = 577.0 }]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub aggregate: AggregateOptions,
    pub export: ExportOptions,
    pub diagram: PhaseDiagram,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Err(reason) = self.diagram.validate() {
            bail!("invalid phase diagram: {reason}");
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialising config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::ErrorPolicy;
    use crate::data::export::TableFormat;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.aggregate.compute_summary);
        assert!(config.export.write_summary);
    }

    #[test]
    fn sections_override_independently() {
        let config: Config = toml::from_str(
            r#"
            [aggregate]
            on_error = "skip"

            [export]
            format = "parquet"
            write_summary = false
            "#,
        )
        .unwrap();
        assert_eq!(config.aggregate.on_error, ErrorPolicy::Skip);
        assert!(config.aggregate.compute_summary);
        assert_eq!(config.export.format, TableFormat::Parquet);
        assert!(!config.export.write_summary);
        assert_eq!(config.diagram, PhaseDiagram::default());
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let text = Config::default().to_toml().unwrap();
        assert!(text.contains("[aggregate]"));
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, Config::default());
    }

    #[test]
    fn invalid_diagram_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[diagram.eucryptite_spodumene]\np0 = { x = 237.0, y = 165.0 }\np1 = { x = 237.0, y = 165.0 }\n",
        )
        .unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("invalid phase diagram"), "{err}");
    }
}

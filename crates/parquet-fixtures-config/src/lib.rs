// parquet-fixtures-config - Layered configuration for the fixture generator
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority)
// 2. Config file path from PARQUET_FIXTURES_CONFIG env var
// 3. Config file contents from PARQUET_FIXTURES_CONFIG_CONTENT env var
// 4. Default config file locations (./parquet-fixtures.toml, ./.parquet-fixtures.toml)
// 5. Built-in defaults (lowest priority)

use anyhow::Result;
use parquet_fixtures_core::{DataPageVersion, FixtureCodec, PatchOptions, TableSpec};
use serde::{Deserialize, Serialize};

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{apply_env_overrides, EnvSource, ENV_PREFIX};
pub use sources::{load_config, load_config_with, load_from_file_path, StdEnvSource};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixturesConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub table: TableConfig,

    #[serde(default)]
    pub matrix: MatrixConfig,

    #[serde(default)]
    pub patch: PatchConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

fn default_output_dir() -> String {
    "generated".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Synthetic table parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub seed: u64,
    pub rows: usize,
    pub null_probability: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        let spec = TableSpec::default();
        Self {
            seed: spec.seed,
            rows: spec.rows,
            null_probability: spec.null_probability,
        }
    }
}

/// Which combinations get written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    pub codecs: Vec<FixtureCodec>,
    pub data_page_versions: Vec<DataPageVersion>,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            codecs: FixtureCodec::ALL.to_vec(),
            data_page_versions: DataPageVersion::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    pub enabled: bool,
    pub filler_byte: u8,
    pub zstd_level: i32,
}

impl Default for PatchConfig {
    fn default() -> Self {
        let options = PatchOptions::default();
        Self {
            enabled: true,
            filler_byte: options.filler,
            zstd_level: options.zstd_level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

impl FixturesConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    pub fn table_spec(&self) -> TableSpec {
        TableSpec {
            seed: self.table.seed,
            rows: self.table.rows,
            null_probability: self.table.null_probability,
        }
    }

    /// Rewrite options, or `None` when patching is disabled.
    pub fn patch_options(&self) -> Option<PatchOptions> {
        self.patch.enabled.then(|| PatchOptions {
            filler: self.patch.filler_byte,
            zstd_level: self.patch.zstd_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_defaults_reproduce_reference_run() {
        let config = FixturesConfig::default();
        assert_eq!(config.output.dir, "generated");
        assert_eq!(config.table_spec(), TableSpec::default());
        assert_eq!(config.matrix.codecs.len(), 6);
        assert_eq!(config.matrix.data_page_versions.len(), 2);
        assert_eq!(config.patch_options(), Some(PatchOptions::default()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FixturesConfig = toml::from_str(
            r#"
            [table]
            rows = 100

            [matrix]
            codecs = ["snappy", "ZSTD"]
            data_page_versions = [1]

            [log]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.table.rows, 100);
        assert_eq!(config.table.seed, 12345);
        assert_eq!(
            config.matrix.codecs,
            vec![FixtureCodec::Snappy, FixtureCodec::Zstd]
        );
        assert_eq!(config.matrix.data_page_versions, vec![DataPageVersion::V1]);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.output.dir, "generated");
    }

    #[test]
    fn test_unknown_codec_is_rejected() {
        let result: std::result::Result<FixturesConfig, _> = toml::from_str(
            r#"
            [matrix]
            codecs = ["lzo"]
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_disabled() {
        let mut config = FixturesConfig::default();
        config.patch.enabled = false;
        assert_eq!(config.patch_options(), None);
    }
}

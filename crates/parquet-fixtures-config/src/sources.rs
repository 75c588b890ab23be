// Configuration source loading.
//
// Priority order:
// 1. Environment variables (PARQUET_FIXTURES_* prefix)
// 2. Config file path from PARQUET_FIXTURES_CONFIG
// 3. Inline config content from PARQUET_FIXTURES_CONFIG_CONTENT
// 4. Default config files (./parquet-fixtures.toml, ./.parquet-fixtures.toml)
// 5. Built-in defaults

use crate::env_overrides::{self, EnvSource, ENV_PREFIX};
use crate::FixturesConfig;
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

const DEFAULT_CONFIG_FILES: [&str; 2] = ["./parquet-fixtures.toml", "./.parquet-fixtures.toml"];

/// Load configuration using the process environment.
pub fn load_config() -> Result<FixturesConfig> {
    load_config_with(&StdEnvSource)
}

/// Load configuration with environment lookups going through `env`.
pub fn load_config_with<E: EnvSource>(env: &E) -> Result<FixturesConfig> {
    let mut config = load_from_file(env)?.unwrap_or_default();
    env_overrides::apply_env_overrides(&mut config, env)?;
    config.validate()?;
    Ok(config)
}

fn load_from_file<E: EnvSource>(env: &E) -> Result<Option<FixturesConfig>> {
    if let Some(path) = env.get("CONFIG") {
        return parse_file(Path::new(&path)).map(Some);
    }

    if let Some(content) = env.get("CONFIG_CONTENT") {
        let config: FixturesConfig = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse inline config from {}CONFIG_CONTENT",
                ENV_PREFIX
            )
        })?;
        return Ok(Some(config));
    }

    for path in DEFAULT_CONFIG_FILES {
        let path = Path::new(path);
        if path.exists() {
            return parse_file(path).map(Some);
        }
    }

    Ok(None)
}

fn parse_file(path: &Path) -> Result<FixturesConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FixturesConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}

/// Load configuration from a specific file path (for CLI --config flag).
/// Returns error if file doesn't exist or can't be parsed.
/// Environment overrides still apply on top of the file.
pub fn load_from_file_path(path: impl AsRef<Path>) -> Result<FixturesConfig> {
    let mut config = parse_file(path.as_ref())?;
    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;
    config.validate()?;
    Ok(config)
}

/// Process environment.
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env_overrides::tests::MapEnv;
    use crate::LogFormat;
    use parquet_fixtures_core::FixtureCodec;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn inline_content_then_env() {
        let env = MapEnv::with(&[
            (
                "PARQUET_FIXTURES_CONFIG_CONTENT",
                "[output]\ndir = \"from-inline\"\n[table]\nrows = 12\n",
            ),
            ("PARQUET_FIXTURES_ROWS", "40"),
        ]);
        let config = load_config_with(&env).unwrap();
        assert_eq!(config.output.dir, "from-inline");
        // env beats the file
        assert_eq!(config.table.rows, 40);
    }

    #[test]
    fn config_path_beats_inline_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fixtures.toml");
        fs::write(&path, "[log]\nformat = \"json\"\n").unwrap();

        let env = MapEnv::with(&[
            ("PARQUET_FIXTURES_CONFIG", path.to_str().unwrap()),
            ("PARQUET_FIXTURES_CONFIG_CONTENT", "[log]\nformat = \"text\"\n"),
        ]);
        let config = load_config_with(&env).unwrap();
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn missing_or_malformed_file_is_an_error() {
        let env = MapEnv::with(&[("PARQUET_FIXTURES_CONFIG", "/nonexistent/fixtures.toml")]);
        assert!(load_config_with(&env).is_err());

        let env = MapEnv::with(&[("PARQUET_FIXTURES_CONFIG_CONTENT", "[table\nrows = ")]);
        assert!(load_config_with(&env).is_err());
    }

    #[test]
    fn invalid_result_fails_validation() {
        let env = MapEnv::with(&[("PARQUET_FIXTURES_CODECS", "")]);
        assert!(load_config_with(&env).is_err());
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fixtures.toml");
        fs::write(&path, "[matrix]\ncodecs = [\"gzip\"]\n").unwrap();

        let config = load_from_file_path(&path).unwrap();
        assert_eq!(config.matrix.codecs, vec![FixtureCodec::Gzip]);

        assert!(load_from_file_path(dir.path().join("gone.toml")).is_err());
    }
}

use crate::{FixturesConfig, LogFormat};
use anyhow::{anyhow, Context, Result};
use parquet_fixtures_core::{DataPageVersion, FixtureCodec};
use std::str::FromStr;

pub const ENV_PREFIX: &str = "PARQUET_FIXTURES_";

/// Abstraction over environment-variable lookups so tests can supply their
/// own source of overrides.
pub trait EnvSource {
    /// Look up `key` with the `PARQUET_FIXTURES_` prefix prepended.
    fn get(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut FixturesConfig, env: &E) -> Result<()> {
    // Output
    if let Some(dir) = get_env_string(env, "OUTPUT_DIR")? {
        config.output.dir = dir;
    }

    // Table
    if let Some(seed) = get_env_parsed::<u64, _>(env, "SEED")? {
        config.table.seed = seed;
    }
    if let Some(rows) = get_env_parsed::<usize, _>(env, "ROWS")? {
        config.table.rows = rows;
    }
    if let Some(p) = get_env_parsed::<f64, _>(env, "NULL_PROBABILITY")? {
        config.table.null_probability = p;
    }

    // Matrix, as comma separated lists
    if let Some(codecs) = get_env_list::<FixtureCodec, _>(env, "CODECS")? {
        config.matrix.codecs = codecs;
    }
    if let Some(versions) = get_env_list::<DataPageVersion, _>(env, "DATA_PAGE_VERSIONS")? {
        config.matrix.data_page_versions = versions;
    }

    // Patch
    if let Some(enabled) = get_env_parsed::<bool, _>(env, "PATCH_ENABLED")? {
        config.patch.enabled = enabled;
    }
    if let Some(filler) = get_env_string(env, "FILLER_BYTE")? {
        config.patch.filler_byte = parse_filler_byte(&filler)
            .with_context(|| format!("Invalid {}FILLER_BYTE value", ENV_PREFIX))?;
    }
    if let Some(level) = get_env_parsed::<i32, _>(env, "ZSTD_LEVEL")? {
        config.patch.zstd_level = level;
    }

    // Logging
    if let Some(level) = get_env_string(env, "LOG_LEVEL")? {
        config.log.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT")? {
        config.log.format = format
            .parse::<LogFormat>()
            .with_context(|| format!("Invalid {}LOG_FORMAT value", ENV_PREFIX))?;
    }

    Ok(())
}

/// A filler byte is either a number (`65`, `0x41`) or a single ASCII character (`A`).
fn parse_filler_byte(value: &str) -> Result<u8> {
    let value = value.trim();
    if let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        return u8::from_str_radix(hex, 16).map_err(|e| anyhow!("{}: {}", value, e));
    }
    if let Ok(byte) = value.parse::<u8>() {
        return Ok(byte);
    }
    match value.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(anyhow!(
            "expected a number 0-255 or a single character, got '{}'",
            value
        )),
    }
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Result<Option<String>> {
    Ok(env.get(key))
}

fn get_env_parsed<T, E>(env: &E, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    E: EnvSource,
{
    match get_env_string(env, key)? {
        Some(val) => {
            let parsed = val
                .trim()
                .parse::<T>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn get_env_list<T, E>(env: &E, key: &str) -> Result<Option<Vec<T>>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    E: EnvSource,
{
    match get_env_string(env, key)? {
        Some(val) => {
            let parsed = val
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| {
                    item.parse::<T>()
                        .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

// Configuration validation
//
// Validates that values are sensible before any file is written

use crate::*;
use anyhow::{bail, Result};
use std::collections::HashSet;
use std::hash::Hash;
use tracing::warn;

const ZSTD_LEVELS: std::ops::RangeInclusive<i32> = 1..=22;

pub fn validate_config(config: &FixturesConfig) -> Result<()> {
    validate_output_config(&config.output)?;
    validate_table_config(&config.table)?;
    validate_matrix_config(&config.matrix)?;
    validate_patch_config(&config.patch)?;
    validate_log_config(&config.log)?;
    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<()> {
    if config.dir.trim().is_empty() {
        bail!("output.dir must not be empty");
    }
    Ok(())
}

fn validate_table_config(config: &TableConfig) -> Result<()> {
    if config.rows == 0 {
        bail!("table.rows must be greater than 0");
    }

    if !config.null_probability.is_finite() || !(0.0..=1.0).contains(&config.null_probability) {
        bail!(
            "table.null_probability must be between 0 and 1, got {}",
            config.null_probability
        );
    }

    // Warn about very large tables
    if config.rows > 1_000_000 {
        warn!(
            rows = config.rows,
            "table.rows is very large; fixtures are meant to be small"
        );
    }

    Ok(())
}

fn validate_matrix_config(config: &MatrixConfig) -> Result<()> {
    if config.codecs.is_empty() {
        bail!("matrix.codecs must list at least one codec");
    }

    if config.data_page_versions.is_empty() {
        bail!("matrix.data_page_versions must list at least one version");
    }

    if has_duplicates(&config.codecs) {
        warn!(codecs = ?config.codecs, "matrix.codecs has duplicate entries; fixtures will be rewritten");
    }

    if has_duplicates(&config.data_page_versions) {
        warn!(
            data_page_versions = ?config.data_page_versions,
            "matrix.data_page_versions has duplicate entries; fixtures will be rewritten"
        );
    }

    Ok(())
}

fn validate_patch_config(config: &PatchConfig) -> Result<()> {
    if !ZSTD_LEVELS.contains(&config.zstd_level) {
        bail!(
            "patch.zstd_level must be between {} and {}, got {}",
            ZSTD_LEVELS.start(),
            ZSTD_LEVELS.end(),
            config.zstd_level
        );
    }
    Ok(())
}

fn validate_log_config(config: &LogConfig) -> Result<()> {
    if config.level.trim().is_empty() {
        bail!("log.level must not be empty");
    }
    Ok(())
}

fn has_duplicates<T: Eq + Hash>(items: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    !items.iter().all(|item| seen.insert(item))
}

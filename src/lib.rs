//! parquet-fixtures - Parquet test fixtures with size-mismatched data pages
//!
//! Library entry points behind the `parquet-fixtures` binary. The heavy
//! lifting lives in the workspace crates:
//! - `parquet-fixtures-core`: table, footer/page walking, recompression
//! - `parquet-fixtures-writer`: the fixture matrix
//! - `parquet-fixtures-config`: layered configuration

mod init;

use anyhow::{Context, Result};
use parquet_fixtures_config::FixturesConfig;
use parquet_fixtures_core::{scan_layout, write_size_mismatch, FileLayout, PatchOptions, PatchReport};
use parquet_fixtures_writer::{generate_fixtures, GenerationPlan, GenerationReport};
use std::fs::File;
use std::path::{Path, PathBuf};

pub use init::init_tracing;

/// Translate a resolved configuration into a generation plan.
pub fn generation_plan(config: &FixturesConfig) -> GenerationPlan {
    GenerationPlan {
        output_dir: PathBuf::from(&config.output.dir),
        table: config.table_spec(),
        codecs: config.matrix.codecs.clone(),
        versions: config.matrix.data_page_versions.clone(),
        patch: config.patch_options(),
    }
}

/// Write every fixture the configuration asks for.
pub fn run_generate(config: &FixturesConfig) -> Result<GenerationReport> {
    let plan = generation_plan(config);
    generate_fixtures(&plan)
        .with_context(|| format!("Failed to generate fixtures in {}", plan.output_dir.display()))
}

/// Page-level layout of an existing Parquet file.
pub fn inspect(path: &Path) -> Result<FileLayout> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    scan_layout(&mut file).with_context(|| format!("Failed to scan {}", path.display()))
}

/// Size-mismatched copy of a single file.
///
/// Runs even when `patch.enabled` is off; only the filler and zstd level
/// are taken from the configuration.
pub fn patch_file(source: &Path, dest: &Path, config: &FixturesConfig) -> Result<PatchReport> {
    let options = PatchOptions {
        filler: config.patch.filler_byte,
        zstd_level: config.patch.zstd_level,
    };
    write_size_mismatch(source, dest, &options).with_context(|| {
        format!(
            "Failed to write size-mismatched copy of {} to {}",
            source.display(),
            dest.display()
        )
    })
}

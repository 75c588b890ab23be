//! The fixture matrix pipeline
//!
//! Builds the table once, writes every (data page version, codec)
//! combination, then rewrites each baseline into a size-mismatched copy.
//! Unsupported codecs and pages skip the rewrite for that combination only;
//! anything else the rewrite reports is fatal.

use crate::write::{fixture_file_name, size_mismatch_file_name, write_fixture};
use parquet_fixtures_core::{
    build_table, write_size_mismatch, DataPageVersion, FixtureCodec, PatchOptions, Result,
    TableSpec,
};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub output_dir: PathBuf,
    pub table: TableSpec,
    pub codecs: Vec<FixtureCodec>,
    pub versions: Vec<DataPageVersion>,
    /// `None` writes baselines only.
    pub patch: Option<PatchOptions>,
}

impl GenerationPlan {
    /// Full matrix with default table and patch options.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            table: TableSpec::default(),
            codecs: FixtureCodec::ALL.to_vec(),
            versions: DataPageVersion::ALL.to_vec(),
            patch: Some(PatchOptions::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FixtureOutcome {
    /// Baseline and size-mismatched copy written.
    Patched { pages: usize },
    /// Baseline written; the rewrite does not support this combination.
    Skipped { reason: String },
    /// Baseline written; no rewrite attempted.
    BaselineOnly,
    /// The baseline could not be written.
    WriteFailed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct CombinationReport {
    pub version: DataPageVersion,
    pub codec: FixtureCodec,
    pub baseline: Option<PathBuf>,
    pub size_mismatch: Option<PathBuf>,
    pub outcome: FixtureOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    pub rows: usize,
    pub combinations: Vec<CombinationReport>,
}

impl GenerationReport {
    pub fn patched(&self) -> impl Iterator<Item = &CombinationReport> {
        self.combinations
            .iter()
            .filter(|c| matches!(c.outcome, FixtureOutcome::Patched { .. }))
    }

    pub fn skipped(&self) -> impl Iterator<Item = &CombinationReport> {
        self.combinations
            .iter()
            .filter(|c| matches!(c.outcome, FixtureOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> impl Iterator<Item = &CombinationReport> {
        self.combinations
            .iter()
            .filter(|c| matches!(c.outcome, FixtureOutcome::WriteFailed { .. }))
    }
}

/// Run the whole matrix.
///
/// # Errors
/// Table construction, output directory creation and any rewrite failure that
/// is not an unsupported codec or page abort the run.
pub fn generate_fixtures(plan: &GenerationPlan) -> Result<GenerationReport> {
    fs::create_dir_all(&plan.output_dir)?;
    let batch = build_table(&plan.table)?;

    info!(
        output_dir = %plan.output_dir.display(),
        rows = batch.num_rows(),
        codecs = plan.codecs.len(),
        versions = plan.versions.len(),
        "Generating fixtures"
    );

    let mut combinations = Vec::with_capacity(plan.codecs.len() * plan.versions.len());
    for &version in &plan.versions {
        for &codec in &plan.codecs {
            let baseline_path = plan.output_dir.join(fixture_file_name(version, codec));

            let written = match write_fixture(&batch, &baseline_path, codec, version) {
                Ok(written) => written,
                Err(e) => {
                    warn!(
                        data_page_version = version.number(),
                        codec = %codec,
                        error = %e,
                        "Failed to write fixture, skipping combination"
                    );
                    combinations.push(CombinationReport {
                        version,
                        codec,
                        baseline: None,
                        size_mismatch: None,
                        outcome: FixtureOutcome::WriteFailed {
                            reason: e.to_string(),
                        },
                    });
                    continue;
                }
            };
            info!(path = %written.path.display(), bytes = written.bytes, "Wrote fixture");

            let options = match &plan.patch {
                Some(options) if codec != FixtureCodec::None => options,
                _ => {
                    combinations.push(CombinationReport {
                        version,
                        codec,
                        baseline: Some(written.path),
                        size_mismatch: None,
                        outcome: FixtureOutcome::BaselineOnly,
                    });
                    continue;
                }
            };

            let mismatch_path = plan
                .output_dir
                .join(size_mismatch_file_name(version, codec));
            let (size_mismatch, outcome) =
                match write_size_mismatch(&written.path, &mismatch_path, options) {
                    Ok(report) => {
                        info!(
                            path = %mismatch_path.display(),
                            pages = report.pages.len(),
                            "Wrote size-mismatched fixture"
                        );
                        (
                            Some(mismatch_path),
                            FixtureOutcome::Patched {
                                pages: report.pages.len(),
                            },
                        )
                    }
                    Err(e) if e.is_unsupported() => {
                        warn!(
                            data_page_version = version.number(),
                            codec = %codec,
                            reason = %e,
                            "Skipping size-mismatched fixture"
                        );
                        (
                            None,
                            FixtureOutcome::Skipped {
                                reason: e.to_string(),
                            },
                        )
                    }
                    Err(e) => return Err(e),
                };

            combinations.push(CombinationReport {
                version,
                codec,
                baseline: Some(written.path),
                size_mismatch,
                outcome,
            });
        }
    }

    Ok(GenerationReport {
        output_dir: plan.output_dir.clone(),
        rows: batch.num_rows(),
        combinations,
    })
}

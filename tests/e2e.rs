//! End-to-end: the full fixture matrix and the binary

use anyhow::Result;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet_fixtures::{generation_plan, inspect, run_generate};
use parquet_fixtures_config::FixturesConfig;
use std::fs::{self, File};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const CODECS: [&str; 6] = ["NONE", "SNAPPY", "GZIP", "BROTLI", "LZ4", "ZSTD"];
const PATCHED: [&str; 3] = ["SNAPPY", "GZIP", "ZSTD"];

fn config_for(dir: &Path) -> FixturesConfig {
    let mut config = FixturesConfig::default();
    config.output.dir = dir.to_string_lossy().to_string();
    config
}

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_parquet-fixtures"))
}

#[test]
fn full_matrix_on_disk() -> Result<()> {
    let temp = TempDir::new()?;
    let out = temp.path().join("generated");
    let report = run_generate(&config_for(&out))?;
    assert_eq!(report.combinations.len(), 12);

    for version in [1, 2] {
        for codec in CODECS {
            let baseline = out.join(format!("data_page={version}_{codec}.parquet"));
            let mismatch = out.join(format!("data_page={version}_{codec}-size_mismatch.parquet"));
            assert!(baseline.exists(), "{}", baseline.display());

            // baselines are readable and hold the 30-row table
            let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&baseline)?)?;
            assert_eq!(reader.metadata().file_metadata().num_rows(), 30);

            if version == 1 && PATCHED.contains(&codec) {
                assert!(mismatch.exists(), "{}", mismatch.display());
                assert_eq!(fs::metadata(&baseline)?.len(), fs::metadata(&mismatch)?.len());
                assert_ne!(fs::read(&baseline)?, fs::read(&mismatch)?);
            } else {
                assert!(!mismatch.exists(), "{}", mismatch.display());
            }
        }
    }

    let files = fs::read_dir(&out)?.count();
    assert_eq!(files, 12 + 3);
    Ok(())
}

#[test]
fn size_mismatched_pages_keep_their_headers() -> Result<()> {
    let temp = TempDir::new()?;
    let mut config = config_for(temp.path());
    config.matrix.codecs = vec!["GZIP".parse().map_err(anyhow::Error::msg)?];
    config.matrix.data_page_versions = vec![parquet_fixtures_core::DataPageVersion::V1];
    run_generate(&config)?;

    let before = inspect(&temp.path().join("data_page=1_GZIP.parquet"))?;
    let after = inspect(&temp.path().join("data_page=1_GZIP-size_mismatch.parquet"))?;
    assert_eq!(before.file_size, after.file_size);
    assert_eq!(before.footer_len, after.footer_len);
    let headers = |layout: &parquet_fixtures_core::FileLayout| {
        layout
            .pages()
            .map(|p| (p.header_offset, p.header.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(headers(&before), headers(&after));
    Ok(())
}

#[test]
fn same_seed_same_baselines() -> Result<()> {
    let a = TempDir::new()?;
    let b = TempDir::new()?;
    for dir in [&a, &b] {
        let mut config = config_for(dir.path());
        config.patch.enabled = false;
        run_generate(&config)?;
    }
    for codec in CODECS {
        let name = format!("data_page=1_{codec}.parquet");
        assert_eq!(fs::read(a.path().join(&name))?, fs::read(b.path().join(&name))?);
    }
    Ok(())
}

#[test]
fn plan_from_default_config() {
    let plan = generation_plan(&FixturesConfig::default());
    assert_eq!(plan.output_dir, Path::new("generated"));
    assert_eq!(plan.codecs.len() * plan.versions.len(), 12);
    assert!(plan.patch.is_some());
}

#[test]
fn cli_help() {
    let output = binary().arg("--help").output().expect("Failed to run binary");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("size-mismatched"));
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("inspect"));
}

#[test]
fn cli_generate_then_inspect() -> Result<()> {
    let temp = TempDir::new()?;
    let out = temp.path().join("fixtures");

    let output = binary()
        .arg("--output")
        .arg(&out)
        .env("PARQUET_FIXTURES_CODECS", "snappy")
        .env("RUST_LOG", "warn")
        .current_dir(temp.path())
        .output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 patched, 1 skipped, 0 failed"), "{stdout}");
    assert!(out.join("data_page=1_SNAPPY-size_mismatch.parquet").exists());

    let output = binary()
        .arg("inspect")
        .arg(out.join("data_page=1_SNAPPY.parquet"))
        .env("RUST_LOG", "warn")
        .current_dir(temp.path())
        .output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let layout: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(layout["num_rows"], 30);
    let chunks = layout["chunks"].as_array().expect("chunks array");
    assert!(!chunks.is_empty());
    assert!(chunks.iter().all(|c| c["codec"] == "SNAPPY"));
    Ok(())
}

#[test]
fn cli_patch_rejects_uncompressed_source() -> Result<()> {
    let temp = TempDir::new()?;
    let mut config = config_for(temp.path());
    config.patch.enabled = false;
    config.matrix.codecs = vec!["NONE".parse().map_err(anyhow::Error::msg)?];
    config.matrix.data_page_versions = vec![parquet_fixtures_core::DataPageVersion::V1];
    run_generate(&config)?;

    let dest = temp.path().join("out.parquet");
    let output = binary()
        .arg("patch")
        .arg(temp.path().join("data_page=1_NONE.parquet"))
        .arg(&dest)
        .env("RUST_LOG", "error")
        .current_dir(temp.path())
        .output()?;
    assert!(!output.status.success());
    assert!(!dest.exists());
    Ok(())
}

#[test]
fn cli_rejects_invalid_config() -> Result<()> {
    let temp = TempDir::new()?;
    let output = binary()
        .env("PARQUET_FIXTURES_NULL_PROBABILITY", "3")
        .current_dir(temp.path())
        .output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("null_probability"));
    assert_eq!(fs::read_dir(temp.path())?.count(), 0);
    Ok(())
}

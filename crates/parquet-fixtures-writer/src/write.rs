//! Writing one fixture file per combination

use crate::encoding::writer_properties;
use arrow::array::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet_fixtures_core::{DataPageVersion, FixtureCodec, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// `data_page=<n>_<CODEC>.parquet`
pub fn fixture_file_name(version: DataPageVersion, codec: FixtureCodec) -> String {
    format!("data_page={}_{}.parquet", version.number(), codec.name())
}

/// `data_page=<n>_<CODEC>-size_mismatch.parquet`
pub fn size_mismatch_file_name(version: DataPageVersion, codec: FixtureCodec) -> String {
    format!(
        "data_page={}_{}-size_mismatch.parquet",
        version.number(),
        codec.name()
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct WrittenFixture {
    pub path: PathBuf,
    pub bytes: u64,
    pub rows: usize,
}

/// Write `batch` to `path` with the combination's writer properties.
///
/// A partially written file is removed on failure.
pub fn write_fixture(
    batch: &RecordBatch,
    path: &Path,
    codec: FixtureCodec,
    version: DataPageVersion,
) -> Result<WrittenFixture> {
    let result = write_file(batch, path, codec, version);
    if result.is_err() && path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Failed to remove partial fixture");
        }
    }
    result
}

fn write_file(
    batch: &RecordBatch,
    path: &Path,
    codec: FixtureCodec,
    version: DataPageVersion,
) -> Result<WrittenFixture> {
    let file = File::create(path)?;
    let props = writer_properties(codec, version);
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;

    let bytes = fs::metadata(path)?.len();
    debug!(
        path = %path.display(),
        codec = %codec,
        data_page_version = version.number(),
        bytes,
        "Wrote fixture"
    );

    Ok(WrittenFixture {
        path: path.to_path_buf(),
        bytes,
        rows: batch.num_rows(),
    })
}

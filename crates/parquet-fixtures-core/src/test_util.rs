use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::{WriterProperties, WriterVersion};
use std::sync::Arc;

pub(crate) const SMALL_FILE_ROWS: usize = 256;

// Multiplicative hash so page payloads do not collapse under compression.
fn scramble(i: usize) -> i64 {
    ((i as u64).wrapping_mul(2_654_435_761) % 1_000_003) as i64
}

fn small_batch() -> RecordBatch {
    let ids: ArrayRef = Arc::new(Int64Array::from_iter_values(
        (0..SMALL_FILE_ROWS).map(scramble),
    ));
    let names: ArrayRef = Arc::new(StringArray::from_iter((0..SMALL_FILE_ROWS).map(|i| {
        if i % 5 == 0 {
            None
        } else {
            Some(format!("name-{:08x}", scramble(i * 31 + 7)))
        }
    })));
    RecordBatch::try_from_iter(vec![("id", ids), ("name", names)]).unwrap()
}

fn write(compression: Compression, version: WriterVersion) -> Vec<u8> {
    let batch = small_batch();
    let props = WriterProperties::builder()
        .set_compression(compression)
        .set_writer_version(version)
        .set_dictionary_enabled(false)
        .build();
    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), Some(props)).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    buf
}

/// Two-column, plain-encoded file with one v1 data page per column.
pub(crate) fn small_parquet_file(compression: Compression) -> Vec<u8> {
    write(compression, WriterVersion::PARQUET_1_0)
}

/// Same table with v2 data pages.
pub(crate) fn small_parquet_file_v2(compression: Compression) -> Vec<u8> {
    write(compression, WriterVersion::PARQUET_2_0)
}

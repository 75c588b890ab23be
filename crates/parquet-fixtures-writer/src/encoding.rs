use parquet::file::metadata::KeyValue;
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet_fixtures_core::{DataPageVersion, FixtureCodec};

/// Fixture tables are small; everything lands in one row group.
const MAX_ROW_GROUP_SIZE: usize = 1024 * 1024;

/// Writer properties for one fixture combination.
///
/// - Compression and data page version from the combination
/// - Plain encoding only, so data pages carry values rather than
///   short dictionary indices
/// - Generator version embedded in the file metadata
pub fn writer_properties(codec: FixtureCodec, version: DataPageVersion) -> WriterProperties {
    let metadata = vec![
        KeyValue::new(
            "parquet-fixtures.version".to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        ),
        KeyValue::new(
            "parquet-fixtures.combination".to_string(),
            format!("data_page={}_{}", version.number(), codec.name()),
        ),
    ];

    WriterProperties::builder()
        .set_compression(codec.compression())
        .set_writer_version(version.writer_version())
        .set_dictionary_enabled(false)
        .set_statistics_enabled(EnabledStatistics::Chunk)
        .set_max_row_group_size(MAX_ROW_GROUP_SIZE)
        .set_key_value_metadata(Some(metadata))
        .build()
}

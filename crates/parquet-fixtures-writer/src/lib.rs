//! Fixture matrix writer
//!
//! Writes the synthetic table once per codec and data page version, then
//! derives the size-mismatched copies through `parquet-fixtures-core`.

mod encoding;
mod generate;
mod write;

pub use encoding::writer_properties;
pub use generate::{
    generate_fixtures, CombinationReport, FixtureOutcome, GenerationPlan, GenerationReport,
};
pub use write::{fixture_file_name, size_mismatch_file_name, write_fixture, WrittenFixture};

pub use parquet_fixtures_core;

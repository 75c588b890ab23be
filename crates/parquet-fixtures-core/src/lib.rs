//! Core of the Parquet fixture generator
//!
//! - [`table`]: seeded synthetic table
//! - [`footer`], [`page`], [`walk`]: container framing and page headers
//! - [`codec`], [`patch`]: payload recompression and the size-mismatch rewrite

pub mod codec;
pub mod error;
pub mod footer;
pub mod page;
pub mod patch;
pub mod table;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_util;

pub use codec::{
    compression_name, perturb, recompress, DataPageVersion, FixtureCodec, PatchCodec,
    PatchOptions, Recompressed,
};
pub use error::{ErrorCode, FixtureError, MagicLocation, Result};
pub use footer::{read_footer, ParquetFooter, PARQUET_MAGIC};
pub use page::{PageHeader, PageKind};
pub use patch::{write_size_mismatch, PatchReport, PatchedPage};
pub use table::{build_table, TableSpec};
pub use walk::{chunk_spans, scan_layout, walk_chunk, ChunkSpan, FileLayout, PageLocation};

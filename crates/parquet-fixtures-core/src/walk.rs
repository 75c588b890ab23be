//! Column chunk page walking

use crate::codec::compression_name;
use crate::error::{FixtureError, Result};
use crate::footer::{read_footer, ParquetFooter};
use crate::page::PageHeader;
use parquet::basic::Compression;
use parquet::file::metadata::ColumnChunkMetaData;
use serde::Serialize;
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

/// Upper bound on the bytes read to decode one page header.
const MAX_HEADER_LEN: u64 = 64 * 1024;

/// Byte range of one column chunk's data pages.
#[derive(Debug, Clone)]
pub struct ChunkSpan {
    pub row_group: usize,
    pub column: usize,
    pub path: String,
    pub codec: Compression,
    /// First data page; a dictionary page before it is not visited.
    pub start: u64,
    /// One past the last byte of the chunk.
    pub end: u64,
}

impl ChunkSpan {
    pub fn from_metadata(
        row_group: usize,
        column: usize,
        metadata: &ColumnChunkMetaData,
    ) -> Result<Self> {
        let path = metadata.column_path().string();
        let start = u64::try_from(metadata.data_page_offset()).map_err(|_| {
            FixtureError::InvalidChunk {
                path: path.clone(),
                reason: format!("negative data page offset {}", metadata.data_page_offset()),
            }
        })?;
        let (chunk_start, chunk_len) = metadata.byte_range();
        let end = chunk_start + chunk_len;
        if start < chunk_start || start > end {
            return Err(FixtureError::InvalidChunk {
                path,
                reason: format!("data page offset {start} outside chunk {chunk_start}..{end}"),
            });
        }

        Ok(Self {
            row_group,
            column,
            path,
            codec: metadata.compression(),
            start,
            end,
        })
    }
}

/// A page header and where it sits in the file.
#[derive(Debug, Clone)]
pub struct PageLocation {
    pub header_offset: u64,
    pub payload_offset: u64,
    pub header: PageHeader,
}

impl PageLocation {
    pub fn payload_end(&self) -> u64 {
        self.payload_offset + self.header.compressed_page_size.max(0) as u64
    }
}

/// Visit every page of a chunk in file order.
///
/// The visitor may move the reader; walking resumes after the page payload
/// as declared by the header.
pub fn walk_chunk<R, F>(reader: &mut R, chunk: &ChunkSpan, mut visit: F) -> Result<()>
where
    R: Read + Seek,
    F: FnMut(&mut R, &PageLocation) -> Result<()>,
{
    let mut pos = chunk.start;
    let mut buf = Vec::new();
    while pos < chunk.end {
        reader.seek(SeekFrom::Start(pos))?;
        buf.clear();
        (&mut *reader)
            .take((chunk.end - pos).min(MAX_HEADER_LEN))
            .read_to_end(&mut buf)?;
        let (header, header_len) =
            PageHeader::decode(&buf).map_err(|source| FixtureError::PageHeader {
                offset: pos,
                source,
            })?;
        let payload_len = u64::try_from(header.compressed_page_size).map_err(|_| {
            FixtureError::NegativePageSize {
                offset: pos,
                size: header.compressed_page_size,
            }
        })?;

        let payload_offset = pos + header_len as u64;
        let page_end = payload_offset + payload_len;
        if page_end > chunk.end {
            return Err(FixtureError::ChunkOverrun {
                offset: pos,
                page_end,
                chunk_end: chunk.end,
            });
        }

        debug!(
            column = %chunk.path,
            row_group = chunk.row_group,
            offset = pos,
            page_type = %header.page_type,
            compressed = header.compressed_page_size,
            uncompressed = header.uncompressed_page_size,
            "Page header"
        );

        let location = PageLocation {
            header_offset: pos,
            payload_offset,
            header,
        };
        visit(reader, &location)?;
        pos = page_end;
    }
    Ok(())
}

/// Every chunk span of the file, in row group then column order.
pub fn chunk_spans(footer: &ParquetFooter) -> Result<Vec<ChunkSpan>> {
    let mut spans = Vec::new();
    for (rg_idx, row_group) in footer.metadata.row_groups().iter().enumerate() {
        for (col_idx, column) in row_group.columns().iter().enumerate() {
            spans.push(ChunkSpan::from_metadata(rg_idx, col_idx, column)?);
        }
    }
    Ok(spans)
}

#[derive(Debug, Clone, Serialize)]
pub struct PageLayout {
    pub header_offset: u64,
    pub payload_offset: u64,
    pub header: PageHeader,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnChunkLayout {
    pub row_group: usize,
    pub column: usize,
    pub path: String,
    pub codec: &'static str,
    pub start: u64,
    pub end: u64,
    pub pages: Vec<PageLayout>,
}

/// Page-level map of a Parquet file.
#[derive(Debug, Clone, Serialize)]
pub struct FileLayout {
    pub file_size: u64,
    pub footer_len: u32,
    pub metadata_offset: u64,
    pub num_rows: i64,
    pub chunks: Vec<ColumnChunkLayout>,
}

impl FileLayout {
    pub fn pages(&self) -> impl Iterator<Item = &PageLayout> {
        self.chunks.iter().flat_map(|chunk| chunk.pages.iter())
    }
}

/// Read the footer and every page header of a file.
pub fn scan_layout<R: Read + Seek>(reader: &mut R) -> Result<FileLayout> {
    let footer = read_footer(reader)?;
    let mut chunks = Vec::new();

    for span in chunk_spans(&footer)? {
        let mut pages = Vec::new();
        walk_chunk(reader, &span, |_, page| {
            pages.push(PageLayout {
                header_offset: page.header_offset,
                payload_offset: page.payload_offset,
                header: page.header.clone(),
            });
            Ok(())
        })?;
        chunks.push(ColumnChunkLayout {
            row_group: span.row_group,
            column: span.column,
            codec: compression_name(span.codec),
            path: span.path,
            start: span.start,
            end: span.end,
            pages,
        });
    }

    Ok(FileLayout {
        file_size: footer.file_size,
        footer_len: footer.footer_len,
        metadata_offset: footer.metadata_offset,
        num_rows: footer.metadata.file_metadata().num_rows(),
        chunks,
    })
}

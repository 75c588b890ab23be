//! In-place page recompression producing size-mismatched fixtures
//!
//! The destination starts as a byte copy of the source. Each v1 data page
//! payload is replaced by a perturbed, recompressed payload that is never
//! longer than the original, and the page header is left as is. Readers then
//! see a page whose declared sizes disagree with its contents while every
//! offset in the file stays valid.

use crate::codec::{compression_name, recompress, PatchOptions};
use crate::error::{FixtureError, Result};
use crate::footer::read_footer;
use crate::page::PageKind;
use crate::walk::{chunk_spans, walk_chunk};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, warn};

/// One rewritten page payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchedPage {
    pub row_group: usize,
    pub column: usize,
    pub path: String,
    pub codec: &'static str,
    pub payload_offset: u64,
    pub original_compressed_len: usize,
    pub recompressed_len: usize,
    pub original_uncompressed_len: usize,
    pub perturbed_uncompressed_len: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatchReport {
    pub file_size: u64,
    pub pages: Vec<PatchedPage>,
}

/// Write a size-mismatched copy of `source` to `dest`.
///
/// Unsupported codecs and v2 data pages fail with an error for which
/// [`FixtureError::is_unsupported`] holds. On any failure `dest` is removed.
pub fn write_size_mismatch(
    source: &Path,
    dest: &Path,
    options: &PatchOptions,
) -> Result<PatchReport> {
    let result = patch_into(source, dest, options);
    if result.is_err() && dest.exists() {
        if let Err(e) = fs::remove_file(dest) {
            warn!(path = %dest.display(), error = %e, "Failed to remove partial output");
        }
    }
    result
}

fn patch_into(source: &Path, dest: &Path, options: &PatchOptions) -> Result<PatchReport> {
    let mut src = File::open(source)?;
    let footer = read_footer(&mut src)?;

    let mut dst = File::create(dest)?;
    src.seek(SeekFrom::Start(0))?;
    io::copy(&mut src, &mut dst)?;

    let mut pages = Vec::new();
    for span in chunk_spans(&footer)? {
        walk_chunk(&mut src, &span, |src, page| match page.header.page_type {
            PageKind::DataPage => {
                let mut payload = vec![0u8; (page.payload_end() - page.payload_offset) as usize];
                src.seek(SeekFrom::Start(page.payload_offset))?;
                src.read_exact(&mut payload)?;

                let recompressed = recompress(span.codec, &payload, options)?;
                if recompressed.original_uncompressed_len
                    != page.header.uncompressed_page_size as usize
                {
                    warn!(
                        column = %span.path,
                        offset = page.header_offset,
                        declared = page.header.uncompressed_page_size,
                        actual = recompressed.original_uncompressed_len,
                        "Page decompressed to a different size than its header declares"
                    );
                }

                dst.seek(SeekFrom::Start(page.payload_offset))?;
                dst.write_all(&recompressed.compressed)?;

                debug!(
                    column = %span.path,
                    offset = page.payload_offset,
                    original = payload.len(),
                    recompressed = recompressed.compressed.len(),
                    "Rewrote data page payload"
                );
                pages.push(PatchedPage {
                    row_group: span.row_group,
                    column: span.column,
                    path: span.path.clone(),
                    codec: compression_name(span.codec),
                    payload_offset: page.payload_offset,
                    original_compressed_len: payload.len(),
                    recompressed_len: recompressed.compressed.len(),
                    original_uncompressed_len: recompressed.original_uncompressed_len,
                    perturbed_uncompressed_len: recompressed.perturbed_uncompressed_len,
                });
                Ok(())
            }
            PageKind::DataPageV2 => Err(FixtureError::UnsupportedPage {
                page_type: page.header.page_type.to_string(),
            }),
            _ => Ok(()),
        })?;
    }

    dst.flush()?;
    drop(dst);
    drop(src);

    let patched = fs::metadata(dest)?.len();
    if patched != footer.file_size {
        return Err(FixtureError::SizeMismatch {
            source_size: footer.file_size,
            patched,
        });
    }

    Ok(PatchReport {
        file_size: patched,
        pages,
    })
}

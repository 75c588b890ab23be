//! Parquet container validation and footer decoding

use crate::error::{FixtureError, MagicLocation, Result};
use parquet::file::metadata::{ParquetMetaData, ParquetMetaDataReader};
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

pub const PARQUET_MAGIC: [u8; 4] = *b"PAR1";

/// Leading magic, footer length and trailing magic.
const MIN_FILE_SIZE: u64 = 12;

/// Container framing plus the decoded file metadata.
#[derive(Debug, Clone)]
pub struct ParquetFooter {
    pub file_size: u64,
    pub footer_len: u32,
    /// Byte offset where the serialized `FileMetaData` starts.
    pub metadata_offset: u64,
    pub metadata: ParquetMetaData,
}

/// Validate both magic markers and the footer length, then decode the footer.
pub fn read_footer<R: Read + Seek>(reader: &mut R) -> Result<ParquetFooter> {
    let file_size = reader.seek(SeekFrom::End(0))?;
    if file_size < MIN_FILE_SIZE {
        return Err(FixtureError::FileTooSmall { size: file_size });
    }

    let mut magic = [0u8; 4];
    reader.seek(SeekFrom::Start(0))?;
    reader.read_exact(&mut magic)?;
    if magic != PARQUET_MAGIC {
        return Err(FixtureError::BadMagic {
            location: MagicLocation::Leading,
            found: magic,
        });
    }

    let mut tail = [0u8; 8];
    reader.seek(SeekFrom::Start(file_size - 8))?;
    reader.read_exact(&mut tail)?;
    let footer_len = u32::from_le_bytes([tail[0], tail[1], tail[2], tail[3]]);
    let trailing = [tail[4], tail[5], tail[6], tail[7]];

    if footer_len == 0 {
        return Err(FixtureError::EmptyFooter);
    }
    if trailing != PARQUET_MAGIC {
        return Err(FixtureError::BadMagic {
            location: MagicLocation::Trailing,
            found: trailing,
        });
    }

    // The metadata must start after the leading magic, not on top of it.
    let metadata_offset = match (file_size - 8).checked_sub(footer_len as u64) {
        Some(offset) if offset > 0 => offset,
        _ => {
            return Err(FixtureError::FooterOutOfBounds {
                footer_len,
                file_size,
            })
        }
    };

    let mut buf = vec![0u8; footer_len as usize];
    reader.seek(SeekFrom::Start(metadata_offset))?;
    reader.read_exact(&mut buf)?;
    let metadata = ParquetMetaDataReader::decode_metadata(&buf)?;

    debug!(
        file_size,
        footer_len,
        metadata_offset,
        row_groups = metadata.num_row_groups(),
        "Decoded Parquet footer"
    );

    Ok(ParquetFooter {
        file_size,
        footer_len,
        metadata_offset,
        metadata,
    })
}

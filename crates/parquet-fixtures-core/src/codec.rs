//! Fixture matrix types and page payload recompression

use crate::error::{FixtureError, Result};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use parquet::basic::{BrotliLevel, Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterVersion;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Codecs in the fixture matrix, named the way fixture files are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FixtureCodec {
    None,
    Snappy,
    Gzip,
    Brotli,
    Lz4,
    Zstd,
}

impl FixtureCodec {
    pub const ALL: [FixtureCodec; 6] = [
        FixtureCodec::None,
        FixtureCodec::Snappy,
        FixtureCodec::Gzip,
        FixtureCodec::Brotli,
        FixtureCodec::Lz4,
        FixtureCodec::Zstd,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FixtureCodec::None => "NONE",
            FixtureCodec::Snappy => "SNAPPY",
            FixtureCodec::Gzip => "GZIP",
            FixtureCodec::Brotli => "BROTLI",
            FixtureCodec::Lz4 => "LZ4",
            FixtureCodec::Zstd => "ZSTD",
        }
    }

    /// Parquet compression for the writer. "LZ4" is written as LZ4_RAW, the
    /// only LZ4 flavour current writers produce.
    pub fn compression(&self) -> Compression {
        match self {
            FixtureCodec::None => Compression::UNCOMPRESSED,
            FixtureCodec::Snappy => Compression::SNAPPY,
            FixtureCodec::Gzip => Compression::GZIP(GzipLevel::default()),
            FixtureCodec::Brotli => Compression::BROTLI(BrotliLevel::default()),
            FixtureCodec::Lz4 => Compression::LZ4_RAW,
            FixtureCodec::Zstd => Compression::ZSTD(ZstdLevel::default()),
        }
    }
}

impl std::fmt::Display for FixtureCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for FixtureCodec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NONE" | "UNCOMPRESSED" => Ok(FixtureCodec::None),
            "SNAPPY" => Ok(FixtureCodec::Snappy),
            "GZIP" => Ok(FixtureCodec::Gzip),
            "BROTLI" => Ok(FixtureCodec::Brotli),
            "LZ4" | "LZ4_RAW" => Ok(FixtureCodec::Lz4),
            "ZSTD" => Ok(FixtureCodec::Zstd),
            _ => Err(format!(
                "Unsupported codec: {}. Supported: NONE, SNAPPY, GZIP, BROTLI, LZ4, ZSTD",
                s
            )),
        }
    }
}

impl TryFrom<String> for FixtureCodec {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FixtureCodec> for String {
    fn from(codec: FixtureCodec) -> Self {
        codec.name().to_string()
    }
}

/// Data page layout selected through the writer version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DataPageVersion {
    V1,
    V2,
}

impl DataPageVersion {
    pub const ALL: [DataPageVersion; 2] = [DataPageVersion::V1, DataPageVersion::V2];

    pub fn number(&self) -> u8 {
        match self {
            DataPageVersion::V1 => 1,
            DataPageVersion::V2 => 2,
        }
    }

    pub fn writer_version(&self) -> WriterVersion {
        match self {
            DataPageVersion::V1 => WriterVersion::PARQUET_1_0,
            DataPageVersion::V2 => WriterVersion::PARQUET_2_0,
        }
    }
}

impl std::fmt::Display for DataPageVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl TryFrom<u8> for DataPageVersion {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(DataPageVersion::V1),
            2 => Ok(DataPageVersion::V2),
            other => Err(format!("Unsupported data page version: {other}. Supported: 1, 2")),
        }
    }
}

impl From<DataPageVersion> for u8 {
    fn from(version: DataPageVersion) -> Self {
        version.number()
    }
}

impl std::str::FromStr for DataPageVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "1" | "1.0" => Ok(DataPageVersion::V1),
            "2" | "2.0" => Ok(DataPageVersion::V2),
            other => Err(format!("Unsupported data page version: {other}. Supported: 1, 2")),
        }
    }
}

/// Short upper-case name of a Parquet compression, without level details.
pub fn compression_name(compression: Compression) -> &'static str {
    match compression {
        Compression::UNCOMPRESSED => "UNCOMPRESSED",
        Compression::SNAPPY => "SNAPPY",
        Compression::GZIP(_) => "GZIP",
        Compression::LZO => "LZO",
        Compression::BROTLI(_) => "BROTLI",
        Compression::LZ4 => "LZ4",
        Compression::ZSTD(_) => "ZSTD",
        Compression::LZ4_RAW => "LZ4_RAW",
    }
}

/// Options for the perturb-and-recompress step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchOptions {
    pub filler: u8,
    pub zstd_level: i32,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            filler: b'A',
            zstd_level: 6,
        }
    }
}

/// Codecs the recompression path can round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchCodec {
    Snappy,
    Gzip,
    Zstd,
}

impl PatchCodec {
    pub fn name(&self) -> &'static str {
        match self {
            PatchCodec::Snappy => "SNAPPY",
            PatchCodec::Gzip => "GZIP",
            PatchCodec::Zstd => "ZSTD",
        }
    }

    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let decompress_err = |message: String| FixtureError::Decompress {
            codec: self.name(),
            message,
        };
        match self {
            PatchCodec::Snappy => snap::raw::Decoder::new()
                .decompress_vec(data)
                .map_err(|e| decompress_err(e.to_string())),
            PatchCodec::Gzip => {
                let mut out = Vec::new();
                MultiGzDecoder::new(data)
                    .read_to_end(&mut out)
                    .map_err(|e| decompress_err(e.to_string()))?;
                Ok(out)
            }
            PatchCodec::Zstd => {
                let mut out = Vec::new();
                zstd::Decoder::new(data)
                    .and_then(|mut decoder| decoder.read_to_end(&mut out))
                    .map_err(|e| decompress_err(e.to_string()))?;
                Ok(out)
            }
        }
    }

    pub fn compress(&self, data: &[u8], options: &PatchOptions) -> Result<Vec<u8>> {
        let compress_err = |message: String| FixtureError::Compress {
            codec: self.name(),
            message,
        };
        match self {
            PatchCodec::Snappy => snap::raw::Encoder::new()
                .compress_vec(data)
                .map_err(|e| compress_err(e.to_string())),
            PatchCodec::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
                encoder
                    .write_all(data)
                    .and_then(|_| encoder.finish())
                    .map_err(|e| compress_err(e.to_string()))
            }
            PatchCodec::Zstd => zstd::bulk::compress(data, options.zstd_level)
                .map_err(|e| compress_err(e.to_string())),
        }
    }
}

impl TryFrom<Compression> for PatchCodec {
    type Error = FixtureError;

    fn try_from(compression: Compression) -> Result<Self> {
        match compression {
            Compression::SNAPPY => Ok(PatchCodec::Snappy),
            Compression::GZIP(_) => Ok(PatchCodec::Gzip),
            Compression::ZSTD(_) => Ok(PatchCodec::Zstd),
            Compression::UNCOMPRESSED => Err(FixtureError::UncompressedPage),
            // LZ4 is the legacy Hadoop framing
            Compression::LZO | Compression::BROTLI(_) | Compression::LZ4 | Compression::LZ4_RAW => {
                Err(FixtureError::UnsupportedCodec {
                    codec: compression_name(compression),
                })
            }
        }
    }
}

/// Keep the first half of `data` and append a filler run twice as long as `data`.
pub fn perturb(data: &[u8], filler: u8) -> Vec<u8> {
    let half = data.len() / 2;
    let mut out = Vec::with_capacity(half + 2 * data.len());
    out.extend_from_slice(&data[..half]);
    out.resize(half + 2 * data.len(), filler);
    out
}

/// Outcome of recompressing one page payload.
#[derive(Debug, Clone)]
pub struct Recompressed {
    pub compressed: Vec<u8>,
    pub original_uncompressed_len: usize,
    pub perturbed_uncompressed_len: usize,
}

/// Decompress a page payload, perturb it and compress it again with the same codec.
///
/// The result must fit into the space of the original payload so it can be
/// written back without shifting any later offsets.
pub fn recompress(
    compression: Compression,
    payload: &[u8],
    options: &PatchOptions,
) -> Result<Recompressed> {
    let codec = PatchCodec::try_from(compression)?;
    let uncompressed = codec.decompress(payload)?;
    let perturbed = perturb(&uncompressed, options.filler);
    let compressed = codec.compress(&perturbed, options)?;

    if compressed.len() > payload.len() {
        return Err(FixtureError::RecompressedTooLarge {
            codec: codec.name(),
            original: payload.len(),
            recompressed: compressed.len(),
        });
    }

    Ok(Recompressed {
        compressed,
        original_uncompressed_len: uncompressed.len(),
        perturbed_uncompressed_len: perturbed.len(),
    })
}

//! Error types for fixture generation and page patching

use thiserror::Error;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Underlying I/O failed
    E001Io,
    /// E002: File does not have a valid Parquet container layout
    E002InvalidContainer,
    /// E003: Page header or chunk layout could not be decoded
    E003InvalidPage,
    /// E004: Codec or page layout deliberately not supported for patching
    E004Unsupported,
    /// E005: Patched output violates the in-place rewrite invariant
    E005InvariantViolated,
    /// E006: Arrow or Parquet library failure
    E006Library,
    /// E007: Table parameters out of range
    E007InvalidTableSpec,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E001Io => "E001",
            Self::E002InvalidContainer => "E002",
            Self::E003InvalidPage => "E003",
            Self::E004Unsupported => "E004",
            Self::E005InvariantViolated => "E005",
            Self::E006Library => "E006",
            Self::E007InvalidTableSpec => "E007",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two `PAR1` markers failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicLocation {
    Leading,
    Trailing,
}

impl std::fmt::Display for MagicLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MagicLocation::Leading => write!(f, "leading"),
            MagicLocation::Trailing => write!(f, "trailing"),
        }
    }
}

/// Errors that can occur while building, walking or patching fixtures
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("[E001] I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[E006] Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("[E006] Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("[E007] Invalid table spec: {message}")]
    InvalidTableSpec { message: String },

    #[error("[E002] File is {size} bytes, smaller than the 12 byte Parquet minimum")]
    FileTooSmall { size: u64 },

    #[error("[E002] Bad {location} magic: expected PAR1, found {found:?}")]
    BadMagic {
        location: MagicLocation,
        found: [u8; 4],
    },

    #[error("[E002] Footer length is zero")]
    EmptyFooter,

    #[error("[E002] Footer length {footer_len} does not fit in a {file_size} byte file")]
    FooterOutOfBounds { footer_len: u32, file_size: u64 },

    #[error("[E003] Malformed page header at offset {offset}: {source}")]
    PageHeader {
        offset: u64,
        #[source]
        source: thrift::Error,
    },

    #[error("[E003] Page at offset {offset} declares a negative compressed size {size}")]
    NegativePageSize { offset: u64, size: i32 },

    #[error("[E003] Column chunk {path} has invalid offsets: {reason}")]
    InvalidChunk { path: String, reason: String },

    #[error("[E003] Page at offset {offset} ends at {page_end}, past chunk end {chunk_end}")]
    ChunkOverrun {
        offset: u64,
        page_end: u64,
        chunk_end: u64,
    },

    #[error("[E003] Page is not compressed, nothing to recompress")]
    UncompressedPage,

    #[error("[E003] {codec} decompression failed: {message}")]
    Decompress { codec: &'static str, message: String },

    #[error("[E003] {codec} compression failed: {message}")]
    Compress { codec: &'static str, message: String },

    #[error("[E004] Codec {codec} is not supported for page recompression")]
    UnsupportedCodec { codec: &'static str },

    #[error("[E004] Page type {page_type} is not supported for page recompression")]
    UnsupportedPage { page_type: String },

    #[error("[E005] Recompressed {codec} payload is {recompressed} bytes, larger than the original {original} bytes")]
    RecompressedTooLarge {
        codec: &'static str,
        original: usize,
        recompressed: usize,
    },

    #[error("[E005] Patched file is {patched} bytes but the source is {source_size} bytes")]
    SizeMismatch { source_size: u64, patched: u64 },
}

impl FixtureError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Io(_) => ErrorCode::E001Io,
            Self::Parquet(_) | Self::Arrow(_) => ErrorCode::E006Library,
            Self::InvalidTableSpec { .. } => ErrorCode::E007InvalidTableSpec,
            Self::FileTooSmall { .. }
            | Self::BadMagic { .. }
            | Self::EmptyFooter
            | Self::FooterOutOfBounds { .. } => ErrorCode::E002InvalidContainer,
            Self::PageHeader { .. }
            | Self::NegativePageSize { .. }
            | Self::InvalidChunk { .. }
            | Self::ChunkOverrun { .. }
            | Self::UncompressedPage
            | Self::Decompress { .. }
            | Self::Compress { .. } => ErrorCode::E003InvalidPage,
            Self::UnsupportedCodec { .. } | Self::UnsupportedPage { .. } => {
                ErrorCode::E004Unsupported
            }
            Self::RecompressedTooLarge { .. } | Self::SizeMismatch { .. } => {
                ErrorCode::E005InvariantViolated
            }
        }
    }

    /// True for the "not implemented" class: the combination is skipped
    /// instead of aborting the run.
    pub fn is_unsupported(&self) -> bool {
        self.code() == ErrorCode::E004Unsupported
    }
}

/// Result type alias for FixtureError
pub type Result<T> = std::result::Result<T, FixtureError>;

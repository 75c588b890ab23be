//! Parquet page header decoding

use parquet::format;
use parquet::thrift::TSerializable;
use serde::Serialize;
use thrift::protocol::TCompactInputProtocol;

/// Page type as declared in a page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageKind {
    DataPage,
    IndexPage,
    DictionaryPage,
    DataPageV2,
    Unknown(i32),
}

impl From<format::PageType> for PageKind {
    fn from(value: format::PageType) -> Self {
        match value {
            format::PageType::DATA_PAGE => PageKind::DataPage,
            format::PageType::INDEX_PAGE => PageKind::IndexPage,
            format::PageType::DICTIONARY_PAGE => PageKind::DictionaryPage,
            format::PageType::DATA_PAGE_V2 => PageKind::DataPageV2,
            other => PageKind::Unknown(other.0),
        }
    }
}

impl std::fmt::Display for PageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageKind::DataPage => write!(f, "DATA_PAGE"),
            PageKind::IndexPage => write!(f, "INDEX_PAGE"),
            PageKind::DictionaryPage => write!(f, "DICTIONARY_PAGE"),
            PageKind::DataPageV2 => write!(f, "DATA_PAGE_V2"),
            PageKind::Unknown(value) => write!(f, "UNKNOWN({value})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataPageInfo {
    pub num_values: i32,
    pub encoding: i32,
    pub definition_level_encoding: i32,
    pub repetition_level_encoding: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictionaryPageInfo {
    pub num_values: i32,
    pub encoding: i32,
    pub is_sorted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataPageV2Info {
    pub num_values: i32,
    pub num_nulls: i32,
    pub num_rows: i32,
    pub encoding: i32,
    pub definition_levels_byte_length: i32,
    pub repetition_levels_byte_length: i32,
    pub is_compressed: bool,
}

/// Serializable view of a `PageHeader`. Statistics and index page details
/// are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageHeader {
    pub page_type: PageKind,
    pub uncompressed_page_size: i32,
    pub compressed_page_size: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crc: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_page: Option<DataPageInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary_page: Option<DictionaryPageInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_page_v2: Option<DataPageV2Info>,
}

impl PageHeader {
    /// Decode the header at the start of `buf`, returning it with the number
    /// of bytes it occupied. Bytes after the header are not consumed.
    pub fn decode(buf: &[u8]) -> thrift::Result<(Self, usize)> {
        let mut slice = buf;
        let header = {
            let mut prot = TCompactInputProtocol::new(&mut slice);
            format::PageHeader::read_from_in_protocol(&mut prot)?
        };
        Ok((Self::from(&header), buf.len() - slice.len()))
    }
}

impl From<&format::PageHeader> for PageHeader {
    fn from(header: &format::PageHeader) -> Self {
        Self {
            page_type: header.type_.into(),
            uncompressed_page_size: header.uncompressed_page_size,
            compressed_page_size: header.compressed_page_size,
            crc: header.crc,
            data_page: header.data_page_header.as_ref().map(|page| DataPageInfo {
                num_values: page.num_values,
                encoding: page.encoding.0,
                definition_level_encoding: page.definition_level_encoding.0,
                repetition_level_encoding: page.repetition_level_encoding.0,
            }),
            dictionary_page: header
                .dictionary_page_header
                .as_ref()
                .map(|page| DictionaryPageInfo {
                    num_values: page.num_values,
                    encoding: page.encoding.0,
                    is_sorted: page.is_sorted,
                }),
            data_page_v2: header
                .data_page_header_v2
                .as_ref()
                .map(|page| DataPageV2Info {
                    num_values: page.num_values,
                    num_nulls: page.num_nulls,
                    num_rows: page.num_rows,
                    encoding: page.encoding.0,
                    definition_levels_byte_length: page.definition_levels_byte_length,
                    repetition_levels_byte_length: page.repetition_levels_byte_length,
                    // absent means compressed
                    is_compressed: page.is_compressed.unwrap_or(true),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thrift::protocol::{TCompactOutputProtocol, TOutputProtocol};

    fn encode(header: &format::PageHeader) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut prot = TCompactOutputProtocol::new(&mut bytes);
            header.write_to_out_protocol(&mut prot).unwrap();
            prot.flush().unwrap();
        }
        bytes
    }

    fn base_header(page_type: format::PageType) -> format::PageHeader {
        format::PageHeader {
            type_: page_type,
            uncompressed_page_size: 100,
            compressed_page_size: 50,
            crc: None,
            data_page_header: None,
            index_page_header: None,
            dictionary_page_header: None,
            data_page_header_v2: None,
        }
    }

    #[test]
    fn decodes_v1_data_page_header() {
        let mut header = base_header(format::PageType::DATA_PAGE);
        header.data_page_header = Some(format::DataPageHeader {
            num_values: 10,
            encoding: format::Encoding::PLAIN,
            definition_level_encoding: format::Encoding::RLE,
            repetition_level_encoding: format::Encoding::RLE,
            statistics: None,
        });
        let encoded = encode(&header);
        let mut bytes = encoded.clone();
        // payload bytes after the header must not be consumed
        bytes.extend_from_slice(&[0xAA; 4]);

        let (decoded, len) = PageHeader::decode(&bytes).unwrap();
        assert_eq!(len, encoded.len());
        assert_eq!(decoded.page_type, PageKind::DataPage);
        assert_eq!(decoded.uncompressed_page_size, 100);
        assert_eq!(decoded.compressed_page_size, 50);
        assert_eq!(
            decoded.data_page,
            Some(DataPageInfo {
                num_values: 10,
                encoding: 0,
                definition_level_encoding: 3,
                repetition_level_encoding: 3,
            })
        );
        assert!(decoded.data_page_v2.is_none());
    }

    #[test]
    fn decodes_v2_header_with_statistics() {
        let mut header = base_header(format::PageType::DATA_PAGE_V2);
        header.crc = Some(7);
        header.data_page_header_v2 = Some(format::DataPageHeaderV2 {
            num_values: 4,
            num_nulls: 1,
            num_rows: 3,
            encoding: format::Encoding::PLAIN,
            definition_levels_byte_length: 2,
            repetition_levels_byte_length: 0,
            is_compressed: Some(false),
            statistics: Some(format::Statistics {
                max_value: Some(vec![0xFF]),
                ..Default::default()
            }),
        });
        let bytes = encode(&header);

        let (decoded, len) = PageHeader::decode(&bytes).unwrap();
        assert_eq!(len, bytes.len());
        assert_eq!(decoded.page_type, PageKind::DataPageV2);
        assert_eq!(decoded.crc, Some(7));
        assert_eq!(
            decoded.data_page_v2,
            Some(DataPageV2Info {
                num_values: 4,
                num_nulls: 1,
                num_rows: 3,
                encoding: 0,
                definition_levels_byte_length: 2,
                repetition_levels_byte_length: 0,
                is_compressed: false,
            })
        );
    }

    #[test]
    fn decodes_dictionary_page_header() {
        let mut header = base_header(format::PageType::DICTIONARY_PAGE);
        header.dictionary_page_header = Some(format::DictionaryPageHeader {
            num_values: 2,
            encoding: format::Encoding::PLAIN,
            is_sorted: Some(true),
        });
        let bytes = encode(&header);

        let (decoded, _) = PageHeader::decode(&bytes).unwrap();
        assert_eq!(decoded.page_type, PageKind::DictionaryPage);
        assert_eq!(
            decoded.dictionary_page,
            Some(DictionaryPageInfo {
                num_values: 2,
                encoding: 0,
                is_sorted: Some(true),
            })
        );
    }

    #[test]
    fn missing_compressed_size_is_an_error() {
        // type = DATA_PAGE, uncompressed = 1, stop
        let bytes = [0x15, 0x00, 0x15, 0x02, 0x00];
        assert!(PageHeader::decode(&bytes).is_err());
    }

    #[test]
    fn truncated_header_is_an_error() {
        let bytes = encode(&base_header(format::PageType::DATA_PAGE));
        assert!(PageHeader::decode(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn unknown_page_types_are_preserved() {
        assert_eq!(PageKind::from(format::PageType(9)), PageKind::Unknown(9));
        assert_eq!(
            PageKind::from(format::PageType::DATA_PAGE_V2).to_string(),
            "DATA_PAGE_V2"
        );
    }
}

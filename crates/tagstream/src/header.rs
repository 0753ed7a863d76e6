//! Record header framing.
//!
//! Two header layouts are supported, one per record family:
//!
//! ```text
//! Tag, short form     [ type:10 | length:6 ]              u16 little-endian, length 0..=62
//! Tag, extended form  [ type:10 | 63 ] [ length:u32 ]     u16 + u32 little-endian
//! Action              [ code:u8 ] [ length:u16 ]?         length present iff code >= 0x80
//! ```
//!
//! Type code 0 is the terminator in both layouts.

use serde::{Deserialize, Serialize};
use tagstream_bits::BitCursor;
use tracing::trace;

use crate::CodecError;

/// Type code closing a record sequence.
pub const TERMINATOR: u16 = 0;

/// Short-form length value announcing a following 32-bit length.
pub const EXTENDED_LENGTH: u32 = 63;

/// Largest type code a tag header can carry.
pub const MAX_TAG_TYPE: u16 = 0x3ff;

/// Lowest action code that carries a length and body.
pub const ACTION_WITH_BODY: u16 = 0x80;

/// A decoded record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub type_code: u16,
    /// Body length in bytes, excluding the header itself.
    pub length: u32,
    /// Whether the header used the extended length form.
    pub extended: bool,
}

impl RecordHeader {
    pub fn new(type_code: u16, length: u32) -> Self {
        Self {
            type_code,
            length,
            extended: length >= EXTENDED_LENGTH,
        }
    }

    pub fn is_terminator(&self) -> bool {
        self.type_code == TERMINATOR
    }
}

/// Header layout used by a record family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderFormat {
    Tag,
    Action,
}

impl HeaderFormat {
    /// Reads one header at the cursor.
    pub fn decode_header(self, cursor: &mut BitCursor) -> Result<RecordHeader, CodecError> {
        let offset = cursor.byte_position();
        let header = match self {
            HeaderFormat::Tag => {
                let word = cursor.read_u16()?;
                let type_code = word >> 6;
                let short = u32::from(word & 0x3f);
                if short == EXTENDED_LENGTH {
                    RecordHeader {
                        type_code,
                        length: cursor.read_u32()?,
                        extended: true,
                    }
                } else {
                    RecordHeader {
                        type_code,
                        length: short,
                        extended: false,
                    }
                }
            }
            HeaderFormat::Action => {
                let type_code = u16::from(cursor.read_u8()?);
                let length = if type_code >= ACTION_WITH_BODY {
                    u32::from(cursor.read_u16()?)
                } else {
                    0
                };
                RecordHeader {
                    type_code,
                    length,
                    extended: false,
                }
            }
        };
        trace!(
            offset,
            type_code = header.type_code,
            length = header.length,
            extended = header.extended,
            "decoded header"
        );
        Ok(header)
    }

    /// Writes `header`. Tag headers switch to the extended form when the
    /// length does not fit the short form or when `header.extended` is set.
    pub fn encode_header(self, cursor: &mut BitCursor, header: &RecordHeader) -> Result<(), CodecError> {
        let overflow = |max: u64| CodecError::LengthOverflow {
            type_code: header.type_code,
            length: u64::from(header.length),
            max,
        };
        match self {
            HeaderFormat::Tag => {
                if header.type_code > MAX_TAG_TYPE {
                    return Err(CodecError::InvalidValue {
                        field: "tag type code",
                        value: i64::from(header.type_code),
                    });
                }
                let word = header.type_code << 6;
                if header.extended || header.length >= EXTENDED_LENGTH {
                    cursor.write_u16(word | EXTENDED_LENGTH as u16)?;
                    cursor.write_u32(header.length)?;
                } else {
                    cursor.write_u16(word | header.length as u16)?;
                }
            }
            HeaderFormat::Action => {
                let code = u8::try_from(header.type_code).map_err(|_| CodecError::InvalidValue {
                    field: "action code",
                    value: i64::from(header.type_code),
                })?;
                cursor.write_u8(code)?;
                if header.type_code >= ACTION_WITH_BODY {
                    let length = u16::try_from(header.length).map_err(|_| overflow(u64::from(u16::MAX)))?;
                    cursor.write_u16(length)?;
                } else if header.length != 0 {
                    return Err(overflow(0));
                }
            }
        }
        Ok(())
    }

    /// Returns the encoded size of `header` in bytes.
    pub fn header_len(self, header: &RecordHeader) -> u32 {
        match self {
            HeaderFormat::Tag if header.extended || header.length >= EXTENDED_LENGTH => 6,
            HeaderFormat::Tag => 2,
            HeaderFormat::Action if header.type_code >= ACTION_WITH_BODY => 3,
            HeaderFormat::Action => 1,
        }
    }

    /// Returns the encoded size of a terminator in bytes.
    pub fn terminator_len(self) -> u32 {
        self.header_len(&RecordHeader::new(TERMINATOR, 0))
    }
}

/// Reads a tag header.
pub fn decode_header(cursor: &mut BitCursor) -> Result<RecordHeader, CodecError> {
    HeaderFormat::Tag.decode_header(cursor)
}

/// Writes a tag header, choosing the short form iff `length < 63`.
pub fn encode_header(cursor: &mut BitCursor, type_code: u16, length: u32) -> Result<(), CodecError> {
    HeaderFormat::Tag.encode_header(cursor, &RecordHeader::new(type_code, length))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(format: HeaderFormat, header: RecordHeader) -> Vec<u8> {
        let mut cursor = BitCursor::new();
        format.encode_header(&mut cursor, &header).unwrap();
        cursor.into_bytes()
    }

    #[test]
    fn test_short_tag_header() {
        // (17 << 6) | 10 = 0x044a
        assert_eq!(encoded(HeaderFormat::Tag, RecordHeader::new(17, 10)), vec![0x4a, 0x04]);
        assert_eq!(encoded(HeaderFormat::Tag, RecordHeader::new(1, 0)), vec![0x40, 0x00]);
    }

    #[test]
    fn test_extended_tag_header() {
        assert_eq!(
            encoded(HeaderFormat::Tag, RecordHeader::new(9, 63)),
            vec![0x7f, 0x02, 63, 0, 0, 0]
        );
        let forced = RecordHeader {
            type_code: 9,
            length: 3,
            extended: true,
        };
        let bytes = encoded(HeaderFormat::Tag, forced);
        assert_eq!(bytes, vec![0x7f, 0x02, 3, 0, 0, 0]);
        let mut cursor = BitCursor::from_bytes(bytes);
        assert_eq!(decode_header(&mut cursor).unwrap(), forced);
    }

    #[test]
    fn test_tag_type_limit() {
        let mut cursor = BitCursor::new();
        assert!(encode_header(&mut cursor, MAX_TAG_TYPE, 0).is_ok());
        assert!(matches!(
            encode_header(&mut cursor, MAX_TAG_TYPE + 1, 0),
            Err(CodecError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_action_headers() {
        assert_eq!(encoded(HeaderFormat::Action, RecordHeader::new(0x07, 0)), vec![0x07]);
        assert_eq!(
            encoded(HeaderFormat::Action, RecordHeader::new(0x81, 2)),
            vec![0x81, 0x02, 0x00]
        );
        let mut cursor = BitCursor::new();
        assert!(matches!(
            HeaderFormat::Action.encode_header(&mut cursor, &RecordHeader::new(0x07, 1)),
            Err(CodecError::LengthOverflow { max: 0, .. })
        ));
        assert!(matches!(
            HeaderFormat::Action.encode_header(&mut cursor, &RecordHeader::new(0x96, 70_000)),
            Err(CodecError::LengthOverflow { max: 65535, .. })
        ));
    }

    #[test]
    fn test_header_lengths() {
        assert_eq!(HeaderFormat::Tag.header_len(&RecordHeader::new(1, 62)), 2);
        assert_eq!(HeaderFormat::Tag.header_len(&RecordHeader::new(1, 63)), 6);
        assert_eq!(HeaderFormat::Action.header_len(&RecordHeader::new(0x96, 5)), 3);
        assert_eq!(HeaderFormat::Tag.terminator_len(), 2);
        assert_eq!(HeaderFormat::Action.terminator_len(), 1);
    }
}

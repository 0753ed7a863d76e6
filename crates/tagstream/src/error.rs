//! Codec error type.

use tagstream_bits::BitError;
use thiserror::Error;

/// Errors raised while framing, dispatching or checking records.
///
/// Byte offsets point at the first byte of the offending record's header.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error(transparent)]
    Bits(#[from] BitError),
    #[error(
        "record type {type_code} at byte {offset} declared {declared} bytes but its body was off by {discrepancy:+} bytes"
    )]
    BodySizeMismatch {
        type_code: u16,
        offset: usize,
        declared: u32,
        discrepancy: i64,
    },
    #[error("unsupported text encoding `{0}`")]
    UnsupportedEncoding(String),
    #[error("no registry for record family `{0}`")]
    UnknownFamily(String),
    #[error("record type {type_code} at byte {offset} declares {length} bytes, limit is {limit}")]
    RecordTooLarge {
        type_code: u16,
        offset: usize,
        length: u32,
        limit: u32,
    },
    #[error("container type {type_code} at byte {offset} has no terminator")]
    MissingTerminator { type_code: u16, offset: usize },
    #[error("terminator at byte {offset} declares {length} bytes")]
    InvalidTerminator { offset: usize, length: u32 },
    #[error("record type {type_code} needs {length} bytes, format allows {max}")]
    LengthOverflow { type_code: u16, length: u64, max: u64 },
    #[error("record type {type_code} would sit {depth} containers deep, limit is {limit}")]
    NestingTooDeep { type_code: u16, depth: usize, limit: usize },
    #[error("record type {0} names a nested family but holds no child list")]
    NotAContainer(u16),
    #[error("invalid value {value} for {field}")]
    InvalidValue { field: &'static str, value: i64 },
    #[error("unrecognised signature {0:?}")]
    InvalidSignature([u8; 3]),
    #[error("compressed streams (`{0}WS`) are not supported")]
    UnsupportedCompression(char),
    #[error("header declares {declared} bytes but the stream holds {actual}")]
    FileLengthMismatch { declared: u32, actual: usize },
    #[error("invalid codec options: {0}")]
    InvalidOptions(String),
}

//! Error type for bit cursor operations.

use thiserror::Error;

/// Errors raised by [`crate::BitCursor`] primitives.
///
/// Offsets are reported in bits unless the variant says otherwise.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BitError {
    #[error("out of bounds: {requested} bits requested at bit {offset}, buffer holds {len} bits")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        len: usize,
    },
    #[error("invalid field width {0}")]
    InvalidWidth(u32),
    #[error("invalid scan step {0}")]
    InvalidStep(u32),
    #[error("unterminated string starting at byte {offset}")]
    UnterminatedString { offset: usize },
    #[error("string needs {natural} bytes but only {length} were requested")]
    StringTooLong { length: usize, natural: usize },
    #[error("bytes are not valid {encoding}")]
    InvalidText { encoding: &'static str },
    #[error("string is not representable in {encoding}")]
    UnencodableText { encoding: &'static str },
    #[error("variable-length integer at byte {offset} does not fit in 32 bits")]
    VarintOverflow { offset: usize },
}

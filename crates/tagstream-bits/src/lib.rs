//! Bit-addressable cursor and primitive field codecs for tagstream.
//!
//! # Overview
//!
//! - [`BitCursor`] - Reads and writes fields at bit granularity over a growable buffer
//! - [`TextEncoding`] - Character encodings accepted by the string primitives
//! - [`BitError`] - Bounds and format errors raised by every primitive
//!
//! Sub-byte fields are packed most-significant bit first. Multi-byte words are
//! little-endian and always start on a byte boundary: word, float, string and
//! variable-length integer primitives align the cursor before they run.
//!
//! # Example
//!
//! ```
//! use tagstream_bits::BitCursor;
//!
//! let mut out = BitCursor::new();
//! out.write_ubits(5, 3).unwrap();
//! out.write_sbits(-2, 5).unwrap();
//! out.write_u16(0x0102).unwrap();
//! let data = out.into_bytes();
//! assert_eq!(data, vec![0b1011_1110, 0x02, 0x01]);
//!
//! let mut input = BitCursor::from_bytes(data);
//! assert_eq!(input.read_ubits(3).unwrap(), 5);
//! assert_eq!(input.read_sbits(5).unwrap(), -2);
//! assert_eq!(input.read_u16().unwrap(), 0x0102);
//! assert!(input.at_end());
//! ```

mod cursor;
mod error;
mod f16;
mod octets;
mod strings;
mod varint;
mod words;

pub use cursor::BitCursor;
pub use error::BitError;
pub use f16::{f32_to_half, half_to_f32};
pub use octets::{hex_preview, hex_preview_default};
pub use strings::TextEncoding;
pub use varint::variable_u32_len;

//! Codec engine for tag-based binary containers.
//!
//! A stream is a sequence of length-prefixed records. Each header names a
//! type code; a [`TypeRegistry`] turns the code into a typed [`Record`], and
//! the engine checks that every record consumes or produces exactly the body
//! length its header declares. Container records hold a nested sequence
//! closed by a terminator record with type code 0.
//!
//! # Overview
//!
//! - [`Context`] - Flags, registries and text encoding for one operation
//! - [`decode`] / [`encode`] - Whole-buffer entry points
//! - [`Decoder`] / [`Encoder`] - One top-level record at a time
//! - [`tags`] / [`actions`] - Representative record variants and their registries
//! - [`decode_movie`] / [`encode_movie`] - Uncompressed movie files
//!
//! # Example
//!
//! ```
//! use tagstream::tags::{DefineSprite, FrameLabel, ShowFrame};
//! use tagstream::{decode, encode, Context, Record};
//!
//! let sprite = DefineSprite {
//!     sprite_id: 3,
//!     frame_count: 1,
//!     tags: vec![
//!         Box::new(FrameLabel { name: "intro".into(), anchor: false }),
//!         Box::new(ShowFrame),
//!     ],
//! };
//! let records: Vec<Box<dyn Record>> = vec![Box::new(sprite), Box::new(ShowFrame)];
//!
//! let mut ctx = Context::standard();
//! let bytes = encode(&records, &mut ctx).unwrap();
//! let decoded = decode(&bytes, &mut ctx).unwrap();
//! assert_eq!(decoded.records, records);
//! assert_eq!(decoded.consumed, bytes.len());
//! ```

pub mod actions;
mod context;
mod decoder;
mod encoder;
mod error;
pub mod header;
mod movie;
mod options;
mod record;
mod registry;
pub mod tags;
pub mod values;

pub use context::{flags, Context, FlagValue};
pub use decoder::{decode, Decoded, Decoder};
pub use encoder::{encode, prepare_to_encode, Encoder};
pub use error::CodecError;
pub use header::{decode_header, encode_header, HeaderFormat, RecordHeader};
pub use movie::{decode_movie, encode_movie, Movie, MovieHeader};
pub use options::{CodecOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_OPAQUE_LENGTH};
pub use record::{AnyRecord, OpaqueRecord, Record};
pub use registry::{family, Factory, TypeRegistry};

pub use tagstream_bits::{BitCursor, BitError, TextEncoding};

//! Uncompressed movie files: the fixed file header followed by the root tag
//! sequence.
//!
//! ```text
//! "FWS" | version:u8 | file_length:u32 | frame_size:Bounds | frame_rate:fixed8 | frame_count:u16 | tags...
//! ```

use serde::{Deserialize, Serialize};
use tagstream_bits::BitCursor;
use tracing::debug;

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::record::Record;
use crate::values::Bounds;
use crate::{CodecError, Context};

const SIGNATURE: [u8; 3] = *b"FWS";

/// Fields of the movie file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieHeader {
    pub version: u8,
    /// Total file size in bytes, header included. Recomputed on encode.
    pub file_length: u32,
    /// Stage size in twips.
    pub frame_size: Bounds,
    /// Frames per second, in 8.8 fixed point.
    pub frame_rate: f32,
    pub frame_count: u16,
}

impl Default for MovieHeader {
    fn default() -> Self {
        Self {
            version: 10,
            file_length: 0,
            frame_size: Bounds::default(),
            frame_rate: 24.0,
            frame_count: 1,
        }
    }
}

impl MovieHeader {
    fn decode(cursor: &mut BitCursor) -> Result<Self, CodecError> {
        let mut signature = [0u8; 3];
        signature.copy_from_slice(&cursor.read_bytes(3)?);
        match &signature {
            b"FWS" => {}
            b"CWS" => return Err(CodecError::UnsupportedCompression('C')),
            b"ZWS" => return Err(CodecError::UnsupportedCompression('Z')),
            _ => return Err(CodecError::InvalidSignature(signature)),
        }
        let version = cursor.read_u8()?;
        let file_length = cursor.read_u32()?;
        if file_length as usize != cursor.len() {
            return Err(CodecError::FileLengthMismatch {
                declared: file_length,
                actual: cursor.len(),
            });
        }
        Ok(Self {
            version,
            file_length,
            frame_size: Bounds::decode(cursor)?,
            frame_rate: cursor.read_fixed8()?,
            frame_count: cursor.read_u16()?,
        })
    }

    fn encode(&self, cursor: &mut BitCursor) -> Result<(), CodecError> {
        cursor.write_bytes(&SIGNATURE)?;
        cursor.write_u8(self.version)?;
        // patched once the tags are written
        cursor.write_u32(0)?;
        self.frame_size.encode(cursor)?;
        cursor.write_fixed8(self.frame_rate)?;
        cursor.write_u16(self.frame_count)?;
        Ok(())
    }
}

/// A movie file: header plus root tags.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Movie {
    pub header: MovieHeader,
    pub tags: Vec<Box<dyn Record>>,
}

/// Decodes a whole uncompressed movie file.
///
/// The header's file length must match the buffer length. Compressed files
/// are rejected with [`CodecError::UnsupportedCompression`].
pub fn decode_movie(bytes: &[u8], ctx: &mut Context) -> Result<Movie, CodecError> {
    let mut cursor = BitCursor::from_slice(bytes);
    let header = MovieHeader::decode(&mut cursor)?;
    debug!(
        version = header.version,
        file_length = header.file_length,
        frame_count = header.frame_count,
        "decoded movie header"
    );
    let mut decoder = Decoder::with_cursor(cursor, ctx);
    let mut tags = Vec::new();
    while let Some(tag) = decoder.next_record()? {
        tags.push(tag);
    }
    Ok(Movie { header, tags })
}

/// Encodes `movie`, filling in the file length.
pub fn encode_movie(movie: &Movie, ctx: &mut Context) -> Result<Vec<u8>, CodecError> {
    let mut cursor = BitCursor::new();
    movie.header.encode(&mut cursor)?;
    let mut encoder = Encoder::with_cursor(cursor, ctx);
    for tag in &movie.tags {
        encoder.write_record(tag.as_ref())?;
    }
    let mut bytes = encoder.finish()?;
    let file_length = u32::try_from(bytes.len()).map_err(|_| CodecError::LengthOverflow {
        type_code: 0,
        length: bytes.len() as u64,
        max: u64::from(u32::MAX),
    })?;
    bytes[4..8].copy_from_slice(&file_length.to_le_bytes());
    debug!(file_length, tags = movie.tags.len(), "encoded movie");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{SetBackgroundColor, ShowFrame};
    use crate::values::Color;

    fn sample() -> Movie {
        Movie {
            header: MovieHeader {
                version: 8,
                file_length: 0,
                frame_size: Bounds::new(0, 11000, 0, 8000),
                frame_rate: 12.5,
                frame_count: 1,
            },
            tags: vec![
                Box::new(SetBackgroundColor {
                    color: Color::rgb(0xff, 0xff, 0xff),
                }),
                Box::new(ShowFrame),
            ],
        }
    }

    #[test]
    fn test_movie_roundtrip() {
        let mut ctx = Context::standard();
        let bytes = encode_movie(&sample(), &mut ctx).unwrap();
        // header 8 + bounds 9 + rate 2 + count 2, background 2 + 3, show frame 2, end 2
        assert_eq!(bytes.len(), 30);
        assert_eq!(&bytes[..8], &[b'F', b'W', b'S', 8, 30, 0, 0, 0]);
        assert_eq!(&bytes[17..19], &[0x80, 0x0c]);

        let movie = decode_movie(&bytes, &mut ctx).unwrap();
        let mut expected = sample();
        expected.header.file_length = 30;
        assert_eq!(movie, expected);
    }

    #[test]
    fn test_compressed_signatures() {
        let mut ctx = Context::standard();
        let mut bytes = encode_movie(&sample(), &mut ctx).unwrap();
        bytes[0] = b'C';
        assert_eq!(
            decode_movie(&bytes, &mut ctx).unwrap_err(),
            CodecError::UnsupportedCompression('C')
        );
        bytes[0] = b'Z';
        assert_eq!(
            decode_movie(&bytes, &mut ctx).unwrap_err(),
            CodecError::UnsupportedCompression('Z')
        );
        bytes[0] = b'X';
        assert_eq!(
            decode_movie(&bytes, &mut ctx).unwrap_err(),
            CodecError::InvalidSignature(*b"XWS")
        );
    }

    #[test]
    fn test_file_length_checked() {
        let mut ctx = Context::standard();
        let mut bytes = encode_movie(&sample(), &mut ctx).unwrap();
        bytes.push(0);
        assert_eq!(
            decode_movie(&bytes, &mut ctx).unwrap_err(),
            CodecError::FileLengthMismatch {
                declared: 30,
                actual: 31
            }
        );
    }
}

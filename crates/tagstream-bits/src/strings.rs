//! Encoded strings: null-terminated and explicit-length forms.

use crate::{BitCursor, BitError};

/// Character encodings understood by the string primitives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
    Ascii,
}

impl TextEncoding {
    /// Resolves an encoding label, ignoring case and surrounding whitespace.
    ///
    /// # Example
    ///
    /// ```
    /// use tagstream_bits::TextEncoding;
    ///
    /// assert_eq!(TextEncoding::from_label("utf-8"), Some(TextEncoding::Utf8));
    /// assert_eq!(TextEncoding::from_label(" Latin1 "), Some(TextEncoding::Latin1));
    /// assert_eq!(TextEncoding::from_label("EBCDIC"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" | "unicode-1-1-utf-8" => Some(Self::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin1" | "l1" | "cp819" => Some(Self::Latin1),
            "us-ascii" | "ascii" => Some(Self::Ascii),
            _ => None,
        }
    }

    /// Returns the canonical label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Latin1 => "ISO-8859-1",
            Self::Ascii => "US-ASCII",
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Result<String, BitError> {
        let invalid = BitError::InvalidText {
            encoding: self.label(),
        };
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|_| invalid),
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Ascii => {
                if bytes.is_ascii() {
                    Ok(bytes.iter().map(|&b| char::from(b)).collect())
                } else {
                    Err(invalid)
                }
            }
        }
    }

    pub fn encode(self, text: &str) -> Result<Vec<u8>, BitError> {
        let unencodable = BitError::UnencodableText {
            encoding: self.label(),
        };
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).map_err(|_| unencodable.clone()))
                .collect(),
            Self::Ascii => {
                if text.is_ascii() {
                    Ok(text.as_bytes().to_vec())
                } else {
                    Err(unencodable)
                }
            }
        }
    }

    /// Returns the encoded length of `text` without its terminator.
    pub fn encoded_len(self, text: &str) -> Result<usize, BitError> {
        match self {
            Self::Utf8 => Ok(text.len()),
            _ => self.encode(text).map(|bytes| bytes.len()),
        }
    }
}

impl BitCursor {
    /// Reads a null-terminated string after aligning to a byte.
    ///
    /// The terminator is consumed but not included in the result.
    pub fn read_string(&mut self, encoding: TextEncoding) -> Result<String, BitError> {
        self.align_to_byte();
        let offset = self.byte_position();
        let length = self
            .tail()
            .iter()
            .position(|&b| b == 0)
            .ok_or(BitError::UnterminatedString { offset })?;
        let bytes = self.read_bytes(length)?;
        self.read_u8()?;
        encoding.decode(&bytes)
    }

    /// Reads exactly `length` bytes as a string after aligning to a byte.
    ///
    /// The field may carry trailing null padding, which is stripped.
    pub fn read_string_len(&mut self, length: usize, encoding: TextEncoding) -> Result<String, BitError> {
        let bytes = self.read_bytes(length)?;
        let natural = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        encoding.decode(&bytes[..natural])
    }

    /// Writes `text` followed by a null terminator.
    pub fn write_string(&mut self, text: &str, encoding: TextEncoding) -> Result<(), BitError> {
        let bytes = encoding.encode(text)?;
        self.write_bytes(&bytes)?;
        self.write_u8(0)
    }

    /// Writes `text` into a field of exactly `length` bytes.
    ///
    /// When `length` equals the encoded length no terminator is written; any
    /// extra bytes are filled with nulls, so `length + 1` yields a terminated
    /// string. A `length` shorter than the encoded text is an error.
    pub fn write_string_len(&mut self, text: &str, length: usize, encoding: TextEncoding) -> Result<(), BitError> {
        let bytes = encoding.encode(text)?;
        if bytes.len() > length {
            return Err(BitError::StringTooLong {
                length,
                natural: bytes.len(),
            });
        }
        self.write_bytes(&bytes)?;
        for _ in bytes.len()..length {
            self.write_u8(0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_terminated() {
        let mut cursor = BitCursor::new();
        cursor.write_string("héllo", TextEncoding::Utf8).unwrap();
        cursor.write_u8(7).unwrap();
        assert_eq!(cursor.len(), 8);
        cursor.set_pointer(0).unwrap();
        assert_eq!(cursor.read_string(TextEncoding::Utf8).unwrap(), "héllo");
        assert_eq!(cursor.read_u8().unwrap(), 7);
    }

    #[test]
    fn test_unterminated() {
        let mut cursor = BitCursor::from_bytes(b"abc".to_vec());
        assert_eq!(
            cursor.read_string(TextEncoding::Utf8),
            Err(BitError::UnterminatedString { offset: 0 })
        );
        assert_eq!(cursor.get_pointer(), 0);
    }

    #[test]
    fn test_explicit_length_modes() {
        let mut cursor = BitCursor::new();
        cursor.write_string_len("abc", 3, TextEncoding::Utf8).unwrap();
        cursor.write_string_len("abc", 4, TextEncoding::Utf8).unwrap();
        assert_eq!(cursor.as_bytes(), b"abcabc\0");
        assert_eq!(
            cursor.write_string_len("abc", 2, TextEncoding::Utf8),
            Err(BitError::StringTooLong {
                length: 2,
                natural: 3
            })
        );

        cursor.set_pointer(0).unwrap();
        assert_eq!(cursor.read_string_len(3, TextEncoding::Utf8).unwrap(), "abc");
        assert_eq!(cursor.read_string_len(4, TextEncoding::Utf8).unwrap(), "abc");
    }

    #[test]
    fn test_latin1() {
        let mut cursor = BitCursor::new();
        cursor.write_string("café", TextEncoding::Latin1).unwrap();
        assert_eq!(cursor.as_bytes(), &[b'c', b'a', b'f', 0xe9, 0]);
        cursor.set_pointer(0).unwrap();
        assert_eq!(cursor.read_string(TextEncoding::Latin1).unwrap(), "café");
        assert!(TextEncoding::Latin1.encode("€").is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        let mut cursor = BitCursor::from_bytes(vec![0xc3, 0x28, 0x00]);
        assert_eq!(
            cursor.read_string(TextEncoding::Utf8),
            Err(BitError::InvalidText { encoding: "UTF-8" })
        );
        cursor.set_pointer(0).unwrap();
        assert!(cursor.read_string(TextEncoding::Ascii).is_err());
    }
}

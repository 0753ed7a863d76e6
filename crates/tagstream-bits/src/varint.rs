//! Variable-length unsigned 32-bit integers.
//!
//! Values are split into 7-bit groups, least significant group first. Every
//! byte except the last has its high bit set:
//!
//! | Value range                  | Bytes |
//! |------------------------------|-------|
//! | 0 - 127                      | 1     |
//! | 128 - 16383                  | 2     |
//! | 16384 - 2097151              | 3     |
//! | 2097152 - 268435455          | 4     |
//! | 268435456 - 4294967295       | 5     |

use crate::{BitCursor, BitError};

const MAX_GROUPS: usize = 5;

/// Returns the number of bytes `value` occupies once encoded.
///
/// # Example
///
/// ```
/// use tagstream_bits::variable_u32_len;
///
/// assert_eq!(variable_u32_len(127), 1);
/// assert_eq!(variable_u32_len(128), 2);
/// assert_eq!(variable_u32_len(u32::MAX), 5);
/// ```
pub fn variable_u32_len(value: u32) -> usize {
    match value {
        0..=0x7f => 1,
        0x80..=0x3fff => 2,
        0x4000..=0x1f_ffff => 3,
        0x20_0000..=0x0fff_ffff => 4,
        _ => 5,
    }
}

impl BitCursor {
    /// Reads a variable-length unsigned integer after aligning to a byte.
    pub fn read_variable_u32(&mut self) -> Result<u32, BitError> {
        self.align_to_byte();
        let offset = self.byte_position();
        let mut value: u64 = 0;
        for group in 0..MAX_GROUPS {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7f) << (7 * group);
            if byte & 0x80 == 0 {
                return u32::try_from(value).map_err(|_| BitError::VarintOverflow { offset });
            }
        }
        Err(BitError::VarintOverflow { offset })
    }

    /// Writes a variable-length unsigned integer after aligning to a byte.
    pub fn write_variable_u32(&mut self, value: u32) -> Result<(), BitError> {
        let mut rest = value;
        loop {
            let group = (rest & 0x7f) as u8;
            rest >>= 7;
            if rest == 0 {
                return self.write_u8(group);
            }
            self.write_u8(group | 0x80)?;
        }
    }
}

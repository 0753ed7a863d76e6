//! Bit-addressable cursor over a growable byte buffer.

use crate::BitError;

/// Widest field a single bit read or write may cover.
pub const MAX_FIELD_WIDTH: u32 = 32;

/// A read/write cursor addressing a byte buffer at bit granularity.
///
/// The pointer is a bit offset in `[0, 8 * len]`. Reads past the end of the
/// buffer fail with [`BitError::OutOfBounds`]; writes past the end grow the
/// buffer with zero bytes. Writing in the middle of the buffer overwrites the
/// addressed bits and leaves the rest of each touched byte intact.
///
/// # Example
///
/// ```
/// use tagstream_bits::BitCursor;
///
/// let mut cursor = BitCursor::from_bytes(vec![0b0111_0000]);
/// assert_eq!(cursor.read_bits(3, true).unwrap(), 3);
/// assert_eq!(cursor.read_bits(3, true).unwrap(), -4);
/// cursor.set_pointer(3).unwrap();
/// assert_eq!(cursor.read_bits(3, true).unwrap(), -4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitCursor {
    data: Vec<u8>,
    ptr: usize,
}

impl BitCursor {
    /// Creates an empty cursor for writing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cursor with room for `bytes` bytes before reallocating.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            data: Vec::with_capacity(bytes),
            ptr: 0,
        }
    }

    /// Creates a cursor positioned at the start of `data`.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data, ptr: 0 }
    }

    /// Creates a cursor over a copy of `data`.
    pub fn from_slice(data: &[u8]) -> Self {
        Self::from_bytes(data.to_vec())
    }

    /// Returns the buffer length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the buffer length in bits.
    pub fn len_bits(&self) -> usize {
        self.data.len() << 3
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Returns the current bit offset.
    #[inline]
    pub fn get_pointer(&self) -> usize {
        self.ptr
    }

    /// Moves the cursor to an absolute bit offset.
    pub fn set_pointer(&mut self, bit_offset: usize) -> Result<(), BitError> {
        if bit_offset > self.len_bits() {
            return Err(BitError::OutOfBounds {
                offset: bit_offset,
                requested: 0,
                len: self.len_bits(),
            });
        }
        self.ptr = bit_offset;
        Ok(())
    }

    /// Moves the cursor by a signed number of bits.
    pub fn adjust_pointer(&mut self, delta: isize) -> Result<(), BitError> {
        let target = self.ptr as isize + delta;
        if target < 0 {
            return Err(BitError::OutOfBounds {
                offset: 0,
                requested: delta.unsigned_abs(),
                len: self.len_bits(),
            });
        }
        self.set_pointer(target as usize)
    }

    /// Moves the cursor past the last byte of the buffer.
    pub fn seek_end(&mut self) {
        self.ptr = self.len_bits();
    }

    /// Shortens the buffer to `len` bytes, pulling the cursor back if it
    /// pointed past the new end. Longer lengths leave the buffer unchanged.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
        self.ptr = self.ptr.min(self.len_bits());
    }

    /// Advances to the next byte boundary; a no-op when already aligned.
    #[inline]
    pub fn align_to_byte(&mut self) {
        self.ptr = (self.ptr + 7) & !7;
    }

    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.ptr & 7 == 0
    }

    /// Returns the byte offset of the cursor, rounded down.
    #[inline]
    pub fn byte_position(&self) -> usize {
        self.ptr >> 3
    }

    /// Returns true once every bit of the buffer has been consumed.
    pub fn at_end(&self) -> bool {
        self.ptr >= self.len_bits()
    }

    pub fn remaining_bits(&self) -> usize {
        self.len_bits().saturating_sub(self.ptr)
    }

    /// Fails with a bounds error unless `bits` more bits can be read.
    pub fn ensure_readable(&self, bits: usize) -> Result<(), BitError> {
        if bits > self.remaining_bits() {
            return Err(BitError::OutOfBounds {
                offset: self.ptr,
                requested: bits,
                len: self.len_bits(),
            });
        }
        Ok(())
    }

    /// Grows the buffer so that `bits` more bits can be written.
    fn ensure_writable(&mut self, bits: usize) {
        let needed = (self.ptr + bits + 7) >> 3;
        if needed > self.data.len() {
            self.data.resize(needed, 0);
        }
    }

    #[inline]
    fn check_width(n: u32) -> Result<(), BitError> {
        if n > MAX_FIELD_WIDTH {
            return Err(BitError::InvalidWidth(n));
        }
        Ok(())
    }

    /// Reads an `n`-bit field, sign-extending from bit `n - 1` when `signed`.
    ///
    /// `n` must not exceed 32. Reading zero bits returns 0 and leaves the
    /// cursor where it is.
    pub fn read_bits(&mut self, n: u32, signed: bool) -> Result<i64, BitError> {
        if signed {
            self.read_sbits(n).map(i64::from)
        } else {
            self.read_ubits(n).map(i64::from)
        }
    }

    /// Writes the low `n` bits of `value`.
    pub fn write_bits(&mut self, value: i64, n: u32) -> Result<(), BitError> {
        self.write_ubits(value as u32, n)
    }

    /// Reads an unsigned `n`-bit field.
    pub fn read_ubits(&mut self, n: u32) -> Result<u32, BitError> {
        let value = self.peek_ubits(n)?;
        self.ptr += n as usize;
        Ok(value)
    }

    /// Reads a two's complement `n`-bit field.
    pub fn read_sbits(&mut self, n: u32) -> Result<i32, BitError> {
        let raw = self.read_ubits(n)?;
        if n == 0 {
            return Ok(0);
        }
        let shift = MAX_FIELD_WIDTH - n;
        Ok(((raw << shift) as i32) >> shift)
    }

    /// Reads an unsigned `n`-bit field without moving the cursor.
    pub fn peek_ubits(&self, n: u32) -> Result<u32, BitError> {
        Self::check_width(n)?;
        self.ensure_readable(n as usize)?;
        Ok(self.bits_at(self.ptr, n))
    }

    /// Extracts `n` bits starting at `offset`. Bounds are checked by callers.
    fn bits_at(&self, offset: usize, n: u32) -> u32 {
        let mut value: u64 = 0;
        let mut at = offset;
        let mut remaining = n;
        while remaining > 0 {
            let byte = self.data[at >> 3];
            let room = 8 - (at & 7) as u32;
            let take = room.min(remaining);
            let shift = room - take;
            let chunk = (byte >> shift) as u64 & ((1u64 << take) - 1);
            value = (value << take) | chunk;
            at += take as usize;
            remaining -= take;
        }
        value as u32
    }

    /// Writes the low `n` bits of `value`.
    pub fn write_ubits(&mut self, value: u32, n: u32) -> Result<(), BitError> {
        Self::check_width(n)?;
        if n == 0 {
            return Ok(());
        }
        self.ensure_writable(n as usize);
        let value = value as u64 & ((1u64 << n) - 1);
        let mut remaining = n;
        while remaining > 0 {
            let index = self.ptr >> 3;
            let room = 8 - (self.ptr & 7) as u32;
            let take = room.min(remaining);
            let shift = room - take;
            let chunk = ((value >> (remaining - take)) & ((1u64 << take) - 1)) as u8;
            let mask = (((1u16 << take) - 1) as u8) << shift;
            self.data[index] = (self.data[index] & !mask) | (chunk << shift);
            self.ptr += take as usize;
            remaining -= take;
        }
        Ok(())
    }

    /// Writes `value` as a two's complement `n`-bit field.
    pub fn write_sbits(&mut self, value: i32, n: u32) -> Result<(), BitError> {
        self.write_ubits(value as u32, n)
    }

    /// Reads a single bit as a flag.
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool, BitError> {
        Ok(self.read_ubits(1)? == 1)
    }

    #[inline]
    pub fn write_bool(&mut self, flag: bool) -> Result<(), BitError> {
        self.write_ubits(flag as u32, 1)
    }

    /// Scans forward for a `width`-bit pattern, testing every `step` bits.
    ///
    /// On a match the cursor is left just past the matched bits and `true` is
    /// returned. When the pattern does not occur before the end of the buffer
    /// the cursor is left unchanged and `false` is returned.
    pub fn find_bit_pattern(&mut self, pattern: u32, width: u32, step: u32) -> Result<bool, BitError> {
        Self::check_width(width)?;
        if step == 0 {
            return Err(BitError::InvalidStep(step));
        }
        let width_bits = width as usize;
        let wanted = if width == MAX_FIELD_WIDTH {
            pattern
        } else {
            pattern & ((1u32 << width) - 1)
        };
        let len = self.len_bits();
        let mut at = self.ptr;
        while at + width_bits <= len {
            if self.bits_at(at, width) == wanted {
                self.ptr = at + width_bits;
                return Ok(true);
            }
            at += step as usize;
        }
        Ok(false)
    }

    /// Reads `count` whole bytes after aligning to a byte boundary.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, BitError> {
        self.align_to_byte();
        self.ensure_readable(count << 3)?;
        let start = self.ptr >> 3;
        let bytes = self.data[start..start + count].to_vec();
        self.ptr += count << 3;
        Ok(bytes)
    }

    /// Writes raw bytes after aligning to a byte boundary.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BitError> {
        self.align_to_byte();
        self.ensure_writable(bytes.len() << 3);
        let start = self.ptr >> 3;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
        self.ptr += bytes.len() << 3;
        Ok(())
    }

    /// Returns the bytes between two byte offsets without moving the cursor.
    pub fn byte_range(&self, start: usize, end: usize) -> Result<&[u8], BitError> {
        if start > end || end > self.data.len() {
            return Err(BitError::OutOfBounds {
                offset: start << 3,
                requested: end.saturating_sub(start) << 3,
                len: self.len_bits(),
            });
        }
        Ok(&self.data[start..end])
    }

    /// Returns the bytes following the cursor's current byte.
    pub(crate) fn tail(&self) -> &[u8] {
        &self.data[(self.ptr >> 3).min(self.data.len())..]
    }
}

//! Byte-aligned little-endian words, floats and fixed-point numbers.

use crate::f16::{f32_to_half, half_to_f32};
use crate::{BitCursor, BitError};

impl BitCursor {
    /// Reads a little-endian word of 1 to 4 bytes after aligning to a byte.
    pub fn read_word(&mut self, byte_count: u32, signed: bool) -> Result<i64, BitError> {
        if !(1..=4).contains(&byte_count) {
            return Err(BitError::InvalidWidth(byte_count << 3));
        }
        self.align_to_byte();
        self.ensure_readable((byte_count as usize) << 3)?;
        let mut value: u32 = 0;
        for i in 0..byte_count {
            value |= self.read_ubits(8)? << (i * 8);
        }
        if signed && byte_count < 4 {
            let shift = 32 - byte_count * 8;
            return Ok(i64::from(((value << shift) as i32) >> shift));
        }
        if signed {
            return Ok(i64::from(value as i32));
        }
        Ok(i64::from(value))
    }

    /// Writes the low `byte_count` bytes of `value` little-endian.
    pub fn write_word(&mut self, value: i64, byte_count: u32) -> Result<(), BitError> {
        if !(1..=4).contains(&byte_count) {
            return Err(BitError::InvalidWidth(byte_count << 3));
        }
        self.align_to_byte();
        let value = value as u32;
        for i in 0..byte_count {
            self.write_ubits((value >> (i * 8)) & 0xff, 8)?;
        }
        Ok(())
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, BitError> {
        Ok(self.read_word(1, false)? as u8)
    }

    /// Reads a signed 8-bit integer.
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8, BitError> {
        Ok(self.read_word(1, true)? as i8)
    }

    /// Reads an unsigned 16-bit integer (little-endian).
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16, BitError> {
        Ok(self.read_word(2, false)? as u16)
    }

    /// Reads a signed 16-bit integer (little-endian).
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16, BitError> {
        Ok(self.read_word(2, true)? as i16)
    }

    /// Reads an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32, BitError> {
        Ok(self.read_word(4, false)? as u32)
    }

    /// Reads a signed 32-bit integer (little-endian).
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32, BitError> {
        Ok(self.read_word(4, true)? as i32)
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) -> Result<(), BitError> {
        self.write_word(i64::from(value), 1)
    }

    #[inline]
    pub fn write_i8(&mut self, value: i8) -> Result<(), BitError> {
        self.write_word(i64::from(value), 1)
    }

    #[inline]
    pub fn write_u16(&mut self, value: u16) -> Result<(), BitError> {
        self.write_word(i64::from(value), 2)
    }

    #[inline]
    pub fn write_i16(&mut self, value: i16) -> Result<(), BitError> {
        self.write_word(i64::from(value), 2)
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) -> Result<(), BitError> {
        self.write_word(i64::from(value), 4)
    }

    #[inline]
    pub fn write_i32(&mut self, value: i32) -> Result<(), BitError> {
        self.write_word(i64::from(value), 4)
    }

    /// Reads an IEEE 754 half-precision float stored little-endian.
    pub fn read_half(&mut self) -> Result<f32, BitError> {
        Ok(half_to_f32(self.read_u16()?))
    }

    pub fn write_half(&mut self, value: f32) -> Result<(), BitError> {
        self.write_u16(f32_to_half(value))
    }

    /// Reads an IEEE 754 single-precision float stored little-endian.
    pub fn read_float(&mut self) -> Result<f32, BitError> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn write_float(&mut self, value: f32) -> Result<(), BitError> {
        self.write_u32(value.to_bits())
    }

    /// Reads an IEEE 754 double-precision float stored little-endian.
    pub fn read_double(&mut self) -> Result<f64, BitError> {
        let low = u64::from(self.read_u32()?);
        let high = u64::from(self.read_u32()?);
        Ok(f64::from_bits((high << 32) | low))
    }

    pub fn write_double(&mut self, value: f64) -> Result<(), BitError> {
        let bits = value.to_bits();
        self.write_u32(bits as u32)?;
        self.write_u32((bits >> 32) as u32)
    }

    /// Reads an 8.8 fixed-point number stored as a signed 16-bit word.
    pub fn read_fixed8(&mut self) -> Result<f32, BitError> {
        Ok(f32::from(self.read_i16()?) / 256.0)
    }

    pub fn write_fixed8(&mut self, value: f32) -> Result<(), BitError> {
        self.write_i16((value * 256.0).round() as i16)
    }

    /// Reads a 16.16 fixed-point number stored as a signed 32-bit word.
    pub fn read_fixed16(&mut self) -> Result<f32, BitError> {
        Ok(self.read_i32()? as f32 / 65536.0)
    }

    pub fn write_fixed16(&mut self, value: f32) -> Result<(), BitError> {
        self.write_i32((value * 65536.0).round() as i32)
    }

    /// Reads a 16.16 fixed-point number packed into an `n`-bit signed field.
    pub fn read_fixed_bits(&mut self, n: u32) -> Result<f32, BitError> {
        Ok(self.read_sbits(n)? as f32 / 65536.0)
    }

    pub fn write_fixed_bits(&mut self, value: f32, n: u32) -> Result<(), BitError> {
        self.write_sbits((value * 65536.0).round() as i32, n)
    }
}

#[cfg(test)]
mod tests {
    use crate::BitCursor;

    #[test]
    fn test_word_little_endian() {
        let mut cursor = BitCursor::from_bytes(vec![0x01, 0x02, 0x03, 0x04]);
        assert_eq!(cursor.read_word(4, false).unwrap(), 0x0403_0201);
    }

    #[test]
    fn test_word_aligns_first() {
        let mut cursor = BitCursor::from_bytes(vec![0xff, 0x34, 0x12]);
        cursor.read_ubits(3).unwrap();
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
    }

    #[test]
    fn test_signed_words() {
        let mut cursor = BitCursor::from_bytes(vec![0xff, 0xfe, 0xff, 0x00, 0x80]);
        assert_eq!(cursor.read_word(1, true).unwrap(), -1);
        assert_eq!(cursor.read_word(2, true).unwrap(), -2);
        assert_eq!(cursor.read_word(2, true).unwrap(), i64::from(i16::MIN));
    }

    #[test]
    fn test_three_byte_word() {
        let mut cursor = BitCursor::new();
        cursor.write_word(-5, 3).unwrap();
        assert_eq!(cursor.as_bytes(), &[0xfb, 0xff, 0xff]);
        cursor.set_pointer(0).unwrap();
        assert_eq!(cursor.read_word(3, true).unwrap(), -5);
        cursor.set_pointer(0).unwrap();
        assert_eq!(cursor.read_word(3, false).unwrap(), 0xff_fffb);
    }

    #[test]
    fn test_invalid_word_width() {
        let mut cursor = BitCursor::from_bytes(vec![0; 8]);
        assert!(cursor.read_word(0, false).is_err());
        assert!(cursor.read_word(5, false).is_err());
        assert!(cursor.write_word(1, 5).is_err());
    }

    #[test]
    fn test_fixed_point() {
        let mut cursor = BitCursor::new();
        cursor.write_fixed8(12.5).unwrap();
        cursor.write_fixed16(-1.25).unwrap();
        assert_eq!(&cursor.as_bytes()[..2], &[0x80, 0x0c]);
        cursor.set_pointer(0).unwrap();
        assert_eq!(cursor.read_fixed8().unwrap(), 12.5);
        assert_eq!(cursor.read_fixed16().unwrap(), -1.25);
    }

    #[test]
    fn test_fixed_bits() {
        let mut cursor = BitCursor::new();
        cursor.write_fixed_bits(1.5, 18).unwrap();
        cursor.set_pointer(0).unwrap();
        assert_eq!(cursor.read_fixed_bits(18).unwrap(), 1.5);
    }

    #[test]
    fn test_floats() {
        let mut cursor = BitCursor::new();
        cursor.write_float(3.5).unwrap();
        cursor.write_double(-0.125).unwrap();
        cursor.write_half(1.0).unwrap();
        assert_eq!(&cursor.as_bytes()[..4], &3.5f32.to_le_bytes());
        assert_eq!(&cursor.as_bytes()[4..12], &(-0.125f64).to_le_bytes());
        assert_eq!(&cursor.as_bytes()[12..], &[0x00, 0x3c]);
        cursor.set_pointer(0).unwrap();
        assert_eq!(cursor.read_float().unwrap(), 3.5);
        assert_eq!(cursor.read_double().unwrap(), -0.125);
        assert_eq!(cursor.read_half().unwrap(), 1.0);
    }
}

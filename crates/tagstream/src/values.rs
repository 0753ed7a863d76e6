//! Value types shared by several record variants.

use serde::{Deserialize, Serialize};
use tagstream_bits::BitCursor;

use crate::context::flags;
use crate::{CodecError, Context};

/// Number of bits a two's complement field needs to hold `value`.
///
/// Zero needs no bits at all.
pub fn signed_bit_width(value: i32) -> u32 {
    match value {
        0 => 0,
        v if v > 0 => 33 - v.leading_zeros(),
        v => 33 - (!v).leading_zeros(),
    }
}

/// A rectangle in twips, packed as a 5-bit field width followed by four
/// signed fields of that width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl Bounds {
    const WIDTH_BITS: u32 = 5;
    const MAX_WIDTH: u32 = (1 << Self::WIDTH_BITS) - 1;

    pub fn new(x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    fn field_width(&self) -> Result<u32, CodecError> {
        let width = [self.x_min, self.x_max, self.y_min, self.y_max]
            .into_iter()
            .map(signed_bit_width)
            .max()
            .unwrap_or(0);
        if width > Self::MAX_WIDTH {
            let widest = [self.x_min, self.x_max, self.y_min, self.y_max]
                .into_iter()
                .find(|&v| signed_bit_width(v) == width)
                .unwrap_or_default();
            return Err(CodecError::InvalidValue {
                field: "bounds coordinate",
                value: i64::from(widest),
            });
        }
        Ok(width)
    }

    /// Encoded size in bytes, including the trailing alignment padding.
    pub fn encoded_len(&self) -> Result<u32, CodecError> {
        let bits = Self::WIDTH_BITS + 4 * self.field_width()?;
        Ok(bits.div_ceil(8))
    }

    pub fn decode(cursor: &mut BitCursor) -> Result<Self, CodecError> {
        cursor.align_to_byte();
        let width = cursor.read_ubits(Self::WIDTH_BITS)?;
        let x_min = cursor.read_sbits(width)?;
        let x_max = cursor.read_sbits(width)?;
        let y_min = cursor.read_sbits(width)?;
        let y_max = cursor.read_sbits(width)?;
        cursor.align_to_byte();
        Ok(Self::new(x_min, x_max, y_min, y_max))
    }

    pub fn encode(&self, cursor: &mut BitCursor) -> Result<(), CodecError> {
        let width = self.field_width()?;
        cursor.align_to_byte();
        cursor.write_ubits(width, Self::WIDTH_BITS)?;
        for value in [self.x_min, self.x_max, self.y_min, self.y_max] {
            cursor.write_sbits(value, width)?;
        }
        cursor.align_to_byte();
        Ok(())
    }
}

/// An RGB colour, carrying alpha when the context's
/// `use_transparent_color` flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// Fully opaque when the colour was read without an alpha channel.
    pub alpha: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

impl Color {
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, 0xff)
    }

    pub fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub fn encoded_len(ctx: &Context) -> u32 {
        if ctx.get_bool(flags::USE_TRANSPARENT_COLOR) {
            4
        } else {
            3
        }
    }

    pub fn decode(cursor: &mut BitCursor, ctx: &Context) -> Result<Self, CodecError> {
        let red = cursor.read_u8()?;
        let green = cursor.read_u8()?;
        let blue = cursor.read_u8()?;
        let alpha = if ctx.get_bool(flags::USE_TRANSPARENT_COLOR) {
            cursor.read_u8()?
        } else {
            0xff
        };
        Ok(Self::rgba(red, green, blue, alpha))
    }

    pub fn encode(&self, cursor: &mut BitCursor, ctx: &Context) -> Result<(), CodecError> {
        cursor.write_u8(self.red)?;
        cursor.write_u8(self.green)?;
        cursor.write_u8(self.blue)?;
        if ctx.get_bool(flags::USE_TRANSPARENT_COLOR) {
            cursor.write_u8(self.alpha)?;
        }
        Ok(())
    }
}

//! Half-precision (16-bit) floating point conversions.

/// Decodes the raw bits of an IEEE 754 half-precision float.
///
/// # Example
///
/// ```
/// use tagstream_bits::half_to_f32;
///
/// assert_eq!(half_to_f32(0x0000), 0.0);
/// assert_eq!(half_to_f32(0x3C00), 1.0);
/// assert_eq!(half_to_f32(0xC000), -2.0);
/// assert!(half_to_f32(0x7C00).is_infinite());
/// assert!(half_to_f32(0x7C01).is_nan());
/// ```
pub fn half_to_f32(binary: u16) -> f32 {
    let exponent = ((binary & 0x7C00) >> 10) as i32;
    let fraction = f32::from(binary & 0x03FF);
    let sign = if binary & 0x8000 != 0 { -1.0 } else { 1.0 };

    if exponent == 0 {
        // Subnormal or zero
        sign * fraction * 2f32.powi(-24)
    } else if exponent == 0x1F {
        if fraction != 0.0 {
            f32::NAN
        } else {
            sign * f32::INFINITY
        }
    } else {
        sign * 2f32.powi(exponent - 15) * (1.0 + fraction / 1024.0)
    }
}

/// Encodes an `f32` as half-precision bits, rounding the dropped mantissa
/// bits half-up. Values beyond the half range become infinities; values
/// below the smallest subnormal become signed zero.
pub fn f32_to_half(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exponent = ((bits >> 23) & 0xff) as i32;
    let mantissa = bits & 0x007f_ffff;

    if exponent == 0xff {
        let nan = if mantissa != 0 { 0x0200 } else { 0 };
        return sign | 0x7c00 | nan;
    }
    let rebiased = exponent - 127 + 15;
    if rebiased >= 0x1f {
        return sign | 0x7c00;
    }
    if rebiased <= 0 {
        if rebiased < -10 {
            return sign;
        }
        let full = mantissa | 0x0080_0000;
        let shift = (14 - rebiased) as u32;
        let round = (full >> (shift - 1)) & 1;
        return sign | ((full >> shift) + round) as u16;
    }
    let half = sign | ((rebiased as u16) << 10) | (mantissa >> 13) as u16;
    if mantissa & 0x1000 != 0 {
        half + 1
    } else {
        half
    }
}

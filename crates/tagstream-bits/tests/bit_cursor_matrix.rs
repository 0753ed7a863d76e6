//! Bit cursor and primitive codec matrix: field packing, words, variable-length
//! integers and strings.

use proptest::prelude::*;
use tagstream_bits::{variable_u32_len, BitCursor, BitError, TextEncoding};

// ---------------------------------------------------------------------------
// Bit fields
// ---------------------------------------------------------------------------

#[test]
fn signed_fields_sign_extend_from_top_bit() {
    // 011 100 11
    let mut cursor = BitCursor::from_bytes(vec![0b0111_0011]);
    assert_eq!(cursor.read_bits(3, true).unwrap(), 3);
    assert_eq!(cursor.read_bits(3, true).unwrap(), -4);
    assert_eq!(cursor.read_bits(2, false).unwrap(), 3);
    assert!(cursor.at_end());
}

#[test]
fn fields_straddle_byte_boundaries() {
    let mut cursor = BitCursor::new();
    cursor.write_ubits(0b101, 3).unwrap();
    cursor.write_ubits(0x1abc, 13).unwrap();
    cursor.write_sbits(-1, 32).unwrap();
    assert_eq!(cursor.len(), 6);

    cursor.set_pointer(0).unwrap();
    assert_eq!(cursor.read_ubits(3).unwrap(), 0b101);
    assert_eq!(cursor.read_ubits(13).unwrap(), 0x1abc);
    assert_eq!(cursor.read_sbits(32).unwrap(), -1);
    assert_eq!(cursor.read_ubits(0).unwrap(), 0);
}

#[test]
fn bit_reads_never_truncate_at_end() {
    let mut cursor = BitCursor::from_bytes(vec![0xff, 0xff]);
    cursor.read_ubits(10).unwrap();
    assert!(matches!(
        cursor.read_ubits(7),
        Err(BitError::OutOfBounds {
            offset: 10,
            requested: 7,
            len: 16
        })
    ));
    assert_eq!(cursor.read_ubits(6).unwrap(), 0x3f);
}

#[test]
fn booleans_are_single_bits() {
    let mut cursor = BitCursor::new();
    for flag in [true, false, true, true] {
        cursor.write_bool(flag).unwrap();
    }
    assert_eq!(cursor.as_bytes(), &[0b1011_0000]);
    cursor.set_pointer(0).unwrap();
    assert!(cursor.read_bool().unwrap());
    assert!(!cursor.read_bool().unwrap());
}

#[test]
fn pattern_search_scans_unaligned_positions() {
    // marker 0b1011 starting at bit 5
    let mut cursor = BitCursor::from_bytes(vec![0b0000_0101, 0b1000_0000]);
    assert!(cursor.find_bit_pattern(0b1011, 4, 1).unwrap());
    assert_eq!(cursor.get_pointer(), 9);

    let mut cursor = BitCursor::from_bytes(vec![0b0000_0101, 0b1000_0000]);
    assert!(!cursor.find_bit_pattern(0b1011, 4, 8).unwrap());
    assert_eq!(cursor.get_pointer(), 0);
}

// ---------------------------------------------------------------------------
// Variable-length integers
// ---------------------------------------------------------------------------

#[test]
fn variable_u32_byte_count_boundaries() {
    let cases = [
        (127u32, 1usize),
        (128, 2),
        (16383, 2),
        (16384, 3),
        (2097151, 3),
        (2097152, 4),
        (268435455, 4),
        (268435456, 5),
        (u32::MAX, 5),
    ];
    for (value, expected) in cases {
        let mut cursor = BitCursor::new();
        cursor.write_variable_u32(value).unwrap();
        assert_eq!(cursor.len(), expected, "encoded size of {value}");
        assert_eq!(variable_u32_len(value), expected);
        cursor.set_pointer(0).unwrap();
        assert_eq!(cursor.read_variable_u32().unwrap(), value);
    }
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

#[test]
fn strings_align_before_reading() {
    let mut cursor = BitCursor::new();
    cursor.write_ubits(1, 1).unwrap();
    cursor.write_string("ok", TextEncoding::Ascii).unwrap();
    assert_eq!(cursor.as_bytes(), &[0x80, b'o', b'k', 0]);
    cursor.set_pointer(0).unwrap();
    cursor.read_ubits(1).unwrap();
    assert_eq!(cursor.read_string(TextEncoding::Ascii).unwrap(), "ok");
}

#[test]
fn encoding_labels_resolve() {
    for label in ["UTF-8", "utf8", "ISO-8859-1", "latin1", "US-ASCII"] {
        assert!(TextEncoding::from_label(label).is_some(), "{label}");
    }
    assert_eq!(TextEncoding::from_label("Shift_JIS"), None);
    assert_eq!(TextEncoding::default().label(), "UTF-8");
}

// ---------------------------------------------------------------------------
// Laws
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn variable_u32_roundtrip(value in any::<u32>()) {
        let mut cursor = BitCursor::new();
        cursor.write_variable_u32(value).unwrap();
        prop_assert_eq!(cursor.len(), variable_u32_len(value));
        cursor.set_pointer(0).unwrap();
        prop_assert_eq!(cursor.read_variable_u32().unwrap(), value);
        prop_assert!(cursor.at_end());
    }

    #[test]
    fn signed_field_roundtrip(width in 1u32..=32, raw in any::<i32>()) {
        let shift = 32 - width;
        let value = (raw << shift) >> shift;
        let mut cursor = BitCursor::new();
        cursor.write_ubits(0b1, 1).unwrap();
        cursor.write_sbits(value, width).unwrap();
        cursor.set_pointer(1).unwrap();
        prop_assert_eq!(cursor.read_sbits(width).unwrap(), value);
    }

    #[test]
    fn word_roundtrip(bytes in 1u32..=4, raw in any::<u32>()) {
        let mask = if bytes == 4 { u32::MAX } else { (1u32 << (bytes * 8)) - 1 };
        let value = raw & mask;
        let mut cursor = BitCursor::new();
        cursor.write_word(i64::from(value), bytes).unwrap();
        prop_assert_eq!(cursor.len(), bytes as usize);
        cursor.set_pointer(0).unwrap();
        prop_assert_eq!(cursor.read_word(bytes, false).unwrap(), i64::from(value));
    }
}

//! Record header framing matrix: short and extended tag headers, action
//! headers, and the threshold law.

use proptest::prelude::*;
use tagstream::header::{EXTENDED_LENGTH, MAX_TAG_TYPE};
use tagstream::{decode_header, encode_header, BitCursor, HeaderFormat, RecordHeader};

fn tag_bytes(type_code: u16, length: u32) -> Vec<u8> {
    let mut cursor = BitCursor::new();
    encode_header(&mut cursor, type_code, length).unwrap();
    cursor.into_bytes()
}

#[test]
fn short_form_packs_type_above_length() {
    assert_eq!(tag_bytes(17, 10), vec![0x4a, 0x04]);
    assert_eq!(tag_bytes(1, 0), vec![0x40, 0x00]);
    assert_eq!(tag_bytes(MAX_TAG_TYPE, 62), vec![0xfe, 0xff]);
}

#[test]
fn threshold_between_short_and_extended() {
    assert_eq!(tag_bytes(9, 62).len(), 2);
    assert_eq!(tag_bytes(9, 63), vec![0x7f, 0x02, 0x3f, 0x00, 0x00, 0x00]);
    assert_eq!(tag_bytes(9, 0x0102_0304), vec![0x7f, 0x02, 0x04, 0x03, 0x02, 0x01]);
}

#[test]
fn extended_form_with_short_length_is_read_back_as_extended() {
    let mut cursor = BitCursor::from_bytes(vec![0x7f, 0x02, 0x05, 0x00, 0x00, 0x00]);
    let header = decode_header(&mut cursor).unwrap();
    assert_eq!(
        header,
        RecordHeader {
            type_code: 9,
            length: 5,
            extended: true
        }
    );
    assert_eq!(cursor.byte_position(), 6);
}

#[test]
fn truncated_extended_header_is_a_bounds_error() {
    let mut cursor = BitCursor::from_bytes(vec![0x7f, 0x02, 0x05]);
    assert!(matches!(
        decode_header(&mut cursor),
        Err(tagstream::CodecError::Bits(tagstream::BitError::OutOfBounds { .. }))
    ));
}

#[test]
fn action_headers_carry_length_only_from_0x80() {
    let mut cursor = BitCursor::from_bytes(vec![0x07, 0x96, 0x03, 0x00]);
    assert_eq!(
        HeaderFormat::Action.decode_header(&mut cursor).unwrap(),
        RecordHeader::new(0x07, 0)
    );
    assert_eq!(
        HeaderFormat::Action.decode_header(&mut cursor).unwrap(),
        RecordHeader::new(0x96, 3)
    );
    assert!(cursor.at_end());
}

proptest! {
    #[test]
    fn tag_header_roundtrip(type_code in 0u16..=MAX_TAG_TYPE, length in any::<u32>()) {
        let bytes = tag_bytes(type_code, length);
        let expected_len = if length < EXTENDED_LENGTH { 2 } else { 6 };
        prop_assert_eq!(bytes.len(), expected_len);
        let mut cursor = BitCursor::from_bytes(bytes);
        let header = decode_header(&mut cursor).unwrap();
        prop_assert_eq!(header.type_code, type_code);
        prop_assert_eq!(header.length, length);
        prop_assert_eq!(header.extended, length >= EXTENDED_LENGTH);
        prop_assert_eq!(HeaderFormat::Tag.header_len(&header) as usize, expected_len);
    }

    #[test]
    fn action_header_roundtrip(code in 0x80u16..=0xff, length in any::<u16>()) {
        let header = RecordHeader::new(code, u32::from(length));
        let mut cursor = BitCursor::new();
        HeaderFormat::Action.encode_header(&mut cursor, &header).unwrap();
        prop_assert_eq!(cursor.len(), 3);
        cursor.set_pointer(0).unwrap();
        let back = HeaderFormat::Action.decode_header(&mut cursor).unwrap();
        prop_assert_eq!(back.type_code, code);
        prop_assert_eq!(back.length, u32::from(length));
    }
}

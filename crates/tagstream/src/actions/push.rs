//! `Push` action (0x96) and its typed stack values.

use tagstream_bits::{BitCursor, TextEncoding};

use super::code;
use crate::header::RecordHeader;
use crate::record::{body_len, Record};
use crate::{CodecError, Context};

/// A value pushed onto the stack, prefixed on the wire by a type byte.
#[derive(Debug, Clone, PartialEq)]
pub enum PushValue {
    String(String),
    Float(f32),
    Null,
    Undefined,
    Register(u8),
    Boolean(bool),
    Double(f64),
    Integer(i32),
    Constant8(u8),
    Constant16(u16),
}

impl PushValue {
    fn kind(&self) -> u8 {
        match self {
            PushValue::String(_) => 0,
            PushValue::Float(_) => 1,
            PushValue::Null => 2,
            PushValue::Undefined => 3,
            PushValue::Register(_) => 4,
            PushValue::Boolean(_) => 5,
            PushValue::Double(_) => 6,
            PushValue::Integer(_) => 7,
            PushValue::Constant8(_) => 8,
            PushValue::Constant16(_) => 9,
        }
    }

    fn decode(cursor: &mut BitCursor, encoding: TextEncoding) -> Result<Self, CodecError> {
        let kind = cursor.read_u8()?;
        Ok(match kind {
            0 => PushValue::String(cursor.read_string(encoding)?),
            1 => PushValue::Float(cursor.read_float()?),
            2 => PushValue::Null,
            3 => PushValue::Undefined,
            4 => PushValue::Register(cursor.read_u8()?),
            5 => PushValue::Boolean(cursor.read_u8()? != 0),
            6 => PushValue::Double(cursor.read_double()?),
            7 => PushValue::Integer(cursor.read_i32()?),
            8 => PushValue::Constant8(cursor.read_u8()?),
            9 => PushValue::Constant16(cursor.read_u16()?),
            _ => {
                return Err(CodecError::InvalidValue {
                    field: "push value type",
                    value: i64::from(kind),
                })
            }
        })
    }

    fn encoded_len(&self, encoding: TextEncoding) -> Result<usize, CodecError> {
        let payload = match self {
            PushValue::String(text) => encoding.encoded_len(text)? + 1,
            PushValue::Null | PushValue::Undefined => 0,
            PushValue::Register(_) | PushValue::Boolean(_) | PushValue::Constant8(_) => 1,
            PushValue::Constant16(_) => 2,
            PushValue::Float(_) | PushValue::Integer(_) => 4,
            PushValue::Double(_) => 8,
        };
        Ok(1 + payload)
    }

    fn encode(&self, cursor: &mut BitCursor, encoding: TextEncoding) -> Result<(), CodecError> {
        cursor.write_u8(self.kind())?;
        match self {
            PushValue::String(text) => cursor.write_string(text, encoding)?,
            PushValue::Float(value) => cursor.write_float(*value)?,
            PushValue::Null | PushValue::Undefined => {}
            PushValue::Register(register) => cursor.write_u8(*register)?,
            PushValue::Boolean(flag) => cursor.write_u8(u8::from(*flag))?,
            PushValue::Double(value) => cursor.write_double(*value)?,
            PushValue::Integer(value) => cursor.write_i32(*value)?,
            PushValue::Constant8(index) => cursor.write_u8(*index)?,
            PushValue::Constant16(index) => cursor.write_u16(*index)?,
        }
        Ok(())
    }
}

/// Pushes one or more values; the body is read until its declared length
/// is used up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Push {
    pub values: Vec<PushValue>,
}

impl Record for Push {
    fn type_code(&self) -> u16 {
        code::PUSH
    }

    fn decode(&mut self, cursor: &mut BitCursor, header: &RecordHeader, ctx: &mut Context) -> Result<(), CodecError> {
        let encoding = ctx.text_encoding()?;
        let end = cursor.byte_position() + header.length as usize;
        self.values.clear();
        while cursor.byte_position() < end {
            self.values.push(PushValue::decode(cursor, encoding)?);
        }
        Ok(())
    }

    fn prepare_to_encode(&self, ctx: &mut Context) -> Result<u32, CodecError> {
        let encoding = ctx.text_encoding()?;
        let mut size = 0;
        for value in &self.values {
            size += value.encoded_len(encoding)?;
        }
        body_len(code::PUSH, size)
    }

    fn encode(&self, cursor: &mut BitCursor, ctx: &mut Context) -> Result<(), CodecError> {
        let encoding = ctx.text_encoding()?;
        for value in &self.values {
            value.encode(cursor, encoding)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_layout() {
        let push = Push {
            values: vec![
                PushValue::String("x".to_owned()),
                PushValue::Boolean(true),
                PushValue::Integer(-2),
                PushValue::Null,
            ],
        };
        let mut ctx = Context::new();
        let mut cursor = BitCursor::new();
        push.encode(&mut cursor, &mut ctx).unwrap();
        assert_eq!(
            cursor.as_bytes(),
            &[0, b'x', 0, 5, 1, 7, 0xfe, 0xff, 0xff, 0xff, 2]
        );
        assert_eq!(push.prepare_to_encode(&mut ctx).unwrap(), 11);
    }

    #[test]
    fn test_unknown_value_type() {
        let mut cursor = BitCursor::from_bytes(vec![42]);
        assert_eq!(
            PushValue::decode(&mut cursor, TextEncoding::Utf8),
            Err(CodecError::InvalidValue {
                field: "push value type",
                value: 42
            })
        );
    }
}

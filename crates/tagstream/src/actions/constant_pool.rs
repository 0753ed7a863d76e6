//! `ConstantPool` action (0x88): strings later referenced by index.

use tagstream_bits::BitCursor;

use super::code;
use crate::header::RecordHeader;
use crate::record::{body_len, Record};
use crate::{CodecError, Context};

/// Strings later pushed by index through [`super::PushValue::Constant8`]
/// and [`super::PushValue::Constant16`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantPool {
    pub constants: Vec<String>,
}

impl Record for ConstantPool {
    fn type_code(&self) -> u16 {
        code::CONSTANT_POOL
    }

    fn decode(&mut self, cursor: &mut BitCursor, _header: &RecordHeader, ctx: &mut Context) -> Result<(), CodecError> {
        let encoding = ctx.text_encoding()?;
        let count = cursor.read_u16()?;
        self.constants.clear();
        for _ in 0..count {
            self.constants.push(cursor.read_string(encoding)?);
        }
        Ok(())
    }

    fn prepare_to_encode(&self, ctx: &mut Context) -> Result<u32, CodecError> {
        let encoding = ctx.text_encoding()?;
        let mut size = 2;
        for constant in &self.constants {
            size += encoding.encoded_len(constant)? + 1;
        }
        body_len(code::CONSTANT_POOL, size)
    }

    fn encode(&self, cursor: &mut BitCursor, ctx: &mut Context) -> Result<(), CodecError> {
        let encoding = ctx.text_encoding()?;
        let count = u16::try_from(self.constants.len()).map_err(|_| CodecError::InvalidValue {
            field: "constant pool size",
            value: self.constants.len() as i64,
        })?;
        cursor.write_u16(count)?;
        for constant in &self.constants {
            cursor.write_string(constant, encoding)?;
        }
        Ok(())
    }
}

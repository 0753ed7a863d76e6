//! `SetBackgroundColor` tag (9).

use tagstream_bits::BitCursor;

use super::code;
use crate::header::RecordHeader;
use crate::record::Record;
use crate::values::Color;
use crate::{CodecError, Context};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetBackgroundColor {
    pub color: Color,
}

impl Record for SetBackgroundColor {
    fn type_code(&self) -> u16 {
        code::SET_BACKGROUND_COLOR
    }

    fn decode(&mut self, cursor: &mut BitCursor, _header: &RecordHeader, ctx: &mut Context) -> Result<(), CodecError> {
        self.color = Color::decode(cursor, ctx)?;
        Ok(())
    }

    fn prepare_to_encode(&self, ctx: &mut Context) -> Result<u32, CodecError> {
        Ok(Color::encoded_len(ctx))
    }

    fn encode(&self, cursor: &mut BitCursor, ctx: &mut Context) -> Result<(), CodecError> {
        self.color.encode(cursor, ctx)
    }
}

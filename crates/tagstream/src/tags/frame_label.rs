//! `FrameLabel` tag (43).

use tagstream_bits::BitCursor;

use super::code;
use crate::header::RecordHeader;
use crate::record::{body_len, Record};
use crate::{CodecError, Context};

/// Names the current frame. Anchor labels carry a trailing flag byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameLabel {
    pub name: String,
    pub anchor: bool,
}

impl Record for FrameLabel {
    fn type_code(&self) -> u16 {
        code::FRAME_LABEL
    }

    fn decode(&mut self, cursor: &mut BitCursor, header: &RecordHeader, ctx: &mut Context) -> Result<(), CodecError> {
        let start = cursor.byte_position();
        self.name = cursor.read_string(ctx.text_encoding()?)?;
        self.anchor = cursor.byte_position() - start < header.length as usize && cursor.read_u8()? != 0;
        Ok(())
    }

    fn prepare_to_encode(&self, ctx: &mut Context) -> Result<u32, CodecError> {
        let name = ctx.text_encoding()?.encoded_len(&self.name)? + 1;
        body_len(code::FRAME_LABEL, name + usize::from(self.anchor))
    }

    fn encode(&self, cursor: &mut BitCursor, ctx: &mut Context) -> Result<(), CodecError> {
        cursor.write_string(&self.name, ctx.text_encoding()?)?;
        if self.anchor {
            cursor.write_u8(1)?;
        }
        Ok(())
    }
}

//! `GotoFrame` action (0x81).

use tagstream_bits::BitCursor;

use super::code;
use crate::header::RecordHeader;
use crate::record::Record;
use crate::{CodecError, Context};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GotoFrame {
    /// Zero-based frame index.
    pub frame: u16,
}

impl Record for GotoFrame {
    fn type_code(&self) -> u16 {
        code::GOTO_FRAME
    }

    fn decode(&mut self, cursor: &mut BitCursor, _header: &RecordHeader, _ctx: &mut Context) -> Result<(), CodecError> {
        self.frame = cursor.read_u16()?;
        Ok(())
    }

    fn prepare_to_encode(&self, _ctx: &mut Context) -> Result<u32, CodecError> {
        Ok(2)
    }

    fn encode(&self, cursor: &mut BitCursor, _ctx: &mut Context) -> Result<(), CodecError> {
        cursor.write_u16(self.frame)?;
        Ok(())
    }
}

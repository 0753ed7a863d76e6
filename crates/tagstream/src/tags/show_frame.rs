//! `ShowFrame` tag (1).

use tagstream_bits::BitCursor;

use super::code;
use crate::header::RecordHeader;
use crate::record::Record;
use crate::{CodecError, Context};

/// Marks the end of a frame's display list changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShowFrame;

impl Record for ShowFrame {
    fn type_code(&self) -> u16 {
        code::SHOW_FRAME
    }

    fn decode(&mut self, _cursor: &mut BitCursor, _header: &RecordHeader, _ctx: &mut Context) -> Result<(), CodecError> {
        Ok(())
    }

    fn prepare_to_encode(&self, _ctx: &mut Context) -> Result<u32, CodecError> {
        Ok(0)
    }

    fn encode(&self, _cursor: &mut BitCursor, _ctx: &mut Context) -> Result<(), CodecError> {
        Ok(())
    }
}

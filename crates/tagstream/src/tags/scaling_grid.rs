//! `DefineScalingGrid` tag (78).

use tagstream_bits::BitCursor;

use super::code;
use crate::header::RecordHeader;
use crate::record::Record;
use crate::values::Bounds;
use crate::{CodecError, Context};

/// Nine-slice scaling rectangle for a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefineScalingGrid {
    pub character_id: u16,
    pub splitter: Bounds,
}

impl Record for DefineScalingGrid {
    fn type_code(&self) -> u16 {
        code::DEFINE_SCALING_GRID
    }

    fn decode(&mut self, cursor: &mut BitCursor, _header: &RecordHeader, _ctx: &mut Context) -> Result<(), CodecError> {
        self.character_id = cursor.read_u16()?;
        self.splitter = Bounds::decode(cursor)?;
        Ok(())
    }

    fn prepare_to_encode(&self, _ctx: &mut Context) -> Result<u32, CodecError> {
        Ok(2 + self.splitter.encoded_len()?)
    }

    fn encode(&self, cursor: &mut BitCursor, _ctx: &mut Context) -> Result<(), CodecError> {
        cursor.write_u16(self.character_id)?;
        self.splitter.encode(cursor)
    }
}

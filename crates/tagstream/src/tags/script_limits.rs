//! `ScriptLimits` tag (65).

use tagstream_bits::BitCursor;

use super::code;
use crate::header::RecordHeader;
use crate::record::Record;
use crate::{CodecError, Context};

/// Overrides the player's script recursion and timeout limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptLimits {
    pub max_recursion_depth: u16,
    pub script_timeout_seconds: u16,
}

impl Record for ScriptLimits {
    fn type_code(&self) -> u16 {
        code::SCRIPT_LIMITS
    }

    fn decode(&mut self, cursor: &mut BitCursor, _header: &RecordHeader, _ctx: &mut Context) -> Result<(), CodecError> {
        self.max_recursion_depth = cursor.read_u16()?;
        self.script_timeout_seconds = cursor.read_u16()?;
        Ok(())
    }

    fn prepare_to_encode(&self, _ctx: &mut Context) -> Result<u32, CodecError> {
        Ok(4)
    }

    fn encode(&self, cursor: &mut BitCursor, _ctx: &mut Context) -> Result<(), CodecError> {
        cursor.write_u16(self.max_recursion_depth)?;
        cursor.write_u16(self.script_timeout_seconds)?;
        Ok(())
    }
}

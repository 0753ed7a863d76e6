//! `DefineSprite` tag (39): a nested tag sequence.

use tagstream_bits::BitCursor;

use super::code;
use crate::header::RecordHeader;
use crate::record::Record;
use crate::registry::family;
use crate::{CodecError, Context};

/// A movie clip: its own timeline of tags, closed by a terminator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefineSprite {
    pub sprite_id: u16,
    pub frame_count: u16,
    pub tags: Vec<Box<dyn Record>>,
}

impl Record for DefineSprite {
    fn type_code(&self) -> u16 {
        code::DEFINE_SPRITE
    }

    fn decode(&mut self, cursor: &mut BitCursor, _header: &RecordHeader, _ctx: &mut Context) -> Result<(), CodecError> {
        self.sprite_id = cursor.read_u16()?;
        self.frame_count = cursor.read_u16()?;
        self.tags.clear();
        Ok(())
    }

    fn prepare_to_encode(&self, _ctx: &mut Context) -> Result<u32, CodecError> {
        Ok(4)
    }

    fn encode(&self, cursor: &mut BitCursor, _ctx: &mut Context) -> Result<(), CodecError> {
        cursor.write_u16(self.sprite_id)?;
        cursor.write_u16(self.frame_count)?;
        Ok(())
    }

    fn nested_family(&self) -> Option<&'static str> {
        Some(family::TAGS)
    }

    fn children(&self) -> Option<&[Box<dyn Record>]> {
        Some(&self.tags)
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Box<dyn Record>>> {
        Some(&mut self.tags)
    }
}

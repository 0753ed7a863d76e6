//! `DoAction` tag (12): a frame script held as actions or as raw bytecode.

use tagstream_bits::BitCursor;

use super::code;
use crate::context::flags;
use crate::decoder::decode;
use crate::header::RecordHeader;
use crate::record::{body_len, Record};
use crate::registry::family;
use crate::{CodecError, Context};

/// Bytecode carried by a [`DoAction`] tag.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionBlock {
    /// Parsed action records.
    Decoded(Vec<Box<dyn Record>>),
    /// The undecoded body, terminator included, kept when
    /// `decode_nested_bytecode` is off.
    Raw(Vec<u8>),
}

impl Default for ActionBlock {
    fn default() -> Self {
        ActionBlock::Decoded(Vec::new())
    }
}

/// Frame script: a sequence of actions closed by an end action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoAction {
    pub actions: ActionBlock,
}

impl DoAction {
    pub fn new(actions: Vec<Box<dyn Record>>) -> Self {
        Self {
            actions: ActionBlock::Decoded(actions),
        }
    }

    /// Returns the actions, parsing raw bytecode with the context's action
    /// registry if it was kept undecoded.
    pub fn decode_actions(&self, ctx: &Context) -> Result<Vec<Box<dyn Record>>, CodecError> {
        match &self.actions {
            ActionBlock::Decoded(actions) => Ok(actions.clone()),
            ActionBlock::Raw(bytes) => {
                let mut inner = ctx.clone();
                inner.set_root_family(family::ACTIONS);
                Ok(decode(bytes, &mut inner)?.records)
            }
        }
    }
}

impl Record for DoAction {
    fn type_code(&self) -> u16 {
        code::DO_ACTION
    }

    fn decode(&mut self, cursor: &mut BitCursor, header: &RecordHeader, ctx: &mut Context) -> Result<(), CodecError> {
        self.actions = if ctx.get_bool(flags::DECODE_NESTED_BYTECODE) {
            ActionBlock::Decoded(Vec::new())
        } else {
            ActionBlock::Raw(cursor.read_bytes(header.length as usize)?)
        };
        Ok(())
    }

    fn prepare_to_encode(&self, _ctx: &mut Context) -> Result<u32, CodecError> {
        match &self.actions {
            ActionBlock::Decoded(_) => Ok(0),
            ActionBlock::Raw(bytes) => body_len(code::DO_ACTION, bytes.len()),
        }
    }

    fn encode(&self, cursor: &mut BitCursor, _ctx: &mut Context) -> Result<(), CodecError> {
        if let ActionBlock::Raw(bytes) = &self.actions {
            cursor.write_bytes(bytes)?;
        }
        Ok(())
    }

    fn nested_family(&self) -> Option<&'static str> {
        match self.actions {
            ActionBlock::Decoded(_) => Some(family::ACTIONS),
            ActionBlock::Raw(_) => None,
        }
    }

    fn children(&self) -> Option<&[Box<dyn Record>]> {
        match &self.actions {
            ActionBlock::Decoded(actions) => Some(actions),
            ActionBlock::Raw(_) => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Box<dyn Record>>> {
        match &mut self.actions {
            ActionBlock::Decoded(actions) => Some(actions),
            ActionBlock::Raw(_) => None,
        }
    }
}

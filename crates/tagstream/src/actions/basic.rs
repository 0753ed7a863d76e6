//! Actions without a body: every code below 0x80.

use tagstream_bits::BitCursor;

use crate::header::{RecordHeader, ACTION_WITH_BODY};
use crate::record::Record;
use crate::{CodecError, Context};

/// An action without a body, identified by its code alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicAction {
    pub code: u8,
}

impl BasicAction {
    pub fn new(code: u8) -> Self {
        Self { code }
    }

    /// [`crate::Factory`] for every code below 0x80.
    pub fn boxed(code: u16) -> Box<dyn Record> {
        Box::new(Self::new(code as u8))
    }
}

impl Record for BasicAction {
    fn type_code(&self) -> u16 {
        u16::from(self.code)
    }

    fn decode(&mut self, _cursor: &mut BitCursor, header: &RecordHeader, _ctx: &mut Context) -> Result<(), CodecError> {
        self.code = header.type_code as u8;
        Ok(())
    }

    fn prepare_to_encode(&self, _ctx: &mut Context) -> Result<u32, CodecError> {
        if u16::from(self.code) >= ACTION_WITH_BODY {
            return Err(CodecError::InvalidValue {
                field: "basic action code",
                value: i64::from(self.code),
            });
        }
        Ok(0)
    }

    fn encode(&self, _cursor: &mut BitCursor, _ctx: &mut Context) -> Result<(), CodecError> {
        Ok(())
    }
}

//! `GetUrl` action (0x83): a URL and a target window.

use tagstream_bits::BitCursor;

use super::code;
use crate::header::RecordHeader;
use crate::record::{body_len, Record};
use crate::{CodecError, Context};

/// Loads a URL into a browser window or movie level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetUrl {
    pub url: String,
    pub target: String,
}

impl Record for GetUrl {
    fn type_code(&self) -> u16 {
        code::GET_URL
    }

    fn decode(&mut self, cursor: &mut BitCursor, _header: &RecordHeader, ctx: &mut Context) -> Result<(), CodecError> {
        let encoding = ctx.text_encoding()?;
        self.url = cursor.read_string(encoding)?;
        self.target = cursor.read_string(encoding)?;
        Ok(())
    }

    fn prepare_to_encode(&self, ctx: &mut Context) -> Result<u32, CodecError> {
        let encoding = ctx.text_encoding()?;
        let size = encoding.encoded_len(&self.url)? + encoding.encoded_len(&self.target)? + 2;
        body_len(code::GET_URL, size)
    }

    fn encode(&self, cursor: &mut BitCursor, ctx: &mut Context) -> Result<(), CodecError> {
        let encoding = ctx.text_encoding()?;
        cursor.write_string(&self.url, encoding)?;
        cursor.write_string(&self.target, encoding)?;
        Ok(())
    }
}

//! `FileAttributes` tag (69): sub-byte feature flags.

use tagstream_bits::BitCursor;

use super::code;
use crate::header::RecordHeader;
use crate::record::Record;
use crate::{CodecError, Context};

/// Movie-wide feature flags, packed into a single 32-bit field.
///
/// ```text
/// reserved:1 | direct_blit:1 | gpu:1 | metadata:1 | as3:1 | no_cross_domain_cache:1 | network:1 | reserved:25
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileAttributes {
    pub use_direct_blit: bool,
    pub use_gpu: bool,
    pub has_metadata: bool,
    pub action_script_3: bool,
    pub no_cross_domain_cache: bool,
    pub use_network: bool,
}

impl Record for FileAttributes {
    fn type_code(&self) -> u16 {
        code::FILE_ATTRIBUTES
    }

    fn decode(&mut self, cursor: &mut BitCursor, _header: &RecordHeader, _ctx: &mut Context) -> Result<(), CodecError> {
        cursor.read_ubits(1)?;
        self.use_direct_blit = cursor.read_bool()?;
        self.use_gpu = cursor.read_bool()?;
        self.has_metadata = cursor.read_bool()?;
        self.action_script_3 = cursor.read_bool()?;
        self.no_cross_domain_cache = cursor.read_bool()?;
        self.use_network = cursor.read_bool()?;
        cursor.read_ubits(25)?;
        Ok(())
    }

    fn prepare_to_encode(&self, _ctx: &mut Context) -> Result<u32, CodecError> {
        Ok(4)
    }

    fn encode(&self, cursor: &mut BitCursor, _ctx: &mut Context) -> Result<(), CodecError> {
        cursor.write_ubits(0, 1)?;
        cursor.write_bool(self.use_direct_blit)?;
        cursor.write_bool(self.use_gpu)?;
        cursor.write_bool(self.has_metadata)?;
        cursor.write_bool(self.action_script_3)?;
        cursor.write_bool(self.no_cross_domain_cache)?;
        cursor.write_bool(self.use_network)?;
        cursor.write_ubits(0, 25)?;
        Ok(())
    }
}

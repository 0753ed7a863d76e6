//! Serializable codec options.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::context::FlagValue;
use crate::CodecError;

/// Default ceiling for the body of a record no registry recognises.
pub const DEFAULT_MAX_OPAQUE_LENGTH: u32 = 16 * 1024 * 1024;

/// Default limit on how many containers may enclose a record.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options seeding a [`crate::Context`].
///
/// Missing fields take their defaults, so `{}` is a valid document.
///
/// # Example
///
/// ```
/// use tagstream::CodecOptions;
///
/// let options = CodecOptions::from_json(r#"{"decode_nested_bytecode": false}"#).unwrap();
/// assert!(!options.decode_nested_bytecode);
/// assert_eq!(options.text_encoding, "UTF-8");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Parse nested bytecode into action records instead of keeping raw bytes.
    pub decode_nested_bytecode: bool,
    pub decode_shapes: bool,
    pub decode_glyphs: bool,
    /// Colour fields carry an alpha channel.
    pub use_transparent_color: bool,
    pub text_encoding: String,
    pub max_opaque_length: u32,
    /// Deepest container nesting accepted on decode or encode. Record trees
    /// drop, compare and clone recursively, so this also bounds the stack
    /// those need.
    pub max_depth: usize,
    /// Close the root sequence with a terminator when encoding.
    pub terminate_root: bool,
    /// Additional open-ended flags.
    pub flags: BTreeMap<String, FlagValue>,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            decode_nested_bytecode: true,
            decode_shapes: true,
            decode_glyphs: true,
            use_transparent_color: false,
            text_encoding: "UTF-8".to_owned(),
            max_opaque_length: DEFAULT_MAX_OPAQUE_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
            terminate_root: true,
            flags: BTreeMap::new(),
        }
    }
}

impl CodecOptions {
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        serde_json::from_str(json).map_err(|err| CodecError::InvalidOptions(err.to_string()))
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(|err| CodecError::InvalidOptions(err.to_string()))
    }
}

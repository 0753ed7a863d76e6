//! Per-operation decode/encode context.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tagstream_bits::TextEncoding;

use crate::options::CodecOptions;
use crate::registry::{family, TypeRegistry};
use crate::CodecError;

/// Names of the flags understood by the bundled record variants.
pub mod flags {
    /// When false, nested bytecode is kept as raw bytes.
    pub const DECODE_NESTED_BYTECODE: &str = "decode_nested_bytecode";
    pub const DECODE_SHAPES: &str = "decode_shapes";
    pub const DECODE_GLYPHS: &str = "decode_glyphs";
    /// Colour fields carry four channels instead of three.
    pub const USE_TRANSPARENT_COLOR: &str = "use_transparent_color";
}

/// Value of a context flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
}

impl FlagValue {
    pub fn as_bool(self) -> bool {
        match self {
            FlagValue::Bool(b) => b,
            FlagValue::Int(i) => i != 0,
        }
    }

    pub fn as_int(self) -> i64 {
        match self {
            FlagValue::Bool(b) => i64::from(b),
            FlagValue::Int(i) => i,
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        FlagValue::Int(value)
    }
}

/// Configuration and registries threaded through one decode or encode call.
///
/// A context belongs to a single operation. Flags set by a record while it
/// is being decoded, measured or encoded apply to that record's subtree and
/// are restored once the record is complete; flags set by the caller persist.
#[derive(Debug, Clone)]
pub struct Context {
    flags: HashMap<String, FlagValue>,
    journal: Vec<(String, Option<FlagValue>)>,
    registries: HashMap<String, Arc<TypeRegistry>>,
    text_encoding: String,
    max_opaque_length: u32,
    max_depth: usize,
    terminate_root: bool,
    root_family: String,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Creates a context with default options and no registries.
    pub fn new() -> Self {
        Self::with_options(&CodecOptions::default())
    }

    pub fn with_options(options: &CodecOptions) -> Self {
        let mut flags: HashMap<String, FlagValue> = options
            .flags
            .iter()
            .map(|(name, value)| (name.clone(), *value))
            .collect();
        flags.insert(flags::DECODE_NESTED_BYTECODE.to_owned(), options.decode_nested_bytecode.into());
        flags.insert(flags::DECODE_SHAPES.to_owned(), options.decode_shapes.into());
        flags.insert(flags::DECODE_GLYPHS.to_owned(), options.decode_glyphs.into());
        flags.insert(flags::USE_TRANSPARENT_COLOR.to_owned(), options.use_transparent_color.into());
        Self {
            flags,
            journal: Vec::new(),
            registries: HashMap::new(),
            text_encoding: options.text_encoding.clone(),
            max_opaque_length: options.max_opaque_length,
            max_depth: options.max_depth,
            terminate_root: options.terminate_root,
            root_family: family::TAGS.to_owned(),
        }
    }

    /// Creates a context with default options and the bundled tag and
    /// action registries.
    pub fn standard() -> Self {
        Self::standard_with_options(&CodecOptions::default())
    }

    pub fn standard_with_options(options: &CodecOptions) -> Self {
        let mut ctx = Self::with_options(options);
        ctx.set_registry(family::TAGS, crate::tags::shared_registry());
        ctx.set_registry(family::ACTIONS, crate::actions::shared_registry());
        ctx
    }

    pub fn get_flag(&self, name: &str) -> Option<FlagValue> {
        self.flags.get(name).copied()
    }

    /// Returns a flag as a boolean; unset flags read as false.
    pub fn get_bool(&self, name: &str) -> bool {
        self.get_flag(name).is_some_and(FlagValue::as_bool)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get_flag(name).map(FlagValue::as_int)
    }

    pub fn set_flag(&mut self, name: impl Into<String>, value: impl Into<FlagValue>) {
        let name = name.into();
        let previous = self.flags.insert(name.clone(), value.into());
        self.journal.push((name, previous));
    }

    pub fn get_registry(&self, family: &str) -> Result<Arc<TypeRegistry>, CodecError> {
        self.registries
            .get(family)
            .cloned()
            .ok_or_else(|| CodecError::UnknownFamily(family.to_owned()))
    }

    pub fn set_registry(&mut self, family: impl Into<String>, registry: impl Into<Arc<TypeRegistry>>) {
        self.registries.insert(family.into(), registry.into());
    }

    pub fn set_text_encoding(&mut self, label: impl Into<String>) {
        self.text_encoding = label.into();
    }

    /// Resolves the configured text encoding. An unknown label is reported
    /// here, at the first string access, rather than when it is set.
    pub fn text_encoding(&self) -> Result<TextEncoding, CodecError> {
        TextEncoding::from_label(&self.text_encoding)
            .ok_or_else(|| CodecError::UnsupportedEncoding(self.text_encoding.clone()))
    }

    pub fn max_opaque_length(&self) -> u32 {
        self.max_opaque_length
    }

    pub fn set_max_opaque_length(&mut self, limit: u32) {
        self.max_opaque_length = limit;
    }

    /// Deepest container nesting a decode or encode call will walk.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn set_max_depth(&mut self, limit: usize) {
        self.max_depth = limit;
    }

    pub fn terminate_root(&self) -> bool {
        self.terminate_root
    }

    pub fn set_terminate_root(&mut self, terminate: bool) {
        self.terminate_root = terminate;
    }

    /// Family whose registry decodes the top-level sequence.
    pub fn root_family(&self) -> &str {
        &self.root_family
    }

    pub fn set_root_family(&mut self, family: impl Into<String>) {
        self.root_family = family.into();
    }

    /// Returns a journal position that [`Context::rewind`] can restore.
    pub(crate) fn mark(&self) -> usize {
        self.journal.len()
    }

    /// Undoes every flag change made since `mark`.
    pub(crate) fn rewind(&mut self, mark: usize) {
        while self.journal.len() > mark {
            let Some((name, previous)) = self.journal.pop() else {
                break;
            };
            match previous {
                Some(value) => {
                    self.flags.insert(name, value);
                }
                None => {
                    self.flags.remove(&name);
                }
            }
        }
    }
}

impl From<&CodecOptions> for Context {
    fn from(options: &CodecOptions) -> Self {
        Self::with_options(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags() {
        let ctx = Context::new();
        assert!(ctx.get_bool(flags::DECODE_NESTED_BYTECODE));
        assert!(!ctx.get_bool(flags::USE_TRANSPARENT_COLOR));
        assert!(!ctx.get_bool("never_set"));
        assert_eq!(ctx.get_flag("never_set"), None);
    }

    #[test]
    fn test_int_flags() {
        let mut ctx = Context::new();
        ctx.set_flag("version", 8i64);
        assert_eq!(ctx.get_int("version"), Some(8));
        assert!(ctx.get_bool("version"));
    }

    #[test]
    fn test_rewind_restores_flags() {
        let mut ctx = Context::new();
        ctx.set_flag("outer", true);
        let mark = ctx.mark();
        ctx.set_flag(flags::USE_TRANSPARENT_COLOR, true);
        ctx.set_flag("scratch", 3i64);
        ctx.set_flag(flags::USE_TRANSPARENT_COLOR, false);
        ctx.rewind(mark);
        assert!(ctx.get_bool("outer"));
        assert_eq!(ctx.get_flag(flags::USE_TRANSPARENT_COLOR), Some(FlagValue::Bool(false)));
        assert_eq!(ctx.get_flag("scratch"), None);
    }

    #[test]
    fn test_unsupported_encoding_is_lazy() {
        let mut ctx = Context::new();
        ctx.set_text_encoding("klingon");
        assert_eq!(
            ctx.text_encoding(),
            Err(CodecError::UnsupportedEncoding("klingon".to_owned()))
        );
        ctx.set_text_encoding("latin1");
        assert_eq!(ctx.text_encoding(), Ok(TextEncoding::Latin1));
    }

    #[test]
    fn test_unknown_family() {
        let ctx = Context::new();
        assert_eq!(
            ctx.get_registry("fills").unwrap_err(),
            CodecError::UnknownFamily("fills".to_owned())
        );
    }
}

//! Type-code dispatch.

use std::collections::HashMap;
use std::fmt;

use crate::header::HeaderFormat;
use crate::record::{OpaqueRecord, Record};

/// Names of the record families bundled with the crate.
pub mod family {
    /// Top-level and sprite tags.
    pub const TAGS: &str = "tags";
    /// Bytecode instructions.
    pub const ACTIONS: &str = "actions";
}

/// Builds an empty record for a type code.
pub type Factory = fn(u16) -> Box<dyn Record>;

/// Maps the type codes of one record family to record constructors.
///
/// Codes with no binding resolve to the fallback factory, which by default
/// builds an [`OpaqueRecord`] that keeps the raw body bytes, so records from
/// newer revisions of the format still round-trip.
///
/// A registry is populated once and then shared read-only, usually behind an
/// `Arc` held by each [`crate::Context`].
#[derive(Clone)]
pub struct TypeRegistry {
    format: HeaderFormat,
    entries: HashMap<u16, Factory>,
    fallback: Factory,
}

impl TypeRegistry {
    pub fn new(format: HeaderFormat) -> Self {
        Self {
            format,
            entries: HashMap::new(),
            fallback: OpaqueRecord::boxed,
        }
    }

    pub fn header_format(&self) -> HeaderFormat {
        self.format
    }

    /// Binds `type_code` to `factory`, returning the binding it replaces.
    pub fn register(&mut self, type_code: u16, factory: Factory) -> Option<Factory> {
        self.entries.insert(type_code, factory)
    }

    /// Builder-style [`TypeRegistry::register`].
    pub fn with(mut self, type_code: u16, factory: Factory) -> Self {
        self.register(type_code, factory);
        self
    }

    pub fn set_fallback(&mut self, factory: Factory) {
        self.fallback = factory;
    }

    pub fn is_registered(&self, type_code: u16) -> bool {
        self.entries.contains_key(&type_code)
    }

    /// Returns the factory bound to `type_code`, or the fallback.
    pub fn resolve(&self, type_code: u16) -> Factory {
        self.entries.get(&type_code).copied().unwrap_or(self.fallback)
    }

    /// Builds an empty record for `type_code`.
    pub fn create(&self, type_code: u16) -> Box<dyn Record> {
        (self.resolve(type_code))(type_code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut codes: Vec<u16> = self.entries.keys().copied().collect();
        codes.sort_unstable();
        f.debug_struct("TypeRegistry")
            .field("format", &self.format)
            .field("codes", &codes)
            .finish()
    }
}

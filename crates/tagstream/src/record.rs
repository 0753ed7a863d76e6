//! The record contract and the opaque fallback record.

use std::any::Any;
use std::fmt;

use tagstream_bits::BitCursor;

use crate::header::RecordHeader;
use crate::{CodecError, Context};

/// A typed record that can be decoded from and encoded to its body bytes.
///
/// The framework owns the header: it reads it, hands the record the
/// [`RecordHeader`], and afterwards checks that exactly `header.length`
/// bytes were consumed. Encoding mirrors this: [`Record::prepare_to_encode`]
/// must return exactly the number of bytes [`Record::encode`] writes, and the
/// framework verifies it.
///
/// Container records hold an ordered child list decoded from a nested
/// sequence. Their own `decode`/`encode` handle only the fields that precede
/// the children; the framework walks the children and the closing terminator
/// and includes them in the declared length.
pub trait Record: AnyRecord + fmt::Debug + Send + Sync {
    fn type_code(&self) -> u16;

    /// Reads the record's own fields. The cursor sits just past the header.
    fn decode(&mut self, cursor: &mut BitCursor, header: &RecordHeader, ctx: &mut Context) -> Result<(), CodecError>;

    /// Returns the size in bytes of the fields [`Record::encode`] writes.
    fn prepare_to_encode(&self, ctx: &mut Context) -> Result<u32, CodecError>;

    fn encode(&self, cursor: &mut BitCursor, ctx: &mut Context) -> Result<(), CodecError>;

    /// Forces the extended header form even for short bodies.
    fn extended_header(&self) -> bool {
        false
    }

    /// Family of the nested sequence following this record's own fields, if
    /// the record currently holds one.
    fn nested_family(&self) -> Option<&'static str> {
        None
    }

    fn children(&self) -> Option<&[Box<dyn Record>]> {
        None
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Box<dyn Record>>> {
        None
    }
}

/// Object-safe helpers implemented for every `Record + PartialEq + Clone`.
pub trait AnyRecord: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn dyn_eq(&self, other: &dyn Record) -> bool;
    fn dyn_clone(&self) -> Box<dyn Record>;
}

impl<T: Record + PartialEq + Clone> AnyRecord for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Record) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn dyn_clone(&self) -> Box<dyn Record> {
        Box::new(self.clone())
    }
}

impl dyn Record {
    pub fn downcast_ref<T: Record>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Record>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn is_container(&self) -> bool {
        self.children().is_some()
    }
}

impl PartialEq for dyn Record {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other)
    }
}

impl Clone for Box<dyn Record> {
    fn clone(&self) -> Self {
        self.dyn_clone()
    }
}

/// Converts a computed body size to a declared length.
pub(crate) fn body_len(type_code: u16, size: usize) -> Result<u32, CodecError> {
    u32::try_from(size).map_err(|_| CodecError::LengthOverflow {
        type_code,
        length: size as u64,
        max: u64::from(u32::MAX),
    })
}

/// A record whose type code no registry recognised.
///
/// The body is kept verbatim, together with the header form it arrived in,
/// so re-encoding reproduces the original bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueRecord {
    pub type_code: u16,
    pub data: Vec<u8>,
    pub extended: bool,
}

impl OpaqueRecord {
    pub fn new(type_code: u16, data: Vec<u8>) -> Self {
        Self {
            type_code,
            data,
            extended: false,
        }
    }

    /// Fallback [`crate::Factory`].
    pub fn boxed(type_code: u16) -> Box<dyn Record> {
        Box::new(Self::new(type_code, Vec::new()))
    }
}

impl Record for OpaqueRecord {
    fn type_code(&self) -> u16 {
        self.type_code
    }

    fn decode(&mut self, cursor: &mut BitCursor, header: &RecordHeader, _ctx: &mut Context) -> Result<(), CodecError> {
        self.type_code = header.type_code;
        self.extended = header.extended;
        self.data = cursor.read_bytes(header.length as usize)?;
        Ok(())
    }

    fn prepare_to_encode(&self, _ctx: &mut Context) -> Result<u32, CodecError> {
        body_len(self.type_code, self.data.len())
    }

    fn encode(&self, cursor: &mut BitCursor, _ctx: &mut Context) -> Result<(), CodecError> {
        cursor.write_bytes(&self.data)?;
        Ok(())
    }

    fn extended_header(&self) -> bool {
        self.extended
    }
}

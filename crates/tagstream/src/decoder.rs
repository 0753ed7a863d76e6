//! Record sequence decoder.
//!
//! Nested sequences are walked with an explicit frame stack, so container
//! depth in untrusted input is bounded by memory rather than by the call
//! stack.

use std::sync::Arc;

use tagstream_bits::{hex_preview_default, BitCursor, BitError};
use tracing::{debug, trace, warn};

use crate::header::RecordHeader;
use crate::record::Record;
use crate::registry::TypeRegistry;
use crate::{CodecError, Context};

/// Result of decoding a whole buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub records: Vec<Box<dyn Record>>,
    /// Bytes consumed, including the root terminator when one was read.
    pub consumed: usize,
    /// Whether the root sequence ended with a terminator rather than at the
    /// end of the buffer.
    pub terminated: bool,
}

/// A record whose own fields are decoded and whose children, if any, are
/// still being read.
struct Frame {
    record: Box<dyn Record>,
    header: RecordHeader,
    offset: usize,
    body_start: usize,
    body_end: usize,
    mark: usize,
    /// Registry of the open child sequence. Cleared once its terminator is read.
    nested: Option<Arc<TypeRegistry>>,
}

/// Pull decoder yielding one top-level record at a time.
///
/// # Example
///
/// ```
/// use tagstream::{Context, Decoder};
///
/// let mut ctx = Context::standard();
/// // ShowFrame, ShowFrame, end
/// let bytes = [0x40, 0x00, 0x40, 0x00, 0x00, 0x00];
/// let mut decoder = Decoder::new(&bytes, &mut ctx);
/// let mut count = 0;
/// while let Some(record) = decoder.next_record().unwrap() {
///     assert_eq!(record.type_code(), 1);
///     count += 1;
/// }
/// assert_eq!(count, 2);
/// assert!(decoder.is_terminated());
/// assert_eq!(decoder.position(), 6);
/// ```
pub struct Decoder<'c> {
    cursor: BitCursor,
    ctx: &'c mut Context,
    end: usize,
    terminated: bool,
}

impl<'c> Decoder<'c> {
    pub fn new(bytes: &[u8], ctx: &'c mut Context) -> Self {
        Self::with_cursor(BitCursor::from_slice(bytes), ctx)
    }

    /// Decodes from the cursor's current position to the end of its buffer.
    pub fn with_cursor(cursor: BitCursor, ctx: &'c mut Context) -> Self {
        let end = cursor.len();
        Self {
            cursor,
            ctx,
            end,
            terminated: false,
        }
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.cursor.byte_position()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn context(&mut self) -> &mut Context {
        self.ctx
    }

    pub fn into_cursor(self) -> BitCursor {
        self.cursor
    }

    /// Moves to the next occurrence of a `width`-bit pattern, testing every
    /// `step` bits from the current position.
    ///
    /// On a match the decoder is positioned at the first bit of the match and
    /// a terminated decoder becomes readable again. Otherwise nothing moves.
    pub fn resync(&mut self, pattern: u32, width: u32, step: u32) -> Result<bool, CodecError> {
        if !self.cursor.find_bit_pattern(pattern, width, step)? {
            return Ok(false);
        }
        self.cursor.adjust_pointer(-(width as isize))?;
        self.terminated = false;
        debug!(bit_offset = self.cursor.get_pointer(), "resynchronised");
        Ok(true)
    }

    /// Decodes the next top-level record.
    ///
    /// Returns `None` after the root terminator or at the end of the buffer.
    /// On error, flags set by the partly decoded records are rewound so the
    /// context is ready for a [`Decoder::resync`].
    pub fn next_record(&mut self) -> Result<Option<Box<dyn Record>>, CodecError> {
        let mark = self.ctx.mark();
        let result = self.read_record();
        if result.is_err() {
            self.ctx.rewind(mark);
        }
        result
    }

    fn read_record(&mut self) -> Result<Option<Box<dyn Record>>, CodecError> {
        if self.terminated {
            return Ok(None);
        }
        self.cursor.align_to_byte();
        let offset = self.cursor.byte_position();
        if offset >= self.end {
            return Ok(None);
        }
        let registry = self.ctx.get_registry(self.ctx.root_family())?;
        let header = registry.header_format().decode_header(&mut self.cursor)?;
        if header.is_terminator() {
            if header.length != 0 {
                return Err(CodecError::InvalidTerminator {
                    offset,
                    length: header.length,
                });
            }
            self.terminated = true;
            return Ok(None);
        }
        self.decode_tree(&registry, header, offset).map(Some)
    }

    fn decode_tree(
        &mut self,
        registry: &TypeRegistry,
        header: RecordHeader,
        offset: usize,
    ) -> Result<Box<dyn Record>, CodecError> {
        let mut current = self.open(registry, header, offset, self.end)?;
        let mut parents: Vec<Frame> = Vec::new();
        loop {
            if let Some(nested) = current.nested.clone() {
                let child_offset = self.cursor.byte_position();
                if child_offset >= current.body_end {
                    return Err(CodecError::MissingTerminator {
                        type_code: current.header.type_code,
                        offset: current.offset,
                    });
                }
                let child = nested.header_format().decode_header(&mut self.cursor)?;
                if child.is_terminator() {
                    if child.length != 0 {
                        return Err(CodecError::InvalidTerminator {
                            offset: child_offset,
                            length: child.length,
                        });
                    }
                    current.nested = None;
                } else {
                    let depth = parents.len() + 1;
                    let limit = self.ctx.max_depth();
                    if depth > limit {
                        return Err(CodecError::NestingTooDeep {
                            type_code: child.type_code,
                            depth,
                            limit,
                        });
                    }
                    let frame = self.open(&nested, child, child_offset, current.body_end)?;
                    parents.push(std::mem::replace(&mut current, frame));
                }
                continue;
            }

            let record = self.close(current)?;
            match parents.pop() {
                Some(mut parent) => {
                    let type_code = parent.header.type_code;
                    parent
                        .record
                        .children_mut()
                        .ok_or(CodecError::NotAContainer(type_code))?
                        .push(record);
                    current = parent;
                }
                None => return Ok(record),
            }
        }
    }

    /// Builds the record for `header` and decodes its own fields.
    fn open(
        &mut self,
        registry: &TypeRegistry,
        header: RecordHeader,
        offset: usize,
        scope_end: usize,
    ) -> Result<Frame, CodecError> {
        let body_start = self.cursor.byte_position();
        let body_end = body_start + header.length as usize;
        if body_end > scope_end {
            return Err(BitError::OutOfBounds {
                offset: body_start << 3,
                requested: (header.length as usize) << 3,
                len: scope_end << 3,
            }
            .into());
        }
        if !registry.is_registered(header.type_code) {
            let limit = self.ctx.max_opaque_length();
            if header.length > limit {
                return Err(CodecError::RecordTooLarge {
                    type_code: header.type_code,
                    offset,
                    length: header.length,
                    limit,
                });
            }
            warn!(
                type_code = header.type_code,
                offset,
                length = header.length,
                "unregistered type code, keeping raw body"
            );
        }

        let mut record = registry.create(header.type_code);
        let mark = self.ctx.mark();
        record.decode(&mut self.cursor, &header, self.ctx)?;
        self.cursor.align_to_byte();
        let nested = match record.nested_family() {
            Some(family) => {
                if record.children().is_none() {
                    return Err(CodecError::NotAContainer(header.type_code));
                }
                Some(self.ctx.get_registry(family)?)
            }
            None => None,
        };
        trace!(
            type_code = header.type_code,
            offset,
            length = header.length,
            extended = header.extended,
            container = nested.is_some(),
            "decoding record"
        );
        Ok(Frame {
            record,
            header,
            offset,
            body_start,
            body_end,
            mark,
            nested,
        })
    }

    /// Checks that the record consumed exactly its declared body.
    fn close(&mut self, frame: Frame) -> Result<Box<dyn Record>, CodecError> {
        self.ctx.rewind(frame.mark);
        let consumed = self.cursor.byte_position() - frame.body_start;
        let declared = frame.header.length;
        if consumed != declared as usize {
            let discrepancy = consumed as i64 - i64::from(declared);
            let body = self
                .cursor
                .byte_range(frame.body_start, frame.body_end.min(self.cursor.len()))
                .map(hex_preview_default)
                .unwrap_or_default();
            warn!(
                type_code = frame.header.type_code,
                offset = frame.offset,
                declared,
                discrepancy,
                body = %body,
                "record body size mismatch"
            );
            return Err(CodecError::BodySizeMismatch {
                type_code: frame.header.type_code,
                offset: frame.offset,
                declared,
                discrepancy,
            });
        }
        debug_assert_eq!(self.cursor.byte_position(), frame.body_end);
        Ok(frame.record)
    }
}

/// Decodes every top-level record in `bytes` using the context's root family.
///
/// Decoding stops at the root terminator or at the end of the buffer; bytes
/// after a root terminator are left unread and excluded from `consumed`.
pub fn decode(bytes: &[u8], ctx: &mut Context) -> Result<Decoded, CodecError> {
    let mut decoder = Decoder::new(bytes, ctx);
    let mut records = Vec::new();
    while let Some(record) = decoder.next_record()? {
        records.push(record);
    }
    let consumed = decoder.position();
    let terminated = decoder.is_terminated();
    debug!(records = records.len(), consumed, terminated, "decoded sequence");
    Ok(Decoded {
        records,
        consumed,
        terminated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::OpaqueRecord;

    #[test]
    fn test_stops_at_end_without_terminator() {
        let mut ctx = Context::standard();
        let decoded = decode(&[0x40, 0x00], &mut ctx).unwrap();
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.consumed, 2);
        assert!(!decoded.terminated);
    }

    #[test]
    fn test_trailing_bytes_after_terminator_are_ignored() {
        let mut ctx = Context::standard();
        let decoded = decode(&[0x40, 0x00, 0x00, 0x00, 0xff], &mut ctx).unwrap();
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.consumed, 4);
        assert!(decoded.terminated);
    }

    #[test]
    fn test_terminator_with_length_is_rejected() {
        let mut ctx = Context::standard();
        assert_eq!(
            decode(&[0x02, 0x00, 0xaa, 0xbb], &mut ctx).unwrap_err(),
            CodecError::InvalidTerminator { offset: 0, length: 2 }
        );
    }

    #[test]
    fn test_declared_length_past_buffer() {
        let mut ctx = Context::standard();
        // type 700, length 10, only 2 body bytes present
        let bytes = [0x0a, 0xaf, 1, 2];
        assert!(matches!(
            decode(&bytes, &mut ctx),
            Err(CodecError::Bits(BitError::OutOfBounds { offset: 16, requested: 80, len: 32 }))
        ));
    }

    #[test]
    fn test_opaque_limit() {
        let mut ctx = Context::standard();
        ctx.set_max_opaque_length(2);
        // type 700, length 3
        let bytes = [0x03, 0xaf, 1, 2, 3];
        assert_eq!(
            decode(&bytes, &mut ctx).unwrap_err(),
            CodecError::RecordTooLarge {
                type_code: 700,
                offset: 0,
                length: 3,
                limit: 2
            }
        );
        ctx.set_max_opaque_length(3);
        let decoded = decode(&bytes, &mut ctx).unwrap();
        let opaque = decoded.records[0].downcast_ref::<OpaqueRecord>().unwrap();
        assert_eq!(opaque.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_nesting_limit() {
        let mut ctx = Context::standard();
        ctx.set_max_depth(1);
        // sprite 1 { sprite 2 { ShowFrame } }
        let bytes = [
            0xd0, 0x09, 1, 0, 1, 0, // outer sprite, 16 bytes
            0xc8, 0x09, 2, 0, 1, 0, // inner sprite, 8 bytes
            0x40, 0x00, 0x00, 0x00, // ShowFrame, inner end
            0x00, 0x00, 0x00, 0x00, // outer end, root end
        ];
        assert_eq!(
            decode(&bytes, &mut ctx).unwrap_err(),
            CodecError::NestingTooDeep {
                type_code: 1,
                depth: 2,
                limit: 1
            }
        );
        ctx.set_max_depth(2);
        assert_eq!(decode(&bytes, &mut ctx).unwrap().consumed, bytes.len());
    }

    #[test]
    fn test_resync_skips_garbage() {
        let mut ctx = Context::standard();
        let bytes = [0xff, 0xff, 0x40, 0x00];
        {
            let mut decoder = Decoder::new(&bytes, &mut ctx);
            assert!(decoder.next_record().is_err());
        }
        let mut decoder = Decoder::new(&bytes, &mut ctx);
        assert!(decoder.resync(0x4000, 16, 8).unwrap());
        assert_eq!(decoder.position(), 2);
        assert_eq!(decoder.next_record().unwrap().unwrap().type_code(), 1);
        assert!(!decoder.resync(0x4000, 16, 8).unwrap());
    }
}

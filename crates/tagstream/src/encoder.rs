//! Record sequence encoder.
//!
//! Encoding a record tree takes two passes. The measure pass computes every
//! body length in pre-order, filling each slot once the node's subtree is
//! complete. The emit pass then writes headers and bodies in the same order
//! and verifies each body against its measured length.

use tagstream_bits::BitCursor;
use tracing::{debug, trace, warn};

use crate::header::{HeaderFormat, RecordHeader, TERMINATOR};
use crate::record::Record;
use crate::{CodecError, Context};

fn header_for(record: &dyn Record, length: u32) -> RecordHeader {
    let mut header = RecordHeader::new(record.type_code(), length);
    header.extended |= record.extended_header();
    header
}

fn children_of<'r>(
    record: &'r dyn Record,
    ctx: &Context,
) -> Result<Option<(&'r [Box<dyn Record>], HeaderFormat)>, CodecError> {
    let Some(family) = record.nested_family() else {
        return Ok(None);
    };
    let children = record
        .children()
        .ok_or(CodecError::NotAContainer(record.type_code()))?;
    let format = ctx.get_registry(family)?.header_format();
    Ok(Some((children, format)))
}

fn checked_len(type_code: u16, length: u64) -> Result<u32, CodecError> {
    u32::try_from(length).map_err(|_| CodecError::LengthOverflow {
        type_code,
        length,
        max: u64::from(u32::MAX),
    })
}

struct Measure<'r> {
    record: &'r dyn Record,
    slot: usize,
    total: u64,
    children: Option<(&'r [Box<dyn Record>], HeaderFormat)>,
    next: usize,
    mark: usize,
}

fn open_measure<'r>(record: &'r dyn Record, sizes: &mut Vec<u32>, ctx: &mut Context) -> Result<Measure<'r>, CodecError> {
    let slot = sizes.len();
    sizes.push(0);
    let mark = ctx.mark();
    let own = record.prepare_to_encode(ctx)?;
    let children = children_of(record, ctx)?;
    Ok(Measure {
        record,
        slot,
        total: u64::from(own),
        children,
        next: 0,
        mark,
    })
}

/// Computes the body length of `record` and of every record beneath it, in
/// pre-order.
fn measure(record: &dyn Record, ctx: &mut Context) -> Result<Vec<u32>, CodecError> {
    let mut sizes = Vec::new();
    let mut current = open_measure(record, &mut sizes, ctx)?;
    let mut parents: Vec<Measure<'_>> = Vec::new();
    loop {
        if let Some((children, _)) = current.children {
            if let Some(child) = children.get(current.next) {
                current.next += 1;
                let depth = parents.len() + 1;
                if depth > ctx.max_depth() {
                    return Err(CodecError::NestingTooDeep {
                        type_code: child.type_code(),
                        depth,
                        limit: ctx.max_depth(),
                    });
                }
                let frame = open_measure(child.as_ref(), &mut sizes, ctx)?;
                parents.push(std::mem::replace(&mut current, frame));
                continue;
            }
        }

        let mut total = current.total;
        if let Some((_, format)) = current.children {
            total += u64::from(format.terminator_len());
        }
        let length = checked_len(current.record.type_code(), total)?;
        sizes[current.slot] = length;
        ctx.rewind(current.mark);

        match parents.pop() {
            Some(mut parent) => {
                if let Some((_, format)) = parent.children {
                    let header = header_for(current.record, length);
                    parent.total += u64::from(format.header_len(&header)) + u64::from(length);
                }
                current = parent;
            }
            None => return Ok(sizes),
        }
    }
}

/// Returns the body length `record` declares in its header, including any
/// nested sequence and its terminator.
pub fn prepare_to_encode(record: &dyn Record, ctx: &mut Context) -> Result<u32, CodecError> {
    let mark = ctx.mark();
    let sizes = measure(record, ctx).inspect_err(|_| ctx.rewind(mark))?;
    Ok(sizes.first().copied().unwrap_or_default())
}

struct Emit<'r> {
    record: &'r dyn Record,
    header: RecordHeader,
    offset: usize,
    body_start: usize,
    children: Option<(&'r [Box<dyn Record>], HeaderFormat)>,
    next: usize,
    mark: usize,
}

/// Push encoder writing one top-level record at a time.
///
/// # Example
///
/// ```
/// use tagstream::tags::ShowFrame;
/// use tagstream::{Context, Encoder};
///
/// let mut ctx = Context::standard();
/// let mut encoder = Encoder::new(&mut ctx);
/// encoder.write_record(&ShowFrame).unwrap();
/// assert_eq!(encoder.finish().unwrap(), vec![0x40, 0x00, 0x00, 0x00]);
/// ```
pub struct Encoder<'c> {
    cursor: BitCursor,
    ctx: &'c mut Context,
    written: usize,
}

impl<'c> Encoder<'c> {
    pub fn new(ctx: &'c mut Context) -> Self {
        Self::with_cursor(BitCursor::new(), ctx)
    }

    /// Appends to the end of `cursor`'s buffer.
    pub fn with_cursor(mut cursor: BitCursor, ctx: &'c mut Context) -> Self {
        cursor.seek_end();
        Self {
            cursor,
            ctx,
            written: 0,
        }
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.cursor.byte_position()
    }

    pub fn context(&mut self) -> &mut Context {
        self.ctx
    }

    /// Writes `record`, its header and any nested sequence.
    ///
    /// A failed write leaves nothing behind: the buffer is cut back to where
    /// the record started and flags set while encoding it are rewound.
    pub fn write_record(&mut self, record: &dyn Record) -> Result<(), CodecError> {
        let mark = self.ctx.mark();
        let start = self.cursor.len();
        match self.write_tree(record) {
            Ok(()) => {
                self.written += 1;
                Ok(())
            }
            Err(err) => {
                self.ctx.rewind(mark);
                self.cursor.truncate(start);
                Err(err)
            }
        }
    }

    fn write_tree(&mut self, record: &dyn Record) -> Result<(), CodecError> {
        let format = self.ctx.get_registry(self.ctx.root_family())?.header_format();
        let sizes = measure(record, self.ctx)?;
        let mut slots = sizes.into_iter();
        let mut current = self.open(record, format, &mut slots)?;
        let mut parents: Vec<Emit<'_>> = Vec::new();
        loop {
            if let Some((children, format)) = current.children {
                if let Some(child) = children.get(current.next) {
                    current.next += 1;
                    let frame = self.open(child.as_ref(), format, &mut slots)?;
                    parents.push(std::mem::replace(&mut current, frame));
                    continue;
                }
                format.encode_header(&mut self.cursor, &RecordHeader::new(TERMINATOR, 0))?;
            }
            self.close(&current)?;
            match parents.pop() {
                Some(parent) => current = parent,
                None => return Ok(()),
            }
        }
    }

    /// Writes the root terminator when the context asks for one and returns
    /// the encoded bytes.
    pub fn finish(mut self) -> Result<Vec<u8>, CodecError> {
        if self.ctx.terminate_root() {
            let format = self.ctx.get_registry(self.ctx.root_family())?.header_format();
            format.encode_header(&mut self.cursor, &RecordHeader::new(TERMINATOR, 0))?;
        }
        debug!(records = self.written, bytes = self.cursor.len(), "encoded sequence");
        Ok(self.cursor.into_bytes())
    }

    fn open<'r>(
        &mut self,
        record: &'r dyn Record,
        format: HeaderFormat,
        slots: &mut impl Iterator<Item = u32>,
    ) -> Result<Emit<'r>, CodecError> {
        let length = slots
            .next()
            .ok_or(CodecError::NotAContainer(record.type_code()))?;
        let header = header_for(record, length);
        self.cursor.align_to_byte();
        let offset = self.cursor.byte_position();
        format.encode_header(&mut self.cursor, &header)?;
        trace!(
            type_code = header.type_code,
            offset,
            length,
            extended = header.extended,
            "encoding record"
        );
        let body_start = self.cursor.byte_position();
        let mark = self.ctx.mark();
        record.encode(&mut self.cursor, self.ctx)?;
        self.cursor.align_to_byte();
        let children = children_of(record, self.ctx)?;
        Ok(Emit {
            record,
            header,
            offset,
            body_start,
            children,
            next: 0,
            mark,
        })
    }

    /// Checks that the record produced exactly its declared body.
    fn close(&mut self, frame: &Emit<'_>) -> Result<(), CodecError> {
        self.ctx.rewind(frame.mark);
        let produced = self.cursor.byte_position() - frame.body_start;
        let declared = frame.header.length;
        if produced != declared as usize {
            let discrepancy = produced as i64 - i64::from(declared);
            warn!(
                type_code = frame.record.type_code(),
                offset = frame.offset,
                declared,
                discrepancy,
                "record body size mismatch"
            );
            return Err(CodecError::BodySizeMismatch {
                type_code: frame.header.type_code,
                offset: frame.offset,
                declared,
                discrepancy,
            });
        }
        Ok(())
    }
}

/// Encodes `records` as a root sequence, followed by a terminator when the
/// context's `terminate_root` is set.
pub fn encode(records: &[Box<dyn Record>], ctx: &mut Context) -> Result<Vec<u8>, CodecError> {
    let mut encoder = Encoder::new(ctx);
    for record in records {
        encoder.write_record(record.as_ref())?;
    }
    encoder.finish()
}

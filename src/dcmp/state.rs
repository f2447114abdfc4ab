//! Decompression state management
//!
//! One [`DcmpState`] holds everything a single run mutates: the decode cursor,
//! the output buffer, the back-reference table and the statistics. A fresh
//! state is built for every stream, so nothing leaks between runs.

use super::backref::BackRefTable;
use super::cursor::ByteCursor;
use crate::common::{DcmpHeader, DcmpOptions, DecompressionStats, HEADER_SIZE};
use crate::{DcmpError, Result};

/// Upper bound on the output capacity reserved before decoding starts
const MAX_PREALLOC: usize = 1 << 24;

/// Read the 6-byte header at `offset` without validating it
pub fn read_header(data: &[u8], offset: usize) -> Result<DcmpHeader> {
    let mut cursor = ByteCursor::new(data, offset);
    if cursor.remaining() < HEADER_SIZE {
        return Err(DcmpError::OutOfBounds {
            offset,
            needed: HEADER_SIZE,
            available: data.len(),
        });
    }

    Ok(DcmpHeader {
        ratio: cursor.read_u8()?,
        overrun: cursor.read_u8()?,
        algorithm_id: cursor.read_u16_be()?,
        table_id: cursor.read_u16_be()?,
    })
}

/// Mutable state of one decompression run
#[derive(Debug)]
pub struct DcmpState<'a> {
    /// Parsed stream header
    pub header: DcmpHeader,
    /// Declared uncompressed size
    pub unpacked_size: usize,
    /// Decode cursor into the compressed stream
    pub(crate) cursor: ByteCursor<'a>,
    /// Reconstructed bytes so far
    pub(crate) output: Vec<u8>,
    /// Runs captured for later replay
    pub(crate) backrefs: BackRefTable,
    /// Counters for this run
    pub(crate) stats: DecompressionStats,
    start_offset: usize,
}

impl<'a> DcmpState<'a> {
    /// Validate the header and position the cursor right after it
    pub fn new(data: &'a [u8], options: &DcmpOptions) -> Result<Self> {
        let header = read_header(data, options.header_offset)?;
        header.validate()?;

        Ok(Self {
            header,
            unpacked_size: options.unpacked_size,
            cursor: ByteCursor::new(data, options.header_offset + HEADER_SIZE),
            output: Vec::with_capacity(options.unpacked_size.min(MAX_PREALLOC)),
            backrefs: BackRefTable::new(),
            stats: DecompressionStats::default(),
            start_offset: options.header_offset,
        })
    }

    /// Bytes produced so far
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Current cursor position in the compressed stream
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Number of back-reference entries captured so far
    pub fn backref_count(&self) -> usize {
        self.backrefs.len()
    }

    /// Whether the declared size has been reached
    pub fn is_full(&self) -> bool {
        self.output.len() >= self.unpacked_size
    }

    /// Append a 16-bit word, high byte first
    pub(crate) fn put_word(&mut self, word: u16) {
        self.output.extend_from_slice(&word.to_be_bytes());
    }

    /// Finish the run: trim to the declared size and hand out the results
    pub fn finish(mut self) -> (Vec<u8>, DecompressionStats) {
        self.output.truncate(self.unpacked_size);
        self.stats.input_bytes = self.cursor.position() - self.start_offset;
        self.stats.output_bytes = self.output.len();
        (self.output, self.stats)
    }
}

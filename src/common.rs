//! Common types and constants for the DonnBits decompressor
//!
//! This module defines the error type, the header record, run options and
//! statistics shared by the decompression engine, the CLI and the async layer.

use thiserror::Error;

/// Size of the DonnBits header in bytes
pub const HEADER_SIZE: usize = 6;

/// The only supported algorithm identifier ("algorithm 0")
pub const ALGORITHM_ID: u16 = 0;

/// The only supported constant table identifier ("table 0")
pub const TABLE_ID: u16 = 0;

/// Back-reference index base for token 0x20
pub const BACKREF_BASE_SHORT: usize = 40;

/// Back-reference index base for token 0x21
pub const BACKREF_BASE_LONG: usize = 256 + 40;

/// `move.w #imm,-(sp)` opcode that opens every jump-table stub
pub const STUB_PUSH_WORD: u16 = 0x3F3C;

/// `_LoadSeg` trap word that follows the segment number in a stub
pub const STUB_LOAD_SEG: u16 = 0xA9F0;

/// Running offset a jump table starts from
pub const JUMP_TABLE_START_OFFSET: i64 = 6;

/// Error type for DonnBits decompression
#[derive(Debug, Error)]
pub enum DcmpError {
    /// Algorithm or constant table identifier other than zero
    #[error("Unsupported format: algorithm {algorithm_id}, constant table {table_id:#X}")]
    UnsupportedFormat {
        /// Algorithm identifier found in the header
        algorithm_id: u16,
        /// Constant table identifier found in the header
        table_id: u16,
    },

    /// Token byte with no decoding action (0x22)
    #[error("Unsupported token {token:#04X} at offset {offset}")]
    UnsupportedToken {
        /// Offending token byte
        token: u8,
        /// Stream offset of the token byte
        offset: usize,
    },

    /// Unknown sub-opcode following the 0xFE extension token
    #[error("Unsupported extension opcode {opcode} at offset {offset}")]
    UnsupportedExtension {
        /// Offending sub-opcode
        opcode: u8,
        /// Stream offset of the sub-opcode byte
        offset: usize,
    },

    /// Run-length expansion with a repetition count of zero or less
    #[error("Invalid RLE repetition count {count} at offset {offset}")]
    InvalidRunLength {
        /// Decoded repetition count
        count: i64,
        /// Stream offset after the count field
        offset: usize,
    },

    /// Length or count field decoded to a negative value
    ///
    /// Older decoders tolerated these: a negative copy or delta count emitted
    /// nothing and a negative jump-table count produced only the final stub.
    #[error("Invalid count {count} at offset {offset}")]
    InvalidCount {
        /// Decoded count
        count: i64,
        /// Stream offset after the count field
        offset: usize,
    },

    /// Back-reference index outside the current table
    #[error("Invalid back-reference index {index} (table holds {len} entries)")]
    InvalidBackReference {
        /// Requested index
        index: usize,
        /// Number of entries in the table at lookup time
        len: usize,
    },

    /// Read past the end of the compressed buffer
    #[error("Out of bounds: need {needed} bytes at offset {offset}, buffer holds {available}")]
    OutOfBounds {
        /// Offset the read started at
        offset: usize,
        /// Number of bytes the read required
        needed: usize,
        /// Total size of the compressed buffer
        available: usize,
    },

    /// Terminator reached before the declared size in strict mode
    #[error("Size mismatch: expected {expected} bytes, produced {actual}")]
    SizeMismatch {
        /// Declared uncompressed size
        expected: usize,
        /// Bytes actually produced
        actual: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for DonnBits operations
pub type Result<T> = std::result::Result<T, DcmpError>;

/// The fixed 6-byte header at the start of a compressed stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DcmpHeader {
    /// Variable table ratio (informational only)
    pub ratio: u8,
    /// Overrun (informational only)
    pub overrun: u8,
    /// Algorithm identifier, big-endian
    pub algorithm_id: u16,
    /// Constant table identifier, big-endian
    pub table_id: u16,
}

impl DcmpHeader {
    /// Whether this decoder can handle the declared algorithm and table
    pub fn is_supported(&self) -> bool {
        self.algorithm_id == ALGORITHM_ID && self.table_id == TABLE_ID
    }

    /// Fail with `UnsupportedFormat` unless both identifiers are zero
    pub fn validate(&self) -> Result<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(DcmpError::UnsupportedFormat {
                algorithm_id: self.algorithm_id,
                table_id: self.table_id,
            })
        }
    }
}

/// Parameters for one decompression run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DcmpOptions {
    /// Offset of the header within the supplied buffer
    pub header_offset: usize,
    /// Declared uncompressed size in bytes
    pub unpacked_size: usize,
    /// Reject output shorter than `unpacked_size`
    pub strict_size: bool,
}

impl DcmpOptions {
    /// Options for a stream whose header sits at offset 0
    pub fn new(unpacked_size: usize) -> Self {
        Self {
            header_offset: 0,
            unpacked_size,
            strict_size: false,
        }
    }

    /// Set the header offset
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.header_offset = offset;
        self
    }

    /// Require the output to reach the declared size
    pub fn with_strict_size(mut self, strict: bool) -> Self {
        self.strict_size = strict;
        self
    }
}

/// Statistics collected over one decompression run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecompressionStats {
    /// Number of tokens dispatched
    pub tokens: usize,
    /// Bytes copied verbatim from the stream (including captured runs)
    pub literal_bytes: usize,
    /// Back-reference entries captured
    pub backref_entries: usize,
    /// Back-reference entries replayed
    pub backref_hits: usize,
    /// Constant words emitted
    pub const_words: usize,
    /// Jump-table entries synthesized
    pub jump_table_entries: usize,
    /// Run-length expansions decoded
    pub rle_runs: usize,
    /// Delta-coded expansions decoded
    pub delta_runs: usize,
    /// Compressed bytes consumed, header included
    pub input_bytes: usize,
    /// Bytes produced
    pub output_bytes: usize,
    /// Whether the run ended on the 0xFF terminator
    pub terminated: bool,
}

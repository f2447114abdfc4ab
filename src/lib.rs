//! DonnBits - Rust decoder for compressed 68k code resources
//!
//! This crate expands the DonnBits format (the 'dcmp' 0 decompressor of the
//! classic Mac OS resource manager), which shrinks 68k machine code by mixing
//! literal runs, a dynamic table of previously seen runs, a fixed table of
//! frequent instruction words, and a few extended opcodes for run-length,
//! delta and segment jump-table data.
//!
//! # Features
//!
//! - Algorithm 0 with constant table 0
//! - Bounds-checked decoding: malformed streams yield errors, never panics
//! - In-memory API and a `Read` adapter
//! - Per-run statistics
//! - Optional async batch processing (`async` feature)
//!
//! Compression is not provided.
//!
//! # Example
//!
//! ```no_run
//! use donnbits::{decompress_bytes, DcmpReader};
//! use std::io::Read;
//!
//! // The declared uncompressed size comes from the enclosing resource
//! let compressed = std::fs::read("CODE_1.dcmp")?;
//! let code = decompress_bytes(&compressed, 4096)?;
//!
//! // Or use the Read adapter
//! let mut reader = DcmpReader::new(std::io::Cursor::new(compressed), 4096);
//! let mut output = Vec::new();
//! reader.read_to_end(&mut output)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod common;
pub mod dcmp;
pub mod error;
pub mod tables;

// Async modules (only available with async feature)
#[cfg(feature = "async")]
pub mod async_batch;
#[cfg(feature = "async")]
pub mod async_convenience;

// Re-export commonly used types
pub use common::{
    DcmpError, DcmpHeader, DcmpOptions, DecompressionStats, Result, ALGORITHM_ID, HEADER_SIZE,
    TABLE_ID,
};
pub use dcmp::{decode_var_int, decompress, decompress_with_stats, read_header, DcmpReader};
pub use tables::{const_word, CONST_WORDS};

// Re-export async types when async feature is enabled
#[cfg(feature = "async")]
pub use async_batch::AsyncBatchProcessor;
#[cfg(feature = "async")]
pub use async_convenience::*;

// Convenience functions

/// Decompress a DonnBits stream whose header is at offset 0
///
/// # Arguments
/// * `data` - The compressed stream
/// * `unpacked_size` - Declared uncompressed size in bytes
///
/// # Returns
/// A vector containing the reconstructed code
pub fn decompress_bytes(data: &[u8], unpacked_size: usize) -> Result<Vec<u8>> {
    dcmp::decompress(data, 0, unpacked_size)
}

/// Decompress a DonnBits stream with explicit run options
pub fn decompress_with(data: &[u8], options: &DcmpOptions) -> Result<Vec<u8>> {
    dcmp::decompress_with_stats(data, options).map(|(output, _)| output)
}

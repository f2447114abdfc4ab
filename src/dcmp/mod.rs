//! DonnBits ('dcmp' 0) decompression engine
//!
//! This module expands a DonnBits stream back into the original 68k code. A
//! run reads the 6-byte header, then dispatches one token at a time until the
//! 0xFF terminator is seen or the declared uncompressed size is reached.

mod backref;
mod cursor;
mod decoder;
mod reader;
mod state;
mod token;

pub use backref::BackRefTable;
pub use cursor::{decode_var_int, sign_extend, ByteCursor};
pub use reader::DcmpReader;
pub use state::{read_header, DcmpState};
pub use token::{ExtOpcode, Token};

use crate::common::{DcmpOptions, DecompressionStats};
use crate::{DcmpError, Result};
use log::{debug, warn};

/// Decompress a stream whose header starts at `offset`
pub fn decompress(data: &[u8], offset: usize, unpacked_size: usize) -> Result<Vec<u8>> {
    let options = DcmpOptions::new(unpacked_size).with_offset(offset);
    decompress_with_stats(data, &options).map(|(output, _)| output)
}

/// Decompress a stream and report what the run did
pub fn decompress_with_stats(
    data: &[u8],
    options: &DcmpOptions,
) -> Result<(Vec<u8>, DecompressionStats)> {
    let mut state = DcmpState::new(data, options)?;
    debug!(
        "dcmp header at {}: ratio {}, overrun {}, unpacked size {}",
        options.header_offset, state.header.ratio, state.header.overrun, options.unpacked_size
    );

    state.run()?;
    let (output, stats) = state.finish();

    if output.len() < options.unpacked_size {
        if options.strict_size {
            return Err(DcmpError::SizeMismatch {
                expected: options.unpacked_size,
                actual: output.len(),
            });
        }
        warn!(
            "terminator reached after {} of {} declared bytes",
            output.len(),
            options.unpacked_size
        );
    }

    Ok((output, stats))
}

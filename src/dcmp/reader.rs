//! DcmpReader - `Read` adapter over the decompression engine
//!
//! The format needs random access to the whole compressed buffer and the
//! declared size up front, so the reader drains its source on the first call
//! to `read`, decodes it in one pass and then serves the reconstructed bytes.

use super::decompress_with_stats;
use crate::common::{DcmpOptions, DecompressionStats};
use crate::Result;
use std::io::{self, Read};

/// Streaming front-end implementing `Read` over a decoded stream
#[derive(Debug)]
pub struct DcmpReader<R: Read> {
    reader: R,
    options: DcmpOptions,
    decoded: bool,
    output_buffer: Vec<u8>,
    output_pos: usize,
    stats: Option<DecompressionStats>,
    failure: Option<String>,
}

impl<R: Read> DcmpReader<R> {
    /// Create a reader for a stream of `unpacked_size` decompressed bytes
    pub fn new(reader: R, unpacked_size: usize) -> Self {
        Self::with_options(reader, DcmpOptions::new(unpacked_size))
    }

    /// Create a reader with explicit run options
    pub fn with_options(reader: R, options: DcmpOptions) -> Self {
        Self {
            reader,
            options,
            decoded: false,
            output_buffer: Vec::new(),
            output_pos: 0,
            stats: None,
            failure: None,
        }
    }

    /// Statistics of the run, available once the first read has happened
    pub fn stats(&self) -> Option<&DecompressionStats> {
        self.stats.as_ref()
    }

    fn decode(&mut self) -> Result<()> {
        let mut compressed = Vec::new();
        self.reader.read_to_end(&mut compressed)?;

        let (output, stats) = decompress_with_stats(&compressed, &self.options)?;
        self.output_buffer = output;
        self.stats = Some(stats);
        self.decoded = true;
        Ok(())
    }
}

impl<R: Read> Read for DcmpReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // the source is drained by the first attempt, so a failure sticks
        if let Some(ref failure) = self.failure {
            return Err(io::Error::new(io::ErrorKind::InvalidData, failure.clone()));
        }

        if !self.decoded {
            if let Err(e) = self.decode() {
                self.failure = Some(e.to_string());
                return Err(io::Error::new(io::ErrorKind::InvalidData, e));
            }
        }

        let available = self.output_buffer.len() - self.output_pos;
        let to_copy = buf.len().min(available);
        buf[..to_copy]
            .copy_from_slice(&self.output_buffer[self.output_pos..self.output_pos + to_copy]);
        self.output_pos += to_copy;
        Ok(to_copy)
    }
}

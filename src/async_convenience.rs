//! Async convenience functions
//!
//! This module provides easy-to-use async functions for decompressing
//! DonnBits streams from async readers and files. Decoding itself is CPU-bound
//! and runs on tokio's blocking pool.

#[cfg(feature = "async")]
/// Async decompression helpers
pub mod functions {
    use crate::common::{DcmpOptions, DecompressionStats};
    use crate::{dcmp, DcmpError, Result};
    use std::path::Path;
    use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufWriter};

    /// Decode `data` on the blocking pool
    pub(crate) async fn decode_blocking(
        data: Vec<u8>,
        options: DcmpOptions,
    ) -> Result<(Vec<u8>, DecompressionStats)> {
        tokio::task::spawn_blocking(move || dcmp::decompress_with_stats(&data, &options))
            .await
            .map_err(|e| DcmpError::Io(std::io::Error::other(e)))?
    }

    /// Decompress data from an async reader
    pub async fn decompress_async<R: AsyncRead + Unpin>(
        mut reader: R,
        options: DcmpOptions,
    ) -> Result<Vec<u8>> {
        let mut compressed = Vec::new();
        reader.read_to_end(&mut compressed).await?;

        let (output, _) = decode_blocking(compressed, options).await?;
        Ok(output)
    }

    /// Decompress data from bytes
    pub async fn decompress_bytes_async(data: &[u8], unpacked_size: usize) -> Result<Vec<u8>> {
        decode_blocking(data.to_vec(), DcmpOptions::new(unpacked_size))
            .await
            .map(|(output, _)| output)
    }

    /// Decompress a file asynchronously
    pub async fn decompress_file<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_path: P1,
        output_path: P2,
        options: DcmpOptions,
    ) -> Result<DecompressionStats> {
        let compressed = tokio::fs::read(input_path).await?;
        let (output, stats) = decode_blocking(compressed, options).await?;

        let file = tokio::fs::File::create(output_path).await?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&output).await?;
        writer.flush().await?;

        log::debug!(
            "async decompress: {} -> {} bytes",
            stats.input_bytes,
            stats.output_bytes
        );
        Ok(stats)
    }

}

#[cfg(feature = "async")]
pub use functions::*;

//! Async batch processing module
//!
//! This module decodes many compressed resources concurrently. Each job runs
//! with its own back-reference table; only the constant word table is shared.

#[cfg(feature = "async")]
/// Concurrent file processing with a configurable concurrency limit
pub mod processor {
    use crate::async_convenience::functions::decode_blocking;
    use crate::common::{DcmpOptions, DecompressionStats};
    use crate::Result;
    use futures::stream::{self, StreamExt, TryStreamExt};
    use std::path::{Path, PathBuf};

    /// Concurrent decompressor for batches of files
    #[derive(Debug, Clone)]
    pub struct AsyncBatchProcessor {
        concurrency_limit: usize,
    }

    impl AsyncBatchProcessor {
        /// Create a new batch processor with default settings
        pub fn new() -> Self {
            Self {
                concurrency_limit: num_cpus::get(),
            }
        }

        /// Set the concurrency limit
        pub fn with_concurrency(mut self, limit: usize) -> Self {
            self.concurrency_limit = limit.max(1);
            self
        }

        /// Current concurrency limit
        pub fn concurrency(&self) -> usize {
            self.concurrency_limit
        }

        /// Decompress every `(path, options)` job, failing on the first error
        ///
        /// Results come back in completion order.
        pub async fn decompress_files<P: AsRef<Path> + Send + Sync>(
            &self,
            jobs: Vec<(P, DcmpOptions)>,
        ) -> Result<Vec<(PathBuf, Vec<u8>)>> {
            stream::iter(jobs.into_iter().map(|(path, options)| async move {
                Self::decompress_single_file(path, options)
                    .await
                    .map(|(path, output, _)| (path, output))
            }))
            .buffer_unordered(self.concurrency_limit)
            .try_collect()
            .await
        }

        /// Stream per-file results as they complete, errors included
        pub fn decompress_files_streaming<P: AsRef<Path> + Send + Sync + 'static>(
            &self,
            jobs: Vec<(P, DcmpOptions)>,
        ) -> impl futures::Stream<Item = (PathBuf, Result<DecompressionStats>)> + '_ {
            stream::iter(jobs.into_iter().map(|(path, options)| async move {
                let path_buf = path.as_ref().to_path_buf();
                let result = Self::decompress_single_file(path, options)
                    .await
                    .map(|(_, _, stats)| stats);
                (path_buf, result)
            }))
            .buffer_unordered(self.concurrency_limit)
        }

        /// Decompress a single file
        async fn decompress_single_file<P: AsRef<Path>>(
            path: P,
            options: DcmpOptions,
        ) -> Result<(PathBuf, Vec<u8>, DecompressionStats)> {
            let path = path.as_ref();
            let compressed = tokio::fs::read(path).await?;
            let (output, stats) = decode_blocking(compressed, options).await?;
            log::debug!("{}: {} bytes decoded", path.display(), output.len());
            Ok((path.to_path_buf(), output, stats))
        }
    }

    impl Default for AsyncBatchProcessor {
        fn default() -> Self {
            Self::new()
        }
    }

}

#[cfg(feature = "async")]
pub use processor::AsyncBatchProcessor;

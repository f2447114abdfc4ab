//! Dynamic back-reference table
//!
//! Runs captured by tokens 0x10-0x1F are appended here and replayed later by
//! absolute index. Index 0 is always the first run captured in the current
//! decompression run.

use crate::{DcmpError, Result};

/// Append-only arena of captured byte runs
#[derive(Debug, Default, Clone)]
pub struct BackRefTable {
    entries: Vec<Vec<u8>>,
}

impl BackRefTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a copy of `run` and return its index
    pub fn push(&mut self, run: &[u8]) -> usize {
        self.entries.push(run.to_vec());
        self.entries.len() - 1
    }

    /// Look up the run stored at `index`
    pub fn get(&self, index: usize) -> Result<&[u8]> {
        self.entries
            .get(index)
            .map(Vec::as_slice)
            .ok_or(DcmpError::InvalidBackReference {
                index,
                len: self.entries.len(),
            })
    }

    /// Number of captured runs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no run has been captured yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

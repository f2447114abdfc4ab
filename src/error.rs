//! Error handling for DonnBits operations
//!
//! This module defines the error types used throughout the decompressor.
//! It uses thiserror for ergonomic error handling and provides context-specific
//! error variants.

pub use crate::common::DcmpError;
pub use crate::common::Result;

//! Bounds-checked decode cursor
//!
//! Every read the engine performs on the compressed stream goes through
//! [`ByteCursor`], so a truncated or malformed stream turns into
//! `DcmpError::OutOfBounds` instead of a panic.

use crate::{DcmpError, Result};

/// Read position into an immutable compressed buffer
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at `pos`
    pub fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Current read position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total size of the underlying buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the cursor and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn out_of_bounds(&self, needed: usize) -> DcmpError {
        DcmpError::OutOfBounds {
            offset: self.pos,
            needed,
            available: self.data.len(),
        }
    }

    /// Take the next `n` bytes as a slice and advance past them
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(self.out_of_bounds(n));
        }
        let run = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(run)
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read a big-endian 16-bit word
    pub fn read_u16_be(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Read a big-endian 32-bit long
    pub fn read_u32_be(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Decode one variable-length integer and advance past it
    pub fn read_var_int(&mut self) -> Result<i64> {
        let (value, size) = decode_var_int(self.data, self.pos)?;
        self.pos += size;
        Ok(value)
    }

    /// Decode a variable-length integer that must not be negative
    pub fn read_count(&mut self) -> Result<usize> {
        let value = self.read_var_int()?;
        to_count(value, self.pos)
    }
}

/// Convert a decoded value into a count, rejecting negative values
pub fn to_count(value: i64, offset: usize) -> Result<usize> {
    usize::try_from(value).map_err(|_| DcmpError::InvalidCount {
        count: value,
        offset,
    })
}

/// Interpret the low `bits` bits of `value` as a two's-complement integer
pub fn sign_extend(value: i64, bits: u32) -> i64 {
    let sign_bit = 1i64 << (bits - 1);
    (value & (sign_bit - 1)) - (value & sign_bit)
}

/// Decode one variable-length integer at `pos`
///
/// Returns the value together with the number of bytes it occupied:
///
/// - `0x00..=0x7F`: the byte itself, 1 byte
/// - `0xFF`: the following big-endian 32-bit long, 5 bytes
/// - `0x80..=0xFE`: a biased signed 16-bit quantity completed by the next
///   byte, 2 bytes
pub fn decode_var_int(data: &[u8], pos: usize) -> Result<(i64, usize)> {
    let mut cursor = ByteCursor::new(data, pos);
    let lead = cursor.read_u8()?;

    match lead {
        0x00..=0x7F => Ok((lead as i64, 1)),
        0xFF => Ok((cursor.read_u32_be()? as i64, 5)),
        _ => {
            let high = sign_extend(lead as i64 * 512 - 0x8000, 16) >> 1;
            let low = cursor.read_u8()? as i64;
            Ok((sign_extend(high + low, 16), 2))
        }
    }
}

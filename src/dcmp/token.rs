//! Token classification
//!
//! Maps a control byte onto the decoding action it selects. The match in
//! [`Token::classify`] is exhaustive over `u8`, so every byte value lands in
//! exactly one category.

use crate::common::{BACKREF_BASE_LONG, BACKREF_BASE_SHORT};

/// Decoding action selected by one token byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// 0x00: raw word count follows as a variable-length integer
    RawVar,
    /// 0x01-0x0F: copy `words * 2` raw bytes
    Raw {
        /// Number of 16-bit words to copy
        words: usize,
    },
    /// 0x10: capture a run whose word count follows as a variable-length integer
    CaptureVar,
    /// 0x11-0x1F: capture a run of `words * 2` bytes
    Capture {
        /// Number of 16-bit words to capture
        words: usize,
    },
    /// 0x20/0x21: replay the entry at `base + next byte`
    ReplayIndexed {
        /// Index base added to the following byte
        base: usize,
    },
    /// 0x23-0x4A: replay entry `index`
    Replay {
        /// Absolute table index
        index: usize,
    },
    /// 0x4B-0xFD: emit a word from the constant table
    ConstWord {
        /// Index into the constant word table
        index: usize,
    },
    /// 0xFE: extended opcode follows
    Extended,
    /// 0xFF: stop decoding
    End,
    /// 0x22: no action assigned
    Unsupported(u8),
}

impl Token {
    /// Classify a token byte
    pub fn classify(byte: u8) -> Self {
        match byte {
            0x00 => Token::RawVar,
            0x01..=0x0F => Token::Raw {
                words: byte as usize,
            },
            0x10 => Token::CaptureVar,
            0x11..=0x1F => Token::Capture {
                words: (byte - 0x10) as usize,
            },
            0x20 => Token::ReplayIndexed {
                base: BACKREF_BASE_SHORT,
            },
            0x21 => Token::ReplayIndexed {
                base: BACKREF_BASE_LONG,
            },
            0x22 => Token::Unsupported(byte),
            0x23..=0x4A => Token::Replay {
                index: (byte - 0x23) as usize,
            },
            0x4B..=0xFD => Token::ConstWord {
                index: (byte - 0x4B) as usize,
            },
            0xFE => Token::Extended,
            0xFF => Token::End,
        }
    }
}

/// Sub-opcode following an 0xFE token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtOpcode {
    /// 0: segment loader jump-table synthesis
    JumpTable,
    /// 3: run-length expansion of one word
    RunLength,
    /// 4: delta-coded word sequence
    Delta,
    /// Anything else
    Unsupported(u8),
}

impl ExtOpcode {
    /// Classify an extended sub-opcode byte
    pub fn classify(byte: u8) -> Self {
        match byte {
            0 => ExtOpcode::JumpTable,
            3 => ExtOpcode::RunLength,
            4 => ExtOpcode::Delta,
            other => ExtOpcode::Unsupported(other),
        }
    }
}

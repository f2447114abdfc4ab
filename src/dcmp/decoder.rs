//! Token dispatch and extended opcode decoding
//!
//! This module implements the main decode loop of the DonnBits engine on top
//! of [`DcmpState`]: one token is read per iteration and mapped onto raw
//! copies, back-reference capture and replay, constant words, or one of the
//! extended opcodes behind 0xFE.

use super::cursor::{sign_extend, to_count};
use super::state::DcmpState;
use super::token::{ExtOpcode, Token};
use crate::common::{JUMP_TABLE_START_OFFSET, STUB_LOAD_SEG, STUB_PUSH_WORD};
use crate::tables::CONST_WORDS;
use crate::{DcmpError, Result};
use log::{debug, trace};

/// Outcome of one dispatched token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Terminate,
}

impl DcmpState<'_> {
    /// Decode tokens until the declared size is reached or 0xFF is seen
    pub fn run(&mut self) -> Result<()> {
        while !self.is_full() {
            if self.step()? == Step::Terminate {
                self.stats.terminated = true;
                break;
            }
        }

        debug!(
            "decoded {} tokens: cursor at {}, {} bytes out, {} back-references captured",
            self.stats.tokens,
            self.position(),
            self.output.len(),
            self.backrefs.len()
        );
        Ok(())
    }

    fn step(&mut self) -> Result<Step> {
        let offset = self.cursor.position();
        let byte = self.cursor.read_u8()?;
        let token = Token::classify(byte);
        self.stats.tokens += 1;
        trace!("{:#06X}: token {:#04X} {:?}", offset, byte, token);

        match token {
            Token::RawVar => {
                let words = self.cursor.read_count()?;
                self.copy_words(words, false)?;
            }
            Token::Raw { words } => self.copy_words(words, false)?,
            Token::CaptureVar => {
                let words = self.cursor.read_count()?;
                self.copy_words(words, true)?;
            }
            Token::Capture { words } => self.copy_words(words, true)?,
            Token::ReplayIndexed { base } => {
                let index = base + self.cursor.read_u8()? as usize;
                self.replay(index)?;
            }
            Token::Replay { index } => self.replay(index)?,
            Token::ConstWord { index } => {
                self.put_word(CONST_WORDS[index]);
                self.stats.const_words += 1;
            }
            Token::Extended => self.extended()?,
            Token::End => return Ok(Step::Terminate),
            Token::Unsupported(token) => {
                return Err(DcmpError::UnsupportedToken { token, offset });
            }
        }

        Ok(Step::Continue)
    }

    /// Copy `words` 16-bit words verbatim, optionally capturing them as a new
    /// back-reference entry
    fn copy_words(&mut self, words: usize, capture: bool) -> Result<()> {
        let len = words.checked_mul(2).ok_or(DcmpError::OutOfBounds {
            offset: self.cursor.position(),
            needed: usize::MAX,
            available: self.cursor.len(),
        })?;
        let run = self.cursor.take(len)?;

        if capture {
            let index = self.backrefs.push(run);
            self.stats.backref_entries += 1;
            trace!("captured back-reference {} ({} bytes)", index, len);
        }

        self.output.extend_from_slice(run);
        self.stats.literal_bytes += len;
        Ok(())
    }

    fn replay(&mut self, index: usize) -> Result<()> {
        let run = self.backrefs.get(index)?;
        self.output.extend_from_slice(run);
        self.stats.backref_hits += 1;
        Ok(())
    }

    fn extended(&mut self) -> Result<()> {
        let offset = self.cursor.position();
        let opcode = self.cursor.read_u8()?;

        match ExtOpcode::classify(opcode) {
            ExtOpcode::JumpTable => self.jump_table(),
            ExtOpcode::RunLength => self.run_length(),
            ExtOpcode::Delta => self.delta(),
            ExtOpcode::Unsupported(opcode) => {
                Err(DcmpError::UnsupportedExtension { opcode, offset })
            }
        }
    }

    fn put_stub(&mut self, segment: u16) {
        self.put_word(STUB_PUSH_WORD);
        self.put_word(segment);
        self.put_word(STUB_LOAD_SEG);
    }

    /// Rebuild the `_LoadSeg` trampolines of a segment's jump table
    fn jump_table(&mut self) -> Result<()> {
        let segment = self.cursor.read_var_int()? as u16;
        let entries = self.cursor.read_count()?;
        let mut offset = JUMP_TABLE_START_OFFSET;

        for _ in 0..entries {
            self.put_stub(segment);
            let delta = self.cursor.read_var_int()?;
            offset = sign_extend(offset + delta - 6, 16);
            self.put_word(offset as u16);
        }
        self.put_stub(segment);

        self.stats.jump_table_entries += entries;
        trace!("jump table: segment {}, {} entries", segment, entries);
        Ok(())
    }

    /// Repeat one word `count + 1` times
    fn run_length(&mut self) -> Result<()> {
        let value = self.cursor.read_var_int()?;
        let count = self.cursor.read_var_int()?;
        if count <= 0 {
            return Err(DcmpError::InvalidRunLength {
                count,
                offset: self.cursor.position(),
            });
        }

        // words past the declared size would be truncated anyway
        let needed = (self.unpacked_size - self.output.len()).div_ceil(2);
        let repeats = (count as u64 + 1).min(needed as u64) as usize;
        let word = (value as u16).to_be_bytes();
        for _ in 0..repeats {
            self.output.extend_from_slice(&word);
        }

        self.stats.rle_runs += 1;
        Ok(())
    }

    /// Emit a start word followed by `count` words built from signed byte deltas
    fn delta(&mut self) -> Result<()> {
        let mut value = self.cursor.read_var_int()?;
        let count = self.cursor.read_var_int()?;
        let count = to_count(count, self.cursor.position())?;
        let deltas = self.cursor.take(count)?;

        self.put_word(value as u16);
        for &delta in deltas {
            value += delta as i8 as i64;
            self.put_word(value as u16);
        }

        self.stats.delta_runs += 1;
        Ok(())
    }
}

//! Constant word table for the DonnBits format
//!
//! Token values 0x4B through 0xFD select one of these frequent 68k instruction
//! and operand words. The table is part of the format (constant table 0) and
//! must match the encoder exactly.

/// First token value that selects a constant word
pub const CONST_WORD_TOKEN_BASE: u8 = 0x4B;

/// Number of entries in the constant word table
pub const CONST_WORDS_LEN: usize = 179;

/// Constant word table 0
pub static CONST_WORDS: [u16; CONST_WORDS_LEN] = [
    0x0000, 0x4EBA, 0x0008, 0x4E75, 0x000C, 0x4EAD, 0x2053, 0x2F0B,
    0x6100, 0x0010, 0x7000, 0x2F00, 0x486E, 0x2050, 0x206E, 0x2F2E,
    0xFFFC, 0x48E7, 0x3F3C, 0x0004, 0xFFF8, 0x2F0C, 0x2006, 0x4EED,
    0x4E56, 0x2068, 0x4E5E, 0x0001, 0x588F, 0x4FEF, 0x0002, 0x0018,
    0x6000, 0xFFFF, 0x508F, 0x4E90, 0x0006, 0x266E, 0x0014, 0xFFF4,
    0x4CEE, 0x000A, 0x000E, 0x41EE, 0x4CDF, 0x48C0, 0xFFF0, 0x2D40,
    0x0012, 0x302E, 0x7001, 0x2F28, 0x2054, 0x6700, 0x0020, 0x001C,
    0x205F, 0x1800, 0x266F, 0x4878, 0x0016, 0x41FA, 0x303C, 0x2840,
    0x7200, 0x286E, 0x200C, 0x6600, 0x206B, 0x2F07, 0x558F, 0x0028,
    0xFFFE, 0xFFEC, 0x22D8, 0x200B, 0x000F, 0x598F, 0x2F3C, 0xFF00,
    0x0118, 0x81E1, 0x4A00, 0x4EB0, 0xFFE8, 0x48C7, 0x0003, 0x0022,
    0x0007, 0x001A, 0x6706, 0x6708, 0x4EF9, 0x0024, 0x2078, 0x0800,
    0x6604, 0x002A, 0x4ED0, 0x3028, 0x265F, 0x6704, 0x0030, 0x43EE,
    0x3F00, 0x201F, 0x001E, 0xFFF6, 0x202E, 0x42A7, 0x2007, 0xFFFA,
    0x6002, 0x3D40, 0x0C40, 0x6606, 0x0026, 0x2D48, 0x2F01, 0x70FF,
    0x6004, 0x1880, 0x4A40, 0x0040, 0x002C, 0x2F08, 0x0011, 0xFFE4,
    0x2140, 0x2640, 0xFFF2, 0x426E, 0x4EB9, 0x3D7C, 0x0038, 0x000D,
    0x6006, 0x422E, 0x203C, 0x670C, 0x2D68, 0x6608, 0x4A2E, 0x4AAE,
    0x002E, 0x4840, 0x225F, 0x2200, 0x670A, 0x3007, 0x4267, 0x0032,
    0x2028, 0x0009, 0x487A, 0x0200, 0x2F2B, 0x0005, 0x226E, 0x6602,
    0xE580, 0x670E, 0x660A, 0x0050, 0x3E00, 0x660C, 0x2E00, 0xFFEE,
    0x206D, 0x2040, 0xFFE0, 0x5340, 0x6008, 0x0480, 0x0068, 0x0B7C,
    0x4400, 0x41E8, 0x4841,
];

/// Look up the constant word selected by `token`
///
/// Returns `None` for tokens outside 0x4B..=0xFD.
pub fn const_word(token: u8) -> Option<u16> {
    let index = token.checked_sub(CONST_WORD_TOKEN_BASE)? as usize;
    CONST_WORDS.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_bounds() {
        assert_eq!(const_word(0x4B), Some(0x0000));
        assert_eq!(const_word(0x4C), Some(0x4EBA));
        assert_eq!(const_word(0x4E), Some(0x4E75));
        assert_eq!(const_word(0xFD), Some(0x4841));
        assert_eq!(const_word(0x4A), None);
        assert_eq!(const_word(0xFE), None);
    }

    #[test]
    fn test_table_covers_token_range() {
        let covered = (0x4B..=0xFDu8).filter(|t| const_word(*t).is_some()).count();
        assert_eq!(covered, CONST_WORDS_LEN);
    }

    #[test]
    fn test_known_entries() {
        // move.w #imm,-(sp) opens every jump-table stub
        assert_eq!(CONST_WORDS[18], 0x3F3C);
        assert_eq!(CONST_WORDS[24], 0x4E56);
        assert_eq!(CONST_WORDS[CONST_WORDS_LEN - 1], 0x4841);
    }
}

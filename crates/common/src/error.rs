//! Decode errors for Synacor words and program images.

use thiserror::Error;

/// Errors that occur while decoding raw words or image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Word does not name one of the 22 opcodes.
    #[error("invalid opcode: {0}")]
    InvalidOpcode(u16),

    /// Raw operand above the last register reference (32775).
    #[error("invalid operand: {0}")]
    InvalidOperand(u16),

    /// Image does not fit in the 32768-word address space.
    #[error("image too large: {len} bytes (at most 65536)")]
    ImageTooLarge { len: usize },

    /// Byte stream ends in the middle of a word.
    #[error("invalid image length: {0} (must be a multiple of 2)")]
    OddLength(usize),
}

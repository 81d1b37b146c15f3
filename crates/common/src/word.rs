//! The 15-bit machine word and raw operand decoding.
//!
//! Every cell in memory holds a 16-bit value. Values `0..=32767` are
//! literals, `32768..=32775` name one of the eight registers, and anything
//! above is invalid.

use crate::error::DecodeError;

/// Arithmetic modulus; every stored arithmetic result is reduced by it.
pub const MODULUS: u32 = 1 << 15;

/// Largest literal value.
pub const MAX_LITERAL: u16 = 0x7FFF;

/// Number of general purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// First raw value that refers to a register.
pub const REGISTER_BASE: u16 = 0x8000;

/// Last raw value that refers to a register.
pub const LAST_REGISTER: u16 = REGISTER_BASE + REGISTER_COUNT as u16 - 1;

/// Number of addressable memory words.
pub const MEMORY_SIZE: usize = 1 << 15;

/// Reduce an intermediate arithmetic result to a 15-bit word.
pub fn wrap(value: u32) -> u16 {
    (value % MODULUS) as u16
}

/// A decoded operand: either a literal value or a register slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// Used as-is.
    Literal(u16),
    /// Register index `0..8`.
    Register(u8),
}

impl Operand {
    /// Classify a raw word taken from an operand position.
    pub fn decode(raw: u16) -> Result<Self, DecodeError> {
        match raw {
            0..=MAX_LITERAL => Ok(Operand::Literal(raw)),
            REGISTER_BASE..=LAST_REGISTER => Ok(Operand::Register((raw - REGISTER_BASE) as u8)),
            _ => Err(DecodeError::InvalidOperand(raw)),
        }
    }
}

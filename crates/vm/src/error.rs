//! Runtime and load errors for the Synacor VM.
//!
//! Every runtime error carries the address of the faulting instruction's
//! opcode (`at`) for diagnostics. None of them are recoverable: the machine
//! stops at the first one.

use std::io::ErrorKind;
use synacor_common::DecodeError;
use thiserror::Error;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Word at the program counter is not one of the 22 opcodes.
    #[error("invalid opcode {opcode} at address {at}")]
    InvalidOpcode { at: usize, opcode: u16 },

    /// Operand in a value position is above 32775.
    #[error("invalid operand {raw} at address {at}")]
    InvalidOperand { at: usize, raw: u16 },

    /// Operand in a destination position does not name a register.
    #[error("invalid destination register {raw} at address {at}")]
    InvalidDestination { at: usize, raw: u16 },

    /// `mod` with a zero divisor.
    #[error("division by zero at address {at}")]
    DivideByZero { at: usize },

    /// `pop` on an empty stack.
    #[error("stack underflow at address {at}")]
    StackUnderflow { at: usize },

    /// `push` or `call` with the stack at capacity.
    #[error("stack overflow (capacity {capacity}) at address {at}")]
    StackOverflow { at: usize, capacity: usize },

    /// Program counter or computed address outside memory.
    #[error("memory address {address} out of range at address {at}")]
    MemoryOutOfRange { at: usize, address: usize },

    /// Console read or write failed.
    #[error("console i/o failed at address {at}: {kind}")]
    Io { at: usize, kind: ErrorKind },
}

/// Errors that occur while loading a program image from disk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// File could not be opened or read.
    #[error("cannot read '{path}': {kind}")]
    Io { path: String, kind: ErrorKind },

    /// File contents are not a valid image.
    #[error("invalid image '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: DecodeError,
    },
}

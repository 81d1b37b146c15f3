//! Opcode definitions for the Synacor instruction set.

use crate::error::DecodeError;

/// Identifies the operation to perform.
///
/// The discriminant is the word value stored in memory. Operand names in
/// the variant docs follow the usual convention: `a` is a destination
/// register when the instruction writes one, `b` and `c` are values.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Stop execution.
    Halt = 0,
    /// Set register `a` to `b`.
    Set = 1,
    /// Push `a` onto the stack.
    Push = 2,
    /// Pop the stack into register `a`.
    Pop = 3,
    /// Register `a` = 1 if `b == c`, else 0.
    Eq = 4,
    /// Register `a` = 1 if `b > c`, else 0.
    Gt = 5,
    /// Jump to `a`.
    Jmp = 6,
    /// Jump to `b` if `a` is nonzero.
    Jt = 7,
    /// Jump to `b` if `a` is zero.
    Jf = 8,
    /// Register `a` = `b + c` modulo 32768.
    Add = 9,
    /// Register `a` = `b * c` modulo 32768.
    Mult = 10,
    /// Register `a` = `b % c`. Divisor zero is a runtime error.
    Mod = 11,
    /// Register `a` = `b & c`.
    And = 12,
    /// Register `a` = `b | c`.
    Or = 13,
    /// Register `a` = 15-bit complement of `b`.
    Not = 14,
    /// Register `a` = memory at address `b`.
    Rmem = 15,
    /// Memory at address `a` = `b`. Both operands are values.
    Wmem = 16,
    /// Push the address of the next instruction, jump to `a`.
    Call = 17,
    /// Pop an address and jump to it. Empty stack halts.
    Ret = 18,
    /// Write the low byte of `a` to the output stream.
    Out = 19,
    /// Read one byte into register `a`; end of input reads as 0.
    In = 20,
    /// No operation.
    Noop = 21,
}

/// All opcodes, in numeric order.
pub const ALL_OPCODES: [Opcode; 22] = [
    Opcode::Halt,
    Opcode::Set,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Eq,
    Opcode::Gt,
    Opcode::Jmp,
    Opcode::Jt,
    Opcode::Jf,
    Opcode::Add,
    Opcode::Mult,
    Opcode::Mod,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Rmem,
    Opcode::Wmem,
    Opcode::Call,
    Opcode::Ret,
    Opcode::Out,
    Opcode::In,
    Opcode::Noop,
];

impl TryFrom<u16> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        ALL_OPCODES
            .get(value as usize)
            .copied()
            .ok_or(DecodeError::InvalidOpcode(value))
    }
}

impl Opcode {
    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Halt => "halt",
            Opcode::Set => "set",
            Opcode::Push => "push",
            Opcode::Pop => "pop",
            Opcode::Eq => "eq",
            Opcode::Gt => "gt",
            Opcode::Jmp => "jmp",
            Opcode::Jt => "jt",
            Opcode::Jf => "jf",
            Opcode::Add => "add",
            Opcode::Mult => "mult",
            Opcode::Mod => "mod",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Not => "not",
            Opcode::Rmem => "rmem",
            Opcode::Wmem => "wmem",
            Opcode::Call => "call",
            Opcode::Ret => "ret",
            Opcode::Out => "out",
            Opcode::In => "in",
            Opcode::Noop => "noop",
        }
    }

    /// Number of operand words following the opcode.
    pub fn operand_count(&self) -> usize {
        match self {
            Opcode::Halt | Opcode::Ret | Opcode::Noop => 0,
            Opcode::Push | Opcode::Pop | Opcode::Jmp | Opcode::Call | Opcode::Out | Opcode::In => 1,
            Opcode::Set | Opcode::Jt | Opcode::Jf | Opcode::Not | Opcode::Rmem | Opcode::Wmem => 2,
            Opcode::Eq
            | Opcode::Gt
            | Opcode::Add
            | Opcode::Mult
            | Opcode::Mod
            | Opcode::And
            | Opcode::Or => 3,
        }
    }

    /// Whether the first operand names a register to write rather than a value.
    pub fn writes_register(&self) -> bool {
        matches!(
            self,
            Opcode::Set
                | Opcode::Pop
                | Opcode::Eq
                | Opcode::Gt
                | Opcode::Add
                | Opcode::Mult
                | Opcode::Mod
                | Opcode::And
                | Opcode::Or
                | Opcode::Not
                | Opcode::Rmem
                | Opcode::In
        )
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

//! VM state management: memory, registers, stack, program counter.

use crate::error::RuntimeError;
use crate::memory::{Memory, Registers, Stack, DEFAULT_STACK_CAPACITY};
use synacor_common::{Image, Opcode, Operand, REGISTER_BASE};

/// Tunables fixed at machine creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Maximum stack depth in words.
    pub stack_capacity: usize,
}

impl MachineConfig {
    pub fn with_stack_capacity(mut self, stack_capacity: usize) -> Self {
        self.stack_capacity = stack_capacity;
        self
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            stack_capacity: DEFAULT_STACK_CAPACITY,
        }
    }
}

/// Why the machine stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// A `halt` instruction.
    Halt,
    /// `ret` with nothing on the stack to return to.
    EmptyReturn,
}

/// Execution state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Halted(HaltReason),
}

/// Read position over the operands of the instruction being executed.
///
/// Starts just past the opcode. A handler either commits it back to the
/// program counter or replaces the program counter with a jump target.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor {
    pub(crate) opcode: Opcode,
    pub(crate) next: usize,
}

/// The Synacor virtual machine.
#[derive(Debug, Clone)]
pub struct Machine {
    /// Main memory, loaded from the image.
    pub(crate) memory: Memory,
    /// General purpose registers.
    pub(crate) registers: Registers,
    /// Shared data and return-address stack.
    pub(crate) stack: Stack,
    /// Address of the next opcode to fetch. While a handler runs it still
    /// points at that handler's opcode.
    pub(crate) pc: usize,
    /// Completed fetch cycles.
    pub(crate) steps: u64,
    pub(crate) state: State,
}

impl Machine {
    /// Create a machine with `image` loaded and the default configuration.
    pub fn new(image: &Image) -> Self {
        Self::with_config(image, MachineConfig::default())
    }

    /// Create a machine with `image` loaded.
    pub fn with_config(image: &Image, config: MachineConfig) -> Self {
        Self {
            memory: Memory::from_image(image),
            registers: Registers::default(),
            stack: Stack::with_capacity(config.stack_capacity),
            pc: 0,
            steps: 0,
            state: State::Running,
        }
    }

    /// Address of the next opcode to fetch, or of the faulting opcode after
    /// an error.
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// The eight general purpose registers.
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// The shared data and return-address stack.
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Main memory, including any words the program has written.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Number of instructions fetched so far, including the final `halt`.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// `Running` until a `halt` or an empty-stack `ret`.
    pub fn state(&self) -> State {
        self.state
    }

    /// Resolve a raw operand to the value it denotes.
    ///
    /// Literals pass through unchanged; register references read the register.
    pub fn resolve_value(&self, raw: u16) -> Result<u16, RuntimeError> {
        match Operand::decode(raw) {
            Ok(Operand::Literal(value)) => Ok(value),
            Ok(Operand::Register(index)) => self
                .registers
                .get(index as usize)
                .ok_or(RuntimeError::InvalidOperand { at: self.pc, raw }),
            Err(_) => Err(RuntimeError::InvalidOperand { at: self.pc, raw }),
        }
    }

    /// Resolve a raw operand naming a register to write.
    ///
    /// Only `32768..=32775` is accepted; the register's contents are never read.
    pub fn resolve_register_index(&self, raw: u16) -> Result<usize, RuntimeError> {
        match Operand::decode(raw) {
            Ok(Operand::Register(index)) => Ok(index as usize),
            _ => Err(RuntimeError::InvalidDestination { at: self.pc, raw }),
        }
    }

    /// Read the next raw operand word and advance the cursor.
    pub(crate) fn raw_operand(&self, cursor: &mut Cursor) -> Result<u16, RuntimeError> {
        let address = cursor.next;
        let raw = self.read_memory(address)?;
        cursor.next += 1;
        Ok(raw)
    }

    /// Read the next operand as a value.
    pub(crate) fn value(&self, cursor: &mut Cursor) -> Result<u16, RuntimeError> {
        debug_assert!(
            !(cursor.opcode.writes_register() && cursor.next == self.pc + 1),
            "{} reads its destination as a value",
            cursor.opcode
        );
        let raw = self.raw_operand(cursor)?;
        self.resolve_value(raw)
    }

    /// Read the next operand as a destination register.
    pub(crate) fn destination(&self, cursor: &mut Cursor) -> Result<usize, RuntimeError> {
        debug_assert!(
            cursor.opcode.writes_register() && cursor.next == self.pc + 1,
            "{} has no destination in this position",
            cursor.opcode
        );
        let raw = self.raw_operand(cursor)?;
        self.resolve_register_index(raw)
    }

    pub(crate) fn read_memory(&self, address: usize) -> Result<u16, RuntimeError> {
        self.memory
            .read(address)
            .ok_or(RuntimeError::MemoryOutOfRange { at: self.pc, address })
    }

    pub(crate) fn write_memory(&mut self, address: usize, value: u16) -> Result<(), RuntimeError> {
        self.memory
            .write(address, value)
            .ok_or(RuntimeError::MemoryOutOfRange { at: self.pc, address })
    }

    pub(crate) fn set_register(&mut self, index: usize, value: u16) -> Result<(), RuntimeError> {
        self.registers
            .set(index, value)
            .ok_or(RuntimeError::InvalidDestination {
                at: self.pc,
                raw: REGISTER_BASE.wrapping_add(index as u16),
            })
    }

    /// Push a word onto the stack, checking for overflow.
    pub(crate) fn push(&mut self, value: u16) -> Result<(), RuntimeError> {
        self.stack.push(value).ok_or(RuntimeError::StackOverflow {
            at: self.pc,
            capacity: self.stack.capacity(),
        })
    }

    /// Pop a word from the stack.
    pub(crate) fn pop(&mut self) -> Result<u16, RuntimeError> {
        self.stack
            .pop()
            .ok_or(RuntimeError::StackUnderflow { at: self.pc })
    }

    /// Finish an instruction that falls through to the next one.
    pub(crate) fn advance(&mut self, cursor: Cursor) {
        debug_assert_eq!(
            cursor.next - self.pc - 1,
            cursor.opcode.operand_count(),
            "{} consumed the wrong number of operands",
            cursor.opcode
        );
        self.pc = cursor.next;
    }

    /// Finish an instruction by transferring control to `target`.
    pub(crate) fn jump(&mut self, target: u16) {
        self.pc = target as usize;
    }
}

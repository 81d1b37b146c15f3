//! Main execution loop and opcode dispatch for the Synacor VM.

use std::io::{BufRead, ErrorKind, Write};

use crate::error::RuntimeError;
use crate::machine::{Cursor, HaltReason, Machine, State};
use synacor_common::{wrap, Opcode, MAX_LITERAL};
use tracing::{debug, trace};

impl Machine {
    /// Execute until `halt`, an empty-stack `ret`, or an error.
    ///
    /// `out` writes to `output`; `in` reads from `input`. Output is flushed
    /// before every blocking read and when the machine stops.
    pub fn run<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<HaltReason, RuntimeError>
    where
        R: BufRead,
        W: Write,
    {
        loop {
            match self.step(input, output) {
                Ok(State::Running) => {}
                Ok(State::Halted(reason)) => {
                    self.flush(output)?;
                    return Ok(reason);
                }
                Err(e) => {
                    // Keep whatever the program printed before faulting.
                    if let Err(flush_err) = output.flush() {
                        debug!(pc = self.pc, error = %flush_err, "flush after fault failed");
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Fetch, decode and execute a single instruction.
    ///
    /// On error the program counter is left at the faulting opcode. Once
    /// halted, further calls do nothing.
    pub fn step<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<State, RuntimeError>
    where
        R: BufRead,
        W: Write,
    {
        if let State::Halted(_) = self.state {
            return Ok(self.state);
        }

        let word = self.read_memory(self.pc)?;
        let opcode = Opcode::try_from(word).map_err(|_| RuntimeError::InvalidOpcode {
            at: self.pc,
            opcode: word,
        })?;
        self.steps += 1;

        trace!(
            pc = self.pc,
            op = opcode.mnemonic(),
            registers = ?self.registers.as_array(),
            depth = self.stack.len(),
            "step"
        );

        let mut cursor = Cursor {
            opcode,
            next: self.pc + 1,
        };

        match opcode {
            Opcode::Halt => self.exec_halt(HaltReason::Halt),
            Opcode::Set => self.exec_set(&mut cursor)?,
            Opcode::Push => self.exec_push(&mut cursor)?,
            Opcode::Pop => self.exec_pop(&mut cursor)?,
            Opcode::Eq => self.exec_compare(&mut cursor, |a, b| a == b)?,
            Opcode::Gt => self.exec_compare(&mut cursor, |a, b| a > b)?,
            Opcode::Jmp => self.exec_jmp(&mut cursor)?,
            Opcode::Jt => self.exec_jump_if(&mut cursor, true)?,
            Opcode::Jf => self.exec_jump_if(&mut cursor, false)?,
            Opcode::Add => self.exec_binary_arith(&mut cursor, |a, b| a + b)?,
            Opcode::Mult => self.exec_binary_arith(&mut cursor, |a, b| a * b)?,
            Opcode::Mod => self.exec_mod(&mut cursor)?,
            Opcode::And => self.exec_binary_arith(&mut cursor, |a, b| a & b)?,
            Opcode::Or => self.exec_binary_arith(&mut cursor, |a, b| a | b)?,
            Opcode::Not => self.exec_not(&mut cursor)?,
            Opcode::Rmem => self.exec_rmem(&mut cursor)?,
            Opcode::Wmem => self.exec_wmem(&mut cursor)?,
            Opcode::Call => self.exec_call(&mut cursor)?,
            Opcode::Ret => self.exec_ret()?,
            Opcode::Out => self.exec_out(&mut cursor, output)?,
            Opcode::In => self.exec_in(&mut cursor, input, output)?,
            Opcode::Noop => self.advance(cursor),
        }

        Ok(self.state)
    }

    fn flush<W: Write>(&self, output: &mut W) -> Result<(), RuntimeError> {
        output.flush().map_err(|e| RuntimeError::Io {
            at: self.pc,
            kind: e.kind(),
        })
    }

    // ---- Control ----

    fn exec_halt(&mut self, reason: HaltReason) {
        debug!(pc = self.pc, steps = self.steps, ?reason, "halted");
        self.state = State::Halted(reason);
    }

    fn exec_jmp(&mut self, cursor: &mut Cursor) -> Result<(), RuntimeError> {
        let target = self.value(cursor)?;
        self.jump(target);
        Ok(())
    }

    /// `jt` when `when_nonzero`, `jf` otherwise.
    fn exec_jump_if(&mut self, cursor: &mut Cursor, when_nonzero: bool) -> Result<(), RuntimeError> {
        let condition = self.value(cursor)?;
        let target = self.value(cursor)?;
        if (condition != 0) == when_nonzero {
            self.jump(target);
        } else {
            self.advance(*cursor);
        }
        Ok(())
    }

    fn exec_call(&mut self, cursor: &mut Cursor) -> Result<(), RuntimeError> {
        let target = self.value(cursor)?;
        self.push(cursor.next as u16)?;
        self.jump(target);
        Ok(())
    }

    fn exec_ret(&mut self) -> Result<(), RuntimeError> {
        if self.stack.is_empty() {
            self.exec_halt(HaltReason::EmptyReturn);
            return Ok(());
        }
        let target = self.pop()?;
        self.jump(target);
        Ok(())
    }

    // ---- Registers and stack ----

    fn exec_set(&mut self, cursor: &mut Cursor) -> Result<(), RuntimeError> {
        let dst = self.destination(cursor)?;
        let value = self.value(cursor)?;
        self.set_register(dst, value)?;
        self.advance(*cursor);
        Ok(())
    }

    fn exec_push(&mut self, cursor: &mut Cursor) -> Result<(), RuntimeError> {
        let value = self.value(cursor)?;
        self.push(value)?;
        self.advance(*cursor);
        Ok(())
    }

    fn exec_pop(&mut self, cursor: &mut Cursor) -> Result<(), RuntimeError> {
        let dst = self.destination(cursor)?;
        let value = self.pop()?;
        self.set_register(dst, value)?;
        self.advance(*cursor);
        Ok(())
    }

    // ---- Arithmetic and logic ----

    fn exec_compare(
        &mut self,
        cursor: &mut Cursor,
        test: impl Fn(u16, u16) -> bool,
    ) -> Result<(), RuntimeError> {
        let dst = self.destination(cursor)?;
        let a = self.value(cursor)?;
        let b = self.value(cursor)?;
        self.set_register(dst, u16::from(test(a, b)))?;
        self.advance(*cursor);
        Ok(())
    }

    /// Operands are widened to `u32` so sums and products cannot overflow
    /// before the modulo reduction.
    fn exec_binary_arith(
        &mut self,
        cursor: &mut Cursor,
        op: impl Fn(u32, u32) -> u32,
    ) -> Result<(), RuntimeError> {
        let dst = self.destination(cursor)?;
        let a = self.value(cursor)?;
        let b = self.value(cursor)?;
        self.set_register(dst, wrap(op(a.into(), b.into())))?;
        self.advance(*cursor);
        Ok(())
    }

    fn exec_mod(&mut self, cursor: &mut Cursor) -> Result<(), RuntimeError> {
        let dst = self.destination(cursor)?;
        let a = self.value(cursor)?;
        let b = self.value(cursor)?;
        if b == 0 {
            return Err(RuntimeError::DivideByZero { at: self.pc });
        }
        self.set_register(dst, wrap(u32::from(a % b)))?;
        self.advance(*cursor);
        Ok(())
    }

    fn exec_not(&mut self, cursor: &mut Cursor) -> Result<(), RuntimeError> {
        let dst = self.destination(cursor)?;
        let a = self.value(cursor)?;
        self.set_register(dst, !a & MAX_LITERAL)?;
        self.advance(*cursor);
        Ok(())
    }

    // ---- Memory ----

    fn exec_rmem(&mut self, cursor: &mut Cursor) -> Result<(), RuntimeError> {
        let dst = self.destination(cursor)?;
        let address = self.value(cursor)?;
        let value = self.read_memory(address as usize)?;
        self.set_register(dst, value)?;
        self.advance(*cursor);
        Ok(())
    }

    /// Both operands are values: the address may itself come from a register.
    fn exec_wmem(&mut self, cursor: &mut Cursor) -> Result<(), RuntimeError> {
        let address = self.value(cursor)?;
        let value = self.value(cursor)?;
        self.write_memory(address as usize, value)?;
        self.advance(*cursor);
        Ok(())
    }

    // ---- Console ----

    fn exec_out<W: Write>(&mut self, cursor: &mut Cursor, output: &mut W) -> Result<(), RuntimeError> {
        let value = self.value(cursor)?;
        output
            .write_all(&[value as u8])
            .map_err(|e| RuntimeError::Io {
                at: self.pc,
                kind: e.kind(),
            })?;
        self.advance(*cursor);
        Ok(())
    }

    fn exec_in<R, W>(
        &mut self,
        cursor: &mut Cursor,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), RuntimeError>
    where
        R: BufRead,
        W: Write,
    {
        let dst = self.destination(cursor)?;
        self.flush(output)?;
        let byte = read_byte(input).map_err(|kind| RuntimeError::Io { at: self.pc, kind })?;
        self.set_register(dst, byte.map_or(0, u16::from))?;
        self.advance(*cursor);
        Ok(())
    }
}

/// Take one byte from `input`, or `None` at end of input.
fn read_byte<R: BufRead>(input: &mut R) -> Result<Option<u8>, ErrorKind> {
    loop {
        match input.fill_buf() {
            Ok(buf) => {
                let byte = buf.first().copied();
                if byte.is_some() {
                    input.consume(1);
                }
                return Ok(byte);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.kind()),
        }
    }
}

//! Synacor virtual machine — executes 15-bit word program images.
//!
//! The machine has:
//! - 32768 words of memory, loaded from the image at address 0
//! - Eight registers, addressed by operand words 32768..=32775
//! - A bounded stack shared by `push`/`pop` and `call`/`ret`
//!
//! # Usage
//!
//! ```
//! use synacor_common::Image;
//! use synacor_vm::{run, HaltReason};
//!
//! // add r0 4 5; out r0; halt
//! let image = Image::new(vec![9, 32768, 4, 5, 19, 32768, 0]).unwrap();
//! let mut output = Vec::new();
//!
//! let reason = run(&image, &mut std::io::empty(), &mut output).unwrap();
//! assert_eq!(reason, HaltReason::Halt);
//! assert_eq!(output, vec![9]);
//! ```

pub mod error;
pub mod execute;
pub mod loader;
pub mod machine;
pub mod memory;

pub use error::{LoadError, RuntimeError};
pub use loader::load_image;
pub use machine::{HaltReason, Machine, MachineConfig, State};
pub use memory::{Memory, Registers, Stack, DEFAULT_STACK_CAPACITY};

use std::io::{BufRead, Write};
use synacor_common::Image;

/// Execute an image with the default configuration until it halts.
///
/// # Errors
///
/// Returns [`RuntimeError`] on the first invalid opcode, invalid operand,
/// division by zero, stack fault, out-of-range address, or console failure.
pub fn run<R, W>(image: &Image, input: &mut R, output: &mut W) -> Result<HaltReason, RuntimeError>
where
    R: BufRead,
    W: Write,
{
    let mut machine = Machine::new(image);
    machine.run(input, output)
}

//! Synacor common types and image encoding.
//!
//! This crate provides the foundational data structures for the Synacor
//! instruction set:
//!
//! - [`Opcode`] — the 22 opcodes, their mnemonics and operand counts
//! - [`Operand`] — a raw operand word classified as literal or register
//! - [`Image`] — a program image (little-endian word stream)
//! - [`DecodeError`] — errors from decoding words and image bytes
//!
//! # Dependencies
//!
//! This crate uses `thiserror` and has no other dependencies.

pub mod error;
pub mod image;
pub mod opcode;
pub mod word;

// Re-export commonly used types at the crate root.
pub use error::DecodeError;
pub use image::{Image, MAX_IMAGE_BYTES};
pub use opcode::{Opcode, ALL_OPCODES};
pub use word::{
    wrap, Operand, LAST_REGISTER, MAX_LITERAL, MEMORY_SIZE, MODULUS, REGISTER_BASE,
    REGISTER_COUNT,
};

//! Word-addressed main memory, registers and the bounded stack.
//!
//! Accessors return `None` on an out-of-range index instead of panicking;
//! the execution loop turns that into a [`RuntimeError`] carrying the
//! faulting address.
//!
//! [`RuntimeError`]: crate::RuntimeError

use synacor_common::{Image, MEMORY_SIZE, REGISTER_COUNT};

/// Default stack capacity in words.
pub const DEFAULT_STACK_CAPACITY: usize = 1 << 16;

/// The 32768-word address space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    words: Box<[u16]>,
}

impl Memory {
    /// Memory with `image` loaded at address 0 and zeros after it.
    pub fn from_image(image: &Image) -> Self {
        let loaded = image.words();
        debug_assert!(loaded.len() <= MEMORY_SIZE, "image larger than memory");
        let mut words = vec![0u16; MEMORY_SIZE].into_boxed_slice();
        words[..loaded.len()].copy_from_slice(loaded);
        Self { words }
    }

    /// Word at `address`.
    pub fn read(&self, address: usize) -> Option<u16> {
        self.words.get(address).copied()
    }

    /// Store `value` at `address`. Returns `None` if the address is out of range.
    pub fn write(&mut self, address: usize, value: u16) -> Option<()> {
        let slot = self.words.get_mut(address)?;
        *slot = value;
        Some(())
    }

    /// The whole address space.
    pub fn as_slice(&self) -> &[u16] {
        &self.words
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::from_image(&Image::default())
    }
}

/// The eight general purpose registers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registers([u16; REGISTER_COUNT]);

impl Registers {
    pub fn get(&self, index: usize) -> Option<u16> {
        self.0.get(index).copied()
    }

    pub fn set(&mut self, index: usize, value: u16) -> Option<()> {
        let slot = self.0.get_mut(index)?;
        *slot = value;
        Some(())
    }

    pub fn as_array(&self) -> &[u16; REGISTER_COUNT] {
        &self.0
    }
}

/// LIFO of words shared by `push`/`pop` and `call`/`ret`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    words: Vec<u16>,
    capacity: usize,
}

impl Stack {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: Vec::new(),
            capacity,
        }
    }

    /// Push a word. Returns `None` when the stack is full.
    pub fn push(&mut self, value: u16) -> Option<()> {
        if self.words.len() >= self.capacity {
            return None;
        }
        self.words.push(value);
        Some(())
    }

    pub fn pop(&mut self) -> Option<u16> {
        self.words.pop()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Contents from bottom to top.
    pub fn as_slice(&self) -> &[u16] {
        &self.words
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_STACK_CAPACITY)
    }
}

//! Program images.
//!
//! An image file is a flat stream of little-endian 16-bit words with no
//! header. Word `i` of the file is loaded at memory address `i`.

use crate::error::DecodeError;
use crate::word::MEMORY_SIZE;

/// Largest image file in bytes.
pub const MAX_IMAGE_BYTES: usize = MEMORY_SIZE * 2;

/// A program image: the initial contents of memory from address 0.
///
/// Only [`Image::new`] and [`Image::decode`] build one, so an image never
/// holds more than [`MEMORY_SIZE`] words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    words: Vec<u16>,
}

impl Image {
    /// Create an image from words.
    ///
    /// Fails if the words do not fit in memory.
    pub fn new(words: Vec<u16>) -> Result<Self, DecodeError> {
        if words.len() > MEMORY_SIZE {
            return Err(DecodeError::ImageTooLarge {
                len: words.len() * 2,
            });
        }
        Ok(Self { words })
    }

    /// Encode the image to its file representation.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.words.len() * 2);
        for word in &self.words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// Decode a byte slice into an image.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(DecodeError::ImageTooLarge { len: bytes.len() });
        }
        if !bytes.len().is_multiple_of(2) {
            return Err(DecodeError::OddLength(bytes.len()));
        }

        let words = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Ok(Self { words })
    }

    /// Words in load order.
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    /// Number of words in the image.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the image has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

//! Big-endian binary writer.
//!
//! [`BinaryWriter`] accumulates bytes in memory. Writing to a `Vec` cannot
//! fail, so none of the methods return a `Result`.

use byteorder::{BigEndian, ByteOrder};
use zerocopy::{Immutable, IntoBytes};

/// A growable big-endian output buffer.
#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Write a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Write a big-endian u32.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        let mut word = [0u8; 4];
        BigEndian::write_u32(&mut word, value);
        self.buf.extend_from_slice(&word);
    }

    /// Write a big-endian i32.
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        let mut word = [0u8; 4];
        BigEndian::write_i32(&mut word, value);
        self.buf.extend_from_slice(&word);
    }

    /// Write raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write bytes followed by a null terminator.
    ///
    /// Anything from an interior null onwards is dropped; a reader would
    /// stop there anyway and misparse the rest as the next field.
    #[inline]
    pub fn write_cstring(&mut self, bytes: &[u8]) {
        let end = memchr::memchr(0, bytes).unwrap_or(bytes.len());
        self.buf.extend_from_slice(&bytes[..end]);
        self.buf.push(0);
    }

    /// Write a zerocopy struct verbatim.
    #[inline]
    pub fn write_struct<T: IntoBytes + Immutable>(&mut self, value: &T) {
        self.buf.extend_from_slice(value.as_bytes());
    }

    /// Overwrite a previously written u32 at `position`.
    ///
    /// Returns `false` if the four bytes at `position` have not been written.
    pub fn patch_u32(&mut self, position: usize, value: u32) -> bool {
        match self.buf.get_mut(position..position.saturating_add(4)) {
            Some(slot) if slot.len() == 4 => {
                BigEndian::write_u32(slot, value);
                true
            }
            _ => false,
        }
    }

    /// Get the written bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer and return the written bytes.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

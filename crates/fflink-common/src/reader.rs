//! Binary reader for bounds-checked parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! big-endian data from a byte slice without copying. Every read checks the
//! remaining length first, so a malformed length field turns into an
//! [`Error::UnexpectedEof`] instead of an out-of-bounds access.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// A binary reader over a byte slice.
///
/// # Example
///
/// ```
/// use fflink_common::BinaryReader;
///
/// let data = [0x00, 0x00, 0x00, 0xFD, b'a', b'b', 0x00];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u32().unwrap(), 0xFD);
/// assert_eq!(reader.read_cstring().unwrap(), b"ab");
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Create a new reader starting at a specific position.
    #[inline]
    pub const fn new_at(data: &'a [u8], position: usize) -> Self {
        Self { data, position }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Seek to an absolute position.
    ///
    /// Seeking past the end is allowed; the next read fails.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Skip a number of bytes, failing if fewer remain.
    #[inline]
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Get the remaining bytes as a slice.
    #[inline]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a big-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a big-endian i32.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_u32().map(|v| v as i32)
    }

    /// Read a null-terminated byte string, consuming the terminator.
    ///
    /// The returned slice excludes the terminator.
    pub fn read_cstring(&mut self) -> Result<&'a [u8]> {
        let remaining = self.remaining_bytes();
        let null_pos = memchr::memchr(0, remaining).ok_or(Error::MissingNullTerminator)?;

        self.position += null_pos + 1;
        Ok(&remaining[..null_pos])
    }

    /// Read a struct using zerocopy.
    ///
    /// Multi-byte fields of `T` should use zerocopy's big-endian wrappers.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_big_endian_boundaries() {
        let data = [
            0x00u8, 0x00, 0x00, 0x00, // 0x00000000
            0xFF, 0xFF, 0xFF, 0xFF, // 0xFFFFFFFF
            0x00, 0x00, 0x00, 0x01, // 0x00000001
        ];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x0000_0000);
        assert_eq!(reader.read_u32().unwrap(), 0xFFFF_FFFF);
        assert_eq!(reader.read_u32().unwrap(), 0x0000_0001);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_i32_sign() {
        let data = [0xFF, 0xFF, 0xFF, 0xFE];
        let mut reader = BinaryReader::new(&data);
        assert_eq!(reader.read_i32().unwrap(), -2);
    }

    #[test]
    fn test_read_cstring() {
        let data = b"hello\0\0world\0";
        let mut reader = BinaryReader::new(data);

        assert_eq!(reader.read_cstring().unwrap(), b"hello");
        assert_eq!(reader.read_cstring().unwrap(), b"");
        assert_eq!(reader.read_cstring().unwrap(), b"world");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_cstring_without_terminator() {
        let data = b"abc";
        let mut reader = BinaryReader::new(data);

        let err = reader.read_cstring().unwrap_err();
        assert!(err.is_truncation());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.peek_bytes(2).unwrap(), &[0x01, 0x02]);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u32().unwrap(), 0x01020304);
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        assert!(matches!(
            reader.read_u32(),
            Err(Error::UnexpectedEof { needed: 4, available: 2 })
        ));
    }

    #[test]
    fn test_seek_past_end_fails_on_read() {
        let data = [0u8; 4];
        let mut reader = BinaryReader::new(&data);
        reader.seek(10);

        assert_eq!(reader.remaining(), 0);
        assert!(reader.read_u8().is_err());
        assert!(reader.skip(1).is_err());
    }
}

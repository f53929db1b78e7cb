//! Fastfile envelope framing.
//!
//! An archive is a short uncompressed header followed by a zlib stream:
//!
//! ```text
//! 0x00  magic        "IWffu100"
//! 0x08  version      0x000000FD
//! 0x0C  reserved[3]  timestamps / online flag, written as zero
//! 0x18  region       0x01000000
//! 0x1C  unknown[2]   0x000000F5, 0xEF0000F5
//! 0x24  stray        0xEF
//! 0x25  zlib stream
//! ```
//!
//! Only the magic is validated. The middle fields differ between producers
//! and their meaning is not fully known, so the stream start is found by
//! scanning for a zlib header instead of trusting a fixed offset.

use fflink_common::BinaryReader;
use log::debug;
use zerocopy::byteorder::{BigEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::compression::{self, is_zlib_header};
use crate::{Error, Result};

/// Archive magic.
pub const MAGIC: &[u8; 8] = b"IWffu100";

/// Format version written by this crate.
pub const VERSION: u32 = 0xFD;

/// Start of the cheap scan window.
const WINDOW_START: usize = 0x18;

/// End (exclusive) of the cheap scan window for the first header byte.
const WINDOW_END: usize = 0x40;

/// Length of the prefix understood well enough to skip.
const KNOWN_PREFIX_LEN: usize = 0x1C;

/// The uncompressed archive header.
///
/// All fields except `magic` are opaque: they are preserved when framing and
/// ignored when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct EnvelopeHeader {
    /// Format identifier, always `IWffu100`.
    pub magic: [u8; 8],
    /// Format version.
    pub version: U32<BigEndian>,
    /// Timestamp and online-update fields.
    pub reserved: [U32<BigEndian>; 3],
    /// Language / region word. Leaving this zero causes a DLC language
    /// mismatch in the game.
    pub region: U32<BigEndian>,
    /// Fields of unknown purpose.
    pub unknown: [U32<BigEndian>; 2],
    /// Single byte preceding the stream.
    pub stray: u8,
}

impl EnvelopeHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// The header values observed in reference archives.
    pub fn observed() -> Self {
        Self {
            magic: *MAGIC,
            version: U32::new(VERSION),
            reserved: [U32::new(0); 3],
            region: U32::new(0x0100_0000),
            unknown: [U32::new(0x0000_00F5), U32::new(0xEF00_00F5)],
            stray: 0xEF,
        }
    }

    /// Format version.
    #[inline]
    pub fn version(&self) -> u32 {
        self.version.get()
    }

    /// Language / region word.
    #[inline]
    pub fn region(&self) -> u32 {
        self.region.get()
    }
}

impl Default for EnvelopeHeader {
    fn default() -> Self {
        Self::observed()
    }
}

/// Three words following the known prefix in some producers' archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeTail {
    pub padding: u32,
    pub size_a: u32,
    pub size_b: u32,
}

impl EnvelopeTail {
    /// Size of the tail in bytes.
    pub const SIZE: usize = 12;

    /// Read the tail directly after the known prefix, if the file is long enough.
    pub fn read(data: &[u8]) -> Option<Self> {
        let mut reader = BinaryReader::new_at(data, KNOWN_PREFIX_LEN);
        Some(Self {
            padding: reader.read_u32().ok()?,
            size_a: reader.read_u32().ok()?,
            size_b: reader.read_u32().ok()?,
        })
    }
}

/// A parsed archive envelope borrowing the archive bytes.
#[derive(Debug, Clone)]
pub struct Envelope<'a> {
    data: &'a [u8],
    header: Option<EnvelopeHeader>,
    stream_offset: usize,
}

impl<'a> Envelope<'a> {
    /// Validate the magic and locate the compressed stream.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        check_magic(data)?;

        // Short archives may omit part of the header; the fields are opaque anyway.
        let header = BinaryReader::new(data).read_struct::<EnvelopeHeader>().ok();
        let stream_offset = locate_stream(data)?;

        Ok(Self {
            data,
            header,
            stream_offset,
        })
    }

    /// The header, if the archive is long enough to contain one.
    #[inline]
    pub fn header(&self) -> Option<&EnvelopeHeader> {
        self.header.as_ref()
    }

    /// Byte offset at which the zlib stream starts.
    #[inline]
    pub fn stream_offset(&self) -> usize {
        self.stream_offset
    }

    /// The compressed stream through the end of the file.
    #[inline]
    pub fn compressed(&self) -> &'a [u8] {
        &self.data[self.stream_offset..]
    }

    /// Inflate the stream, refusing to produce more than `max_output` bytes.
    pub fn inflate(&self, max_output: usize) -> Result<Vec<u8>> {
        Ok(compression::decompress(self.compressed(), max_output)?)
    }
}

/// Check the archive magic.
pub fn check_magic(data: &[u8]) -> Result<()> {
    if !data.starts_with(MAGIC) {
        return Err(Error::InvalidMagic {
            actual: data[..data.len().min(MAGIC.len())].to_vec(),
        });
    }
    Ok(())
}

/// Find the offset of the zlib stream.
///
/// 1. Scan `0x18..0x40`, which covers every archive written by this crate.
/// 2. Read the three-word tail after the `0x1C`-byte prefix and scan from
///    just past it.
/// 3. Scan the whole buffer.
pub fn locate_stream(data: &[u8]) -> Result<usize> {
    if let Some(offset) = scan(data, WINDOW_START, WINDOW_END) {
        debug!("zlib stream at {:#x} (header window)", offset);
        return Ok(offset);
    }

    if let Some(tail) = EnvelopeTail::read(data) {
        let resume = KNOWN_PREFIX_LEN + EnvelopeTail::SIZE;
        debug!(
            "envelope tail: padding={:#x} size_a={:#x} size_b={:#x}",
            tail.padding, tail.size_a, tail.size_b
        );
        if let Some(offset) = scan(data, resume, data.len()) {
            debug!("zlib stream at {:#x} (after tail)", offset);
            return Ok(offset);
        }
    }

    match scan(data, 0, data.len()) {
        Some(offset) => {
            debug!("zlib stream at {:#x} (full scan)", offset);
            Ok(offset)
        }
        None => Err(Error::NoCompressedStream),
    }
}

/// First offset in `start..end` holding a zlib header.
fn scan(data: &[u8], start: usize, end: usize) -> Option<usize> {
    let end = end.min(data.len());
    if start >= end {
        return None;
    }

    memchr::memchr_iter(0x78, &data[start..end])
        .map(|i| start + i)
        .find(|&i| is_zlib_header(&data[i..]))
}

/// Frame already-compressed bytes with the observed header.
pub fn frame(compressed: &[u8]) -> Vec<u8> {
    frame_with(&EnvelopeHeader::observed(), compressed)
}

/// Frame already-compressed bytes with a caller-supplied header.
pub fn frame_with(header: &EnvelopeHeader, compressed: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(EnvelopeHeader::SIZE + compressed.len());
    output.extend_from_slice(header.as_bytes());
    output.extend_from_slice(compressed);
    output
}

/// Compress a serialized asset list and frame it as a complete archive.
pub fn pack(asset_list: &[u8]) -> Result<Vec<u8>> {
    let compressed = compression::compress(asset_list)?;
    Ok(frame(&compressed))
}

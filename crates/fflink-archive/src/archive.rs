//! Memory-mapped fastfile reader and writer.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::compression::ARCHIVE_OUTPUT_LIMIT;
use crate::envelope::{Envelope, EnvelopeHeader};
use crate::Result;

/// A fastfile opened from disk.
///
/// The file is memory-mapped; the compressed stream is located once when
/// opening and inflated on demand.
pub struct FastFile {
    /// Memory-mapped file data
    mmap: Mmap,
    /// Archive file name
    name: String,
    /// Header, when the file is long enough to hold one
    header: Option<EnvelopeHeader>,
    /// Offset of the zlib stream
    stream_offset: usize,
}

impl FastFile {
    /// Open an archive, validating the magic and locating the stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let envelope = Envelope::parse(&mmap)?;
        let header = envelope.header().copied();
        let stream_offset = envelope.stream_offset();

        Ok(Self {
            mmap,
            name,
            header,
            stream_offset,
        })
    }

    /// Get the archive file name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the envelope header, if present.
    #[inline]
    pub fn header(&self) -> Option<&EnvelopeHeader> {
        self.header.as_ref()
    }

    /// Offset of the compressed stream within the file.
    #[inline]
    pub fn stream_offset(&self) -> usize {
        self.stream_offset
    }

    /// Size of the compressed stream in bytes (through end of file).
    #[inline]
    pub fn compressed_len(&self) -> usize {
        self.mmap.len() - self.stream_offset
    }

    /// Inflate the asset list with the whole-archive output cap.
    pub fn inflate(&self) -> Result<Vec<u8>> {
        self.inflate_limited(ARCHIVE_OUTPUT_LIMIT)
    }

    /// Inflate the asset list, refusing to produce more than `max_output` bytes.
    pub fn inflate_limited(&self, max_output: usize) -> Result<Vec<u8>> {
        Ok(crate::compression::decompress(
            &self.mmap[self.stream_offset..],
            max_output,
        )?)
    }
}

impl std::fmt::Debug for FastFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastFile")
            .field("name", &self.name)
            .field("len", &self.mmap.len())
            .field("stream_offset", &self.stream_offset)
            .finish()
    }
}

//! zlib compression adapter.
//!
//! Archives and compressed raw files both carry zlib-wrapped DEFLATE
//! streams. Inflation is always bounded: archives come from untrusted
//! sources and a tiny stream can expand into gigabytes.

use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::CompressionError;

/// Output cap for generic callers (10 MiB).
pub const DEFAULT_OUTPUT_LIMIT: usize = 10 * 1024 * 1024;

/// Output cap when inflating a whole archive (50 MiB).
pub const ARCHIVE_OUTPUT_LIMIT: usize = 50 * 1024 * 1024;

/// Output buffer growth step while inflating.
const CHUNK_SIZE: usize = 32 * 1024;

/// Compress data with zlib at the default level.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data).map_err(CompressionError::Encoder)?;
    encoder.finish().map_err(CompressionError::Encoder)
}

/// Decompress a zlib stream, failing once output exceeds `max_output`.
///
/// Bytes following the end of the stream are ignored. A corrupt or
/// truncated stream is an error, never an empty or partial success.
pub fn decompress(data: &[u8], max_output: usize) -> Result<Vec<u8>, CompressionError> {
    let mut inflater = Decompress::new(true);
    let mut output = Vec::new();

    loop {
        if output.capacity() - output.len() < CHUNK_SIZE {
            output.reserve_exact(CHUNK_SIZE);
        }

        let in_before = inflater.total_in();
        let out_before = inflater.total_out();
        let input = &data[(in_before as usize).min(data.len())..];

        let status = inflater
            .decompress_vec(input, &mut output, FlushDecompress::None)
            .map_err(|e| CompressionError::Inflate(io::Error::from(e)))?;

        if output.len() > max_output {
            return Err(CompressionError::OutputTooLarge { limit: max_output });
        }

        if status == Status::StreamEnd {
            return Ok(output);
        }

        let progressed = inflater.total_in() != in_before || inflater.total_out() != out_before;
        if !progressed {
            return Err(CompressionError::Inflate(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "compressed stream ends before its end marker",
            )));
        }
    }
}

/// Whether `data[0..2]` is a zlib header this format uses.
///
/// Producers only ever emit compression levels 1, 6 and 9, so the second
/// byte is one of `0x01`, `0x9C` or `0xDA`.
#[inline]
pub fn is_zlib_header(data: &[u8]) -> bool {
    matches!(data, [0x78, 0x01 | 0x9C | 0xDA, ..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zlib_roundtrip() {
        let original = b"Hello, World! This is a test of zlib compression.";

        let compressed = compress(original).unwrap();
        assert!(is_zlib_header(&compressed));

        let decompressed = decompress(&compressed, DEFAULT_OUTPUT_LIMIT).unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_output_exactly_at_limit() {
        let original = vec![b'a'; 4096];
        let compressed = compress(&original).unwrap();

        let decompressed = decompress(&compressed, 4096).unwrap();
        assert_eq!(decompressed.len(), 4096);
    }

    #[test]
    fn test_output_over_limit_fails() {
        let original = vec![0u8; 1024 * 1024];
        let compressed = compress(&original).unwrap();

        let err = decompress(&compressed, 1024).unwrap_err();
        assert!(matches!(err, CompressionError::OutputTooLarge { limit: 1024 }));
    }

    #[test]
    fn test_garbage_is_an_error() {
        let err = decompress(b"definitely not zlib", DEFAULT_OUTPUT_LIMIT).unwrap_err();
        assert!(matches!(err, CompressionError::Inflate(_)));
    }

    #[test]
    fn test_truncated_stream_is_an_error() {
        let compressed = compress(&[7u8; 2048]).unwrap();
        let truncated = &compressed[..compressed.len() / 2];

        assert!(decompress(truncated, DEFAULT_OUTPUT_LIMIT).is_err());
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut compressed = compress(b"payload").unwrap();
        compressed.extend_from_slice(&[0xAA; 16]);

        assert_eq!(decompress(&compressed, DEFAULT_OUTPUT_LIMIT).unwrap(), b"payload");
    }

    #[test]
    fn test_is_zlib_header() {
        assert!(is_zlib_header(&[0x78, 0x9C]));
        assert!(is_zlib_header(&[0x78, 0x01, 0x00]));
        assert!(is_zlib_header(&[0x78, 0xDA]));
        assert!(!is_zlib_header(&[0x78, 0x5E]));
        assert!(!is_zlib_header(&[0x78]));
    }
}

//! Fastfile envelope reader and writer.
//!
//! A fastfile is a small uncompressed header followed by a zlib stream that
//! holds the serialized asset list. This crate handles the outer layer:
//!
//! - Framing compressed bytes with the `IWffu100` header
//! - Locating the stream start when producers disagree on header length
//! - Bounded zlib inflation, so hostile archives cannot exhaust memory
//!
//! The asset list inside the stream is handled by `fflink-assets`.
//!
//! # Example
//!
//! ```no_run
//! use fflink_archive::FastFile;
//!
//! let archive = FastFile::open("mp_mymod.ff")?;
//! println!("stream at {:#x}", archive.stream_offset());
//!
//! let asset_list = archive.inflate()?;
//! println!("{} bytes of asset list", asset_list.len());
//! # Ok::<(), fflink_archive::Error>(())
//! ```

mod archive;
mod error;

pub mod compression;
pub mod envelope;

pub use archive::FastFile;
pub use envelope::{Envelope, EnvelopeHeader, EnvelopeTail, MAGIC};
pub use error::{CompressionError, Error, Result};

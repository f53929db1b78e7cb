//! Common utilities for fflink.
//!
//! This crate provides the foundational types shared by the fflink crates:
//!
//! - [`BinaryReader`] - Bounds-checked big-endian reading from byte slices
//! - [`BinaryWriter`] - Big-endian writing into a growable buffer
//! - [`hash`] - The case-insensitive string table hash
//!
//! Every multi-byte integer in a fastfile is big-endian regardless of the
//! host, so neither the reader nor the writer offers a little-endian mode.

mod error;
mod reader;
mod writer;

pub mod hash;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// Placeholder written wherever the runtime would later patch in a pointer.
pub const PTR_PLACEHOLDER: u32 = 0xFFFF_FFFF;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

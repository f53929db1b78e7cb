//! fflink - build and unpack fastfile archives.
//!
//! This crate ties the fflink library crates into the two pipelines:
//!
//! - [`build`] - Read `<mod>/zone_source/<mod>.csv`, load every listed
//!   asset, and write `<mod>.ff`
//! - [`unpack`] - Inflate an archive, extract every supported asset and
//!   write the manifest that rebuilds it
//!
//! # Crates
//!
//! - [`fflink_common`] - Big-endian reading and writing, string table hash
//! - [`fflink_archive`] - Envelope framing and bounded zlib
//! - [`fflink_assets`] - Asset list layout and payload codecs
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use fflink::prelude::*;
//!
//! let report = fflink::build(Path::new("mp_mymod"), &BuildOptions::default())?;
//! println!("wrote {}", report.archive_path.display());
//!
//! let report = fflink::unpack(&report.archive_path, &UnpackOptions::default())?;
//! println!("{} files extracted", report.summary.written);
//! # Ok::<(), fflink::Error>(())
//! ```

mod config;
mod error;
mod pack;
mod unpack;

pub use fflink_archive as archive;
pub use fflink_assets as assets;
pub use fflink_common as common;

pub use config::{ArchiveExtension, BuildOptions, UnpackOptions, INTERMEDIATE_EXTENSION};
pub use error::{Error, Result};
pub use pack::{build, manifest_path, BuildReport};
pub use unpack::{
    default_output_dir, list, unpack, unpack_with_progress, ArchiveListing, ListingEntry,
    UnpackReport,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{ArchiveExtension, BuildOptions, UnpackOptions};
    pub use fflink_archive::{Envelope, FastFile};
    pub use fflink_assets::{
        Asset, AssetCollection, AssetType, Codec, Manifest, ManifestRow, Payload, Registry,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

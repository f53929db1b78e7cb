//! Asset list codec for fastfiles.
//!
//! This crate handles everything inside the decompressed stream:
//!
//! - [`asset_list`] - The header, asset table and pointer resolution
//! - [`codecs`] - Per-type payload codecs (localized strings, raw files,
//!   string tables, and opt-in map entity / physics preset blobs)
//! - [`Registry`] - Which codecs are enabled, by tag and by manifest name
//! - [`Manifest`] - The `type,path` list driving a build
//! - [`Extractor`] - Writing decoded payloads back out as source files
//!
//! Loading and extraction go through the [`AssetSource`] and [`AssetSink`]
//! traits.
//!
//! # Example
//!
//! ```
//! use fflink_assets::asset_list::{self, EncodeOptions};
//! use fflink_assets::{Extractor, Manifest, MemorySink, MemorySource, Registry};
//!
//! let mut source = MemorySource::new();
//! source.insert("maps/mp/mod.gsc", "main() {}");
//!
//! let registry = Registry::new();
//! let manifest = Manifest::parse("rawfile,maps/mp/mod.gsc\n");
//! let assets = registry.load_manifest(&manifest, &source)?;
//! let bytes = asset_list::encode(&assets, &EncodeOptions::default())?;
//!
//! let (_, entries) = asset_list::decode_all(&bytes, registry)?;
//! let mut sink = MemorySink::new();
//! let mut extractor = Extractor::new(&mut sink, "mp_mod");
//! for entry in &entries {
//!     if let Some(payload) = &entry.payload {
//!         extractor.emit(payload)?;
//!     }
//! }
//! assert_eq!(sink.text("maps/mp/mod.gsc"), Some("main() {}"));
//! # Ok::<(), fflink_assets::Error>(())
//! ```

mod asset;
mod asset_type;
mod error;
mod extract;
mod io;
mod manifest;
mod registry;

pub mod asset_list;
pub mod codecs;

pub use asset::{
    Asset, AssetCollection, Blob, LocalizeEntry, Payload, RawFile, StringTable, StringTableCell,
};
pub use asset_list::{AssetPointer, AssetTableEntry, DecodedEntry, EncodeOptions, PointerLayout};
pub use asset_type::{tag_name, AssetType};
pub use codecs::Codec;
pub use error::{Error, Result};
pub use extract::{ExtractOutcome, ExtractSummary, Extractor};
pub use io::{safe_relative_path, AssetSink, AssetSource, DirSink, DirSource, MemorySink, MemorySource};
pub use manifest::{Manifest, ManifestRow};
pub use registry::Registry;

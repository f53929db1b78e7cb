//! Type tag to codec dispatch.

use log::info;

use crate::asset::AssetCollection;
use crate::asset_type::AssetType;
use crate::codecs::Codec;
use crate::io::AssetSource;
use crate::manifest::{Manifest, ManifestRow};
use crate::{Error, Result};

/// The set of enabled codecs.
///
/// Localized strings, raw files and string tables are always enabled. The
/// blob codecs (map entities, physics presets) are opt-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registry {
    blobs: bool,
}

impl Registry {
    /// Registry with the default codecs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the blob codecs enabled or disabled.
    pub fn with_blobs(enabled: bool) -> Self {
        Self { blobs: enabled }
    }

    /// Whether `codec` takes part in dispatch.
    #[inline]
    pub fn is_enabled(self, codec: Codec) -> bool {
        self.blobs || !codec.is_blob()
    }

    /// Enabled codecs.
    pub fn codecs(self) -> impl Iterator<Item = Codec> {
        Codec::ALL.into_iter().filter(move |&c| self.is_enabled(c))
    }

    pub fn codec_for_type(self, asset_type: AssetType) -> Option<Codec> {
        Codec::for_type(asset_type).filter(|&c| self.is_enabled(c))
    }

    pub fn codec_for_tag(self, tag: u32) -> Option<Codec> {
        AssetType::from_u32(tag).and_then(|t| self.codec_for_type(t))
    }

    /// Look up an enabled codec by manifest name.
    pub fn codec_for_name(self, name: &str) -> Result<Codec> {
        Codec::from_manifest_name(name)
            .filter(|&c| self.is_enabled(c))
            .ok_or_else(|| Error::UnsupportedType(name.to_string()))
    }

    /// Load one manifest row into `collection`.
    pub fn load_row(
        self,
        row: &ManifestRow,
        source: &dyn AssetSource,
        collection: &mut AssetCollection,
    ) -> Result<usize> {
        let codec = self.codec_for_name(&row.type_name)?;
        codec.load(source, &row.path, collection)
    }

    /// Load every manifest row, in order.
    pub fn load_manifest(self, manifest: &Manifest, source: &dyn AssetSource) -> Result<AssetCollection> {
        let mut collection = AssetCollection::new();
        for row in manifest {
            self.load_row(row, source, &mut collection)?;
        }
        info!("loaded {} assets from {} manifest rows", collection.len(), manifest.len());
        Ok(collection)
    }
}

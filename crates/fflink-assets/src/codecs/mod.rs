//! Per-type payload codecs.
//!
//! Each supported asset type has a load (source files to assets), a read
//! (asset list bytes to payload) and a serialize (payload to asset list
//! bytes). Dispatch is a closed enum so adding a type is checked for
//! exhaustiveness everywhere it matters.

pub mod blob;
pub mod localize;
pub mod rawfile;
pub mod stringtable;

use std::borrow::Cow;

use fflink_common::{BinaryReader, BinaryWriter};

use crate::asset::{AssetCollection, Payload};
use crate::asset_list::EncodeOptions;
use crate::asset_type::AssetType;
use crate::io::AssetSource;
use crate::{Error, Result};

/// A payload codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Localize,
    RawFile,
    StringTable,
    MapEnts,
    AddonMapEnts,
    PhysPreset,
}

impl Codec {
    /// Every codec, in manifest-name order.
    pub const ALL: [Codec; 6] = [
        Codec::Localize,
        Codec::RawFile,
        Codec::StringTable,
        Codec::MapEnts,
        Codec::AddonMapEnts,
        Codec::PhysPreset,
    ];

    /// Codec for a type tag, if one exists.
    pub fn for_type(asset_type: AssetType) -> Option<Self> {
        match asset_type {
            AssetType::LocalizeEntry => Some(Codec::Localize),
            AssetType::RawFile => Some(Codec::RawFile),
            AssetType::StringTable => Some(Codec::StringTable),
            AssetType::MapEnts => Some(Codec::MapEnts),
            AssetType::AddonMapEnts => Some(Codec::AddonMapEnts),
            AssetType::PhysPreset => Some(Codec::PhysPreset),
            _ => None,
        }
    }

    pub fn asset_type(self) -> AssetType {
        match self {
            Codec::Localize => AssetType::LocalizeEntry,
            Codec::RawFile => AssetType::RawFile,
            Codec::StringTable => AssetType::StringTable,
            Codec::MapEnts => AssetType::MapEnts,
            Codec::AddonMapEnts => AssetType::AddonMapEnts,
            Codec::PhysPreset => AssetType::PhysPreset,
        }
    }

    /// Name used in the first manifest column.
    pub fn manifest_name(self) -> &'static str {
        match self {
            Codec::Localize => "localize",
            Codec::RawFile => "rawfile",
            Codec::StringTable => "stringtable",
            Codec::MapEnts => "map_ents",
            Codec::AddonMapEnts => "addon_map_ents",
            Codec::PhysPreset => "physpreset",
        }
    }

    /// Look up a codec by manifest name.
    pub fn from_manifest_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.manifest_name() == name)
    }

    /// Whether this is one of the opaque blob codecs.
    #[inline]
    pub fn is_blob(self) -> bool {
        matches!(self, Codec::MapEnts | Codec::AddonMapEnts | Codec::PhysPreset)
    }

    /// Load the assets named by one manifest row and append them.
    ///
    /// Returns the number of assets appended.
    pub fn load(
        self,
        source: &dyn AssetSource,
        path: &str,
        collection: &mut AssetCollection,
    ) -> Result<usize> {
        match self {
            Codec::Localize => localize::load(source, path, collection),
            Codec::RawFile => rawfile::load(source, path, collection),
            Codec::StringTable => stringtable::load(source, path, collection),
            Codec::MapEnts | Codec::AddonMapEnts | Codec::PhysPreset => {
                blob::load(self, source, path, collection)
            }
        }
    }

    /// Read one payload, leaving the reader just past it.
    pub fn read(self, reader: &mut BinaryReader<'_>) -> Result<Payload> {
        match self {
            Codec::Localize => localize::read(reader).map(Payload::Localize),
            Codec::RawFile => rawfile::read(reader).map(Payload::RawFile),
            Codec::StringTable => stringtable::read(reader).map(Payload::StringTable),
            Codec::MapEnts => blob::read(reader).map(Payload::MapEnts),
            Codec::AddonMapEnts => blob::read(reader).map(Payload::AddonMapEnts),
            Codec::PhysPreset => blob::read(reader).map(Payload::PhysPreset),
        }
    }
}

impl Payload {
    /// Append this payload's asset list bytes.
    ///
    /// Only fails when optional raw file compression fails or a length does
    /// not fit its field.
    pub fn serialize(&self, writer: &mut BinaryWriter, options: &EncodeOptions) -> Result<()> {
        match self {
            Payload::Localize(entry) => {
                localize::serialize(writer, entry);
                Ok(())
            }
            Payload::RawFile(raw) => rawfile::serialize(writer, raw, options.compress_rawfiles),
            Payload::StringTable(table) => {
                stringtable::serialize(writer, table);
                Ok(())
            }
            Payload::MapEnts(blob) | Payload::AddonMapEnts(blob) | Payload::PhysPreset(blob) => {
                blob::serialize(writer, blob)
            }
        }
    }
}

/// Decode stored name bytes, reading them as Latin-1 when they are not UTF-8.
///
/// Every byte maps to exactly one character, so nothing is replaced.
pub fn decode_name(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(name) => Cow::Borrowed(name),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Split source text into lines, dropping one trailing `\r` from each.
///
/// A final newline does not start an extra empty line.
pub(crate) fn lines(text: &[u8]) -> impl Iterator<Item = &[u8]> {
    let empty = text.is_empty();
    let body = text.strip_suffix(b"\n").unwrap_or(text);
    body.split(|&b| b == b'\n')
        .filter(move |_| !empty)
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// Convert a length to its 32-bit field.
pub(crate) fn len_u32(name: &[u8], len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::Oversized {
        name: decode_name(name).into_owned(),
        len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_names_round_trip() {
        for codec in Codec::ALL {
            assert_eq!(Codec::from_manifest_name(codec.manifest_name()), Some(codec));
            assert_eq!(Codec::for_type(codec.asset_type()), Some(codec));
        }
        assert_eq!(Codec::from_manifest_name("weapon"), None);
        assert_eq!(Codec::for_type(AssetType::Weapon), None);
    }

    #[test]
    fn test_decode_name() {
        assert!(matches!(decode_name(b"maps/mp/x.gsc"), Cow::Borrowed("maps/mp/x.gsc")));
        assert_eq!(decode_name(b"caf\xE9\xA0x"), "caf\u{e9}\u{a0}x");
    }

    #[test]
    fn test_lines() {
        let split = |text: &[u8]| lines(text).map(<[u8]>::to_vec).collect::<Vec<_>>();
        assert_eq!(split(b"a\r\nb\n"), [b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(split(b"\n"), [Vec::<u8>::new()]);
        assert!(split(b"").is_empty());
    }

    #[test]
    fn test_blob_codecs() {
        let blobs: Vec<_> = Codec::ALL.into_iter().filter(|c| c.is_blob()).collect();
        assert_eq!(blobs, [Codec::MapEnts, Codec::AddonMapEnts, Codec::PhysPreset]);
    }
}

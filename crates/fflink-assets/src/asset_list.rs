//! Asset list encoding and decoding.
//!
//! The asset list is the decompressed content of a fastfile:
//!
//! ```text
//! ZoneMemory               8 x u32, informational
//! scriptStringCount        u32
//! scriptStrings            u32 placeholder
//! assetCount               u32
//! assets                   u32 placeholder
//! scriptStringCount x u32  placeholders
//! scriptStringCount x str  null-terminated
//! assetCount x (type, ptr)
//! payloads
//! ```
//!
//! A table `ptr` of `0xFFFFFFFF` means the payload starts where the previous
//! one ended; anything else is an absolute offset into the asset list.

use fflink_common::{BinaryReader, BinaryWriter, PTR_PLACEHOLDER};
use log::{debug, warn};
use zerocopy::byteorder::{BigEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::asset::{AssetCollection, Payload};
use crate::asset_type::{tag_name, AssetType};
use crate::codecs::len_u32;
use crate::registry::Registry;
use crate::{Error, Result};

/// Zone memory budget record at the start of the asset list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ZoneMemory {
    pub size: U32<BigEndian>,
    pub external_size: U32<BigEndian>,
    /// temp, runtime, virtual, large, physical, extra
    pub streams: [U32<BigEndian>; 6],
}

impl ZoneMemory {
    pub const SIZE: usize = 32;

    /// Budget written by the builder, large enough for any archive it emits.
    pub fn generous() -> Self {
        let budget = U32::new(5_000_000);
        let zero = U32::new(0);
        Self {
            size: budget,
            external_size: zero,
            streams: [budget, zero, zero, budget, zero, zero],
        }
    }
}

/// Where an asset's payload starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AssetPointer {
    /// Right after the previous payload.
    Follows,
    /// At an absolute offset in the asset list.
    Offset(u32),
}

impl AssetPointer {
    pub fn from_raw(raw: u32) -> Self {
        if raw == PTR_PLACEHOLDER {
            AssetPointer::Follows
        } else {
            AssetPointer::Offset(raw)
        }
    }

    pub fn to_raw(self) -> u32 {
        match self {
            AssetPointer::Follows => PTR_PLACEHOLDER,
            AssetPointer::Offset(offset) => offset,
        }
    }
}

/// One `(type, ptr)` asset table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AssetTableEntry {
    pub type_tag: u32,
    pub pointer: AssetPointer,
}

impl AssetTableEntry {
    /// The type, if the tag is a known one.
    pub fn asset_type(&self) -> Option<AssetType> {
        AssetType::from_u32(self.type_tag)
    }

    /// Display name of the tag.
    pub fn type_name(&self) -> &'static str {
        tag_name(self.type_tag)
    }
}

/// Everything in the asset list before the payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetListHeader {
    pub memory: ZoneMemory,
    pub script_strings: Vec<Vec<u8>>,
    pub entries: Vec<AssetTableEntry>,
    /// Offset of the first payload byte
    pub payload_start: usize,
}

/// How table pointers are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerLayout {
    /// Every pointer is the placeholder.
    #[default]
    Sequential,
    /// Every pointer is the payload's absolute offset.
    Absolute,
}

/// Asset list encoder options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    pub pointers: PointerLayout,
    /// zlib-compress raw file content
    pub compress_rawfiles: bool,
}

/// Serialize a collection into an asset list.
pub fn encode(collection: &AssetCollection, options: &EncodeOptions) -> Result<Vec<u8>> {
    let mut writer = BinaryWriter::with_capacity(4096);

    writer.write_struct(&ZoneMemory::generous());
    writer.write_u32(0);
    writer.write_u32(0);
    writer.write_u32(len_u32(b"asset table", collection.len())?);
    writer.write_u32(PTR_PLACEHOLDER);

    let table_start = writer.len();
    for asset in collection {
        writer.write_u32(asset.asset_type().tag());
        writer.write_u32(PTR_PLACEHOLDER);
    }

    for (index, asset) in collection.iter().enumerate() {
        if options.pointers == PointerLayout::Absolute {
            let offset = len_u32(b"asset list", writer.len())?;
            let patched = writer.patch_u32(table_start + index * 8 + 4, offset);
            debug_assert!(patched);
        }
        debug!(
            "asset {index} {} '{}' at {:#x}",
            asset.asset_type(),
            asset.payload().display_name(),
            writer.len()
        );
        asset.payload().serialize(&mut writer, options)?;
    }

    Ok(writer.into_bytes())
}

fn ensure_available(reader: &BinaryReader<'_>, needed: usize) -> Result<()> {
    if needed > reader.remaining() {
        return Err(Error::Truncated {
            needed,
            available: reader.remaining(),
        });
    }
    Ok(())
}

/// Parse the header and asset table.
pub fn decode(data: &[u8]) -> Result<AssetListHeader> {
    let mut reader = BinaryReader::new(data);

    let memory: ZoneMemory = reader.read_struct()?;
    let script_string_count = reader.read_u32()? as usize;
    reader.skip(4)?;
    let asset_count = reader.read_u32()? as usize;
    reader.skip(4)?;

    // A placeholder and at least a terminator per script string
    ensure_available(&reader, script_string_count.saturating_mul(5))?;
    reader.skip(script_string_count * 4)?;

    let mut script_strings = Vec::with_capacity(script_string_count);
    for _ in 0..script_string_count {
        script_strings.push(reader.read_cstring()?.to_vec());
    }

    ensure_available(&reader, asset_count.saturating_mul(8))?;
    let mut entries = Vec::with_capacity(asset_count);
    for _ in 0..asset_count {
        let type_tag = reader.read_u32()?;
        let pointer = AssetPointer::from_raw(reader.read_u32()?);
        entries.push(AssetTableEntry { type_tag, pointer });
    }

    Ok(AssetListHeader {
        memory,
        script_strings,
        entries,
        payload_start: reader.position(),
    })
}

/// Read position over the payload area.
#[derive(Debug, Clone)]
pub struct PayloadCursor<'a> {
    reader: BinaryReader<'a>,
}

impl<'a> PayloadCursor<'a> {
    /// Start at the first payload.
    pub fn new(data: &'a [u8], header: &AssetListHeader) -> Self {
        Self {
            reader: BinaryReader::new_at(data, header.payload_start),
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    /// Move to where entry `index` starts and return that position.
    pub fn resolve(&mut self, index: usize, entry: &AssetTableEntry) -> Result<usize> {
        match entry.pointer {
            AssetPointer::Follows => {}
            AssetPointer::Offset(offset) => {
                let len = self.reader.len();
                if offset as usize >= len {
                    return Err(Error::InvalidOffset { index, offset, len });
                }
                self.reader.seek(offset as usize);
            }
        }
        debug!(
            "asset {index} ({}) at {:#x}",
            entry.type_name(),
            self.reader.position()
        );
        Ok(self.reader.position())
    }

    /// Reader positioned at the current payload.
    #[inline]
    pub fn reader(&mut self) -> &mut BinaryReader<'a> {
        &mut self.reader
    }
}

/// One asset table entry with its decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEntry {
    pub index: usize,
    pub entry: AssetTableEntry,
    /// Where the payload starts
    pub offset: usize,
    /// `None` when no enabled codec handles the type
    pub payload: Option<Payload>,
}

/// Iterator decoding payloads in table order.
///
/// Entries whose type has no enabled codec are logged and yielded without
/// a payload; the cursor does not move past them.
pub struct Payloads<'a, 'h> {
    entries: std::iter::Enumerate<std::slice::Iter<'h, AssetTableEntry>>,
    cursor: PayloadCursor<'a>,
    registry: Registry,
}

impl<'a, 'h> Payloads<'a, 'h> {
    pub fn new(data: &'a [u8], header: &'h AssetListHeader, registry: Registry) -> Self {
        Self {
            entries: header.entries.iter().enumerate(),
            cursor: PayloadCursor::new(data, header),
            registry,
        }
    }

    fn decode_entry(&mut self, index: usize, entry: AssetTableEntry) -> Result<DecodedEntry> {
        let offset = self.cursor.resolve(index, &entry)?;

        let payload = match self.registry.codec_for_tag(entry.type_tag) {
            Some(codec) => Some(codec.read(self.cursor.reader())?),
            None => {
                warn!(
                    "skipping asset {index}: unsupported type {} ({:#04x})",
                    entry.type_name(),
                    entry.type_tag
                );
                None
            }
        };

        Ok(DecodedEntry {
            index,
            entry,
            offset,
            payload,
        })
    }
}

impl Iterator for Payloads<'_, '_> {
    type Item = Result<DecodedEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, entry) = self.entries.next()?;
        Some(self.decode_entry(index, *entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

/// Decode the header and every payload.
pub fn decode_all(data: &[u8], registry: Registry) -> Result<(AssetListHeader, Vec<DecodedEntry>)> {
    let header = decode(data)?;
    let entries = Payloads::new(data, &header, registry).collect::<Result<Vec<_>>>()?;
    Ok((header, entries))
}

//! In-memory asset model.
//!
//! Names and text are kept as the bytes stored in the archive. Assets are
//! commonly Latin-1 or Windows-1252, so nothing is decoded until a name has
//! to become a path.

use std::borrow::Cow;

use crate::asset_type::AssetType;
use crate::codecs::decode_name;

/// One typed unit of content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Asset {
    /// Source-relative path the asset was loaded from
    path: String,
    /// Type-specific record, including the stored name
    payload: Payload,
}

impl Asset {
    pub fn new(path: impl Into<String>, payload: Payload) -> Self {
        Self {
            path: path.into(),
            payload,
        }
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The type tag, derived from the payload variant.
    #[inline]
    pub fn asset_type(&self) -> AssetType {
        self.payload.asset_type()
    }
}

/// Type-specific asset records.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Payload {
    Localize(LocalizeEntry),
    RawFile(RawFile),
    StringTable(StringTable),
    MapEnts(Blob),
    AddonMapEnts(Blob),
    PhysPreset(Blob),
}

impl Payload {
    /// The type tag this payload is written under.
    pub fn asset_type(&self) -> AssetType {
        match self {
            Payload::Localize(_) => AssetType::LocalizeEntry,
            Payload::RawFile(_) => AssetType::RawFile,
            Payload::StringTable(_) => AssetType::StringTable,
            Payload::MapEnts(_) => AssetType::MapEnts,
            Payload::AddonMapEnts(_) => AssetType::AddonMapEnts,
            Payload::PhysPreset(_) => AssetType::PhysPreset,
        }
    }

    /// The stored name as raw bytes (the key for localized strings).
    pub fn name_bytes(&self) -> &[u8] {
        match self {
            Payload::Localize(entry) => &entry.key,
            Payload::RawFile(raw) => &raw.name,
            Payload::StringTable(table) => &table.name,
            Payload::MapEnts(blob) | Payload::AddonMapEnts(blob) | Payload::PhysPreset(blob) => {
                &blob.name
            }
        }
    }

    /// The stored name for display, read as Latin-1 when it is not UTF-8.
    pub fn display_name(&self) -> Cow<'_, str> {
        decode_name(self.name_bytes())
    }
}

/// A single localized string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LocalizeEntry {
    /// Fully qualified key, e.g. `MENU_START_GAME`
    pub key: Vec<u8>,
    /// English text
    pub value: Vec<u8>,
}

/// An arbitrary file stored by name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RawFile {
    pub name: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub content: Vec<u8>,
}

/// A rectangular table of strings, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StringTable {
    pub name: Vec<u8>,
    pub columns: u32,
    pub rows: u32,
    /// `columns * rows` cells in row-major order
    pub cells: Vec<StringTableCell>,
}

/// One string table cell with its lookup hash.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StringTableCell {
    pub text: Vec<u8>,
    pub hash: i32,
}

impl StringTableCell {
    /// Create a cell, hashing its bytes.
    pub fn new(text: impl Into<Vec<u8>>) -> Self {
        let text = text.into();
        let hash = fflink_common::hash::string_table_hash_bytes(&text);
        Self { text, hash }
    }
}

impl StringTable {
    /// Build a table from parsed rows.
    ///
    /// The column count is the length of the longest row; shorter rows are
    /// padded on the right with empty cells.
    pub fn from_rows(name: impl Into<Vec<u8>>, rows: Vec<Vec<Vec<u8>>>) -> Self {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut cells = Vec::with_capacity(columns * rows.len());

        for row in rows.iter() {
            for column in 0..columns {
                let text = row.get(column).map(Vec::as_slice).unwrap_or(&[]);
                cells.push(StringTableCell::new(text));
            }
        }

        Self {
            name: name.into(),
            columns: columns as u32,
            rows: rows.len() as u32,
            cells,
        }
    }

    /// Iterate over the rows as cell slices.
    pub fn row_cells(&self) -> impl Iterator<Item = &[StringTableCell]> {
        // chunks() panics on zero, and a zero-column table has no cells anyway
        self.cells.chunks(self.columns.max(1) as usize)
    }

    /// Get a cell by row and column.
    pub fn cell(&self, row: u32, column: u32) -> Option<&StringTableCell> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells.get((row * self.columns + column) as usize)
    }
}

/// An opaque named byte blob (map entities, physics presets).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Blob {
    pub name: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub content: Vec<u8>,
}

/// An ordered, append-only list of assets.
///
/// Insertion order is the order assets are written to the archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetCollection {
    assets: Vec<Asset>,
}

impl AssetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an asset.
    #[inline]
    pub fn push(&mut self, asset: Asset) {
        self.assets.push(asset);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Asset> {
        self.assets.iter()
    }
}

impl<'a> IntoIterator for &'a AssetCollection {
    type Item = &'a Asset;
    type IntoIter = std::slice::Iter<'a, Asset>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

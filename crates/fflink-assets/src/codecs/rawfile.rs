//! Raw file codec.
//!
//! Layout: `ptr compressedLen len ptr name\0` then either `compressedLen`
//! bytes of zlib data, or `len` bytes of content and a null terminator when
//! `compressedLen` is zero.

use fflink_archive::compression;
use fflink_common::{BinaryReader, BinaryWriter, PTR_PLACEHOLDER};
use log::{debug, info, warn};

use super::{decode_name, len_u32};
use crate::asset::{Asset, AssetCollection, Payload, RawFile};
use crate::io::AssetSource;
use crate::{Error, Result};

pub(crate) fn load(
    source: &dyn AssetSource,
    path: &str,
    collection: &mut AssetCollection,
) -> Result<usize> {
    let content = source.read(path)?;
    info!("rawfile {path} ({} bytes)", content.len());

    collection.push(Asset::new(
        path,
        Payload::RawFile(RawFile {
            name: path.into(),
            content,
        }),
    ));
    Ok(1)
}

pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<RawFile> {
    reader.skip(4)?;
    let compressed_len = reader.read_u32()? as usize;
    let len = reader.read_u32()? as usize;
    reader.skip(4)?;
    let name = reader.read_cstring()?.to_vec();

    if compressed_len == 0 {
        let content = reader.read_bytes(len)?.to_vec();
        if reader.read_u8()? != 0 {
            warn!("raw file '{}' is not null-terminated", decode_name(&name));
        }
        return Ok(RawFile { name, content });
    }

    let stored = reader.read_bytes(compressed_len)?;
    let content = match compression::decompress(stored, len) {
        Ok(inflated) if !inflated.is_empty() => inflated,
        result if compressed_len == len => {
            // Some producers set both lengths and store the bytes uncompressed
            debug!("raw file '{}' stored uncompressed ({result:?})", decode_name(&name));
            stored.to_vec()
        }
        Ok(_) => {
            return Err(Error::DecompressionFailed {
                name: decode_name(&name).into_owned(),
                reason: "stream produced no data".to_string(),
            })
        }
        Err(err) => {
            return Err(Error::DecompressionFailed {
                name: decode_name(&name).into_owned(),
                reason: err.to_string(),
            })
        }
    };

    Ok(RawFile { name, content })
}

pub(crate) fn serialize(writer: &mut BinaryWriter, raw: &RawFile, compress: bool) -> Result<()> {
    let len = len_u32(&raw.name, raw.content.len())?;

    if compress && !raw.content.is_empty() {
        let compressed = compression::compress(&raw.content)?;
        writer.write_u32(PTR_PLACEHOLDER);
        writer.write_u32(len_u32(&raw.name, compressed.len())?);
        writer.write_u32(len);
        writer.write_u32(PTR_PLACEHOLDER);
        writer.write_cstring(&raw.name);
        writer.write_bytes(&compressed);
        return Ok(());
    }

    writer.write_u32(PTR_PLACEHOLDER);
    writer.write_u32(0);
    writer.write_u32(len);
    writer.write_u32(PTR_PLACEHOLDER);
    writer.write_cstring(&raw.name);
    writer.write_bytes(&raw.content);
    writer.write_u8(0);
    Ok(())
}

/// Keep printable ASCII, turning non-breaking spaces into spaces.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter_map(|c| match c {
            '\u{A0}' => Some(' '),
            ' '..='~' => Some(c),
            _ => None,
        })
        .collect()
}

/// File stem of the last path component, trimmed and lower-cased.
pub fn normalize_for_compare(path: &str) -> String {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    };
    stem.trim_matches(|c: char| c.is_whitespace())
        .to_lowercase()
}

/// Whether `name` looks like a file generated for the archive itself.
///
/// `output_name` is the normalized output name; an empty one matches nothing.
pub fn is_self_reference(name: &str, output_name: &str) -> bool {
    if output_name.is_empty() {
        return false;
    }
    let normalized = normalize_for_compare(name);
    normalized == output_name || normalized.contains(output_name) || name.contains(output_name)
}

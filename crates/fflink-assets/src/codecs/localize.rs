//! Localized string codec.
//!
//! Source files are `.str` files under `english/localizedstrings/`:
//!
//! ```text
//! REFERENCE START_GAME
//! LANG_ENGLISH "Start \"game\""
//! ```
//!
//! Every `LANG_ENGLISH` line becomes one asset whose key is the upper-cased
//! file stem, an underscore, and the current `REFERENCE`. Values are byte
//! strings and pass through unchanged apart from escapes.

use fflink_common::{BinaryReader, BinaryWriter, PTR_PLACEHOLDER};
use log::info;

use super::{decode_name, lines};
use crate::asset::{Asset, AssetCollection, LocalizeEntry, Payload};
use crate::io::AssetSource;
use crate::{Error, Result};

/// Directory holding `.str` files, relative to the source root.
pub const SOURCE_DIR: &str = "english/localizedstrings";

/// Prefix used on extraction for keys without an underscore.
pub const DEFAULT_PREFIX: &str = "default";

/// One `REFERENCE` / `LANG_ENGLISH` pair from a `.str` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrEntry {
    pub reference: Vec<u8>,
    pub value: Vec<u8>,
}

/// Path of the `.str` file a manifest row refers to.
pub fn source_path(path: &str) -> String {
    format!("{SOURCE_DIR}/{path}.str")
}

fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Parse `.str` source bytes.
///
/// `path` is only used in error messages.
pub fn parse_str(text: &[u8], path: &str) -> Result<Vec<StrEntry>> {
    let mut entries = Vec::new();
    let mut reference: Option<Vec<u8>> = None;

    for (number, line) in lines(text).enumerate() {
        let start = line.iter().position(|&b| b != b' ' && b != b'\t').unwrap_or(line.len());
        let line = &line[start..];

        if let Some(rest) = line.strip_prefix(b"REFERENCE") {
            let first = rest.iter().position(|&b| !is_blank(b));
            let last = rest.iter().rposition(|&b| !is_blank(b));
            if let (Some(first), Some(last)) = (first, last) {
                reference = Some(rest[first..=last].to_vec());
            }
        } else if line.starts_with(b"LANG_ENGLISH") {
            let open = line.iter().position(|&b| b == b'"');
            let close = line.iter().rposition(|&b| b == b'"');
            let (Some(open), Some(close)) = (open, close) else {
                continue;
            };
            if close <= open {
                continue;
            }

            let Some(reference) = &reference else {
                return Err(Error::Grammar {
                    path: path.to_string(),
                    message: format!("line {}: LANG_ENGLISH before any REFERENCE", number + 1),
                });
            };

            entries.push(StrEntry {
                reference: reference.clone(),
                value: unescape(&line[open + 1..close]),
            });
        }
    }

    Ok(entries)
}

/// Resolve backslash escapes. Unknown escapes are kept verbatim.
pub fn unescape(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter().copied();

    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        match bytes.next() {
            Some(b'n') => out.push(b'\n'),
            Some(b't') => out.push(b'\t'),
            Some(b'r') => out.push(b'\r'),
            Some(b'\\') => out.push(b'\\'),
            Some(b'"') => out.push(b'"'),
            Some(b'0') => out.push(0),
            Some(other) => out.extend_from_slice(&[b'\\', other]),
            None => out.push(b'\\'),
        }
    }
    out
}

/// Escape a value for a `LANG_ENGLISH` line.
pub fn escape(value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for &b in value {
        match b {
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'"' => out.extend_from_slice(b"\\\""),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            b => out.push(b),
        }
    }
    out
}

/// Split a stored key into its lower-cased file prefix and reference.
///
/// ```
/// use fflink_assets::codecs::localize::split_key;
///
/// assert_eq!(split_key(b"MENU_START_GAME"), ("menu".to_string(), &b"START_GAME"[..]));
/// assert_eq!(split_key(b"PLAIN"), ("default".to_string(), &b"PLAIN"[..]));
/// ```
pub fn split_key(key: &[u8]) -> (String, &[u8]) {
    match key.iter().position(|&b| b == b'_') {
        Some(at) => (decode_name(&key[..at]).to_ascii_lowercase(), &key[at + 1..]),
        None => (DEFAULT_PREFIX.to_string(), key),
    }
}

/// Render one `.str` block.
pub fn format_block(reference: &[u8], value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(reference.len() + value.len() + 32);
    out.extend_from_slice(b"REFERENCE ");
    out.extend_from_slice(reference);
    out.extend_from_slice(b"\nLANG_ENGLISH \"");
    out.extend_from_slice(&escape(value));
    out.extend_from_slice(b"\"\n");
    out
}

pub(crate) fn load(
    source: &dyn AssetSource,
    path: &str,
    collection: &mut AssetCollection,
) -> Result<usize> {
    let file = source_path(path);
    let text = source.read(&file)?;

    let entries = parse_str(&text, &file)?;
    if entries.is_empty() {
        return Err(Error::Grammar {
            path: file,
            message: "no LANG_ENGLISH entries".to_string(),
        });
    }

    let prefix = file_stem(path).to_ascii_uppercase();
    let count = entries.len();
    for entry in entries {
        let mut key = Vec::with_capacity(prefix.len() + 1 + entry.reference.len());
        key.extend_from_slice(prefix.as_bytes());
        key.push(b'_');
        key.extend_from_slice(&entry.reference);

        info!("localize {}", decode_name(&key));
        collection.push(Asset::new(
            path,
            Payload::Localize(LocalizeEntry {
                key,
                value: entry.value,
            }),
        ));
    }

    Ok(count)
}

/// Last path component without its extension.
fn file_stem(path: &str) -> &str {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<LocalizeEntry> {
    reader.skip(8)?;
    let value = reader.read_cstring()?.to_vec();
    let key = reader.read_cstring()?.to_vec();
    Ok(LocalizeEntry { key, value })
}

pub(crate) fn serialize(writer: &mut BinaryWriter, entry: &LocalizeEntry) {
    writer.write_u32(PTR_PLACEHOLDER);
    writer.write_u32(PTR_PLACEHOLDER);
    writer.write_cstring(&entry.value);
    writer.write_cstring(&entry.key);
}

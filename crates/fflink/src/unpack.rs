//! The unpack pipeline: archive to source tree and manifest.

use std::fs;
use std::path::{Path, PathBuf};

use fflink_archive::FastFile;
use fflink_assets::asset_list::{self, Payloads};
use fflink_assets::{AssetPointer, DirSink, ExtractSummary, Extractor};
use log::info;

use crate::config::UnpackOptions;
use crate::{Error, Result};

/// What an unpack produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnpackReport {
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
    /// Entries in the asset table
    pub asset_count: usize,
    pub summary: ExtractSummary,
}

/// Default output directory: the archive path without its extension.
pub fn default_output_dir(archive: &Path) -> PathBuf {
    archive.with_extension("")
}

/// Unpack an archive.
pub fn unpack(archive: &Path, options: &UnpackOptions) -> Result<UnpackReport> {
    unpack_with_progress(archive, options, |_, _| {})
}

/// Unpack an archive, calling `progress(done, total)` after each entry.
pub fn unpack_with_progress<F>(
    archive: &Path,
    options: &UnpackOptions,
    mut progress: F,
) -> Result<UnpackReport>
where
    F: FnMut(usize, usize),
{
    let fastfile = FastFile::open(archive)?;
    let data = fastfile.inflate_limited(options.max_archive_size)?;
    info!(
        "{}: stream at {:#x}, {} bytes inflated",
        fastfile.name(),
        fastfile.stream_offset(),
        data.len()
    );

    let header = asset_list::decode(&data)?;
    let total = header.entries.len();

    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(archive));
    let output_name = output_dir
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::Unnamed(output_dir.clone()))?;
    fs::create_dir_all(&output_dir).map_err(|e| Error::io(&output_dir, e))?;

    let mut sink = DirSink::new(&output_dir, output_name.as_str());
    let mut extractor = Extractor::new(&mut sink, &output_name);

    for (done, decoded) in Payloads::new(&data, &header, options.registry()).enumerate() {
        match decoded?.payload {
            Some(payload) => {
                extractor.emit(&payload)?;
            }
            None => extractor.record_unknown(),
        }
        progress(done + 1, total);
    }

    let summary = extractor.summary();
    let manifest_path = sink.finish()?;
    info!("wrote manifest {}", manifest_path.display());

    Ok(UnpackReport {
        output_dir,
        manifest_path,
        asset_count: total,
        summary,
    })
}

/// One asset table row of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ListingEntry {
    pub index: usize,
    pub type_tag: u32,
    pub type_name: &'static str,
    pub pointer: AssetPointer,
}

/// The envelope and asset table of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ArchiveListing {
    pub name: String,
    pub stream_offset: usize,
    pub compressed_len: usize,
    pub asset_list_len: usize,
    pub script_strings: usize,
    pub entries: Vec<ListingEntry>,
}

/// Decode the asset table without extracting anything.
pub fn list(archive: &Path, max_archive_size: usize) -> Result<ArchiveListing> {
    let fastfile = FastFile::open(archive)?;
    let data = fastfile.inflate_limited(max_archive_size)?;
    let header = asset_list::decode(&data)?;

    let entries = header
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| ListingEntry {
            index,
            type_tag: entry.type_tag,
            type_name: entry.type_name(),
            pointer: entry.pointer,
        })
        .collect();

    Ok(ArchiveListing {
        name: fastfile.name().to_string(),
        stream_offset: fastfile.stream_offset(),
        compressed_len: fastfile.compressed_len(),
        asset_list_len: data.len(),
        script_strings: header.script_strings.len(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            default_output_dir(Path::new("zone/mp_mymod.ff")),
            PathBuf::from("zone/mp_mymod")
        );
        assert_eq!(default_output_dir(Path::new("mp_mymod.ffm")), PathBuf::from("mp_mymod"));
    }
}

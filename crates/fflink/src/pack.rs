//! The build pipeline: manifest to archive.

use std::fs;
use std::path::{Path, PathBuf};

use fflink_archive::envelope;
use fflink_assets::asset_list::{self, EncodeOptions, PointerLayout};
use fflink_assets::{DirSource, Manifest};
use log::info;

use crate::config::{BuildOptions, INTERMEDIATE_EXTENSION};
use crate::{Error, Result};

/// What a build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BuildReport {
    pub archive_path: PathBuf,
    /// Set when the uncompressed asset list was kept
    pub intermediate_path: Option<PathBuf>,
    pub manifest_rows: usize,
    pub asset_count: usize,
    /// Uncompressed asset list size
    pub asset_list_len: usize,
    pub archive_len: usize,
}

/// Manifest location for a mod directory: `<mod>/zone_source/<mod>.csv`.
pub fn manifest_path(mod_dir: &Path) -> Result<PathBuf> {
    let name = dir_name(mod_dir)?;
    Ok(mod_dir.join("zone_source").join(format!("{name}.csv")))
}

fn dir_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::Unnamed(path.to_path_buf()))
}

/// Build the archive for a mod directory.
///
/// Assets are loaded relative to `mod_dir` in manifest order. The archive
/// is written next to the directory as `<mod>.<ext>`.
pub fn build(mod_dir: &Path, options: &BuildOptions) -> Result<BuildReport> {
    let name = dir_name(mod_dir)?;
    let manifest_path = manifest_path(mod_dir)?;
    if !manifest_path.is_file() {
        return Err(Error::MissingManifest(manifest_path));
    }

    info!("loading manifest {}", manifest_path.display());
    let text = fs::read_to_string(&manifest_path).map_err(|e| Error::io(&manifest_path, e))?;
    let manifest = Manifest::parse(&text);

    let source = DirSource::new(mod_dir);
    let assets = options.registry().load_manifest(&manifest, &source)?;

    let asset_list = asset_list::encode(
        &assets,
        &EncodeOptions {
            pointers: PointerLayout::Sequential,
            compress_rawfiles: options.compress_rawfiles,
        },
    )?;

    let out_dir = mod_dir.parent().unwrap_or_else(|| Path::new(""));
    let archive_path = out_dir.join(format!("{name}.{}", options.extension));

    let intermediate_path = if options.keep_intermediate {
        let path = out_dir.join(format!("{name}.{INTERMEDIATE_EXTENSION}"));
        fs::write(&path, &asset_list).map_err(|e| Error::io(&path, e))?;
        info!("kept asset list {}", path.display());
        Some(path)
    } else {
        None
    };

    let archive = envelope::pack(&asset_list)?;
    fs::write(&archive_path, &archive).map_err(|e| Error::io(&archive_path, e))?;
    info!(
        "wrote {} ({} assets, {} bytes)",
        archive_path.display(),
        assets.len(),
        archive.len()
    );

    Ok(BuildReport {
        archive_path,
        intermediate_path,
        manifest_rows: manifest.len(),
        asset_count: assets.len(),
        asset_list_len: asset_list.len(),
        archive_len: archive.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_path() {
        assert_eq!(
            manifest_path(Path::new("mods/mp_mymod")).unwrap(),
            PathBuf::from("mods/mp_mymod/zone_source/mp_mymod.csv")
        );
    }

    #[test]
    fn test_unnamed_dir() {
        assert!(matches!(manifest_path(Path::new("/")), Err(Error::Unnamed(_))));
    }
}

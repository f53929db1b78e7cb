//! Where assets are loaded from and extracted to.
//!
//! Codecs never touch the filesystem directly. Loading goes through an
//! [`AssetSource`] and extraction through an [`AssetSink`], so the same code
//! runs against a mod directory on disk or an in-memory map in tests.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use hashbrown::{HashMap, HashSet};

use crate::manifest::{Manifest, ManifestRow};
use crate::{Error, Result};

/// Read access to asset source files, addressed by relative path.
pub trait AssetSource {
    /// Read a whole file.
    ///
    /// Text sources are returned as bytes too; they are often not UTF-8.
    fn read(&self, path: &str) -> Result<Vec<u8>>;
}

/// Destination for extracted files and manifest rows.
pub trait AssetSink {
    /// Create or replace a file.
    fn write_file(&mut self, path: &str, contents: &[u8]) -> Result<()>;

    /// Append to a file, creating it on first use.
    fn append_file(&mut self, path: &str, contents: &[u8]) -> Result<()>;

    /// Record one manifest row.
    fn record(&mut self, row: ManifestRow) -> Result<()>;
}

/// Turn an archive-supplied name into a relative path.
///
/// Backslashes are treated as separators. Absolute paths, drive prefixes and
/// `..` components are rejected.
pub fn safe_relative_path(name: &str) -> Result<PathBuf> {
    let normalized = name.replace('\\', "/");
    if normalized.starts_with('/') {
        return Err(Error::UnsafePath(name.to_string()));
    }

    let mut path = PathBuf::new();
    for component in normalized.split('/') {
        match component {
            "" | "." => continue,
            ".." => return Err(Error::UnsafePath(name.to_string())),
            c if c.contains(':') => return Err(Error::UnsafePath(name.to_string())),
            c => path.push(c),
        }
    }

    if path.as_os_str().is_empty() {
        return Err(Error::UnsafePath(name.to_string()));
    }
    Ok(path)
}

/// Asset sources under a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirSource {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.root.join(path);
        fs::read(&full).map_err(|e| Error::io(full, e))
    }
}

/// Asset sources held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl AssetSource for MemorySource {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            Error::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            )
        })
    }
}

/// Extraction into a directory on disk.
///
/// Manifest rows are collected and written to
/// `<root>/zone_source/<manifest_name>.csv` by [`DirSink::finish`].
#[derive(Debug)]
pub struct DirSink {
    root: PathBuf,
    manifest_name: String,
    manifest: Manifest,
    /// Files appended to during this run; the first append truncates
    appended: HashSet<PathBuf>,
}

impl DirSink {
    pub fn new(root: impl Into<PathBuf>, manifest_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            manifest_name: manifest_name.into(),
            manifest: Manifest::new(),
            appended: HashSet::new(),
        }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where [`DirSink::finish`] writes the manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.root
            .join("zone_source")
            .join(format!("{}.csv", self.manifest_name))
    }

    #[inline]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    fn prepare(&self, name: &str) -> Result<PathBuf> {
        let full = self.root.join(safe_relative_path(name)?);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        Ok(full)
    }

    /// Write the manifest and return its path.
    pub fn finish(self) -> Result<PathBuf> {
        let path = self.manifest_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(&path, self.manifest.to_csv()).map_err(|e| Error::io(&path, e))?;
        Ok(path)
    }
}

impl AssetSink for DirSink {
    fn write_file(&mut self, path: &str, contents: &[u8]) -> Result<()> {
        let full = self.prepare(path)?;
        fs::write(&full, contents).map_err(|e| Error::io(full, e))
    }

    fn append_file(&mut self, path: &str, contents: &[u8]) -> Result<()> {
        let full = self.prepare(path)?;
        let first = self.appended.insert(full.clone());

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(!first)
            .truncate(first)
            .open(&full)
            .map_err(|e| Error::io(&full, e))?;
        file.write_all(contents).map_err(|e| Error::io(full, e))
    }

    fn record(&mut self, row: ManifestRow) -> Result<()> {
        self.manifest.push(row);
        Ok(())
    }
}

/// Extraction into memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub files: HashMap<String, Vec<u8>>,
    pub manifest: Manifest,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a file's contents as text.
    pub fn text(&self, path: &str) -> Option<&str> {
        self.files
            .get(path)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

impl AssetSink for MemorySink {
    fn write_file(&mut self, path: &str, contents: &[u8]) -> Result<()> {
        safe_relative_path(path)?;
        self.files.insert(path.to_string(), contents.to_vec());
        Ok(())
    }

    fn append_file(&mut self, path: &str, contents: &[u8]) -> Result<()> {
        safe_relative_path(path)?;
        self.files
            .entry(path.to_string())
            .or_default()
            .extend_from_slice(contents);
        Ok(())
    }

    fn record(&mut self, row: ManifestRow) -> Result<()> {
        self.manifest.push(row);
        Ok(())
    }
}

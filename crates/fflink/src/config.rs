//! Build and unpack options.

use std::fmt;
use std::path::PathBuf;

use fflink_archive::compression::ARCHIVE_OUTPUT_LIMIT;
use fflink_assets::Registry;

/// File extension of a built archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveExtension {
    /// `.ff`
    #[default]
    Ff,
    /// `.ffm`, used for mod archives
    Ffm,
}

impl ArchiveExtension {
    pub fn as_str(self) -> &'static str {
        match self {
            ArchiveExtension::Ff => "ff",
            ArchiveExtension::Ffm => "ffm",
        }
    }
}

impl fmt::Display for ArchiveExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension of the uncompressed asset list kept with `keep_intermediate`.
pub const INTERMEDIATE_EXTENSION: &str = "ffraw";

/// Options for [`build`](crate::build).
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Keep the uncompressed asset list as `<name>.ffraw`
    pub keep_intermediate: bool,
    pub extension: ArchiveExtension,
    /// zlib-compress raw file content inside the asset list
    pub compress_rawfiles: bool,
    /// Enable the map entity and physics preset codecs
    pub experimental_blobs: bool,
}

impl BuildOptions {
    pub fn registry(&self) -> Registry {
        Registry::with_blobs(self.experimental_blobs)
    }
}

/// Options for [`unpack`](crate::unpack).
#[derive(Debug, Clone)]
pub struct UnpackOptions {
    /// Output directory; defaults to the archive path without its extension
    pub output_dir: Option<PathBuf>,
    /// Largest asset list to inflate, in bytes
    pub max_archive_size: usize,
    /// Enable the map entity and physics preset codecs
    pub experimental_blobs: bool,
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self {
            output_dir: None,
            max_archive_size: ARCHIVE_OUTPUT_LIMIT,
            experimental_blobs: false,
        }
    }
}

impl UnpackOptions {
    pub fn registry(&self) -> Registry {
        Registry::with_blobs(self.experimental_blobs)
    }
}

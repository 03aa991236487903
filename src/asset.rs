//! The packaged dataset the local store is provisioned from.
//!
//! The asset is opaque to this crate: its bytes are copied verbatim into the
//! local store location and never interpreted during the copy. Two sources
//! are provided:
//! - [`FileAsset`]: a file shipped next to the application
//! - [`EmbeddedAsset`]: bytes compiled into the binary with `include_bytes!`
//!
//! # Examples
//!
//! ```no_run
//! use openbeerdata::asset::{AssetSource, FileAsset};
//!
//! fn main() -> std::io::Result<()> {
//!     let asset = FileAsset::new("/usr/share/openbeerdata/openbeerdata.db");
//!     let mut reader = asset.open()?;
//!     let mut sink = std::io::sink();
//!     std::io::copy(&mut reader, &mut sink)?;
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

/// A readable, read-only dataset asset.
pub trait AssetSource: Send + Sync + fmt::Debug {
    /// Open a fresh reader positioned at the first byte of the asset.
    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>>;

    /// Human-readable origin, used in logs and error messages.
    fn describe(&self) -> String;
}

/// Asset stored as a regular file.
#[derive(Debug, Clone)]
pub struct FileAsset {
    path: PathBuf,
}

impl FileAsset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AssetSource for FileAsset {
    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(file))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Asset compiled into the binary.
#[derive(Clone, Copy)]
pub struct EmbeddedAsset {
    bytes: &'static [u8],
}

impl EmbeddedAsset {
    pub const fn new(bytes: &'static [u8]) -> Self {
        Self { bytes }
    }
}

impl fmt::Debug for EmbeddedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedAsset")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl AssetSource for EmbeddedAsset {
    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>> {
        Ok(Box::new(Cursor::new(self.bytes)))
    }

    fn describe(&self) -> String {
        format!("<embedded {} bytes>", self.bytes.len())
    }
}

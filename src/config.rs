//! Store configuration.
//!
//! The core never reads the environment; a [`StoreConfig`] is built
//! explicitly by the application and handed to
//! [`StoreManager::new`](crate::manager::StoreManager::new).
//! [`StoreConfig::from_env`] exists for the command-line shell.

use crate::asset::{AssetSource, FileAsset};
use std::path::PathBuf;
use std::sync::Arc;

/// File name of both the bundled asset and the provisioned store
pub const DATABASE_NAME: &str = "openbeerdata.db";

/// Transfer buffer used while copying the asset
pub const DEFAULT_COPY_BUFFER: usize = 8 * 1024;

/// Number of resolved SRM colors kept in memory per open session
pub const DEFAULT_COLOR_CACHE_CAPACITY: u64 = 256;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub asset: Arc<dyn AssetSource>,
    pub data_dir: PathBuf,
    pub file_name: String,
    pub copy_buffer_size: usize,
    pub color_cache_capacity: u64,
}

impl StoreConfig {
    pub fn new(asset: impl AssetSource + 'static, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            asset: Arc::new(asset),
            data_dir: data_dir.into(),
            file_name: DATABASE_NAME.to_string(),
            copy_buffer_size: DEFAULT_COPY_BUFFER,
            color_cache_capacity: DEFAULT_COLOR_CACHE_CAPACITY,
        }
    }

    /// Resolve the asset and data directory from the environment.
    ///
    /// - data dir: `OBD_DATA_DIR`, else `$XDG_DATA_HOME/openbeerdata`,
    ///   else `$HOME/.local/share/openbeerdata`
    /// - asset: `OBD_ASSET`, else `./openbeerdata.db`
    pub fn from_env() -> Self {
        let asset = std::env::var_os("OBD_ASSET")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DATABASE_NAME));
        Self::new(FileAsset::new(asset), default_data_dir())
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Zero is bumped to one byte so the copy loop always makes progress.
    pub fn with_copy_buffer_size(mut self, size: usize) -> Self {
        self.copy_buffer_size = size.max(1);
        self
    }

    pub fn with_color_cache_capacity(mut self, capacity: u64) -> Self {
        self.color_cache_capacity = capacity;
        self
    }

    /// Full path of the provisioned store
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

/// Default application data directory (~/.local/share/openbeerdata or equivalent)
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("OBD_DATA_DIR") {
        PathBuf::from(dir)
    } else if let Some(data_home) = std::env::var_os("XDG_DATA_HOME") {
        PathBuf::from(data_home).join("openbeerdata")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share/openbeerdata")
    } else {
        PathBuf::from(".local/share/openbeerdata")
    }
}

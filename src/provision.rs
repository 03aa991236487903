//! Store provisioning - materializing the bundled dataset on first use.
//!
//! The dataset ships as an opaque SQLite file. Before any query runs, a local
//! copy must exist at the store path. [`Provisioner::ensure_provisioned`]
//! checks for a usable store and, if there is none, streams the asset into
//! place:
//!
//! ```text
//! asset ──copy──▶ <data_dir>/openbeerdata.db.tmp ──verify──▶ rename ──▶ <data_dir>/openbeerdata.db
//! ```
//!
//! The copy is written to a sibling temp file, flushed and synced, checked
//! against the SHA-256 digest computed while streaming, checked to open as a
//! SQLite database, and only then renamed over the store path. A failed or
//! interrupted copy therefore never leaves a file that the next check would
//! accept.
//!
//! # Examples
//!
//! ```no_run
//! use openbeerdata::asset::FileAsset;
//! use openbeerdata::provision::{ProvisionOutcome, Provisioner};
//! use std::sync::Arc;
//!
//! fn main() -> openbeerdata::Result<()> {
//!     let provisioner = Provisioner::new(
//!         Arc::new(FileAsset::new("assets/openbeerdata.db")),
//!         "/var/lib/obd/openbeerdata.db",
//!         8 * 1024,
//!     );
//!
//!     match provisioner.ensure_provisioned()? {
//!         ProvisionOutcome::Copied { bytes, .. } => println!("installed {} bytes", bytes),
//!         ProvisionOutcome::AlreadyPresent => println!("already installed"),
//!     }
//!     Ok(())
//! }
//! ```

use crate::asset::AssetSource;
use crate::config::StoreConfig;
use crate::error::{ObdError, Result};
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// What a provisioning call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// A usable store was already in place; nothing was written.
    AlreadyPresent,
    /// The asset was copied into place.
    Copied { bytes: u64, sha256: String },
}

#[derive(Debug)]
pub struct Provisioner {
    asset: Arc<dyn AssetSource>,
    target: PathBuf,
    buffer_size: usize,
    lock: Mutex<()>,
}

impl Provisioner {
    pub fn new(asset: Arc<dyn AssetSource>, target: impl Into<PathBuf>, buffer_size: usize) -> Self {
        Self {
            asset,
            target: target.into(),
            buffer_size: buffer_size.max(1),
            lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(
            Arc::clone(&config.asset),
            config.store_path(),
            config.copy_buffer_size,
        )
    }

    /// Path of the provisioned store
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Whether a usable store currently exists at the target path
    pub fn is_provisioned(&self) -> bool {
        is_valid_store(&self.target)
    }

    /// Make sure a queryable copy of the dataset exists at the target path.
    ///
    /// Cheap when the store is already in place. Concurrent callers are
    /// serialized, so at most one of them copies.
    ///
    /// # Errors
    ///
    /// Returns [`ObdError::Provisioning`] if the asset cannot be read, the
    /// destination cannot be written, or the copy does not verify.
    #[instrument(skip(self), fields(target = %self.target.display()))]
    pub fn ensure_provisioned(&self) -> Result<ProvisionOutcome> {
        let _guard = self.lock.lock();

        if is_valid_store(&self.target) {
            debug!("Store already provisioned");
            return Ok(ProvisionOutcome::AlreadyPresent);
        }

        self.install()
    }

    fn install(&self) -> Result<ProvisionOutcome> {
        let temp_path = temp_path_for(&self.target);

        let (bytes, sha256) = match self.copy_to(&temp_path) {
            Ok(copied) => copied,
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&temp_path, &self.target) {
            let _ = fs::remove_file(&temp_path);
            return Err(ObdError::provisioning(
                &self.target,
                format!("cannot move copy into place: {}", e),
            ));
        }

        info!(
            asset = %self.asset.describe(),
            bytes,
            sha256 = %sha256,
            "Provisioned dataset"
        );

        Ok(ProvisionOutcome::Copied { bytes, sha256 })
    }

    /// Stream the asset into `temp_path`, returning (bytes, hex digest).
    fn copy_to(&self, temp_path: &Path) -> Result<(u64, String)> {
        let fail = |reason: String| ObdError::provisioning(&self.target, reason);

        if let Some(parent) = self.target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| fail(format!("cannot create {}: {}", parent.display(), e)))?;
        }

        // Leftover from an earlier failed attempt
        if temp_path.exists() {
            warn!(path = %temp_path.display(), "Removing stale temp file");
            if let Err(e) = fs::remove_file(temp_path) {
                warn!(path = %temp_path.display(), error = %e, "Could not remove stale temp file");
            }
        }

        let mut input = self
            .asset
            .open()
            .map_err(|e| fail(format!("cannot read asset {}: {}", self.asset.describe(), e)))?;
        let mut output = File::create(temp_path)
            .map_err(|e| fail(format!("cannot create {}: {}", temp_path.display(), e)))?;

        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; self.buffer_size];
        let mut total: u64 = 0;

        loop {
            let n = match input.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(fail(format!("asset read interrupted: {}", e))),
            };
            output
                .write_all(&buffer[..n])
                .map_err(|e| fail(format!("write interrupted: {}", e)))?;
            hasher.update(&buffer[..n]);
            total += n as u64;
        }

        output
            .flush()
            .and_then(|_| output.sync_all())
            .map_err(|e| fail(format!("cannot flush copy: {}", e)))?;
        drop(output);

        let expected = format!("{:x}", hasher.finalize());
        let written = file_sha256(temp_path).map_err(|e| fail(format!("cannot verify copy: {}", e)))?;
        if written != expected {
            return Err(fail("copy does not match asset checksum".to_string()));
        }

        if !is_valid_store(temp_path) {
            return Err(fail(format!(
                "asset {} is not a SQLite database",
                self.asset.describe()
            )));
        }

        debug!(bytes = total, "Asset copied to temp file");
        Ok((total, expected))
    }
}

/// A store is usable if it is a non-empty file that opens read-only and
/// answers a query against the schema table.
fn is_valid_store(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(m) if m.is_file() && m.len() > 0 => {}
        _ => return false,
    }

    let conn = match Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY) {
        Ok(conn) => conn,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Store failed to open");
            return false;
        }
    };

    match conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    }) {
        Ok(_) => true,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Store failed validation query");
            false
        }
    }
}

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

fn file_sha256(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0; 8192];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

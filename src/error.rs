use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObdError {
    /// The bundled dataset could not be materialized into the local store.
    ///
    /// Fatal for `open()`: no store handle is handed out after this.
    #[error("Failed to provision dataset at {}: {reason}", path.display())]
    Provisioning { path: PathBuf, reason: String },

    /// A catalog or color operation was called on an adapter that is not open.
    #[error("Store is not open; call open() first")]
    NotOpen,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ObdError {
    pub(crate) fn provisioning(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        ObdError::Provisioning {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ObdError>;

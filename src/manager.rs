//! Shared ownership of the open store.
//!
//! A [`StoreManager`] is built once by the application and shared by `Arc`
//! with every [`ObdAdapter`]. It owns the single SQLite connection and counts
//! the adapters currently holding it:
//!
//! ```text
//! adapter.open()  ──▶ acquire ──▶ first user?  provision + open connection
//! adapter.close() ──▶ release ──▶ last user?   close connection + drop session
//! ```
//!
//! All of acquire/release/provisioning runs under one mutex, so two threads
//! can never both start a session or both copy the asset. Once a session is
//! torn down the next `open()` starts from scratch: provisioning check, new
//! connection, fresh color cache.

use crate::adapter::ObdAdapter;
use crate::color::{ColorPair, ColorResolver};
use crate::config::StoreConfig;
use crate::error::Result;
use crate::provision::Provisioner;
use parking_lot::{Mutex, ReentrantMutex};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StoreManager {
    config: StoreConfig,
    state: Mutex<Option<Session>>,
}

struct Session {
    provisioner: Provisioner,
    handle: Option<Arc<StoreHandle>>,
    users: usize,
}

/// The open connection shared by all adapters of one session.
///
/// The connection lock is re-entrant: a thread that already holds it (for
/// example while streaming rows) may run further lookups on the same
/// connection. Other threads wait.
pub struct StoreHandle {
    conn: ReentrantMutex<Connection>,
    colors: ColorResolver,
}

impl StoreManager {
    pub fn new(config: StoreConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            state: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// New, not yet opened adapter backed by this manager
    pub fn adapter(self: &Arc<Self>) -> ObdAdapter {
        ObdAdapter::new(Arc::clone(self))
    }

    /// Number of adapters currently holding the store open
    pub fn open_users(&self) -> usize {
        self.state.lock().as_ref().map_or(0, |s| s.users)
    }

    /// Whether the underlying connection is currently open
    pub fn is_connected(&self) -> bool {
        self.state
            .lock()
            .as_ref()
            .is_some_and(|s| s.handle.is_some())
    }

    pub(crate) fn acquire(&self) -> Result<Arc<StoreHandle>> {
        let mut state = self.state.lock();

        let session = match &mut *state {
            Some(session) => session,
            slot @ None => slot.insert(Session::start(&self.config)?),
        };

        match session.checkout(&self.config) {
            Ok(handle) => {
                debug!(users = session.users, "Store handle acquired");
                Ok(handle)
            }
            Err(e) => {
                if session.users == 0 {
                    *state = None;
                }
                Err(e)
            }
        }
    }

    pub(crate) fn release(&self, handle: Arc<StoreHandle>) {
        let mut state = self.state.lock();
        drop(handle);

        let Some(session) = state.as_mut() else {
            return;
        };

        session.users = session.users.saturating_sub(1);
        if session.users > 0 {
            debug!(users = session.users, "Store handle released");
            return;
        }

        if let Some(session) = state.take() {
            session.shutdown();
        }
    }
}

impl Session {
    /// First construction provisions the store.
    fn start(config: &StoreConfig) -> Result<Self> {
        let provisioner = Provisioner::from_config(config);
        provisioner.ensure_provisioned()?;
        Ok(Self {
            provisioner,
            handle: None,
            users: 0,
        })
    }

    fn checkout(&mut self, config: &StoreConfig) -> Result<Arc<StoreHandle>> {
        // No-op unless the store vanished since the session started
        self.provisioner.ensure_provisioned()?;

        let handle = match &self.handle {
            Some(handle) => Arc::clone(handle),
            None => {
                let handle = Arc::new(StoreHandle::open(
                    self.provisioner.target(),
                    config.color_cache_capacity,
                )?);
                self.handle = Some(Arc::clone(&handle));
                handle
            }
        };

        self.users += 1;
        Ok(handle)
    }

    fn shutdown(self) {
        let Some(handle) = self.handle else {
            return;
        };

        match Arc::try_unwrap(handle) {
            Ok(handle) => handle.close(),
            Err(_) => warn!("Store handle still referenced at shutdown; leaving it to drop"),
        }
    }
}

impl StoreHandle {
    fn open(path: &Path, color_cache_capacity: u64) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        info!(path = %path.display(), "Opened store");
        Ok(Self {
            conn: ReentrantMutex::new(conn),
            colors: ColorResolver::new(color_cache_capacity),
        })
    }

    /// Run `f` with exclusive use of the connection.
    pub(crate) fn with_connection<R>(&self, f: impl FnOnce(&Connection) -> Result<R>) -> Result<R> {
        let conn = self.conn.lock();
        f(&conn)
    }

    pub(crate) fn resolve_color(&self, key: &str) -> Result<ColorPair> {
        self.with_connection(|conn| self.colors.resolve(conn, key))
    }

    fn close(self) {
        let conn = self.conn.into_inner();
        match conn.close() {
            Ok(()) => info!("Closed store"),
            Err((_, e)) => warn!(error = %e, "Store did not close cleanly"),
        }
    }
}

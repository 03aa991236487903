//! Per-caller access to the reference dataset.
//!
//! An [`ObdAdapter`] is what UI code holds on to. It is cheap to create,
//! shares the store through its [`StoreManager`], and must be opened before
//! any query runs.
//!
//! # Examples
//!
//! ```no_run
//! use openbeerdata::{FileAsset, StoreConfig, StoreManager};
//!
//! fn main() -> openbeerdata::Result<()> {
//!     let config = StoreConfig::new(FileAsset::new("openbeerdata.db"), "/tmp/obd");
//!     let manager = StoreManager::new(config);
//!
//!     let mut adapter = manager.adapter();
//!     adapter.open()?;
//!
//!     for category in adapter.list_categories()? {
//!         println!("{:>3} {}", category.id, category.name);
//!     }
//!
//!     // Stream a large list without collecting it
//!     let count = adapter.with_rows(&openbeerdata::Query::hops(), |rows| {
//!         Ok(rows.filter_map(|r| r.ok()).count())
//!     })?;
//!     println!("{} hops", count);
//!
//!     adapter.close();
//!     Ok(())
//! }
//! ```

use crate::catalog::{
    CatalogRow, FermentableDetail, FermentableSummary, FermentableType, HopDetail, HopSubstitute,
    HopSummary, Query, RowIter, StyleCategory, SubcategoryDetail, SubcategorySummary,
};
use crate::color::ColorPair;
use crate::error::{ObdError, Result};
use crate::manager::{StoreHandle, StoreManager};
use rusqlite::OptionalExtension;
use std::sync::Arc;
use tracing::instrument;

pub struct ObdAdapter {
    manager: Arc<StoreManager>,
    handle: Option<Arc<StoreHandle>>,
}

impl ObdAdapter {
    pub fn new(manager: Arc<StoreManager>) -> Self {
        Self {
            manager,
            handle: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Open the shared store, provisioning it first if needed.
    ///
    /// Opening an adapter that is already open does nothing.
    ///
    /// # Errors
    ///
    /// [`ObdError::Provisioning`] if the dataset could not be installed, or
    /// [`ObdError::Sqlite`] if the installed store fails to open.
    pub fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Ok(());
        }
        self.handle = Some(self.manager.acquire()?);
        Ok(())
    }

    /// Release this adapter's hold on the store. The connection itself is
    /// closed only when the last open adapter closes.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.manager.release(handle);
        }
    }

    fn handle(&self) -> Result<&StoreHandle> {
        self.handle.as_deref().ok_or(ObdError::NotOpen)
    }

    /// Execute `query` and hand its rows to `f`.
    ///
    /// The statement and the connection are held only for the duration of
    /// `f`, and are released however `f` returns. Other lookups on this
    /// adapter may be made from inside `f`.
    #[instrument(skip_all, fields(sql = query.sql()))]
    pub fn with_rows<T, R>(
        &self,
        query: &Query<T>,
        f: impl FnOnce(RowIter<'_, T>) -> Result<R>,
    ) -> Result<R>
    where
        T: CatalogRow,
    {
        self.handle()?.with_connection(|conn| {
            let mut stmt = conn.prepare_cached(query.sql())?;
            let rows = stmt.query(rusqlite::params_from_iter(query.params()))?;
            f(RowIter::new(rows))
        })
    }

    /// Execute `query` and collect every row.
    pub fn fetch_all<T: CatalogRow>(&self, query: &Query<T>) -> Result<Vec<T>> {
        self.with_rows(query, |rows| rows.collect())
    }

    /// Execute `query` and return its first row, if any.
    pub fn fetch_first<T: CatalogRow>(&self, query: &Query<T>) -> Result<Option<T>> {
        self.with_rows(query, |mut rows| rows.next().transpose())
    }

    pub fn list_categories(&self) -> Result<Vec<StyleCategory>> {
        self.fetch_all(&Query::categories())
    }

    pub fn list_subcategories(&self, category_id: i64) -> Result<Vec<SubcategorySummary>> {
        self.fetch_all(&Query::subcategories(category_id))
    }

    pub fn subcategory_detail(&self, subcategory_id: i64) -> Result<Option<SubcategoryDetail>> {
        self.fetch_first(&Query::subcategory_detail(subcategory_id))
    }

    pub fn list_fermentable_types(&self) -> Result<Vec<FermentableType>> {
        self.fetch_all(&Query::fermentable_types())
    }

    pub fn list_fermentables(&self, type_id: i64) -> Result<Vec<FermentableSummary>> {
        self.fetch_all(&Query::fermentables(type_id))
    }

    pub fn fermentable_detail(&self, fermentable_id: i64) -> Result<Option<FermentableDetail>> {
        self.fetch_first(&Query::fermentable_detail(fermentable_id))
    }

    pub fn list_hops(&self) -> Result<Vec<HopSummary>> {
        self.fetch_all(&Query::hops())
    }

    pub fn hop_detail(&self, hop_id: i64) -> Result<Option<HopDetail>> {
        self.fetch_first(&Query::hop_detail(hop_id))
    }

    pub fn list_hop_substitutes(&self, hop_id: i64) -> Result<Vec<HopSubstitute>> {
        self.fetch_all(&Query::hop_substitutes(hop_id))
    }

    /// Background and text colors for an SRM value.
    ///
    /// Keys with no swatch row get the fallback pair; that is not an error.
    pub fn resolve_color(&self, srm: &str) -> Result<ColorPair> {
        self.handle()?.resolve_color(srm)
    }

    /// Version stamp of the shipped dataset, if it carries one
    pub fn dataset_version(&self) -> Result<Option<String>> {
        self.handle()?.with_connection(|conn| {
            let has_table: bool = conn.query_row(
                "SELECT count(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'db_version'",
                [],
                |row| row.get(0),
            )?;
            if !has_table {
                return Ok(None);
            }

            let version = conn
                .query_row(
                    "SELECT version FROM db_version ORDER BY _id DESC LIMIT 1",
                    [],
                    |row| row.get::<_, Option<String>>(0),
                )
                .optional()?;
            Ok(version.flatten())
        })
    }
}

impl Drop for ObdAdapter {
    fn drop(&mut self) {
        self.close();
    }
}

//! Open Beer Data - bundled homebrewing reference data
//!
//! The dataset (BJCP style guidelines, fermentables, hops and their
//! substitutes, SRM colors) ships as a read-only SQLite file. This crate
//! installs it into a local data directory on first use and answers a fixed
//! set of lookup queries over it. Brewing calculators live in
//! [`calculators`].

pub mod adapter;
pub mod asset;
pub mod calculators;
pub mod catalog;
pub mod color;
pub mod config;
pub mod error;
pub mod manager;
pub mod provision;

// Re-export commonly used types
pub use adapter::ObdAdapter;
pub use asset::{AssetSource, EmbeddedAsset, FileAsset};
pub use catalog::{
    FermentableDetail, FermentableSummary, FermentableType, HopDetail, HopSubstitute, HopSummary,
    Query, RowIter, StyleCategory, SubcategoryDetail, SubcategorySummary,
};
pub use color::{ColorPair, Rgb};
pub use config::StoreConfig;
pub use error::{ObdError, Result};
pub use manager::StoreManager;
pub use provision::{ProvisionOutcome, Provisioner};

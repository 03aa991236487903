//! The fixed catalog of read queries over the reference dataset.
//!
//! Every query is a [`Query<T>`]: static SQL text, bound parameters and the
//! row type `T` it produces. Parameters are always bound, never spliced into
//! the SQL text.
//!
//! | Query | Table | Order |
//! |---|---|---|
//! | [`Query::categories`] | `bjcp_categories` | `_id` |
//! | [`Query::subcategories`] | `bjcp_subcategories` | `_id` |
//! | [`Query::subcategory_detail`] | `bjcp_subcategories` | - |
//! | [`Query::fermentable_types`] | `fermentable_types` | `type` |
//! | [`Query::fermentables`] | `fermentables` | `name` |
//! | [`Query::fermentable_detail`] | `fermentables` | - |
//! | [`Query::hops`] | `hops` | `name` |
//! | [`Query::hop_detail`] | `hops` | - |
//! | [`Query::hop_substitutes`] | `hops_substitutes` ⋈ `hops` | - |
//!
//! Results are read through a [`RowIter`]: lazy, forward-only and consumed
//! once. See [`ObdAdapter::with_rows`](crate::adapter::ObdAdapter::with_rows).

use crate::error::{ObdError, Result};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Row, Rows};
use serde::Serialize;
use std::marker::PhantomData;

/// Decode one result row into a typed record.
pub trait CatalogRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// A catalog query producing rows of type `T`
#[derive(Debug, Clone)]
pub struct Query<T> {
    sql: &'static str,
    params: Vec<Value>,
    _row: PhantomData<fn() -> T>,
}

impl<T> Query<T> {
    fn new(sql: &'static str, params: Vec<Value>) -> Self {
        Self {
            sql,
            params,
            _row: PhantomData,
        }
    }

    pub fn sql(&self) -> &'static str {
        self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

impl Query<StyleCategory> {
    pub fn categories() -> Self {
        Self::new(
            "SELECT _id, name FROM bjcp_categories ORDER BY _id ASC",
            vec![],
        )
    }
}

impl Query<SubcategorySummary> {
    pub fn subcategories(category_id: i64) -> Self {
        Self::new(
            "SELECT _id, name, display_id FROM bjcp_subcategories \
             WHERE bjcp_category_id = ?1 ORDER BY _id ASC",
            vec![Value::Integer(category_id)],
        )
    }
}

impl Query<SubcategoryDetail> {
    pub fn subcategory_detail(subcategory_id: i64) -> Self {
        Self::new(
            "SELECT _id, name, display_id, aroma, appearance, flavor, mouthfeel, \
             impression, comments, ingredients, og_low, og_high, fg_low, fg_high, \
             ibu_low, ibu_high, srm_low, srm_high, abv_low, abv_high, examples \
             FROM bjcp_subcategories WHERE _id = ?1",
            vec![Value::Integer(subcategory_id)],
        )
    }
}

impl Query<FermentableType> {
    pub fn fermentable_types() -> Self {
        Self::new(
            "SELECT _id, type FROM fermentable_types ORDER BY type ASC",
            vec![],
        )
    }
}

impl Query<FermentableSummary> {
    pub fn fermentables(type_id: i64) -> Self {
        Self::new(
            "SELECT _id, supplier, name FROM fermentables \
             WHERE type_id = ?1 ORDER BY name ASC",
            vec![Value::Integer(type_id)],
        )
    }
}

impl Query<FermentableDetail> {
    pub fn fermentable_detail(fermentable_id: i64) -> Self {
        Self::new(
            "SELECT _id, supplier, name, notes, color FROM fermentables WHERE _id = ?1",
            vec![Value::Integer(fermentable_id)],
        )
    }
}

impl Query<HopSummary> {
    pub fn hops() -> Self {
        Self::new(
            "SELECT _id, name, origin FROM hops ORDER BY name ASC",
            vec![],
        )
    }
}

impl Query<HopDetail> {
    pub fn hop_detail(hop_id: i64) -> Self {
        Self::new(
            "SELECT _id, name, origin, alpha_low, alpha_high, notes FROM hops WHERE _id = ?1",
            vec![Value::Integer(hop_id)],
        )
    }
}

impl Query<HopSubstitute> {
    pub fn hop_substitutes(hop_id: i64) -> Self {
        Self::new(
            "SELECT hops._id AS _id, hops.name AS name \
             FROM hops_substitutes JOIN hops ON (hops_substitutes.substitute_id = hops._id) \
             WHERE hops_substitutes.hop_id = ?1",
            vec![Value::Integer(hop_id)],
        )
    }
}

/// Forward-only iterator over the rows of one executed query.
///
/// Borrows the prepared statement, so it cannot outlive the scope that
/// executed the query.
pub struct RowIter<'stmt, T> {
    rows: Rows<'stmt>,
    _row: PhantomData<fn() -> T>,
}

impl<'stmt, T> RowIter<'stmt, T> {
    pub(crate) fn new(rows: Rows<'stmt>) -> Self {
        Self {
            rows,
            _row: PhantomData,
        }
    }
}

impl<T: CatalogRow> Iterator for RowIter<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.rows.next() {
            Ok(Some(row)) => Some(T::from_row(row).map_err(ObdError::from)),
            Ok(None) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// BJCP style category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleCategory {
    pub id: i64,
    pub name: String,
}

/// BJCP style subcategory, as listed under its category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategorySummary {
    pub id: i64,
    pub name: String,
    /// Guideline identifier such as "14B"
    pub display_id: String,
}

/// Full guideline text and vital statistics for one subcategory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryDetail {
    pub id: i64,
    pub name: String,
    pub display_id: String,
    pub aroma: Option<String>,
    pub appearance: Option<String>,
    pub flavor: Option<String>,
    pub mouthfeel: Option<String>,
    pub impression: Option<String>,
    pub comments: Option<String>,
    pub ingredients: Option<String>,
    pub og_low: Option<f64>,
    pub og_high: Option<f64>,
    pub fg_low: Option<f64>,
    pub fg_high: Option<f64>,
    pub ibu_low: Option<f64>,
    pub ibu_high: Option<f64>,
    pub srm_low: Option<f64>,
    pub srm_high: Option<f64>,
    pub abv_low: Option<f64>,
    pub abv_high: Option<f64>,
    pub examples: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FermentableType {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FermentableSummary {
    pub id: i64,
    pub supplier: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FermentableDetail {
    pub id: i64,
    pub supplier: Option<String>,
    pub name: String,
    pub notes: Option<String>,
    /// Color in degrees Lovibond
    pub color: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HopSummary {
    pub id: i64,
    pub name: String,
    pub origin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HopDetail {
    pub id: i64,
    pub name: String,
    pub origin: Option<String>,
    pub alpha_low: Option<f64>,
    pub alpha_high: Option<f64>,
    pub notes: Option<String>,
}

/// A hop that can stand in for another
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HopSubstitute {
    pub id: i64,
    pub name: String,
}

impl CatalogRow for StyleCategory {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("_id")?,
            name: row.get("name")?,
        })
    }
}

impl CatalogRow for SubcategorySummary {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("_id")?,
            name: row.get("name")?,
            display_id: row.get("display_id")?,
        })
    }
}

impl CatalogRow for SubcategoryDetail {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("_id")?,
            name: row.get("name")?,
            display_id: row.get("display_id")?,
            aroma: row.get("aroma")?,
            appearance: row.get("appearance")?,
            flavor: row.get("flavor")?,
            mouthfeel: row.get("mouthfeel")?,
            impression: row.get("impression")?,
            comments: row.get("comments")?,
            ingredients: row.get("ingredients")?,
            og_low: numeric(row, "og_low")?,
            og_high: numeric(row, "og_high")?,
            fg_low: numeric(row, "fg_low")?,
            fg_high: numeric(row, "fg_high")?,
            ibu_low: numeric(row, "ibu_low")?,
            ibu_high: numeric(row, "ibu_high")?,
            srm_low: numeric(row, "srm_low")?,
            srm_high: numeric(row, "srm_high")?,
            abv_low: numeric(row, "abv_low")?,
            abv_high: numeric(row, "abv_high")?,
            examples: row.get("examples")?,
        })
    }
}

impl CatalogRow for FermentableType {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("_id")?,
            kind: row.get("type")?,
        })
    }
}

impl CatalogRow for FermentableSummary {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("_id")?,
            supplier: row.get("supplier")?,
            name: row.get("name")?,
        })
    }
}

impl CatalogRow for FermentableDetail {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("_id")?,
            supplier: row.get("supplier")?,
            name: row.get("name")?,
            notes: row.get("notes")?,
            color: numeric(row, "color")?,
        })
    }
}

impl CatalogRow for HopSummary {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("_id")?,
            name: row.get("name")?,
            origin: row.get("origin")?,
        })
    }
}

impl CatalogRow for HopDetail {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("_id")?,
            name: row.get("name")?,
            origin: row.get("origin")?,
            alpha_low: numeric(row, "alpha_low")?,
            alpha_high: numeric(row, "alpha_high")?,
            notes: row.get("notes")?,
        })
    }
}

impl CatalogRow for HopSubstitute {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("_id")?,
            name: row.get("name")?,
        })
    }
}

/// Read a `numeric` column. The dataset was loaded from CSV/JSON, so a range
/// may be an integer, a real, numeric text, or blank.
fn numeric(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<f64>> {
    Ok(match row.get_ref(column)? {
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => Some(f),
        ValueRef::Text(t) => std::str::from_utf8(t)
            .ok()
            .and_then(|s| s.trim().parse().ok()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

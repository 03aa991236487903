//! SRM color resolution.
//!
//! The SRM key plays two roles. It is the lookup key into `srm_colors`,
//! bound as text exactly as the caller supplied it, so SQLite's numeric
//! affinity rules decide what matches. It is also parsed as a number to pick
//! the text color: black below 12.7 SRM, white otherwise. The key is never
//! normalized by this crate.

use crate::error::Result;
use moka::sync::Cache;
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Keys strictly below this SRM get black text
pub const TEXT_THRESHOLD_SRM: f64 = 12.7;

/// Background used when the key has no swatch row
pub const FALLBACK_BACKGROUND: Rgb = Rgb::new(6, 2, 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Opaque packed ARGB, as UI toolkits take colors
    pub fn argb(&self) -> u32 {
        0xff00_0000 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Background swatch plus a readable text color on top of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorPair {
    pub background: Rgb,
    pub text: Rgb,
}

impl ColorPair {
    /// Pair for a key given the swatch row it matched, if any.
    pub fn for_swatch(key: &str, swatch: Option<Rgb>) -> Self {
        match swatch {
            Some(background) => Self {
                background,
                text: text_color_for(key),
            },
            None => Self::fallback(),
        }
    }

    pub const fn fallback() -> Self {
        Self {
            background: FALLBACK_BACKGROUND,
            text: Rgb::WHITE,
        }
    }
}

/// Black below the threshold, white at or above it. A key that does not
/// parse as a number gets white.
fn text_color_for(key: &str) -> Rgb {
    match key.trim().parse::<f64>() {
        Ok(srm) if srm < TEXT_THRESHOLD_SRM => Rgb::BLACK,
        _ => Rgb::WHITE,
    }
}

/// Resolves SRM keys against the store, remembering answers for the life
/// of one open session.
pub(crate) struct ColorResolver {
    cache: Cache<String, ColorPair>,
}

impl ColorResolver {
    pub(crate) fn new(capacity: u64) -> Self {
        Self {
            cache: Cache::new(capacity),
        }
    }

    pub(crate) fn resolve(&self, conn: &Connection, key: &str) -> Result<ColorPair> {
        if let Some(pair) = self.cache.get(key) {
            return Ok(pair);
        }

        let swatch = lookup_swatch(conn, key)?;
        if swatch.is_none() {
            debug!(srm = key, "No swatch row, using fallback color");
        }

        let pair = ColorPair::for_swatch(key, swatch);
        self.cache.insert(key.to_string(), pair);
        Ok(pair)
    }
}

fn lookup_swatch(conn: &Connection, key: &str) -> Result<Option<Rgb>> {
    let mut stmt = conn.prepare_cached("SELECT r, g, b FROM srm_colors WHERE srm = ?1")?;
    let swatch = stmt
        .query_row([key], |row| {
            Ok(Rgb::new(
                channel(row.get(0)?),
                channel(row.get(1)?),
                channel(row.get(2)?),
            ))
        })
        .optional()?;
    Ok(swatch)
}

fn channel(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

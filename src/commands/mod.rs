//! Command implementations for the obd CLI
//!
//! - **styles**: BJCP categories, styles, SRM colors and dataset version
//! - **ingredients**: fermentables and hops
//! - **calc**: brewing calculators (no store needed)
//! - **utils**: shared output helpers (internal)

pub mod calc;
pub mod ingredients;
pub mod styles;
pub(crate) mod utils;

/// How results are printed
pub struct Output {
    pub json: bool,
}

//! Shared output helpers for command implementations

use colored::{ColoredString, Colorize, control};
use openbeerdata::ColorPair;
use serde::Serialize;

/// Color output settings read from the environment.
///
/// `NO_COLOR` (https://no-color.org/) beats everything, then a non-zero
/// `CLICOLOR_FORCE`, then `CLICOLOR=0`. With none of them set, swatches and
/// styling are shown only on a terminal.
#[derive(Debug, Clone, Default, PartialEq)]
struct ColorEnv {
    no_color: bool,
    clicolor_force: Option<String>,
    clicolor: Option<String>,
}

impl ColorEnv {
    fn from_env() -> Self {
        Self {
            no_color: std::env::var_os("NO_COLOR").is_some(),
            clicolor_force: std::env::var("CLICOLOR_FORCE").ok(),
            clicolor: std::env::var("CLICOLOR").ok(),
        }
    }

    fn use_color(&self, is_tty: bool) -> bool {
        if self.no_color {
            return false;
        }
        if self.clicolor_force.as_deref().is_some_and(|v| v != "0") {
            return true;
        }
        if self.clicolor.as_deref() == Some("0") {
            return false;
        }
        is_tty
    }
}

/// Decide once at startup whether swatches and styling are printed.
pub fn init_colors() {
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stdout());
    control::set_override(ColorEnv::from_env().use_color(is_tty));
}

pub(super) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(super) fn heading(text: &str) {
    println!("{} {}", "==>".bold().blue(), text.bold());
}

/// `label` painted in the pair's text color on its background
pub(super) fn swatch(pair: &ColorPair, label: &str) -> ColoredString {
    let ColorPair { background, text } = pair;
    label
        .truecolor(text.r, text.g, text.b)
        .on_truecolor(background.r, background.g, background.b)
}

pub(super) fn text_or_dash(value: Option<&str>) -> &str {
    match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => "-",
    }
}

/// "low - high" with trailing zeros trimmed, or "-" when neither end is known
pub(super) fn range(low: Option<f64>, high: Option<f64>) -> String {
    match (low, high) {
        (Some(l), Some(h)) if l == h => number(l),
        (Some(l), Some(h)) => format!("{} - {}", number(l), number(h)),
        (Some(v), None) | (None, Some(v)) => number(v),
        (None, None) => "-".to_string(),
    }
}

fn number(value: f64) -> String {
    let s = format!("{:.3}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_formatting() {
        assert_eq!(range(Some(1.040), Some(1.052)), "1.04 - 1.052");
        assert_eq!(range(Some(8.0), Some(8.0)), "8");
        assert_eq!(range(None, Some(4.5)), "4.5");
        assert_eq!(range(None, None), "-");
    }

    #[test]
    fn test_color_env_precedence() {
        let plain = ColorEnv::default();
        assert!(plain.use_color(true));
        assert!(!plain.use_color(false));

        let forced = ColorEnv {
            clicolor_force: Some("1".to_string()),
            clicolor: Some("0".to_string()),
            ..Default::default()
        };
        assert!(forced.use_color(false));

        let no_color = ColorEnv {
            no_color: true,
            ..forced.clone()
        };
        assert!(!no_color.use_color(true));

        let off = ColorEnv {
            clicolor_force: Some("0".to_string()),
            clicolor: Some("0".to_string()),
            ..Default::default()
        };
        assert!(!off.use_color(true));
    }

    #[test]
    fn test_text_or_dash() {
        assert_eq!(text_or_dash(Some("Citrus")), "Citrus");
        assert_eq!(text_or_dash(Some("  ")), "-");
        assert_eq!(text_or_dash(None), "-");
    }
}

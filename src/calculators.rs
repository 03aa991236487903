//! Brewing calculators.
//!
//! Plain formulas for recipe planning. Inputs are US units (feet, °F,
//! pounds, quarts per pound, inches). Nothing here touches the store.
//!
//! Every result goes through [`round_to_decimals`], which truncates toward
//! zero after scaling rather than rounding: `round_to_decimals(2.999, 2)` is
//! `2.99`. Callers depend on that bias, so it is kept as-is.

use serde::Serialize;
use std::f64::consts::PI;

/// Scale by `10^decimals`, truncate toward zero into an `i32`, scale back.
///
/// The `i32` conversion saturates, so magnitudes beyond `i32::MAX / 10^n`
/// are clamped and NaN becomes zero.
pub fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let truncated = (value * scale) as i32;
    truncated as f64 / scale
}

/// Boiling point of water (°F) at an altitude in feet
pub fn boiling_point_at_altitude(altitude: f64) -> f64 {
    let pressure = 29.921 * (1.0 - 6.8753 * 0.000001 * altitude).powf(5.2559);
    let boiling_point = 49.161 * pressure.ln() + 44.932;
    round_to_decimals(boiling_point, 1)
}

/// Specific gravity corrected for a sample read at `temperature` °F
/// (hydrometer calibrated at 60 °F)
pub fn hydrometer_correction(gravity: f64, temperature: f64) -> f64 {
    let correction = 1.313454 - (0.132674 * temperature)
        + (0.002057793 * temperature.powi(2))
        - (0.000002627634 * temperature.powi(3));
    round_to_decimals(gravity + (correction * 0.001), 3)
}

/// Strike water temperature (°F) for the first infusion.
///
/// `ratio` is water to grain in quarts per pound.
pub fn initial_infusion(ratio: f64, grain_temperature: f64, target_temperature: f64) -> f64 {
    let thermo_constant = 0.192;
    round_to_decimals(
        target_temperature
            + thermo_constant * (target_temperature - grain_temperature) / ratio
            + 3.0,
        1,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MashInfusionResults {
    /// Quarts of water to add
    pub volume: f64,
    /// Water to grain ratio after the addition, quarts per pound
    pub ratio: f64,
}

/// Water needed to step the mash from `start_temperature` to
/// `target_temperature` with water at `strike_temperature`.
pub fn mash_infusion(
    ratio: f64,
    start_temperature: f64,
    target_temperature: f64,
    strike_temperature: f64,
    grain_weight: f64,
) -> MashInfusionResults {
    let thermo_constant = 0.2;
    let mash_water = grain_weight * ratio;

    let volume = round_to_decimals(
        (target_temperature - start_temperature) * (thermo_constant * grain_weight + mash_water)
            / (strike_temperature - target_temperature),
        2,
    );
    let ratio = round_to_decimals((volume + mash_water) / grain_weight, 2);

    MashInfusionResults { volume, ratio }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrainBedResults {
    /// Total mash volume in gallons
    pub mash_volume: f64,
    /// Depth of the grain bed in inches
    pub grain_bed_depth: f64,
}

/// Mash volume in fluid ounces: 42 oz per pound of grain at 1 qt/lb, plus
/// 32 oz for every additional quart per pound.
fn mash_ounces(ratio: f64, grain_weight: f64) -> f64 {
    grain_weight * (42.0 + (ratio - 1.0) * 32.0)
}

fn grain_bed(volume: f64, tun_area: f64) -> GrainBedResults {
    GrainBedResults {
        mash_volume: round_to_decimals(volume / 128.0, 2),
        grain_bed_depth: round_to_decimals(volume * 1.8 / tun_area, 2),
    }
}

/// Grain bed in a rectangular tun (cooler), dimensions in inches
pub fn grain_bed_rect(
    ratio: f64,
    grain_weight: f64,
    tun_width: f64,
    tun_length: f64,
) -> GrainBedResults {
    grain_bed(mash_ounces(ratio, grain_weight), tun_width * tun_length)
}

/// Grain bed in a round tun, diameter in inches
pub fn grain_bed_circle(ratio: f64, grain_weight: f64, tun_diameter: f64) -> GrainBedResults {
    grain_bed(
        mash_ounces(ratio, grain_weight),
        PI * (tun_diameter / 2.0).powi(2),
    )
}

/// Water lost to grain absorption: pounds of grain times the absorption
/// constant of the system (quarts or gallons per pound)
pub fn absorption_loss(grain_weight: f64, constant: f64) -> f64 {
    round_to_decimals(grain_weight * constant, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_decimals_truncates() {
        assert_eq!(round_to_decimals(3.14159, 2), 3.14);
        assert_eq!(round_to_decimals(2.999, 2), 2.99);
        assert_eq!(round_to_decimals(1.5, 0), 1.0);
    }

    #[test]
    fn test_round_to_decimals_negative_truncates_toward_zero() {
        // -1.005 * 100 is -100.49999..., truncated to -100
        assert_eq!(round_to_decimals(-1.005, 2), -1.0);
        assert_eq!(round_to_decimals(-2.999, 2), -2.99);
    }

    #[test]
    fn test_round_to_decimals_saturates_at_i32() {
        assert_eq!(round_to_decimals(1e12, 0), i32::MAX as f64);
        assert_eq!(round_to_decimals(-1e12, 0), i32::MIN as f64);
        assert_eq!(round_to_decimals(f64::NAN, 2), 0.0);
    }

    #[test]
    fn test_boiling_point_at_sea_level() {
        assert_eq!(boiling_point_at_altitude(0.0), 212.0);
    }

    #[test]
    fn test_boiling_point_drops_with_altitude() {
        let sea = boiling_point_at_altitude(0.0);
        let denver = boiling_point_at_altitude(5280.0);
        assert!(denver < sea);
        assert!((denver - 202.4).abs() < 0.2, "got {}", denver);
    }

    #[test]
    fn test_hydrometer_correction() {
        // Near-zero correction at the 60 °F calibration temperature
        assert_eq!(hydrometer_correction(1.050, 60.0), 1.05);
        // Hot sample reads low
        assert!(hydrometer_correction(1.050, 120.0) > 1.050);
    }

    #[test]
    fn test_initial_infusion() {
        // 154 + 0.192 * (154 - 70) / 1.25 + 3 = 169.9024
        assert_eq!(initial_infusion(1.25, 70.0, 154.0), 169.9);
    }

    #[test]
    fn test_mash_infusion() {
        // mash water = 10 * 1.25 = 12.5 qt
        // volume = (154 - 122) * (0.2 * 10 + 12.5) / (210 - 154) = 8.2857...
        // ratio = (8.28 + 12.5) / 10 = 2.078
        let results = mash_infusion(1.25, 122.0, 154.0, 210.0, 10.0);
        assert_eq!(results.volume, 8.28);
        assert_eq!(results.ratio, 2.07);
    }

    #[test]
    fn test_grain_bed_rect() {
        // volume = 10 * (42 + 0.25 * 32) = 500 oz
        // mash volume = 500 / 128 = 3.90625 gal
        // depth = 500 * 1.8 / (10 * 20) = 4.5 in
        let results = grain_bed_rect(1.25, 10.0, 10.0, 20.0);
        assert_eq!(results.mash_volume, 3.9);
        assert_eq!(results.grain_bed_depth, 4.5);
    }

    #[test]
    fn test_grain_bed_circle() {
        // depth = 500 * 1.8 / (pi * 36) = 7.9577...
        let results = grain_bed_circle(1.25, 10.0, 12.0);
        assert_eq!(results.mash_volume, 3.9);
        assert_eq!(results.grain_bed_depth, 7.95);
    }

    #[test]
    fn test_absorption_loss() {
        assert_eq!(absorption_loss(12.0, 0.125), 1.5);
    }

    #[test]
    fn test_division_by_zero_is_not_special_cased() {
        let results = mash_infusion(1.0, 100.0, 150.0, 150.0, 10.0);
        // inf saturates to i32::MAX before scaling back
        assert_eq!(results.volume, i32::MAX as f64 / 100.0);
    }
}

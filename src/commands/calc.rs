//! Calculator commands. These never open the store.

use super::Output;
use super::utils::print_json;
use anyhow::{Result, bail};
use clap::Subcommand;
use colored::Colorize;
use openbeerdata::calculators;

#[derive(Subcommand)]
pub enum CalcCommand {
    /// Boiling point of water at an altitude (feet → °F)
    BoilingPoint {
        /// Altitude in feet
        altitude: f64,
    },

    /// Correct a hydrometer reading for sample temperature
    Hydrometer {
        /// Measured specific gravity (e.g. 1.050)
        gravity: f64,
        /// Sample temperature in °F
        temperature: f64,
    },

    /// Strike water temperature for the initial infusion
    Strike {
        /// Water to grain ratio (qt/lb)
        #[arg(long, default_value_t = 1.25)]
        ratio: f64,
        /// Grain temperature in °F
        #[arg(long)]
        grain_temp: f64,
        /// Target mash temperature in °F
        #[arg(long)]
        target_temp: f64,
    },

    /// Water to add for a mash temperature step
    Infusion {
        /// Current water to grain ratio (qt/lb)
        #[arg(long)]
        ratio: f64,
        /// Current mash temperature in °F
        #[arg(long)]
        start_temp: f64,
        /// Target mash temperature in °F
        #[arg(long)]
        target_temp: f64,
        /// Temperature of the infusion water in °F
        #[arg(long, default_value_t = 210.0)]
        strike_temp: f64,
        /// Grain weight in pounds
        #[arg(long)]
        grain_weight: f64,
    },

    /// Mash volume and grain bed depth for a tun
    GrainBed {
        /// Water to grain ratio (qt/lb)
        #[arg(long)]
        ratio: f64,
        /// Grain weight in pounds
        #[arg(long)]
        grain_weight: f64,
        /// Rectangular tun width in inches
        #[arg(long, requires = "length", conflicts_with = "diameter")]
        width: Option<f64>,
        /// Rectangular tun length in inches
        #[arg(long, requires = "width")]
        length: Option<f64>,
        /// Round tun diameter in inches
        #[arg(long)]
        diameter: Option<f64>,
    },

    /// Water lost to grain absorption
    Absorption {
        /// Grain weight in pounds
        grain_weight: f64,
        /// Absorption per pound of grain
        #[arg(default_value_t = 0.125)]
        constant: f64,
    },
}

pub fn run(out: &Output, command: &CalcCommand) -> Result<()> {
    match *command {
        CalcCommand::BoilingPoint { altitude } => {
            let value = calculators::boiling_point_at_altitude(altitude);
            scalar(out, "boiling_point", value, "°F")
        }
        CalcCommand::Hydrometer {
            gravity,
            temperature,
        } => {
            let value = calculators::hydrometer_correction(gravity, temperature);
            scalar(out, "corrected_gravity", value, "")
        }
        CalcCommand::Strike {
            ratio,
            grain_temp,
            target_temp,
        } => {
            let value = calculators::initial_infusion(ratio, grain_temp, target_temp);
            scalar(out, "strike_temperature", value, "°F")
        }
        CalcCommand::Infusion {
            ratio,
            start_temp,
            target_temp,
            strike_temp,
            grain_weight,
        } => {
            let results = calculators::mash_infusion(
                ratio,
                start_temp,
                target_temp,
                strike_temp,
                grain_weight,
            );
            if out.json {
                return print_json(&results);
            }
            println!("{:<8} {} qt", "Volume".bold(), results.volume);
            println!("{:<8} {} qt/lb", "Ratio".bold(), results.ratio);
            Ok(())
        }
        CalcCommand::GrainBed {
            ratio,
            grain_weight,
            width,
            length,
            diameter,
        } => {
            let results = match (width, length, diameter) {
                (Some(w), Some(l), None) => calculators::grain_bed_rect(ratio, grain_weight, w, l),
                (None, None, Some(d)) => calculators::grain_bed_circle(ratio, grain_weight, d),
                _ => bail!("Give either --width and --length, or --diameter"),
            };
            if out.json {
                return print_json(&results);
            }
            println!("{:<10} {} gal", "Mash".bold(), results.mash_volume);
            println!("{:<10} {} in", "Bed depth".bold(), results.grain_bed_depth);
            Ok(())
        }
        CalcCommand::Absorption {
            grain_weight,
            constant,
        } => {
            let value = calculators::absorption_loss(grain_weight, constant);
            scalar(out, "absorption_loss", value, "")
        }
    }
}

fn scalar(out: &Output, name: &str, value: f64, unit: &str) -> Result<()> {
    if out.json {
        return print_json(&serde_json::json!({ name: value }));
    }
    println!("{}{}", value.to_string().bold(), unit);
    Ok(())
}

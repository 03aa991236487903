mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use openbeerdata::asset::FileAsset;
use openbeerdata::{StoreConfig, StoreManager};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "obd")]
#[command(author, version, about = "Homebrewing reference data and calculators", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding the installed dataset
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Dataset asset to install from on first use
    #[arg(long, global = true)]
    asset: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List BJCP style categories
    Categories,

    /// List the styles in a category
    Styles {
        /// Category id
        category_id: i64,
    },

    /// Show the guidelines for a style
    Style {
        /// Subcategory id
        subcategory_id: i64,
    },

    /// List fermentable types
    FermentableTypes,

    /// List fermentables of a type
    Fermentables {
        /// Fermentable type id
        type_id: i64,
    },

    /// Show a fermentable
    Fermentable {
        /// Fermentable id
        fermentable_id: i64,
    },

    /// List hop varieties
    Hops,

    /// Show a hop and its substitutes
    Hop {
        /// Hop id
        hop_id: i64,
    },

    /// Show the display color for an SRM value
    Color {
        /// SRM value, as stored in the dataset (e.g. 12.7)
        srm: String,
    },

    /// Show the installed dataset version
    Version,

    /// Brewing calculators
    Calc {
        #[command(subcommand)]
        calc: commands::calc::CalcCommand,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    commands::utils::init_colors();

    let out = commands::Output { json: cli.json };

    let command = match cli.command {
        Some(Commands::Calc { calc }) => return commands::calc::run(&out, &calc),
        Some(command) => command,
        None => {
            println!(
                "{} obd - homebrewing reference data",
                "🍺".bold()
            );
            println!("\nRun {} to see available commands.", "obd --help".cyan());
            return Ok(());
        }
    };

    // Composition root: one manager, one adapter for this invocation
    let mut config = StoreConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(asset) = cli.asset {
        config.asset = std::sync::Arc::new(FileAsset::new(asset));
    }

    let manager = StoreManager::new(config);
    let mut adapter = manager.adapter();
    adapter.open().context("Failed to open the Open Beer Data store")?;

    let result = match command {
        Commands::Categories => commands::styles::categories(&adapter, &out),
        Commands::Styles { category_id } => commands::styles::styles(&adapter, &out, category_id),
        Commands::Style { subcategory_id } => {
            commands::styles::style(&adapter, &out, subcategory_id)
        }
        Commands::FermentableTypes => commands::ingredients::fermentable_types(&adapter, &out),
        Commands::Fermentables { type_id } => {
            commands::ingredients::fermentables(&adapter, &out, type_id)
        }
        Commands::Fermentable { fermentable_id } => {
            commands::ingredients::fermentable(&adapter, &out, fermentable_id)
        }
        Commands::Hops => commands::ingredients::hops(&adapter, &out),
        Commands::Hop { hop_id } => commands::ingredients::hop(&adapter, &out, hop_id),
        Commands::Color { srm } => commands::styles::color(&adapter, &out, &srm),
        Commands::Version => commands::styles::version(&adapter, &out),
        Commands::Calc { .. } => Ok(()),
    };

    adapter.close();
    result
}

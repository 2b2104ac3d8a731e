#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `avm`: comparative valuation of Bogotá cadastral blocks.
//!
//! Loads the five datasets once, then either runs a single subcommand or,
//! without one, walks the user through district and block selection.
//!
//! Uses `indicatif-log-bridge` (via [`avm_cli_utils::init_logger`]) so
//! that log lines and the loading bar never fight for the terminal.

mod interactive;
mod report;

use std::path::PathBuf;

use avm_cli_utils::DatasetProgress;
use avm_ingest::AppConfig;
use avm_valuation::district::resolve_district_at;
use avm_valuation::{BlockAnalysis, DistrictSelection, ValuationError};
use avm_valuation_models::Datasets;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "avm", about = "Comparative valuation of Bogotá cadastral blocks")]
struct Cli {
    /// Config file (TOML). The embedded default is used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all districts with their crime statistics
    Districts,
    /// Find the district containing a WGS84 coordinate
    Locate {
        /// Longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
    },
    /// List the blocks of a district
    Blocks {
        /// District name or numeric code
        #[arg(long)]
        district: String,
    },
    /// Run the full analysis for one block
    Analyze {
        /// District name or numeric code
        #[arg(long)]
        district: String,
        /// Block id
        #[arg(long)]
        block: String,
        /// Print the analysis as JSON instead of a text report
        #[arg(long)]
        json: bool,
    },
}

/// Selects a district by numeric code, or by name otherwise.
fn select_district<'a>(
    datasets: &'a Datasets,
    district: &str,
) -> Result<DistrictSelection<'a>, ValuationError> {
    district.trim().parse::<u32>().map_or_else(
        |_| DistrictSelection::by_name(datasets, district.trim()),
        |code| DistrictSelection::by_code(datasets, code),
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = avm_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            log::info!("Using config {}", path.display());
            AppConfig::load(path)?
        }
        None => AppConfig::embedded()?,
    };

    let start = std::time::Instant::now();
    let progress = DatasetProgress::attach(&multi);
    let datasets = avm_ingest::load_datasets(&config, &progress)?;
    log::info!(
        "Loaded {} districts, {} areas and {} blocks in {:.1}s",
        datasets.districts.len(),
        datasets.areas.len(),
        datasets.blocks.len(),
        start.elapsed().as_secs_f64()
    );

    let Some(command) = cli.command else {
        return interactive::run(&datasets, &config.analysis);
    };

    match command {
        Commands::Districts => {
            print!("{}", report::render_districts(&datasets.districts)?);
        }
        Commands::Locate { lon, lat } => {
            match resolve_district_at(&datasets.districts, lon, lat)? {
                Some(district) => println!("{} ({})", district.name, district.code),
                None => println!("No district contains ({lon}, {lat})"),
            }
        }
        Commands::Blocks { district } => {
            let selection = select_district(&datasets, &district)?;
            print!("{}", report::render_blocks(&selection)?);
        }
        Commands::Analyze {
            district,
            block,
            json,
        } => {
            let selection = select_district(&datasets, &district)?;
            let analysis = BlockAnalysis::run(&selection, &block, &config.analysis)
                .inspect_err(|e| log::error!("Failed to analyze block {block}: {e}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print!("{}", report::render_analysis(&analysis)?);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_coordinates() {
        let cli =
            Cli::try_parse_from(["avm", "locate", "--lon", "-74.08", "--lat", "4.61"]).unwrap();
        let Some(Commands::Locate { lon, lat }) = cli.command else {
            panic!("expected locate");
        };
        assert!((lon + 74.08).abs() < 1e-9);
        assert!((lat - 4.61).abs() < 1e-9);
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from([
            "avm",
            "analyze",
            "--district",
            "Teusaquillo",
            "--block",
            "M1",
            "--json",
            "--config",
            "avm.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("avm.toml")));
        assert!(matches!(cli.command, Some(Commands::Analyze { json: true, .. })));
    }

    #[test]
    fn no_subcommand_starts_wizard() {
        let cli = Cli::try_parse_from(["avm"]).unwrap();
        assert!(cli.command.is_none());
    }
}

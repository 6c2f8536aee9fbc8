#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the fatality map.
//!
//! Renders a choropleth figure to a file, prints the highest-total counties
//! for a selection, downloads the county boundary file, or starts the HTTP
//! server. Input locations come from `fatality_map.toml` and the
//! `FATALITY_MAP_*` environment variables.

mod filters;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use fatality_map_analytics_models::AggregationResult;
use fatality_map_geography::COUNTY_BOUNDARIES_URL;
use fatality_map_geography_models::fips;
use fatality_map_ingest::{DataPaths, Dataset, IngestError};

use crate::filters::FilterArgs;

/// Render and serve the fatal accident choropleth.
#[derive(Parser)]
#[command(name = "fatality_map")]
#[command(about = "Render and serve the fatal accident choropleth")]
struct Cli {
    /// Config file with a `[data]` table (default: `fatality_map.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Write the choropleth figure JSON for a selection.
    Render {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output file.
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Print the counties with the highest totals for a selection.
    Totals {
        #[command(flatten)]
        filters: FilterArgs,

        /// Number of counties to print.
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Download the county boundary `GeoJSON`.
    FetchBoundaries {
        /// Source URL.
        #[arg(long, default_value = COUNTY_BOUNDARIES_URL)]
        url: String,

        /// Destination file (default: the configured boundaries path).
        #[arg(long)]
        dest: Option<PathBuf>,
    },

    /// Start the HTTP API server.
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();
    let paths = data_paths(cli.config.as_deref())?;

    match cli.command {
        Commands::Render { filters, output } => {
            let dataset = Dataset::load(&paths)?;
            let result = aggregate(&dataset, &filters)?;
            let figure =
                fatality_map_render::render(&result.totals, result.max_total, &dataset.geography);

            let writer = BufWriter::new(File::create(&output)?);
            serde_json::to_writer(writer, &figure)?;
            log::info!(
                "Wrote {} regions to {} (scale {:?})",
                result.totals.len(),
                output.display(),
                figure.scale_status
            );
        }
        Commands::Totals { filters, top } => {
            let dataset = Dataset::load(&paths)?;
            let result = aggregate(&dataset, &filters)?;
            print_totals(&dataset, &result, top);
        }
        Commands::FetchBoundaries { url, dest } => {
            let dest = dest.unwrap_or(paths.boundaries);
            fatality_map_geography::download_boundaries(&url, &dest).await?;
        }
        Commands::Serve => {
            // The server uses actix-web's runtime, so it runs in a blocking
            // task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(fatality_map_server::run_server(paths))
            })
            .await??;
        }
    }

    Ok(())
}

fn data_paths(config: Option<&Path>) -> Result<DataPaths, IngestError> {
    match config {
        Some(path) => {
            Ok(DataPaths::load(Some(path))?.with_overrides(|var| std::env::var(var).ok()))
        }
        None => DataPaths::from_env(),
    }
}

fn aggregate(
    dataset: &Dataset,
    filters: &FilterArgs,
) -> Result<AggregationResult, Box<dyn std::error::Error>> {
    let mut selection = filters.selection()?;
    dataset.resolve_state(&mut selection);
    log::debug!("Aggregating {selection:?}");

    Ok(fatality_map_analytics::aggregate(
        dataset.events(selection.mode),
        &selection.constraints(),
        &dataset.regions,
    )?)
}

fn print_totals(dataset: &Dataset, result: &AggregationResult, limit: usize) {
    let top = result.top(limit);
    if top.is_empty() {
        println!("No events match this selection.");
        return;
    }

    println!("{:<8} {:<4} {:<22} {:>12}", "REGION", "ST", "STATE", "TOTAL");
    for entry in top {
        let state = dataset
            .regions
            .get(&entry.region_id)
            .map_or("", |r| r.state.as_str());
        println!(
            "{:<8} {:<4} {:<22} {:>12.3}",
            entry.region_id,
            fips::state_abbr(state).unwrap_or("?"),
            fips::state_name(state).unwrap_or("?"),
            entry.total
        );
    }
    println!();
    println!(
        "{} regions, sum {:.3}, scale max {:.3}",
        result.totals.len(),
        result.sum(),
        result.max_total
    );
}

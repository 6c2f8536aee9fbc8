#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County region table and boundary data loading.
//!
//! The region reference table (`fips, STATE, COUNTY`) is read from CSV and
//! defines which counties a map covers. County boundary polygons come from a
//! `GeoJSON` `FeatureCollection` keyed by feature id; they are only consumed
//! by the renderer and are otherwise opaque.

pub mod boundaries;
pub mod regions;

pub use boundaries::{COUNTY_BOUNDARIES_URL, Geography, download_boundaries, load_boundaries};
pub use regions::{load_regions, read_regions};

use thiserror::Error;

/// Errors that can occur during geography operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Reading a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The region table was malformed.
    #[error("Region table error: {0}")]
    RegionTable(#[from] fatality_map_geography_models::RegionTableError),

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the static input tables into memory.
//!
//! All inputs are read once at startup: the historical event table, the
//! model-prediction table, the region reference table, and the county
//! boundaries. The resulting [`Dataset`] is immutable and is shared
//! read-only by every aggregation.

pub mod config;
pub mod events;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use fatality_map_fatality_models::{DataMode, EventRecord, MapSelection};
use fatality_map_geography::{GeoError, Geography};
use fatality_map_geography_models::RegionTable;
use thiserror::Error;

pub use config::DataPaths;
pub use events::{load_events, read_events};

/// Errors that can occur while loading input data.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A file could not be opened.
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        /// The file that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An event table row failed to parse.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The config file is malformed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Region table or boundary loading failed.
    #[error("Geography error: {0}")]
    Geography(#[from] GeoError),
}

/// Every input table, loaded and validated.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Observed events.
    pub historic: Vec<EventRecord>,
    /// Model predictions.
    pub predictions: Vec<EventRecord>,
    /// Displayable regions.
    pub regions: RegionTable,
    /// County boundary polygons.
    pub geography: Geography,
}

impl Dataset {
    /// Loads every table named in `paths`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] if any file is missing or malformed.
    pub fn load(paths: &DataPaths) -> Result<Self, IngestError> {
        let start = Instant::now();

        let historic = load_events(&paths.historic)?;
        let predictions = load_events(&paths.predictions)?;
        let regions = fatality_map_geography::load_regions(&paths.regions)?;
        let geography = fatality_map_geography::load_boundaries(&paths.boundaries)?;

        let dataset = Self {
            historic,
            predictions,
            regions,
            geography,
        };
        dataset.log_coverage();

        log::info!("Dataset loaded in {:.2?}", start.elapsed());
        Ok(dataset)
    }

    /// The event table for a data mode.
    #[must_use]
    pub fn events(&self, mode: DataMode) -> &[EventRecord] {
        match mode {
            DataMode::Historic => &self.historic,
            DataMode::Model => &self.predictions,
        }
    }

    /// Distinct years present in the historical table, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        self.historic
            .iter()
            .filter_map(|e| e.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rewrites the selection's state to the spelling the region table
    /// uses, so `"06"` and `"CA"` select the same counties as `"6"`.
    ///
    /// Unknown states are left as given and yield an empty region table
    /// downstream.
    pub fn resolve_state(&self, selection: &mut MapSelection) {
        if let Some(state) = selection.state.take() {
            let resolved = self
                .regions
                .resolve_state(&state)
                .map_or(state, str::to_string);
            selection.state = Some(resolved);
        }
    }

    fn log_coverage(&self) {
        let without_boundary = self
            .regions
            .iter()
            .filter(|r| !self.geography.contains(&r.region_id))
            .count();
        if without_boundary > 0 {
            log::warn!(
                "{without_boundary} of {} regions have no boundary polygon",
                self.regions.len()
            );
        }

        for (name, events) in [("historic", &self.historic), ("prediction", &self.predictions)] {
            let unknown: BTreeSet<&str> = events
                .iter()
                .map(|e| e.region_id.as_str())
                .filter(|id| self.regions.get(id).is_none())
                .collect();
            if !unknown.is_empty() {
                log::warn!(
                    "{} {name} region ids are not in the region table and will not be displayed",
                    unknown.len()
                );
            }
        }
    }
}

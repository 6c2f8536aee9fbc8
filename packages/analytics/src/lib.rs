#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-county aggregation of fatal accident events.
//!
//! [`aggregate`] turns an event table, a constraint set, and the region
//! reference table into one total per region plus the `max_total` that
//! calibrates the map's color scale. It is a pure function over borrowed
//! inputs, so the loaded tables can be shared by any number of concurrent
//! requests.

pub mod aggregate;

pub use aggregate::{aggregate, aggregate_pairs, max_group_total};

use fatality_map_fatality_models::ConstraintError;
use thiserror::Error;

/// Errors that can occur during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// A constraint named a dimension that cannot be filtered on.
    #[error("Invalid constraint key '{key}': expected one of state, year, day_of_week, hour_bucket")]
    InvalidConstraintKey {
        /// The rejected key.
        key: String,
    },

    /// A constraint value could not be interpreted.
    #[error("Invalid constraint value: {0}")]
    InvalidConstraintValue(ConstraintError),

    /// No regions remain to report on.
    #[error("Empty region table (state restriction: {state:?})")]
    EmptyRegionTable {
        /// State restriction in effect, if any.
        state: Option<String>,
    },
}

impl From<ConstraintError> for AnalyticsError {
    fn from(e: ConstraintError) -> Self {
        match e {
            ConstraintError::InvalidKey { key } => Self::InvalidConstraintKey { key },
            other => Self::InvalidConstraintValue(other),
        }
    }
}

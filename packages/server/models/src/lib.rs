#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the fatality map server.
//!
//! These types are serialized to JSON for the REST API. Query parameters
//! arrive as raw strings so that the "All" position of a slider and
//! malformed values can be told apart and reported consistently.

use fatality_map_fatality_models::{
    ConstraintError, Constraints, DataMode, DayOfWeek, Dimension, HourBucket, MapSelection,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server health information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

/// Query parameters shared by the totals and map endpoints.
///
/// Each filter is optional; a missing, empty, or `all` value leaves the
/// dimension unconstrained.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapQueryParams {
    /// `historic` (default) or `model`.
    pub mode: Option<String>,
    pub year: Option<String>,
    /// Day code (1 = Sunday) or day name.
    pub day_of_week: Option<String>,
    /// Hour bucket index (0-5) or name.
    pub hour: Option<String>,
    /// State code restricting the region universe.
    pub state: Option<String>,
}

/// Returns the trimmed value unless it selects "All".
fn selected(value: Option<&String>) -> Option<&str> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

/// Errors turning query parameters into a [`MapSelection`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// `mode` was neither `historic` nor `model`.
    #[error("invalid mode '{0}': expected historic or model")]
    InvalidMode(String),

    /// A filter value was rejected.
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}

impl TryFrom<MapQueryParams> for MapSelection {
    type Error = QueryError;

    fn try_from(params: MapQueryParams) -> Result<Self, Self::Error> {
        let mode = match selected(params.mode.as_ref()) {
            Some(mode) => mode
                .parse()
                .map_err(|_| QueryError::InvalidMode(mode.to_string()))?,
            None => DataMode::default(),
        };

        // Reuse the constraint parser for value validation.
        let mut constraints = Constraints::default();
        let raw = [
            (Dimension::State, selected(params.state.as_ref())),
            (Dimension::Year, selected(params.year.as_ref())),
            (Dimension::DayOfWeek, selected(params.day_of_week.as_ref())),
            (Dimension::HourBucket, selected(params.hour.as_ref())),
        ];
        for (dimension, value) in raw {
            if let Some(value) = value {
                constraints.set(dimension.as_ref(), value)?;
            }
        }

        Ok(Self {
            mode,
            year: constraints.year,
            day_of_week: constraints.day_of_week,
            hour_bucket: constraints.hour_bucket,
            state: constraints.state,
        })
    }
}

/// A selectable value for a slider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOption {
    /// Value to send back as a query parameter.
    pub value: u8,
    /// Display label.
    pub label: String,
}

/// A selectable data mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiModeOption {
    pub value: DataMode,
    pub label: String,
    /// Whether the year slider applies in this mode.
    pub supports_year: bool,
}

/// Everything a client needs to build the filter controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFilterOptions {
    /// Years present in the historical data, ascending.
    pub years: Vec<i32>,
    pub days_of_week: Vec<ApiOption>,
    pub hours: Vec<ApiOption>,
    pub modes: Vec<ApiModeOption>,
}

impl ApiFilterOptions {
    /// Builds the options for the given set of available years.
    #[must_use]
    pub fn new(years: Vec<i32>) -> Self {
        Self {
            years,
            days_of_week: DayOfWeek::all()
                .iter()
                .map(|d| ApiOption {
                    value: d.value(),
                    label: d.label().to_string(),
                })
                .collect(),
            hours: HourBucket::all()
                .iter()
                .map(|h| ApiOption {
                    value: h.value(),
                    label: h.label().to_string(),
                })
                .collect(),
            modes: DataMode::all()
                .iter()
                .map(|m| ApiModeOption {
                    value: *m,
                    label: m.label().to_string(),
                    supports_year: m.supports_year(),
                })
                .collect(),
        }
    }
}

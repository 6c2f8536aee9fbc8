#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation result types.
//!
//! An [`AggregationResult`] lists one [`RegionTotal`] per region of the
//! (possibly state-restricted) region table, in table order, together with
//! the `max_total` used to calibrate the map's color scale.

use serde::{Deserialize, Serialize};

/// Event total for a single region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionTotal {
    /// Five-digit county FIPS code.
    pub region_id: String,
    /// Summed event count (zero for regions without matching events).
    pub total: f64,
}

/// Output of one aggregation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// Totals in region-table order.
    pub totals: Vec<RegionTotal>,
    /// Largest single-group sum over region × constrained dimensions,
    /// computed before filtering.
    pub max_total: f64,
}

impl AggregationResult {
    /// Sum of all region totals.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.totals.iter().map(|t| t.total).sum()
    }

    /// Total for a region, if it is part of the result.
    #[must_use]
    pub fn get(&self, region_id: &str) -> Option<f64> {
        self.totals
            .iter()
            .find(|t| t.region_id == region_id)
            .map(|t| t.total)
    }

    /// Returns `true` if no region has a positive total.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.totals.iter().all(|t| t.total <= 0.0)
    }

    /// The `limit` regions with the highest totals, highest first.
    ///
    /// Ties keep region-table order. Zero-total regions are skipped.
    #[must_use]
    pub fn top(&self, limit: usize) -> Vec<&RegionTotal> {
        let mut ranked: Vec<&RegionTotal> = self.totals.iter().filter(|t| t.total > 0.0).collect();
        ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
        ranked.truncate(limit);
        ranked
    }
}

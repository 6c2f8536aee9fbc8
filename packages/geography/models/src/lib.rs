#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County region reference types.
//!
//! The [`RegionTable`] defines the full set of displayable counties,
//! including those with no recorded events. Its row order is the order in
//! which aggregation results are reported.

pub mod fips;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A county region as listed in the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Five-digit county FIPS code.
    #[serde(alias = "fips", alias = "FIPS")]
    pub region_id: String,
    /// State code.
    #[serde(alias = "STATE")]
    pub state: String,
    /// County code within the state.
    #[serde(alias = "COUNTY")]
    pub county: String,
}

impl Region {
    #[must_use]
    pub fn new(
        region_id: impl Into<String>,
        state: impl Into<String>,
        county: impl Into<String>,
    ) -> Self {
        Self {
            region_id: region_id.into(),
            state: state.into(),
            county: county.into(),
        }
    }
}

/// Errors building a [`RegionTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionTableError {
    /// The same region id was listed twice.
    #[error("duplicate region id '{region_id}' in region table")]
    DuplicateRegion {
        /// The repeated id.
        region_id: String,
    },
}

/// Ordered, duplicate-free list of regions, indexed by region id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RegionTable {
    regions: Vec<Region>,
    #[serde(skip)]
    index: BTreeMap<String, usize>,
}

impl RegionTable {
    /// Builds a table, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns [`RegionTableError::DuplicateRegion`] if a region id appears
    /// more than once.
    pub fn new(regions: Vec<Region>) -> Result<Self, RegionTableError> {
        let mut index = BTreeMap::new();
        for (position, region) in regions.iter().enumerate() {
            if index.insert(region.region_id.clone(), position).is_some() {
                return Err(RegionTableError::DuplicateRegion {
                    region_id: region.region_id.clone(),
                });
            }
        }
        Ok(Self { regions, index })
    }

    fn from_unique(regions: Vec<Region>) -> Self {
        let index = regions
            .iter()
            .enumerate()
            .map(|(position, region)| (region.region_id.clone(), position))
            .collect();
        Self { regions, index }
    }

    /// Returns the regions belonging to `state`, in table order.
    #[must_use]
    pub fn restrict_to_state(&self, state: &str) -> Self {
        Self::from_unique(
            self.regions
                .iter()
                .filter(|r| r.state == state)
                .cloned()
                .collect(),
        )
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Looks up a region by id.
    #[must_use]
    pub fn get(&self, region_id: &str) -> Option<&Region> {
        self.index
            .get(region_id)
            .and_then(|&position| self.regions.get(position))
    }

    /// Finds the state code used by this table for `input`.
    ///
    /// Accepts the code with or without zero padding (`"6"`, `"06"`) or a
    /// two-letter abbreviation (`"CA"`). Returns `None` if no region
    /// belongs to that state.
    #[must_use]
    pub fn resolve_state(&self, input: &str) -> Option<&str> {
        let wanted = fips::normalize_state(input)
            .or_else(|| fips::abbr_to_fips(input).map(str::to_string))?;
        self.regions
            .iter()
            .map(|r| r.state.as_str())
            .find(|state| fips::normalize_state(state).as_deref() == Some(wanted.as_str()))
    }

    /// Distinct state codes, sorted.
    #[must_use]
    pub fn states(&self) -> Vec<&str> {
        self.regions
            .iter()
            .map(|r| r.state.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl<'a> IntoIterator for &'a RegionTable {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fatal accident event records and the dimensions they can be filtered on.
//!
//! An [`EventRecord`] is one row of either the historical FARS-derived
//! table or the model-prediction table. Both tables share the same shape,
//! so everything downstream (aggregation, rendering, the HTTP API) works
//! on the same type regardless of [`DataMode`].

pub mod constraints;

pub use constraints::{ConstraintError, Constraints, Dimension, MapSelection};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Day of the week an accident occurred on.
///
/// Numbering follows the FARS convention: 1 is Sunday, 7 is Saturday.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(try_from = "u8", into = "u8")]
#[strum(ascii_case_insensitive)]
pub enum DayOfWeek {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl DayOfWeek {
    /// Returns the FARS code for this day.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a day from its FARS code.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCodeError`] if the value is not in the range 1-7.
    pub const fn from_value(value: u8) -> Result<Self, InvalidCodeError> {
        match value {
            1 => Ok(Self::Sunday),
            2 => Ok(Self::Monday),
            3 => Ok(Self::Tuesday),
            4 => Ok(Self::Wednesday),
            5 => Ok(Self::Thursday),
            6 => Ok(Self::Friday),
            7 => Ok(Self::Saturday),
            _ => Err(InvalidCodeError {
                dimension: Dimension::DayOfWeek,
                value,
            }),
        }
    }

    /// Returns all days in code order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Sunday,
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
        ]
    }

    /// Display label for filter controls.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }
}

impl TryFrom<u8> for DayOfWeek {
    type Error = InvalidCodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<DayOfWeek> for u8 {
    fn from(day: DayOfWeek) -> Self {
        day.value()
    }
}

/// Four-hour window of the day an accident occurred in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(try_from = "u8", into = "u8")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HourBucket {
    /// 12am - 4am
    Overnight = 0,
    /// 4am - 8am
    EarlyMorning = 1,
    /// 8am - 12pm
    Morning = 2,
    /// 12pm - 4pm
    Afternoon = 3,
    /// 4pm - 8pm
    Evening = 4,
    /// 8pm - 12am
    Night = 5,
}

impl HourBucket {
    /// Returns the bucket index (0-5).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a bucket from its index.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCodeError`] if the value is not in the range 0-5.
    pub const fn from_value(value: u8) -> Result<Self, InvalidCodeError> {
        match value {
            0 => Ok(Self::Overnight),
            1 => Ok(Self::EarlyMorning),
            2 => Ok(Self::Morning),
            3 => Ok(Self::Afternoon),
            4 => Ok(Self::Evening),
            5 => Ok(Self::Night),
            _ => Err(InvalidCodeError {
                dimension: Dimension::HourBucket,
                value,
            }),
        }
    }

    /// Returns all buckets in index order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Overnight,
            Self::EarlyMorning,
            Self::Morning,
            Self::Afternoon,
            Self::Evening,
            Self::Night,
        ]
    }

    /// Display label for filter controls (e.g. `"4pm - 8pm"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overnight => "12am - 4am",
            Self::EarlyMorning => "4am - 8am",
            Self::Morning => "8am - 12pm",
            Self::Afternoon => "12pm - 4pm",
            Self::Evening => "4pm - 8pm",
            Self::Night => "8pm - 12am",
        }
    }
}

impl TryFrom<u8> for HourBucket {
    type Error = InvalidCodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<HourBucket> for u8 {
    fn from(bucket: HourBucket) -> Self {
        bucket.value()
    }
}

/// Error returned when a numeric code does not map to a day or hour bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid {dimension} code {value}")]
pub struct InvalidCodeError {
    /// Dimension the code was meant for.
    pub dimension: Dimension,
    /// The rejected code.
    pub value: u8,
}

/// Which event table a map is drawn from.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DataMode {
    /// Observed accidents.
    #[default]
    Historic,
    /// Precomputed model predictions, expressed per year of time.
    Model,
}

impl DataMode {
    /// Returns all modes.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Historic, Self::Model]
    }

    /// Display label for the mode selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Historic => "Historic data",
            Self::Model => "Model predictions",
        }
    }

    /// Whether a year filter is meaningful for this table.
    ///
    /// Predictions cover a generic year, so year selections are dropped.
    #[must_use]
    pub const fn supports_year(self) -> bool {
        matches!(self, Self::Historic)
    }
}

const fn default_total() -> f64 {
    1.0
}

/// One row of an event table.
///
/// Column names follow the FARS extract (`STATE`, `COUNTY`, `fips`, `YEAR`,
/// `DAY_WEEK`, `HOUR`, `Total`); the snake_case field names are accepted as
/// well. A missing `Total` column means each row counts once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// State code.
    #[serde(alias = "STATE")]
    pub state: String,
    /// County code within the state.
    #[serde(alias = "COUNTY")]
    pub county: String,
    /// Five-digit county FIPS code.
    #[serde(alias = "fips", alias = "FIPS")]
    pub region_id: String,
    /// Calendar year. Prediction tables have no year.
    #[serde(alias = "YEAR", default)]
    pub year: Option<i32>,
    #[serde(alias = "DAY_WEEK")]
    pub day_of_week: DayOfWeek,
    #[serde(alias = "HOUR")]
    pub hour_bucket: HourBucket,
    /// Event count carried by this row (fractional for predictions).
    #[serde(alias = "Total", alias = "TOTAL", default = "default_total")]
    pub total: f64,
}

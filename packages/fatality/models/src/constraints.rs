//! Filter constraints over event records.
//!
//! A [`Constraints`] value restricts an aggregation to events whose
//! attributes equal the selected values. Every dimension is optional and an
//! empty set means "all events". [`MapSelection`] is the explicit form of
//! the map controls (mode dropdown plus year/day/hour sliders) and is the
//! only place where a UI selection becomes a constraint set.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

use crate::{DataMode, DayOfWeek, EventRecord, HourBucket, InvalidCodeError};

/// A dimension events can be filtered on.
///
/// Parsing accepts the snake_case names as well as the FARS column names
/// (`STATE`, `YEAR`, `DAY_WEEK`, `HOUR`), case-insensitively.
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
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum Dimension {
    #[strum(to_string = "state")]
    State,
    #[strum(to_string = "year")]
    Year,
    #[strum(to_string = "day_of_week", serialize = "day_week", serialize = "dayOfWeek")]
    DayOfWeek,
    #[strum(to_string = "hour_bucket", serialize = "hour", serialize = "hourBucket")]
    HourBucket,
}

impl Dimension {
    /// Returns all filterable dimensions.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::State, Self::Year, Self::DayOfWeek, Self::HourBucket]
    }
}

/// Errors produced while building a constraint set from raw key/value pairs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    /// The key does not name a filterable dimension.
    #[error("invalid constraint key '{key}': expected one of state, year, day_of_week, hour_bucket")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },

    /// The value could not be parsed for its dimension.
    #[error("invalid value '{value}' for constraint {dimension}")]
    InvalidValue {
        /// Dimension being constrained.
        dimension: Dimension,
        /// The rejected value.
        value: String,
    },

    /// The value parsed but is not a valid code.
    #[error(transparent)]
    InvalidCode(#[from] InvalidCodeError),
}

/// Equality constraints on event attributes, combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    /// Required state code.
    pub state: Option<String>,
    /// Required year.
    pub year: Option<i32>,
    /// Required day of week.
    pub day_of_week: Option<DayOfWeek>,
    /// Required hour bucket.
    pub hour_bucket: Option<HourBucket>,
}

impl Constraints {
    /// Builds a constraint set from raw `(key, value)` pairs such as those
    /// given on the command line.
    ///
    /// Day and hour values are accepted either as numeric codes or as
    /// names. Later pairs overwrite earlier ones for the same dimension.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::InvalidKey`] for an unknown dimension and
    /// [`ConstraintError::InvalidValue`] or [`ConstraintError::InvalidCode`]
    /// for an unparsable value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConstraintError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut constraints = Self::default();
        for (key, value) in pairs {
            constraints.set(key.as_ref(), value.as_ref())?;
        }
        Ok(constraints)
    }

    /// Sets a single constraint from its raw key and value.
    ///
    /// # Errors
    ///
    /// See [`Self::from_pairs`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConstraintError> {
        let dimension: Dimension = key.trim().parse().map_err(|_| ConstraintError::InvalidKey {
            key: key.to_string(),
        })?;
        let value = value.trim();
        let invalid = || ConstraintError::InvalidValue {
            dimension,
            value: value.to_string(),
        };

        match dimension {
            Dimension::State => {
                if value.is_empty() {
                    return Err(invalid());
                }
                self.state = Some(value.to_string());
            }
            Dimension::Year => {
                self.year = Some(value.parse().map_err(|_| invalid())?);
            }
            Dimension::DayOfWeek => {
                let day = match value.parse::<u8>() {
                    Ok(code) => DayOfWeek::from_value(code)?,
                    Err(_) => value.parse().map_err(|_| invalid())?,
                };
                self.day_of_week = Some(day);
            }
            Dimension::HourBucket => {
                let bucket = match value.parse::<u8>() {
                    Ok(code) => HourBucket::from_value(code)?,
                    Err(_) => value.parse().map_err(|_| invalid())?,
                };
                self.hour_bucket = Some(bucket);
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    #[must_use]
    pub const fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub const fn with_day_of_week(mut self, day: DayOfWeek) -> Self {
        self.day_of_week = Some(day);
        self
    }

    #[must_use]
    pub const fn with_hour_bucket(mut self, bucket: HourBucket) -> Self {
        self.hour_bucket = Some(bucket);
        self
    }

    /// Returns `true` if no dimension is constrained.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.state.is_none()
            && self.year.is_none()
            && self.day_of_week.is_none()
            && self.hour_bucket.is_none()
    }

    /// Returns the constrained dimensions in [`Dimension::all`] order.
    #[must_use]
    pub fn dimensions(&self) -> Vec<Dimension> {
        Dimension::all()
            .iter()
            .copied()
            .filter(|dimension| match dimension {
                Dimension::State => self.state.is_some(),
                Dimension::Year => self.year.is_some(),
                Dimension::DayOfWeek => self.day_of_week.is_some(),
                Dimension::HourBucket => self.hour_bucket.is_some(),
            })
            .collect()
    }

    /// Returns `true` if the event satisfies every constrained dimension.
    ///
    /// An event without a year never matches a year constraint.
    #[must_use]
    pub fn matches(&self, event: &EventRecord) -> bool {
        self.state.as_ref().is_none_or(|s| *s == event.state)
            && self.year.is_none_or(|y| event.year == Some(y))
            && self.day_of_week.is_none_or(|d| d == event.day_of_week)
            && self.hour_bucket.is_none_or(|h| h == event.hour_bucket)
    }
}

/// The current state of the map controls.
///
/// `None` on a slider means its "All" position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSelection {
    /// Which event table to draw.
    pub mode: DataMode,
    pub year: Option<i32>,
    pub day_of_week: Option<DayOfWeek>,
    pub hour_bucket: Option<HourBucket>,
    /// Optional state to zoom the region universe to.
    pub state: Option<String>,
}

impl MapSelection {
    /// Translates the selection into the constraint set for its mode.
    ///
    /// The year is dropped in [`DataMode::Model`] since predictions are not
    /// tied to a calendar year.
    #[must_use]
    pub fn constraints(&self) -> Constraints {
        Constraints {
            state: self.state.clone(),
            year: self.year.filter(|_| self.mode.supports_year()),
            day_of_week: self.day_of_week,
            hour_bucket: self.hour_bucket,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(year: Option<i32>, day: DayOfWeek, hour: HourBucket) -> EventRecord {
        EventRecord {
            state: "6".to_string(),
            county: "37".to_string(),
            region_id: "06037".to_string(),
            year,
            day_of_week: day,
            hour_bucket: hour,
            total: 1.0,
        }
    }

    #[test]
    fn parses_fars_column_names() {
        assert_eq!("DAY_WEEK".parse::<Dimension>().unwrap(), Dimension::DayOfWeek);
        assert_eq!("HOUR".parse::<Dimension>().unwrap(), Dimension::HourBucket);
        assert_eq!("Year".parse::<Dimension>().unwrap(), Dimension::Year);
        assert_eq!(Dimension::DayOfWeek.to_string(), "day_of_week");
    }

    #[test]
    fn from_pairs_builds_typed_constraints() {
        let c = Constraints::from_pairs([("year", "2012"), ("day_of_week", "1"), ("hour", "evening")])
            .unwrap();
        assert_eq!(c.year, Some(2012));
        assert_eq!(c.day_of_week, Some(DayOfWeek::Sunday));
        assert_eq!(c.hour_bucket, Some(HourBucket::Evening));
        assert_eq!(
            c.dimensions(),
            vec![Dimension::Year, Dimension::DayOfWeek, Dimension::HourBucket]
        );
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = Constraints::from_pairs([("county", "37")]).unwrap_err();
        assert_eq!(
            err,
            ConstraintError::InvalidKey {
                key: "county".to_string()
            }
        );
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            Constraints::from_pairs([("year", "last")]),
            Err(ConstraintError::InvalidValue { .. })
        ));
        assert!(matches!(
            Constraints::from_pairs([("hour", "9")]),
            Err(ConstraintError::InvalidCode(_))
        ));
        assert!(matches!(
            Constraints::from_pairs([("state", " ")]),
            Err(ConstraintError::InvalidValue { .. })
        ));
    }

    #[test]
    fn empty_constraints_match_everything() {
        let c = Constraints::default();
        assert!(c.is_empty());
        assert!(c.dimensions().is_empty());
        assert!(c.matches(&event(None, DayOfWeek::Monday, HourBucket::Night)));
    }

    #[test]
    fn constraints_are_conjunctive() {
        let c = Constraints::default()
            .with_year(2013)
            .with_day_of_week(DayOfWeek::Monday);
        assert!(c.matches(&event(Some(2013), DayOfWeek::Monday, HourBucket::Night)));
        assert!(!c.matches(&event(Some(2013), DayOfWeek::Tuesday, HourBucket::Night)));
        assert!(!c.matches(&event(Some(2012), DayOfWeek::Monday, HourBucket::Night)));
        assert!(!c.matches(&event(None, DayOfWeek::Monday, HourBucket::Night)));
    }

    #[test]
    fn model_selection_drops_year() {
        let selection = MapSelection {
            mode: DataMode::Model,
            year: Some(2015),
            day_of_week: Some(DayOfWeek::Friday),
            hour_bucket: None,
            state: None,
        };
        let c = selection.constraints();
        assert_eq!(c.year, None);
        assert_eq!(c.day_of_week, Some(DayOfWeek::Friday));

        let historic = MapSelection {
            mode: DataMode::Historic,
            ..selection
        };
        assert_eq!(historic.constraints().year, Some(2015));
    }
}

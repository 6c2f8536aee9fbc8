//! Constraint filtering, per-region summing, and zero-filling.

use std::borrow::Cow;
use std::collections::BTreeMap;

use fatality_map_analytics_models::{AggregationResult, RegionTotal};
use fatality_map_fatality_models::{Constraints, DayOfWeek, EventRecord, HourBucket};
use fatality_map_geography_models::RegionTable;

use crate::AnalyticsError;

/// Grouping key for the `max_total` computation.
///
/// The region part is always present; each optional field is only filled in
/// when its dimension is constrained, which makes the grouping exactly as
/// fine as the constraint set.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct GroupKey<'a> {
    state: &'a str,
    county: &'a str,
    region_id: &'a str,
    year: Option<i32>,
    day_of_week: Option<DayOfWeek>,
    hour_bucket: Option<HourBucket>,
}

impl<'a> GroupKey<'a> {
    /// Returns `None` if the event has no value for a grouped dimension.
    fn for_event(event: &'a EventRecord, constraints: &Constraints) -> Option<Self> {
        let year = match constraints.year {
            Some(_) => Some(event.year?),
            None => None,
        };
        Some(Self {
            state: &event.state,
            county: &event.county,
            region_id: &event.region_id,
            year,
            day_of_week: constraints.day_of_week.map(|_| event.day_of_week),
            hour_bucket: constraints.hour_bucket.map(|_| event.hour_bucket),
        })
    }
}

/// Largest summed total over groups of (state, county, region id) plus every
/// dimension constrained in `constraints`.
///
/// The constraint *values* are ignored here: the maximum is taken over all
/// groups at that granularity so the color scale stays stable while the
/// user moves between, say, individual years. Returns `0.0` when there are
/// no groups.
#[must_use]
pub fn max_group_total<'a, I>(events: I, constraints: &Constraints) -> f64
where
    I: IntoIterator<Item = &'a EventRecord>,
{
    let mut groups: BTreeMap<GroupKey<'a>, f64> = BTreeMap::new();
    for event in events {
        if let Some(key) = GroupKey::for_event(event, constraints) {
            *groups.entry(key).or_default() += event.total;
        }
    }

    groups.into_values().fold(0.0, f64::max)
}

/// Aggregates `events` into one total per region of `regions`.
///
/// 1. A `state` constraint restricts both the events and the region table.
/// 2. `max_total` is computed over the state-restricted events, grouped as
///    described in [`max_group_total`].
/// 3. Events are filtered on every constraint and summed per region id.
/// 4. The sums are joined onto the region table in its original order;
///    regions without matching events get `0.0`.
///
/// Events whose region id is not in the table do not appear in the result.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyRegionTable`] if no regions remain after
/// the state restriction.
pub fn aggregate(
    events: &[EventRecord],
    constraints: &Constraints,
    regions: &RegionTable,
) -> Result<AggregationResult, AnalyticsError> {
    let regions = match &constraints.state {
        Some(state) => Cow::Owned(regions.restrict_to_state(state)),
        None => Cow::Borrowed(regions),
    };

    if regions.is_empty() {
        return Err(AnalyticsError::EmptyRegionTable {
            state: constraints.state.clone(),
        });
    }

    let in_state = |event: &&EventRecord| {
        constraints
            .state
            .as_ref()
            .is_none_or(|state| *state == event.state)
    };

    let max_total = max_group_total(events.iter().filter(in_state), constraints);

    let mut by_region: BTreeMap<&str, f64> = BTreeMap::new();
    for event in events.iter().filter(|e| constraints.matches(e)) {
        *by_region.entry(event.region_id.as_str()).or_default() += event.total;
    }

    let mut matched = 0;
    let totals: Vec<RegionTotal> = regions
        .iter()
        .map(|region| {
            let total = by_region.get(region.region_id.as_str()).copied();
            if total.is_some() {
                matched += 1;
            }
            RegionTotal {
                region_id: region.region_id.clone(),
                total: total.unwrap_or(0.0),
            }
        })
        .collect();

    let unmatched = by_region.len() - matched;
    if unmatched > 0 {
        log::debug!("{unmatched} event region ids are not in the region table");
    }
    log::debug!(
        "Aggregated {} regions ({} with events) over {:?}, max_total={max_total}",
        totals.len(),
        matched,
        constraints.dimensions()
    );

    Ok(AggregationResult { totals, max_total })
}

/// Like [`aggregate`], but takes raw `(key, value)` constraint pairs.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidConstraintKey`] for a key that is not
/// one of `state`, `year`, `day_of_week`, `hour_bucket`,
/// [`AnalyticsError::InvalidConstraintValue`] for an unparsable value, and
/// anything [`aggregate`] returns.
pub fn aggregate_pairs<I, K, V>(
    events: &[EventRecord],
    pairs: I,
    regions: &RegionTable,
) -> Result<AggregationResult, AnalyticsError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let constraints = Constraints::from_pairs(pairs)?;
    aggregate(events, &constraints, regions)
}

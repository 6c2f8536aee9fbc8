#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Choropleth figure construction.
//!
//! Turns per-region totals into a map figure whose JSON form is a Plotly
//! `choroplethmapbox` figure: one trace bound to the county boundary
//! collection, colored on a logarithmic scale, plus the map layout.
//!
//! Positive totals are compressed with `ln(total + 1)` for display and zero
//! totals stay at zero, so every region with events gets a strictly
//! positive value and only event-free regions sit at the bottom of the
//! scale.

use fatality_map_analytics_models::RegionTotal;
use fatality_map_geography::Geography;
use geojson::FeatureCollection;
use serde::Serialize;

/// Upper bound used for the color scale when `max_total` cannot produce a
/// positive `ln(max_total)`.
pub const MIN_SCALE_MAX: f64 = 1e-6;

/// Plotly colorscale name.
pub const COLORSCALE: &str = "YlGnBu";

/// Map center (roughly the geographic center of the contiguous US).
pub const MAP_CENTER: MapCenter = MapCenter {
    lat: 37.0902,
    lon: -95.7129,
};

/// Whether the color scale could be derived from `max_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleStatus {
    /// `zmax` is `ln(max_total)`.
    Normal,
    /// `ln(max_total)` was not positive (no events, or a maximum of at
    /// most one), so `zmax` was clamped to [`MIN_SCALE_MAX`].
    Degenerate,
}

/// Display bounds of the color scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayScale {
    pub zmin: f64,
    pub zmax: f64,
    pub status: ScaleStatus,
}

/// Compresses a total for display: `ln(total + 1)` when positive, else `0`.
#[must_use]
pub fn display_value(total: f64) -> f64 {
    if total > 0.0 { total.ln_1p() } else { 0.0 }
}

/// Derives the color scale from the aggregation's `max_total`.
///
/// Uses `ln(max_total)` (no `+ 1`). Never returns zero, a negative value,
/// or a non-finite value for `zmax`.
#[must_use]
pub fn display_scale(max_total: f64) -> DisplayScale {
    let zmax = if max_total > 0.0 { max_total.ln() } else { 0.0 };

    if zmax > 0.0 && zmax.is_finite() {
        DisplayScale {
            zmin: 0.0,
            zmax,
            status: ScaleStatus::Normal,
        }
    } else {
        log::debug!("Degenerate color scale for max_total={max_total}, clamping");
        DisplayScale {
            zmin: 0.0,
            zmax: MIN_SCALE_MAX,
            status: ScaleStatus::Degenerate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerLine {
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub opacity: f64,
    pub line: MarkerLine,
}

/// The single choropleth trace of a [`MapFigure`].
#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethTrace<'g> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Boundary polygons, borrowed from the shared [`Geography`].
    pub geojson: &'g FeatureCollection,
    /// Region ids, parallel to `z`.
    pub locations: Vec<String>,
    /// Display values, parallel to `locations`.
    pub z: Vec<f64>,
    pub colorscale: &'static str,
    pub zmin: f64,
    pub zmax: f64,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mapbox {
    pub style: &'static str,
    pub zoom: f64,
    pub center: MapCenter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub r: u32,
    pub t: u32,
    pub l: u32,
    pub b: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub mapbox: Mapbox,
    pub margin: Margin,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            mapbox: Mapbox {
                style: "carto-positron",
                zoom: 3.0,
                center: MAP_CENTER,
            },
            margin: Margin {
                r: 0,
                t: 0,
                l: 0,
                b: 0,
            },
        }
    }
}

/// A renderable choropleth map.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapFigure<'g> {
    pub data: Vec<ChoroplethTrace<'g>>,
    pub layout: Layout,
    /// Whether the color scale had to be clamped.
    pub scale_status: ScaleStatus,
}

impl<'g> MapFigure<'g> {
    /// The figure's choropleth trace.
    #[must_use]
    pub fn trace(&self) -> &ChoroplethTrace<'g> {
        &self.data[0]
    }
}

/// Builds the choropleth figure for `totals`.
///
/// Every total is passed through [`display_value`] and the scale through
/// [`display_scale`]. The geography is only borrowed.
#[must_use]
pub fn render<'g>(totals: &[RegionTotal], max_total: f64, geography: &'g Geography) -> MapFigure<'g> {
    let scale = display_scale(max_total);

    let missing = totals
        .iter()
        .filter(|t| !geography.contains(&t.region_id))
        .count();
    if missing > 0 {
        log::debug!("{missing} of {} regions have no boundary polygon", totals.len());
    }

    let trace = ChoroplethTrace {
        kind: "choroplethmapbox",
        geojson: geography.collection(),
        locations: totals.iter().map(|t| t.region_id.clone()).collect(),
        z: totals.iter().map(|t| display_value(t.total)).collect(),
        colorscale: COLORSCALE,
        zmin: scale.zmin,
        zmax: scale.zmax,
        marker: Marker {
            opacity: 1.0,
            line: MarkerLine { width: 0.1 },
        },
    };

    MapFigure {
        data: vec![trace],
        layout: Layout::default(),
        scale_status: scale.status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "id": "001", "properties": {},
             "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}},
            {"type": "Feature", "id": "002", "properties": {},
             "geometry": {"type": "Point", "coordinates": [1.0, 1.0]}}
        ]
    }"#;

    fn totals(values: &[(&str, f64)]) -> Vec<RegionTotal> {
        values
            .iter()
            .map(|(id, total)| RegionTotal {
                region_id: (*id).to_string(),
                total: *total,
            })
            .collect()
    }

    #[test]
    fn compresses_positive_totals_only() {
        assert!(display_value(0.0).abs() < f64::EPSILON);
        assert!((display_value(1.0) - 2f64.ln()).abs() < 1e-12);
        assert!((display_value(9.0) - 10f64.ln()).abs() < 1e-12);
        assert!(display_value(-2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn small_positive_totals_stay_above_zero() {
        for total in [1e-9, 0.05, 0.4, 1.0] {
            assert!(display_value(total) > 0.0, "total={total}");
        }
        assert!(display_value(0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn scale_uses_plain_log() {
        let scale = display_scale(100.0);
        assert_eq!(scale.status, ScaleStatus::Normal);
        assert!((scale.zmax - 100f64.ln()).abs() < 1e-12);
        assert!(scale.zmin.abs() < f64::EPSILON);
    }

    #[test]
    fn zero_max_is_clamped() {
        for max in [0.0, 1.0, 0.5, -3.0, f64::NAN] {
            let scale = display_scale(max);
            assert_eq!(scale.status, ScaleStatus::Degenerate, "max={max}");
            assert!((scale.zmax - MIN_SCALE_MAX).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn renders_transformed_trace() {
        let geography = Geography::parse(COUNTIES).unwrap();
        let figure = render(&totals(&[("001", 1.0), ("002", 3.0), ("003", 0.0)]), 3.0, &geography);

        let trace = figure.trace();
        assert_eq!(trace.locations, vec!["001", "002", "003"]);
        assert!((trace.z[0] - 2f64.ln()).abs() < 1e-12);
        assert!((trace.z[1] - 4f64.ln()).abs() < 1e-12);
        assert!(trace.z[2].abs() < f64::EPSILON);
        assert!((trace.zmax - 3f64.ln()).abs() < 1e-12);
        assert_eq!(figure.scale_status, ScaleStatus::Normal);
        assert_eq!(geography.len(), 2);
    }

    #[test]
    fn all_zero_totals_render_with_clamped_scale() {
        let geography = Geography::parse(COUNTIES).unwrap();
        let figure = render(&totals(&[("001", 0.0), ("002", 0.0)]), 0.0, &geography);

        assert_eq!(figure.scale_status, ScaleStatus::Degenerate);
        assert!(figure.trace().zmax > 0.0);
        assert!(figure.trace().z.iter().all(|z| *z == 0.0));
    }

    #[test]
    fn serializes_as_plotly_figure() {
        let geography = Geography::parse(COUNTIES).unwrap();
        let figure = render(&totals(&[("001", 2.0)]), 2.0, &geography);
        let json = serde_json::to_value(&figure).unwrap();

        assert_eq!(json["data"][0]["type"], "choroplethmapbox");
        assert_eq!(json["data"][0]["colorscale"], "YlGnBu");
        assert_eq!(json["data"][0]["geojson"]["type"], "FeatureCollection");
        assert_eq!(json["data"][0]["marker"]["line"]["width"], 0.1);
        assert_eq!(json["layout"]["mapbox"]["style"], "carto-positron");
        assert_eq!(json["layout"]["mapbox"]["center"]["lat"], 37.0902);
        assert_eq!(json["layout"]["margin"]["t"], 0);
        assert_eq!(json["scaleStatus"], "normal");
    }
}

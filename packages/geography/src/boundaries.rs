//! County boundary `GeoJSON`.
//!
//! Boundaries are a `FeatureCollection` whose feature ids are five-digit
//! county FIPS codes, the same ids used by the region table. A
//! [`Geography`] is loaded once and shared read-only by every render.

use std::collections::BTreeSet;
use std::path::Path;

use geojson::{FeatureCollection, GeoJson, feature::Id};

use crate::GeoError;

/// Public county boundary file keyed by five-digit FIPS code.
pub const COUNTY_BOUNDARIES_URL: &str =
    "https://raw.githubusercontent.com/plotly/datasets/master/geojson-counties-fips.json";

/// County boundary polygons indexed by region id.
#[derive(Debug, Clone)]
pub struct Geography {
    collection: FeatureCollection,
    region_ids: BTreeSet<String>,
}

impl Geography {
    /// Wraps a feature collection, normalizing feature ids to strings.
    ///
    /// Numeric ids are zero-padded to five digits since they lose their
    /// leading zero when written as JSON numbers. Features without an id
    /// cannot be matched to a region and are dropped.
    #[must_use]
    pub fn from_collection(mut collection: FeatureCollection) -> Self {
        let before = collection.features.len();

        collection.features.retain_mut(|feature| {
            let id = match feature.id.take() {
                Some(Id::String(s)) => s,
                Some(Id::Number(n)) => format!("{:0>5}", n.to_string()),
                None => return false,
            };
            feature.id = Some(Id::String(id));
            true
        });

        let dropped = before - collection.features.len();
        if dropped > 0 {
            log::warn!("Dropped {dropped} boundary features without an id");
        }

        let region_ids = collection
            .features
            .iter()
            .filter_map(|f| match &f.id {
                Some(Id::String(s)) => Some(s.clone()),
                _ => None,
            })
            .collect();

        Self {
            collection,
            region_ids,
        }
    }

    /// Parses a `GeoJSON` document that must be a `FeatureCollection`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the text is not valid `GeoJSON` or is a bare
    /// geometry/feature.
    pub fn parse(text: &str) -> Result<Self, GeoError> {
        match text.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => Ok(Self::from_collection(collection)),
            GeoJson::Feature(_) | GeoJson::Geometry(_) => Err(GeoError::Conversion {
                message: "boundary GeoJSON must be a FeatureCollection".to_string(),
            }),
        }
    }

    /// The underlying feature collection.
    #[must_use]
    pub const fn collection(&self) -> &FeatureCollection {
        &self.collection
    }

    /// Returns `true` if a boundary exists for `region_id`.
    #[must_use]
    pub fn contains(&self, region_id: &str) -> bool {
        self.region_ids.contains(region_id)
    }

    /// Number of boundary features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collection.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collection.features.is_empty()
    }
}

/// Loads boundaries from a local `GeoJSON` file.
///
/// # Errors
///
/// Returns [`GeoError`] if the file cannot be read or parsed.
pub fn load_boundaries(path: &Path) -> Result<Geography, GeoError> {
    let text = std::fs::read_to_string(path)?;
    let geography = Geography::parse(&text)?;
    log::info!(
        "Loaded {} boundary features from {}",
        geography.len(),
        path.display()
    );
    Ok(geography)
}

/// Downloads a boundary file and stores it at `dest`.
///
/// The body is validated as a `FeatureCollection` before anything is
/// written, so a failed download never replaces a good local copy.
///
/// # Errors
///
/// Returns [`GeoError`] if the request fails, the body is not a boundary
/// collection, or the file cannot be written.
pub async fn download_boundaries(url: &str, dest: &Path) -> Result<Geography, GeoError> {
    log::info!("Downloading county boundaries from {url}");

    let response = reqwest::get(url).await?.error_for_status()?;
    let text = response.text().await?;
    log::debug!("Downloaded {} bytes from {url}", text.len());

    let geography = Geography::parse(&text)?;

    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest, &text)?;

    log::info!(
        "Saved {} boundary features to {}",
        geography.len(),
        dest.display()
    );
    Ok(geography)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "id": "06037", "properties": {"NAME": "Los Angeles"},
             "geometry": {"type": "Polygon", "coordinates": [[[-118.0, 34.0], [-118.5, 34.0], [-118.5, 34.5], [-118.0, 34.0]]]}},
            {"type": "Feature", "id": 1001, "properties": {"NAME": "Autauga"},
             "geometry": {"type": "Polygon", "coordinates": [[[-86.4, 32.4], [-86.9, 32.4], [-86.9, 32.7], [-86.4, 32.4]]]}},
            {"type": "Feature", "properties": {"NAME": "Nowhere"},
             "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}}
        ]
    }"#;

    #[test]
    fn indexes_feature_ids() {
        let geography = Geography::parse(COUNTIES).unwrap();
        assert_eq!(geography.len(), 2);
        assert!(geography.contains("06037"));
        assert!(geography.contains("01001"));
        assert!(!geography.contains("99999"));
    }

    #[test]
    fn rejects_non_collections() {
        let geometry = r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#;
        assert!(matches!(
            Geography::parse(geometry),
            Err(GeoError::Conversion { .. })
        ));
        assert!(matches!(
            Geography::parse("not json"),
            Err(GeoError::GeoJson(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counties.json");
        std::fs::write(&path, COUNTIES).unwrap();

        let geography = load_boundaries(&path).unwrap();
        assert_eq!(geography.len(), 2);
    }
}

//! Input data locations.
//!
//! Paths come from an optional `fatality_map.toml`:
//!
//! ```toml
//! [data]
//! historic = "app_data/historic_data.csv"
//! predictions = "app_data/model_predictions.csv"
//! regions = "app_data/fips_table.csv"
//! boundaries = "app_data/geojson-counties-fips.json"
//! ```
//!
//! Each entry can be overridden with an environment variable, and the
//! config file itself can be moved with `FATALITY_MAP_CONFIG`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::IngestError;

/// Config file read when `FATALITY_MAP_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "fatality_map.toml";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "FATALITY_MAP_CONFIG";

/// Locations of every input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataPaths {
    /// Observed event table.
    pub historic: PathBuf,
    /// Model prediction table.
    pub predictions: PathBuf,
    /// Region reference table.
    pub regions: PathBuf,
    /// County boundary `GeoJSON`.
    pub boundaries: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            historic: PathBuf::from("app_data/historic_data.csv"),
            predictions: PathBuf::from("app_data/model_predictions.csv"),
            regions: PathBuf::from("app_data/fips_table.csv"),
            boundaries: PathBuf::from("app_data/geojson-counties-fips.json"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    data: DataPaths,
}

impl DataPaths {
    /// Parses the `[data]` table of a config file. Missing keys keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Config`] if the TOML is invalid or contains
    /// unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, IngestError> {
        let file: ConfigFile = toml::from_str(text)?;
        Ok(file.data)
    }

    /// Reads paths from a config file.
    ///
    /// With `Some(path)` the file must exist. With `None`,
    /// [`DEFAULT_CONFIG_PATH`] is read if present and defaults are used
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, IngestError> {
        let (path, required) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };

        match std::fs::read_to_string(path) {
            Ok(text) => {
                log::info!("Reading data paths from {}", path.display());
                Self::from_toml_str(&text)
            }
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No {} found, using default data paths", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(IngestError::Open {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Applies overrides from `lookup` for the variables
    /// `FATALITY_MAP_HISTORIC`, `FATALITY_MAP_PREDICTIONS`,
    /// `FATALITY_MAP_REGIONS`, and `FATALITY_MAP_BOUNDARIES`.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fields: [(&str, &mut PathBuf); 4] = [
            ("FATALITY_MAP_HISTORIC", &mut self.historic),
            ("FATALITY_MAP_PREDICTIONS", &mut self.predictions),
            ("FATALITY_MAP_REGIONS", &mut self.regions),
            ("FATALITY_MAP_BOUNDARIES", &mut self.boundaries),
        ];
        for (var, field) in fields {
            if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                *field = PathBuf::from(value);
            }
        }
        self
    }

    /// Resolves paths from the process environment: the config file named by
    /// `FATALITY_MAP_CONFIG` (or the default file), then per-path variables.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn from_env() -> Result<Self, IngestError> {
        let config_path = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        Ok(Self::load(config_path.as_deref())?.with_overrides(|var| std::env::var(var).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let paths = DataPaths::from_toml_str(
            r#"
            [data]
            historic = "/srv/fars/historic.csv"
            "#,
        )
        .unwrap();
        assert_eq!(paths.historic, PathBuf::from("/srv/fars/historic.csv"));
        assert_eq!(paths.regions, DataPaths::default().regions);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(DataPaths::from_toml_str("").unwrap(), DataPaths::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            DataPaths::from_toml_str("[data]\nhistoric_csv = \"x\"\n"),
            Err(IngestError::Config(_))
        ));
    }

    #[test]
    fn overrides_replace_non_empty_values() {
        let paths = DataPaths::default().with_overrides(|var| match var {
            "FATALITY_MAP_PREDICTIONS" => Some("preds.csv".to_string()),
            "FATALITY_MAP_REGIONS" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(paths.predictions, PathBuf::from("preds.csv"));
        assert_eq!(paths.regions, DataPaths::default().regions);
    }

    #[test]
    fn missing_default_file_uses_defaults_but_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            DataPaths::load(Some(&missing)),
            Err(IngestError::Open { .. })
        ));

        let present = dir.path().join("fatality_map.toml");
        std::fs::write(&present, "[data]\nboundaries = \"b.json\"\n").unwrap();
        let paths = DataPaths::load(Some(&present)).unwrap();
        assert_eq!(paths.boundaries, PathBuf::from("b.json"));
    }
}

//! Filter flags shared by the `render` and `totals` subcommands.

use clap::Args;
use fatality_map_analytics::AnalyticsError;
use fatality_map_fatality_models::{Constraints, DataMode, MapSelection};

/// Map selection flags. Omitted flags mean "All".
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Event table to aggregate (`historic` or `model`).
    #[arg(long, default_value_t = DataMode::Historic)]
    pub mode: DataMode,

    /// Calendar year (ignored in model mode).
    #[arg(long)]
    pub year: Option<String>,

    /// Day code (1 = Sunday) or day name.
    #[arg(long)]
    pub day_of_week: Option<String>,

    /// Hour bucket index (0-5) or name.
    #[arg(long)]
    pub hour: Option<String>,

    /// State code or two-letter abbreviation.
    #[arg(long)]
    pub state: Option<String>,

    /// Extra `key=value` constraint, repeatable.
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_pair)]
    pub filters: Vec<(String, String)>,
}

impl FilterArgs {
    /// Builds the selection, applying `--filter` pairs after the named
    /// flags.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidConstraintKey`] or
    /// [`AnalyticsError::InvalidConstraintValue`] for a rejected filter.
    pub fn selection(&self) -> Result<MapSelection, AnalyticsError> {
        let named = [
            ("state", &self.state),
            ("year", &self.year),
            ("day_of_week", &self.day_of_week),
            ("hour_bucket", &self.hour),
        ];

        let mut constraints = Constraints::default();
        for (key, value) in named {
            if let Some(value) = value {
                constraints.set(key, value)?;
            }
        }
        for (key, value) in &self.filters {
            constraints.set(key, value)?;
        }

        Ok(MapSelection {
            mode: self.mode,
            year: constraints.year,
            day_of_week: constraints.day_of_week,
            hour_bucket: constraints.hour_bucket,
            state: constraints.state,
        })
    }
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

//! Event table CSV loading.

use std::io::Read;
use std::path::Path;

use fatality_map_fatality_models::EventRecord;

use crate::IngestError;

/// Reads an event table from CSV.
///
/// Expects a header row with the FARS column names (`STATE`, `COUNTY`,
/// `fips`, `YEAR`, `DAY_WEEK`, `HOUR`, `Total`) or their snake_case
/// equivalents. `YEAR` and `Total` may be absent; extra columns are ignored.
///
/// # Errors
///
/// Returns [`IngestError::Csv`] for the first row that fails to parse. The
/// error carries the row's position.
pub fn read_events<R: Read>(reader: R) -> Result<Vec<EventRecord>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let events = reader
        .deserialize::<EventRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    let negative = events.iter().filter(|e| e.total < 0.0).count();
    if negative > 0 {
        log::warn!("{negative} event rows have a negative total");
    }

    Ok(events)
}

/// Loads an event table from a CSV file.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened or a row fails to
/// parse.
pub fn load_events(path: &Path) -> Result<Vec<EventRecord>, IngestError> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let events = read_events(file)?;
    log::info!("Loaded {} event rows from {}", events.len(), path.display());
    Ok(events)
}

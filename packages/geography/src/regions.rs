//! Region reference table loading.

use std::io::Read;
use std::path::Path;

use fatality_map_geography_models::{Region, RegionTable, fips};

use crate::GeoError;

/// Reads a region table from CSV with a `fips, STATE, COUNTY` header.
///
/// Row order is preserved. A blank region id is derived from the row's
/// state and county codes; rows where that is impossible are rejected.
///
/// # Errors
///
/// Returns [`GeoError`] if the CSV is malformed, a row is missing a column,
/// or a region id is blank or repeated.
pub fn read_regions<R: Read>(reader: R) -> Result<RegionTable, GeoError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut regions = Vec::new();
    for (i, row) in reader.deserialize::<Region>().enumerate() {
        let mut region = row?;
        if region.region_id.is_empty() {
            region.region_id = fips::region_id(&region.state, &region.county).ok_or_else(|| {
                GeoError::Conversion {
                    message: format!("row {}: blank region id", i + 1),
                }
            })?;
        }
        regions.push(region);
    }

    Ok(RegionTable::new(regions)?)
}

/// Loads the region table from a CSV file.
///
/// # Errors
///
/// Returns [`GeoError`] if the file cannot be opened or parsed.
pub fn load_regions(path: &Path) -> Result<RegionTable, GeoError> {
    let file = std::fs::File::open(path)?;
    let table = read_regions(file)?;
    log::info!(
        "Loaded {} regions across {} states from {}",
        table.len(),
        table.states().len(),
        path.display()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fips_table_in_order() {
        let csv = "fips,STATE,COUNTY\n06037,6,37\n01001,1,1\n06001,6,1\n";
        let table = read_regions(csv.as_bytes()).unwrap();
        let ids: Vec<&str> = table.iter().map(|r| r.region_id.as_str()).collect();
        assert_eq!(ids, vec!["06037", "01001", "06001"]);
        assert_eq!(table.get("01001").map(|r| r.state.as_str()), Some("1"));
    }

    #[test]
    fn keeps_leading_zeros() {
        let csv = "fips,STATE,COUNTY\n 01003 ,1,3\n";
        let table = read_regions(csv.as_bytes()).unwrap();
        assert!(table.get("01003").is_some());
    }

    #[test]
    fn rejects_duplicates() {
        let csv = "fips,STATE,COUNTY\n06037,6,37\n06037,6,37\n";
        assert!(matches!(
            read_regions(csv.as_bytes()),
            Err(GeoError::RegionTable(_))
        ));
    }

    #[test]
    fn derives_blank_ids_from_codes() {
        let csv = "fips,STATE,COUNTY\n,6,37\n";
        let table = read_regions(csv.as_bytes()).unwrap();
        assert_eq!(table.iter().next().map(|r| r.region_id.as_str()), Some("06037"));
    }

    #[test]
    fn rejects_blank_ids_without_codes() {
        let csv = "fips,STATE,COUNTY\n,,37\n";
        assert!(matches!(
            read_regions(csv.as_bytes()),
            Err(GeoError::Conversion { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_regions(Path::new("does/not/exist.csv")),
            Err(GeoError::Io(_))
        ));
    }
}

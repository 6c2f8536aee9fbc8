//! US FIPS code utilities.
//!
//! County regions are identified by a five-digit FIPS code: two digits of
//! state followed by three digits of county. FARS extracts store the state
//! and county parts as unpadded integers (`6`, `37`), so these helpers pad
//! and combine them.

/// `(fips, abbreviation, name)` for the 50 US states + DC.
const STATES: &[(&str, &str, &str)] = &[
    ("01", "AL", "Alabama"),
    ("02", "AK", "Alaska"),
    ("04", "AZ", "Arizona"),
    ("05", "AR", "Arkansas"),
    ("06", "CA", "California"),
    ("08", "CO", "Colorado"),
    ("09", "CT", "Connecticut"),
    ("10", "DE", "Delaware"),
    ("11", "DC", "District of Columbia"),
    ("12", "FL", "Florida"),
    ("13", "GA", "Georgia"),
    ("15", "HI", "Hawaii"),
    ("16", "ID", "Idaho"),
    ("17", "IL", "Illinois"),
    ("18", "IN", "Indiana"),
    ("19", "IA", "Iowa"),
    ("20", "KS", "Kansas"),
    ("21", "KY", "Kentucky"),
    ("22", "LA", "Louisiana"),
    ("23", "ME", "Maine"),
    ("24", "MD", "Maryland"),
    ("25", "MA", "Massachusetts"),
    ("26", "MI", "Michigan"),
    ("27", "MN", "Minnesota"),
    ("28", "MS", "Mississippi"),
    ("29", "MO", "Missouri"),
    ("30", "MT", "Montana"),
    ("31", "NE", "Nebraska"),
    ("32", "NV", "Nevada"),
    ("33", "NH", "New Hampshire"),
    ("34", "NJ", "New Jersey"),
    ("35", "NM", "New Mexico"),
    ("36", "NY", "New York"),
    ("37", "NC", "North Carolina"),
    ("38", "ND", "North Dakota"),
    ("39", "OH", "Ohio"),
    ("40", "OK", "Oklahoma"),
    ("41", "OR", "Oregon"),
    ("42", "PA", "Pennsylvania"),
    ("44", "RI", "Rhode Island"),
    ("45", "SC", "South Carolina"),
    ("46", "SD", "South Dakota"),
    ("47", "TN", "Tennessee"),
    ("48", "TX", "Texas"),
    ("49", "UT", "Utah"),
    ("50", "VT", "Vermont"),
    ("51", "VA", "Virginia"),
    ("53", "WA", "Washington"),
    ("54", "WV", "West Virginia"),
    ("55", "WI", "Wisconsin"),
    ("56", "WY", "Wyoming"),
];

/// Left-pads a numeric code with zeros to `width` digits.
///
/// Returns `None` if the code is empty, non-numeric, or too long.
fn pad_code(code: &str, width: usize) -> Option<String> {
    let code = code.trim();
    if code.is_empty() || code.len() > width || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{code:0>width$}"))
}

/// Normalizes a state code (`"6"` or `"06"`) to its two-digit form.
#[must_use]
pub fn normalize_state(code: &str) -> Option<String> {
    pad_code(code, 2)
}

/// Builds the five-digit region id from state and county codes.
///
/// ```
/// use fatality_map_geography_models::fips::region_id;
///
/// assert_eq!(region_id("6", "37").as_deref(), Some("06037"));
/// ```
#[must_use]
pub fn region_id(state: &str, county: &str) -> Option<String> {
    Some(format!("{}{}", pad_code(state, 2)?, pad_code(county, 3)?))
}

/// Two-letter abbreviation for a state code, padded or not.
#[must_use]
pub fn state_abbr(state: &str) -> Option<&'static str> {
    let fips = normalize_state(state)?;
    STATES
        .iter()
        .find(|(code, _, _)| *code == fips)
        .map(|(_, abbr, _)| *abbr)
}

/// Full name for a state code, padded or not.
#[must_use]
pub fn state_name(state: &str) -> Option<&'static str> {
    let fips = normalize_state(state)?;
    STATES
        .iter()
        .find(|(code, _, _)| *code == fips)
        .map(|(_, _, name)| *name)
}

/// Two-digit FIPS code for a state abbreviation (case-insensitive).
#[must_use]
pub fn abbr_to_fips(abbr: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(_, a, _)| a.eq_ignore_ascii_case(abbr.trim()))
        .map(|(code, _, _)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_region_ids() {
        assert_eq!(region_id("6", "37").as_deref(), Some("06037"));
        assert_eq!(region_id("48", "201").as_deref(), Some("48201"));
        assert_eq!(region_id("6", "1037"), None);
        assert_eq!(region_id("CA", "37"), None);
    }

    #[test]
    fn state_lookups() {
        assert_eq!(STATES.len(), 51);
        assert_eq!(state_abbr("6"), Some("CA"));
        assert_eq!(state_name("06"), Some("California"));
        assert_eq!(state_abbr("99"), None);
        assert_eq!(abbr_to_fips("tx"), Some("48"));
        assert_eq!(abbr_to_fips("XX"), None);
    }
}

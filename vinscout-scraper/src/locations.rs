//! The fixed table of licence-plate registration locations.

use vinscout_common::{Result, VinscoutError};

/// Two-letter code to full state name, 50 states plus DC.
pub const LOCATIONS: [(&str, &str); 51] = [
    ("al", "alabama"),
    ("ak", "alaska"),
    ("az", "arizona"),
    ("ar", "arkansas"),
    ("ca", "california"),
    ("co", "colorado"),
    ("ct", "connecticut"),
    ("de", "delaware"),
    ("dc", "district of columbia"),
    ("fl", "florida"),
    ("ga", "georgia"),
    ("hi", "hawaii"),
    ("id", "idaho"),
    ("il", "illinois"),
    ("in", "indiana"),
    ("ia", "iowa"),
    ("ks", "kansas"),
    ("ky", "kentucky"),
    ("la", "louisiana"),
    ("me", "maine"),
    ("md", "maryland"),
    ("ma", "massachusetts"),
    ("mi", "michigan"),
    ("mn", "minnesota"),
    ("ms", "mississippi"),
    ("mo", "missouri"),
    ("mt", "montana"),
    ("ne", "nebraska"),
    ("nv", "nevada"),
    ("nh", "new hampshire"),
    ("nj", "new jersey"),
    ("nm", "new mexico"),
    ("ny", "new york"),
    ("nc", "north carolina"),
    ("nd", "north dakota"),
    ("oh", "ohio"),
    ("ok", "oklahoma"),
    ("or", "oregon"),
    ("pa", "pennsylvania"),
    ("ri", "rhode island"),
    ("sc", "south carolina"),
    ("sd", "south dakota"),
    ("tn", "tennessee"),
    ("tx", "texas"),
    ("ut", "utah"),
    ("vt", "vermont"),
    ("va", "virginia"),
    ("wa", "washington"),
    ("wv", "west virginia"),
    ("wi", "wisconsin"),
    ("wy", "wyoming"),
];

/// Resolve a two-letter location code to its full state name,
/// case-insensitively. Unknown codes fail with
/// [`VinscoutError::InvalidLocation`].
pub fn resolve(code: &str) -> Result<&'static str> {
    let needle = code.trim().to_ascii_lowercase();
    LOCATIONS
        .iter()
        .find(|(abbr, _)| *abbr == needle)
        .map(|(_, name)| *name)
        .ok_or_else(|| VinscoutError::InvalidLocation(code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_holds_fifty_one_unique_entries() {
        let codes: HashSet<_> = LOCATIONS.iter().map(|(abbr, _)| *abbr).collect();
        let names: HashSet<_> = LOCATIONS.iter().map(|(_, name)| *name).collect();
        assert_eq!(codes.len(), 51);
        assert_eq!(names.len(), 51);
    }

    #[test]
    fn every_code_resolves_to_its_own_name() {
        for (abbr, name) in LOCATIONS {
            assert_eq!(resolve(abbr).unwrap(), name);
        }
    }

    #[test]
    fn resolution_is_case_insensitive() {
        assert_eq!(resolve("CA").unwrap(), "california");
        assert_eq!(resolve("Dc").unwrap(), "district of columbia");
        assert_eq!(resolve(" ny ").unwrap(), "new york");
    }

    #[test]
    fn unknown_codes_fail_with_invalid_location() {
        for bad in ["zz", "puerto rico", "", "c"] {
            match resolve(bad) {
                Err(VinscoutError::InvalidLocation(code)) => assert_eq!(code, bad),
                other => panic!("expected InvalidLocation, got {other:?}"),
            }
        }
    }
}

//! Per-site selector tables.
//!
//! Every selector the navigation script touches lives here, keyed by role,
//! so pointing the scraper at a redesigned page (or a new site) is a data
//! change rather than a logic change. A profile is selected once, at session
//! construction, by matching the target URL against each profile's marker.

use vinscout_common::{Result, VinscoutError};

/// Fallback target when the request carries no URL.
pub const DEFAULT_SITE_URL: &str = "https://driving-tests.org/vin-decoder/";

/// Selector table for one target site.
#[derive(Debug, Clone, Copy)]
pub struct SiteProfile {
    /// Substring of the target URL that identifies this site.
    pub marker: &'static str,
    /// Licence-plate input fields (the page may render several).
    pub plate_input: &'static str,
    /// The state dropdown control.
    pub state_dropdown: &'static str,
    /// The dropdown's scrollable option list.
    pub option_list: &'static str,
    /// Substring carried by the `id` of every rendered option `div`.
    pub option_id_marker: &'static str,
    /// The search/submit button.
    pub search_button: &'static str,
    /// The element whose text carries the VIN on the results page.
    pub vin_element: &'static str,
}

/// All known site profiles.
pub const PROFILES: &[SiteProfile] = &[VEHICLE_HISTORY];

const VEHICLE_HISTORY: SiteProfile = SiteProfile {
    marker: "vehiclehistory",
    plate_input: "input[id^='input-']",
    state_dropdown: ".VhSelect--light > div:nth-child(1) > div:nth-child(1) > div:nth-child(1) > div:nth-child(3) > div:nth-child(1)",
    option_list: "#list-104",
    option_id_marker: "list",
    search_button: ".Search-licensePlate > div:nth-child(3)",
    vin_element: ".SummaryTopMenu-vin",
};

impl SiteProfile {
    /// Select the profile whose marker appears in `url`. Unknown sites fail
    /// at construction rather than partway through navigation.
    pub fn identify(url: &str) -> Result<&'static SiteProfile> {
        PROFILES
            .iter()
            .find(|profile| url.contains(profile.marker))
            .ok_or_else(|| {
                VinscoutError::Config(format!("no site profile covers url: {url}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehiclehistory_urls_are_identified() {
        let profile = SiteProfile::identify("https://example.test/vehiclehistory").unwrap();
        assert_eq!(profile.marker, "vehiclehistory");
        assert_eq!(profile.vin_element, ".SummaryTopMenu-vin");
    }

    #[test]
    fn unknown_sites_fail_at_identification() {
        assert!(matches!(
            SiteProfile::identify("https://other.example/decoder"),
            Err(VinscoutError::Config(_))
        ));
    }
}

//! Pure extraction helpers over page text and snapshots.

use scraper::{Html, Selector};

/// Pull the VIN out of the results element text: the last
/// whitespace-delimited token (e.g. `"Vehicle VIN: 1HGCM82633A004352"`).
pub fn vin_from_text(text: &str) -> Option<String> {
    text.split_whitespace().last().map(str::to_string)
}

/// Find the dropdown option for `state_name` in a page snapshot.
///
/// Scans every `div` whose `id` contains `id_marker` and returns the id of
/// the one whose visible text equals the state name, case-insensitively.
pub fn state_option_id(html: &str, state_name: &str, id_marker: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let divs = Selector::parse("div[id]").expect("static selector");

    for div in document.select(&divs) {
        let Some(id) = div.value().attr("id") else {
            continue;
        };
        if !id.contains(id_marker) {
            continue;
        }
        let text = div.text().collect::<String>();
        if text.trim().eq_ignore_ascii_case(state_name.trim()) {
            return Some(id.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const DROPDOWN_SNAPSHOT: &str = r#"
        <html><body>
          <div id="list-104">
            <div id="list-item-231-0">Alabama</div>
            <div id="list-item-231-4">California</div>
            <div id="list-item-231-32">New York</div>
          </div>
          <div id="sidebar">California dreaming</div>
        </body></html>
    "#;

    #[test]
    fn vin_is_the_last_whitespace_token() {
        assert_eq!(
            vin_from_text("Vehicle VIN: 1HGCM82633A004352").as_deref(),
            Some("1HGCM82633A004352")
        );
        assert_eq!(vin_from_text("1HGCM82633A004352").as_deref(), Some("1HGCM82633A004352"));
        assert_eq!(vin_from_text("   "), None);
        assert_eq!(vin_from_text(""), None);
    }

    #[test]
    fn state_option_matches_case_insensitively() {
        assert_eq!(
            state_option_id(DROPDOWN_SNAPSHOT, "california", "list").as_deref(),
            Some("list-item-231-4")
        );
        assert_eq!(
            state_option_id(DROPDOWN_SNAPSHOT, "NEW YORK", "list").as_deref(),
            Some("list-item-231-32")
        );
    }

    #[test]
    fn container_and_unrelated_divs_are_not_matched() {
        // The list container's text holds every state; only the exact-text
        // option may match, and divs without the marker are skipped even if
        // their text mentions the state.
        assert_eq!(state_option_id(DROPDOWN_SNAPSHOT, "texas", "list"), None);
    }
}

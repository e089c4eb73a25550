//! Lifecycle coverage that does not need a live browser: construction,
//! validation, login gating, idempotent close, and the output shape the CLI
//! ultimately emits.

use std::time::Duration;

use vinscout_common::{VehicleRecord, VinscoutError};
use vinscout_scraper::{ScrapeRequest, ScrapeSession};

fn california_request() -> ScrapeRequest {
    ScrapeRequest {
        url: Some("https://example.test/vehiclehistory".to_string()),
        licence_number: "ABC1234".to_string(),
        location: "ca".to_string(),
        timeout: Duration::from_secs(5),
        ..ScrapeRequest::default()
    }
}

#[tokio::test]
async fn lifecycle_up_to_the_browser_boundary() {
    let mut session = ScrapeSession::new(california_request()).expect("valid request");
    assert_eq!(session.state_name(), "california");

    // No credentials: login is a no-op.
    session.login().expect("login without credentials");

    // Nothing was opened, so the record is still empty and close is safe to
    // repeat.
    assert!(!session.record().is_populated());
    session.close().await;
    session.close().await;
}

#[test]
fn invalid_location_fails_before_any_side_effect() {
    let mut request = california_request();
    request.location = "xx".to_string();
    match ScrapeSession::new(request).err() {
        Some(VinscoutError::InvalidLocation(code)) => assert_eq!(code, "xx"),
        other => panic!("expected InvalidLocation, got {other:?}"),
    }
}

#[test]
fn emitted_array_has_the_documented_shape() {
    let mut record = VehicleRecord::new();
    record.set_vin("1HGCM82633A004352");

    let output = serde_json::to_string_pretty(&vec![record]).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed[0]["VIN Number"], "1HGCM82633A004352");
}

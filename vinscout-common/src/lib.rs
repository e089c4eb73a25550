//! Common types shared across the vinscout crates.
//!
//! This crate defines the shared error type, the scrape output record, and
//! the centralised tracing/logging initialisation. It is intentionally
//! lightweight so that every other crate can depend on it without pulling in
//! the browser stack.
//!
//! # Overview
//!
//! - [`VinscoutError`] and [`Result`]: shared error handling
//! - [`VehicleRecord`]: the terminal artifact of a scrape run
//! - [`observability`]: centralised tracing/logging initialisation
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod observability;

/// The single key a scrape run populates.
pub const VIN_KEY: &str = "VIN Number";

/// Default filename used by [`VehicleRecord::write_to_file`].
pub const DEFAULT_RECORD_FILE: &str = "data_structure.json";

/// Output of one scrape run: a sorted map holding the VIN under [`VIN_KEY`].
///
/// The record starts out with an empty VIN and is populated exactly once by
/// the extraction step. Sorting comes from the underlying `BTreeMap`, so
/// serialized output always has deterministic key order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct VehicleRecord(BTreeMap<String, String>);

impl Default for VehicleRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleRecord {
    /// A record with the VIN field present but empty.
    pub fn new() -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(VIN_KEY.to_string(), String::new());
        Self(fields)
    }

    /// Store the extracted VIN.
    pub fn set_vin(&mut self, vin: impl Into<String>) {
        self.0.insert(VIN_KEY.to_string(), vin.into());
    }

    /// The VIN value, empty until extraction has run.
    pub fn vin(&self) -> &str {
        self.0.get(VIN_KEY).map(String::as_str).unwrap_or_default()
    }

    /// Whether extraction has populated the record.
    pub fn is_populated(&self) -> bool {
        !self.vin().is_empty()
    }

    /// Pretty-printed JSON with sorted keys.
    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }

    /// Serialize the record to `path` as JSON.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string(&self.0)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

/// Error types used across the vinscout workspace.
#[derive(thiserror::Error, Debug)]
pub enum VinscoutError {
    /// The two-letter location code did not resolve to a known state.
    #[error("unknown location code: {0}")]
    InvalidLocation(String),

    /// The browser driver helper process or session could not start.
    #[error("browser driver failed to start: {0}")]
    DriverLaunch(String),

    /// An expected DOM element or page state never appeared.
    #[error("missing page source: {0}")]
    MissingPageSource(String),

    /// A bounded wait elapsed before the page reached the expected state.
    #[error("wait timed out before the page reached the expected state")]
    WaitTimeout,

    /// A declared capability has no implementation yet.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// Configuration was incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The driver reported an unexpected error.
    #[error("driver error: {0}")]
    Driver(#[from] anyhow::Error),
}

/// Convenient alias for results that use [`VinscoutError`].
pub type Result<T> = std::result::Result<T, VinscoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_starts_empty() {
        let record = VehicleRecord::new();
        assert_eq!(record.vin(), "");
        assert!(!record.is_populated());
    }

    #[test]
    fn record_serializes_with_sorted_keys() {
        let mut record = VehicleRecord::new();
        record.set_vin("1HGCM82633A004352");
        let json = record.to_json_pretty().unwrap();
        assert!(json.contains("\"VIN Number\": \"1HGCM82633A004352\""));
    }

    #[test]
    fn record_round_trips_through_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_RECORD_FILE);

        let mut record = VehicleRecord::new();
        record.set_vin("WBA3A5C51CF256987");
        record.write_to_file(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let loaded: VehicleRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(loaded, record);
    }
}

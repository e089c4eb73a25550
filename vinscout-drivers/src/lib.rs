//! Driver layer for browser automation.
//!
//! This crate owns everything that touches the WebDriver helper process and
//! the live browser: process launch and reaping, capability construction,
//! and page/element helpers used by the scrape session.
//!
//! - [`vinscout_browser::driver::VinscoutDriver`]: WebDriver client wrapper
//!   owning the spawned helper process
//! - [`vinscout_browser::page::SitePage`]: DOM queries and bounded waits
//! - [`vinscout_browser::proxy::ProxyConfig`]: the two proxy wiring
//!   strategies
//! - [`vinscout_browser::process`]: helper process lifecycle and reaper
pub mod vinscout_browser;

//! The vinscout scrape session and its supporting tables.
//!
//! One component, [`session::ScrapeSession`], owns the whole lifecycle:
//! configuration intake, browser launch, form interaction, VIN extraction,
//! and teardown. The site-specific selectors live in [`site`], the location
//! lookup in [`locations`], and the pure text/snapshot helpers in
//! [`extract`].
pub mod extract;
pub mod locations;
pub mod session;
pub mod site;

pub use session::{ScrapeRequest, ScrapeSession};
pub use site::{SiteProfile, DEFAULT_SITE_URL};

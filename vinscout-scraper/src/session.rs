//! The scrape session: one linear pass over the target site.
//!
//! The lifecycle is strictly sequential (open, login, navigate, extract,
//! close) with no retries and no branches back to earlier steps. The caller
//! owns cleanup on the error path: whatever step fails, `close` must still
//! be invoked exactly once.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};
use vinscout_common::{Result, VehicleRecord, VinscoutError};
use vinscout_drivers::vinscout_browser::driver::{LaunchSpec, VinscoutDriver};
use vinscout_drivers::vinscout_browser::page::{driver_err, is_not_interactable, Key, SitePage};
use vinscout_drivers::vinscout_browser::proxy::ProxyConfig;

use crate::extract::{state_option_id, vin_from_text};
use crate::locations;
use crate::site::{SiteProfile, DEFAULT_SITE_URL};

/// Number of End keypresses used to page the option list to its bottom.
const OPTION_PAGING_PASSES: usize = 4;
/// Dropdown open/scroll animations have a fixed duration; these delays are
/// the only unconditional sleeps left in the script.
const OPTION_RENDER_DELAY: Duration = Duration::from_millis(500);
const SELECTION_SETTLE_DELAY: Duration = Duration::from_millis(500);
/// How long the dropdown gets to become visible after the opening click.
const DROPDOWN_REVEAL_LIMIT: Duration = Duration::from_secs(5);

/// Immutable input for one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    /// Target URL; [`DEFAULT_SITE_URL`] applies when absent.
    pub url: Option<String>,
    /// The licence plate number to search for.
    pub licence_number: String,
    /// Two-letter registration location code.
    pub location: String,
    /// Optional proxy wiring.
    pub proxy: Option<ProxyConfig>,
    /// Site credentials; login is not implemented, see [`ScrapeSession::login`].
    pub web_username: Option<String>,
    pub web_password: Option<String>,
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Bound for the two element waits (plate input, VIN element).
    pub timeout: Duration,
    /// WebDriver helper binary.
    pub webdriver_binary: String,
    /// Port the helper listens on.
    pub webdriver_port: u16,
}

impl Default for ScrapeRequest {
    fn default() -> Self {
        Self {
            url: None,
            licence_number: String::new(),
            location: String::new(),
            proxy: None,
            web_username: None,
            web_password: None,
            headless: true,
            timeout: Duration::from_secs(60),
            webdriver_binary: "geckodriver".to_string(),
            webdriver_port: 4444,
        }
    }
}

/// Drives the whole scrape lifecycle against one site.
pub struct ScrapeSession {
    request: ScrapeRequest,
    profile: &'static SiteProfile,
    state_name: &'static str,
    record: VehicleRecord,
    driver: Option<VinscoutDriver>,
    snapshot: Option<String>,
    closed: bool,
}

impl ScrapeSession {
    /// Validate the request and select the site profile. Never touches the
    /// network: an unresolvable location code or unknown site fails here,
    /// before any browser process exists.
    pub fn new(request: ScrapeRequest) -> Result<Self> {
        let state_name = locations::resolve(&request.location)?;
        let url = request.url.as_deref().unwrap_or(DEFAULT_SITE_URL);
        let profile = SiteProfile::identify(url)?;

        Ok(Self {
            request,
            profile,
            state_name,
            record: VehicleRecord::new(),
            driver: None,
            snapshot: None,
            closed: false,
        })
    }

    /// The resolved full state name.
    pub fn state_name(&self) -> &str {
        self.state_name
    }

    /// The record populated by [`get_vehicle_details`](Self::get_vehicle_details).
    pub fn record(&self) -> &VehicleRecord {
        &self.record
    }

    /// The page source captured while matching the dropdown options, if
    /// navigation got that far.
    pub fn page_snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    /// Launch the browser (through the proxy when configured) and open the
    /// target URL.
    pub async fn open(&mut self, headless: bool) -> Result<()> {
        if let Some(proxy) = &self.request.proxy {
            info!(host = %proxy.host, port = proxy.port, "accessing url using proxy settings");
        }

        let spec = LaunchSpec {
            binary: self.request.webdriver_binary.clone(),
            port: self.request.webdriver_port,
            headless,
            proxy: self.request.proxy.clone(),
        };
        let mut driver = VinscoutDriver::launch(&spec).await?;

        let url = self
            .request
            .url
            .clone()
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
        info!(%url, "accessing");
        driver.goto(&url).await?;
        info!(%url, "successfully opened");

        self.driver = Some(driver);
        Ok(())
    }

    /// Site authentication. Nothing to do without credentials; with both
    /// present this fails explicitly so callers are not misled into
    /// believing a login happened.
    pub fn login(&self) -> Result<()> {
        match (&self.request.web_username, &self.request.web_password) {
            (Some(_), Some(_)) => Err(VinscoutError::NotImplemented("site login")),
            _ => Ok(()),
        }
    }

    /// The fixed interaction script: plate entry, state selection, search.
    pub async fn navigate(&mut self) -> Result<()> {
        let profile = self.profile;
        let timeout = self.request.timeout;
        let page = self.page()?;

        // Plate entry. The page may render several plate inputs; type into
        // every one that accepts keys and skip the rest.
        page.wait_for(profile.plate_input, timeout).await?;
        let inputs = page.find_all(profile.plate_input).await?;
        debug!(count = inputs.len(), "typing licence number into plate inputs");
        for input in &inputs {
            match input.send_text(&self.request.licence_number).await {
                Ok(()) => {}
                Err(e) if is_not_interactable(&e) => {
                    debug!("plate input not interactable, skipped");
                }
                Err(e) => return Err(driver_err(e)),
            }
        }

        // Open the state dropdown and require it to actually appear.
        let dropdown = page.find(profile.state_dropdown).await?;
        dropdown.click().await?;
        if !dropdown.wait_displayed(DROPDOWN_REVEAL_LIMIT).await? {
            return Err(VinscoutError::MissingPageSource(
                "state dropdown never became visible".to_string(),
            ));
        }

        // The option list renders lazily; page it to the end and back so
        // every option materialises in the markup.
        let option_list = page.find(profile.option_list).await?;
        for _ in 0..OPTION_PAGING_PASSES {
            sleep(OPTION_RENDER_DELAY).await;
            option_list.press_key(Key::End).await?;
        }
        option_list.press_key(Key::Home).await?;

        // Match the state against the rendered options and click its id.
        let html = page.source().await?;
        let option_id = state_option_id(&html, self.state_name, profile.option_id_marker);
        self.snapshot = Some(html);
        let option_id = option_id.ok_or_else(|| {
            VinscoutError::MissingPageSource(format!(
                "no dropdown option found for state '{}'",
                self.state_name
            ))
        })?;
        info!(%option_id, state = self.state_name, "selecting state");
        page.find_by_id(&option_id).await?.click().await?;
        sleep(SELECTION_SETTLE_DELAY).await;

        page.find(profile.search_button).await?.click().await?;
        Ok(())
    }

    /// Wait for the results page and pull the VIN out of it.
    pub async fn get_vehicle_details(&mut self) -> Result<()> {
        let timeout = self.request.timeout;
        let vin_element = self.profile.vin_element;
        let page = self.page()?;

        let element = page.wait_for(vin_element, timeout).await?;
        let text = element.text().await?;
        let vin = vin_from_text(&text).ok_or_else(|| {
            VinscoutError::MissingPageSource("vin element carried no text".to_string())
        })?;

        info!(%vin, "extracted vin");
        self.record.set_vin(vin);
        Ok(())
    }

    /// Close the browser and reap the helper process. Safe to call any
    /// number of times; only the first call tears anything down.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        if let Some(driver) = self.driver.take() {
            info!("closing the browser");
            if let Err(e) = driver.close().await {
                warn!(error = %e, "browser close reported an error");
            }
            info!("done");
        }
        self.closed = true;
    }

    fn page(&self) -> Result<SitePage> {
        self.driver
            .as_ref()
            .map(VinscoutDriver::page)
            .ok_or_else(|| {
                VinscoutError::MissingPageSource("browser session is not open".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(location: &str) -> ScrapeRequest {
        ScrapeRequest {
            url: Some("https://example.test/vehiclehistory".to_string()),
            licence_number: "ABC1234".to_string(),
            location: location.to_string(),
            ..ScrapeRequest::default()
        }
    }

    #[test]
    fn construct_resolves_location_before_any_launch() {
        let session = ScrapeSession::new(request("ca")).unwrap();
        assert_eq!(session.state_name(), "california");
        assert!(session.driver.is_none());
        assert!(session.page_snapshot().is_none());
        assert!(!session.record().is_populated());
    }

    #[test]
    fn construct_rejects_unknown_locations() {
        match ScrapeSession::new(request("zz")).err() {
            Some(VinscoutError::InvalidLocation(code)) => assert_eq!(code, "zz"),
            other => panic!("expected InvalidLocation, got {other:?}"),
        }
    }

    #[test]
    fn construct_rejects_unknown_sites() {
        let mut req = request("ca");
        req.url = Some("https://unrelated.example/search".to_string());
        assert!(matches!(
            ScrapeSession::new(req),
            Err(VinscoutError::Config(_))
        ));
    }

    #[test]
    fn login_without_credentials_is_a_no_op() {
        let session = ScrapeSession::new(request("ca")).unwrap();
        assert!(session.login().is_ok());
    }

    #[test]
    fn login_with_credentials_is_explicitly_unimplemented() {
        let mut req = request("ca");
        req.web_username = Some("user".to_string());
        req.web_password = Some("pass".to_string());
        let session = ScrapeSession::new(req).unwrap();
        assert!(matches!(
            session.login(),
            Err(VinscoutError::NotImplemented("site login"))
        ));
    }

    #[test]
    fn partial_credentials_skip_login_like_the_no_op_path() {
        let mut req = request("ca");
        req.web_username = Some("user".to_string());
        let session = ScrapeSession::new(req).unwrap();
        assert!(session.login().is_ok());
    }

    #[tokio::test]
    async fn close_is_idempotent_without_an_open_browser() {
        let mut session = ScrapeSession::new(request("ca")).unwrap();
        session.close().await;
        assert!(session.closed);
        // Second and later calls are no-ops.
        session.close().await;
        session.close().await;
        assert!(session.closed);
    }

    #[tokio::test]
    async fn steps_after_close_fail_with_missing_page_source() {
        let mut session = ScrapeSession::new(request("ca")).unwrap();
        session.close().await;
        assert!(matches!(
            session.navigate().await,
            Err(VinscoutError::MissingPageSource(_))
        ));
        assert!(matches!(
            session.get_vehicle_details().await,
            Err(VinscoutError::MissingPageSource(_))
        ));
    }
}

use std::time::Duration;

use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, Locator};

pub use fantoccini::key::Key;
use tokio::time::{sleep, Instant};
use fantoccini::error::ErrorStatus;
use vinscout_common::{Result, VinscoutError};

/// Poll cadence for bounded condition waits.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Map a WebDriver command error into the shared error type, keeping the
/// bounded-wait timeout distinct from other driver failures.
pub fn driver_err(err: CmdError) -> VinscoutError {
    match err {
        CmdError::WaitTimeout => VinscoutError::WaitTimeout,
        other => VinscoutError::Driver(anyhow::Error::new(other)),
    }
}

/// Whether `err` is the "element not interactable" WebDriver error.
pub fn is_not_interactable(err: &CmdError) -> bool {
    matches!(err, CmdError::Standard(w) if w.error == ErrorStatus::ElementNotInteractable)
}

/// High-level page wrapper providing element queries and bounded waits.
pub struct SitePage {
    client: Client,
}

impl SitePage {
    /// Construct a page wrapper around an existing WebDriver client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Navigate to `url`.
    pub async fn goto(&mut self, url: &str) -> Result<()> {
        self.client.goto(url).await.map_err(driver_err)
    }

    /// Return the full page HTML source.
    pub async fn source(&self) -> Result<String> {
        self.client.source().await.map_err(driver_err)
    }

    /// Find a single element by CSS selector.
    pub async fn find(&self, selector: &str) -> Result<SiteElement> {
        let element = self
            .client
            .find(Locator::Css(selector))
            .await
            .map_err(driver_err)?;
        Ok(SiteElement::new(element))
    }

    /// Find zero or more elements by CSS selector.
    pub async fn find_all(&self, selector: &str) -> Result<Vec<SiteElement>> {
        let elements = self
            .client
            .find_all(Locator::Css(selector))
            .await
            .map_err(driver_err)?;
        Ok(elements.into_iter().map(SiteElement::new).collect())
    }

    /// Find a single element by id.
    pub async fn find_by_id(&self, id: &str) -> Result<SiteElement> {
        let element = self
            .client
            .find(Locator::Id(id))
            .await
            .map_err(driver_err)?;
        Ok(SiteElement::new(element))
    }

    /// Wait for an element matching the CSS selector to be present,
    /// bounded by `limit`. A timeout surfaces as
    /// [`VinscoutError::WaitTimeout`].
    pub async fn wait_for(&self, selector: &str, limit: Duration) -> Result<SiteElement> {
        let element = self
            .client
            .wait()
            .at_most(limit)
            .every(POLL_INTERVAL)
            .for_element(Locator::Css(selector))
            .await
            .map_err(driver_err)?;
        Ok(SiteElement::new(element))
    }
}

/// Wrapper for DOM elements with typed helpers consistent with [`SitePage`].
pub struct SiteElement {
    element: Element,
}

impl SiteElement {
    fn new(element: Element) -> Self {
        Self { element }
    }

    /// Type text into the element. The raw error is returned so callers can
    /// distinguish interactability failures from everything else.
    pub async fn send_text(&self, text: &str) -> std::result::Result<(), CmdError> {
        self.element.send_keys(text).await
    }

    /// Send a single control key (End, Home, ...).
    pub async fn press_key(&self, key: Key) -> Result<()> {
        let ch: char = key.into();
        self.element
            .send_keys(&ch.to_string())
            .await
            .map_err(driver_err)
    }

    /// Click the element.
    pub async fn click(&self) -> Result<()> {
        self.element.click().await.map_err(driver_err)
    }

    /// The element's visible text.
    pub async fn text(&self) -> Result<String> {
        self.element.text().await.map_err(driver_err)
    }

    /// Read an attribute value.
    pub async fn attr(&self, name: &str) -> Result<Option<String>> {
        self.element.attr(name).await.map_err(driver_err)
    }

    /// Whether the element is currently displayed.
    pub async fn is_displayed(&self) -> Result<bool> {
        self.element.is_displayed().await.map_err(driver_err)
    }

    /// Poll visibility until the element is displayed or `limit` elapses.
    /// Returns whether it became visible in time.
    pub async fn wait_displayed(&self, limit: Duration) -> Result<bool> {
        let deadline = Instant::now() + limit;
        loop {
            if self.is_displayed().await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_timeouts_stay_distinct_from_driver_errors() {
        assert!(matches!(
            driver_err(CmdError::WaitTimeout),
            VinscoutError::WaitTimeout
        ));
        assert!(matches!(
            driver_err(CmdError::NotW3C(serde_json::Value::Null)),
            VinscoutError::Driver(_)
        ));
    }
}

use std::time::Duration;

use fantoccini::{Client, ClientBuilder};
use serde_json::{json, Value};
use tracing::info;
use vinscout_common::{Result, VinscoutError};
use webdriver::capabilities::Capabilities;

use crate::vinscout_browser::{page::SitePage, process::DriverProcess, proxy::ProxyConfig};

const STARTUP_LIMIT: Duration = Duration::from_secs(15);

/// Launch parameters for one browser session.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// WebDriver helper binary (geckodriver).
    pub binary: String,
    /// Port the helper listens on.
    pub port: u16,
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Optional proxy wiring.
    pub proxy: Option<ProxyConfig>,
}

impl Default for LaunchSpec {
    fn default() -> Self {
        Self {
            binary: "geckodriver".to_string(),
            port: 4444,
            headless: true,
            proxy: None,
        }
    }
}

/// Thin wrapper around a `fantoccini` WebDriver client that also owns the
/// helper process it connected to.
pub struct VinscoutDriver {
    client: Client,
    process: DriverProcess,
}

impl VinscoutDriver {
    /// Spawn the helper, wait for it to report ready, and open a browser
    /// session with capabilities built from `spec`.
    pub async fn launch(spec: &LaunchSpec) -> Result<Self> {
        let mut process = DriverProcess::spawn(&spec.binary, spec.port)?;
        if let Err(e) = process.wait_ready(spec.port, STARTUP_LIMIT).await {
            process.shutdown().await;
            return Err(e);
        }

        let caps = build_capabilities(spec)?;
        let endpoint = format!("http://127.0.0.1:{}", spec.port);
        match ClientBuilder::native()
            .capabilities(caps)
            .connect(&endpoint)
            .await
        {
            Ok(client) => {
                info!(%endpoint, headless = spec.headless, "browser session established");
                Ok(Self { client, process })
            }
            Err(e) => {
                process.shutdown().await;
                Err(VinscoutError::DriverLaunch(format!(
                    "webdriver session could not be created: {e}"
                )))
            }
        }
    }

    /// Navigate to `url` and return a [`SitePage`] for it.
    pub async fn goto(&mut self, url: &str) -> Result<SitePage> {
        let mut page = SitePage::new(self.client.clone());
        page.goto(url).await?;
        Ok(page)
    }

    /// A page wrapper for the current browser state.
    pub fn page(&self) -> SitePage {
        SitePage::new(self.client.clone())
    }

    /// End the WebDriver session and tear down the helper process.
    pub async fn close(mut self) -> Result<()> {
        self.client.close().await.map_err(anyhow::Error::new)?;
        self.process.shutdown().await;
        Ok(())
    }
}

fn build_capabilities(spec: &LaunchSpec) -> Result<Capabilities> {
    let mut caps = Capabilities::new();
    let mut firefox_opts = serde_json::Map::new();

    let mut args: Vec<Value> = Vec::new();
    if spec.headless {
        args.push(json!("-headless"));
    }
    firefox_opts.insert("args".to_string(), Value::Array(args));

    if let Some(proxy) = &spec.proxy {
        info!(host = %proxy.host, port = proxy.port, upstream = proxy.upstream, "wiring proxy");
        if proxy.upstream {
            caps.insert("proxy".to_string(), proxy.upstream_capability()?);
        } else {
            firefox_opts.insert(
                "prefs".to_string(),
                Value::Object(proxy.profile_preferences()),
            );
        }
    }

    caps.insert(
        "moz:firefoxOptions".to_string(),
        Value::Object(firefox_opts),
    );
    Ok(caps)
}

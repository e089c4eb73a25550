use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use vinscout_common::observability::{init_logging, LogConfig};
use vinscout_common::VehicleRecord;
use vinscout_config::{default_config_path, VinscoutConfig, VinscoutConfigLoader};
use vinscout_drivers::vinscout_browser::proxy::ProxyConfig;
use vinscout_scraper::{ScrapeRequest, ScrapeSession};

/// Web scraping tool for vehicle information by VIN number.
#[derive(Parser, Debug)]
#[command(name = "vinscout", version, about)]
struct Cli {
    /// URL to access.
    #[arg(long)]
    url: String,

    /// A licence number.
    #[arg(long)]
    licence_number: String,

    /// A location where the licence is registered, e.g. CA for California.
    #[arg(long)]
    location: String,

    /// Open a visible browser window (debugging mode).
    #[arg(long)]
    no_headless: bool,

    /// Print the raw record structure instead of JSON.
    #[arg(long)]
    no_json_output: bool,

    /// Proxy address.
    #[arg(long, requires = "port")]
    host: Option<String>,

    /// Proxy port.
    #[arg(long, requires = "host")]
    port: Option<u16>,

    /// Username to access the proxy.
    #[arg(long)]
    username: Option<String>,

    /// Password to access the proxy.
    #[arg(long)]
    password: Option<String>,

    /// Wire the proxy as one upstream authority URL for every channel
    /// instead of browser profile preferences.
    #[arg(long)]
    upstream_proxy: bool,

    /// Username to access the website (if any).
    #[arg(long)]
    web_username: Option<String>,

    /// Password to access the website (if any).
    #[arg(long)]
    web_password: Option<String>,

    /// Log level to use: INFO, DEBUG or ERROR.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Bound in seconds for the element waits.
    #[arg(long)]
    timeout: Option<u64>,

    /// Explicit config file (otherwise ./vinscout.yaml and the user config
    /// dir are consulted).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to the file sink and stderr; stdout stays reserved for the
    // result array.
    init_logging(LogConfig {
        emit_stderr: true,
        default_filter: cli.log_level.to_lowercase(),
        ..LogConfig::default()
    })?;

    let defaults = load_defaults(&cli)?;
    let request = build_request(&cli, &defaults);
    let headless = !cli.no_headless && defaults.browser.headless;

    // Every failure ends up here: report it, make sure the browser is torn
    // down, and still emit a (possibly empty) result array.
    let mut records: Vec<VehicleRecord> = Vec::new();
    match ScrapeSession::new(request) {
        Ok(mut session) => {
            match run(&mut session, headless).await {
                Ok(()) => records.push(session.record().clone()),
                Err(err) => {
                    error!(%err, "scrape failed");
                    eprintln!("{err}");
                }
            }
            session.close().await;
        }
        Err(err) => {
            error!(%err, "invalid scrape request");
            eprintln!("{err}");
        }
    }

    if cli.no_json_output {
        println!("{records:?}");
    } else {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }
    Ok(())
}

/// The linear scrape sequence. Any failure aborts the run; the caller is
/// responsible for closing the session afterwards.
async fn run(session: &mut ScrapeSession, headless: bool) -> vinscout_common::Result<()> {
    session.open(headless).await?;
    session.login()?;
    session.navigate().await?;
    session.get_vehicle_details().await?;
    Ok(())
}

fn load_defaults(cli: &Cli) -> Result<VinscoutConfig> {
    let mut loader = VinscoutConfigLoader::new();
    if let Some(user_path) = default_config_path() {
        loader = loader.with_file(user_path);
    }
    loader = loader.with_file("vinscout.yaml");
    if let Some(explicit) = &cli.config {
        loader = loader.with_file(explicit);
    }
    Ok(loader.load()?)
}

fn build_request(cli: &Cli, defaults: &VinscoutConfig) -> ScrapeRequest {
    // A proxy given on the command line replaces the configured one
    // entirely; otherwise the config section applies as-is.
    let proxy = match (&cli.host, &cli.port) {
        (Some(host), Some(port)) => Some(ProxyConfig {
            host: host.clone(),
            port: *port,
            username: cli.username.clone(),
            password: cli.password.clone(),
            upstream: cli.upstream_proxy,
        }),
        _ => defaults.proxy.as_ref().map(|p| ProxyConfig {
            host: p.host.clone(),
            port: p.port,
            username: p.username.clone(),
            password: p.password.clone(),
            upstream: p.upstream || cli.upstream_proxy,
        }),
    };

    ScrapeRequest {
        url: Some(cli.url.clone()),
        licence_number: cli.licence_number.clone(),
        location: cli.location.clone(),
        proxy,
        web_username: cli.web_username.clone(),
        web_password: cli.web_password.clone(),
        headless: !cli.no_headless,
        timeout: Duration::from_secs(cli.timeout.unwrap_or(defaults.browser.timeout_secs)),
        webdriver_binary: defaults.webdriver.binary.clone(),
        webdriver_port: defaults.webdriver.port,
    }
}

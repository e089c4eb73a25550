//! Loader for vinscout defaults with YAML + environment overlays.
//!
//! CLI flags always win; this crate only supplies the fallback values for
//! flags the user left unset (WebDriver binary/port, proxy wiring, browser
//! behavior). Sources are merged in order: optional YAML file, then
//! `VINSCOUT__`-prefixed environment variables, with `${VAR}` placeholders
//! expanded before deserialization so credentials can be kept out of files.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAX_ENV_EXPANSION_DEPTH: usize = 8;

/// Fallback values merged beneath the CLI surface.
#[derive(Debug, Default, Deserialize)]
pub struct VinscoutConfig {
    #[serde(default)]
    pub webdriver: WebdriverSettings,
    #[serde(default)]
    pub browser: BrowserSettings,
    #[serde(default)]
    pub proxy: Option<ProxySettings>,
}

/// Where to find the WebDriver helper binary and which port to run it on.
#[derive(Debug, Deserialize)]
pub struct WebdriverSettings {
    #[serde(default = "default_webdriver_binary")]
    pub binary: String,
    #[serde(default = "default_webdriver_port")]
    pub port: u16,
}

impl Default for WebdriverSettings {
    fn default() -> Self {
        Self {
            binary: default_webdriver_binary(),
            port: default_webdriver_port(),
        }
    }
}

/// Browser session defaults.
#[derive(Debug, Deserialize)]
pub struct BrowserSettings {
    #[serde(default = "default_true")]
    pub headless: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Proxy defaults; host and port are mandatory when the section is present.
#[derive(Debug, Deserialize)]
pub struct ProxySettings {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Select the upstream authority-URL transport instead of profile
    /// preference injection.
    #[serde(default)]
    pub upstream: bool,
}

fn default_webdriver_binary() -> String {
    "geckodriver".to_string()
}
fn default_webdriver_port() -> u16 {
    4444
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_true() -> bool {
    true
}

/// Well-known location for a user-level config file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vinscout").join("vinscout.yaml"))
}

fn expand_str(s: &mut String) {
    let mut current = std::mem::take(s);
    for _ in 0..MAX_ENV_EXPANSION_DEPTH {
        let expanded = match shellexpand::env(&current) {
            Ok(cow) => cow.into_owned(),
            Err(_) => break,
        };
        if expanded == current {
            break;
        }
        current = expanded;
    }
    *s = current;
}

fn expand_env(value: &mut Value) {
    match value {
        Value::String(s) if s.contains('$') => expand_str(s),
        Value::Array(items) => items.iter_mut().for_each(expand_env),
        Value::Object(map) => map.values_mut().for_each(expand_env),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (optional YAML + env overrides).
pub struct VinscoutConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for VinscoutConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl VinscoutConfigLoader {
    /// Start an empty loader; the `VINSCOUT` environment source is attached
    /// at [`load`](Self::load) time so environment values always override
    /// file values.
    ///
    /// ```
    /// use vinscout_config::VinscoutConfigLoader;
    ///
    /// let config = VinscoutConfigLoader::new().load().expect("valid config");
    /// assert_eq!(config.webdriver.port, 4444);
    /// assert!(config.proxy.is_none());
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a config file; missing files are skipped so environment-only
    /// deployments keep working.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet (tests and CLI overrides).
    ///
    /// ```
    /// use vinscout_config::VinscoutConfigLoader;
    ///
    /// let cfg = VinscoutConfigLoader::new()
    ///     .with_yaml_str("browser:\n  headless: false")
    ///     .load()
    ///     .unwrap();
    /// assert!(!cfg.browser.headless);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders anywhere in the tree are expanded first, so a
    /// file can say `password: "${PROXY_PASS}"` and pick the value up from
    /// the environment at load time.
    pub fn load(self) -> Result<VinscoutConfig, ConfigError> {
        let merged = self
            .builder
            .add_source(
                Environment::with_prefix("VINSCOUT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut tree: Value = merged.try_deserialize()?;
        expand_env(&mut tree);

        serde_json::from_value(tree).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

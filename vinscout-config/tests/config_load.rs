use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;
use vinscout_config::VinscoutConfigLoader;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn loads_file_with_env_expansion() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
webdriver:
  binary: /usr/local/bin/geckodriver
  port: 4445
browser:
  headless: false
  timeout_secs: 30
proxy:
  host: proxy.internal
  port: 8080
  username: "${VINSCOUT_TEST_PROXY_USER}"
  upstream: true
"#;
    let p = write_yaml(&tmp, "vinscout.yaml", file_yaml);

    temp_env::with_var("VINSCOUT_TEST_PROXY_USER", Some("scout"), || {
        let config = VinscoutConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config");

        assert_eq!(config.webdriver.binary, "/usr/local/bin/geckodriver");
        assert_eq!(config.webdriver.port, 4445);
        assert!(!config.browser.headless);
        assert_eq!(config.browser.timeout_secs, 30);

        let proxy = config.proxy.expect("proxy section");
        assert_eq!(proxy.host, "proxy.internal");
        assert_eq!(proxy.port, 8080);
        assert_eq!(proxy.username.as_deref(), Some("scout"));
        assert_eq!(proxy.password, None);
        assert!(proxy.upstream);
    });
}

#[test]
#[serial]
fn missing_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();

    let config = VinscoutConfigLoader::new()
        .with_file(tmp.path().join("does-not-exist.yaml"))
        .load()
        .expect("load config");

    assert_eq!(config.webdriver.binary, "geckodriver");
    assert_eq!(config.webdriver.port, 4444);
    assert!(config.browser.headless);
    assert_eq!(config.browser.timeout_secs, 60);
    assert!(config.proxy.is_none());
}

#[test]
#[serial]
fn environment_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "vinscout.yaml", "browser:\n  timeout_secs: 30\n");

    temp_env::with_var("VINSCOUT__BROWSER__TIMEOUT_SECS", Some("90"), || {
        let config = VinscoutConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config");
        assert_eq!(config.browser.timeout_secs, 90);
    });
}

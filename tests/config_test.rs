//! Config loading and defaults integration tests

use std::path::PathBuf;

#[test]
fn test_minimal_config_parses() {
    let toml_str = r#"
[server]

[store]

[notify]
"#;

    let config: toml::Value = toml::from_str(toml_str).expect("valid TOML");
    assert!(config.get("server").is_some());
    assert!(config.get("store").is_some());
    assert!(config.get("notify").is_some());
}

#[test]
fn test_config_with_all_fields() {
    let toml_str = r#"
[server]
http_port = 3002

[store]
data_dir = "/var/lib/washboard"
snapshot_file = "vret-wash.json"

[notify]
webhook_url = "https://hooks.slack.com/services/T0/B0/x"
"#;

    let config: toml::Value = toml::from_str(toml_str).expect("valid TOML");

    let server = config.get("server").unwrap();
    assert_eq!(server.get("http_port").unwrap().as_integer().unwrap(), 3002);

    let store = config.get("store").unwrap();
    assert_eq!(
        store.get("data_dir").unwrap().as_str().unwrap(),
        "/var/lib/washboard"
    );
    assert_eq!(
        store.get("snapshot_file").unwrap().as_str().unwrap(),
        "vret-wash.json"
    );

    let notify = config.get("notify").unwrap();
    assert_eq!(
        notify.get("webhook_url").unwrap().as_str().unwrap(),
        "https://hooks.slack.com/services/T0/B0/x"
    );
}

#[test]
fn test_config_missing_file_uses_defaults() {
    // Mirrors the startup path: a missing config file falls back to defaults
    let config_path = "/nonexistent/path/to/washboard.toml";
    assert!(!std::path::Path::new(config_path).exists());
}

#[test]
fn test_cli_override_pattern() {
    let mut data_dir = PathBuf::from("./data");
    let mut http_port: u16 = 3002;
    let mut webhook_url: Option<String> = None;

    let cli_data_dir = Some("/tmp/override".to_string());
    let cli_http_port = Some(8080u16);
    let cli_webhook: Option<String> = Some("https://hooks.slack.com/services/T0/B0/x".to_string());

    if let Some(dir) = cli_data_dir {
        data_dir = PathBuf::from(dir);
    }
    if let Some(port) = cli_http_port {
        http_port = port;
    }
    if let Some(url) = cli_webhook {
        webhook_url = Some(url);
    }

    assert_eq!(data_dir, PathBuf::from("/tmp/override"));
    assert_eq!(http_port, 8080);
    assert!(webhook_url.is_some());
}

#[test]
fn test_invalid_toml_returns_error() {
    let bad_toml = "this is not valid { toml }}}";
    let result: Result<toml::Value, _> = toml::from_str(bad_toml);
    assert!(result.is_err());
}

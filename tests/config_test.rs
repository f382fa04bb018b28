//! Config loading and defaults integration tests

use std::path::PathBuf;

use esg_ledger::config::Config;

#[test]
fn test_config_with_all_fields() {
    let toml_str = r#"
[server]
bind = "127.0.0.1"
http_port = 9090
static_dir = "/srv/esg/public"

[storage]
data_dir = "/var/lib/esg-ledger"

[reports]
default_framework = "SASB"
default_period = "FY2025"

[dashboard]
recent_activities = 10
"#;

    let config: Config = toml::from_str(toml_str).expect("valid TOML");

    assert_eq!(config.server.bind, "127.0.0.1");
    assert_eq!(config.server.http_port, 9090);
    assert_eq!(config.server.static_dir, PathBuf::from("/srv/esg/public"));
    assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/esg-ledger"));
    assert_eq!(config.reports.default_framework, "SASB");
    assert_eq!(config.reports.default_period, "FY2025");
    assert_eq!(config.dashboard.recent_activities, 10);
}

#[test]
fn test_config_file_on_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("esg-ledger.toml");
    std::fs::write(&path, "[storage]\ndata_dir = \"ledger-data\"\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.storage.data_dir, PathBuf::from("ledger-data"));
    assert_eq!(config.server.http_port, 3000);
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("esg-ledger.toml");
    std::fs::write(&path, "[server]\nhttp_port = \"not a number\"\n").unwrap();

    assert!(Config::load(&path).is_err());
}

#[test]
fn test_config_serializes_back_to_toml() {
    let config = Config::default();
    let rendered = toml::to_string(&config).expect("serializable");
    let reparsed: Config = toml::from_str(&rendered).expect("round-trips");

    assert_eq!(reparsed.server.http_port, config.server.http_port);
    assert_eq!(reparsed.reports.default_framework, "GRI");
}

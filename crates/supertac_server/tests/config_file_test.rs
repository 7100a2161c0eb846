//! Loading server configuration from disk.

use std::io::Write;
use std::time::Duration;
use supertac_server::ServerConfig;
use tempfile::NamedTempFile;

#[test]
fn test_partial_file_keeps_defaults_for_missing_keys() {
    let mut file = NamedTempFile::new().expect("temp file");
    writeln!(file, "[server]\nport = 4100\n\n[ai]\nsearch_depth = 4\nthink_delay_ms = 0").expect("write");

    let config = ServerConfig::from_file(file.path()).expect("valid config");
    assert_eq!(config.bind_address(), "127.0.0.1:4100");
    assert_eq!(*config.ai().search_depth(), 4);
    assert_eq!(config.ai().think_delay(), Duration::ZERO);
    assert_eq!(*config.ai().search_config().time_budget(), Some(Duration::from_millis(1500)));
}

#[test]
fn test_missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = ServerConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.message.starts_with("Failed to read config file"));
}

#[test]
fn test_malformed_file_is_a_config_error() {
    let mut file = NamedTempFile::new().expect("temp file");
    writeln!(file, "[server]\nport = \"not a number\"").expect("write");
    let err = ServerConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.starts_with("Failed to parse config"));
}

//! Configuration loading tests

use context_zones::config::{LogFormat, load_config, load_config_from_str};
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;

const FULL_CONFIG: &str = r#"
[zones]
registry = "/etc/context-zones/zones.toml"
content_dirs = ["/srv/zones", "~/.claude"]
builtin_defaults = false

[overrides]
file_name = ".zone"
search_depth = 3

[metrics]
enabled = false
log_path = "/var/log/zones.log"
window = 50
recent = 4

[server]
name = "zones-test"
version = "9.9.9"

[logging]
level = "debug"
format = "json"
"#;

fn write_settings(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = load_config_from_str("").unwrap();

    assert_eq!(config.overrides.file_name, ".claude-zone");
    assert_eq!(config.overrides.search_depth, 0);
    assert!(config.metrics.enabled);
    assert!(config.zones.builtin_defaults);
    assert!(config
        .zones
        .registry
        .as_deref()
        .is_some_and(|r| r.ends_with(".claude/zones.json")));
}

#[test]
fn test_full_config() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();

    assert_eq!(
        config.zones.registry_path(),
        Some(PathBuf::from("/etc/context-zones/zones.toml"))
    );
    assert_eq!(config.zones.content_paths()[0], PathBuf::from("/srv/zones"));
    assert!(!config.zones.builtin_defaults);
    assert_eq!(config.overrides.file_name, ".zone");
    assert_eq!(config.overrides.search_depth, 3);
    assert!(!config.metrics.enabled);
    assert_eq!(config.metrics.log_file(), PathBuf::from("/var/log/zones.log"));
    assert_eq!(config.metrics.window, 50);
    assert_eq!(config.metrics.recent, 4);
    assert_eq!(config.server.name, "zones-test");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_invalid_values_rejected() {
    assert!(load_config_from_str("[metrics]\nwindow = 0\n").is_err());
    assert!(load_config_from_str("[overrides]\nfile_name = \"a/b\"\n").is_err());
    assert!(load_config_from_str("[logging]\nformat = \"xml\"\n").is_err());
}

#[test]
#[serial]
fn test_load_from_file() {
    let file = write_settings(FULL_CONFIG);
    let config = load_config(Some(file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.overrides.file_name, ".zone");
}

#[test]
#[serial]
fn test_missing_explicit_file_is_error() {
    let err = load_config(Some("/nonexistent/context-zones.toml")).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let file = write_settings(FULL_CONFIG);

    // SAFETY: tests touching the environment are serialized
    unsafe {
        std::env::set_var("CONTEXT_ZONES__METRICS__WINDOW", "7");
        std::env::set_var("CONTEXT_ZONES__OVERRIDES__FILE_NAME", ".env-zone");
    }
    let config = load_config(Some(file.path().to_str().unwrap()));
    unsafe {
        std::env::remove_var("CONTEXT_ZONES__METRICS__WINDOW");
        std::env::remove_var("CONTEXT_ZONES__OVERRIDES__FILE_NAME");
    }

    let config = config.unwrap();
    assert_eq!(config.metrics.window, 7);
    assert_eq!(config.overrides.file_name, ".env-zone");
    assert_eq!(config.metrics.recent, 4);
}

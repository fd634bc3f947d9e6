//! Configuration types for context-zones
//!
//! Application settings loaded from TOML files and/or environment variables.
//! The zone registry itself is a separate file (see `zones.registry`).

use crate::util::expand_home;
use crate::zones::types::OVERRIDE_FILE_NAME;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Zone registry and content locations
    pub zones: ZonesConfig,

    /// Override marker settings
    pub overrides: OverridesConfig,

    /// Usage history settings
    pub metrics: MetricsConfig,

    /// MCP server settings
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Zone registry and content locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ZonesConfig {
    /// User zone registry (JSON, or TOML by extension). `~` is expanded.
    pub registry: Option<String>,

    /// Directories searched, in order, for zone behavior text
    pub content_dirs: Vec<String>,

    /// Merge user zones over the built-in zones
    pub builtin_defaults: bool,
}

impl Default for ZonesConfig {
    fn default() -> Self {
        Self {
            registry: Some("~/.claude/zones.json".to_string()),
            content_dirs: vec!["~/.claude".to_string()],
            builtin_defaults: true,
        }
    }
}

impl ZonesConfig {
    /// Registry file path with `~` expanded
    pub fn registry_path(&self) -> Option<PathBuf> {
        self.registry.as_deref().map(expand_path)
    }

    /// Content directories with `~` expanded
    pub fn content_paths(&self) -> Vec<PathBuf> {
        self.content_dirs.iter().map(|d| expand_path(d)).collect()
    }
}

/// Override marker settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverridesConfig {
    /// Marker file name
    pub file_name: String,

    /// Ancestor directories to search (0 = resolved directory only)
    pub search_depth: usize,
}

impl Default for OverridesConfig {
    fn default() -> Self {
        Self {
            file_name: OVERRIDE_FILE_NAME.to_string(),
            search_depth: 0,
        }
    }
}

/// Usage history settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Record detections made by the MCP server
    pub enabled: bool,

    /// Append-only usage log. `~` is expanded.
    pub log_path: String,

    /// Number of trailing entries counted per zone
    pub window: usize,

    /// Number of most recent entries reported
    pub recent: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_path: "~/.claude/zone-history.log".to_string(),
            window: 1000,
            recent: 10,
        }
    }
}

impl MetricsConfig {
    /// Usage log path with `~` expanded
    pub fn log_file(&self) -> PathBuf {
        expand_path(&self.log_path)
    }
}

/// MCP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name for MCP
    pub name: String,

    /// Server version for MCP
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "context-zones".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(expand_home(path, dirs::home_dir().as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.overrides.file_name, ".claude-zone");
        assert_eq!(config.overrides.search_depth, 0);
        assert_eq!(config.metrics.window, 1000);
        assert_eq!(config.metrics.recent, 10);
        assert!(config.zones.builtin_defaults);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.server.name, "context-zones");
    }

    #[test]
    fn test_absolute_paths_unchanged() {
        let zones = ZonesConfig {
            registry: Some("/etc/zones.json".to_string()),
            content_dirs: vec!["/srv/zones".to_string()],
            builtin_defaults: true,
        };
        assert_eq!(zones.registry_path(), Some(PathBuf::from("/etc/zones.json")));
        assert_eq!(zones.content_paths(), vec![PathBuf::from("/srv/zones")]);
    }

    #[test]
    fn test_no_registry() {
        let zones = ZonesConfig {
            registry: None,
            ..Default::default()
        };
        assert_eq!(zones.registry_path(), None);
    }

    #[test]
    fn test_deserialize_log_format() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);
    }
}

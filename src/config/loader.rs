//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (CONTEXT_ZONES__*)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "context-zones.toml",
    ".context-zones.toml",
    "~/.config/context-zones/config.toml",
];

/// Environment variable prefix
const ENV_PREFIX: &str = "CONTEXT_ZONES";

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Start with defaults (handled by serde defaults on AppConfig)

    // 2. Add configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        let expanded = shellexpand::tilde(path);
        if !Path::new(expanded.as_ref()).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. Add environment variables with CONTEXT_ZONES_ prefix
    // e.g., CONTEXT_ZONES__ZONES__REGISTRY, CONTEXT_ZONES__METRICS__WINDOW
    // Double underscore (__) maps to nested keys (zones.registry)
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
///
/// Zone definitions are not validated here; the registry is loaded
/// separately and never fails resolution.
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.overrides.file_name.trim().is_empty() {
        return Err(ConfigError::Missing {
            field: "overrides.file_name".to_string(),
        });
    }

    if config.overrides.file_name.contains(['/', '\\']) {
        return Err(ConfigError::Invalid {
            message: format!(
                "overrides.file_name must be a bare file name, got: {}",
                config.overrides.file_name
            ),
        });
    }

    if config.metrics.window == 0 {
        return Err(ConfigError::Invalid {
            message: "metrics.window must be greater than 0".to_string(),
        });
    }

    if config.metrics.log_path.trim().is_empty() {
        return Err(ConfigError::Missing {
            field: "metrics.log_path".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_from_str_basic() {
        let toml = r#"
[zones]
registry = "/etc/context-zones/zones.json"
content_dirs = ["/srv/zones", "~/.claude"]

[overrides]
search_depth = 3
"#;

        let config = load_config_from_str(toml).unwrap();
        assert_eq!(
            config.zones.registry.as_deref(),
            Some("/etc/context-zones/zones.json")
        );
        assert_eq!(config.zones.content_dirs.len(), 2);
        assert_eq!(config.overrides.search_depth, 3);
        // Untouched sections keep their defaults
        assert_eq!(config.overrides.file_name, ".claude-zone");
        assert_eq!(config.metrics.window, 1000);
    }

    #[test]
    fn test_zero_window_rejected() {
        let toml = r#"
[metrics]
window = 0
"#;
        assert!(matches!(
            load_config_from_str(toml).unwrap_err(),
            ConfigError::Invalid { .. }
        ));
    }

    #[test]
    fn test_empty_marker_name_rejected() {
        let toml = r#"
[overrides]
file_name = "  "
"#;
        assert!(matches!(
            load_config_from_str(toml).unwrap_err(),
            ConfigError::Missing { .. }
        ));
    }

    #[test]
    fn test_marker_name_with_separator_rejected() {
        let toml = r#"
[overrides]
file_name = "nested/.claude-zone"
"#;
        assert!(load_config_from_str(toml).is_err());
    }

    #[test]
    fn test_explicit_missing_file() {
        let result = load_config(Some("/definitely/not/here/context-zones.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::Load(_)));
    }
}

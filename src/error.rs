//! Error types for context-zones
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors that are part of the API.
//! Zone resolution itself never fails: registry problems are reported as
//! diagnostics and recovered with the built-in defaults.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Invalid zone pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Zone behavior text could not be read
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Zone config not found: {reference}")]
    NotFound { reference: String },
}

/// Usage history errors
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// MCP tool errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Unknown zone: {zone}")]
    UnknownZone {
        zone: String,
        available: Vec<String>,
    },

    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServerError {
    pub fn unknown_zone(zone: impl Into<String>, available: Vec<String>) -> Self {
        Self::UnknownZone {
            zone: zone.into(),
            available,
        }
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for MCP tool operations
pub type ToolResult<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_zone_message() {
        let err = ServerError::unknown_zone("nope", vec!["career".into(), "finance".into()]);
        assert_eq!(err.to_string(), "Unknown zone: nope");
        assert!(matches!(err, ServerError::UnknownZone { ref available, .. } if available.len() == 2));
    }

    #[test]
    fn test_app_error_from_config() {
        let err: AppError = ConfigError::Missing {
            field: "zones.registry".into(),
        }
        .into();
        assert!(err.to_string().contains("zones.registry"));
    }
}

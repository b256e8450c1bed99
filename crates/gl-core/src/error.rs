//! Error types for gl-core

use thiserror::Error;

/// Core error type for the ladder store
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: A code or identifier failed validation
    #[error("[C003] Invalid {kind} '{value}': {reason}")]
    InvalidValue {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },

    /// C004: IO error with file path context
    #[error("[C004] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C005: YAML parse error
    #[error("[C005] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

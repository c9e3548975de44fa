//! Core error types for goalpulse-core.
//!
//! Every metric either returns a fully valid value or fails with exactly one
//! of these errors. Nothing here is transient, so callers never retry; they
//! decide whether to render a placeholder, hide the widget, or surface the
//! message.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for goalpulse-core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A non-positive target, window, half-life or weight, or any other
    /// malformed input that no date or history could fix.
    #[error("Invalid configuration for '{field}': {message}")]
    InvalidConfiguration { field: String, message: String },

    /// A requested date lies outside an entity's valid history window.
    #[error("Date {date} is out of range for '{entity_id}' (valid: {start} to {end})")]
    OutOfRange {
        entity_id: String,
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// Not enough history points to fit a trend.
    #[error("Insufficient data for '{entity_id}': {points} point(s), need at least {required}")]
    InsufficientData {
        entity_id: String,
        points: usize,
        required: usize,
    },

    /// The metric does not apply to this entity's type or shape.
    #[error("Not applicable to '{entity_id}': {reason}")]
    NotApplicable { entity_id: String, reason: String },

    /// An id did not resolve in the goal store.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Engine configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CoreError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::InvalidConfiguration {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn not_applicable(entity_id: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::NotApplicable {
            entity_id: entity_id.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable name of the error kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::InvalidConfiguration { .. } => "invalid_configuration",
            CoreError::OutOfRange { .. } => "out_of_range",
            CoreError::InsufficientData { .. } => "insufficient_data",
            CoreError::NotApplicable { .. } => "not_applicable",
            CoreError::NotFound { .. } => "not_found",
            CoreError::Config(_) => "config",
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    SerializeFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SerializeFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

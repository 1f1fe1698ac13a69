//! Error types for configuration building
//!
//! Every failure in this crate is an input-validation failure reported at
//! configuration-build time. Animation ticks never fail.

use thiserror::Error;

/// Errors raised while building or parsing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A field violates its declared constraint
    #[error("invalid `{field}`: {constraint}")]
    Validation {
        field: &'static str,
        constraint: String,
    },

    /// Unknown variation type or unit name in a numeric control
    #[error("invalid variation: {0}")]
    InvalidVariation(String),

    /// Malformed JSON options
    #[error("malformed options: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a validation error for `field`
    pub fn validation(field: &'static str, constraint: impl Into<String>) -> Self {
        ConfigError::Validation {
            field,
            constraint: constraint.into(),
        }
    }

    /// Name of the offending field, if this is a validation error
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Type alias for Result using ConfigError
pub type Result<T> = std::result::Result<T, ConfigError>;

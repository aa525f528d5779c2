//! Error types for the hydration core.
//!

use serde_json::Value;
use thiserror::Error;

/// Every failure a hydration call can surface to its caller.
///
/// All variants except [`HydrationError::CastValueError`] are fatal to the
/// current `hydrate` call. A value-level cast failure may be downgraded to a
/// null assignment by the field's nullability or the caller's mismatch policy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HydrationError {
    #[error("Record has no class discriminator '{key}'")]
    MissingClassDiscriminator { key: String },
    #[error("Record class discriminator '{key}' is empty")]
    EmptyClassDiscriminator { key: String },
    #[error("No registered type matches store class '{0}'")]
    ClassNotFound(String),
    #[error("Unsupported cast type '{0}'")]
    UnsupportedCastType(String),
    #[error("Cannot cast {value} to '{tag}'")]
    CastValueError { tag: String, value: Value },
    #[error("No accessible setter or public field for {type_name}::{field}")]
    NoAccessibleSetter { type_name: String, field: String },
    #[error("Failed to assign {type_name}::{field}: {reason}")]
    AssignmentFailed {
        type_name: String,
        field: String,
        reason: String,
    },
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Expected a {expected} document, hydrated a {actual}")]
    UnexpectedDocumentType { expected: String, actual: String },
    #[error("Invalid record id: {0}")]
    InvalidRid(String),
    #[error("Link {0} has no loader installed")]
    UnboundLink(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("JSON error: {0}")]
    Json(String),
}

impl HydrationError {
    /// Whether a nullable field may absorb this error as a null assignment.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HydrationError::CastValueError { .. })
    }
}

impl From<serde_json::Error> for HydrationError {
    fn from(error: serde_json::Error) -> Self {
        HydrationError::Json(error.to_string())
    }
}

impl From<::config::ConfigError> for HydrationError {
    fn from(error: ::config::ConfigError) -> Self {
        HydrationError::ConfigurationError(error.to_string())
    }
}

/// Caster level failure, kept separate so the engine can tell a broken mapping
/// apart from a bad value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CastError {
    #[error("Unsupported cast type '{0}'")]
    Unsupported(String),
    #[error("Cannot cast {value} to '{tag}'")]
    Value { tag: String, value: Value },
}

impl CastError {
    pub fn value(tag: &str, value: &Value) -> Self {
        CastError::Value {
            tag: tag.to_string(),
            value: value.clone(),
        }
    }
}

impl From<CastError> for HydrationError {
    fn from(error: CastError) -> Self {
        match error {
            CastError::Unsupported(tag) => HydrationError::UnsupportedCastType(tag),
            CastError::Value { tag, value } => HydrationError::CastValueError { tag, value },
        }
    }
}

pub type HydrationResult<T> = std::result::Result<T, HydrationError>;
pub type Result<T> = HydrationResult<T>;

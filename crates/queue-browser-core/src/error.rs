//! Error types for browse operations.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned directly by the browser, before any retrieval outcome exists
#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Failures reported by a message source
///
/// "No message available" is not an error: sources report
/// it as [`GetOutcome::Exhausted`](crate::source::GetOutcome::Exhausted).
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Queue not found: {queue_name}")]
    QueueNotFound { queue_name: String },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Permission denied for operation: {operation}")]
    PermissionDenied { operation: String },

    #[error("Malformed message descriptor: {message}")]
    MalformedDescriptor { message: String },

    #[error("Provider error ({provider}): {code} - {message}")]
    ProviderError {
        provider: String,
        code: String,
        message: String,
    },
}

impl SourceError {
    /// Check if the failure is likely to clear on a later attempt
    ///
    /// The browser never retries; this is a hint for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::QueueNotFound { .. } => false,
            Self::Timeout { .. } => true,
            Self::ConnectionFailed { .. } => true,
            Self::AuthenticationFailed { .. } => false,
            Self::PermissionDenied { .. } => false,
            Self::MalformedDescriptor { .. } => false,
            Self::ProviderError { .. } => true,
        }
    }

    /// Short machine-readable name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::QueueNotFound { .. } => "queue_not_found",
            Self::Timeout { .. } => "timeout",
            Self::ConnectionFailed { .. } => "connection_failed",
            Self::AuthenticationFailed { .. } => "authentication_failed",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::MalformedDescriptor { .. } => "malformed_descriptor",
            Self::ProviderError { .. } => "provider_error",
        }
    }
}

/// Serialisable description of a failed retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub kind: String,
    pub message: String,
    pub transient: bool,
}

impl From<&SourceError> for ErrorDescriptor {
    fn from(error: &SourceError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
            transient: error.is_transient(),
        }
    }
}

impl std::fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    Required { field: String },

    #[error("Invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },

    #[error("Value out of range for {field}: {message}")]
    OutOfRange { field: String, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

//! Error types for the geoscope library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all geoscope operations.
#[derive(Error, Debug)]
pub enum GeoscopeError {
    /// The request never left the client (DNS, connect, TLS, body decode)
    #[error("Request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    /// The service answered with a non-success status
    #[error("Service returned {status}: {detail}")]
    Remote { status: u16, detail: String },
    /// No reachable service is configured (demo mode)
    #[error("Backend unavailable: {reason}")]
    BackendUnavailable { reason: String },
    /// Local archive errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Analysis not found in the local archive
    #[error("Analysis with ID {id} not found")]
    AnalysisNotFound { id: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> GeoscopeError {
        GeoscopeError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> GeoscopeError {
        GeoscopeError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl GeoscopeError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a backend-unavailable error with a reason.
    pub fn backend_unavailable(reason: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            reason: reason.into(),
        }
    }

    /// Human-readable message for the error panel.
    ///
    /// Remote failures surface the structured `detail` from the response body;
    /// transport failures surface the client's own message.
    pub fn user_message(&self) -> String {
        match self {
            GeoscopeError::Remote { detail, .. } if !detail.trim().is_empty() => detail.clone(),
            GeoscopeError::Remote { status, .. } => format!("Request failed with status {status}"),
            GeoscopeError::Transport { source } => source.to_string(),
            GeoscopeError::BackendUnavailable { reason } => reason.clone(),
            other => other.to_string(),
        }
    }

    /// Short title for the error panel.
    pub fn title(&self) -> &'static str {
        match self {
            GeoscopeError::Transport { .. } | GeoscopeError::Remote { .. } => "Analysis Failed",
            GeoscopeError::BackendUnavailable { .. } => "Backend Unavailable",
            GeoscopeError::InvalidInput { .. } => "Invalid Input",
            _ => "Error",
        }
    }
}

impl From<reqwest::Error> for GeoscopeError {
    fn from(source: reqwest::Error) -> Self {
        GeoscopeError::Transport { source }
    }
}

/// Extension trait for Result to provide concise error mapping with
/// anyhow-style context.
pub trait ResultExt<T, E> {
    /// Add context to any error type, converting to GeoscopeError.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GeoscopeError::Configuration {
            message: format!("{}: {}", context, e),
        })
    }
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| GeoscopeError::database(message).with_source(e))
    }
}

/// Result type alias for geoscope operations
pub type Result<T> = std::result::Result<T, GeoscopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_detail_is_preferred() {
        let err = GeoscopeError::Remote {
            status: 500,
            detail: "Analysis failed: upstream timeout".to_string(),
        };
        assert_eq!(err.user_message(), "Analysis failed: upstream timeout");
        assert_eq!(err.title(), "Analysis Failed");
    }

    #[test]
    fn remote_without_detail_falls_back_to_status() {
        let err = GeoscopeError::Remote {
            status: 502,
            detail: String::new(),
        };
        assert_eq!(err.user_message(), "Request failed with status 502");
    }

    #[test]
    fn invalid_input_builder() {
        let err = GeoscopeError::invalid_input("platforms").with_reason("select at least one");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'platforms': select at least one"
        );
        assert_eq!(err.title(), "Invalid Input");
    }

    #[test]
    fn backend_unavailable_message() {
        let err = GeoscopeError::backend_unavailable("Demo mode - backend not available");
        assert_eq!(err.user_message(), "Demo mode - backend not available");
        assert_eq!(err.title(), "Backend Unavailable");
    }
}

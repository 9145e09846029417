//! Status and confirmation message types for operation feedback.

use std::fmt;

use crate::{config::ApiConfig, error::GeoscopeError};

/// Wrapper type for displaying operation confirmation messages.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: String) -> Self {
        Self {
            message,
            success: true,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            message,
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {}",
            if self.success { "Success:" } else { "Error:" },
            self.message
        )
    }
}

/// Error panel shown in place of a report when an operation fails.
pub struct ErrorPanel<'a>(pub &'a GeoscopeError);

impl fmt::Display for ErrorPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.0.title())?;
        writeln!(f)?;
        writeln!(f, "{}", self.0.user_message())
    }
}

/// Where the analysis service is expected to be.
pub struct ConnectionStatus<'a>(pub &'a ApiConfig);

impl fmt::Display for ConnectionStatus<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.0;
        writeln!(f, "- Mode: {} ({})", config.mode, config.mode.message())?;
        match &config.base_url {
            Some(url) => writeln!(f, "- API: {url}"),
            None => writeln!(f, "- API: none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_status_display() {
        let success = OperationStatus::success("Cleared 3 analyses".to_string());
        assert_eq!(success.to_string(), "Success: Cleared 3 analyses\n");

        let failure = OperationStatus::failure("Nothing to clear".to_string());
        assert!(failure.to_string().starts_with("Error:"));
    }

    #[test]
    fn test_error_panel_prefers_remote_detail() {
        let err = GeoscopeError::Remote {
            status: 500,
            detail: "Analysis failed: OpenAI quota exceeded".to_string(),
        };
        assert_eq!(
            ErrorPanel(&err).to_string(),
            "## Analysis Failed\n\nAnalysis failed: OpenAI quota exceeded\n"
        );
    }

    #[test]
    fn test_connection_status() {
        let output = ConnectionStatus(&ApiConfig::demo()).to_string();
        assert!(output.contains("- Mode: demo (Demo mode - backend not available)"));
        assert!(output.contains("- API: none"));

        let local = ApiConfig::resolve(None, "http://127.0.0.1:5173").unwrap();
        assert!(ConnectionStatus(&local)
            .to_string()
            .contains("- API: http://127.0.0.1:5173/api"));
    }
}

use std::fmt;

use thiserror::Error;

use crate::export::ExportError;
use crate::extract::ParseFailure;

/// Main error type for the trip planner
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid trip preferences: {0}")]
    Validation(ValidationErrors),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed. Please check your API key.")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("API endpoint not found. Verify the base URL.")]
    EndpointNotFound,

    #[error("Failed to generate itinerary. HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Completion response did not contain any message content")]
    EmptyResponse,

    #[error("Cost estimate unavailable: {0}")]
    CostEstimate(#[from] ParseFailure),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Whether the failure happened before any request was sent.
    pub fn is_input_error(&self) -> bool {
        matches!(self, PlannerError::Validation(_))
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::Validation(_) => "VALIDATION_ERROR",
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::Unauthorized => "UNAUTHORIZED",
            PlannerError::BadRequest(_) => "BAD_REQUEST",
            PlannerError::EndpointNotFound => "ENDPOINT_NOT_FOUND",
            PlannerError::Http { .. } => "HTTP_ERROR",
            PlannerError::Transport(_) => "TRANSPORT_ERROR",
            PlannerError::EmptyResponse => "EMPTY_RESPONSE",
            PlannerError::CostEstimate(_) => "COST_ESTIMATE_ERROR",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
            PlannerError::Export(_) => "EXPORT_ERROR",
            PlannerError::Io(_) => "IO_ERROR",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        });

        if let PlannerError::Validation(errors) = self {
            payload["error"]["fields"] = serde_json::json!(errors
                .iter()
                .map(|problem| problem.field)
                .collect::<Vec<_>>());
        }

        payload
    }
}

/// One rejected field of a preference record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProblem {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found while validating a preference record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    problems: Vec<FieldProblem>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.problems.push(FieldProblem {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldProblem> {
        self.problems.iter()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.problems.iter().any(|problem| problem.field == field)
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected problems.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(PlannerError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self
            .problems
            .iter()
            .map(|problem| problem.message.as_str())
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_joined() {
        let mut errors = ValidationErrors::new();
        errors.push("destination", "Please enter a destination.");
        errors.push("num_days", "Number of days must be at least 1.");

        let err = errors.into_result().unwrap_err();
        assert!(err.is_input_error());
        assert_eq!(
            err.to_string(),
            "Invalid trip preferences: Please enter a destination.; Number of days must be at least 1."
        );

        let payload = err.to_error_payload();
        assert_eq!(payload["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(payload["error"]["fields"][1], "num_days");
    }

    #[test]
    fn http_errors_carry_status() {
        let err = PlannerError::Http {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.error_code(), "HTTP_ERROR");
        assert!(err.to_string().contains("503"));
        assert!(!err.is_input_error());
    }
}

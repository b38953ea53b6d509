//! Error types for the REST API client

use std::fmt;

use awx_rest_api_contract::ApiContractError;
use reqwest::StatusCode;
use thiserror::Error;

/// The kind of call that failed, used to phrase status errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Retrieve => "retrieve",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur when using the REST API client
#[derive(Debug, Error)]
pub enum RestClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("API contract error: {0}")]
    Contract(#[from] ApiContractError),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(
        "Failed to {operation} resource: server returned {status}{}",
        detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
    )]
    Status {
        operation: Operation,
        status: StatusCode,
        body: String,
        detail: Option<String>,
    },

    #[error("Resource with name '{name}' not found in {resource}")]
    NotFound { resource: String, name: String },

    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),
}

impl RestClientError {
    /// HTTP status of a server-side failure
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// True when the error was raised by model validation, before any request
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Contract(ApiContractError::Validation(_)))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for REST client operations
pub type RestClientResult<T> = Result<T, RestClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = RestClientError::Status {
            operation: Operation::Retrieve,
            status: StatusCode::NOT_FOUND,
            body: "{\"detail\":\"Not found.\"}".into(),
            detail: Some("Not found.".into()),
        };

        assert_eq!(
            err.to_string(),
            "Failed to retrieve resource: server returned 404 Not Found: Not found."
        );
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_status_error_without_detail() {
        let err = RestClientError::Status {
            operation: Operation::Delete,
            status: StatusCode::BAD_REQUEST,
            body: String::new(),
            detail: None,
        };

        assert_eq!(
            err.to_string(),
            "Failed to delete resource: server returned 400 Bad Request"
        );
    }
}

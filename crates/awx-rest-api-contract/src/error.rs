//! Error types for API contract validation and parsing

use thiserror::Error;

/// Errors that can occur during API contract validation and parsing
#[derive(Debug, Error)]
pub enum ApiContractError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid job type: {0}")]
    InvalidJobType(String),

    #[error("Invalid webhook service: {0}")]
    InvalidWebhookService(String),
}

impl ApiContractError {
    /// Returns the validation errors if this is a validation failure
    pub fn validation_errors(&self) -> Option<&validator::ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

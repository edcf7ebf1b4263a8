use thiserror::Error;

use crate::domain::error::DomainError;

/// Errors that are safe to expose outside the module
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlickboxError {
    /// The gateway or metadata API could not be reached or answered badly.
    #[error("Service unavailable: {message}")]
    Unavailable { message: String },

    /// The gateway processed the request and refused it.
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl FlickboxError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl From<DomainError> for FlickboxError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Transport { .. }
            | DomainError::HttpStatus { .. }
            | DomainError::Decode { .. } => Self::unavailable(e.to_string()),
            DomainError::Rejected { ref message, .. } => {
                Self::rejected(message.clone().unwrap_or_else(|| e.to_string()))
            }
            DomainError::InvalidForm(errors) => Self::validation(errors.to_string()),
            DomainError::NoActiveUser => Self::validation(e.to_string()),
            DomainError::NotConfigured { .. } | DomainError::InvalidBaseUrl { .. } => {
                Self::configuration(e.to_string())
            }
        }
    }
}

use thiserror::Error;

use crate::domain::user_admin::FormErrors;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// The request never produced a response (DNS, connect, TLS, reset...).
    #[error("Network error calling {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// The gateway answered with a non-success HTTP status.
    #[error("{endpoint} answered HTTP {status}")]
    HttpStatus { endpoint: String, status: u16 },

    /// A successful response carrying an application-level failure flag.
    #[error("{endpoint} rejected the request: {}", message.as_deref().unwrap_or("no reason given"))]
    Rejected {
        endpoint: String,
        message: Option<String>,
    },

    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Invalid form: {0}")]
    InvalidForm(FormErrors),

    #[error("No user is identified")]
    NoActiveUser,

    #[error("{what} is not configured")]
    NotConfigured { what: &'static str },

    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },
}

impl DomainError {
    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn http_status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            endpoint: endpoint.into(),
            status,
        }
    }

    pub fn rejected(endpoint: impl Into<String>, message: Option<String>) -> Self {
        Self::Rejected {
            endpoint: endpoint.into(),
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    pub fn decode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn invalid_base_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Text for the blocking alert raised when a user-initiated `action` fails.
    /// A gateway-supplied reason wins; transport failures say so.
    pub fn alert_message(&self, action: &str) -> String {
        match self {
            Self::Rejected {
                message: Some(m), ..
            } => m.clone(),
            Self::Transport { .. } => format!("Failed to {action} due to network error."),
            Self::InvalidForm(errors) => errors.to_string(),
            _ => format!("Failed to {action}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_prefers_gateway_reason() {
        let e = DomainError::rejected("add_movie_list_item.php", Some("List is full".into()));
        assert_eq!(e.alert_message("add film"), "List is full");

        let e = DomainError::rejected("add_movie_list_item.php", Some("  ".into()));
        assert_eq!(e.alert_message("add film"), "Failed to add film");
    }

    #[test]
    fn alert_names_network_errors() {
        let e = DomainError::transport("delete_movie_list_item.php", "connection refused");
        assert!(e.is_transport());
        assert_eq!(
            e.alert_message("remove film"),
            "Failed to remove film due to network error."
        );
        assert_eq!(
            DomainError::http_status("x", 500).alert_message("remove film"),
            "Failed to remove film"
        );
    }
}

//! Client error types

use shared::ErrorCategory;
use thiserror::Error;

/// Client error type
///
/// Server-side variants carry the message the backend put in its error
/// body, or an empty string when it sent none.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (transport)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 401: the login redirect has already been issued
    #[error("Authentication required")]
    Unauthorized,

    /// 403
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// 400 / 422
    #[error("Validation error: {0}")]
    Validation(String),

    /// 409
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other non-2xx status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Operation requires a logged-in user; no request was sent
    #[error("Please log in to continue")]
    NotLoggedIn,

    /// Client-side validation failed; no request was sent
    #[error("{0}")]
    InvalidInput(String),

    /// Another submission from the same screen is still in flight
    #[error("A submission is already in progress")]
    SubmitInProgress,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Classify for display
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(_) => ErrorCategory::Network,
            Self::Unauthorized | Self::NotLoggedIn => ErrorCategory::Unauthorized,
            Self::Forbidden(_) => ErrorCategory::Forbidden,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Validation(_) | Self::InvalidInput(_) | Self::SubmitInProgress => {
                ErrorCategory::Validation
            }
            Self::Conflict(_) => ErrorCategory::Conflict,
            Self::Api { .. } | Self::InvalidResponse(_) | Self::Serialization(_) => {
                ErrorCategory::Server
            }
        }
    }

    /// Error for a non-2xx response other than 401
    pub fn from_status(category: ErrorCategory, status: u16, message: String) -> Self {
        match category {
            ErrorCategory::Forbidden => Self::Forbidden(message),
            ErrorCategory::NotFound => Self::NotFound(message),
            ErrorCategory::Validation => Self::Validation(message),
            ErrorCategory::Conflict => Self::Conflict(message),
            _ => Self::Api { status, message },
        }
    }

    /// The backend's own message, when it sent a non-empty one
    pub fn server_message(&self) -> Option<&str> {
        let message = match self {
            Self::Forbidden(m) | Self::NotFound(m) | Self::Validation(m) | Self::Conflict(m) => m,
            Self::Api { message, .. } => message,
            _ => return None,
        };
        (!message.trim().is_empty()).then_some(message.as_str())
    }

    /// Message a screen shows: the server's message verbatim when present
    /// and the category shows it, client-side validation text as is,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::InvalidInput(m) => m.clone(),
            Self::SubmitInProgress => self.to_string(),
            _ if !self.category().shows_server_message() => fallback.to_string(),
            _ => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    /// Whether the login redirect already handled this failure
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ClientError::Conflict(
            "Session type is used by 3 sessions. Mark it inactive instead.".into(),
        );
        assert_eq!(
            err.user_message("Failed to delete session type"),
            "Session type is used by 3 sessions. Mark it inactive instead."
        );
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ClientError::Api {
            status: 502,
            message: String::new(),
        };
        assert_eq!(err.user_message("Something went wrong"), "Something went wrong");
        assert_eq!(
            ClientError::Unauthorized.user_message("Something went wrong"),
            "Something went wrong"
        );
    }

    #[test]
    fn test_from_status_follows_category() {
        let err = ClientError::from_status(ErrorCategory::Conflict, 409, "In use".into());
        assert!(matches!(err, ClientError::Conflict(ref m) if m == "In use"));
        assert_eq!(err.category(), ErrorCategory::Conflict);

        let err = ClientError::from_status(ErrorCategory::Server, 503, String::new());
        assert!(matches!(err, ClientError::Api { status: 503, .. }));
        assert_eq!(err.user_message("Try again later"), "Try again later");
    }

    #[test]
    fn test_invalid_input_is_shown_as_is() {
        let err = ClientError::InvalidInput("Name is required".into());
        assert_eq!(err.user_message("ignored"), "Name is required");
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
}

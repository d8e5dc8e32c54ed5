//! Error classification shared by every client surface
//!
//! The backend reports failures as a JSON body carrying a human readable
//! `message` (or `error`) field next to an HTTP status. Screens never show a
//! status code; they show either that message or a fallback, depending on
//! the [`ErrorCategory`].

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Error categories as seen by a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Transport failure, no response
    Network,
    /// 401, session missing or expired
    Unauthorized,
    /// 403
    Forbidden,
    /// 400 / 422, input rejected by the server
    Validation,
    /// 404
    NotFound,
    /// 409, e.g. entity still referenced elsewhere
    Conflict,
    /// Everything else
    Server,
}

impl ErrorCategory {
    /// Classify an HTTP status
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::Validation,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::Conflict,
            _ => Self::Server,
        }
    }

    /// Whether the server's own message should be shown verbatim
    pub fn shows_server_message(&self) -> bool {
        !matches!(self, Self::Network | Self::Unauthorized)
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Server => "server",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error body returned by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// Extract the server-provided message from a raw response body.
    ///
    /// Returns `None` when the body is not JSON or carries no non-empty
    /// `message`/`error` field.
    pub fn message_from(body: &str) -> Option<String> {
        let parsed: ApiErrorBody = serde_json::from_str(body).ok()?;
        parsed
            .message
            .filter(|m| !m.trim().is_empty())
            .or_else(|| parsed.error.filter(|m| !m.trim().is_empty()))
    }
}

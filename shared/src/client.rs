//! Auth DTOs shared by every client surface
//!
//! The backend issues the session as an HTTP-only `token` cookie, so none of
//! these types carry a token.

use serde::{Deserialize, Serialize};

use crate::models::User;

/// Name of the session cookie set by the backend
pub const SESSION_COOKIE: &str = "token";

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Register request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Login / register response body
///
/// The session itself arrives as a cookie; the body only carries an
/// informational message and, on some backends, the user record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

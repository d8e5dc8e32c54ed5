//! Auth endpoints
//!
//! The session is the HttpOnly `token` cookie; these calls never see it.

use shared::Empty;
use shared::client::{AuthResponse, LoginRequest, RegisterRequest};
use shared::models::User;

use crate::error::ClientResult;
use crate::http::HttpClient;

pub async fn login<C: HttpClient>(client: &C, request: &LoginRequest) -> ClientResult<AuthResponse> {
    client.post("/auth/login", request).await
}

pub async fn register<C: HttpClient>(
    client: &C,
    request: &RegisterRequest,
) -> ClientResult<AuthResponse> {
    client.post("/auth/register", request).await
}

pub async fn logout<C: HttpClient>(client: &C) -> ClientResult<()> {
    let _: Empty = client.post_empty("/auth/logout").await?;
    Ok(())
}

/// `GET /users/me`
pub async fn me<C: HttpClient>(client: &C) -> ClientResult<User> {
    client.get("/users/me").await
}

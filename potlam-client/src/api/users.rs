//! User administration

use shared::models::{Role, RoleUpdate, User};

use crate::error::ClientResult;
use crate::http::HttpClient;

pub async fn list<C: HttpClient>(client: &C) -> ClientResult<Vec<User>> {
    client.get("/users").await
}

pub async fn set_role<C: HttpClient>(client: &C, id: &str, role: Role) -> ClientResult<User> {
    client
        .put(&format!("/users/{id}/role"), &RoleUpdate { role })
        .await
}

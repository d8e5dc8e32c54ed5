//! REST endpoints
//!
//! Thin typed wrappers over [`HttpClient`]: one function per backend call,
//! request and response types fixed at the boundary.

pub mod auth;
pub mod cart;
pub mod cashbox;
pub mod catalog;
pub mod day_plans;
pub mod orders;
pub mod settings;
pub mod users;

use shared::Empty;

use crate::error::ClientResult;
use crate::http::HttpClient;
use crate::resource::Resource;

// ============================================================================
// Generic resource calls
// ============================================================================

/// `GET {PATH}`
pub async fn list<R: Resource, C: HttpClient>(client: &C) -> ClientResult<Vec<R>> {
    client.get(R::PATH).await
}

/// `GET {PATH}/{id}`
pub async fn fetch<R: Resource, C: HttpClient>(client: &C, id: &str) -> ClientResult<R> {
    client.get(&R::item_path(id)).await
}

/// `POST {PATH}`
pub async fn create<R: Resource, C: HttpClient>(client: &C, body: &R::Create) -> ClientResult<R> {
    client.post(R::PATH, body).await
}

/// `PUT {PATH}/{id}`
pub async fn update<R: Resource, C: HttpClient>(
    client: &C,
    id: &str,
    body: &R::Update,
) -> ClientResult<R> {
    client.put(&R::item_path(id), body).await
}

/// `DELETE {PATH}/{id}`
pub async fn delete<R: Resource, C: HttpClient>(client: &C, id: &str) -> ClientResult<()> {
    let _: Empty = client.delete(&R::item_path(id)).await?;
    Ok(())
}

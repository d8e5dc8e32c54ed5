//! Store settings (admin)

use shared::models::Settings;

use crate::error::ClientResult;
use crate::http::HttpClient;

pub async fn get<C: HttpClient>(client: &C) -> ClientResult<Settings> {
    client.get("/settings").await
}

/// Unknown keys fetched earlier are sent back untouched.
pub async fn save<C: HttpClient>(client: &C, settings: &Settings) -> ClientResult<Settings> {
    client.put("/settings", settings).await
}

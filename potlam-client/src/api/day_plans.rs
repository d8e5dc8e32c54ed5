//! Day plan endpoints

use shared::models::{DayPlan, DayPlanSave, GeneratedTasks};

use crate::error::ClientResult;
use crate::http::HttpClient;

pub async fn list<C: HttpClient>(client: &C) -> ClientResult<Vec<DayPlan>> {
    client.get("/day-plans").await
}

pub async fn fetch<C: HttpClient>(client: &C, id: &str) -> ClientResult<DayPlan> {
    client.get(&format!("/day-plans/{id}")).await
}

pub async fn create<C: HttpClient>(client: &C, body: &DayPlanSave) -> ClientResult<DayPlan> {
    client.post("/day-plans", body).await
}

pub async fn update<C: HttpClient>(client: &C, id: &str, body: &DayPlanSave) -> ClientResult<DayPlan> {
    client.put(&format!("/day-plans/{id}"), body).await
}

/// `POST /day-plans/{id}/generate-tasks`
pub async fn generate_tasks<C: HttpClient>(client: &C, id: &str) -> ClientResult<GeneratedTasks> {
    client
        .post_empty(&format!("/day-plans/{id}/generate-tasks"))
        .await
}

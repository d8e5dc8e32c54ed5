//! Cash-box session endpoints
//!
//! Session types are a plain resource and go through [`super::list`] and
//! friends.

use shared::models::{CashSession, CashSessionClose, CashSessionOpen, CashSessionQuery};

use crate::error::ClientResult;
use crate::http::HttpClient;

const SESSIONS: &str = "/cashbox/sessions";

pub async fn list_sessions<C: HttpClient>(
    client: &C,
    query: &CashSessionQuery,
) -> ClientResult<Vec<CashSession>> {
    client.get_query(SESSIONS, query).await
}

pub async fn open_session<C: HttpClient>(
    client: &C,
    body: &CashSessionOpen,
) -> ClientResult<CashSession> {
    client.post(SESSIONS, body).await
}

pub async fn close_session<C: HttpClient>(
    client: &C,
    id: &str,
    body: &CashSessionClose,
) -> ClientResult<CashSession> {
    client.post(&format!("{SESSIONS}/{id}/close"), body).await
}

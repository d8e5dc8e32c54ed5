//! Cash-box sessions
//!
//! Open a drawer session with its opening float, close it with the counted
//! amount. The backend does the accounting; `net` is shown for display only.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use chrono::NaiveDate;
use shared::models::{
    CashSession, CashSessionClose, CashSessionOpen, CashSessionQuery, CashSessionStatus,
    CashSessionType,
};
use tokio::sync::RwLock;

use crate::api;
use crate::crud::SubmitGuard;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpClient, NetworkHttpClient};
use crate::notify::Notifier;
use crate::validation::{MAX_NOTE_LEN, parse_amount, parse_date, validate_optional_text};

pub struct CashBox<C: HttpClient = NetworkHttpClient> {
    client: Arc<C>,
    notifier: Arc<dyn Notifier>,
    filter: RwLock<CashSessionQuery>,
    sessions: RwLock<Vec<CashSession>>,
    submitting: AtomicBool,
}

impl<C: HttpClient> CashBox<C> {
    pub fn new(client: Arc<C>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            filter: RwLock::new(CashSessionQuery::default()),
            sessions: RwLock::new(Vec::new()),
            submitting: AtomicBool::new(false),
        }
    }

    /// Session types offered when opening a session
    pub async fn session_types(&self) -> ClientResult<Vec<CashSessionType>> {
        let types: Vec<CashSessionType> = api::list::<CashSessionType, C>(&self.client).await?;
        Ok(types.into_iter().filter(|t| t.is_active).collect())
    }

    /// `GET /cashbox/sessions?date=&status=`
    pub async fn list_sessions(
        &self,
        date: Option<NaiveDate>,
        status: Option<CashSessionStatus>,
    ) -> ClientResult<Vec<CashSession>> {
        *self.filter.write().await = CashSessionQuery { date, status };
        self.refresh().await
    }

    /// Re-run the last query
    pub async fn refresh(&self) -> ClientResult<Vec<CashSession>> {
        let query = self.filter.read().await.clone();
        match api::cashbox::list_sessions(&*self.client, &query).await {
            Ok(sessions) => {
                *self.sessions.write().await = sessions.clone();
                Ok(sessions)
            }
            Err(e) => {
                if !e.is_unauthorized() {
                    self.notifier.error(&e.user_message("Failed to load sessions"));
                }
                Err(e)
            }
        }
    }

    /// Last fetched sessions
    pub async fn sessions(&self) -> Vec<CashSession> {
        self.sessions.read().await.clone()
    }

    /// `POST /cashbox/sessions`
    pub async fn open_session(
        &self,
        session_type: &str,
        date: &str,
        opening_amount: &str,
        notes: &str,
    ) -> ClientResult<CashSession> {
        let _guard = SubmitGuard::acquire(&self.submitting)?;
        let session_type = session_type.trim();
        if session_type.is_empty() {
            return Err(ClientError::InvalidInput(
                "Please select a session type".into(),
            ));
        }
        let body = CashSessionOpen {
            session_type: session_type.to_string(),
            date: parse_date(date, "Date")?,
            opening_amount: parse_amount(opening_amount, "Opening amount")?,
            notes: validate_optional_text(notes, "Notes", MAX_NOTE_LEN)?,
        };

        let result = api::cashbox::open_session(&*self.client, &body).await;
        self.finish(result, "Session opened", "Failed to open session")
            .await
    }

    /// `POST /cashbox/sessions/{id}/close`
    pub async fn close_session(
        &self,
        id: &str,
        closing_amount: &str,
        notes: &str,
    ) -> ClientResult<CashSession> {
        let _guard = SubmitGuard::acquire(&self.submitting)?;
        let body = CashSessionClose {
            closing_amount: parse_amount(closing_amount, "Closing amount")?,
            notes: validate_optional_text(notes, "Notes", MAX_NOTE_LEN)?,
        };

        let result = api::cashbox::close_session(&*self.client, id, &body).await;
        self.finish(result, "Session closed", "Failed to close session")
            .await
    }

    async fn finish(
        &self,
        result: ClientResult<CashSession>,
        success: &str,
        fallback: &str,
    ) -> ClientResult<CashSession> {
        match result {
            Ok(session) => {
                tracing::info!(
                    session_id = %session.id,
                    status = ?session.status,
                    opening = session.opening_amount,
                    closing = ?session.closing_amount,
                    "Cash session saved"
                );
                self.notifier.success(success);
                let _ = self.refresh().await;
                Ok(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cash session update failed");
                if !e.is_unauthorized() {
                    self.notifier.error(&e.user_message(fallback));
                }
                Err(e)
            }
        }
    }
}

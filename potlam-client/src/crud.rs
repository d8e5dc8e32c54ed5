//! Generic admin list/detail screen
//!
//! One controller per [`Resource`]: a list with a local text filter, a form
//! used for both create and edit, delete behind a confirmation, and the
//! admin gate in front of everything. Every successful mutation is followed
//! by a fresh list fetch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use crate::api;
use crate::auth::AuthSession;
use crate::error::{ClientError, ClientResult};
use crate::forms::ResourceForm;
use crate::gate::{Gate, GateDecision};
use crate::http::{HttpClient, NetworkHttpClient};
use crate::notify::{Confirm, Notifier};
use crate::resource::Resource;

/// List area state; exactly one applies at a time
#[derive(Debug, Clone, PartialEq)]
pub enum ListState<R> {
    Loading,
    Empty,
    Error(String),
    Loaded(Vec<R>),
}

impl<R> ListState<R> {
    pub fn items(&self) -> &[R] {
        match self {
            Self::Loaded(items) => items,
            _ => &[],
        }
    }
}

/// Case-insensitive substring match over any of `fields`; a blank query
/// matches everything.
pub fn matches_filter(fields: &[&str], query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(&query))
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Clears the submitting flag when the submission ends, however it ends.
pub(crate) struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool) -> ClientResult<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            return Err(ClientError::SubmitInProgress);
        }
        Ok(Self(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

struct ScreenState<R: Resource> {
    list: ListState<R>,
    filter: String,
    form: R::Form,
    /// Id of the entity being edited; `None` means the form creates
    editing: Option<String>,
    form_error: Option<String>,
}

pub struct CrudScreen<R: Resource, C: HttpClient = NetworkHttpClient> {
    client: Arc<C>,
    auth: Arc<AuthSession<C>>,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn Confirm>,
    gate: Gate,
    state: RwLock<ScreenState<R>>,
    submitting: AtomicBool,
}

impl<R: Resource, C: HttpClient> CrudScreen<R, C> {
    pub fn new(
        client: Arc<C>,
        auth: Arc<AuthSession<C>>,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        Self {
            client,
            auth,
            notifier,
            confirm,
            gate: Gate::admin(),
            state: RwLock::new(ScreenState {
                list: ListState::Loading,
                filter: String::new(),
                form: R::Form::default(),
                editing: None,
                form_error: None,
            }),
            submitting: AtomicBool::new(false),
        }
    }

    /// Wait for the gate, then fetch the list if the screen may render.
    pub async fn mount(&self) -> GateDecision {
        let decision = self.gate.resolve(&self.auth).await;
        if decision.allows_render() {
            // Failures are reflected in the list state
            let _ = self.load().await;
        }
        decision
    }

    /// `GET {PATH}`
    pub async fn load(&self) -> ClientResult<()> {
        self.state.write().await.list = ListState::Loading;
        let result = api::list::<R, C>(&self.client).await;
        let mut state = self.state.write().await;
        match result {
            Ok(items) => {
                tracing::debug!(resource = R::LABEL, count = items.len(), "List loaded");
                state.list = if items.is_empty() {
                    ListState::Empty
                } else {
                    ListState::Loaded(items)
                };
                Ok(())
            }
            Err(e) => {
                tracing::warn!(resource = R::LABEL, error = %e, "List fetch failed");
                state.list =
                    ListState::Error(e.user_message(&format!("Failed to load {}s", R::LABEL)));
                Err(e)
            }
        }
    }

    pub async fn list_state(&self) -> ListState<R> {
        self.state.read().await.list.clone()
    }

    pub async fn set_filter(&self, query: &str) {
        self.state.write().await.filter = query.to_string();
    }

    /// Loaded items that pass the filter
    pub async fn visible(&self) -> Vec<R> {
        let state = self.state.read().await;
        state
            .list
            .items()
            .iter()
            .filter(|item| matches_filter(&item.search_fields(), &state.filter))
            .cloned()
            .collect()
    }

    pub async fn form(&self) -> R::Form {
        self.state.read().await.form.clone()
    }

    pub async fn set_form(&self, form: R::Form) {
        let mut state = self.state.write().await;
        state.form = form;
        state.form_error = None;
    }

    /// Last error shown next to the form
    pub async fn form_error(&self) -> Option<String> {
        self.state.read().await.form_error.clone()
    }

    pub async fn editing(&self) -> Option<String> {
        self.state.read().await.editing.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Fetch one entity and load it into the form
    pub async fn begin_edit(&self, id: &str) -> ClientResult<()> {
        match api::fetch::<R, C>(&self.client, id).await {
            Ok(entity) => {
                let mut state = self.state.write().await;
                state.form = R::Form::from_entity(&entity);
                state.editing = Some(id.to_string());
                state.form_error = None;
                Ok(())
            }
            Err(e) => {
                if !e.is_unauthorized() {
                    self.notifier
                        .error(&e.user_message(&format!("Failed to load {}", R::LABEL)));
                }
                Err(e)
            }
        }
    }

    pub async fn cancel_edit(&self) {
        let mut state = self.state.write().await;
        state.form = R::Form::default();
        state.editing = None;
        state.form_error = None;
    }

    /// Create or update from the form
    ///
    /// On success the form is cleared and the list refetched. On failure
    /// the form is kept and the message recorded as the form error.
    pub async fn submit(&self) -> ClientResult<R> {
        let _guard = SubmitGuard::acquire(&self.submitting)?;
        let (form, editing) = {
            let state = self.state.read().await;
            (state.form.clone(), state.editing.clone())
        };

        let result = match &editing {
            Some(id) => match form.to_update() {
                Ok(body) => api::update::<R, C>(&self.client, id, &body).await,
                Err(e) => Err(e),
            },
            None => match form.to_create() {
                Ok(body) => api::create::<R, C>(&self.client, &body).await,
                Err(e) => Err(e),
            },
        };

        match result {
            Ok(entity) => {
                let action = if editing.is_some() { "updated" } else { "created" };
                tracing::info!(resource = R::LABEL, id = %entity.id(), action, "Saved");
                {
                    let mut state = self.state.write().await;
                    state.form = R::Form::default();
                    state.editing = None;
                    state.form_error = None;
                }
                self.notifier
                    .success(&format!("{} {action}", capitalize(R::LABEL)));
                let _ = self.load().await;
                Ok(entity)
            }
            Err(e) => {
                let verb = if editing.is_some() { "update" } else { "create" };
                let message = e.user_message(&format!("Failed to {verb} {}", R::LABEL));
                tracing::warn!(resource = R::LABEL, error = %e, "Save failed");
                self.state.write().await.form_error = Some(message.clone());
                if !e.is_unauthorized() {
                    self.notifier.error(&message);
                }
                Err(e)
            }
        }
    }

    /// Confirm, `DELETE`, refetch
    ///
    /// Returns `Ok(false)` when the user declined. A refusal from the server
    /// (typically: still referenced, deactivate instead) is shown verbatim.
    pub async fn delete(&self, id: &str) -> ClientResult<bool> {
        let prompt = format!("Are you sure you want to delete this {}?", R::LABEL);
        if !self.confirm.confirm(&prompt) {
            return Ok(false);
        }
        let _guard = SubmitGuard::acquire(&self.submitting)?;

        match api::delete::<R, C>(&self.client, id).await {
            Ok(()) => {
                tracing::info!(resource = R::LABEL, id = %id, "Deleted");
                self.notifier
                    .success(&format!("{} deleted", capitalize(R::LABEL)));
                let _ = self.load().await;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(resource = R::LABEL, id = %id, error = %e, "Delete failed");
                if !e.is_unauthorized() {
                    self.notifier
                        .error(&e.user_message(&format!("Failed to delete {}", R::LABEL)));
                }
                Err(e)
            }
        }
    }

    /// Flip `isActive` on a listed entity
    pub async fn toggle_active(&self, id: &str) -> ClientResult<R> {
        let current = {
            let state = self.state.read().await;
            state
                .list
                .items()
                .iter()
                .find(|item| item.id() == id)
                .and_then(|item| item.is_active())
        };
        let current = current.ok_or_else(|| {
            ClientError::InvalidInput(format!("This {} cannot be deactivated", R::LABEL))
        })?;
        let body = R::activation_update(!current).ok_or_else(|| {
            ClientError::InvalidInput(format!("This {} cannot be deactivated", R::LABEL))
        })?;

        let _guard = SubmitGuard::acquire(&self.submitting)?;
        match api::update::<R, C>(&self.client, id, &body).await {
            Ok(entity) => {
                let status = if current { "deactivated" } else { "activated" };
                self.notifier
                    .success(&format!("{} {status}", capitalize(R::LABEL)));
                let _ = self.load().await;
                Ok(entity)
            }
            Err(e) => {
                if !e.is_unauthorized() {
                    self.notifier
                        .error(&e.user_message(&format!("Failed to update {}", R::LABEL)));
                }
                Err(e)
            }
        }
    }
}

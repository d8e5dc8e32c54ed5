//! Auth session holder
//!
//! One instance per application root, shared by `Arc`. Holds the identity
//! of the signed-in user as reported by `GET /users/me`; the session token
//! itself is an HttpOnly cookie and never passes through here.
//!
//! State machine: `Unknown -> Loading -> Authenticated(user) | Anonymous`.
//! A check that starts while another is loading waits for that one instead
//! of issuing a second request.

use std::sync::Arc;

use shared::client::{LoginRequest, RegisterRequest};
use shared::models::User;
use tokio::sync::watch;

use crate::api;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpClient, NetworkHttpClient};
use crate::navigation::{ADMIN_PATH, DASHBOARD_PATH};
use crate::validation::{
    MAX_NAME_LEN, MIN_PASSWORD_LEN, validate_email, validate_required_text,
};

/// Auth state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    /// Nothing fetched yet
    #[default]
    Unknown,
    /// `GET /users/me` in flight
    Loading,
    Authenticated(User),
    Anonymous,
}

impl AuthState {
    /// Still waiting for the first answer
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Unknown | Self::Loading)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Registration form as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// Client-side checks, in the order the form shows them
    pub fn validate(&self) -> ClientResult<RegisterRequest> {
        let first_name = validate_required_text(&self.first_name, "First name", MAX_NAME_LEN)?;
        let last_name = validate_required_text(&self.last_name, "Last name", MAX_NAME_LEN)?;
        let email = validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::InvalidInput(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.password != self.confirm_password {
            return Err(ClientError::InvalidInput("Passwords do not match".into()));
        }
        Ok(RegisterRequest {
            first_name,
            last_name,
            email,
            password: self.password.clone(),
        })
    }
}

/// Auth session holder
pub struct AuthSession<C: HttpClient = NetworkHttpClient> {
    client: Arc<C>,
    state: watch::Sender<AuthState>,
}

impl<C: HttpClient> AuthSession<C> {
    pub fn new(client: Arc<C>) -> Self {
        let (state, _) = watch::channel(AuthState::Unknown);
        Self { client, state }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Current state snapshot
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().user().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.state.borrow().user().is_some_and(User::is_admin)
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Mount-time fetch; later calls reuse the cached identity.
    pub async fn init(&self) -> ClientResult<Option<User>> {
        let unknown = matches!(*self.state.borrow(), AuthState::Unknown);
        if unknown {
            return self.check_auth().await;
        }
        Ok(self.wait_resolved().await)
    }

    /// Re-fetch `GET /users/me`
    ///
    /// `Ok(None)` means the backend answered 401; the login redirect has
    /// already been issued unless the current route is an auth page.
    /// Any other failure also leaves the holder anonymous and is returned.
    pub async fn check_auth(&self) -> ClientResult<Option<User>> {
        let started = self.state.send_if_modified(|state| {
            if matches!(state, AuthState::Loading) {
                false
            } else {
                *state = AuthState::Loading;
                true
            }
        });
        if !started {
            tracing::debug!("Auth check already in flight, waiting");
            return Ok(self.wait_resolved().await);
        }

        match api::auth::me(&*self.client).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, role = %user.role, "Session validated");
                self.state.send_replace(AuthState::Authenticated(user.clone()));
                Ok(Some(user))
            }
            Err(ClientError::Unauthorized) => {
                tracing::info!("No valid session");
                self.state.send_replace(AuthState::Anonymous);
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Auth check failed");
                self.state.send_replace(AuthState::Anonymous);
                Err(e)
            }
        }
    }

    /// Route change: re-validate unless a check is already running.
    pub async fn on_navigate(&self, path: &str) -> ClientResult<Option<User>> {
        tracing::debug!(path = %path, "Route changed");
        let loading = matches!(*self.state.borrow(), AuthState::Loading);
        if loading {
            return Ok(self.wait_resolved().await);
        }
        self.check_auth().await
    }

    /// Sign in and land on the admin or dashboard page
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let email = validate_email(email)?;
        if password.is_empty() {
            return Err(ClientError::InvalidInput("Password is required".into()));
        }

        api::auth::login(
            &*self.client,
            &LoginRequest {
                email,
                password: password.to_string(),
            },
        )
        .await?;

        let user = self.check_auth().await?.ok_or(ClientError::Unauthorized)?;
        let landing = if user.is_admin() { ADMIN_PATH } else { DASHBOARD_PATH };
        tracing::info!(user_id = %user.id, landing = %landing, "Logged in");
        self.client.navigator().push(landing);
        Ok(user)
    }

    /// Create an account, then send the user to the login page
    pub async fn register(&self, form: &RegisterForm) -> ClientResult<()> {
        let request = form.validate()?;
        api::auth::register(&*self.client, &request).await?;
        tracing::info!(email = %request.email, "Registered");
        self.client.navigator().push(self.client.login_path());
        Ok(())
    }

    /// Sign out
    ///
    /// The server call is best effort. Local state and every client-readable
    /// cookie are cleared whatever it answers, then the login page is shown.
    pub async fn logout(&self) {
        if let Err(e) = api::auth::logout(&*self.client).await {
            tracing::warn!(error = %e, "Logout request failed, clearing local session anyway");
        }
        self.state.send_replace(AuthState::Anonymous);
        let cleared = self.client.cookie_jar().clear_client_readable();
        tracing::info!(cleared_cookies = cleared, "Logged out");

        let navigator = self.client.navigator();
        let login_path = self.client.login_path();
        if navigator.current_path() != login_path {
            navigator.hard_redirect(login_path);
        }
    }

    /// Wait until no check is in flight and return the resolved user.
    ///
    /// Returns immediately for `Unknown`: nothing is running that could
    /// resolve it.
    pub async fn wait_resolved(&self) -> Option<User> {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|s| !matches!(s, AuthState::Loading)).await {
            Ok(state) => state.user().cloned(),
            Err(_) => None,
        }
    }
}

impl<C: HttpClient> std::fmt::Debug for AuthSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

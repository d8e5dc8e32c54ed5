//! Authorization gate for protected screens
//!
//! Evaluated only once the auth holder has resolved. While it is loading the
//! screen renders nothing and no redirect fires; afterwards at most one
//! redirect is issued per gate.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::auth::{AuthSession, AuthState};
use crate::http::HttpClient;
use crate::navigation::DASHBOARD_PATH;

/// Who may see the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Authenticated,
    Admin,
}

/// What the screen should do right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Auth still resolving: render nothing
    Pending,
    Render,
    Redirect(String),
}

impl GateDecision {
    pub fn allows_render(&self) -> bool {
        matches!(self, Self::Render)
    }
}

#[derive(Debug)]
pub struct Gate {
    requirement: Requirement,
    redirected: AtomicBool,
}

impl Gate {
    pub fn new(requirement: Requirement) -> Self {
        Self {
            requirement,
            redirected: AtomicBool::new(false),
        }
    }

    /// Admin screens: anonymous to login, non-admin to the dashboard
    pub fn admin() -> Self {
        Self::new(Requirement::Admin)
    }

    /// Account screens: anonymous to login
    pub fn authenticated() -> Self {
        Self::new(Requirement::Authenticated)
    }

    /// Pure decision for a state snapshot
    pub fn decide(&self, state: &AuthState, login_path: &str) -> GateDecision {
        match state {
            AuthState::Unknown | AuthState::Loading => GateDecision::Pending,
            AuthState::Anonymous => GateDecision::Redirect(login_path.to_string()),
            AuthState::Authenticated(user)
                if self.requirement == Requirement::Admin && !user.is_admin() =>
            {
                GateDecision::Redirect(DASHBOARD_PATH.to_string())
            }
            AuthState::Authenticated(_) => GateDecision::Render,
        }
    }

    /// Decide on the current state and fire the redirect, once.
    ///
    /// A redirect is skipped when the router is already on the target, e.g.
    /// after the 401 handler sent the user to the login page.
    pub fn evaluate<C: HttpClient>(&self, session: &AuthSession<C>) -> GateDecision {
        let client = session.client();
        let decision = self.decide(&session.state(), client.login_path());
        if let GateDecision::Redirect(target) = &decision
            && !self.redirected.swap(true, Ordering::SeqCst)
        {
            let navigator = client.navigator();
            if navigator.current_path() == *target {
                tracing::debug!(target = %target, "Gate redirect already satisfied");
            } else {
                tracing::info!(target = %target, requirement = ?self.requirement, "Gate redirect");
                navigator.push(target);
            }
        }
        decision
    }

    /// Wait for the auth holder to resolve, then [`evaluate`](Self::evaluate).
    pub async fn resolve<C: HttpClient>(&self, session: &AuthSession<C>) -> GateDecision {
        session.wait_resolved().await;
        self.evaluate(session)
    }

    pub fn has_redirected(&self) -> bool {
        self.redirected.load(Ordering::SeqCst)
    }
}

//! Navigation seam
//!
//! Screens never own routing. They ask a [`Navigator`] to move: a `push` is
//! an in-app transition, a `hard_redirect` abandons the current screen
//! entirely (the 401 path).

use std::sync::{Mutex, PoisonError};

/// Login route
pub const LOGIN_PATH: &str = "/auth/login";
/// Registration route
pub const REGISTER_PATH: &str = "/auth/register";
/// Neutral landing page for signed-in non-admins
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Admin landing page
pub const ADMIN_PATH: &str = "/admin";
/// Customer order history
pub const ORDERS_PATH: &str = "/orders";

/// Whether `path` belongs to the auth pages (`/auth/...`)
pub fn is_auth_route(path: &str) -> bool {
    path == "/auth" || path.starts_with("/auth/")
}

/// Router abstraction
pub trait Navigator: Send + Sync {
    /// Route currently displayed
    fn current_path(&self) -> String;

    /// In-app navigation
    fn push(&self, path: &str);

    /// Full page navigation discarding in-flight screen state
    fn hard_redirect(&self, path: &str);
}

/// How a navigation happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    Push,
    Hard,
}

/// One recorded navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub kind: NavigationKind,
    pub path: String,
}

#[derive(Debug)]
struct NavState {
    current: String,
    history: Vec<Navigation>,
}

/// In-memory navigator
///
/// Keeps the current route and every navigation performed. Used by the CLI
/// and by tests to observe redirects.
#[derive(Debug)]
pub struct MemoryNavigator {
    state: Mutex<NavState>,
}

impl MemoryNavigator {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(NavState {
                current: initial.into(),
                history: Vec::new(),
            }),
        }
    }

    /// Every navigation performed so far, oldest first
    pub fn history(&self) -> Vec<Navigation> {
        self.lock().history.clone()
    }

    /// How many navigations (of any kind) targeted `path`
    pub fn count_to(&self, path: &str) -> usize {
        self.lock()
            .history
            .iter()
            .filter(|n| n.path == path)
            .count()
    }

    /// Move without recording, e.g. the route the user started on
    pub fn set_current(&self, path: impl Into<String>) {
        self.lock().current = path.into();
    }

    fn record(&self, kind: NavigationKind, path: &str) {
        let mut state = self.lock();
        state.current = path.to_string();
        state.history.push(Navigation {
            kind,
            path: path.to_string(),
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NavState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.lock().current.clone()
    }

    fn push(&self, path: &str) {
        tracing::debug!(path = %path, "Navigate");
        self.record(NavigationKind::Push, path);
    }

    fn hard_redirect(&self, path: &str) {
        tracing::info!(path = %path, "Hard redirect");
        self.record(NavigationKind::Hard, path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_routes() {
        assert!(is_auth_route("/auth/login"));
        assert!(is_auth_route("/auth/register"));
        assert!(!is_auth_route("/authors"));
        assert!(!is_auth_route("/admin/products"));
    }

    #[test]
    fn test_memory_navigator_records() {
        let nav = MemoryNavigator::new("/admin/products");
        nav.hard_redirect(LOGIN_PATH);
        nav.push(DASHBOARD_PATH);

        assert_eq!(nav.current_path(), DASHBOARD_PATH);
        assert_eq!(nav.count_to(LOGIN_PATH), 1);
        assert_eq!(nav.history()[0].kind, NavigationKind::Hard);
    }
}

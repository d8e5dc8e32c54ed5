//! Route guard
//!
//! Runs before a page renders and before any API call. It looks only at
//! whether the session cookie is present, never at whether it is valid;
//! validity is the auth holder's job.

use shared::client::SESSION_COOKIE;

use crate::cookie::CookieJar;
use crate::navigation::{DASHBOARD_PATH, LOGIN_PATH, is_auth_route};

/// Pages that need a session cookie
pub const PROTECTED_PREFIXES: [&str; 6] = [
    "/admin",
    "/dashboard",
    "/cart",
    "/checkout",
    "/orders",
    "/profile",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(String),
}

pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    /// Decide from the cookies the browser would send
    pub fn check(path: &str, cookies: &CookieJar) -> RouteDecision {
        Self::decide(path, cookies.contains(SESSION_COOKIE))
    }

    pub fn decide(path: &str, has_session: bool) -> RouteDecision {
        if is_protected(path) && !has_session {
            return RouteDecision::Redirect(format!("{LOGIN_PATH}?redirect={path}"));
        }
        if is_auth_route(path) && has_session {
            return RouteDecision::Redirect(DASHBOARD_PATH.to_string());
        }
        RouteDecision::Allow
    }
}

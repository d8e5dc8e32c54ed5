//! Session cookie jar
//!
//! Requests carry whatever cookies the backend set, the way a browser sends
//! credentials with `credentials: "include"`. The jar is scoped to one API
//! origin, so domain and path attributes are not tracked. It remembers the
//! `HttpOnly` flag because logout may only clear what page script could read.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Url;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredCookie {
    value: String,
    http_only: bool,
}

/// Parsed `Set-Cookie` header
#[derive(Debug, Clone, PartialEq, Eq)]
struct SetCookie {
    name: String,
    value: String,
    http_only: bool,
    /// `Max-Age<=0` or an `Expires` in the past
    expired: bool,
}

impl SetCookie {
    fn parse(header: &str, now: DateTime<Utc>) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = SetCookie {
            name: name.to_string(),
            value: value.trim().trim_matches('"').to_string(),
            http_only: false,
            expired: false,
        };

        for attr in parts {
            let (key, val) = match attr.split_once('=') {
                Some((k, v)) => (k.trim(), Some(v.trim())),
                None => (attr.trim(), None),
            };
            match (key.to_ascii_lowercase().as_str(), val) {
                ("httponly", _) => cookie.http_only = true,
                ("max-age", Some(v)) => {
                    if v.parse::<i64>().map(|secs| secs <= 0).unwrap_or(false) {
                        cookie.expired = true;
                    }
                }
                ("expires", Some(v)) => {
                    if let Some(at) = parse_expires(v)
                        && at <= now
                    {
                        cookie.expired = true;
                    }
                }
                _ => {}
            }
        }
        Some(cookie)
    }
}

/// Cookie dates: RFC 1123 (`Thu, 01 Jan 1970 00:00:00 GMT`) or the dashed
/// Netscape form (`Thu, 01-Jan-1970 00:00:00 GMT`, two- or four-digit year)
fn parse_expires(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc2822(value) {
        return Some(at.with_timezone(&Utc));
    }
    ["%a, %d-%b-%Y %H:%M:%S GMT", "%a, %d-%b-%y %H:%M:%S GMT"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|at| at.and_utc())
}

/// Cookie jar shared by one HTTP client
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: RwLock<BTreeMap<String, StoredCookie>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a cookie with this name is present (its value is not checked)
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Names of all stored cookies
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Value of a cookie page script could read; `None` for HttpOnly ones
    pub fn client_readable(&self, name: &str) -> Option<String> {
        self.read()
            .get(name)
            .filter(|c| !c.http_only)
            .map(|c| c.value.clone())
    }

    /// Drop every cookie that is not HttpOnly, returning how many went
    pub fn clear_client_readable(&self) -> usize {
        let mut cookies = self.write();
        let before = cookies.len();
        cookies.retain(|_, c| c.http_only);
        before - cookies.len()
    }

    /// Apply one `Set-Cookie` header value
    pub fn apply_set_cookie(&self, header: &str) {
        let Some(cookie) = SetCookie::parse(header, Utc::now()) else {
            tracing::debug!(header = %header, "Ignoring malformed Set-Cookie");
            return;
        };
        let mut cookies = self.write();
        if cookie.expired {
            cookies.remove(&cookie.name);
        } else {
            cookies.insert(
                cookie.name,
                StoredCookie {
                    value: cookie.value,
                    http_only: cookie.http_only,
                },
            );
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, StoredCookie>> {
        self.cookies.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, StoredCookie>> {
        self.cookies.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, _url: &Url) {
        for header in cookie_headers {
            if let Ok(raw) = header.to_str() {
                self.apply_set_cookie(raw);
            }
        }
    }

    fn cookies(&self, _url: &Url) -> Option<HeaderValue> {
        let cookies = self.read();
        if cookies.is_empty() {
            return None;
        }
        let header = cookies
            .iter()
            .map(|(name, c)| format!("{name}={}", c.value))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&header).ok()
    }
}

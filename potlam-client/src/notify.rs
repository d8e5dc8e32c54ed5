//! User-facing notices and confirmations
//!
//! Every failure is handled where the call was made and reported as a
//! transient notice (a toast in the web front end). Destructive actions ask
//! for a blocking confirmation first.

use std::sync::{Mutex, PoisonError};

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A transient notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Notice sink
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    fn success(&self, message: &str) {
        self.notify(Notice {
            level: NoticeLevel::Success,
            message: message.to_string(),
        });
    }

    fn info(&self, message: &str) {
        self.notify(Notice {
            level: NoticeLevel::Info,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.notify(Notice {
            level: NoticeLevel::Error,
            message: message.to_string(),
        });
    }
}

/// Records notices in memory
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.lock().last().cloned()
    }

    /// Remove and return everything recorded so far
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.lock())
    }

    /// Messages at the given level, oldest first
    pub fn messages(&self, level: NoticeLevel) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notice>> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.lock().push(notice);
    }
}

/// Writes notices to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success | NoticeLevel::Info => tracing::info!("{}", notice.message),
            NoticeLevel::Error => tracing::error!("{}", notice.message),
        }
    }
}

/// Blocking confirmation dialog
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Confirmation that always answers the same way
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, message: &str) -> bool {
        tracing::debug!(message = %message, answer = self.0, "Auto-confirm");
        self.0
    }
}

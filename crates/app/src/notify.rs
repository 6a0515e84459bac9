//! User notifications
//!
//! Screens report outcomes through a [`Notifier`]; delivery is
//! fire-and-forget.

use std::sync::Mutex;

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Writes notifications to the log
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => info!(notice = "success", "{}", message),
            NoticeKind::Warning => warn!(notice = "warning", "{}", message),
            NoticeKind::Error => warn!(notice = "error", "{}", message),
        }
    }
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeKind, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(NoticeKind, String)> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, kind: NoticeKind) -> usize {
        self.notices().iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn last(&self) -> Option<(NoticeKind, String)> {
        self.notices().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push((kind, message.to_string()));
        }
    }
}

//! State shared between screens

use std::sync::{Arc, RwLock};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::notify::{NoticeKind, Notifier};

/// What every screen is constructed with: the API, where to report
/// outcomes, and the establishment currently selected in the back-office
pub struct ScreenContext<A> {
    api: Arc<A>,
    notifier: Arc<dyn Notifier>,
    selected_establishment: Arc<RwLock<Option<Uuid>>>,
}

// Manual impl: `A` itself need not be Clone
impl<A> Clone for ScreenContext<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            notifier: self.notifier.clone(),
            selected_establishment: self.selected_establishment.clone(),
        }
    }
}

impl<A> ScreenContext<A> {
    pub fn new(api: A, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api: Arc::new(api),
            notifier,
            selected_establishment: Arc::new(RwLock::new(None)),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Owned handle for calls that outlive a borrow of the screen
    pub fn api_handle(&self) -> Arc<A> {
        self.api.clone()
    }

    pub fn notify(&self, kind: NoticeKind, message: &str) {
        self.notifier.notify(kind, message);
    }

    pub fn selected_establishment(&self) -> Option<Uuid> {
        self.selected_establishment
            .read()
            .map(|s| *s)
            .unwrap_or(None)
    }

    /// Visible to every screen sharing this context
    pub fn select_establishment(&self, id: Option<Uuid>) {
        if let Ok(mut selected) = self.selected_establishment.write() {
            *selected = id;
        }
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

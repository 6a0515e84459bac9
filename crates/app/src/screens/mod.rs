//! Back-office screens
//!
//! Every list screen runs the same cycle, implemented once by
//! [`CrudScreen`]: load the list, open a form, validate locally, call the
//! API, then reload on success or keep the form open on failure. Each
//! resource plugs in through [`Resource`].

mod categories;
mod conventions;
mod equipment;
mod establishments;
mod hotel_equipment;
mod maintenance;
mod rooms;

pub use categories::{Categories, CategoriesScreen};
pub use conventions::{Conventions, ConventionsScreen, PricingEditor};
pub use equipment::{EquipmentCatalogue, EquipmentScreen};
pub use establishments::{Establishments, EstablishmentsScreen};
pub use hotel_equipment::{HotelEquipmentOffers, HotelEquipmentScreen};
pub use maintenance::{MaintenanceScreen, MaintenanceTasks};
pub use rooms::{Rooms, RoomsScreen};

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use hotelier_core::{DeleteMode, FieldErrors, ListFilter, Searchable};

use crate::api::{ApiResult, HotelApi};
use crate::notify::NoticeKind;
use crate::state::ScreenContext;

/// Outcome of the last operation a screen ran
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

/// An open create/edit form
#[derive(Debug, Clone)]
pub struct FormState<D> {
    pub mode: FormMode,
    pub draft: D,
    pub errors: FieldErrors,
    /// Mirrors the disabled state of the form while the API call runs.
    /// A second submit is ruled out by `submit` taking `&mut self`.
    pub submitting: bool,
}

impl<D> FormState<D> {
    pub fn editing(&self) -> Option<Uuid> {
        match self.mode {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id),
        }
    }
}

/// One kind of entity managed by a list screen
#[allow(async_fn_in_trait)]
pub trait Resource {
    type Item: Clone + Searchable;
    type Draft: Clone;
    type Filter: ListFilter<Self::Item> + Default;

    /// Capitalized noun used in notices
    const TITLE: &'static str;
    const SINGULAR: &'static str;
    const PLURAL: &'static str;

    fn id(item: &Self::Item) -> Uuid;

    /// Empty form for the currently selected establishment
    fn blank(selected: Option<Uuid>, today: NaiveDate) -> Self::Draft;

    /// Form pre-filled from an existing item
    fn draft_of(item: &Self::Item) -> Self::Draft;

    fn validate(draft: &Self::Draft, current: Option<&Self::Item>, today: NaiveDate)
        -> FieldErrors;

    async fn list<A: HotelApi>(api: &A, selected: Option<Uuid>) -> ApiResult<Vec<Self::Item>>;

    async fn create<A: HotelApi>(api: &A, draft: Self::Draft) -> ApiResult<Self::Item>;

    async fn update<A: HotelApi>(api: &A, id: Uuid, draft: Self::Draft) -> ApiResult<Self::Item>;

    async fn delete<A: HotelApi>(api: &A, id: Uuid, mode: DeleteMode) -> ApiResult<()>;
}

/// List, form and delete state of one screen
pub struct CrudScreen<R: Resource, A> {
    ctx: ScreenContext<A>,
    items: Vec<R::Item>,
    status: Status,
    pub filter: R::Filter,
    form: Option<FormState<R::Draft>>,
    pending_delete: Option<Uuid>,
    /// Row whose action is running; mirrors the row's disabled state
    busy_row: Option<Uuid>,
    delete_mode: DeleteMode,
    _resource: PhantomData<R>,
}

impl<R: Resource, A: HotelApi> CrudScreen<R, A> {
    pub fn new(ctx: ScreenContext<A>) -> Self {
        Self {
            ctx,
            items: Vec::new(),
            status: Status::Idle,
            filter: R::Filter::default(),
            form: None,
            pending_delete: None,
            busy_row: None,
            delete_mode: DeleteMode::default(),
            _resource: PhantomData,
        }
    }

    pub fn context(&self) -> &ScreenContext<A> {
        &self.ctx
    }

    pub fn items(&self) -> &[R::Item] {
        &self.items
    }

    /// Items passing the current filter
    pub fn visible(&self) -> Vec<&R::Item> {
        self.filter.apply(&self.items)
    }

    pub fn summary(&self) -> String {
        self.filter
            .summary(self.visible().len(), R::SINGULAR, R::PLURAL)
    }

    pub fn find(&self, id: Uuid) -> Option<&R::Item> {
        self.items.iter().find(|item| R::id(item) == id)
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn form(&self) -> Option<&FormState<R::Draft>> {
        self.form.as_ref()
    }

    pub fn pending_delete(&self) -> Option<Uuid> {
        self.pending_delete
    }

    pub fn busy_row(&self) -> Option<Uuid> {
        self.busy_row
    }

    pub fn is_row_busy(&self, id: Uuid) -> bool {
        self.busy_row == Some(id)
    }

    pub fn set_delete_mode(&mut self, mode: DeleteMode) {
        self.delete_mode = mode;
    }

    /// Reload the whole list
    pub async fn load(&mut self) -> bool {
        self.status = Status::Loading;
        match R::list(self.ctx.api(), self.ctx.selected_establishment()).await {
            Ok(items) => {
                debug!(count = items.len(), resource = R::PLURAL, "List loaded");
                self.items = items;
                self.status = Status::Success;
                true
            }
            Err(e) => {
                warn!(error = %e, resource = R::PLURAL, "List load failed");
                let message = e.user_message(&format!("Unable to load {}", R::PLURAL));
                self.ctx.notify(NoticeKind::Error, &message);
                self.status = Status::Error(message);
                false
            }
        }
    }

    pub fn open_create(&mut self) {
        let draft = R::blank(self.ctx.selected_establishment(), self.ctx.today());
        self.form = Some(FormState {
            mode: FormMode::Create,
            draft,
            errors: FieldErrors::new(),
            submitting: false,
        });
    }

    /// Open the form on a listed item; false when the id is unknown
    pub fn open_edit(&mut self, id: Uuid) -> bool {
        let Some(item) = self.find(id) else {
            return false;
        };
        self.form = Some(FormState {
            mode: FormMode::Edit(id),
            draft: R::draft_of(item),
            errors: FieldErrors::new(),
            submitting: false,
        });
        true
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Change one field of the open form and forget its error
    pub fn edit(&mut self, field: &str, change: impl FnOnce(&mut R::Draft)) {
        if let Some(form) = self.form.as_mut() {
            change(&mut form.draft);
            form.errors.clear(field);
        }
    }

    /// Validate and send the open form. Returns true when it was saved.
    pub async fn submit(&mut self) -> bool {
        let today = self.ctx.today();
        let Some(form) = self.form.as_mut() else {
            return false;
        };

        let editing = form.editing();
        let current = editing.and_then(|id| self.items.iter().find(|item| R::id(item) == id));
        let errors = R::validate(&form.draft, current, today);
        if !errors.is_empty() {
            debug!(fields = errors.len(), resource = R::SINGULAR, "Form rejected locally");
            form.errors = errors;
            return false;
        }

        form.errors = FieldErrors::new();
        form.submitting = true;
        let draft = form.draft.clone();
        self.status = Status::Loading;

        let result = match editing {
            None => R::create(self.ctx.api(), draft).await.map(|_| "created"),
            Some(id) => R::update(self.ctx.api(), id, draft).await.map(|_| "updated"),
        };

        match result {
            Ok(verb) => {
                self.ctx
                    .notify(NoticeKind::Success, &format!("{} {} successfully", R::TITLE, verb));
                self.form = None;
                self.load().await;
                true
            }
            Err(e) => {
                warn!(error = %e, resource = R::SINGULAR, "Save failed");
                let message = e.user_message(&format!("Unable to save the {}", R::SINGULAR));
                if let Some(form) = self.form.as_mut() {
                    form.submitting = false;
                    if let Some(fields) = e.fields() {
                        form.errors = fields.clone();
                    }
                }
                self.ctx.notify(NoticeKind::Error, &message);
                self.status = Status::Error(message);
                false
            }
        }
    }

    /// First step of a delete; nothing is sent until confirmed
    pub fn request_delete(&mut self, id: Uuid) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the item awaiting confirmation. Returns true when deleted.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };
        let mode = self.delete_mode;
        let deleted = self
            .row_action(
                id,
                &format!("{} deleted successfully", R::TITLE),
                &format!("Unable to delete the {}", R::SINGULAR),
                move |api| async move { R::delete(&*api, id, mode).await },
            )
            .await;
        if deleted && self.form.as_ref().and_then(FormState::editing) == Some(id) {
            self.form = None;
        }
        deleted
    }

    /// Run a call on one row, marking only that row busy
    pub async fn row_action<T, F, Fut>(
        &mut self,
        id: Uuid,
        success: &str,
        fallback: &str,
        call: F,
    ) -> bool
    where
        F: FnOnce(Arc<A>) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        self.busy_row = Some(id);
        let result = call(self.ctx.api_handle()).await;
        self.busy_row = None;

        match result {
            Ok(_) => {
                self.ctx.notify(NoticeKind::Success, success);
                self.load().await;
                true
            }
            Err(e) => {
                warn!(error = %e, %id, resource = R::SINGULAR, "Row action failed");
                let message = e.user_message(fallback);
                self.ctx.notify(NoticeKind::Error, &message);
                self.status = Status::Error(message);
                false
            }
        }
    }
}

//! Client conventions and the per-category pricing editor

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use hotelier_core::validation::validate_convention;
use hotelier_core::{
    CategoryPricing, ClientPricing, Convention, ConventionDraft, ConventionFilter,
    ConventionQuery, DeleteMode, FieldErrors, Month, MonthlyPrices, PricingBook,
};

use super::{CrudScreen, Resource, Status};
use crate::api::{ApiResult, HotelApi};
use crate::notify::NoticeKind;
use crate::state::ScreenContext;

pub struct Conventions;

impl Resource for Conventions {
    type Item = Convention;
    type Draft = ConventionDraft;
    type Filter = ConventionFilter;

    const TITLE: &'static str = "Convention";
    const SINGULAR: &'static str = "convention";
    const PLURAL: &'static str = "conventions";

    fn id(item: &Convention) -> Uuid {
        item.id
    }

    fn blank(selected: Option<Uuid>, today: NaiveDate) -> ConventionDraft {
        ConventionDraft {
            client_name: String::new(),
            category_id: Uuid::nil(),
            establishment_id: selected,
            starts_on: today,
            ends_on: None,
            default_price: 0.0,
            monthly_prices: MonthlyPrices::new(),
            discount_percent: None,
            monthly_flat_rate: None,
            conditions: None,
            active: true,
        }
    }

    fn draft_of(item: &Convention) -> ConventionDraft {
        item.details.clone()
    }

    fn validate(
        draft: &ConventionDraft,
        _current: Option<&Convention>,
        _today: NaiveDate,
    ) -> FieldErrors {
        let mut errors = validate_convention(draft);
        if draft.category_id.is_nil() {
            errors.insert("category_id", "Room category is required");
        }
        errors
    }

    async fn list<A: HotelApi>(api: &A, _selected: Option<Uuid>) -> ApiResult<Vec<Convention>> {
        api.list_conventions(ConventionQuery::default()).await
    }

    async fn create<A: HotelApi>(api: &A, draft: ConventionDraft) -> ApiResult<Convention> {
        api.create_convention(draft).await
    }

    async fn update<A: HotelApi>(
        api: &A,
        id: Uuid,
        draft: ConventionDraft,
    ) -> ApiResult<Convention> {
        api.update_convention(id, draft).await
    }

    async fn delete<A: HotelApi>(api: &A, id: Uuid, _mode: DeleteMode) -> ApiResult<()> {
        api.delete_convention(id).await
    }
}

pub type ConventionsScreen<A> = CrudScreen<Conventions, A>;

impl<A: HotelApi> CrudScreen<Conventions, A> {
    pub async fn set_active(&mut self, id: Uuid, active: bool) -> bool {
        let success = if active {
            "Convention activated"
        } else {
            "Convention deactivated"
        };
        self.row_action(
            id,
            success,
            "Unable to change the convention",
            move |api| async move { api.set_convention_active(id, active).await },
        )
        .await
    }
}

/// Edits the prices negotiated with one client, every room category at
/// once, and saves them as one convention per priced category.
pub struct PricingEditor<A> {
    ctx: ScreenContext<A>,
    client_name: String,
    starts_on: NaiveDate,
    ends_on: Option<NaiveDate>,
    default_price: f64,
    book: PricingBook,
    status: Status,
    /// Mirrors the save button's disabled state during the call
    saving: bool,
}

impl<A: HotelApi> PricingEditor<A> {
    /// `default_price` seeds categories the client has no convention for
    pub fn new(ctx: ScreenContext<A>, default_price: f64) -> Self {
        let starts_on = ctx.today();
        Self {
            ctx,
            client_name: String::new(),
            starts_on,
            ends_on: None,
            default_price,
            book: PricingBook::new(),
            status: Status::Idle,
            saving: false,
        }
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn set_client(&mut self, name: &str) {
        self.client_name = name.to_string();
    }

    pub fn set_period(&mut self, starts_on: NaiveDate, ends_on: Option<NaiveDate>) {
        self.starts_on = starts_on;
        self.ends_on = ends_on;
    }

    pub fn book(&self) -> &PricingBook {
        &self.book
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Seed every category, taking over what the client already has
    pub async fn load(&mut self) -> bool {
        self.status = Status::Loading;
        let api = self.ctx.api_handle();
        let categories = match api.list_categories().await {
            Ok(categories) => categories,
            Err(e) => return self.fail(e.user_message("Unable to load room categories")),
        };

        let client = self.client_name.trim().to_string();
        let conventions = if client.is_empty() {
            Vec::new()
        } else {
            let query = ConventionQuery {
                client_name: Some(client),
                ..Default::default()
            };
            match api.list_conventions(query).await {
                Ok(conventions) => conventions,
                Err(e) => return self.fail(e.user_message("Unable to load conventions")),
            }
        };

        debug!(
            categories = categories.len(),
            conventions = conventions.len(),
            "Pricing loaded"
        );
        self.book = PricingBook::with_conventions(&categories, &conventions, self.default_price);
        self.status = Status::Success;
        true
    }

    pub fn set_default(&mut self, category_id: Uuid, price: f64) -> bool {
        self.book.set_default(category_id, price).is_ok()
    }

    pub fn set_month_override(&mut self, category_id: Uuid, month: Month, price: f64) -> bool {
        self.book.set_month_override(category_id, month, price).is_ok()
    }

    pub fn apply_default_to_all(&mut self, category_id: Uuid) -> bool {
        self.book.apply_default_to_all(category_id).is_ok()
    }

    pub fn clear_all(&mut self, category_id: Uuid) -> bool {
        self.book.clear_all(category_id).is_ok()
    }

    pub fn set_conditions(&mut self, category_id: Uuid, conditions: &str) -> bool {
        self.book.set_conditions(category_id, conditions).is_ok()
    }

    pub fn effective_price(&self, category_id: Uuid, month: Month) -> Option<f64> {
        self.book.effective_price(category_id, month).ok()
    }

    pub fn export(&self) -> Vec<CategoryPricing> {
        self.book.export()
    }

    /// Save the pricing; nothing is sent while no category has a price
    /// or the client is unnamed.
    pub async fn save(&mut self) -> bool {
        if self.client_name.trim().is_empty() {
            self.ctx.notify(NoticeKind::Warning, "Client is required");
            return false;
        }
        if !self.book.is_valid() {
            self.ctx.notify(
                NoticeKind::Warning,
                "At least one category needs a price greater than 0",
            );
            return false;
        }

        let pricing = ClientPricing {
            client_name: self.client_name.trim().to_string(),
            establishment_id: self.ctx.selected_establishment(),
            starts_on: self.starts_on,
            ends_on: self.ends_on,
            pricing: self.book.export(),
        };

        self.saving = true;
        self.status = Status::Loading;
        let result = self.ctx.api().save_client_pricing(pricing).await;
        self.saving = false;

        match result {
            Ok(saved) => {
                let message = match saved.len() {
                    1 => "1 convention saved".to_string(),
                    n => format!("{} conventions saved", n),
                };
                self.ctx.notify(NoticeKind::Success, &message);
                self.status = Status::Success;
                true
            }
            Err(e) => self.fail(e.user_message("Unable to save the pricing")),
        }
    }

    fn fail(&mut self, message: String) -> bool {
        warn!(client = %self.client_name, error = %message, "Pricing operation failed");
        self.ctx.notify(NoticeKind::Error, &message);
        self.status = Status::Error(message);
        false
    }
}

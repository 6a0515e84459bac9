//! Establishments screen

use chrono::NaiveDate;
use uuid::Uuid;

use hotelier_core::validation::validate_establishment;
use hotelier_core::{
    DeleteMode, Establishment, EstablishmentDraft, EstablishmentFilter, EstablishmentQuery,
    EstablishmentSummary, FieldErrors,
};

use super::{CrudScreen, Resource};
use crate::api::{ApiResult, HotelApi};
use crate::notify::NoticeKind;

pub struct Establishments;

impl Resource for Establishments {
    type Item = Establishment;
    type Draft = EstablishmentDraft;
    type Filter = EstablishmentFilter;

    const TITLE: &'static str = "Establishment";
    const SINGULAR: &'static str = "establishment";
    const PLURAL: &'static str = "establishments";

    fn id(item: &Establishment) -> Uuid {
        item.id
    }

    fn blank(_selected: Option<Uuid>, _today: NaiveDate) -> EstablishmentDraft {
        EstablishmentDraft::default()
    }

    fn draft_of(item: &Establishment) -> EstablishmentDraft {
        item.details.clone()
    }

    fn validate(
        draft: &EstablishmentDraft,
        _current: Option<&Establishment>,
        _today: NaiveDate,
    ) -> FieldErrors {
        validate_establishment(draft)
    }

    async fn list<A: HotelApi>(api: &A, _selected: Option<Uuid>) -> ApiResult<Vec<Establishment>> {
        api.list_establishments(EstablishmentQuery::default()).await
    }

    async fn create<A: HotelApi>(api: &A, draft: EstablishmentDraft) -> ApiResult<Establishment> {
        api.create_establishment(draft).await
    }

    async fn update<A: HotelApi>(
        api: &A,
        id: Uuid,
        draft: EstablishmentDraft,
    ) -> ApiResult<Establishment> {
        api.update_establishment(id, draft).await
    }

    async fn delete<A: HotelApi>(api: &A, id: Uuid, mode: DeleteMode) -> ApiResult<()> {
        api.delete_establishment(id, mode).await
    }
}

pub type EstablishmentsScreen<A> = CrudScreen<Establishments, A>;

impl<A: HotelApi> CrudScreen<Establishments, A> {
    /// Switch an establishment between active and inactive
    pub async fn toggle_status(&mut self, id: Uuid) -> bool {
        self.row_action(
            id,
            "Establishment status updated",
            "Unable to change the establishment status",
            move |api| async move { api.toggle_establishment_status(id).await },
        )
        .await
    }

    /// Occupancy rate of the open form, recomputed on every keystroke
    pub fn form_occupancy_rate(&self) -> Option<u32> {
        self.form().map(|form| form.draft.occupancy_rate())
    }

    /// Make an establishment the one other screens work on
    pub fn select(&self, id: Option<Uuid>) {
        self.context().select_establishment(id);
    }

    /// Aggregate counts across all establishments
    pub async fn overview(&self) -> Option<EstablishmentSummary> {
        match self.context().api().establishment_summary().await {
            Ok(summary) => Some(summary),
            Err(e) => {
                let message = e.user_message("Unable to load the summary");
                self.context().notify(NoticeKind::Warning, &message);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoticeKind;
    use crate::screens::testing::context;
    use crate::screens::{FormMode, Status};

    fn fill(screen: &mut EstablishmentsScreen<impl HotelApi>) {
        screen.edit("name", |d| d.name = "Hôtel du Parc".to_string());
        screen.edit("address", |d| d.address = "12 avenue Foch".to_string());
        screen.edit("postal_code", |d| d.postal_code = "75008".to_string());
        screen.edit("city", |d| d.city = "Paris".to_string());
    }

    #[tokio::test]
    async fn test_create_without_siret_succeeds() {
        let (ctx, notices) = context();
        let mut screen = EstablishmentsScreen::new(ctx);
        screen.load().await;

        screen.open_create();
        fill(&mut screen);
        screen.edit("total_rooms", |d| d.total_rooms = 20);
        screen.edit("occupied_rooms", |d| d.occupied_rooms = 5);
        assert_eq!(screen.form_occupancy_rate(), Some(25));

        assert!(screen.submit().await);
        assert!(screen.form().is_none());
        assert_eq!(screen.items().len(), 1);
        assert!(screen.items()[0].details.siret.is_none());
        assert_eq!(
            notices.last(),
            Some((NoticeKind::Success, "Establishment created successfully".to_string()))
        );
    }

    #[tokio::test]
    async fn test_missing_name_makes_no_call() {
        let (ctx, notices) = context();
        let mut screen = EstablishmentsScreen::new(ctx);

        screen.open_create();
        fill(&mut screen);
        screen.edit("name", |d| d.name = "   ".to_string());

        assert!(!screen.submit().await);
        let form = screen.form().unwrap();
        assert!(form.errors.contains("name"));
        assert!(!form.submitting);
        assert!(notices.notices().is_empty());

        screen.load().await;
        assert!(screen.items().is_empty());

        // Editing the field clears its error
        screen.edit("name", |d| d.name = "Le Relais".to_string());
        assert!(!screen.form().unwrap().errors.contains("name"));
    }

    #[tokio::test]
    async fn test_more_occupied_than_total_blocks_submit() {
        let (ctx, notices) = context();
        let mut screen = EstablishmentsScreen::new(ctx);

        screen.open_create();
        fill(&mut screen);
        screen.edit("total_rooms", |d| d.total_rooms = 5);
        screen.edit("occupied_rooms", |d| d.occupied_rooms = 10);

        assert!(!screen.submit().await);
        let form = screen.form().unwrap();
        assert!(form.errors.contains("occupied_rooms"));
        assert!(!form.submitting);
        assert!(notices.notices().is_empty());

        screen.load().await;
        assert!(screen.items().is_empty());
    }

    #[tokio::test]
    async fn test_action_on_nil_id_is_reported() {
        let (ctx, notices) = context();
        let mut screen = EstablishmentsScreen::new(ctx);

        assert!(!screen.toggle_status(Uuid::nil()).await);
        assert_eq!(notices.count(NoticeKind::Error), 1);
        assert!(matches!(screen.status(), Status::Error(m) if m.starts_with("Not found")));
        assert!(screen.busy_row().is_none());

        // The store is still usable afterwards
        assert!(screen.load().await);
    }

    #[tokio::test]
    async fn test_api_failure_keeps_form_open() {
        let (ctx, notices) = context();
        let mut screen = EstablishmentsScreen::new(ctx);
        screen.open_create();
        fill(&mut screen);
        assert!(screen.submit().await);
        let id = screen.items()[0].id;

        assert!(screen.open_edit(id));
        screen.edit("city", |d| d.city = "Lyon".to_string());

        // Removed behind the screen's back
        screen
            .context()
            .api()
            .delete_establishment(id, DeleteMode::Hard)
            .await
            .unwrap();

        assert!(!screen.submit().await);
        let form = screen.form().unwrap();
        assert_eq!(form.mode, FormMode::Edit(id));
        assert_eq!(form.draft.city, "Lyon");
        assert!(!form.submitting);
        assert_eq!(notices.count(NoticeKind::Error), 1);
        assert!(matches!(screen.status(), Status::Error(m) if m.starts_with("Not found")));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (ctx, _notices) = context();
        let mut screen = EstablishmentsScreen::new(ctx);
        screen.open_create();
        fill(&mut screen);
        screen.submit().await;
        let id = screen.items()[0].id;

        assert!(!screen.confirm_delete().await);
        screen.request_delete(id);
        screen.cancel_delete();
        assert!(!screen.confirm_delete().await);
        screen.load().await;
        assert!(screen.items()[0].is_active());

        screen.request_delete(id);
        assert!(screen.confirm_delete().await);
        assert!(!screen.items()[0].is_active());
        assert!(screen.busy_row().is_none());

        screen.set_delete_mode(DeleteMode::Hard);
        screen.request_delete(id);
        assert!(screen.confirm_delete().await);
        assert!(screen.items().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_status_and_overview() {
        let (ctx, _notices) = context();
        let mut screen = EstablishmentsScreen::new(ctx);
        screen.open_create();
        fill(&mut screen);
        screen.submit().await;
        let id = screen.items()[0].id;

        assert!(screen.toggle_status(id).await);
        assert!(!screen.items()[0].is_active());

        let summary = screen.overview().await.unwrap();
        assert_eq!(summary.establishments, 1);
        assert_eq!(summary.active, 0);

        screen.filter.search = "parc".to_string();
        assert_eq!(screen.summary(), "1 establishment found for \"parc\"");
    }
}

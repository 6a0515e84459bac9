//! Equipment offered by the selected establishment

use chrono::NaiveDate;
use uuid::Uuid;

use hotelier_core::validation::validate_hotel_equipment;
use hotelier_core::{
    DeleteMode, FieldErrors, HotelEquipment, HotelEquipmentDraft, HotelEquipmentFilter,
    HotelEquipmentQuery,
};

use super::{CrudScreen, Resource};
use crate::api::{ApiResult, HotelApi};

pub struct HotelEquipmentOffers;

impl Resource for HotelEquipmentOffers {
    type Item = HotelEquipment;
    type Draft = HotelEquipmentDraft;
    type Filter = HotelEquipmentFilter;

    const TITLE: &'static str = "Equipment offer";
    const SINGULAR: &'static str = "equipment offer";
    const PLURAL: &'static str = "equipment offers";

    fn id(item: &HotelEquipment) -> Uuid {
        item.id
    }

    // The equipment is picked in the form
    fn blank(selected: Option<Uuid>, _today: NaiveDate) -> HotelEquipmentDraft {
        HotelEquipmentDraft::new(selected.unwrap_or_default(), Uuid::nil())
    }

    fn draft_of(item: &HotelEquipment) -> HotelEquipmentDraft {
        item.details.clone()
    }

    fn validate(
        draft: &HotelEquipmentDraft,
        _current: Option<&HotelEquipment>,
        _today: NaiveDate,
    ) -> FieldErrors {
        let mut errors = validate_hotel_equipment(draft);
        if draft.establishment_id.is_nil() {
            errors.insert("establishment_id", "Select an establishment first");
        }
        if draft.equipment_id.is_nil() {
            errors.insert("equipment_id", "Equipment is required");
        }
        errors
    }

    async fn list<A: HotelApi>(
        api: &A,
        selected: Option<Uuid>,
    ) -> ApiResult<Vec<HotelEquipment>> {
        let Some(establishment_id) = selected else {
            return Ok(Vec::new());
        };
        let query = HotelEquipmentQuery {
            establishment_id: Some(establishment_id),
            ..Default::default()
        };
        api.list_hotel_equipment(query).await
    }

    async fn create<A: HotelApi>(api: &A, draft: HotelEquipmentDraft) -> ApiResult<HotelEquipment> {
        api.create_hotel_equipment(draft).await
    }

    async fn update<A: HotelApi>(
        api: &A,
        id: Uuid,
        draft: HotelEquipmentDraft,
    ) -> ApiResult<HotelEquipment> {
        api.update_hotel_equipment(id, draft).await
    }

    async fn delete<A: HotelApi>(api: &A, id: Uuid, mode: DeleteMode) -> ApiResult<()> {
        api.delete_hotel_equipment(id, mode).await
    }
}

pub type HotelEquipmentScreen<A> = CrudScreen<HotelEquipmentOffers, A>;

impl<A: HotelApi> CrudScreen<HotelEquipmentOffers, A> {
    /// Switching to free drops the surcharge
    pub fn set_free(&mut self, free: bool) {
        self.edit("surcharge", |d| {
            d.is_free = free;
            if free {
                d.surcharge = None;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing::context;
    use hotelier_core::{EquipmentCategory, EquipmentDraft, EstablishmentDraft};

    #[tokio::test]
    async fn test_paid_offer_needs_surcharge() {
        let (ctx, notices) = context();
        let hotel = ctx
            .api()
            .create_establishment(EstablishmentDraft::new("A", "1 rue", "75001", "Paris"))
            .await
            .unwrap();
        let spa = ctx
            .api()
            .create_equipment(EquipmentDraft::new("Spa", EquipmentCategory::Wellness))
            .await
            .unwrap();
        ctx.select_establishment(Some(hotel.id));
        let mut screen = HotelEquipmentScreen::new(ctx);

        screen.open_create();
        screen.set_free(false);
        assert!(!screen.submit().await);
        let errors = &screen.form().unwrap().errors;
        assert!(errors.contains("equipment_id") && errors.contains("surcharge"));

        screen.edit("equipment_id", |d| d.equipment_id = spa.id);
        screen.edit("surcharge", |d| d.surcharge = Some(15.0));
        assert!(screen.submit().await);
        assert_eq!(screen.items()[0].effective_surcharge(), 15.0);

        // Offering it twice is refused by the store
        screen.open_create();
        screen.edit("equipment_id", |d| d.equipment_id = spa.id);
        assert!(!screen.submit().await);
        assert_eq!(notices.count(crate::notify::NoticeKind::Error), 1);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_available() {
        let (ctx, _notices) = context();
        let hotel = ctx
            .api()
            .create_establishment(EstablishmentDraft::new("A", "1 rue", "75001", "Paris"))
            .await
            .unwrap();
        let wifi = ctx
            .api()
            .create_equipment(EquipmentDraft::new("Wifi", EquipmentCategory::Connectivity))
            .await
            .unwrap();
        ctx.select_establishment(Some(hotel.id));
        let mut screen = HotelEquipmentScreen::new(ctx);

        screen.open_create();
        screen.edit("equipment_id", |d| d.equipment_id = wifi.id);
        assert!(screen.submit().await);
        let id = screen.items()[0].id;

        screen.request_delete(id);
        assert!(screen.confirm_delete().await);
        assert_eq!(screen.items().len(), 1);
        assert!(!screen.items()[0].details.is_available);

        screen.filter.available = hotelier_core::Choice::Only(true);
        assert!(screen.visible().is_empty());
    }
}

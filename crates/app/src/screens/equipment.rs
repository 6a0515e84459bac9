//! Equipment catalogue screen

use chrono::NaiveDate;
use uuid::Uuid;

use hotelier_core::validation::validate_equipment;
use hotelier_core::{
    DeleteMode, Equipment, EquipmentCategory, EquipmentDraft, EquipmentFilter, EquipmentQuery,
    FieldErrors,
};

use super::{CrudScreen, Resource};
use crate::api::{ApiResult, HotelApi};

pub struct EquipmentCatalogue;

impl Resource for EquipmentCatalogue {
    type Item = Equipment;
    type Draft = EquipmentDraft;
    type Filter = EquipmentFilter;

    const TITLE: &'static str = "Equipment";
    const SINGULAR: &'static str = "equipment";
    const PLURAL: &'static str = "equipment";

    fn id(item: &Equipment) -> Uuid {
        item.id
    }

    fn blank(_selected: Option<Uuid>, _today: NaiveDate) -> EquipmentDraft {
        EquipmentDraft::new("", EquipmentCategory::default())
    }

    fn draft_of(item: &Equipment) -> EquipmentDraft {
        item.details.clone()
    }

    fn validate(draft: &EquipmentDraft, _current: Option<&Equipment>, _today: NaiveDate) -> FieldErrors {
        validate_equipment(draft)
    }

    async fn list<A: HotelApi>(api: &A, _selected: Option<Uuid>) -> ApiResult<Vec<Equipment>> {
        api.list_equipment(EquipmentQuery::default()).await
    }

    async fn create<A: HotelApi>(api: &A, draft: EquipmentDraft) -> ApiResult<Equipment> {
        api.create_equipment(draft).await
    }

    async fn update<A: HotelApi>(api: &A, id: Uuid, draft: EquipmentDraft) -> ApiResult<Equipment> {
        api.update_equipment(id, draft).await
    }

    async fn delete<A: HotelApi>(api: &A, id: Uuid, mode: DeleteMode) -> ApiResult<()> {
        api.delete_equipment(id, mode).await
    }
}

pub type EquipmentScreen<A> = CrudScreen<EquipmentCatalogue, A>;

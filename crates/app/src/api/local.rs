//! In-process API over a store

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use hotelier_core::{
    ClientPricing, Convention, ConventionDraft, ConventionQuery, DeleteMode, Equipment,
    EquipmentDraft, EquipmentQuery, Establishment, EstablishmentDraft, EstablishmentQuery,
    EstablishmentSummary, HotelEquipment, HotelEquipmentDraft, HotelEquipmentQuery,
    MaintenanceTask, MaintenanceTaskDraft, Room, RoomCategory, RoomCategoryDraft, RoomDraft,
    RoomQuery, RoomStatistics, RoomStatus, Storage, TaskAction, TaskQuery,
};

use super::{ApiError, ApiResult, HotelApi};

pub struct LocalApi<S> {
    store: Arc<Mutex<S>>,
}

impl<S: Storage> LocalApi<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Run one store call; the lock never outlives it
    fn with<T>(&self, f: impl FnOnce(&S) -> hotelier_core::Result<T>) -> ApiResult<T> {
        let store = self
            .store
            .lock()
            .map_err(|_| ApiError::Unexpected("Store lock poisoned".to_string()))?;
        Ok(f(&*store)?)
    }
}

impl<S: Storage> HotelApi for LocalApi<S> {
    async fn list_establishments(&self, query: EstablishmentQuery) -> ApiResult<Vec<Establishment>> {
        self.with(|s| s.list_establishments(&query))
    }

    async fn create_establishment(&self, draft: EstablishmentDraft) -> ApiResult<Establishment> {
        self.with(|s| s.create_establishment(draft))
    }

    async fn update_establishment(
        &self,
        id: Uuid,
        draft: EstablishmentDraft,
    ) -> ApiResult<Establishment> {
        self.with(|s| s.update_establishment(id, draft))
    }

    async fn delete_establishment(&self, id: Uuid, mode: DeleteMode) -> ApiResult<()> {
        self.with(|s| s.delete_establishment(id, mode))
    }

    async fn toggle_establishment_status(&self, id: Uuid) -> ApiResult<Establishment> {
        self.with(|s| s.toggle_establishment_status(id))
    }

    async fn establishment_summary(&self) -> ApiResult<EstablishmentSummary> {
        self.with(|s| s.establishment_summary())
    }

    async fn list_rooms(&self, query: RoomQuery) -> ApiResult<Vec<Room>> {
        self.with(|s| s.list_rooms(&query))
    }

    async fn create_room(&self, draft: RoomDraft) -> ApiResult<Room> {
        self.with(|s| s.create_room(draft))
    }

    async fn update_room(&self, id: Uuid, draft: RoomDraft) -> ApiResult<Room> {
        self.with(|s| s.update_room(id, draft))
    }

    async fn delete_room(&self, id: Uuid) -> ApiResult<()> {
        self.with(|s| s.delete_room(id))
    }

    async fn set_room_status(&self, id: Uuid, status: RoomStatus) -> ApiResult<Room> {
        self.with(|s| s.set_room_status(id, status))
    }

    async fn room_statistics(&self, establishment_id: Uuid) -> ApiResult<RoomStatistics> {
        self.with(|s| s.room_statistics(establishment_id))
    }

    async fn list_categories(&self) -> ApiResult<Vec<RoomCategory>> {
        self.with(|s| s.list_categories())
    }

    async fn create_category(&self, draft: RoomCategoryDraft) -> ApiResult<RoomCategory> {
        self.with(|s| s.create_category(draft))
    }

    async fn update_category(&self, id: Uuid, draft: RoomCategoryDraft) -> ApiResult<RoomCategory> {
        self.with(|s| s.update_category(id, draft))
    }

    async fn delete_category(&self, id: Uuid) -> ApiResult<()> {
        self.with(|s| s.delete_category(id))
    }

    async fn list_equipment(&self, query: EquipmentQuery) -> ApiResult<Vec<Equipment>> {
        self.with(|s| s.list_equipment(&query))
    }

    async fn create_equipment(&self, draft: EquipmentDraft) -> ApiResult<Equipment> {
        self.with(|s| s.create_equipment(draft))
    }

    async fn update_equipment(&self, id: Uuid, draft: EquipmentDraft) -> ApiResult<Equipment> {
        self.with(|s| s.update_equipment(id, draft))
    }

    async fn delete_equipment(&self, id: Uuid, mode: DeleteMode) -> ApiResult<()> {
        self.with(|s| s.delete_equipment(id, mode))
    }

    async fn list_hotel_equipment(
        &self,
        query: HotelEquipmentQuery,
    ) -> ApiResult<Vec<HotelEquipment>> {
        self.with(|s| s.list_hotel_equipment(&query))
    }

    async fn create_hotel_equipment(
        &self,
        draft: HotelEquipmentDraft,
    ) -> ApiResult<HotelEquipment> {
        self.with(|s| s.create_hotel_equipment(draft))
    }

    async fn update_hotel_equipment(
        &self,
        id: Uuid,
        draft: HotelEquipmentDraft,
    ) -> ApiResult<HotelEquipment> {
        self.with(|s| s.update_hotel_equipment(id, draft))
    }

    async fn delete_hotel_equipment(&self, id: Uuid, mode: DeleteMode) -> ApiResult<()> {
        self.with(|s| s.delete_hotel_equipment(id, mode))
    }

    async fn list_tasks(&self, query: TaskQuery) -> ApiResult<Vec<MaintenanceTask>> {
        self.with(|s| s.list_tasks(&query))
    }

    async fn create_task(&self, draft: MaintenanceTaskDraft) -> ApiResult<MaintenanceTask> {
        self.with(|s| s.create_task(draft))
    }

    async fn update_task(
        &self,
        id: Uuid,
        draft: MaintenanceTaskDraft,
    ) -> ApiResult<MaintenanceTask> {
        self.with(|s| s.update_task(id, draft))
    }

    async fn apply_task_action(&self, id: Uuid, action: TaskAction) -> ApiResult<MaintenanceTask> {
        self.with(|s| s.apply_task_action(id, action))
    }

    async fn delete_task(&self, id: Uuid) -> ApiResult<()> {
        self.with(|s| s.delete_task(id))
    }

    async fn list_conventions(&self, query: ConventionQuery) -> ApiResult<Vec<Convention>> {
        self.with(|s| s.list_conventions(&query))
    }

    async fn create_convention(&self, draft: ConventionDraft) -> ApiResult<Convention> {
        self.with(|s| s.create_convention(draft))
    }

    async fn update_convention(&self, id: Uuid, draft: ConventionDraft) -> ApiResult<Convention> {
        self.with(|s| s.update_convention(id, draft))
    }

    async fn set_convention_active(&self, id: Uuid, active: bool) -> ApiResult<Convention> {
        self.with(|s| s.set_convention_active(id, active))
    }

    async fn delete_convention(&self, id: Uuid) -> ApiResult<()> {
        self.with(|s| s.delete_convention(id))
    }

    async fn save_client_pricing(&self, pricing: ClientPricing) -> ApiResult<Vec<Convention>> {
        self.with(|s| s.save_client_pricing(pricing))
    }
}

//! API over a store server connection

use std::net::SocketAddr;

use uuid::Uuid;

use hotelier_core::{
    ClientPricing, Convention, ConventionDraft, ConventionQuery, DeleteMode, Equipment,
    EquipmentDraft, EquipmentQuery, Establishment, EstablishmentDraft, EstablishmentQuery,
    EstablishmentSummary, HotelEquipment, HotelEquipmentDraft, HotelEquipmentQuery,
    MaintenanceTask, MaintenanceTaskDraft, Room, RoomCategory, RoomCategoryDraft, RoomDraft,
    RoomQuery, RoomStatistics, RoomStatus, TaskAction, TaskQuery,
};
use hotelier_net::Client;

use super::{ApiResult, HotelApi};

pub struct RemoteApi {
    client: Client,
}

impl RemoteApi {
    pub async fn connect(addr: SocketAddr) -> ApiResult<Self> {
        let client = Client::connect(addr).await?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl HotelApi for RemoteApi {
    async fn list_establishments(&self, query: EstablishmentQuery) -> ApiResult<Vec<Establishment>> {
        Ok(self.client.list_establishments(query).await?)
    }

    async fn create_establishment(&self, draft: EstablishmentDraft) -> ApiResult<Establishment> {
        Ok(self.client.create_establishment(draft).await?)
    }

    async fn update_establishment(
        &self,
        id: Uuid,
        draft: EstablishmentDraft,
    ) -> ApiResult<Establishment> {
        Ok(self.client.update_establishment(id, draft).await?)
    }

    async fn delete_establishment(&self, id: Uuid, mode: DeleteMode) -> ApiResult<()> {
        Ok(self.client.delete_establishment(id, mode).await?)
    }

    async fn toggle_establishment_status(&self, id: Uuid) -> ApiResult<Establishment> {
        Ok(self.client.toggle_establishment_status(id).await?)
    }

    async fn establishment_summary(&self) -> ApiResult<EstablishmentSummary> {
        Ok(self.client.establishment_summary().await?)
    }

    async fn list_rooms(&self, query: RoomQuery) -> ApiResult<Vec<Room>> {
        Ok(self.client.list_rooms(query).await?)
    }

    async fn create_room(&self, draft: RoomDraft) -> ApiResult<Room> {
        Ok(self.client.create_room(draft).await?)
    }

    async fn update_room(&self, id: Uuid, draft: RoomDraft) -> ApiResult<Room> {
        Ok(self.client.update_room(id, draft).await?)
    }

    async fn delete_room(&self, id: Uuid) -> ApiResult<()> {
        Ok(self.client.delete_room(id).await?)
    }

    async fn set_room_status(&self, id: Uuid, status: RoomStatus) -> ApiResult<Room> {
        Ok(self.client.set_room_status(id, status).await?)
    }

    async fn room_statistics(&self, establishment_id: Uuid) -> ApiResult<RoomStatistics> {
        Ok(self.client.room_statistics(establishment_id).await?)
    }

    async fn list_categories(&self) -> ApiResult<Vec<RoomCategory>> {
        Ok(self.client.list_categories().await?)
    }

    async fn create_category(&self, draft: RoomCategoryDraft) -> ApiResult<RoomCategory> {
        Ok(self.client.create_category(draft).await?)
    }

    async fn update_category(&self, id: Uuid, draft: RoomCategoryDraft) -> ApiResult<RoomCategory> {
        Ok(self.client.update_category(id, draft).await?)
    }

    async fn delete_category(&self, id: Uuid) -> ApiResult<()> {
        Ok(self.client.delete_category(id).await?)
    }

    async fn list_equipment(&self, query: EquipmentQuery) -> ApiResult<Vec<Equipment>> {
        Ok(self.client.list_equipment(query).await?)
    }

    async fn create_equipment(&self, draft: EquipmentDraft) -> ApiResult<Equipment> {
        Ok(self.client.create_equipment(draft).await?)
    }

    async fn update_equipment(&self, id: Uuid, draft: EquipmentDraft) -> ApiResult<Equipment> {
        Ok(self.client.update_equipment(id, draft).await?)
    }

    async fn delete_equipment(&self, id: Uuid, mode: DeleteMode) -> ApiResult<()> {
        Ok(self.client.delete_equipment(id, mode).await?)
    }

    async fn list_hotel_equipment(
        &self,
        query: HotelEquipmentQuery,
    ) -> ApiResult<Vec<HotelEquipment>> {
        Ok(self.client.list_hotel_equipment(query).await?)
    }

    async fn create_hotel_equipment(
        &self,
        draft: HotelEquipmentDraft,
    ) -> ApiResult<HotelEquipment> {
        Ok(self.client.create_hotel_equipment(draft).await?)
    }

    async fn update_hotel_equipment(
        &self,
        id: Uuid,
        draft: HotelEquipmentDraft,
    ) -> ApiResult<HotelEquipment> {
        Ok(self.client.update_hotel_equipment(id, draft).await?)
    }

    async fn delete_hotel_equipment(&self, id: Uuid, mode: DeleteMode) -> ApiResult<()> {
        Ok(self.client.delete_hotel_equipment(id, mode).await?)
    }

    async fn list_tasks(&self, query: TaskQuery) -> ApiResult<Vec<MaintenanceTask>> {
        Ok(self.client.list_tasks(query).await?)
    }

    async fn create_task(&self, draft: MaintenanceTaskDraft) -> ApiResult<MaintenanceTask> {
        Ok(self.client.create_task(draft).await?)
    }

    async fn update_task(
        &self,
        id: Uuid,
        draft: MaintenanceTaskDraft,
    ) -> ApiResult<MaintenanceTask> {
        Ok(self.client.update_task(id, draft).await?)
    }

    async fn apply_task_action(&self, id: Uuid, action: TaskAction) -> ApiResult<MaintenanceTask> {
        Ok(self.client.apply_task_action(id, action).await?)
    }

    async fn delete_task(&self, id: Uuid) -> ApiResult<()> {
        Ok(self.client.delete_task(id).await?)
    }

    async fn list_conventions(&self, query: ConventionQuery) -> ApiResult<Vec<Convention>> {
        Ok(self.client.list_conventions(query).await?)
    }

    async fn create_convention(&self, draft: ConventionDraft) -> ApiResult<Convention> {
        Ok(self.client.create_convention(draft).await?)
    }

    async fn update_convention(&self, id: Uuid, draft: ConventionDraft) -> ApiResult<Convention> {
        Ok(self.client.update_convention(id, draft).await?)
    }

    async fn set_convention_active(&self, id: Uuid, active: bool) -> ApiResult<Convention> {
        Ok(self.client.set_convention_active(id, active).await?)
    }

    async fn delete_convention(&self, id: Uuid) -> ApiResult<()> {
        Ok(self.client.delete_convention(id).await?)
    }

    async fn save_client_pricing(&self, pricing: ClientPricing) -> ApiResult<Vec<Convention>> {
        Ok(self.client.save_client_pricing(pricing).await?)
    }
}

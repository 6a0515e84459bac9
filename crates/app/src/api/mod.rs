//! Data store access as seen by the screens
//!
//! Screens only know [`HotelApi`]. [`LocalApi`] runs calls against an
//! in-process store; [`RemoteApi`] forwards them to a store server.

mod local;
mod remote;

pub use local::LocalApi;
pub use remote::RemoteApi;

use uuid::Uuid;

use hotelier_core::{
    ClientPricing, Convention, ConventionDraft, ConventionQuery, DeleteMode, Equipment,
    EquipmentDraft, EquipmentQuery, Establishment, EstablishmentDraft, EstablishmentQuery,
    EstablishmentSummary, FieldErrors, HotelEquipment, HotelEquipmentDraft, HotelEquipmentQuery,
    MaintenanceTask, MaintenanceTaskDraft, Room, RoomCategory, RoomCategoryDraft, RoomDraft,
    RoomQuery, RoomStatistics, RoomStatus, TaskAction, TaskQuery,
};

/// Failure of an API call
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The store refused the request and said why
    #[error("{message}")]
    Rejected { message: String, fields: FieldErrors },

    /// Transport or store failure
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    /// Message to show the user, `fallback` when the store gave none
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn fields(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Rejected { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }
}

impl From<hotelier_core::Error> for ApiError {
    fn from(err: hotelier_core::Error) -> Self {
        if !err.is_rejection() {
            return ApiError::Unexpected(err.to_string());
        }
        let fields = match &err {
            hotelier_core::Error::Validation(fields) => fields.clone(),
            _ => FieldErrors::new(),
        };
        ApiError::Rejected {
            message: err.to_string(),
            fields,
        }
    }
}

impl From<hotelier_net::Error> for ApiError {
    fn from(err: hotelier_net::Error) -> Self {
        match err {
            hotelier_net::Error::Remote { message, fields } => {
                ApiError::Rejected { message, fields }
            }
            other => ApiError::Unexpected(other.to_string()),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Back-office operations over the data store
#[allow(async_fn_in_trait)]
pub trait HotelApi {
    async fn list_establishments(&self, query: EstablishmentQuery) -> ApiResult<Vec<Establishment>>;
    async fn create_establishment(&self, draft: EstablishmentDraft) -> ApiResult<Establishment>;
    async fn update_establishment(
        &self,
        id: Uuid,
        draft: EstablishmentDraft,
    ) -> ApiResult<Establishment>;
    async fn delete_establishment(&self, id: Uuid, mode: DeleteMode) -> ApiResult<()>;
    async fn toggle_establishment_status(&self, id: Uuid) -> ApiResult<Establishment>;
    async fn establishment_summary(&self) -> ApiResult<EstablishmentSummary>;

    async fn list_rooms(&self, query: RoomQuery) -> ApiResult<Vec<Room>>;
    async fn create_room(&self, draft: RoomDraft) -> ApiResult<Room>;
    async fn update_room(&self, id: Uuid, draft: RoomDraft) -> ApiResult<Room>;
    async fn delete_room(&self, id: Uuid) -> ApiResult<()>;
    async fn set_room_status(&self, id: Uuid, status: RoomStatus) -> ApiResult<Room>;
    async fn room_statistics(&self, establishment_id: Uuid) -> ApiResult<RoomStatistics>;

    async fn list_categories(&self) -> ApiResult<Vec<RoomCategory>>;
    async fn create_category(&self, draft: RoomCategoryDraft) -> ApiResult<RoomCategory>;
    async fn update_category(&self, id: Uuid, draft: RoomCategoryDraft) -> ApiResult<RoomCategory>;
    async fn delete_category(&self, id: Uuid) -> ApiResult<()>;

    async fn list_equipment(&self, query: EquipmentQuery) -> ApiResult<Vec<Equipment>>;
    async fn create_equipment(&self, draft: EquipmentDraft) -> ApiResult<Equipment>;
    async fn update_equipment(&self, id: Uuid, draft: EquipmentDraft) -> ApiResult<Equipment>;
    async fn delete_equipment(&self, id: Uuid, mode: DeleteMode) -> ApiResult<()>;

    async fn list_hotel_equipment(
        &self,
        query: HotelEquipmentQuery,
    ) -> ApiResult<Vec<HotelEquipment>>;
    async fn create_hotel_equipment(&self, draft: HotelEquipmentDraft)
        -> ApiResult<HotelEquipment>;
    async fn update_hotel_equipment(
        &self,
        id: Uuid,
        draft: HotelEquipmentDraft,
    ) -> ApiResult<HotelEquipment>;
    async fn delete_hotel_equipment(&self, id: Uuid, mode: DeleteMode) -> ApiResult<()>;

    async fn list_tasks(&self, query: TaskQuery) -> ApiResult<Vec<MaintenanceTask>>;
    async fn create_task(&self, draft: MaintenanceTaskDraft) -> ApiResult<MaintenanceTask>;
    async fn update_task(&self, id: Uuid, draft: MaintenanceTaskDraft)
        -> ApiResult<MaintenanceTask>;
    async fn apply_task_action(&self, id: Uuid, action: TaskAction) -> ApiResult<MaintenanceTask>;
    async fn delete_task(&self, id: Uuid) -> ApiResult<()>;

    async fn list_conventions(&self, query: ConventionQuery) -> ApiResult<Vec<Convention>>;
    async fn create_convention(&self, draft: ConventionDraft) -> ApiResult<Convention>;
    async fn update_convention(&self, id: Uuid, draft: ConventionDraft) -> ApiResult<Convention>;
    async fn set_convention_active(&self, id: Uuid, active: bool) -> ApiResult<Convention>;
    async fn delete_convention(&self, id: Uuid) -> ApiResult<()>;
    async fn save_client_pricing(&self, pricing: ClientPricing) -> ApiResult<Vec<Convention>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_split_by_cause() {
        let rejected: ApiError = hotelier_core::Error::NotFound("room 1".to_string()).into();
        assert_eq!(rejected.user_message("fallback"), "Not found: room 1");
        assert!(rejected.fields().is_none());

        let unexpected: ApiError =
            hotelier_core::Error::Io(std::io::Error::other("disk full")).into();
        assert_eq!(unexpected.user_message("Could not save"), "Could not save");
    }

    #[test]
    fn test_remote_rejection_keeps_fields() {
        let mut fields = FieldErrors::new();
        fields.insert("price", "Price must be greater than 0");
        let err: ApiError = hotelier_net::Error::Remote {
            message: "Validation failed".to_string(),
            fields,
        }
        .into();
        assert!(err.fields().is_some_and(|f| f.contains("price")));

        let closed: ApiError = hotelier_net::Error::ConnectionClosed.into();
        assert!(matches!(closed, ApiError::Unexpected(_)));
    }
}

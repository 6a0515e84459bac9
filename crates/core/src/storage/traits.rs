//! Storage repository traits
//!
//! These traits define the back-office operations over the store. Each
//! mutation validates its draft and answers with the entity as persisted.

use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    ClientPricing, Convention, ConventionDraft, Equipment, EquipmentDraft, Establishment,
    EstablishmentDraft, HotelEquipment, HotelEquipmentDraft, MaintenanceTask,
    MaintenanceTaskDraft, Room, RoomCategory, RoomCategoryDraft, RoomDraft, RoomStatus,
    TaskAction,
};
use crate::occupancy::{EstablishmentSummary, RoomStatistics};
use crate::queries::{
    ConventionQuery, DeleteMode, EquipmentQuery, EstablishmentQuery, HotelEquipmentQuery,
    RoomQuery, TaskQuery,
};

/// Establishment repository operations
pub trait EstablishmentRepository {
    fn list_establishments(&self, query: &EstablishmentQuery) -> Result<Vec<Establishment>>;

    fn find_establishment(&self, id: Uuid) -> Result<Option<Establishment>>;

    fn create_establishment(&self, draft: EstablishmentDraft) -> Result<Establishment>;

    /// Replace all editable fields; the occupancy rate is recomputed
    fn update_establishment(&self, id: Uuid, draft: EstablishmentDraft) -> Result<Establishment>;

    /// Soft delete marks the establishment inactive
    fn delete_establishment(&self, id: Uuid, mode: DeleteMode) -> Result<()>;

    /// Flip between active and inactive
    fn toggle_establishment_status(&self, id: Uuid) -> Result<Establishment>;

    fn establishment_summary(&self) -> Result<EstablishmentSummary>;
}

/// Room repository operations
pub trait RoomRepository {
    fn list_rooms(&self, query: &RoomQuery) -> Result<Vec<Room>>;

    fn find_room(&self, id: Uuid) -> Result<Option<Room>>;

    fn create_room(&self, draft: RoomDraft) -> Result<Room>;

    fn update_room(&self, id: Uuid, draft: RoomDraft) -> Result<Room>;

    fn delete_room(&self, id: Uuid) -> Result<()>;

    fn set_room_status(&self, id: Uuid, status: RoomStatus) -> Result<Room>;

    fn room_statistics(&self, establishment_id: Uuid) -> Result<RoomStatistics>;
}

/// Room category repository operations
pub trait CategoryRepository {
    fn list_categories(&self) -> Result<Vec<RoomCategory>>;

    fn create_category(&self, draft: RoomCategoryDraft) -> Result<RoomCategory>;

    fn update_category(&self, id: Uuid, draft: RoomCategoryDraft) -> Result<RoomCategory>;

    fn delete_category(&self, id: Uuid) -> Result<()>;
}

/// Equipment catalogue and per-establishment offers
pub trait EquipmentRepository {
    fn list_equipment(&self, query: &EquipmentQuery) -> Result<Vec<Equipment>>;

    fn create_equipment(&self, draft: EquipmentDraft) -> Result<Equipment>;

    fn update_equipment(&self, id: Uuid, draft: EquipmentDraft) -> Result<Equipment>;

    /// Soft delete deactivates the catalogue entry
    fn delete_equipment(&self, id: Uuid, mode: DeleteMode) -> Result<()>;

    fn list_hotel_equipment(&self, query: &HotelEquipmentQuery) -> Result<Vec<HotelEquipment>>;

    fn create_hotel_equipment(&self, draft: HotelEquipmentDraft) -> Result<HotelEquipment>;

    fn update_hotel_equipment(&self, id: Uuid, draft: HotelEquipmentDraft)
        -> Result<HotelEquipment>;

    /// Soft delete marks the offer unavailable
    fn delete_hotel_equipment(&self, id: Uuid, mode: DeleteMode) -> Result<()>;
}

/// Maintenance task repository operations
pub trait TaskRepository {
    fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<MaintenanceTask>>;

    fn find_task(&self, id: Uuid) -> Result<Option<MaintenanceTask>>;

    fn create_task(&self, draft: MaintenanceTaskDraft) -> Result<MaintenanceTask>;

    fn update_task(&self, id: Uuid, draft: MaintenanceTaskDraft) -> Result<MaintenanceTask>;

    /// Start, complete or cancel without touching other fields
    fn apply_task_action(&self, id: Uuid, action: TaskAction) -> Result<MaintenanceTask>;

    fn delete_task(&self, id: Uuid) -> Result<()>;
}

/// Convention repository operations
pub trait ConventionRepository {
    fn list_conventions(&self, query: &ConventionQuery) -> Result<Vec<Convention>>;

    /// Rejected when it overlaps another convention of the same client and category
    fn create_convention(&self, draft: ConventionDraft) -> Result<Convention>;

    fn update_convention(&self, id: Uuid, draft: ConventionDraft) -> Result<Convention>;

    fn set_convention_active(&self, id: Uuid, active: bool) -> Result<Convention>;

    fn delete_convention(&self, id: Uuid) -> Result<()>;

    /// Create or update one convention per priced category of a client
    fn save_client_pricing(&self, pricing: ClientPricing) -> Result<Vec<Convention>>;
}

/// Combined storage interface
///
/// Provides access to all repository operations.
/// Implementations may be backed by SQLite, mocks, or network.
pub trait Storage:
    EstablishmentRepository
    + RoomRepository
    + CategoryRepository
    + EquipmentRepository
    + TaskRepository
    + ConventionRepository
{
}

// Blanket implementation: any type implementing all traits implements Storage
impl<T> Storage for T where
    T: EstablishmentRepository
        + RoomRepository
        + CategoryRepository
        + EquipmentRepository
        + TaskRepository
        + ConventionRepository
{
}

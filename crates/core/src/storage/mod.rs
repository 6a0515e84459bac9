//! SQLite storage layer for Hotelier

mod categories;
mod clause;
mod conventions;
mod equipment;
mod establishments;
mod migrations;
mod parse;
mod rooms;
mod tasks;
mod traits;

use chrono::Utc;
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::invariants::{
    assert_convention_invariants, assert_establishment_invariants,
    assert_hotel_equipment_invariants, assert_task_invariants,
};
use crate::models::{
    ClientPricing, Convention, ConventionDraft, Equipment, EquipmentDraft, Establishment,
    EstablishmentDraft, EstablishmentStatus, HotelEquipment, HotelEquipmentDraft,
    MaintenanceTask, MaintenanceTaskDraft, Room, RoomCategory, RoomCategoryDraft, RoomDraft,
    RoomStatus, TaskAction,
};
use crate::occupancy::{EstablishmentSummary, RoomStatistics};
use crate::queries::{
    ConventionQuery, DeleteMode, EquipmentQuery, EstablishmentQuery, HotelEquipmentQuery,
    RoomQuery, TaskQuery,
};
use crate::validation::{
    validate_convention, validate_equipment, validate_establishment, validate_hotel_equipment,
    validate_room, validate_room_category, validate_task, FieldErrors,
};

pub use categories::CategoryStore;
pub use conventions::ConventionStore;
pub use equipment::EquipmentStore;
pub use establishments::EstablishmentStore;
pub use rooms::RoomStore;
pub use tasks::TaskStore;
pub use traits::{
    CategoryRepository, ConventionRepository, EquipmentRepository, EstablishmentRepository,
    RoomRepository, Storage, TaskRepository,
};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    pub fn establishments(&self) -> EstablishmentStore<'_> {
        EstablishmentStore::new(&self.conn)
    }

    pub fn rooms(&self) -> RoomStore<'_> {
        RoomStore::new(&self.conn)
    }

    pub fn categories(&self) -> CategoryStore<'_> {
        CategoryStore::new(&self.conn)
    }

    pub fn equipment(&self) -> EquipmentStore<'_> {
        EquipmentStore::new(&self.conn)
    }

    pub fn tasks(&self) -> TaskStore<'_> {
        TaskStore::new(&self.conn)
    }

    pub fn conventions(&self) -> ConventionStore<'_> {
        ConventionStore::new(&self.conn)
    }

    fn require_establishment(&self, id: Uuid) -> Result<Establishment> {
        if id.is_nil() {
            return Err(Error::NotFound("establishment (no id given)".to_string()));
        }
        self.establishments()
            .find_by_id(id)?
            .ok_or_else(|| Error::NotFound(format!("establishment {}", id)))
    }

    fn require_room(&self, id: Uuid) -> Result<Room> {
        if id.is_nil() {
            return Err(Error::NotFound("room (no id given)".to_string()));
        }
        self.rooms()
            .find_by_id(id)?
            .ok_or_else(|| Error::NotFound(format!("room {}", id)))
    }

    fn require_category(&self, id: Uuid) -> Result<RoomCategory> {
        self.categories()
            .find_by_id(id)?
            .ok_or_else(|| Error::NotFound(format!("room category {}", id)))
    }

    fn require_equipment(&self, id: Uuid) -> Result<Equipment> {
        self.equipment()
            .find_by_id(id)?
            .ok_or_else(|| Error::NotFound(format!("equipment {}", id)))
    }

    fn require_offer(&self, id: Uuid) -> Result<HotelEquipment> {
        self.equipment()
            .find_offer(id)?
            .ok_or_else(|| Error::NotFound(format!("hotel equipment {}", id)))
    }

    fn require_task(&self, id: Uuid) -> Result<MaintenanceTask> {
        self.tasks()
            .find_by_id(id)?
            .ok_or_else(|| Error::NotFound(format!("maintenance task {}", id)))
    }

    fn require_convention(&self, id: Uuid) -> Result<Convention> {
        self.conventions()
            .find_by_id(id)?
            .ok_or_else(|| Error::NotFound(format!("convention {}", id)))
    }

    /// Room numbers are unique within an establishment
    fn check_room_number(&self, draft: &RoomDraft, own_id: Option<Uuid>) -> Result<()> {
        let number = draft.number.trim();
        if let Some(existing) = self.rooms().find_by_number(draft.establishment_id, number)? {
            if Some(existing.id) != own_id {
                return Err(Error::InvalidOperation(format!(
                    "Room {} already exists in this establishment",
                    number
                )));
            }
        }
        Ok(())
    }

    fn check_room_refs(&self, draft: &RoomDraft) -> Result<()> {
        self.require_establishment(draft.establishment_id)?;
        if let Some(category_id) = draft.category_id {
            self.require_category(category_id)?;
        }
        Ok(())
    }

    fn check_task_refs(&self, draft: &MaintenanceTaskDraft) -> Result<()> {
        self.require_establishment(draft.establishment_id)?;
        if let Some(room_id) = draft.room_id {
            let room = self.require_room(room_id)?;
            if room.details.establishment_id != draft.establishment_id {
                return Err(Error::InvalidOperation(
                    "The room does not belong to this establishment".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn check_convention(&self, draft: &ConventionDraft, own_id: Option<Uuid>) -> Result<()> {
        self.require_category(draft.category_id)?;
        if let Some(est_id) = draft.establishment_id {
            self.require_establishment(est_id)?;
        }
        let same_pair = ConventionQuery {
            category_id: Some(draft.category_id),
            ..Default::default()
        };
        let clash = self
            .conventions()
            .list(&same_pair)?
            .into_iter()
            .filter(|c| Some(c.id) != own_id)
            .any(|c| c.overlaps(draft));
        if clash {
            return Err(Error::InvalidOperation(format!(
                "A convention for {} already covers this period",
                draft.client_name.trim()
            )));
        }
        Ok(())
    }
}

fn ensure_valid(errors: FieldErrors) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}

impl EstablishmentRepository for Database {
    fn list_establishments(&self, query: &EstablishmentQuery) -> Result<Vec<Establishment>> {
        self.establishments().list(query)
    }

    fn find_establishment(&self, id: Uuid) -> Result<Option<Establishment>> {
        self.establishments().find_by_id(id)
    }

    fn create_establishment(&self, draft: EstablishmentDraft) -> Result<Establishment> {
        ensure_valid(validate_establishment(&draft))?;
        let est = Establishment::new(draft);
        assert_establishment_invariants(&est);
        self.establishments().create(&est)?;
        info!(id = %est.id, name = %est.details.name, "Establishment created");
        Ok(est)
    }

    fn update_establishment(&self, id: Uuid, draft: EstablishmentDraft) -> Result<Establishment> {
        ensure_valid(validate_establishment(&draft))?;
        let mut est = self.require_establishment(id)?;
        est.apply(draft);
        assert_establishment_invariants(&est);
        self.establishments().update(&est)?;
        Ok(est)
    }

    fn delete_establishment(&self, id: Uuid, mode: DeleteMode) -> Result<()> {
        self.require_establishment(id)?;
        match mode {
            DeleteMode::Soft => self
                .establishments()
                .set_status(id, EstablishmentStatus::Inactive)?,
            DeleteMode::Hard => self.establishments().delete(id)?,
        }
        info!(%id, ?mode, "Establishment deleted");
        Ok(())
    }

    fn toggle_establishment_status(&self, id: Uuid) -> Result<Establishment> {
        let mut est = self.require_establishment(id)?;
        est.set_status(est.details.status.toggled());
        self.establishments().set_status(id, est.details.status)?;
        debug!(%id, status = est.details.status.as_str(), "Establishment status toggled");
        Ok(est)
    }

    fn establishment_summary(&self) -> Result<EstablishmentSummary> {
        let all = self.establishments().list(&EstablishmentQuery::default())?;
        Ok(EstablishmentSummary::from_establishments(&all))
    }
}

impl RoomRepository for Database {
    fn list_rooms(&self, query: &RoomQuery) -> Result<Vec<Room>> {
        self.rooms().list(query)
    }

    fn find_room(&self, id: Uuid) -> Result<Option<Room>> {
        self.rooms().find_by_id(id)
    }

    fn create_room(&self, draft: RoomDraft) -> Result<Room> {
        ensure_valid(validate_room(&draft))?;
        self.check_room_refs(&draft)?;
        self.check_room_number(&draft, None)?;
        let room = Room::new(draft);
        self.rooms().create(&room)?;
        info!(id = %room.id, number = %room.details.number, "Room created");
        Ok(room)
    }

    fn update_room(&self, id: Uuid, draft: RoomDraft) -> Result<Room> {
        ensure_valid(validate_room(&draft))?;
        let mut room = self.require_room(id)?;
        self.check_room_refs(&draft)?;
        self.check_room_number(&draft, Some(id))?;
        room.apply(draft);
        self.rooms().update(&room)?;
        Ok(room)
    }

    fn delete_room(&self, id: Uuid) -> Result<()> {
        self.require_room(id)?;
        self.rooms().delete(id)
    }

    fn set_room_status(&self, id: Uuid, status: RoomStatus) -> Result<Room> {
        let mut room = self.require_room(id)?;
        room.set_status(status);
        self.rooms().set_status(id, status)?;
        Ok(room)
    }

    fn room_statistics(&self, establishment_id: Uuid) -> Result<RoomStatistics> {
        self.require_establishment(establishment_id)?;
        let rooms = self
            .rooms()
            .list(&RoomQuery::for_establishment(establishment_id))?;
        Ok(RoomStatistics::from_rooms(&rooms))
    }
}

impl CategoryRepository for Database {
    fn list_categories(&self) -> Result<Vec<RoomCategory>> {
        self.categories().list()
    }

    fn create_category(&self, draft: RoomCategoryDraft) -> Result<RoomCategory> {
        ensure_valid(validate_room_category(&draft))?;
        let category = RoomCategory::new(draft);
        self.categories().create(&category)?;
        Ok(category)
    }

    fn update_category(&self, id: Uuid, draft: RoomCategoryDraft) -> Result<RoomCategory> {
        ensure_valid(validate_room_category(&draft))?;
        let mut category = self.require_category(id)?;
        category.apply(draft);
        self.categories().update(&category)?;
        Ok(category)
    }

    fn delete_category(&self, id: Uuid) -> Result<()> {
        self.require_category(id)?;
        self.categories().delete(id)
    }
}

impl EquipmentRepository for Database {
    fn list_equipment(&self, query: &EquipmentQuery) -> Result<Vec<Equipment>> {
        self.equipment().list(query)
    }

    fn create_equipment(&self, draft: EquipmentDraft) -> Result<Equipment> {
        ensure_valid(validate_equipment(&draft))?;
        let equipment = Equipment::new(draft);
        self.equipment().create(&equipment)?;
        Ok(equipment)
    }

    fn update_equipment(&self, id: Uuid, draft: EquipmentDraft) -> Result<Equipment> {
        ensure_valid(validate_equipment(&draft))?;
        let mut equipment = self.require_equipment(id)?;
        equipment.apply(draft);
        self.equipment().update(&equipment)?;
        Ok(equipment)
    }

    fn delete_equipment(&self, id: Uuid, mode: DeleteMode) -> Result<()> {
        let mut equipment = self.require_equipment(id)?;
        match mode {
            DeleteMode::Soft => {
                equipment.deactivate();
                self.equipment().update(&equipment)
            }
            DeleteMode::Hard => self.equipment().delete(id),
        }
    }

    fn list_hotel_equipment(&self, query: &HotelEquipmentQuery) -> Result<Vec<HotelEquipment>> {
        self.equipment().list_offers(query)
    }

    fn create_hotel_equipment(&self, draft: HotelEquipmentDraft) -> Result<HotelEquipment> {
        ensure_valid(validate_hotel_equipment(&draft))?;
        self.require_establishment(draft.establishment_id)?;
        let equipment = self.require_equipment(draft.equipment_id)?;
        if self
            .equipment()
            .find_offer_for(draft.establishment_id, draft.equipment_id)?
            .is_some()
        {
            return Err(Error::InvalidOperation(format!(
                "{} is already offered by this establishment",
                equipment.details.name
            )));
        }
        let offer = HotelEquipment::new(draft);
        assert_hotel_equipment_invariants(&offer);
        self.equipment().create_offer(&offer)?;
        Ok(offer)
    }

    fn update_hotel_equipment(
        &self,
        id: Uuid,
        draft: HotelEquipmentDraft,
    ) -> Result<HotelEquipment> {
        ensure_valid(validate_hotel_equipment(&draft))?;
        let mut offer = self.require_offer(id)?;
        if draft.establishment_id != offer.details.establishment_id
            || draft.equipment_id != offer.details.equipment_id
        {
            return Err(Error::InvalidOperation(
                "An offer cannot be moved to another establishment or equipment".to_string(),
            ));
        }
        offer.apply(draft);
        assert_hotel_equipment_invariants(&offer);
        self.equipment().update_offer(&offer)?;
        Ok(offer)
    }

    fn delete_hotel_equipment(&self, id: Uuid, mode: DeleteMode) -> Result<()> {
        let mut offer = self.require_offer(id)?;
        match mode {
            DeleteMode::Soft => {
                offer.set_available(false);
                self.equipment().update_offer(&offer)
            }
            DeleteMode::Hard => self.equipment().delete_offer(id),
        }
    }
}

impl TaskRepository for Database {
    fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<MaintenanceTask>> {
        self.tasks().list(query)
    }

    fn find_task(&self, id: Uuid) -> Result<Option<MaintenanceTask>> {
        self.tasks().find_by_id(id)
    }

    fn create_task(&self, draft: MaintenanceTaskDraft) -> Result<MaintenanceTask> {
        ensure_valid(validate_task(&draft, None, Utc::now().date_naive()))?;
        self.check_task_refs(&draft)?;
        let task = MaintenanceTask::new(draft);
        self.tasks().create(&task)?;
        info!(id = %task.id, title = %task.details.title, "Maintenance task created");
        Ok(task)
    }

    fn update_task(&self, id: Uuid, draft: MaintenanceTaskDraft) -> Result<MaintenanceTask> {
        let mut task = self.require_task(id)?;
        ensure_valid(validate_task(&draft, Some(&task), Utc::now().date_naive()))?;
        self.check_task_refs(&draft)?;
        task.apply(draft);
        assert_task_invariants(&task);
        self.tasks().update(&task)?;
        Ok(task)
    }

    fn apply_task_action(&self, id: Uuid, action: TaskAction) -> Result<MaintenanceTask> {
        let mut task = self.require_task(id)?;
        task.set_status(action.target_status());
        assert_task_invariants(&task);
        self.tasks().update(&task)?;
        debug!(%id, ?action, "Task action applied");
        Ok(task)
    }

    fn delete_task(&self, id: Uuid) -> Result<()> {
        self.require_task(id)?;
        self.tasks().delete(id)
    }
}

impl ConventionRepository for Database {
    fn list_conventions(&self, query: &ConventionQuery) -> Result<Vec<Convention>> {
        self.conventions().list(query)
    }

    fn create_convention(&self, draft: ConventionDraft) -> Result<Convention> {
        ensure_valid(validate_convention(&draft))?;
        self.check_convention(&draft, None)?;
        let convention = Convention::new(draft);
        assert_convention_invariants(&convention);
        self.conventions().create(&convention)?;
        Ok(convention)
    }

    fn update_convention(&self, id: Uuid, draft: ConventionDraft) -> Result<Convention> {
        ensure_valid(validate_convention(&draft))?;
        let mut convention = self.require_convention(id)?;
        self.check_convention(&draft, Some(id))?;
        convention.apply(draft);
        self.conventions().update(&convention)?;
        Ok(convention)
    }

    fn set_convention_active(&self, id: Uuid, active: bool) -> Result<Convention> {
        let mut convention = self.require_convention(id)?;
        convention.set_active(active);
        self.conventions().update(&convention)?;
        Ok(convention)
    }

    fn delete_convention(&self, id: Uuid) -> Result<()> {
        self.require_convention(id)?;
        self.conventions().delete(id)
    }

    fn save_client_pricing(&self, pricing: ClientPricing) -> Result<Vec<Convention>> {
        let drafts = pricing.drafts();
        if drafts.is_empty() {
            let mut errors = FieldErrors::new();
            errors.insert("default_price", "At least one category needs a price");
            return Err(Error::Validation(errors));
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut saved = Vec::with_capacity(drafts.len());
        for draft in drafts {
            ensure_valid(validate_convention(&draft))?;
            let existing = self
                .conventions()
                .list(&ConventionQuery {
                    category_id: Some(draft.category_id),
                    ..Default::default()
                })?
                .into_iter()
                .find(|c| c.overlaps(&draft));
            let convention = match existing {
                Some(mut convention) => {
                    convention.apply(draft);
                    self.conventions().update(&convention)?;
                    convention
                }
                None => {
                    self.require_category(draft.category_id)?;
                    let convention = Convention::new(draft);
                    self.conventions().create(&convention)?;
                    convention
                }
            };
            saved.push(convention);
        }
        tx.commit()?;

        info!(client = %pricing.client_name, count = saved.len(), "Client pricing saved");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryPricing, EquipmentCategory, Month, MonthlyPrices, RoomType};
    use chrono::{Duration, NaiveDate};
    use tempfile::tempdir;

    fn paris() -> EstablishmentDraft {
        let mut draft = EstablishmentDraft::new("Hôtel du Parc", "12 avenue Foch", "75008", "Paris");
        draft.total_rooms = 10;
        draft.occupied_rooms = 4;
        draft
    }

    #[test]
    fn test_open_on_disk_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hotelier.db");
        let id = {
            let db = Database::open(&path).unwrap();
            db.create_establishment(paris()).unwrap().id
        };

        let db = Database::open(&path).unwrap();
        assert_eq!(db.schema_version(), migrations::latest_version());
        assert!(db.find_establishment(id).unwrap().is_some());
    }

    #[test]
    fn test_create_without_siret_succeeds() {
        let db = Database::open_in_memory().unwrap();
        let est = db.create_establishment(paris()).unwrap();
        assert!(est.details.siret.is_none());
        assert_eq!(est.stored_occupancy_rate, 40);
    }

    #[test]
    fn test_invalid_establishment_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let mut draft = paris();
        draft.occupied_rooms = 11;
        let err = db.create_establishment(draft).unwrap_err();
        match err {
            Error::Validation(errors) => assert!(errors.contains("occupied_rooms")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(db
            .list_establishments(&EstablishmentQuery::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_soft_and_hard_delete() {
        let db = Database::open_in_memory().unwrap();
        let est = db.create_establishment(paris()).unwrap();

        db.delete_establishment(est.id, DeleteMode::Soft).unwrap();
        let found = db.find_establishment(est.id).unwrap().unwrap();
        assert_eq!(found.details.status, EstablishmentStatus::Inactive);

        db.delete_establishment(est.id, DeleteMode::Hard).unwrap();
        assert!(db.find_establishment(est.id).unwrap().is_none());
        assert!(matches!(
            db.delete_establishment(est.id, DeleteMode::Hard),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_toggle_status_twice() {
        let db = Database::open_in_memory().unwrap();
        let est = db.create_establishment(paris()).unwrap();
        assert!(!db.toggle_establishment_status(est.id).unwrap().is_active());
        assert!(db.toggle_establishment_status(est.id).unwrap().is_active());
    }

    #[test]
    fn test_duplicate_room_number() {
        let db = Database::open_in_memory().unwrap();
        let est = db.create_establishment(paris()).unwrap();
        let first = db
            .create_room(RoomDraft::new(est.id, "101", RoomType::Double))
            .unwrap();
        let err = db
            .create_room(RoomDraft::new(est.id, " 101 ", RoomType::Simple))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOperation(_)));

        // Saving a room under its own number is fine
        db.update_room(first.id, first.details.clone()).unwrap();
    }

    #[test]
    fn test_room_needs_existing_establishment() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .create_room(RoomDraft::new(Uuid::new_v4(), "1", RoomType::Simple))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_room_statistics_and_status() {
        let db = Database::open_in_memory().unwrap();
        let est = db.create_establishment(paris()).unwrap();
        let a = db
            .create_room(RoomDraft::new(est.id, "1", RoomType::Simple))
            .unwrap();
        db.create_room(RoomDraft::new(est.id, "2", RoomType::Suite))
            .unwrap();
        db.set_room_status(a.id, RoomStatus::Occupied).unwrap();

        let stats = db.room_statistics(est.id).unwrap();
        assert_eq!(stats.total_rooms, 2);
        assert_eq!(stats.occupancy_rate, 50);
        assert_eq!(stats.potential_revenue, 120.0);
    }

    #[test]
    fn test_equipment_soft_delete_deactivates() {
        let db = Database::open_in_memory().unwrap();
        let est = db.create_establishment(paris()).unwrap();
        let wifi = db
            .create_equipment(EquipmentDraft::new("Wifi", EquipmentCategory::Connectivity))
            .unwrap();
        let offer = db
            .create_hotel_equipment(HotelEquipmentDraft::new(est.id, wifi.id))
            .unwrap();

        let duplicate = db.create_hotel_equipment(HotelEquipmentDraft::new(est.id, wifi.id));
        assert!(matches!(duplicate, Err(Error::InvalidOperation(_))));

        db.delete_hotel_equipment(offer.id, DeleteMode::Soft).unwrap();
        let offers = db
            .list_hotel_equipment(&HotelEquipmentQuery::default())
            .unwrap();
        assert!(!offers[0].details.is_available);

        db.delete_equipment(wifi.id, DeleteMode::Soft).unwrap();
        let listed = db.list_equipment(&EquipmentQuery::default()).unwrap();
        assert!(!listed[0].details.is_active);

        db.delete_equipment(wifi.id, DeleteMode::Hard).unwrap();
        assert!(db
            .list_hotel_equipment(&HotelEquipmentQuery::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_paid_offer_without_surcharge_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let est = db.create_establishment(paris()).unwrap();
        let spa = db
            .create_equipment(EquipmentDraft::new("Spa", EquipmentCategory::Wellness))
            .unwrap();
        let mut draft = HotelEquipmentDraft::new(est.id, spa.id);
        draft.is_free = false;
        assert!(matches!(
            db.create_hotel_equipment(draft),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_task_lifecycle() {
        let db = Database::open_in_memory().unwrap();
        let est = db.create_establishment(paris()).unwrap();
        let room = db
            .create_room(RoomDraft::new(est.id, "3", RoomType::Twin))
            .unwrap();
        let mut draft = MaintenanceTaskDraft::new(est.id, "Fix shower");
        draft.room_id = Some(room.id);
        draft.due_date = Some(Utc::now().date_naive() + Duration::days(3));
        let task = db.create_task(draft).unwrap();

        let started = db.apply_task_action(task.id, TaskAction::Start).unwrap();
        assert_eq!(started.details.status, crate::models::TaskStatus::InProgress);
        let done = db.apply_task_action(task.id, TaskAction::Complete).unwrap();
        assert!(done.completed_at.is_some());

        let stored = db.find_task(task.id).unwrap().unwrap();
        assert_eq!(stored.completed_at, done.completed_at);

        db.delete_task(task.id).unwrap();
        assert!(db.find_task(task.id).unwrap().is_none());
    }

    #[test]
    fn test_task_status_edit_tracks_completion() {
        let db = Database::open_in_memory().unwrap();
        let est = db.create_establishment(paris()).unwrap();
        let task = db
            .create_task(MaintenanceTaskDraft::new(est.id, "Replace bulb"))
            .unwrap();

        let mut edit = task.details.clone();
        edit.status = crate::models::TaskStatus::Done;
        let done = db.update_task(task.id, edit.clone()).unwrap();
        assert!(done.completed_at.is_some());
        assert_eq!(
            db.find_task(task.id).unwrap().unwrap().completed_at,
            done.completed_at
        );

        edit.status = crate::models::TaskStatus::Pending;
        let reopened = db.update_task(task.id, edit).unwrap();
        assert!(reopened.completed_at.is_none());

        // A reopened task can be completed again
        let completed = db.apply_task_action(task.id, TaskAction::Complete).unwrap();
        assert!(completed.completed_at.is_some());
    }

    #[test]
    fn test_nil_ids_are_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.create_room(RoomDraft::new(Uuid::nil(), "1", RoomType::Double)),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            db.create_task(MaintenanceTaskDraft::new(Uuid::nil(), "Fix lock")),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            db.room_statistics(Uuid::nil()),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            db.toggle_establishment_status(Uuid::nil()),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            db.set_room_status(Uuid::nil(), RoomStatus::Occupied),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_task_edit_keeps_past_due_date() {
        let db = Database::open_in_memory().unwrap();
        let est = db.create_establishment(paris()).unwrap();
        let task = db
            .create_task(MaintenanceTaskDraft::new(est.id, "Check boiler"))
            .unwrap();

        // Simulate a task whose due date has passed since creation
        let past = Utc::now().date_naive() - Duration::days(5);
        let mut stored = task.clone();
        stored.details.due_date = Some(past);
        db.tasks().update(&stored).unwrap();

        let mut edit = stored.details.clone();
        edit.notes = Some("Parts ordered".to_string());
        let updated = db.update_task(task.id, edit.clone()).unwrap();
        assert_eq!(updated.details.due_date, Some(past));

        edit.due_date = Some(past - Duration::days(1));
        assert!(matches!(
            db.update_task(task.id, edit),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_task_room_must_match_establishment() {
        let db = Database::open_in_memory().unwrap();
        let a = db.create_establishment(paris()).unwrap();
        let b = db.create_establishment(paris()).unwrap();
        let room = db
            .create_room(RoomDraft::new(b.id, "1", RoomType::Simple))
            .unwrap();
        let mut draft = MaintenanceTaskDraft::new(a.id, "Paint door");
        draft.room_id = Some(room.id);
        assert!(matches!(
            db.create_task(draft),
            Err(Error::InvalidOperation(_))
        ));
    }

    fn convention_draft(category_id: Uuid, start: NaiveDate) -> ConventionDraft {
        ConventionDraft {
            client_name: "Samu Social".to_string(),
            category_id,
            establishment_id: None,
            starts_on: start,
            ends_on: None,
            default_price: 50.0,
            monthly_prices: MonthlyPrices::new(),
            discount_percent: None,
            monthly_flat_rate: None,
            conditions: None,
            active: true,
        }
    }

    #[test]
    fn test_overlapping_convention_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let category = db
            .create_category(RoomCategoryDraft::new("Double", 2))
            .unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let first = db
            .create_convention(convention_draft(category.id, start))
            .unwrap();

        let err = db
            .create_convention(convention_draft(category.id, start + Duration::days(30)))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOperation(_)));

        // Updating the convention itself is not a clash
        let mut edit = first.details.clone();
        edit.default_price = 60.0;
        assert_eq!(db.update_convention(first.id, edit).unwrap().details.default_price, 60.0);

        assert!(!db.set_convention_active(first.id, false).unwrap().details.active);
    }

    #[test]
    fn test_save_client_pricing_upserts() {
        let db = Database::open_in_memory().unwrap();
        let single = db.create_category(RoomCategoryDraft::new("Single", 1)).unwrap();
        let family = db.create_category(RoomCategoryDraft::new("Family", 4)).unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        let mut july = MonthlyPrices::new();
        july.insert(Month::July, 70.0);
        let pricing = ClientPricing {
            client_name: "Samu Social".to_string(),
            establishment_id: None,
            starts_on: start,
            ends_on: None,
            pricing: vec![
                CategoryPricing {
                    category_id: single.id,
                    category_name: "Single".to_string(),
                    default_price: 45.0,
                    monthly_prices: july,
                    conditions: None,
                },
                CategoryPricing {
                    category_id: family.id,
                    category_name: "Family".to_string(),
                    default_price: 0.0,
                    monthly_prices: MonthlyPrices::new(),
                    conditions: None,
                },
            ],
        };

        let saved = db.save_client_pricing(pricing.clone()).unwrap();
        assert_eq!(saved.len(), 1);

        let mut raised = pricing;
        raised.pricing[0].default_price = 48.0;
        let again = db.save_client_pricing(raised).unwrap();
        assert_eq!(again[0].id, saved[0].id);

        let all = db.list_conventions(&ConventionQuery::default()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].details.default_price, 48.0);
        assert_eq!(all[0].applicable_price(NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()), Some(70.0));
    }
}

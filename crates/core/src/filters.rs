//! List filtering
//!
//! Every list screen narrows its rows the same way: a case-insensitive
//! free-text search over a fixed set of fields, then categorical filters
//! that either admit everything ([`Choice::All`]) or require an exact match.

use serde::{Deserialize, Serialize};

use crate::models::{
    Convention, Equipment, EquipmentCategory, Establishment, EstablishmentStatus,
    EstablishmentType, HotelEquipment, MaintenanceTask, Room, RoomCategory, RoomStatus, RoomType,
    TaskPriority, TaskStatus,
};

/// Categorical filter value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(expected) => expected == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }
}

impl<T> From<Option<T>> for Choice<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Choice::All, Choice::Only)
    }
}

/// Fields covered by the free-text search
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

/// True when `needle` is blank or found in one of the item's search fields
pub fn matches_search<T: Searchable + ?Sized>(item: &T, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// "N results found", pluralized when there is more than one result
pub fn results_summary(count: usize, singular: &str, plural: &str) -> String {
    let noun = if count > 1 { plural } else { singular };
    format!("{} {} found", count, noun)
}

pub trait ListFilter<T: Searchable> {
    fn search(&self) -> &str;

    /// Categorical part of the filter
    fn admits(&self, item: &T) -> bool;

    /// Whether any criterion narrows the list
    fn is_narrowing(&self) -> bool;

    fn matches(&self, item: &T) -> bool {
        matches_search(item, self.search()) && self.admits(item)
    }

    fn apply<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(item)).collect()
    }

    /// Summary line for a filtered list, quoting the search term when set
    fn summary(&self, count: usize, singular: &str, plural: &str) -> String {
        let mut line = results_summary(count, singular, plural);
        let term = self.search().trim();
        if !term.is_empty() {
            line.push_str(&format!(" for \"{}\"", term));
        }
        line
    }
}

fn push_opt<'a>(fields: &mut Vec<&'a str>, value: &'a Option<String>) {
    if let Some(value) = value.as_deref() {
        fields.push(value);
    }
}

impl Searchable for Establishment {
    fn search_fields(&self) -> Vec<&str> {
        let d = &self.details;
        let mut fields = vec![d.name.as_str(), d.city.as_str(), d.address.as_str()];
        push_opt(&mut fields, &d.manager);
        fields
    }
}

impl Searchable for Room {
    fn search_fields(&self) -> Vec<&str> {
        let d = &self.details;
        let mut fields = vec![d.number.as_str(), d.kind.as_str()];
        push_opt(&mut fields, &d.description);
        fields
    }
}

impl Searchable for Equipment {
    fn search_fields(&self) -> Vec<&str> {
        let d = &self.details;
        let mut fields = vec![d.name.as_str()];
        push_opt(&mut fields, &d.description);
        fields.push(d.category.as_str());
        fields
    }
}

impl Searchable for MaintenanceTask {
    fn search_fields(&self) -> Vec<&str> {
        let d = &self.details;
        let mut fields = vec![d.title.as_str()];
        push_opt(&mut fields, &d.description);
        push_opt(&mut fields, &d.assignee);
        fields
    }
}

impl Searchable for RoomCategory {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.details.name.as_str()];
        push_opt(&mut fields, &self.details.description);
        fields
    }
}

impl Searchable for HotelEquipment {
    fn search_fields(&self) -> Vec<&str> {
        let d = &self.details;
        let mut fields = Vec::new();
        push_opt(&mut fields, &d.specific_description);
        push_opt(&mut fields, &d.usage_conditions);
        fields
    }
}

impl Searchable for Convention {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.details.client_name.as_str()];
        push_opt(&mut fields, &self.details.conditions);
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstablishmentFilter {
    pub search: String,
    pub status: Choice<EstablishmentStatus>,
    pub kind: Choice<EstablishmentType>,
    /// Matched ignoring case
    pub city: Choice<String>,
}

impl ListFilter<Establishment> for EstablishmentFilter {
    fn search(&self) -> &str {
        &self.search
    }

    fn admits(&self, item: &Establishment) -> bool {
        let city_ok = match &self.city {
            Choice::All => true,
            Choice::Only(city) => item.details.city.eq_ignore_ascii_case(city.trim()),
        };
        self.status.admits(&item.details.status) && self.kind.admits(&item.details.kind) && city_ok
    }

    fn is_narrowing(&self) -> bool {
        !self.search.trim().is_empty()
            || !self.status.is_all()
            || !self.kind.is_all()
            || !self.city.is_all()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFilter {
    pub search: String,
    pub status: Choice<RoomStatus>,
    pub kind: Choice<RoomType>,
}

impl ListFilter<Room> for RoomFilter {
    fn search(&self) -> &str {
        &self.search
    }

    fn admits(&self, item: &Room) -> bool {
        self.status.admits(&item.details.status) && self.kind.admits(&item.details.kind)
    }

    fn is_narrowing(&self) -> bool {
        !self.search.trim().is_empty() || !self.status.is_all() || !self.kind.is_all()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentFilter {
    pub search: String,
    pub category: Choice<EquipmentCategory>,
    pub active: Choice<bool>,
}

impl ListFilter<Equipment> for EquipmentFilter {
    fn search(&self) -> &str {
        &self.search
    }

    fn admits(&self, item: &Equipment) -> bool {
        self.category.admits(&item.details.category) && self.active.admits(&item.details.is_active)
    }

    fn is_narrowing(&self) -> bool {
        !self.search.trim().is_empty() || !self.category.is_all() || !self.active.is_all()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    pub search: String,
    pub status: Choice<TaskStatus>,
    pub priority: Choice<TaskPriority>,
}

impl ListFilter<MaintenanceTask> for TaskFilter {
    fn search(&self) -> &str {
        &self.search
    }

    fn admits(&self, item: &MaintenanceTask) -> bool {
        self.status.admits(&item.details.status) && self.priority.admits(&item.details.priority)
    }

    fn is_narrowing(&self) -> bool {
        !self.search.trim().is_empty() || !self.status.is_all() || !self.priority.is_all()
    }
}

/// Search-only filter for lists without categorical criteria
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub search: String,
}

impl ListFilter<RoomCategory> for CategoryFilter {
    fn search(&self) -> &str {
        &self.search
    }

    fn admits(&self, _item: &RoomCategory) -> bool {
        true
    }

    fn is_narrowing(&self) -> bool {
        !self.search.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelEquipmentFilter {
    pub search: String,
    pub available: Choice<bool>,
    pub free: Choice<bool>,
}

impl ListFilter<HotelEquipment> for HotelEquipmentFilter {
    fn search(&self) -> &str {
        &self.search
    }

    fn admits(&self, item: &HotelEquipment) -> bool {
        self.available.admits(&item.details.is_available) && self.free.admits(&item.details.is_free)
    }

    fn is_narrowing(&self) -> bool {
        !self.search.trim().is_empty() || !self.available.is_all() || !self.free.is_all()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionFilter {
    pub search: String,
    pub active: Choice<bool>,
}

impl ListFilter<Convention> for ConventionFilter {
    fn search(&self) -> &str {
        &self.search
    }

    fn admits(&self, item: &Convention) -> bool {
        self.active.admits(&item.details.active)
    }

    fn is_narrowing(&self) -> bool {
        !self.search.trim().is_empty() || !self.active.is_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        EquipmentDraft, EstablishmentDraft, HotelEquipmentDraft, MaintenanceTaskDraft, RoomDraft,
    };
    use uuid::Uuid;

    fn establishments() -> Vec<Establishment> {
        let mut parc = EstablishmentDraft::new("Hôtel du Parc", "12 avenue Foch", "75008", "Paris");
        parc.manager = Some("Claire Martin".to_string());
        let mut gare = EstablishmentDraft::new("Résidence Gare", "3 place de la Gare", "69007", "Lyon");
        gare.kind = EstablishmentType::Residence;
        gare.status = EstablishmentStatus::Inactive;
        vec![Establishment::new(parc), Establishment::new(gare)]
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let list = establishments();
        let filter = EstablishmentFilter {
            search: "MARTIN".to_string(),
            ..Default::default()
        };
        let found = filter.apply(&list);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].details.city, "Paris");

        let filter = EstablishmentFilter {
            search: "gare".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&list).len(), 1);
    }

    #[test]
    fn test_categorical_after_search() {
        let list = establishments();
        let filter = EstablishmentFilter {
            search: "e".to_string(),
            status: Choice::Only(EstablishmentStatus::Active),
            ..Default::default()
        };
        assert_eq!(filter.apply(&list).len(), 1);

        let filter = EstablishmentFilter {
            city: Choice::Only("lyon".to_string()),
            kind: Choice::Only(EstablishmentType::Residence),
            ..Default::default()
        };
        assert!(filter.is_narrowing());
        assert_eq!(filter.apply(&list)[0].details.name, "Résidence Gare");

        assert!(!EstablishmentFilter::default().is_narrowing());
        assert_eq!(EstablishmentFilter::default().apply(&list).len(), 2);
    }

    #[test]
    fn test_room_filter() {
        let est = Uuid::new_v4();
        let mut a = RoomDraft::new(est, "101", RoomType::Suite);
        a.description = Some("Sea view".to_string());
        let mut b = RoomDraft::new(est, "102", RoomType::Double);
        b.status = RoomStatus::Occupied;
        let rooms = vec![Room::new(a), Room::new(b)];

        let filter = RoomFilter {
            search: "sea".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&rooms).len(), 1);

        let filter = RoomFilter {
            search: "10".to_string(),
            status: Choice::Only(RoomStatus::Occupied),
            ..Default::default()
        };
        assert_eq!(filter.apply(&rooms)[0].details.number, "102");

        let filter = RoomFilter {
            search: "suite".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&rooms).len(), 1);
    }

    #[test]
    fn test_equipment_filter_searches_category() {
        let mut wifi = EquipmentDraft::new("Wifi", EquipmentCategory::Connectivity);
        wifi.description = Some("Fibre".to_string());
        let mut spa = EquipmentDraft::new("Spa", EquipmentCategory::Wellness);
        spa.is_active = false;
        let items = vec![Equipment::new(wifi), Equipment::new(spa)];

        let filter = EquipmentFilter {
            search: "connect".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&items).len(), 1);

        let filter = EquipmentFilter {
            active: Choice::Only(false),
            ..Default::default()
        };
        assert_eq!(filter.apply(&items)[0].details.name, "Spa");
    }

    #[test]
    fn test_task_filter() {
        let est = Uuid::new_v4();
        let mut leak = MaintenanceTaskDraft::new(est, "Water leak");
        leak.assignee = Some("Plumbing Co".to_string());
        leak.priority = TaskPriority::Urgent;
        let tasks = vec![
            MaintenanceTask::new(leak),
            MaintenanceTask::new(MaintenanceTaskDraft::new(est, "Paint lobby")),
        ];

        let filter = TaskFilter {
            search: "plumbing".to_string(),
            priority: Choice::Only(TaskPriority::Urgent),
            ..Default::default()
        };
        assert_eq!(filter.apply(&tasks).len(), 1);
    }

    #[test]
    fn test_results_summary() {
        assert_eq!(results_summary(0, "room", "rooms"), "0 room found");
        assert_eq!(results_summary(1, "room", "rooms"), "1 room found");
        assert_eq!(results_summary(3, "room", "rooms"), "3 rooms found");

        let filter = RoomFilter {
            search: " 10 ".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.summary(2, "room", "rooms"), "2 rooms found for \"10\"");
    }

    #[test]
    fn test_offer_filter_by_availability() {
        let est = Uuid::new_v4();
        let mut closed = HotelEquipmentDraft::new(est, Uuid::new_v4());
        closed.is_available = false;
        closed.specific_description = Some("Heated pool".to_string());
        let offers = vec![
            HotelEquipment::new(closed),
            HotelEquipment::new(HotelEquipmentDraft::new(est, Uuid::new_v4())),
        ];

        let filter = HotelEquipmentFilter {
            available: Choice::Only(true),
            ..Default::default()
        };
        assert_eq!(filter.apply(&offers).len(), 1);

        let filter = HotelEquipmentFilter {
            search: "pool".to_string(),
            ..Default::default()
        };
        assert!(!filter.apply(&offers)[0].details.is_available);
    }
}

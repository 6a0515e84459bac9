//! Form validation
//!
//! Each validator returns [`FieldErrors`]: field name -> human-readable
//! message. An empty set means the form can be submitted.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{
    ConventionDraft, EquipmentDraft, EstablishmentDraft, HotelEquipmentDraft, MaintenanceTask,
    MaintenanceTaskDraft, RoomCategoryDraft, RoomDraft,
};

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; an earlier message for the same field is replaced
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    /// Forget the error of a field the user is editing
    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// French postal code: exactly five digits
pub fn is_valid_postal_code(value: &str) -> bool {
    value.len() == 5 && value.bytes().all(|b| b.is_ascii_digit())
}

/// `local@domain.tld` with no whitespace
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// SIRET: fourteen digits once whitespace is removed
pub fn is_valid_siret(value: &str) -> bool {
    let digits: Vec<char> = value.chars().filter(|c| !c.is_whitespace()).collect();
    digits.len() == 14 && digits.iter().all(|c| c.is_ascii_digit())
}

pub fn is_valid_star_rating(stars: u8) -> bool {
    (1..=5).contains(&stars)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn validate_establishment(draft: &EstablishmentDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if is_blank(&draft.name) {
        errors.insert("name", "Name is required");
    }
    if is_blank(&draft.address) {
        errors.insert("address", "Address is required");
    }
    if is_blank(&draft.city) {
        errors.insert("city", "City is required");
    }
    if is_blank(&draft.postal_code) {
        errors.insert("postal_code", "Postal code is required");
    } else if !is_valid_postal_code(draft.postal_code.trim()) {
        errors.insert("postal_code", "Postal code must contain 5 digits");
    }

    if let Some(email) = filled(&draft.email) {
        if !is_valid_email(email) {
            errors.insert("email", "Invalid email format");
        }
    }
    if let Some(email) = filled(&draft.manager_email) {
        if !is_valid_email(email) {
            errors.insert("manager_email", "Invalid email format");
        }
    }

    if draft.occupied_rooms > draft.total_rooms {
        errors.insert(
            "occupied_rooms",
            "Cannot exceed the total number of rooms",
        );
    }

    if let Some(siret) = filled(&draft.siret) {
        if !is_valid_siret(siret) {
            errors.insert("siret", "SIRET must contain 14 digits");
        }
    }

    if let Some(stars) = draft.star_rating {
        if !is_valid_star_rating(stars) {
            errors.insert("star_rating", "Rating must be between 1 and 5 stars");
        }
    }

    errors
}

pub fn validate_room(draft: &RoomDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if is_blank(&draft.number) {
        errors.insert("number", "Room number is required");
    }
    if !(draft.price > 0.0) {
        errors.insert("price", "Price must be greater than 0");
    }
    if draft.floor.map_or(false, |floor| floor < 0) {
        errors.insert("floor", "Floor cannot be negative");
    }
    if draft.size.map_or(false, |size| !(size > 0.0)) {
        errors.insert("size", "Size must be positive");
    }

    errors
}

pub fn validate_room_category(draft: &RoomCategoryDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if is_blank(&draft.name) {
        errors.insert("name", "Name is required");
    }
    if draft.capacity < 1 {
        errors.insert("capacity", "Capacity must be at least 1");
    }
    if draft.surface_area.map_or(false, |area| !(area > 0.0)) {
        errors.insert("surface_area", "Surface area must be positive");
    }

    errors
}

pub fn validate_equipment(draft: &EquipmentDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if is_blank(&draft.name) {
        errors.insert("name", "Name is required");
    }

    errors
}

pub fn validate_hotel_equipment(draft: &HotelEquipmentDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if !draft.is_free {
        match draft.surcharge {
            None => errors.insert("surcharge", "A surcharge is required when not free"),
            Some(price) if !(price > 0.0) => {
                errors.insert("surcharge", "Surcharge must be greater than 0")
            }
            Some(_) => {}
        }
    }

    errors
}

/// `stored` is the persisted task when editing, `None` when creating. A
/// past due date is accepted in edit mode only if it is the stored one.
pub fn validate_task(
    draft: &MaintenanceTaskDraft,
    stored: Option<&MaintenanceTask>,
    today: NaiveDate,
) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let title = draft.title.trim();
    if title.is_empty() {
        errors.insert("title", "Title is required");
    } else if title.chars().count() < 3 {
        errors.insert("title", "Title must contain at least 3 characters");
    }

    if let Some(due) = draft.due_date {
        let unchanged = stored.map_or(false, |task| task.details.due_date == Some(due));
        if due < today && !unchanged {
            errors.insert("due_date", "Due date cannot be in the past");
        }
    }

    errors
}

pub fn validate_convention(draft: &ConventionDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if is_blank(&draft.client_name) {
        errors.insert("client_name", "Client is required");
    }
    if !(draft.default_price > 0.0) {
        errors.insert(
            "default_price",
            "Default price is required and must be greater than 0",
        );
    }
    if draft.ends_on.map_or(false, |end| end < draft.starts_on) {
        errors.insert("ends_on", "End date cannot precede the start date");
    }
    if let Some(discount) = draft.discount_percent {
        if !(0.0..=100.0).contains(&discount) {
            errors.insert("discount_percent", "Discount must be between 0 and 100");
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn valid_establishment() -> EstablishmentDraft {
        EstablishmentDraft::new("Hôtel du Parc", "12 avenue Foch", "75008", "Paris")
    }

    #[test]
    fn test_postal_code() {
        assert!(is_valid_postal_code("75008"));
        assert!(!is_valid_postal_code("7500"));
        assert!(!is_valid_postal_code("abcde"));
        assert!(!is_valid_postal_code("750081"));
    }

    #[test]
    fn test_siret() {
        assert!(is_valid_siret("12345678901234"));
        assert!(is_valid_siret("1234 5678 9012 34"));
        assert!(!is_valid_siret("123"));
        assert!(!is_valid_siret("1234567890123a"));
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email("contact@hotel.fr"));
        assert!(!is_valid_email("contact@hotel"));
        assert!(!is_valid_email("contact hotel@x.fr"));
        assert!(!is_valid_email("@hotel.fr"));
        assert!(!is_valid_email("a@b@c.fr"));
        assert!(!is_valid_email("a@.fr"));
    }

    #[test]
    fn test_valid_establishment_without_siret() {
        assert!(validate_establishment(&valid_establishment()).is_empty());
    }

    #[test]
    fn test_establishment_errors_are_keyed() {
        let mut draft = valid_establishment();
        draft.name = "  ".to_string();
        draft.postal_code = "7500".to_string();
        draft.total_rooms = 5;
        draft.occupied_rooms = 10;
        draft.star_rating = Some(6);
        draft.siret = Some("123".to_string());

        let mut errors = validate_establishment(&draft);
        assert_eq!(errors.len(), 5);
        assert!(errors.contains("name"));
        assert_eq!(
            errors.get("postal_code"),
            Some("Postal code must contain 5 digits")
        );
        assert!(errors.contains("occupied_rooms"));

        errors.clear("name");
        assert!(!errors.contains("name"));
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_room_rules() {
        let mut draft = RoomDraft::new(Uuid::new_v4(), "", crate::models::RoomType::Double);
        draft.price = 0.0;
        draft.floor = Some(-1);
        draft.size = Some(0.0);
        let errors = validate_room(&draft);
        assert!(errors.contains("number"));
        assert!(errors.contains("price"));
        assert!(errors.contains("floor"));
        assert!(errors.contains("size"));
    }

    #[test]
    fn test_paid_equipment_needs_surcharge() {
        let mut draft = HotelEquipmentDraft::new(Uuid::new_v4(), Uuid::new_v4());
        assert!(validate_hotel_equipment(&draft).is_empty());

        draft.is_free = false;
        assert!(validate_hotel_equipment(&draft).contains("surcharge"));

        draft.surcharge = Some(5.0);
        assert!(validate_hotel_equipment(&draft).is_empty());
    }

    #[test]
    fn test_task_title_and_due_date() {
        let today = Utc::now().date_naive();
        let mut draft = MaintenanceTaskDraft::new(Uuid::new_v4(), "ab");
        draft.due_date = Some(today - Duration::days(2));

        let errors = validate_task(&draft, None, today);
        assert!(errors.contains("title"));
        assert!(errors.contains("due_date"));

        draft.title = "Fix the boiler".to_string();
        draft.due_date = Some(today);
        assert!(validate_task(&draft, None, today).is_empty());
    }

    #[test]
    fn test_task_edit_keeps_stored_past_date() {
        let today = Utc::now().date_naive();
        let past = today - Duration::days(10);
        let mut draft = MaintenanceTaskDraft::new(Uuid::new_v4(), "Repaint hall");
        draft.due_date = Some(past);
        let mut stored = MaintenanceTask::new(draft.clone());
        stored.details.due_date = Some(past);

        assert!(validate_task(&draft, Some(&stored), today).is_empty());

        draft.due_date = Some(past - Duration::days(1));
        assert!(validate_task(&draft, Some(&stored), today).contains("due_date"));
    }

    #[test]
    fn test_display_lists_fields() {
        let mut errors = FieldErrors::new();
        errors.insert("city", "City is required");
        errors.insert("address", "Address is required");
        assert_eq!(
            errors.to_string(),
            "address: Address is required; city: City is required"
        );
    }
}

//! Establishment model - a managed property

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UnknownVariant;
use crate::occupancy::occupancy_rate;

/// Whether an establishment is operating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstablishmentStatus {
    #[default]
    Active,
    Inactive,
}

impl EstablishmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstablishmentStatus::Active => "ACTIVE",
            EstablishmentStatus::Inactive => "INACTIVE",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            EstablishmentStatus::Active => EstablishmentStatus::Inactive,
            EstablishmentStatus::Inactive => EstablishmentStatus::Active,
        }
    }
}

impl FromStr for EstablishmentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(EstablishmentStatus::Active),
            "INACTIVE" => Ok(EstablishmentStatus::Inactive),
            other => Err(UnknownVariant::new("establishment status", other)),
        }
    }
}

/// Kind of property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstablishmentType {
    #[default]
    Hotel,
    Residence,
    /// Hostel or foyer
    Hostel,
    /// Social reintegration shelter
    Shelter,
    /// Hotel-restaurant
    Hospitality,
    Other,
}

impl EstablishmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstablishmentType::Hotel => "hotel",
            EstablishmentType::Residence => "residence",
            EstablishmentType::Hostel => "hostel",
            EstablishmentType::Shelter => "shelter",
            EstablishmentType::Hospitality => "hospitality",
            EstablishmentType::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EstablishmentType::Hotel => "Hotel",
            EstablishmentType::Residence => "Residence",
            EstablishmentType::Hostel => "Hostel",
            EstablishmentType::Shelter => "Shelter",
            EstablishmentType::Hospitality => "Hotel-restaurant",
            EstablishmentType::Other => "Other",
        }
    }
}

impl FromStr for EstablishmentType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hotel" => Ok(EstablishmentType::Hotel),
            "residence" => Ok(EstablishmentType::Residence),
            "hostel" => Ok(EstablishmentType::Hostel),
            "shelter" => Ok(EstablishmentType::Shelter),
            "hospitality" => Ok(EstablishmentType::Hospitality),
            "other" => Ok(EstablishmentType::Other),
            other => Err(UnknownVariant::new("establishment type", other)),
        }
    }
}

/// Editable fields of an establishment, as submitted by the form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstablishmentDraft {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub manager_phone: Option<String>,
    #[serde(default)]
    pub manager_email: Option<String>,
    #[serde(default)]
    pub status: EstablishmentStatus,
    #[serde(default)]
    pub kind: EstablishmentType,
    #[serde(default)]
    pub total_rooms: u32,
    #[serde(default)]
    pub occupied_rooms: u32,
    #[serde(default)]
    pub siret: Option<String>,
    #[serde(default)]
    pub vat_number: Option<String>,
    #[serde(default)]
    pub star_rating: Option<u8>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub check_in_time: Option<String>,
    #[serde(default)]
    pub check_out_time: Option<String>,
}

impl EstablishmentDraft {
    pub fn new(name: &str, address: &str, postal_code: &str, city: &str) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
            postal_code: postal_code.to_string(),
            city: city.to_string(),
            ..Default::default()
        }
    }

    /// Trim text fields, turn blank optionals into `None` and strip SIRET spacing
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.address = self.address.trim().to_string();
        self.postal_code = self.postal_code.trim().to_string();
        self.city = self.city.trim().to_string();
        for field in [
            &mut self.phone,
            &mut self.email,
            &mut self.website,
            &mut self.manager,
            &mut self.manager_phone,
            &mut self.manager_email,
            &mut self.vat_number,
            &mut self.description,
            &mut self.check_in_time,
            &mut self.check_out_time,
        ] {
            *field = blank_to_none(field.take());
        }
        self.siret = blank_to_none(self.siret.take())
            .map(|s| s.chars().filter(|c| !c.is_whitespace()).collect());
        self
    }

    /// Occupancy computed from the current form inputs
    pub fn occupancy_rate(&self) -> u32 {
        occupancy_rate(self.total_rooms, self.occupied_rooms)
    }
}

/// A managed property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Establishment {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: EstablishmentDraft,
    /// Denormalized rate persisted alongside the room counts
    pub stored_occupancy_rate: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Establishment {
    pub fn new(details: EstablishmentDraft) -> Self {
        let details = details.normalized();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            stored_occupancy_rate: details.occupancy_rate(),
            details,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace editable fields and recompute the denormalized rate
    pub fn apply(&mut self, details: EstablishmentDraft) {
        self.details = details.normalized();
        self.stored_occupancy_rate = self.details.occupancy_rate();
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: EstablishmentStatus) {
        self.details.status = status;
        self.updated_at = Utc::now();
    }

    /// Occupancy recomputed from room counts, never read from storage
    pub fn occupancy_rate(&self) -> u32 {
        self.details.occupancy_rate()
    }

    pub fn is_active(&self) -> bool {
        self.details.status == EstablishmentStatus::Active
    }

    pub fn available_rooms(&self) -> u32 {
        self.details
            .total_rooms
            .saturating_sub(self.details.occupied_rooms)
    }
}

pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_establishment_computes_rate() {
        let mut draft = EstablishmentDraft::new("Le Relais", "1 rue Haute", "75008", "Paris");
        draft.total_rooms = 40;
        draft.occupied_rooms = 30;
        let est = Establishment::new(draft);
        assert_eq!(est.stored_occupancy_rate, 75);
        assert_eq!(est.available_rooms(), 10);
        assert!(est.is_active());
    }

    #[test]
    fn test_apply_recomputes_rate() {
        let mut draft = EstablishmentDraft::new("Le Relais", "1 rue Haute", "75008", "Paris");
        draft.total_rooms = 10;
        let mut est = Establishment::new(draft.clone());
        assert_eq!(est.stored_occupancy_rate, 0);

        draft.occupied_rooms = 3;
        est.apply(draft);
        assert_eq!(est.stored_occupancy_rate, 30);
        assert_eq!(est.occupancy_rate(), 30);
    }

    #[test]
    fn test_normalized_blanks_and_siret() {
        let mut draft = EstablishmentDraft::new(" A ", "b", "75001", "c");
        draft.email = Some("   ".to_string());
        draft.siret = Some("1234 5678 9012 34".to_string());
        let draft = draft.normalized();
        assert_eq!(draft.name, "A");
        assert!(draft.email.is_none());
        assert_eq!(draft.siret.as_deref(), Some("12345678901234"));
    }

    #[test]
    fn test_status_toggle_and_parse() {
        assert_eq!(
            EstablishmentStatus::Active.toggled(),
            EstablishmentStatus::Inactive
        );
        assert_eq!(
            "INACTIVE".parse::<EstablishmentStatus>().unwrap(),
            EstablishmentStatus::Inactive
        );
        assert!("closed".parse::<EstablishmentStatus>().is_err());
        assert_eq!(
            EstablishmentType::Shelter.as_str().parse::<EstablishmentType>().unwrap(),
            EstablishmentType::Shelter
        );
    }
}

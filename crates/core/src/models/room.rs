//! Room model

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::establishment::blank_to_none;
use super::list_entry::deserialize_normalized;
use super::UnknownVariant;

/// Room layout, each with a default capacity and base nightly price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    #[default]
    Simple,
    Double,
    Twin,
    Family,
    Suite,
    /// Reduced-mobility room
    Accessible,
    Studio,
}

impl RoomType {
    pub fn all() -> &'static [RoomType] {
        &[
            RoomType::Simple,
            RoomType::Double,
            RoomType::Twin,
            RoomType::Family,
            RoomType::Suite,
            RoomType::Accessible,
            RoomType::Studio,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Simple => "simple",
            RoomType::Double => "double",
            RoomType::Twin => "twin",
            RoomType::Family => "family",
            RoomType::Suite => "suite",
            RoomType::Accessible => "accessible",
            RoomType::Studio => "studio",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RoomType::Simple => "Single room",
            RoomType::Double => "Double room",
            RoomType::Twin => "Twin room",
            RoomType::Family => "Family room",
            RoomType::Suite => "Suite",
            RoomType::Accessible => "Accessible room",
            RoomType::Studio => "Studio",
        }
    }

    pub fn default_capacity(&self) -> u32 {
        match self {
            RoomType::Simple => 1,
            RoomType::Family => 4,
            _ => 2,
        }
    }

    pub fn base_price(&self) -> f64 {
        match self {
            RoomType::Simple => 45.0,
            RoomType::Double | RoomType::Twin => 65.0,
            RoomType::Family => 85.0,
            RoomType::Suite => 120.0,
            RoomType::Accessible | RoomType::Studio => 55.0,
        }
    }
}

impl FromStr for RoomType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("room type", s))
    }
}

/// Room availability; exactly three states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    #[default]
    Available,
    Occupied,
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Maintenance => "maintenance",
        }
    }

    pub fn can_be_reserved(&self) -> bool {
        *self == RoomStatus::Available
    }
}

impl FromStr for RoomStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(RoomStatus::Available),
            "occupied" => Ok(RoomStatus::Occupied),
            "maintenance" => Ok(RoomStatus::Maintenance),
            other => Err(UnknownVariant::new("room status", other)),
        }
    }
}

/// Editable fields of a room
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomDraft {
    pub establishment_id: Uuid,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub number: String,
    #[serde(default)]
    pub kind: RoomType,
    pub price: f64,
    #[serde(default)]
    pub status: RoomStatus,
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub bed_type: Option<String>,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default, deserialize_with = "deserialize_normalized")]
    pub amenities: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_normalized")]
    pub images: Vec<String>,
}

impl RoomDraft {
    pub fn new(establishment_id: Uuid, number: &str, kind: RoomType) -> Self {
        Self {
            establishment_id,
            number: number.to_string(),
            kind,
            price: kind.base_price(),
            ..Default::default()
        }
    }

    /// Changing the type resets the price to that type's base price
    pub fn set_kind(&mut self, kind: RoomType) {
        self.kind = kind;
        self.price = kind.base_price();
    }

    /// Add the amenity if missing, remove it otherwise
    pub fn toggle_amenity(&mut self, amenity: &str) {
        let amenity = amenity.trim();
        if amenity.is_empty() {
            return;
        }
        if let Some(pos) = self.amenities.iter().position(|a| a == amenity) {
            self.amenities.remove(pos);
        } else {
            self.amenities.push(amenity.to_string());
        }
    }

    pub fn normalized(mut self) -> Self {
        self.number = self.number.trim().to_string();
        self.description = blank_to_none(self.description.take());
        self.bed_type = blank_to_none(self.bed_type.take());
        self.view = blank_to_none(self.view.take());
        self.amenities = super::list_entry::normalize(
            self.amenities.into_iter().map(super::ListEntry::Plain),
        );
        self.images =
            super::list_entry::normalize(self.images.into_iter().map(super::ListEntry::Plain));
        self
    }
}

/// A bookable room in an establishment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: RoomDraft,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn new(details: RoomDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            details: details.normalized(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, details: RoomDraft) {
        self.details = details.normalized();
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: RoomStatus) {
        self.details.status = status;
        self.updated_at = Utc::now();
    }

    pub fn capacity(&self) -> u32 {
        self.details.kind.default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_sets_base_price() {
        let mut draft = RoomDraft::new(Uuid::new_v4(), "101", RoomType::Simple);
        assert_eq!(draft.price, 45.0);
        draft.set_kind(RoomType::Suite);
        assert_eq!(draft.price, 120.0);
        assert_eq!(RoomType::Family.default_capacity(), 4);
    }

    #[test]
    fn test_toggle_amenity() {
        let mut draft = RoomDraft::new(Uuid::new_v4(), "101", RoomType::Double);
        draft.toggle_amenity("wifi");
        draft.toggle_amenity("tv");
        draft.toggle_amenity("wifi");
        assert_eq!(draft.amenities, vec!["tv"]);
    }

    #[test]
    fn test_mixed_amenities_from_json() {
        let json = format!(
            r#"{{"establishment_id": "{}", "number": "12", "price": 50.0,
                "amenities": ["wifi", {{"name": "tv"}}, {{"value": "safe"}}]}}"#,
            Uuid::new_v4()
        );
        let draft: RoomDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(draft.amenities, vec!["wifi", "tv", "safe"]);
        assert!(draft.images.is_empty());
        assert_eq!(draft.status, RoomStatus::Available);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("maintenance".parse::<RoomStatus>().unwrap(), RoomStatus::Maintenance);
        assert!("cleaning".parse::<RoomStatus>().is_err());
        assert!(RoomStatus::Available.can_be_reserved());
        assert!(!RoomStatus::Occupied.can_be_reserved());
    }
}

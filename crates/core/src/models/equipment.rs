//! Equipment catalogue and per-establishment equipment offers

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::establishment::blank_to_none;
use super::UnknownVariant;

/// Equipment grouping used for display and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
    Connectivity,
    Services,
    Wellness,
    Accessibility,
    Security,
    Recreation,
    #[default]
    General,
}

impl EquipmentCategory {
    pub fn all() -> &'static [EquipmentCategory] {
        &[
            EquipmentCategory::Connectivity,
            EquipmentCategory::Services,
            EquipmentCategory::Wellness,
            EquipmentCategory::Accessibility,
            EquipmentCategory::Security,
            EquipmentCategory::Recreation,
            EquipmentCategory::General,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentCategory::Connectivity => "connectivity",
            EquipmentCategory::Services => "services",
            EquipmentCategory::Wellness => "wellness",
            EquipmentCategory::Accessibility => "accessibility",
            EquipmentCategory::Security => "security",
            EquipmentCategory::Recreation => "recreation",
            EquipmentCategory::General => "general",
        }
    }
}

impl FromStr for EquipmentCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EquipmentCategory::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("equipment category", s))
    }
}

/// Editable fields of a catalogue equipment item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentDraft {
    pub name: String,
    #[serde(default)]
    pub category: EquipmentCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
}

impl Default for EquipmentDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: EquipmentCategory::default(),
            description: None,
            icon: None,
            is_active: true,
            display_order: 0,
        }
    }
}

impl EquipmentDraft {
    pub fn new(name: &str, category: EquipmentCategory) -> Self {
        Self {
            name: name.to_string(),
            category,
            ..Default::default()
        }
    }

    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = blank_to_none(self.description.take());
        self.icon = blank_to_none(self.icon.take());
        self
    }
}

/// Catalogue equipment item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: EquipmentDraft,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Equipment {
    pub fn new(details: EquipmentDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            details: details.normalized(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, details: EquipmentDraft) {
        self.details = details.normalized();
        self.updated_at = Utc::now();
    }

    pub fn deactivate(&mut self) {
        self.details.is_active = false;
        self.updated_at = Utc::now();
    }
}

/// Editable fields of an equipment offer at one establishment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelEquipmentDraft {
    pub establishment_id: Uuid,
    pub equipment_id: Uuid,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default = "default_true")]
    pub is_free: bool,
    /// Required when the offer is not free
    #[serde(default)]
    pub surcharge: Option<f64>,
    #[serde(default)]
    pub specific_description: Option<String>,
    #[serde(default)]
    pub usage_conditions: Option<String>,
    #[serde(default)]
    pub internal_notes: Option<String>,
}

impl HotelEquipmentDraft {
    pub fn new(establishment_id: Uuid, equipment_id: Uuid) -> Self {
        Self {
            establishment_id,
            equipment_id,
            is_available: true,
            is_free: true,
            surcharge: None,
            specific_description: None,
            usage_conditions: None,
            internal_notes: None,
        }
    }

    /// A free offer never carries a surcharge
    pub fn normalized(mut self) -> Self {
        if self.is_free {
            self.surcharge = None;
        }
        self.specific_description = blank_to_none(self.specific_description.take());
        self.usage_conditions = blank_to_none(self.usage_conditions.take());
        self.internal_notes = blank_to_none(self.internal_notes.take());
        self
    }
}

/// Equipment offered at a specific establishment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelEquipment {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: HotelEquipmentDraft,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HotelEquipment {
    pub fn new(details: HotelEquipmentDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            details: details.normalized(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, details: HotelEquipmentDraft) {
        self.details = details.normalized();
        self.updated_at = Utc::now();
    }

    pub fn set_available(&mut self, available: bool) {
        self.details.is_available = available;
        self.updated_at = Utc::now();
    }

    /// Price charged to the guest; zero when free
    pub fn effective_surcharge(&self) -> f64 {
        if self.details.is_free {
            0.0
        } else {
            self.details.surcharge.unwrap_or(0.0)
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_offer_drops_surcharge() {
        let mut draft = HotelEquipmentDraft::new(Uuid::new_v4(), Uuid::new_v4());
        draft.surcharge = Some(12.0);
        let offer = HotelEquipment::new(draft);
        assert!(offer.details.surcharge.is_none());
        assert_eq!(offer.effective_surcharge(), 0.0);
    }

    #[test]
    fn test_paid_offer_keeps_surcharge() {
        let mut draft = HotelEquipmentDraft::new(Uuid::new_v4(), Uuid::new_v4());
        draft.is_free = false;
        draft.surcharge = Some(8.5);
        let offer = HotelEquipment::new(draft);
        assert_eq!(offer.effective_surcharge(), 8.5);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(EquipmentCategory::all().len(), 7);
        assert_eq!(
            "wellness".parse::<EquipmentCategory>().unwrap(),
            EquipmentCategory::Wellness
        );
        assert!("spa".parse::<EquipmentCategory>().is_err());
    }

    #[test]
    fn test_draft_defaults_from_json() {
        let draft: EquipmentDraft = serde_json::from_str(r#"{"name": "Wifi"}"#).unwrap();
        assert!(draft.is_active);
        assert_eq!(draft.category, EquipmentCategory::General);
    }
}

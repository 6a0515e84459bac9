//! Room category model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::establishment::blank_to_none;

/// Editable fields of a room category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomCategoryDraft {
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub surface_area: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for RoomCategoryDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            capacity: 1,
            surface_area: None,
            description: None,
        }
    }
}

impl RoomCategoryDraft {
    pub fn new(name: &str, capacity: u32) -> Self {
        Self {
            name: name.to_string(),
            capacity,
            ..Default::default()
        }
    }

    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = blank_to_none(self.description.take());
        self
    }
}

/// Classification of rooms by capacity and size, used for pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomCategory {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: RoomCategoryDraft,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoomCategory {
    pub fn new(details: RoomCategoryDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            details: details.normalized(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, details: RoomCategoryDraft) {
        self.details = details.normalized();
        self.updated_at = Utc::now();
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }
}

//! Store-side list filters and delete modes
//!
//! These travel with `list` requests; unset fields do not constrain.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    EquipmentCategory, EstablishmentStatus, EstablishmentType, RoomStatus, RoomType, TaskPriority,
    TaskStatus,
};

/// How a delete request treats entities that carry an activity flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteMode {
    /// Deactivate where possible, remove otherwise
    #[default]
    Soft,
    Hard,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstablishmentQuery {
    #[serde(default)]
    pub status: Option<EstablishmentStatus>,
    #[serde(default)]
    pub kind: Option<EstablishmentType>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomQuery {
    #[serde(default)]
    pub establishment_id: Option<Uuid>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub status: Option<RoomStatus>,
    #[serde(default)]
    pub kind: Option<RoomType>,
}

impl RoomQuery {
    pub fn for_establishment(establishment_id: Uuid) -> Self {
        Self {
            establishment_id: Some(establishment_id),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentQuery {
    #[serde(default)]
    pub category: Option<EquipmentCategory>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelEquipmentQuery {
    #[serde(default)]
    pub establishment_id: Option<Uuid>,
    #[serde(default)]
    pub equipment_id: Option<Uuid>,
    #[serde(default)]
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQuery {
    #[serde(default)]
    pub establishment_id: Option<Uuid>,
    #[serde(default)]
    pub room_id: Option<Uuid>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionQuery {
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub establishment_id: Option<Uuid>,
    #[serde(default)]
    pub active: Option<bool>,
}

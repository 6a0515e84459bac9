//! Network protocol message types
//!
//! All messages are JSON-serialized and length-prefixed on the wire. A
//! connection carries one [`Request`] at a time, each answered by exactly
//! one [`Response`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hotelier_core::{
    ClientPricing, ConventionDraft, ConventionQuery, DeleteMode, EquipmentDraft, EquipmentQuery,
    EstablishmentDraft, EstablishmentQuery, FieldErrors, HotelEquipmentDraft,
    HotelEquipmentQuery, MaintenanceTaskDraft, RoomCategoryDraft, RoomDraft, RoomQuery,
    RoomStatus, TaskAction, TaskQuery,
};

/// Operations a client can ask of the data store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    ListEstablishments { query: EstablishmentQuery },
    CreateEstablishment { draft: EstablishmentDraft },
    UpdateEstablishment { id: Uuid, draft: EstablishmentDraft },
    DeleteEstablishment { id: Uuid, mode: DeleteMode },
    ToggleEstablishmentStatus { id: Uuid },
    EstablishmentSummary,

    ListRooms { query: RoomQuery },
    CreateRoom { draft: RoomDraft },
    UpdateRoom { id: Uuid, draft: RoomDraft },
    DeleteRoom { id: Uuid },
    SetRoomStatus { id: Uuid, status: RoomStatus },
    RoomStatistics { establishment_id: Uuid },

    ListCategories,
    CreateCategory { draft: RoomCategoryDraft },
    UpdateCategory { id: Uuid, draft: RoomCategoryDraft },
    DeleteCategory { id: Uuid },

    ListEquipment { query: EquipmentQuery },
    CreateEquipment { draft: EquipmentDraft },
    UpdateEquipment { id: Uuid, draft: EquipmentDraft },
    DeleteEquipment { id: Uuid, mode: DeleteMode },

    ListHotelEquipment { query: HotelEquipmentQuery },
    CreateHotelEquipment { draft: HotelEquipmentDraft },
    UpdateHotelEquipment { id: Uuid, draft: HotelEquipmentDraft },
    DeleteHotelEquipment { id: Uuid, mode: DeleteMode },

    ListTasks { query: TaskQuery },
    CreateTask { draft: MaintenanceTaskDraft },
    UpdateTask { id: Uuid, draft: MaintenanceTaskDraft },
    ApplyTaskAction { id: Uuid, action: TaskAction },
    DeleteTask { id: Uuid },

    ListConventions { query: ConventionQuery },
    CreateConvention { draft: ConventionDraft },
    UpdateConvention { id: Uuid, draft: ConventionDraft },
    SetConventionActive { id: Uuid, active: bool },
    DeleteConvention { id: Uuid },
    SaveClientPricing { pricing: ClientPricing },

    /// Liveness check, answered with `Pong`
    Ping,
}

/// Store answer to a single request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Successful call returning a value
    Data { payload: serde_json::Value },

    /// Successful call with nothing to return
    Done,

    /// The request was refused (validation, missing entity, rule violation)
    Failed {
        message: String,
        #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
        fields: FieldErrors,
    },

    /// The store itself failed
    Fault { message: String },

    Pong,
}

impl Response {
    pub fn data<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Response::Data {
            payload: serde_json::to_value(value)?,
        })
    }

    /// Decode a `Data` payload
    pub fn decode<T: DeserializeOwned>(payload: serde_json::Value) -> Result<T, serde_json::Error> {
        serde_json::from_value(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_tagged_by_type() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(Request::DeleteEstablishment {
            id,
            mode: DeleteMode::Hard,
        })
        .unwrap();
        assert_eq!(json["type"], "DeleteEstablishment");
        assert_eq!(json["mode"], "hard");

        let ping: Request = serde_json::from_str(r#"{"type": "Ping"}"#).unwrap();
        assert!(matches!(ping, Request::Ping));
    }

    #[test]
    fn test_failed_keeps_field_errors() {
        let mut fields = FieldErrors::new();
        fields.insert("name", "Name is required");
        let text = serde_json::to_string(&Response::Failed {
            message: "Validation failed: name: Name is required".to_string(),
            fields,
        })
        .unwrap();

        match serde_json::from_str::<Response>(&text).unwrap() {
            Response::Failed { fields, .. } => {
                assert_eq!(fields.get("name"), Some("Name is required"))
            }
            other => panic!("Wrong response: {other:?}"),
        }

        let bare: Response =
            serde_json::from_str(r#"{"type": "Failed", "message": "Not found"}"#).unwrap();
        assert!(matches!(bare, Response::Failed { fields, .. } if fields.is_empty()));
    }
}

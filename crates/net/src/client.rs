//! TCP client for a remote data store
//!
//! The client keeps one connection open and sends one request at a time.
//! A broken connection is dropped and re-established on the next call.

use std::net::SocketAddr;

use serde::de::DeserializeOwned;
use tokio::io::{ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use hotelier_core::{
    ClientPricing, Convention, ConventionDraft, ConventionQuery, DeleteMode, Equipment,
    EquipmentDraft, EquipmentQuery, Establishment, EstablishmentDraft, EstablishmentQuery,
    EstablishmentSummary, HotelEquipment, HotelEquipmentDraft, HotelEquipmentQuery,
    MaintenanceTask, MaintenanceTaskDraft, Room, RoomCategory, RoomCategoryDraft, RoomDraft,
    RoomQuery, RoomStatistics, RoomStatus, TaskAction, TaskQuery,
};

use crate::error::{Error, Result};
use crate::frame::{read_frame, write_frame};
use crate::protocol::{Request, Response};

struct Connection {
    reader: ReadHalf<TcpStream>,
    writer: WriteHalf<TcpStream>,
}

impl Connection {
    async fn open(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (reader, writer) = tokio::io::split(stream);
        Ok(Self { reader, writer })
    }

    async fn round_trip(&mut self, request: &Request) -> Result<Response> {
        write_frame(&mut self.writer, request).await?;
        read_frame(&mut self.reader).await
    }
}

/// Client handle for store operations
pub struct Client {
    addr: SocketAddr,
    conn: Mutex<Option<Connection>>,
}

impl Client {
    /// Connect to a data store server
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        info!(addr = %addr, "Connecting to server");
        let conn = Connection::open(addr).await?;
        Ok(Client {
            addr,
            conn: Mutex::new(Some(conn)),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Send a request and wait for its response
    pub async fn call(&self, request: Request) -> Result<Response> {
        let mut slot = self.conn.lock().await;
        if slot.is_none() {
            debug!(addr = %self.addr, "Reconnecting");
            *slot = Some(Connection::open(self.addr).await?);
        }
        let Some(conn) = slot.as_mut() else {
            return Err(Error::NotConnected);
        };

        match conn.round_trip(&request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                warn!(addr = %self.addr, error = %e, "Request failed, dropping connection");
                *slot = None;
                Err(e)
            }
        }
    }

    /// Call and decode a `Data` response
    pub async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        match self.call(request).await? {
            Response::Data { payload } => Response::decode(payload)
                .map_err(|e| Error::Protocol(format!("Unexpected payload: {}", e))),
            other => Err(unexpected(other)),
        }
    }

    /// Call and expect a `Done` response
    pub async fn execute(&self, request: Request) -> Result<()> {
        match self.call(request).await? {
            Response::Done => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    pub async fn ping(&self) -> Result<()> {
        match self.call(Request::Ping).await? {
            Response::Pong => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    pub async fn list_establishments(&self, query: EstablishmentQuery) -> Result<Vec<Establishment>> {
        self.fetch(Request::ListEstablishments { query }).await
    }

    pub async fn create_establishment(&self, draft: EstablishmentDraft) -> Result<Establishment> {
        self.fetch(Request::CreateEstablishment { draft }).await
    }

    pub async fn update_establishment(
        &self,
        id: Uuid,
        draft: EstablishmentDraft,
    ) -> Result<Establishment> {
        self.fetch(Request::UpdateEstablishment { id, draft }).await
    }

    pub async fn delete_establishment(&self, id: Uuid, mode: DeleteMode) -> Result<()> {
        self.execute(Request::DeleteEstablishment { id, mode }).await
    }

    pub async fn toggle_establishment_status(&self, id: Uuid) -> Result<Establishment> {
        self.fetch(Request::ToggleEstablishmentStatus { id }).await
    }

    pub async fn establishment_summary(&self) -> Result<EstablishmentSummary> {
        self.fetch(Request::EstablishmentSummary).await
    }

    pub async fn list_rooms(&self, query: RoomQuery) -> Result<Vec<Room>> {
        self.fetch(Request::ListRooms { query }).await
    }

    pub async fn create_room(&self, draft: RoomDraft) -> Result<Room> {
        self.fetch(Request::CreateRoom { draft }).await
    }

    pub async fn update_room(&self, id: Uuid, draft: RoomDraft) -> Result<Room> {
        self.fetch(Request::UpdateRoom { id, draft }).await
    }

    pub async fn delete_room(&self, id: Uuid) -> Result<()> {
        self.execute(Request::DeleteRoom { id }).await
    }

    pub async fn set_room_status(&self, id: Uuid, status: RoomStatus) -> Result<Room> {
        self.fetch(Request::SetRoomStatus { id, status }).await
    }

    pub async fn room_statistics(&self, establishment_id: Uuid) -> Result<RoomStatistics> {
        self.fetch(Request::RoomStatistics { establishment_id }).await
    }

    pub async fn list_categories(&self) -> Result<Vec<RoomCategory>> {
        self.fetch(Request::ListCategories).await
    }

    pub async fn create_category(&self, draft: RoomCategoryDraft) -> Result<RoomCategory> {
        self.fetch(Request::CreateCategory { draft }).await
    }

    pub async fn update_category(&self, id: Uuid, draft: RoomCategoryDraft) -> Result<RoomCategory> {
        self.fetch(Request::UpdateCategory { id, draft }).await
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<()> {
        self.execute(Request::DeleteCategory { id }).await
    }

    pub async fn list_equipment(&self, query: EquipmentQuery) -> Result<Vec<Equipment>> {
        self.fetch(Request::ListEquipment { query }).await
    }

    pub async fn create_equipment(&self, draft: EquipmentDraft) -> Result<Equipment> {
        self.fetch(Request::CreateEquipment { draft }).await
    }

    pub async fn update_equipment(&self, id: Uuid, draft: EquipmentDraft) -> Result<Equipment> {
        self.fetch(Request::UpdateEquipment { id, draft }).await
    }

    pub async fn delete_equipment(&self, id: Uuid, mode: DeleteMode) -> Result<()> {
        self.execute(Request::DeleteEquipment { id, mode }).await
    }

    pub async fn list_hotel_equipment(
        &self,
        query: HotelEquipmentQuery,
    ) -> Result<Vec<HotelEquipment>> {
        self.fetch(Request::ListHotelEquipment { query }).await
    }

    pub async fn create_hotel_equipment(&self, draft: HotelEquipmentDraft) -> Result<HotelEquipment> {
        self.fetch(Request::CreateHotelEquipment { draft }).await
    }

    pub async fn update_hotel_equipment(
        &self,
        id: Uuid,
        draft: HotelEquipmentDraft,
    ) -> Result<HotelEquipment> {
        self.fetch(Request::UpdateHotelEquipment { id, draft }).await
    }

    pub async fn delete_hotel_equipment(&self, id: Uuid, mode: DeleteMode) -> Result<()> {
        self.execute(Request::DeleteHotelEquipment { id, mode }).await
    }

    pub async fn list_tasks(&self, query: TaskQuery) -> Result<Vec<MaintenanceTask>> {
        self.fetch(Request::ListTasks { query }).await
    }

    pub async fn create_task(&self, draft: MaintenanceTaskDraft) -> Result<MaintenanceTask> {
        self.fetch(Request::CreateTask { draft }).await
    }

    pub async fn update_task(&self, id: Uuid, draft: MaintenanceTaskDraft) -> Result<MaintenanceTask> {
        self.fetch(Request::UpdateTask { id, draft }).await
    }

    pub async fn apply_task_action(&self, id: Uuid, action: TaskAction) -> Result<MaintenanceTask> {
        self.fetch(Request::ApplyTaskAction { id, action }).await
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<()> {
        self.execute(Request::DeleteTask { id }).await
    }

    pub async fn list_conventions(&self, query: ConventionQuery) -> Result<Vec<Convention>> {
        self.fetch(Request::ListConventions { query }).await
    }

    pub async fn create_convention(&self, draft: ConventionDraft) -> Result<Convention> {
        self.fetch(Request::CreateConvention { draft }).await
    }

    pub async fn update_convention(&self, id: Uuid, draft: ConventionDraft) -> Result<Convention> {
        self.fetch(Request::UpdateConvention { id, draft }).await
    }

    pub async fn set_convention_active(&self, id: Uuid, active: bool) -> Result<Convention> {
        self.fetch(Request::SetConventionActive { id, active }).await
    }

    pub async fn delete_convention(&self, id: Uuid) -> Result<()> {
        self.execute(Request::DeleteConvention { id }).await
    }

    pub async fn save_client_pricing(&self, pricing: ClientPricing) -> Result<Vec<Convention>> {
        self.fetch(Request::SaveClientPricing { pricing }).await
    }
}

/// Turn a response of the wrong shape into an error
fn unexpected(response: Response) -> Error {
    match response {
        Response::Failed { message, fields } => Error::Remote { message, fields },
        Response::Fault { message } => Error::Server(message),
        other => Error::Protocol(format!("Unexpected response: {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::Server;
    use hotelier_core::{Database, RoomType};

    async fn loopback() -> (Server, Client) {
        let db = Database::open_in_memory().unwrap();
        let server = Server::start(SocketAddr::from(([127, 0, 0, 1], 0)), db)
            .await
            .unwrap();
        let client = Client::connect(server.addr()).await.unwrap();
        (server, client)
    }

    #[tokio::test]
    async fn test_loopback_round_trip() {
        let (server, client) = loopback().await;
        client.ping().await.unwrap();

        let est = client
            .create_establishment(EstablishmentDraft::new(
                "Résidence des Lilas",
                "8 rue des Lilas",
                "33000",
                "Bordeaux",
            ))
            .await
            .unwrap();
        let room = client
            .create_room(RoomDraft::new(est.id, "12", RoomType::Family))
            .await
            .unwrap();
        assert_eq!(room.details.price, 85.0);

        let rooms = client
            .list_rooms(RoomQuery::for_establishment(est.id))
            .await
            .unwrap();
        assert_eq!(rooms.len(), 1);

        let toggled = client.toggle_establishment_status(est.id).await.unwrap();
        assert!(!toggled.is_active());

        client.delete_establishment(est.id, DeleteMode::Hard).await.unwrap();
        assert!(client
            .list_rooms(RoomQuery::default())
            .await
            .unwrap()
            .is_empty());

        server.shutdown();
    }

    #[tokio::test]
    async fn test_rejection_carries_server_message() {
        let (server, client) = loopback().await;

        let err = client
            .delete_room(Uuid::new_v4())
            .await
            .unwrap_err();
        match err {
            Error::Remote { message, .. } => assert!(message.starts_with("Not found")),
            other => panic!("Wrong error: {other:?}"),
        }

        let err = client
            .create_category(RoomCategoryDraft::new("  ", 0))
            .await
            .unwrap_err();
        match err {
            Error::Remote { fields, .. } => {
                assert!(fields.contains("name"));
                assert!(fields.contains("capacity"));
            }
            other => panic!("Wrong error: {other:?}"),
        }

        // The connection survives a refused request
        assert!(client.list_categories().await.unwrap().is_empty());
        server.shutdown();
    }
    #[tokio::test]
    async fn test_nil_id_is_refused_without_affecting_others() {
        let (server, client) = loopback().await;
        let other = Client::connect(server.addr()).await.unwrap();

        let err = client
            .create_room(RoomDraft::new(Uuid::nil(), "1", RoomType::Double))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Remote { ref message, .. } if message.starts_with("Not found")));

        assert!(other.list_categories().await.unwrap().is_empty());
        assert!(client.list_categories().await.unwrap().is_empty());
        server.shutdown();
    }
}

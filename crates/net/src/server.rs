//! TCP server exposing a store to remote clients
//!
//! Each connection is served by its own task. Requests are answered in the
//! order they arrive; store access is serialized behind a mutex that is
//! released before any response is written.

use std::net::SocketAddr;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use hotelier_core::{Error as StoreError, Storage};

use crate::error::{Error, Result};
use crate::frame::{read_frame, write_frame};
use crate::protocol::{Request, Response};

/// Data store server handle
pub struct Server {
    addr: SocketAddr,
    shutdown_tx: broadcast::Sender<()>,
}

impl Server {
    /// Bind `addr` and start serving `store`
    pub async fn start<S>(addr: SocketAddr, store: S) -> Result<Self>
    where
        S: Storage + Send + 'static,
    {
        let listener = TcpListener::bind(addr).await?;
        let bound_addr = listener.local_addr()?;

        info!(addr = %bound_addr, "Server started");

        let (shutdown_tx, _) = broadcast::channel(1);
        let store = Arc::new(Mutex::new(store));

        let shutdown_rx = shutdown_tx.subscribe();
        tokio::spawn(accept_loop(listener, store, shutdown_tx.clone(), shutdown_rx));

        Ok(Server {
            addr: bound_addr,
            shutdown_tx,
        })
    }

    /// Get the server's bound address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and close the open ones
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
        info!("Server shutdown initiated");
    }
}

/// Accept incoming connections
async fn accept_loop<S>(
    listener: TcpListener,
    store: Arc<Mutex<S>>,
    shutdown_tx: broadcast::Sender<()>,
    mut shutdown_rx: broadcast::Receiver<()>,
) where
    S: Storage + Send + 'static,
{
    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, addr)) => {
                        debug!(addr = %addr, "New connection");
                        let store = store.clone();
                        let conn_shutdown = shutdown_tx.subscribe();
                        tokio::spawn(handle_connection(stream, addr, store, conn_shutdown));
                    }
                    Err(e) => {
                        error!(error = %e, "Accept failed");
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                info!("Accept loop shutting down");
                break;
            }
        }
    }
}

/// Serve requests from a single client until it disconnects
async fn handle_connection<S>(
    stream: TcpStream,
    addr: SocketAddr,
    store: Arc<Mutex<S>>,
    mut shutdown_rx: broadcast::Receiver<()>,
) where
    S: Storage + Send + 'static,
{
    let (mut reader, mut writer) = tokio::io::split(stream);

    loop {
        let request: Request = tokio::select! {
            frame = read_frame(&mut reader) => match frame {
                Ok(request) => request,
                Err(Error::ConnectionClosed) => {
                    debug!(addr = %addr, "Connection closed");
                    break;
                }
                Err(e) => {
                    warn!(addr = %addr, error = %e, "Read error");
                    break;
                }
            },
            _ = shutdown_rx.recv() => {
                debug!(addr = %addr, "Closing connection on shutdown");
                break;
            }
        };

        let response = answer(&store, request);

        if let Err(e) = write_frame(&mut writer, &response).await {
            debug!(addr = %addr, error = %e, "Write failed");
            break;
        }
    }
}

/// Run one request under the store lock. A request that panics is answered
/// with a fault and leaves the store usable for the next one.
fn answer<S: Storage>(store: &Mutex<S>, request: Request) -> Response {
    let guard = store.lock().unwrap_or_else(|poisoned| {
        warn!("Store lock was poisoned, recovering");
        poisoned.into_inner()
    });
    match panic::catch_unwind(AssertUnwindSafe(|| dispatch(&*guard, request))) {
        Ok(response) => response,
        Err(_) => {
            error!("Request handler panicked");
            Response::Fault {
                message: "Internal error while handling the request".to_string(),
            }
        }
    }
}

fn reply<T: Serialize>(result: hotelier_core::Result<T>) -> Response {
    match result.and_then(|value| Response::data(&value).map_err(StoreError::from)) {
        Ok(response) => response,
        Err(e) => failure(e),
    }
}

fn done(result: hotelier_core::Result<()>) -> Response {
    match result {
        Ok(()) => Response::Done,
        Err(e) => failure(e),
    }
}

fn failure(err: StoreError) -> Response {
    if err.is_rejection() {
        debug!(error = %err, "Request refused");
        let fields = match &err {
            StoreError::Validation(fields) => fields.clone(),
            _ => Default::default(),
        };
        Response::Failed {
            message: err.to_string(),
            fields,
        }
    } else {
        error!(error = %err, "Store failure");
        Response::Fault {
            message: err.to_string(),
        }
    }
}

/// Run one request against the store
pub fn dispatch<S: Storage>(store: &S, request: Request) -> Response {
    match request {
        Request::ListEstablishments { query } => reply(store.list_establishments(&query)),
        Request::CreateEstablishment { draft } => reply(store.create_establishment(draft)),
        Request::UpdateEstablishment { id, draft } => {
            reply(store.update_establishment(id, draft))
        }
        Request::DeleteEstablishment { id, mode } => done(store.delete_establishment(id, mode)),
        Request::ToggleEstablishmentStatus { id } => {
            reply(store.toggle_establishment_status(id))
        }
        Request::EstablishmentSummary => reply(store.establishment_summary()),

        Request::ListRooms { query } => reply(store.list_rooms(&query)),
        Request::CreateRoom { draft } => reply(store.create_room(draft)),
        Request::UpdateRoom { id, draft } => reply(store.update_room(id, draft)),
        Request::DeleteRoom { id } => done(store.delete_room(id)),
        Request::SetRoomStatus { id, status } => reply(store.set_room_status(id, status)),
        Request::RoomStatistics { establishment_id } => {
            reply(store.room_statistics(establishment_id))
        }

        Request::ListCategories => reply(store.list_categories()),
        Request::CreateCategory { draft } => reply(store.create_category(draft)),
        Request::UpdateCategory { id, draft } => reply(store.update_category(id, draft)),
        Request::DeleteCategory { id } => done(store.delete_category(id)),

        Request::ListEquipment { query } => reply(store.list_equipment(&query)),
        Request::CreateEquipment { draft } => reply(store.create_equipment(draft)),
        Request::UpdateEquipment { id, draft } => reply(store.update_equipment(id, draft)),
        Request::DeleteEquipment { id, mode } => done(store.delete_equipment(id, mode)),

        Request::ListHotelEquipment { query } => reply(store.list_hotel_equipment(&query)),
        Request::CreateHotelEquipment { draft } => reply(store.create_hotel_equipment(draft)),
        Request::UpdateHotelEquipment { id, draft } => {
            reply(store.update_hotel_equipment(id, draft))
        }
        Request::DeleteHotelEquipment { id, mode } => {
            done(store.delete_hotel_equipment(id, mode))
        }

        Request::ListTasks { query } => reply(store.list_tasks(&query)),
        Request::CreateTask { draft } => reply(store.create_task(draft)),
        Request::UpdateTask { id, draft } => reply(store.update_task(id, draft)),
        Request::ApplyTaskAction { id, action } => reply(store.apply_task_action(id, action)),
        Request::DeleteTask { id } => done(store.delete_task(id)),

        Request::ListConventions { query } => reply(store.list_conventions(&query)),
        Request::CreateConvention { draft } => reply(store.create_convention(draft)),
        Request::UpdateConvention { id, draft } => reply(store.update_convention(id, draft)),
        Request::SetConventionActive { id, active } => {
            reply(store.set_convention_active(id, active))
        }
        Request::DeleteConvention { id } => done(store.delete_convention(id)),
        Request::SaveClientPricing { pricing } => reply(store.save_client_pricing(pricing)),

        Request::Ping => Response::Pong,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotelier_core::{Database, EstablishmentDraft, EstablishmentQuery, RoomDraft, RoomType};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_server_start() {
        let db = Database::open_in_memory().unwrap();
        let server = Server::start(SocketAddr::from(([127, 0, 0, 1], 0)), db)
            .await
            .unwrap();

        assert!(server.addr().port() > 0);
        server.shutdown();
    }

    #[test]
    fn test_dispatch_maps_outcomes() {
        let db = Database::open_in_memory().unwrap();

        let created = dispatch(
            &db,
            Request::CreateEstablishment {
                draft: EstablishmentDraft::new("Le Relais", "3 rue Haute", "69001", "Lyon"),
            },
        );
        assert!(matches!(created, Response::Data { .. }));

        let listed = dispatch(
            &db,
            Request::ListEstablishments {
                query: EstablishmentQuery::default(),
            },
        );
        match listed {
            Response::Data { payload } => assert_eq!(payload.as_array().map(Vec::len), Some(1)),
            other => panic!("Wrong response: {other:?}"),
        }

        let invalid = dispatch(
            &db,
            Request::CreateEstablishment {
                draft: EstablishmentDraft::new("", "3 rue Haute", "690", "Lyon"),
            },
        );
        match invalid {
            Response::Failed { fields, .. } => {
                assert!(fields.contains("name"));
                assert!(fields.contains("postal_code"));
            }
            other => panic!("Wrong response: {other:?}"),
        }

        let missing = dispatch(&db, Request::DeleteRoom { id: Uuid::new_v4() });
        assert!(matches!(missing, Response::Failed { fields, .. } if fields.is_empty()));

        assert!(matches!(dispatch(&db, Request::Ping), Response::Pong));
    }

    #[test]
    fn test_poisoned_store_still_answers() {
        let store = Arc::new(Mutex::new(Database::open_in_memory().unwrap()));

        let holder = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.lock().unwrap();
            panic!("handler failed while holding the store");
        })
        .join();
        assert!(store.is_poisoned());

        let created = answer(
            &store,
            Request::CreateRoom {
                draft: RoomDraft::new(Uuid::nil(), "1", RoomType::Double),
            },
        );
        assert!(matches!(created, Response::Failed { .. }));
        assert!(matches!(
            answer(&store, Request::ListCategories),
            Response::Data { .. }
        ));
    }
}

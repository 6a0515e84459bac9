//! Hotelier Network Library
//!
//! Gives remote back-office screens access to a store over TCP.
//!
//! # Architecture
//!
//! - **Server**: Owns the store, answers requests from any number of clients
//! - **Client**: Connects to a server and issues typed store calls
//! - **Protocol**: Length-prefixed JSON requests and responses
//!
//! # Usage
//!
//! ```ignore
//! let server = Server::start(addr, Database::open(path)?).await?;
//!
//! let client = Client::connect(server.addr()).await?;
//! let hotels = client.list_establishments(EstablishmentQuery::default()).await?;
//! ```

pub mod client;
pub mod error;
mod frame;
pub mod protocol;
pub mod server;

pub use client::Client;
pub use error::{Error, Result};
pub use protocol::{Request, Response};
pub use server::{dispatch, Server};

/// Default port for Hotelier store servers
pub const DEFAULT_PORT: u16 = 7331;

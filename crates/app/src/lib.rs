//! Hotelier - hotel back-office
//!
//! Screen state machines for establishments, rooms, categories, equipment,
//! maintenance and client conventions, running against a local store or a
//! remote store server through [`api::HotelApi`].

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod screens;
pub mod state;

pub use api::{ApiError, ApiResult, HotelApi, LocalApi, RemoteApi};
pub use config::{AppConfig, ConfigError};
pub use error::{AppError, Result};
pub use notify::{NoticeKind, Notifier, RecordingNotifier, TracingNotifier};
pub use state::ScreenContext;

//! Hotelier Core Library
//!
//! Core models, validation, occupancy and pricing logic, list filtering,
//! and storage for the Hotelier back-office.

pub mod error;
pub mod filters;
pub mod invariants;
pub mod models;
pub mod occupancy;
pub mod pricing;
pub mod queries;
pub mod storage;
pub mod validation;

pub use error::{Error, Result};
pub use filters::*;
pub use models::*;
pub use occupancy::{occupancy_rate, EstablishmentSummary, RoomStatistics};
pub use pricing::{PricingBook, STANDARD_DEFAULT_PRICE};
pub use queries::*;
pub use storage::{
    CategoryRepository, ConventionRepository, Database, EquipmentRepository,
    EstablishmentRepository, RoomRepository, Storage, TaskRepository,
};
pub use validation::FieldErrors;

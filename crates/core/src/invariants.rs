//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use crate::models::{Convention, Establishment, HotelEquipment, MaintenanceTask, TaskStatus};
use crate::occupancy::occupancy_rate;

/// Validate that an establishment's room counts are consistent
pub fn assert_establishment_invariants(est: &Establishment) {
    debug_assert!(
        est.details.occupied_rooms <= est.details.total_rooms,
        "Establishment {} has {} occupied rooms out of {}",
        est.id,
        est.details.occupied_rooms,
        est.details.total_rooms
    );

    // Stored rate must follow the counts it was derived from
    debug_assert_eq!(
        est.stored_occupancy_rate,
        occupancy_rate(est.details.total_rooms, est.details.occupied_rooms),
        "Establishment {} carries a stale occupancy rate",
        est.id
    );
}

/// Validate that a free offer carries no surcharge
pub fn assert_hotel_equipment_invariants(offer: &HotelEquipment) {
    debug_assert!(
        !(offer.details.is_free && offer.details.surcharge.is_some()),
        "Free equipment offer {} has a surcharge",
        offer.id
    );
}

/// Validate that the completion timestamp matches the task status
pub fn assert_task_invariants(task: &MaintenanceTask) {
    debug_assert_eq!(
        task.completed_at.is_some(),
        task.details.status == TaskStatus::Done,
        "Task {} has status {:?} but completed_at {:?}",
        task.id,
        task.details.status,
        task.completed_at
    );
}

/// Validate that stored overrides are all usable prices
pub fn assert_convention_invariants(convention: &Convention) {
    debug_assert!(
        convention.details.monthly_prices.values().all(|p| *p > 0.0),
        "Convention {} keeps a non-positive month override",
        convention.id
    );

    debug_assert!(
        convention
            .details
            .ends_on
            .map_or(true, |end| end >= convention.details.starts_on),
        "Convention {} ends before it starts",
        convention.id
    );
}

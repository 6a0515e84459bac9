//! Occupancy and room statistics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{round_cents, Establishment, Room, RoomStatus, RoomType};

/// Percentage of occupied rooms, rounded half up; 0 when there are no rooms
pub fn occupancy_rate(total: u32, occupied: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let total = u64::from(total);
    let occupied = u64::from(occupied);
    ((occupied * 200 + total) / (2 * total)) as u32
}

/// Figures derived from the rooms of one establishment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomStatistics {
    pub total_rooms: u32,
    pub available_rooms: u32,
    pub occupied_rooms: u32,
    pub maintenance_rooms: u32,
    pub occupancy_rate: u32,
    pub average_price: f64,
    pub rooms_by_type: BTreeMap<RoomType, u32>,
    /// Rooms without a floor are counted on the ground floor (0)
    pub rooms_by_floor: BTreeMap<i32, u32>,
    /// Sum of the prices of rooms that can currently be let
    pub potential_revenue: f64,
}

impl RoomStatistics {
    pub fn from_rooms(rooms: &[Room]) -> Self {
        let mut stats = RoomStatistics::default();
        let mut price_sum = 0.0;

        for room in rooms {
            let details = &room.details;
            stats.total_rooms += 1;
            match details.status {
                RoomStatus::Available => {
                    stats.available_rooms += 1;
                    stats.potential_revenue += details.price;
                }
                RoomStatus::Occupied => stats.occupied_rooms += 1,
                RoomStatus::Maintenance => stats.maintenance_rooms += 1,
            }
            price_sum += details.price;
            *stats.rooms_by_type.entry(details.kind).or_default() += 1;
            *stats
                .rooms_by_floor
                .entry(details.floor.unwrap_or(0))
                .or_default() += 1;
        }

        if stats.total_rooms > 0 {
            stats.average_price = round_cents(price_sum / f64::from(stats.total_rooms));
        }
        stats.potential_revenue = round_cents(stats.potential_revenue);
        stats.occupancy_rate = occupancy_rate(stats.total_rooms, stats.occupied_rooms);
        stats
    }
}

/// Portfolio-wide counts over a set of establishments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstablishmentSummary {
    pub establishments: u32,
    pub active: u32,
    pub total_rooms: u32,
    pub occupied_rooms: u32,
    pub occupancy_rate: u32,
}

impl EstablishmentSummary {
    pub fn from_establishments(establishments: &[Establishment]) -> Self {
        let mut summary = EstablishmentSummary::default();
        for est in establishments {
            summary.establishments += 1;
            if est.is_active() {
                summary.active += 1;
            }
            summary.total_rooms = summary.total_rooms.saturating_add(est.details.total_rooms);
            summary.occupied_rooms = summary
                .occupied_rooms
                .saturating_add(est.details.occupied_rooms);
        }
        summary.occupancy_rate = occupancy_rate(summary.total_rooms, summary.occupied_rooms);
        summary
    }
}

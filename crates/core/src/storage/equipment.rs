//! Equipment catalogue and hotel-equipment storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::clause::WhereClause;
use super::parse::{parse_datetime, parse_enum, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::{Equipment, EquipmentDraft, HotelEquipment, HotelEquipmentDraft};
use crate::queries::{EquipmentQuery, HotelEquipmentQuery};

const EQUIPMENT_COLUMNS: &str =
    "id, name, category, description, icon, is_active, display_order, created_at, updated_at";

const OFFER_COLUMNS: &str = "id, establishment_id, equipment_id, is_available, is_free, surcharge,
     specific_description, usage_conditions, internal_notes, created_at, updated_at";

pub struct EquipmentStore<'a> {
    conn: &'a Connection,
}

impl<'a> EquipmentStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn map_equipment(row: &Row<'_>) -> rusqlite::Result<Equipment> {
        Ok(Equipment {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            details: EquipmentDraft {
                name: row.get(1)?,
                category: parse_enum(&row.get::<_, String>(2)?)?,
                description: row.get(3)?,
                icon: row.get(4)?,
                is_active: row.get::<_, i32>(5)? != 0,
                display_order: row.get(6)?,
            },
            created_at: parse_datetime(&row.get::<_, String>(7)?)?,
            updated_at: parse_datetime(&row.get::<_, String>(8)?)?,
        })
    }

    fn map_offer(row: &Row<'_>) -> rusqlite::Result<HotelEquipment> {
        Ok(HotelEquipment {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            details: HotelEquipmentDraft {
                establishment_id: parse_uuid(&row.get::<_, String>(1)?)?,
                equipment_id: parse_uuid(&row.get::<_, String>(2)?)?,
                is_available: row.get::<_, i32>(3)? != 0,
                is_free: row.get::<_, i32>(4)? != 0,
                surcharge: row.get(5)?,
                specific_description: row.get(6)?,
                usage_conditions: row.get(7)?,
                internal_notes: row.get(8)?,
            },
            created_at: parse_datetime(&row.get::<_, String>(9)?)?,
            updated_at: parse_datetime(&row.get::<_, String>(10)?)?,
        })
    }

    // ==================== Catalogue ====================

    #[instrument(skip(self, equipment), fields(name = %equipment.details.name))]
    pub fn create(&self, equipment: &Equipment) -> Result<()> {
        let d = &equipment.details;
        self.conn.execute(
            &format!(
                "INSERT INTO equipment ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                EQUIPMENT_COLUMNS
            ),
            params![
                equipment.id.to_string(),
                d.name,
                d.category.as_str(),
                d.description,
                d.icon,
                d.is_active as i32,
                d.display_order,
                equipment.created_at.to_rfc3339(),
                equipment.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Equipment>> {
        let equipment = self
            .conn
            .query_row(
                &format!("SELECT {} FROM equipment WHERE id = ?1", EQUIPMENT_COLUMNS),
                params![id.to_string()],
                Self::map_equipment,
            )
            .optional()?;
        Ok(equipment)
    }

    /// Catalogue in display order
    #[instrument(skip(self))]
    pub fn list(&self, query: &EquipmentQuery) -> Result<Vec<Equipment>> {
        let mut clause = WhereClause::new();
        clause
            .eq("category", query.category.map(|c| c.as_str()))
            .eq("is_active", query.is_active.map(i32::from));

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM equipment{} ORDER BY display_order, name COLLATE NOCASE",
            EQUIPMENT_COLUMNS,
            clause.sql()
        ))?;
        let items = stmt
            .query_map(clause.params().as_slice(), Self::map_equipment)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    #[instrument(skip(self, equipment), fields(id = %equipment.id))]
    pub fn update(&self, equipment: &Equipment) -> Result<()> {
        let d = &equipment.details;
        self.conn.execute(
            "UPDATE equipment SET name = ?1, category = ?2, description = ?3, icon = ?4,
                 is_active = ?5, display_order = ?6, updated_at = ?7
             WHERE id = ?8",
            params![
                d.name,
                d.category.as_str(),
                d.description,
                d.icon,
                d.is_active as i32,
                d.display_order,
                equipment.updated_at.to_rfc3339(),
                equipment.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Remove from the catalogue along with every offer of it
    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.conn
            .execute("DELETE FROM equipment WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }

    // ==================== Hotel offers ====================

    #[instrument(skip(self, offer), fields(establishment_id = %offer.details.establishment_id))]
    pub fn create_offer(&self, offer: &HotelEquipment) -> Result<()> {
        let d = &offer.details;
        self.conn.execute(
            &format!(
                "INSERT INTO hotel_equipment ({})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                OFFER_COLUMNS
            ),
            params![
                offer.id.to_string(),
                d.establishment_id.to_string(),
                d.equipment_id.to_string(),
                d.is_available as i32,
                d.is_free as i32,
                d.surcharge,
                d.specific_description,
                d.usage_conditions,
                d.internal_notes,
                offer.created_at.to_rfc3339(),
                offer.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find_offer(&self, id: Uuid) -> Result<Option<HotelEquipment>> {
        let offer = self
            .conn
            .query_row(
                &format!("SELECT {} FROM hotel_equipment WHERE id = ?1", OFFER_COLUMNS),
                params![id.to_string()],
                Self::map_offer,
            )
            .optional()?;
        Ok(offer)
    }

    /// Offer of one equipment item at one establishment, if any
    #[instrument(skip(self))]
    pub fn find_offer_for(
        &self,
        establishment_id: Uuid,
        equipment_id: Uuid,
    ) -> Result<Option<HotelEquipment>> {
        let offer = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM hotel_equipment WHERE establishment_id = ?1 AND equipment_id = ?2",
                    OFFER_COLUMNS
                ),
                params![establishment_id.to_string(), equipment_id.to_string()],
                Self::map_offer,
            )
            .optional()?;
        Ok(offer)
    }

    #[instrument(skip(self))]
    pub fn list_offers(&self, query: &HotelEquipmentQuery) -> Result<Vec<HotelEquipment>> {
        let mut clause = WhereClause::new();
        clause
            .eq("establishment_id", query.establishment_id.map(|id| id.to_string()))
            .eq("equipment_id", query.equipment_id.map(|id| id.to_string()))
            .eq("is_available", query.is_available.map(i32::from));

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM hotel_equipment{} ORDER BY created_at",
            OFFER_COLUMNS,
            clause.sql()
        ))?;
        let offers = stmt
            .query_map(clause.params().as_slice(), Self::map_offer)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(offers)
    }

    #[instrument(skip(self, offer), fields(id = %offer.id))]
    pub fn update_offer(&self, offer: &HotelEquipment) -> Result<()> {
        let d = &offer.details;
        self.conn.execute(
            "UPDATE hotel_equipment SET establishment_id = ?1, equipment_id = ?2,
                 is_available = ?3, is_free = ?4, surcharge = ?5, specific_description = ?6,
                 usage_conditions = ?7, internal_notes = ?8, updated_at = ?9
             WHERE id = ?10",
            params![
                d.establishment_id.to_string(),
                d.equipment_id.to_string(),
                d.is_available as i32,
                d.is_free as i32,
                d.surcharge,
                d.specific_description,
                d.usage_conditions,
                d.internal_notes,
                offer.updated_at.to_rfc3339(),
                offer.id.to_string(),
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn delete_offer(&self, id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM hotel_equipment WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(())
    }
}

//! Establishment storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::clause::WhereClause;
use super::parse::{parse_datetime, parse_enum, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::{Establishment, EstablishmentDraft, EstablishmentStatus};
use crate::queries::EstablishmentQuery;

const COLUMNS: &str = "id, name, address, postal_code, city, phone, email, website, manager,
     manager_phone, manager_email, status, kind, total_rooms, occupied_rooms, occupancy_rate,
     siret, vat_number, star_rating, description, check_in_time, check_out_time,
     created_at, updated_at";

pub struct EstablishmentStore<'a> {
    conn: &'a Connection,
}

impl<'a> EstablishmentStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Establishment> {
        Ok(Establishment {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            details: EstablishmentDraft {
                name: row.get(1)?,
                address: row.get(2)?,
                postal_code: row.get(3)?,
                city: row.get(4)?,
                phone: row.get(5)?,
                email: row.get(6)?,
                website: row.get(7)?,
                manager: row.get(8)?,
                manager_phone: row.get(9)?,
                manager_email: row.get(10)?,
                status: parse_enum(&row.get::<_, String>(11)?)?,
                kind: parse_enum(&row.get::<_, String>(12)?)?,
                total_rooms: row.get(13)?,
                occupied_rooms: row.get(14)?,
                siret: row.get(16)?,
                vat_number: row.get(17)?,
                star_rating: row.get(18)?,
                description: row.get(19)?,
                check_in_time: row.get(20)?,
                check_out_time: row.get(21)?,
            },
            stored_occupancy_rate: row.get(15)?,
            created_at: parse_datetime(&row.get::<_, String>(22)?)?,
            updated_at: parse_datetime(&row.get::<_, String>(23)?)?,
        })
    }

    /// Create a new establishment
    #[instrument(skip(self, est), fields(name = %est.details.name))]
    pub fn create(&self, est: &Establishment) -> Result<()> {
        let d = &est.details;
        self.conn.execute(
            &format!(
                "INSERT INTO establishments ({})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                         ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24)",
                COLUMNS
            ),
            params![
                est.id.to_string(),
                d.name,
                d.address,
                d.postal_code,
                d.city,
                d.phone,
                d.email,
                d.website,
                d.manager,
                d.manager_phone,
                d.manager_email,
                d.status.as_str(),
                d.kind.as_str(),
                d.total_rooms,
                d.occupied_rooms,
                est.stored_occupancy_rate,
                d.siret,
                d.vat_number,
                d.star_rating,
                d.description,
                d.check_in_time,
                d.check_out_time,
                est.created_at.to_rfc3339(),
                est.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find establishment by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Establishment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM establishments WHERE id = ?1", COLUMNS))?;
        let est = stmt
            .query_row(params![id.to_string()], Self::map_row)
            .optional()?;
        Ok(est)
    }

    /// List establishments matching the query, by name
    #[instrument(skip(self))]
    pub fn list(&self, query: &EstablishmentQuery) -> Result<Vec<Establishment>> {
        let mut clause = WhereClause::new();
        clause
            .eq("status", query.status.map(|s| s.as_str()))
            .eq("kind", query.kind.map(|k| k.as_str()))
            .eq_nocase(
                "city",
                query
                    .city
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string),
            );

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM establishments{} ORDER BY name COLLATE NOCASE",
            COLUMNS,
            clause.sql()
        ))?;
        let list = stmt
            .query_map(clause.params().as_slice(), Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(list)
    }

    /// Rewrite every editable column
    #[instrument(skip(self, est), fields(id = %est.id))]
    pub fn update(&self, est: &Establishment) -> Result<()> {
        let d = &est.details;
        self.conn.execute(
            "UPDATE establishments SET name = ?1, address = ?2, postal_code = ?3, city = ?4,
                 phone = ?5, email = ?6, website = ?7, manager = ?8, manager_phone = ?9,
                 manager_email = ?10, status = ?11, kind = ?12, total_rooms = ?13,
                 occupied_rooms = ?14, occupancy_rate = ?15, siret = ?16, vat_number = ?17,
                 star_rating = ?18, description = ?19, check_in_time = ?20,
                 check_out_time = ?21, updated_at = ?22
             WHERE id = ?23",
            params![
                d.name,
                d.address,
                d.postal_code,
                d.city,
                d.phone,
                d.email,
                d.website,
                d.manager,
                d.manager_phone,
                d.manager_email,
                d.status.as_str(),
                d.kind.as_str(),
                d.total_rooms,
                d.occupied_rooms,
                est.stored_occupancy_rate,
                d.siret,
                d.vat_number,
                d.star_rating,
                d.description,
                d.check_in_time,
                d.check_out_time,
                est.updated_at.to_rfc3339(),
                est.id.to_string(),
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn set_status(&self, id: Uuid, status: EstablishmentStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE establishments SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), chrono::Utc::now().to_rfc3339(), id.to_string()],
        )?;
        Ok(())
    }

    /// Delete establishment; rooms, offers and tasks go with it
    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM establishments WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EstablishmentType;
    use crate::storage::Database;

    fn draft(name: &str, city: &str) -> EstablishmentDraft {
        let mut d = EstablishmentDraft::new(name, "1 rue de la Paix", "75002", city);
        d.total_rooms = 20;
        d.occupied_rooms = 5;
        d.star_rating = Some(3);
        d
    }

    #[test]
    fn test_create_and_find() {
        let db = Database::open_in_memory().unwrap();
        let est = Establishment::new(draft("Le Grand", "Paris"));
        db.establishments().create(&est).unwrap();

        let found = db.establishments().find_by_id(est.id).unwrap().unwrap();
        assert_eq!(found.details, est.details);
        assert_eq!(found.stored_occupancy_rate, 25);
        assert!(db.establishments().find_by_id(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_list_filters() {
        let db = Database::open_in_memory().unwrap();
        let store = db.establishments();
        let mut residence = draft("Les Tilleuls", "Lyon");
        residence.kind = EstablishmentType::Residence;
        store.create(&Establishment::new(draft("Zénith", "Paris"))).unwrap();
        store.create(&Establishment::new(draft("Azur", "Paris"))).unwrap();
        store.create(&Establishment::new(residence)).unwrap();

        let all = store.list(&EstablishmentQuery::default()).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].details.name, "Azur");

        let paris = store
            .list(&EstablishmentQuery {
                city: Some("PARIS".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(paris.len(), 2);

        let residences = store
            .list(&EstablishmentQuery {
                kind: Some(EstablishmentType::Residence),
                status: Some(EstablishmentStatus::Active),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(residences.len(), 1);
    }

    #[test]
    fn test_update_and_status() {
        let db = Database::open_in_memory().unwrap();
        let store = db.establishments();
        let mut est = Establishment::new(draft("Le Grand", "Paris"));
        store.create(&est).unwrap();

        let mut changed = est.details.clone();
        changed.occupied_rooms = 20;
        est.apply(changed);
        store.update(&est).unwrap();
        store.set_status(est.id, EstablishmentStatus::Inactive).unwrap();

        let found = store.find_by_id(est.id).unwrap().unwrap();
        assert_eq!(found.stored_occupancy_rate, 100);
        assert_eq!(found.details.status, EstablishmentStatus::Inactive);

        store.delete(est.id).unwrap();
        assert!(store.find_by_id(est.id).unwrap().is_none());
    }
}

//! Convention storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::clause::WhereClause;
use super::parse::{
    format_date, parse_date, parse_date_opt, parse_datetime, parse_json, parse_uuid,
    parse_uuid_opt, OptionalExt,
};
use crate::error::Result;
use crate::models::{Convention, ConventionDraft};
use crate::queries::ConventionQuery;

const COLUMNS: &str = "id, client_name, category_id, establishment_id, starts_on, ends_on,
     default_price, monthly_prices, discount_percent, monthly_flat_rate, conditions, active,
     created_at, updated_at";

pub struct ConventionStore<'a> {
    conn: &'a Connection,
}

impl<'a> ConventionStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Convention> {
        Ok(Convention {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            details: ConventionDraft {
                client_name: row.get(1)?,
                category_id: parse_uuid(&row.get::<_, String>(2)?)?,
                establishment_id: parse_uuid_opt(row.get(3)?)?,
                starts_on: parse_date(&row.get::<_, String>(4)?)?,
                ends_on: parse_date_opt(row.get(5)?)?,
                default_price: row.get(6)?,
                monthly_prices: parse_json(&row.get::<_, String>(7)?)?,
                discount_percent: row.get(8)?,
                monthly_flat_rate: row.get(9)?,
                conditions: row.get(10)?,
                active: row.get::<_, i32>(11)? != 0,
            },
            created_at: parse_datetime(&row.get::<_, String>(12)?)?,
            updated_at: parse_datetime(&row.get::<_, String>(13)?)?,
        })
    }

    #[instrument(skip(self, convention), fields(client = %convention.details.client_name))]
    pub fn create(&self, convention: &Convention) -> Result<()> {
        let d = &convention.details;
        self.conn.execute(
            &format!(
                "INSERT INTO conventions ({})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                COLUMNS
            ),
            params![
                convention.id.to_string(),
                d.client_name,
                d.category_id.to_string(),
                d.establishment_id.map(|e| e.to_string()),
                format_date(d.starts_on),
                d.ends_on.map(format_date),
                d.default_price,
                serde_json::to_string(&d.monthly_prices)?,
                d.discount_percent,
                d.monthly_flat_rate,
                d.conditions,
                d.active as i32,
                convention.created_at.to_rfc3339(),
                convention.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Convention>> {
        let convention = self
            .conn
            .query_row(
                &format!("SELECT {} FROM conventions WHERE id = ?1", COLUMNS),
                params![id.to_string()],
                Self::map_row,
            )
            .optional()?;
        Ok(convention)
    }

    #[instrument(skip(self))]
    pub fn list(&self, query: &ConventionQuery) -> Result<Vec<Convention>> {
        let mut clause = WhereClause::new();
        clause
            .eq_nocase(
                "client_name",
                query
                    .client_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string),
            )
            .eq("category_id", query.category_id.map(|id| id.to_string()))
            .eq("establishment_id", query.establishment_id.map(|id| id.to_string()))
            .eq("active", query.active.map(i32::from));

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM conventions{} ORDER BY client_name COLLATE NOCASE, starts_on",
            COLUMNS,
            clause.sql()
        ))?;
        let conventions = stmt
            .query_map(clause.params().as_slice(), Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(conventions)
    }

    #[instrument(skip(self, convention), fields(id = %convention.id))]
    pub fn update(&self, convention: &Convention) -> Result<()> {
        let d = &convention.details;
        self.conn.execute(
            "UPDATE conventions SET client_name = ?1, category_id = ?2, establishment_id = ?3,
                 starts_on = ?4, ends_on = ?5, default_price = ?6, monthly_prices = ?7,
                 discount_percent = ?8, monthly_flat_rate = ?9, conditions = ?10, active = ?11,
                 updated_at = ?12
             WHERE id = ?13",
            params![
                d.client_name,
                d.category_id.to_string(),
                d.establishment_id.map(|e| e.to_string()),
                format_date(d.starts_on),
                d.ends_on.map(format_date),
                d.default_price,
                serde_json::to_string(&d.monthly_prices)?,
                d.discount_percent,
                d.monthly_flat_rate,
                d.conditions,
                d.active as i32,
                convention.updated_at.to_rfc3339(),
                convention.id.to_string(),
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.conn
            .execute("DELETE FROM conventions WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Month, MonthlyPrices, RoomCategory, RoomCategoryDraft};
    use crate::storage::Database;
    use chrono::NaiveDate;

    #[test]
    fn test_convention_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let category = RoomCategory::new(RoomCategoryDraft::new("Double", 2));
        db.categories().create(&category).unwrap();

        let mut monthly = MonthlyPrices::new();
        monthly.insert(Month::August, 90.0);
        let convention = Convention::new(ConventionDraft {
            client_name: "Samu Social".to_string(),
            category_id: category.id,
            establishment_id: None,
            starts_on: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            ends_on: None,
            default_price: 55.0,
            monthly_prices: monthly,
            discount_percent: Some(5.0),
            monthly_flat_rate: None,
            conditions: Some("Breakfast included".to_string()),
            active: true,
        });
        db.conventions().create(&convention).unwrap();

        let found = db.conventions().find_by_id(convention.id).unwrap().unwrap();
        assert_eq!(found.details, convention.details);

        let listed = db
            .conventions()
            .list(&ConventionQuery {
                client_name: Some("samu social".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(listed.len(), 1);

        db.categories().delete(category.id).unwrap();
        assert!(db.conventions().find_by_id(convention.id).unwrap().is_none());
    }
}

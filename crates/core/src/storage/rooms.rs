//! Room storage operations
//!
//! Amenities and images live in JSON columns. Rows written by older tools
//! may hold plain strings or `{name}`/`{value}` objects; reads normalize
//! them and writes always use the object form.

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::clause::WhereClause;
use super::parse::{parse_datetime, parse_enum, parse_json, parse_uuid, parse_uuid_opt, OptionalExt};
use crate::error::Result;
use crate::models::list_entry::{normalize, to_stored};
use crate::models::{ListEntry, Room, RoomDraft, RoomStatus};
use crate::queries::RoomQuery;

const COLUMNS: &str = "id, establishment_id, category_id, number, kind, price, status, floor, size,
     description, bed_type, view, amenities, images, created_at, updated_at";

pub struct RoomStore<'a> {
    conn: &'a Connection,
}

fn read_list(raw: &str) -> rusqlite::Result<Vec<String>> {
    let entries: Option<Vec<ListEntry>> = parse_json(raw)?;
    Ok(normalize(entries.unwrap_or_default()))
}

fn write_list(items: &[String]) -> Result<String> {
    Ok(serde_json::to_string(&to_stored(items))?)
}

impl<'a> RoomStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Room> {
        Ok(Room {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            details: RoomDraft {
                establishment_id: parse_uuid(&row.get::<_, String>(1)?)?,
                category_id: parse_uuid_opt(row.get(2)?)?,
                number: row.get(3)?,
                kind: parse_enum(&row.get::<_, String>(4)?)?,
                price: row.get(5)?,
                status: parse_enum(&row.get::<_, String>(6)?)?,
                floor: row.get(7)?,
                size: row.get(8)?,
                description: row.get(9)?,
                bed_type: row.get(10)?,
                view: row.get(11)?,
                amenities: read_list(&row.get::<_, String>(12)?)?,
                images: read_list(&row.get::<_, String>(13)?)?,
            },
            created_at: parse_datetime(&row.get::<_, String>(14)?)?,
            updated_at: parse_datetime(&row.get::<_, String>(15)?)?,
        })
    }

    /// Create a new room
    #[instrument(skip(self, room), fields(number = %room.details.number))]
    pub fn create(&self, room: &Room) -> Result<()> {
        let d = &room.details;
        self.conn.execute(
            &format!(
                "INSERT INTO rooms ({})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                COLUMNS
            ),
            params![
                room.id.to_string(),
                d.establishment_id.to_string(),
                d.category_id.map(|c| c.to_string()),
                d.number,
                d.kind.as_str(),
                d.price,
                d.status.as_str(),
                d.floor,
                d.size,
                d.description,
                d.bed_type,
                d.view,
                write_list(&d.amenities)?,
                write_list(&d.images)?,
                room.created_at.to_rfc3339(),
                room.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find room by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Room>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM rooms WHERE id = ?1", COLUMNS))?;
        let room = stmt
            .query_row(params![id.to_string()], Self::map_row)
            .optional()?;
        Ok(room)
    }

    /// Find a room by its number within an establishment
    #[instrument(skip(self))]
    pub fn find_by_number(&self, establishment_id: Uuid, number: &str) -> Result<Option<Room>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM rooms WHERE establishment_id = ?1 AND number = ?2",
            COLUMNS
        ))?;
        let room = stmt
            .query_row(params![establishment_id.to_string(), number], Self::map_row)
            .optional()?;
        Ok(room)
    }

    /// List rooms matching the query, by establishment then number
    #[instrument(skip(self))]
    pub fn list(&self, query: &RoomQuery) -> Result<Vec<Room>> {
        let mut clause = WhereClause::new();
        clause
            .eq("establishment_id", query.establishment_id.map(|id| id.to_string()))
            .eq("category_id", query.category_id.map(|id| id.to_string()))
            .eq("status", query.status.map(|s| s.as_str()))
            .eq("kind", query.kind.map(|k| k.as_str()));

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM rooms{} ORDER BY establishment_id, length(number), number",
            COLUMNS,
            clause.sql()
        ))?;
        let rooms = stmt
            .query_map(clause.params().as_slice(), Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rooms)
    }

    /// Rewrite every editable column
    #[instrument(skip(self, room), fields(id = %room.id))]
    pub fn update(&self, room: &Room) -> Result<()> {
        let d = &room.details;
        self.conn.execute(
            "UPDATE rooms SET establishment_id = ?1, category_id = ?2, number = ?3, kind = ?4,
                 price = ?5, status = ?6, floor = ?7, size = ?8, description = ?9,
                 bed_type = ?10, view = ?11, amenities = ?12, images = ?13, updated_at = ?14
             WHERE id = ?15",
            params![
                d.establishment_id.to_string(),
                d.category_id.map(|c| c.to_string()),
                d.number,
                d.kind.as_str(),
                d.price,
                d.status.as_str(),
                d.floor,
                d.size,
                d.description,
                d.bed_type,
                d.view,
                write_list(&d.amenities)?,
                write_list(&d.images)?,
                room.updated_at.to_rfc3339(),
                room.id.to_string(),
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn set_status(&self, id: Uuid, status: RoomStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE rooms SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), chrono::Utc::now().to_rfc3339(), id.to_string()],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.conn
            .execute("DELETE FROM rooms WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }
}

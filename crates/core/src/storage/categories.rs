//! Room category storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::{RoomCategory, RoomCategoryDraft};

pub struct CategoryStore<'a> {
    conn: &'a Connection,
}

impl<'a> CategoryStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<RoomCategory> {
        Ok(RoomCategory {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            details: RoomCategoryDraft {
                name: row.get(1)?,
                capacity: row.get(2)?,
                surface_area: row.get(3)?,
                description: row.get(4)?,
            },
            created_at: parse_datetime(&row.get::<_, String>(5)?)?,
            updated_at: parse_datetime(&row.get::<_, String>(6)?)?,
        })
    }

    #[instrument(skip(self, category), fields(name = %category.details.name))]
    pub fn create(&self, category: &RoomCategory) -> Result<()> {
        let d = &category.details;
        self.conn.execute(
            "INSERT INTO room_categories (id, name, capacity, surface_area, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                category.id.to_string(),
                d.name,
                d.capacity,
                d.surface_area,
                d.description,
                category.created_at.to_rfc3339(),
                category.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<RoomCategory>> {
        let category = self
            .conn
            .query_row(
                "SELECT id, name, capacity, surface_area, description, created_at, updated_at
                 FROM room_categories WHERE id = ?1",
                params![id.to_string()],
                Self::map_row,
            )
            .optional()?;
        Ok(category)
    }

    /// All categories, smallest capacity first
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<RoomCategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, capacity, surface_area, description, created_at, updated_at
             FROM room_categories ORDER BY capacity, name COLLATE NOCASE",
        )?;
        let categories = stmt
            .query_map([], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    #[instrument(skip(self, category), fields(id = %category.id))]
    pub fn update(&self, category: &RoomCategory) -> Result<()> {
        let d = &category.details;
        self.conn.execute(
            "UPDATE room_categories SET name = ?1, capacity = ?2, surface_area = ?3,
                 description = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                d.name,
                d.capacity,
                d.surface_area,
                d.description,
                category.updated_at.to_rfc3339(),
                category.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Rooms keep existing but lose their category; conventions are removed
    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM room_categories WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    #[test]
    fn test_category_crud() {
        let db = Database::open_in_memory().unwrap();
        let store = db.categories();
        let family = RoomCategory::new(RoomCategoryDraft::new("Family", 4));
        let mut single = RoomCategory::new(RoomCategoryDraft::new("Single", 1));
        store.create(&family).unwrap();
        store.create(&single).unwrap();

        let names: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|c| c.details.name)
            .collect();
        assert_eq!(names, vec!["Single", "Family"]);

        let mut draft = single.details.clone();
        draft.surface_area = Some(12.5);
        single.apply(draft);
        store.update(&single).unwrap();
        assert_eq!(
            store.find_by_id(single.id).unwrap().unwrap().details.surface_area,
            Some(12.5)
        );

        store.delete(family.id).unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }
}

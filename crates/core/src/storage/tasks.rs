//! Maintenance task storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::clause::WhereClause;
use super::parse::{
    format_date, parse_date_opt, parse_datetime, parse_datetime_opt, parse_enum, parse_uuid,
    parse_uuid_opt, OptionalExt,
};
use crate::error::Result;
use crate::models::{MaintenanceTask, MaintenanceTaskDraft};
use crate::queries::TaskQuery;

const COLUMNS: &str = "id, establishment_id, room_id, title, description, priority, assignee,
     due_date, status, notes, completed_at, created_at, updated_at";

pub struct TaskStore<'a> {
    conn: &'a Connection,
}

impl<'a> TaskStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<MaintenanceTask> {
        Ok(MaintenanceTask {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            details: MaintenanceTaskDraft {
                establishment_id: parse_uuid(&row.get::<_, String>(1)?)?,
                room_id: parse_uuid_opt(row.get(2)?)?,
                title: row.get(3)?,
                description: row.get(4)?,
                priority: parse_enum(&row.get::<_, String>(5)?)?,
                assignee: row.get(6)?,
                due_date: parse_date_opt(row.get(7)?)?,
                status: parse_enum(&row.get::<_, String>(8)?)?,
                notes: row.get(9)?,
            },
            completed_at: parse_datetime_opt(row.get(10)?)?,
            created_at: parse_datetime(&row.get::<_, String>(11)?)?,
            updated_at: parse_datetime(&row.get::<_, String>(12)?)?,
        })
    }

    #[instrument(skip(self, task), fields(title = %task.details.title))]
    pub fn create(&self, task: &MaintenanceTask) -> Result<()> {
        let d = &task.details;
        self.conn.execute(
            &format!(
                "INSERT INTO maintenance_tasks ({})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                COLUMNS
            ),
            params![
                task.id.to_string(),
                d.establishment_id.to_string(),
                d.room_id.map(|r| r.to_string()),
                d.title,
                d.description,
                d.priority.as_str(),
                d.assignee,
                d.due_date.map(format_date),
                d.status.as_str(),
                d.notes,
                task.completed_at.map(|t| t.to_rfc3339()),
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<MaintenanceTask>> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {} FROM maintenance_tasks WHERE id = ?1", COLUMNS),
                params![id.to_string()],
                Self::map_row,
            )
            .optional()?;
        Ok(task)
    }

    /// Tasks matching the query; open tasks with the nearest due date first
    #[instrument(skip(self))]
    pub fn list(&self, query: &TaskQuery) -> Result<Vec<MaintenanceTask>> {
        let mut clause = WhereClause::new();
        clause
            .eq("establishment_id", query.establishment_id.map(|id| id.to_string()))
            .eq("room_id", query.room_id.map(|id| id.to_string()))
            .eq("status", query.status.map(|s| s.as_str()))
            .eq("priority", query.priority.map(|p| p.as_str()));

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM maintenance_tasks{}
             ORDER BY status IN ('done', 'cancelled'), due_date IS NULL, due_date, created_at",
            COLUMNS,
            clause.sql()
        ))?;
        let tasks = stmt
            .query_map(clause.params().as_slice(), Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Rewrite every column but the creation time
    #[instrument(skip(self, task), fields(id = %task.id))]
    pub fn update(&self, task: &MaintenanceTask) -> Result<()> {
        let d = &task.details;
        self.conn.execute(
            "UPDATE maintenance_tasks SET establishment_id = ?1, room_id = ?2, title = ?3,
                 description = ?4, priority = ?5, assignee = ?6, due_date = ?7, status = ?8,
                 notes = ?9, completed_at = ?10, updated_at = ?11
             WHERE id = ?12",
            params![
                d.establishment_id.to_string(),
                d.room_id.map(|r| r.to_string()),
                d.title,
                d.description,
                d.priority.as_str(),
                d.assignee,
                d.due_date.map(format_date),
                d.status.as_str(),
                d.notes,
                task.completed_at.map(|t| t.to_rfc3339()),
                task.updated_at.to_rfc3339(),
                task.id.to_string(),
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM maintenance_tasks WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(())
    }
}

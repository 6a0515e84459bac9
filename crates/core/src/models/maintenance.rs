//! Maintenance task model

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::establishment::blank_to_none;
use super::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "urgent" => Ok(TaskPriority::Urgent),
            other => Err(UnknownVariant::new("task priority", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Done and cancelled tasks no longer need attention
    pub fn is_closed(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Cancelled)
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "cancelled" => Ok(TaskStatus::Cancelled),
            other => Err(UnknownVariant::new("task status", other)),
        }
    }
}

/// Quick status changes offered on each task row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    Start,
    Complete,
    Cancel,
}

impl TaskAction {
    pub fn target_status(&self) -> TaskStatus {
        match self {
            TaskAction::Start => TaskStatus::InProgress,
            TaskAction::Complete => TaskStatus::Done,
            TaskAction::Cancel => TaskStatus::Cancelled,
        }
    }
}

/// Editable fields of a maintenance task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTaskDraft {
    pub establishment_id: Uuid,
    #[serde(default)]
    pub room_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    /// Responsible party
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Ignored on creation; new tasks always start pending
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MaintenanceTaskDraft {
    pub fn new(establishment_id: Uuid, title: &str) -> Self {
        Self {
            establishment_id,
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = blank_to_none(self.description.take());
        self.assignee = blank_to_none(self.assignee.take());
        self.notes = blank_to_none(self.notes.take());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: MaintenanceTaskDraft,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceTask {
    pub fn new(details: MaintenanceTaskDraft) -> Self {
        let now = Utc::now();
        let mut details = details.normalized();
        details.status = TaskStatus::Pending;
        Self {
            id: Uuid::new_v4(),
            details,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, details: MaintenanceTaskDraft) {
        let status = details.status;
        let previous = self.details.status;
        self.details = details.normalized();
        // Transition is judged from the stored status
        self.details.status = previous;
        self.set_status(status);
    }

    /// Moves the task and keeps `completed_at` in step with `Done`
    pub fn set_status(&mut self, status: TaskStatus) {
        let now = Utc::now();
        match (self.details.status == TaskStatus::Done, status == TaskStatus::Done) {
            (false, true) => self.completed_at = Some(now),
            (true, false) => self.completed_at = None,
            _ => {}
        }
        self.details.status = status;
        self.updated_at = now;
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.details.status.is_closed()
            && self.details.due_date.map_or(false, |due| due < today)
    }
}

//! Maintenance tasks of the selected establishment

use chrono::NaiveDate;
use uuid::Uuid;

use hotelier_core::validation::validate_task;
use hotelier_core::{
    DeleteMode, FieldErrors, MaintenanceTask, MaintenanceTaskDraft, TaskAction, TaskFilter,
    TaskQuery,
};

use super::{CrudScreen, Resource};
use crate::api::{ApiResult, HotelApi};

pub struct MaintenanceTasks;

impl Resource for MaintenanceTasks {
    type Item = MaintenanceTask;
    type Draft = MaintenanceTaskDraft;
    type Filter = TaskFilter;

    const TITLE: &'static str = "Task";
    const SINGULAR: &'static str = "task";
    const PLURAL: &'static str = "tasks";

    fn id(item: &MaintenanceTask) -> Uuid {
        item.id
    }

    fn blank(selected: Option<Uuid>, _today: NaiveDate) -> MaintenanceTaskDraft {
        MaintenanceTaskDraft::new(selected.unwrap_or_default(), "")
    }

    fn draft_of(item: &MaintenanceTask) -> MaintenanceTaskDraft {
        item.details.clone()
    }

    fn validate(
        draft: &MaintenanceTaskDraft,
        current: Option<&MaintenanceTask>,
        today: NaiveDate,
    ) -> FieldErrors {
        let mut errors = validate_task(draft, current, today);
        if draft.establishment_id.is_nil() {
            errors.insert("establishment_id", "Select an establishment first");
        }
        errors
    }

    async fn list<A: HotelApi>(
        api: &A,
        selected: Option<Uuid>,
    ) -> ApiResult<Vec<MaintenanceTask>> {
        let Some(establishment_id) = selected else {
            return Ok(Vec::new());
        };
        let query = TaskQuery {
            establishment_id: Some(establishment_id),
            ..Default::default()
        };
        api.list_tasks(query).await
    }

    async fn create<A: HotelApi>(
        api: &A,
        draft: MaintenanceTaskDraft,
    ) -> ApiResult<MaintenanceTask> {
        api.create_task(draft).await
    }

    async fn update<A: HotelApi>(
        api: &A,
        id: Uuid,
        draft: MaintenanceTaskDraft,
    ) -> ApiResult<MaintenanceTask> {
        api.update_task(id, draft).await
    }

    async fn delete<A: HotelApi>(api: &A, id: Uuid, _mode: DeleteMode) -> ApiResult<()> {
        api.delete_task(id).await
    }
}

pub type MaintenanceScreen<A> = CrudScreen<MaintenanceTasks, A>;

impl<A: HotelApi> CrudScreen<MaintenanceTasks, A> {
    async fn act(&mut self, id: Uuid, action: TaskAction, success: &str) -> bool {
        self.row_action(
            id,
            success,
            "Unable to update the task",
            move |api| async move { api.apply_task_action(id, action).await },
        )
        .await
    }

    pub async fn start(&mut self, id: Uuid) -> bool {
        self.act(id, TaskAction::Start, "Task started").await
    }

    pub async fn complete(&mut self, id: Uuid) -> bool {
        self.act(id, TaskAction::Complete, "Task completed").await
    }

    pub async fn cancel(&mut self, id: Uuid) -> bool {
        self.act(id, TaskAction::Cancel, "Task cancelled").await
    }

    /// Listed tasks still open past their due date
    pub fn overdue(&self) -> Vec<&MaintenanceTask> {
        let today = self.context().today();
        self.items()
            .iter()
            .filter(|task| task.is_overdue(today))
            .collect()
    }
}

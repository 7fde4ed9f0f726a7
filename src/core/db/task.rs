use serde::Serialize;
use time::OffsetDateTime;

use crate::core::db::model::TaskStatus;

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
}

pub trait TaskRepository {
    fn get_tasks(&self) -> impl Future<Output = anyhow::Result<Vec<Task>>> + Send;
    fn get_tasks_by_status(
        &self,
        status: TaskStatus,
    ) -> impl Future<Output = anyhow::Result<Vec<Task>>> + Send;
    fn get_task_by_id(&self, id: i64) -> impl Future<Output = anyhow::Result<Option<Task>>> + Send;
    fn add_task(&self, task: &NewTask) -> impl Future<Output = anyhow::Result<Task>> + Send;
    fn update_task(
        &self,
        task: &Task,
        update: &TaskUpdate,
    ) -> impl Future<Output = anyhow::Result<Task>> + Send;
    fn delete_task(&self, task: Task) -> impl Future<Output = anyhow::Result<()>> + Send;
}

use serde::Serialize;
use time::OffsetDateTime;

use crate::core::db::{
    briefing::BriefingRepository,
    comment::CommentRepository,
    model::{Page, PageRequest},
    task::TaskRepository,
};

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub client_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub client_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub client_id: Option<Option<i64>>,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

/// Repository scoped to a single project.
pub trait BoundProjectRepository: TaskRepository + CommentRepository + BriefingRepository {
    fn project_id(&self) -> i64;
    fn get_project(&self) -> impl Future<Output = anyhow::Result<Project>> + Send;
    fn update_project(
        &self,
        update: &ProjectUpdate,
    ) -> impl Future<Output = anyhow::Result<Project>> + Send;
    /// Removes the project together with its tasks, comments and briefings.
    fn delete(self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

pub trait ProjectRepository: 'static {
    type Repository: BoundProjectRepository
    where
        Self: 'static;
    fn get_project_repo(
        &self,
        id: i64,
    ) -> impl Future<Output = anyhow::Result<Self::Repository>> + Send + 'static;
    fn add_project(
        &self,
        project: &NewProject,
    ) -> impl Future<Output = anyhow::Result<Self::Repository>> + Send;
    fn get_projects(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = anyhow::Result<Page<Project>>> + Send;
    fn get_projects_for_client(
        &self,
        client_id: i64,
    ) -> impl Future<Output = anyhow::Result<Vec<Project>>> + Send;
}

use time::OffsetDateTime;

use crate::core::db::{ClientRepository, ProjectRepository};

pub struct UpdateWorkspaceSettings {
    pub name: Option<String>,
    pub created_at: Option<OffsetDateTime>,
}

pub trait WorkspaceRepository: ProjectRepository + ClientRepository {
    fn get_workspace_name(&self) -> impl Future<Output = anyhow::Result<String>> + Send;
    fn get_workspace_created_at(
        &self,
    ) -> impl Future<Output = anyhow::Result<OffsetDateTime>> + Send;
    fn set_workspace_settings(
        &self,
        settings: UpdateWorkspaceSettings,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

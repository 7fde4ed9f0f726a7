mod briefing;
mod client;
mod comment;
mod model;
mod project;
mod state;
mod task;
mod workspace;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use state::WorkspaceState;
use time::OffsetDateTime;

pub use briefing::{Briefing, BriefingRepository, NewBriefing};
pub use client::{Client, ClientRepository, ClientUpdate, NewClient};
pub use comment::{Comment, CommentRepository, NewComment};
pub use model::{Page, PageRequest, TaskStatus};
pub use project::{BoundProjectRepository, NewProject, Project, ProjectRepository, ProjectUpdate};
pub use task::{NewTask, Task, TaskRepository, TaskUpdate};
pub use workspace::{UpdateWorkspaceSettings, WorkspaceRepository};

use model::{now_timestamp, parse_timestamp};

/// Handle to an open workspace file. Cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct WorkspaceDb {
    state: Arc<WorkspaceState>,
}

impl WorkspaceDb {
    pub async fn new<P: AsRef<Path>>(workspace_file: P) -> anyhow::Result<Self> {
        Ok(Self {
            state: Arc::new(WorkspaceState::new(workspace_file).await?),
        })
    }

    /// Explicitly save the workspace to disk.
    /// This is required when dropping in an async context (e.g., tests with #[tokio::test]).
    pub async fn save_workspace(&self) -> anyhow::Result<()> {
        self.state.save().await
    }

    pub fn workspace_file(&self) -> PathBuf {
        self.state.workspace_file().to_path_buf()
    }
}

/// Repository bound to one project of a workspace.
pub struct ProjectDb {
    state: Arc<WorkspaceState>,
    project_id: i64,
}

impl std::fmt::Debug for ProjectDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectDb")
            .field("project_id", &self.project_id)
            .field("state", &self.state)
            .finish()
    }
}

#[derive(sqlx::FromRow)]
struct ClientRecord {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    company: Option<String>,
    created_at: String,
}

impl TryFrom<ClientRecord> for Client {
    type Error = anyhow::Error;

    fn try_from(record: ClientRecord) -> Result<Self, Self::Error> {
        Ok(Client {
            id: record.id,
            name: record.name,
            email: record.email,
            phone: record.phone,
            company: record.company,
            created_at: parse_timestamp(&record.created_at)?,
            _guard: (),
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProjectRecord {
    id: i64,
    client_id: Option<i64>,
    name: String,
    description: Option<String>,
    created_at: String,
}

impl TryFrom<ProjectRecord> for Project {
    type Error = anyhow::Error;

    fn try_from(record: ProjectRecord) -> Result<Self, Self::Error> {
        Ok(Project {
            id: record.id,
            client_id: record.client_id,
            name: record.name,
            description: record.description,
            created_at: parse_timestamp(&record.created_at)?,
            _guard: (),
        })
    }
}

#[derive(sqlx::FromRow)]
struct TaskRecord {
    id: i64,
    project_id: i64,
    title: String,
    description: Option<String>,
    status: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<TaskRecord> for Task {
    type Error = anyhow::Error;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        Ok(Task {
            id: record.id,
            project_id: record.project_id,
            title: record.title,
            description: record.description,
            status: TaskStatus::try_from(record.status)?,
            created_at: parse_timestamp(&record.created_at)?,
            updated_at: parse_timestamp(&record.updated_at)?,
            _guard: (),
        })
    }
}

#[derive(sqlx::FromRow)]
struct CommentRecord {
    id: i64,
    project_id: i64,
    user_id: i64,
    content: String,
    created_at: String,
}

impl TryFrom<CommentRecord> for Comment {
    type Error = anyhow::Error;

    fn try_from(record: CommentRecord) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: record.id,
            project_id: record.project_id,
            user_id: record.user_id,
            content: record.content,
            created_at: parse_timestamp(&record.created_at)?,
            _guard: (),
        })
    }
}

#[derive(sqlx::FromRow)]
struct BriefingRecord {
    id: i64,
    project_id: i64,
    title: String,
    content: String,
    created_at: String,
}

impl TryFrom<BriefingRecord> for Briefing {
    type Error = anyhow::Error;

    fn try_from(record: BriefingRecord) -> Result<Self, Self::Error> {
        Ok(Briefing {
            id: record.id,
            project_id: record.project_id,
            title: record.title,
            content: record.content,
            created_at: parse_timestamp(&record.created_at)?,
            _guard: (),
        })
    }
}

fn convert_all<R, T>(records: Vec<R>) -> anyhow::Result<Vec<T>>
where
    T: TryFrom<R, Error = anyhow::Error>,
{
    records.into_iter().map(T::try_from).collect()
}

const CLIENT_COLUMNS: &str = "id, name, email, phone, company, created_at";
const PROJECT_COLUMNS: &str = "id, client_id, name, description, created_at";
const TASK_COLUMNS: &str = "id, project_id, title, description, status, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, project_id, user_id, content, created_at";
const BRIEFING_COLUMNS: &str = "id, project_id, title, content, created_at";

impl WorkspaceRepository for WorkspaceDb {
    async fn get_workspace_name(&self) -> anyhow::Result<String> {
        let mut conn = self.state.conn().await?;
        let name = sqlx::query_scalar::<_, String>(
            r#"SELECT value FROM workspace_metadata WHERE key = 'name'"#,
        )
        .fetch_one(&mut **conn)
        .await?;
        Ok(name)
    }

    async fn get_workspace_created_at(&self) -> anyhow::Result<OffsetDateTime> {
        let mut conn = self.state.conn().await?;
        let created_at_str = sqlx::query_scalar::<_, String>(
            r#"SELECT value FROM workspace_metadata WHERE key = 'created_at'"#,
        )
        .fetch_one(&mut **conn)
        .await?;
        parse_timestamp(&created_at_str)
    }

    async fn set_workspace_settings(&self, settings: UpdateWorkspaceSettings) -> anyhow::Result<()> {
        let mut items = vec![];
        if let Some(name) = settings.name {
            items.push(("name", name));
        }
        if let Some(created_at) = settings.created_at {
            items.push((
                "created_at",
                created_at.format(&time::format_description::well_known::Rfc3339)?,
            ));
        }

        let mut conn = self.state.conn().await?;
        let mut tx = conn.begin_transaction().await?;
        for (key, value) in items {
            sqlx::query(
                r#"INSERT INTO workspace_metadata (key, value) VALUES ($1, $2)
                ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value"#,
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

impl ClientRepository for WorkspaceDb {
    async fn get_clients(&self, page: PageRequest) -> anyhow::Result<Page<Client>> {
        let mut conn = self.state.conn().await?;
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM client")
            .fetch_one(&mut **conn)
            .await?;
        let records = sqlx::query_as::<_, ClientRecord>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM client ORDER BY name COLLATE NOCASE ASC, id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut **conn)
        .await?;
        Ok(Page::new(convert_all(records)?, page, total))
    }

    async fn get_client_by_id(&self, id: i64) -> anyhow::Result<Option<Client>> {
        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, ClientRecord>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM client WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut **conn)
        .await?
        .map(Client::try_from)
        .transpose()
    }

    async fn add_client(&self, client: &NewClient) -> anyhow::Result<Client> {
        let mut conn = self.state.conn().await?;
        let created_at = now_timestamp()?;
        sqlx::query_as::<_, ClientRecord>(&format!(
            "INSERT INTO client (name, email, phone, company, created_at)
            VALUES ($1, $2, $3, $4, $5) RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.company)
        .bind(created_at)
        .fetch_one(&mut **conn)
        .await?
        .try_into()
    }

    async fn update_client(&self, client: &Client, update: &ClientUpdate) -> anyhow::Result<Client> {
        let name = update.name.as_ref().unwrap_or(&client.name);
        let email = update.email.as_ref().unwrap_or(&client.email);
        let phone = update.phone.as_ref().unwrap_or(&client.phone);
        let company = update.company.as_ref().unwrap_or(&client.company);

        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, ClientRecord>(&format!(
            "UPDATE client SET name = $1, email = $2, phone = $3, company = $4
            WHERE id = $5 RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(company)
        .bind(client.id)
        .fetch_optional(&mut **conn)
        .await?
        .with_context(|| format!("Client {} not found", client.id))?
        .try_into()
    }

    async fn delete_client(&self, client: Client) -> anyhow::Result<()> {
        let mut conn = self.state.conn().await?;
        let result = sqlx::query("DELETE FROM client WHERE id = $1")
            .bind(client.id)
            .execute(&mut **conn)
            .await?;
        if result.rows_affected() == 0 {
            anyhow::bail!("Client {} not found", client.id);
        }
        Ok(())
    }
}

impl ProjectRepository for WorkspaceDb {
    type Repository = ProjectDb;

    fn get_project_repo(
        &self,
        id: i64,
    ) -> impl Future<Output = anyhow::Result<Self::Repository>> + Send + 'static {
        let state = self.state.clone();
        async move {
            {
                let mut conn = state.conn().await?;
                sqlx::query_scalar::<_, i64>("SELECT id FROM project WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut **conn)
                    .await?
                    .with_context(|| format!("Project {} not found", id))?;
            }
            Ok(ProjectDb {
                state,
                project_id: id,
            })
        }
    }

    async fn add_project(&self, project: &NewProject) -> anyhow::Result<Self::Repository> {
        let mut conn = self.state.conn().await?;
        let created_at = now_timestamp()?;
        let project_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO project (client_id, name, description, created_at)
            VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(project.client_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(created_at)
        .fetch_one(&mut **conn)
        .await?;
        Ok(ProjectDb {
            state: self.state.clone(),
            project_id,
        })
    }

    async fn get_projects(&self, page: PageRequest) -> anyhow::Result<Page<Project>> {
        let mut conn = self.state.conn().await?;
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM project")
            .fetch_one(&mut **conn)
            .await?;
        let records = sqlx::query_as::<_, ProjectRecord>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM project ORDER BY id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut **conn)
        .await?;
        Ok(Page::new(convert_all(records)?, page, total))
    }

    async fn get_projects_for_client(&self, client_id: i64) -> anyhow::Result<Vec<Project>> {
        let mut conn = self.state.conn().await?;
        let records = sqlx::query_as::<_, ProjectRecord>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM project WHERE client_id = $1 ORDER BY id ASC"
        ))
        .bind(client_id)
        .fetch_all(&mut **conn)
        .await?;
        convert_all(records)
    }
}

impl BoundProjectRepository for ProjectDb {
    fn project_id(&self) -> i64 {
        self.project_id
    }

    async fn get_project(&self) -> anyhow::Result<Project> {
        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, ProjectRecord>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM project WHERE id = $1"
        ))
        .bind(self.project_id)
        .fetch_optional(&mut **conn)
        .await?
        .with_context(|| format!("Project {} not found", self.project_id))?
        .try_into()
    }

    async fn update_project(&self, update: &ProjectUpdate) -> anyhow::Result<Project> {
        let current = self.get_project().await?;
        let client_id = update.client_id.unwrap_or(current.client_id);
        let name = update.name.as_ref().unwrap_or(&current.name);
        let description = update.description.as_ref().unwrap_or(&current.description);

        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, ProjectRecord>(&format!(
            "UPDATE project SET client_id = $1, name = $2, description = $3
            WHERE id = $4 RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(client_id)
        .bind(name)
        .bind(description)
        .bind(self.project_id)
        .fetch_one(&mut **conn)
        .await?
        .try_into()
    }

    async fn delete(self) -> anyhow::Result<()> {
        let mut conn = self.state.conn().await?;
        sqlx::query("DELETE FROM project WHERE id = $1")
            .bind(self.project_id)
            .execute(&mut **conn)
            .await?;
        Ok(())
    }
}

impl TaskRepository for ProjectDb {
    async fn get_tasks(&self) -> anyhow::Result<Vec<Task>> {
        let mut conn = self.state.conn().await?;
        let records = sqlx::query_as::<_, TaskRecord>(&format!(
            "SELECT {TASK_COLUMNS} FROM task WHERE project_id = $1 ORDER BY id ASC"
        ))
        .bind(self.project_id)
        .fetch_all(&mut **conn)
        .await?;
        convert_all(records)
    }

    async fn get_tasks_by_status(&self, status: TaskStatus) -> anyhow::Result<Vec<Task>> {
        let mut conn = self.state.conn().await?;
        let records = sqlx::query_as::<_, TaskRecord>(&format!(
            "SELECT {TASK_COLUMNS} FROM task WHERE project_id = $1 AND status = $2 ORDER BY id ASC"
        ))
        .bind(self.project_id)
        .bind(i64::from(status))
        .fetch_all(&mut **conn)
        .await?;
        convert_all(records)
    }

    async fn get_task_by_id(&self, id: i64) -> anyhow::Result<Option<Task>> {
        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, TaskRecord>(&format!(
            "SELECT {TASK_COLUMNS} FROM task WHERE project_id = $1 AND id = $2"
        ))
        .bind(self.project_id)
        .bind(id)
        .fetch_optional(&mut **conn)
        .await?
        .map(Task::try_from)
        .transpose()
    }

    async fn add_task(&self, task: &NewTask) -> anyhow::Result<Task> {
        let mut conn = self.state.conn().await?;
        let now = now_timestamp()?;
        sqlx::query_as::<_, TaskRecord>(&format!(
            "INSERT INTO task (project_id, title, description, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5) RETURNING {TASK_COLUMNS}"
        ))
        .bind(self.project_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(i64::from(TaskStatus::Pending))
        .bind(now)
        .fetch_one(&mut **conn)
        .await?
        .try_into()
    }

    async fn update_task(&self, task: &Task, update: &TaskUpdate) -> anyhow::Result<Task> {
        let title = update.title.as_ref().unwrap_or(&task.title);
        let description = update.description.as_ref().unwrap_or(&task.description);
        let status = update.status.unwrap_or(task.status);
        let now = now_timestamp()?;

        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, TaskRecord>(&format!(
            "UPDATE task SET title = $1, description = $2, status = $3, updated_at = $4
            WHERE project_id = $5 AND id = $6 RETURNING {TASK_COLUMNS}"
        ))
        .bind(title)
        .bind(description)
        .bind(i64::from(status))
        .bind(now)
        .bind(self.project_id)
        .bind(task.id)
        .fetch_optional(&mut **conn)
        .await?
        .with_context(|| format!("Task {} not found in project {}", task.id, self.project_id))?
        .try_into()
    }

    async fn delete_task(&self, task: Task) -> anyhow::Result<()> {
        let mut conn = self.state.conn().await?;
        let result = sqlx::query("DELETE FROM task WHERE project_id = $1 AND id = $2")
            .bind(self.project_id)
            .bind(task.id)
            .execute(&mut **conn)
            .await?;
        if result.rows_affected() == 0 {
            anyhow::bail!("Task {} not found in project {}", task.id, self.project_id);
        }
        Ok(())
    }
}

impl CommentRepository for ProjectDb {
    async fn get_comments(&self) -> anyhow::Result<Vec<Comment>> {
        let mut conn = self.state.conn().await?;
        let records = sqlx::query_as::<_, CommentRecord>(&format!(
            // Newest first; ids grow with insertion order.
            "SELECT {COMMENT_COLUMNS} FROM comment WHERE project_id = $1 ORDER BY id DESC"
        ))
        .bind(self.project_id)
        .fetch_all(&mut **conn)
        .await?;
        convert_all(records)
    }

    async fn get_comment_by_id(&self, id: i64) -> anyhow::Result<Option<Comment>> {
        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, CommentRecord>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comment WHERE project_id = $1 AND id = $2"
        ))
        .bind(self.project_id)
        .bind(id)
        .fetch_optional(&mut **conn)
        .await?
        .map(Comment::try_from)
        .transpose()
    }

    async fn add_comment(&self, comment: &NewComment) -> anyhow::Result<Comment> {
        let mut conn = self.state.conn().await?;
        let created_at = now_timestamp()?;
        sqlx::query_as::<_, CommentRecord>(&format!(
            "INSERT INTO comment (project_id, user_id, content, created_at)
            VALUES ($1, $2, $3, $4) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(self.project_id)
        .bind(comment.user_id)
        .bind(&comment.content)
        .bind(created_at)
        .fetch_one(&mut **conn)
        .await?
        .try_into()
    }

    async fn update_comment_content(&self, comment: &Comment, content: &str) -> anyhow::Result<Comment> {
        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, CommentRecord>(&format!(
            "UPDATE comment SET content = $1 WHERE project_id = $2 AND id = $3
            RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(content)
        .bind(self.project_id)
        .bind(comment.id)
        .fetch_optional(&mut **conn)
        .await?
        .with_context(|| {
            format!("Comment {} not found in project {}", comment.id, self.project_id)
        })?
        .try_into()
    }

    async fn delete_comment(&self, comment: Comment) -> anyhow::Result<()> {
        let mut conn = self.state.conn().await?;
        let result = sqlx::query("DELETE FROM comment WHERE project_id = $1 AND id = $2")
            .bind(self.project_id)
            .bind(comment.id)
            .execute(&mut **conn)
            .await?;
        if result.rows_affected() == 0 {
            anyhow::bail!("Comment {} not found in project {}", comment.id, self.project_id);
        }
        Ok(())
    }
}

impl BriefingRepository for ProjectDb {
    async fn get_briefings(&self) -> anyhow::Result<Vec<Briefing>> {
        let mut conn = self.state.conn().await?;
        let records = sqlx::query_as::<_, BriefingRecord>(&format!(
            "SELECT {BRIEFING_COLUMNS} FROM briefing WHERE project_id = $1 ORDER BY id ASC"
        ))
        .bind(self.project_id)
        .fetch_all(&mut **conn)
        .await?;
        convert_all(records)
    }

    async fn add_briefing(&self, briefing: &NewBriefing) -> anyhow::Result<Briefing> {
        let mut conn = self.state.conn().await?;
        let created_at = now_timestamp()?;
        sqlx::query_as::<_, BriefingRecord>(&format!(
            "INSERT INTO briefing (project_id, title, content, created_at)
            VALUES ($1, $2, $3, $4) RETURNING {BRIEFING_COLUMNS}"
        ))
        .bind(self.project_id)
        .bind(&briefing.title)
        .bind(&briefing.content)
        .bind(created_at)
        .fetch_one(&mut **conn)
        .await?
        .try_into()
    }

    async fn delete_briefing(&self, briefing: Briefing) -> anyhow::Result<()> {
        let mut conn = self.state.conn().await?;
        sqlx::query("DELETE FROM briefing WHERE project_id = $1 AND id = $2")
            .bind(self.project_id)
            .bind(briefing.id)
            .execute(&mut **conn)
            .await?;
        Ok(())
    }
}

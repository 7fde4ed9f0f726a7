//! Mutation actions.
//!
//! Every action validates its input, performs one create/update/delete against
//! the workspace and reports the outcome as an [`ActionResult`]. Actions never
//! return `Err`: failures are logged and folded into the envelope so the UI
//! only has one shape to handle.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::db::{
    BoundProjectRepository, BriefingRepository, ClientRepository, CommentRepository, NewBriefing,
    NewClient, NewComment, NewProject, NewTask, ProjectRepository, TaskRepository, TaskStatus,
    TaskUpdate, WorkspaceDb,
};
use crate::core::selection::{
    CommentContentPatch, CommentSelection, TaskDetailsPatch, TaskSelection,
};
use crate::core::validation::{self, FieldErrors, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    /// Row id of the created record, for create actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: None,
            id: None,
        }
    }

    pub fn created(message: impl Into<String>, id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::ok(message)
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
            id: None,
        }
    }

    pub fn invalid(error: ValidationError) -> Self {
        Self {
            errors: Some(error.0),
            ..Self::failed("Please correct the highlighted fields")
        }
    }
}

fn finish(action: &'static str, result: anyhow::Result<ActionResult>) -> ActionResult {
    match result {
        Ok(outcome) => {
            tracing::info!(action, message = %outcome.message, "mutation succeeded");
            outcome
        }
        Err(e) => {
            tracing::error!(action, error = %format!("{e:#}"), "mutation failed");
            ActionResult::failed(format!("Failed to {action}"))
        }
    }
}

/// Mutations the detail panel can trigger on the selected item.
///
/// Futures are `'static` so the UI runtime can drive them after the call returns.
pub trait MutationActions {
    fn update_task_status(
        &self,
        task: &TaskSelection,
        status: TaskStatus,
    ) -> impl Future<Output = ActionResult> + Send + 'static;
    fn edit_task(
        &self,
        task: &TaskSelection,
        details: TaskDetailsPatch,
    ) -> impl Future<Output = ActionResult> + Send + 'static;
    fn delete_task(&self, task: &TaskSelection)
    -> impl Future<Output = ActionResult> + Send + 'static;
    fn edit_comment(
        &self,
        comment: &CommentSelection,
        patch: CommentContentPatch,
    ) -> impl Future<Output = ActionResult> + Send + 'static;
    fn delete_comment(
        &self,
        comment: &CommentSelection,
    ) -> impl Future<Output = ActionResult> + Send + 'static;
}

impl MutationActions for WorkspaceDb {
    fn update_task_status(
        &self,
        task: &TaskSelection,
        status: TaskStatus,
    ) -> impl Future<Output = ActionResult> + Send + 'static {
        let db = self.clone();
        let (project_id, task_id) = (task.project_id, task.id);
        async move {
            let result = async {
                let project = db.get_project_repo(project_id).await?;
                let task = project
                    .get_task_by_id(task_id)
                    .await?
                    .with_context(|| format!("Task {task_id} not found"))?;
                let update = TaskUpdate {
                    status: Some(status),
                    ..Default::default()
                };
                project.update_task(&task, &update).await?;
                anyhow::Ok(ActionResult::ok(format!("Task marked {status}")))
            }
            .await;
            finish("update task status", result)
        }
    }

    fn edit_task(
        &self,
        task: &TaskSelection,
        details: TaskDetailsPatch,
    ) -> impl Future<Output = ActionResult> + Send + 'static {
        let db = self.clone();
        let (project_id, task_id) = (task.project_id, task.id);
        let details = details.normalized();
        async move {
            if let Err(e) = validation::validate_task_details(&details) {
                tracing::warn!(task_id, error = %e, "task edit rejected");
                return ActionResult::invalid(e);
            }
            let result = async {
                let project = db.get_project_repo(project_id).await?;
                let task = project
                    .get_task_by_id(task_id)
                    .await?
                    .with_context(|| format!("Task {task_id} not found"))?;
                let update = TaskUpdate {
                    title: Some(details.title.clone()),
                    description: Some(details.description.clone()),
                    status: None,
                };
                project.update_task(&task, &update).await?;
                anyhow::Ok(ActionResult::ok("Task updated"))
            }
            .await;
            finish("update task", result)
        }
    }

    fn delete_task(
        &self,
        task: &TaskSelection,
    ) -> impl Future<Output = ActionResult> + Send + 'static {
        let db = self.clone();
        let (project_id, task_id) = (task.project_id, task.id);
        async move {
            let result = async {
                let project = db.get_project_repo(project_id).await?;
                let task = project
                    .get_task_by_id(task_id)
                    .await?
                    .with_context(|| format!("Task {task_id} not found"))?;
                project.delete_task(task).await?;
                anyhow::Ok(ActionResult::ok("Task deleted"))
            }
            .await;
            finish("delete task", result)
        }
    }

    fn edit_comment(
        &self,
        comment: &CommentSelection,
        patch: CommentContentPatch,
    ) -> impl Future<Output = ActionResult> + Send + 'static {
        let db = self.clone();
        let (project_id, comment_id) = (comment.project_id, comment.id);
        async move {
            if let Err(e) = validation::validate_comment_content(&patch) {
                tracing::warn!(comment_id, error = %e, "comment edit rejected");
                return ActionResult::invalid(e);
            }
            let result = async {
                let project = db.get_project_repo(project_id).await?;
                let comment = project
                    .get_comment_by_id(comment_id)
                    .await?
                    .with_context(|| format!("Comment {comment_id} not found"))?;
                project.update_comment_content(&comment, &patch.content).await?;
                anyhow::Ok(ActionResult::ok("Comment updated"))
            }
            .await;
            finish("update comment", result)
        }
    }

    fn delete_comment(
        &self,
        comment: &CommentSelection,
    ) -> impl Future<Output = ActionResult> + Send + 'static {
        let db = self.clone();
        let (project_id, comment_id) = (comment.project_id, comment.id);
        async move {
            let result = async {
                let project = db.get_project_repo(project_id).await?;
                let comment = project
                    .get_comment_by_id(comment_id)
                    .await?
                    .with_context(|| format!("Comment {comment_id} not found"))?;
                project.delete_comment(comment).await?;
                anyhow::Ok(ActionResult::ok("Comment deleted"))
            }
            .await;
            finish("delete comment", result)
        }
    }
}

/// Create/delete actions used by list screens and the CLI.
impl WorkspaceDb {
    pub async fn create_client(&self, client: NewClient) -> ActionResult {
        if let Err(e) = validation::validate_client(&client) {
            return ActionResult::invalid(e);
        }
        let result = async {
            let client = self.add_client(&client).await?;
            anyhow::Ok(ActionResult::created(
                format!("Client \"{}\" created", client.name),
                client.id,
            ))
        }
        .await;
        finish("create client", result)
    }

    pub async fn remove_client(&self, client_id: i64) -> ActionResult {
        let result = async {
            let client = self
                .get_client_by_id(client_id)
                .await?
                .with_context(|| format!("Client {client_id} not found"))?;
            self.delete_client(client).await?;
            anyhow::Ok(ActionResult::ok("Client deleted"))
        }
        .await;
        finish("delete client", result)
    }

    pub async fn create_project(&self, project: NewProject) -> ActionResult {
        if let Err(e) = validation::validate_project(&project) {
            return ActionResult::invalid(e);
        }
        let result = async {
            if let Some(client_id) = project.client_id {
                self.get_client_by_id(client_id)
                    .await?
                    .with_context(|| format!("Client {client_id} not found"))?;
            }
            let repo = self.add_project(&project).await?;
            anyhow::Ok(ActionResult::created(
                format!("Project \"{}\" created", project.name),
                repo.project_id(),
            ))
        }
        .await;
        finish("create project", result)
    }

    pub async fn remove_project(&self, project_id: i64) -> ActionResult {
        let result = async {
            self.get_project_repo(project_id).await?.delete().await?;
            anyhow::Ok(ActionResult::ok("Project deleted"))
        }
        .await;
        finish("delete project", result)
    }

    pub async fn create_task(&self, project_id: i64, task: NewTask) -> ActionResult {
        if let Err(e) = validation::validate_task(&task) {
            return ActionResult::invalid(e);
        }
        let result = async {
            let task = self.get_project_repo(project_id).await?.add_task(&task).await?;
            anyhow::Ok(ActionResult::created("Task created", task.id))
        }
        .await;
        finish("create task", result)
    }

    pub async fn create_comment(&self, project_id: i64, comment: NewComment) -> ActionResult {
        if let Err(e) = validation::validate_comment(&comment) {
            return ActionResult::invalid(e);
        }
        let result = async {
            let comment = self
                .get_project_repo(project_id)
                .await?
                .add_comment(&comment)
                .await?;
            anyhow::Ok(ActionResult::created("Comment added", comment.id))
        }
        .await;
        finish("add comment", result)
    }

    pub async fn create_briefing(&self, project_id: i64, briefing: NewBriefing) -> ActionResult {
        if let Err(e) = validation::validate_briefing(&briefing) {
            return ActionResult::invalid(e);
        }
        let result = async {
            let briefing = self
                .get_project_repo(project_id)
                .await?
                .add_briefing(&briefing)
                .await?;
            anyhow::Ok(ActionResult::created("Briefing created", briefing.id))
        }
        .await;
        finish("create briefing", result)
    }
}

use taskly::core::db::{
    NewClient, NewComment, NewProject, NewTask, ProjectDb,
    ProjectRepository, WorkspaceDb,
};
use taskly::core::db::TaskStatus;
use taskly::core::selection::{CommentSelection, TaskSelection};
use time::OffsetDateTime;

/// Creates a WorkspaceDb backed by a temporary tar.zst file.
/// Returns both the workspace and the temp directory (which must be kept alive).
pub async fn create_test_workspace() -> (WorkspaceDb, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("test.taskly");
    let workspace = WorkspaceDb::new(&path)
        .await
        .expect("Failed to create test workspace");
    (workspace, dir)
}

/// Adds a project without a client and returns its bound repository.
pub async fn create_test_project(workspace: &WorkspaceDb, name: &str) -> ProjectDb {
    workspace
        .add_project(&make_new_project(name, None))
        .await
        .expect("Failed to create test project")
}

pub fn make_new_client(name: &str, email: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        company: None,
    }
}

pub fn make_new_project(name: &str, client_id: Option<i64>) -> NewProject {
    NewProject {
        client_id,
        name: name.to_string(),
        description: None,
    }
}

pub fn make_new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: Some(format!("{title} description")),
    }
}

pub fn make_new_comment(user_id: i64, content: &str) -> NewComment {
    NewComment {
        user_id,
        content: content.to_string(),
    }
}

/// A task selection that does not need a database row.
pub fn task_selection(id: i64, title: &str) -> TaskSelection {
    TaskSelection {
        id,
        project_id: 1,
        title: title.to_string(),
        description: None,
        status: TaskStatus::Pending,
    }
}

/// A comment selection that does not need a database row.
pub fn comment_selection(id: i64, content: &str) -> CommentSelection {
    CommentSelection {
        id,
        project_id: 1,
        content: content.to_string(),
        created_at: OffsetDateTime::UNIX_EPOCH,
        user_id: 7,
    }
}


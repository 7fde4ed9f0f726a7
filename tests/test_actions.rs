//! Integration tests for mutation actions.
//!
//! Tests cover:
//! - Result envelopes for successful, invalid and failed actions
//! - Mutations of the selected task or comment against a workspace
//! - Action results surviving a save/load cycle

mod common;

use taskly::core::actions::{ActionResult, MutationActions};
use taskly::core::selection::{CommentContentPatch, TaskDetailsPatch, TaskSelection};

use common::*;

#[tokio::test]
async fn test_create_client_reports_id() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;

    let result = workspace
        .create_client(make_new_client("Acme", "hello@acme.test"))
        .await;

    assert!(result.success, "{}", result.message);
    assert_eq!(result.message, "Client \"Acme\" created");
    assert!(result.errors.is_none());
    let client_id = result.id.expect("created id");
    assert!(workspace.get_client_by_id(client_id).await?.is_some());

    Ok(())
}

#[tokio::test]
async fn test_invalid_client_is_not_stored() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;

    let result = workspace.create_client(make_new_client("  ", "not-an-email")).await;

    assert!(!result.success);
    assert_eq!(result.message, "Please correct the highlighted fields");
    assert_eq!(result.id, None);
    let errors = result.errors.expect("field errors");
    assert_eq!(errors.get("name"), Some(&["is required".to_string()][..]));
    assert!(errors.get("email").is_some());
    assert!(errors.get("phone").is_none());
    assert_eq!(workspace.get_clients(PageRequest::default()).await?.total, 0);

    Ok(())
}

#[tokio::test]
async fn test_project_for_missing_client_fails() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;

    let result = workspace
        .create_project(make_new_project("Website", Some(42)))
        .await;

    assert_eq!(result, ActionResult::failed("Failed to create project"));
    assert_eq!(workspace.get_projects(PageRequest::default()).await?.total, 0);

    Ok(())
}

#[tokio::test]
async fn test_create_task_comment_and_briefing() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let project_id = workspace
        .create_project(make_new_project("Website", None))
        .await
        .id
        .expect("project id");

    let task = workspace.create_task(project_id, make_new_task("Wireframes")).await;
    assert!(task.success, "{}", task.message);
    let comment = workspace
        .create_comment(project_id, make_new_comment(3, "<p>Kickoff notes</p>"))
        .await;
    assert!(comment.success, "{}", comment.message);
    let briefing = workspace
        .create_briefing(
            project_id,
            NewBriefing {
                title: "Scope".to_string(),
                content: "<p>Five pages</p>".to_string(),
            },
        )
        .await;
    assert!(briefing.success, "{}", briefing.message);

    let project = workspace.get_project_repo(project_id).await?;
    assert_eq!(project.get_tasks().await?[0].id, task.id.expect("task id"));
    assert_eq!(project.get_comments().await?[0].id, comment.id.expect("comment id"));
    assert_eq!(project.get_briefings().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_blank_comment_is_rejected() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let project = create_test_project(&workspace, "Website").await;

    let result = workspace
        .create_comment(project.project_id(), make_new_comment(3, "<p> &nbsp; </p>"))
        .await;

    assert!(!result.success);
    assert!(result.errors.expect("field errors").get("content").is_some());
    assert!(project.get_comments().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_task_in_missing_project_fails() {
    let (workspace, _temp_dir) = create_test_workspace().await;

    let result = workspace.create_task(42, make_new_task("Lost")).await;

    assert_eq!(result, ActionResult::failed("Failed to create task"));
}

#[tokio::test]
async fn test_remove_missing_rows_fails() {
    let (workspace, _temp_dir) = create_test_workspace().await;

    assert!(!workspace.remove_client(42).await.success);
    assert!(!workspace.remove_project(42).await.success);
}

#[tokio::test]
async fn test_selected_task_mutations() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let project = create_test_project(&workspace, "Website").await;
    let task = project.add_task(&make_new_task("Wireframes")).await?;
    let selection = TaskSelection::from(&task);

    let result = workspace
        .update_task_status(&selection, TaskStatus::Done)
        .await;
    assert!(result.success, "{}", result.message);
    assert_eq!(result.message, "Task marked Done");

    let result = workspace
        .edit_task(
            &selection,
            TaskDetailsPatch {
                title: "  Mockups  ".to_string(),
                description: Some("High fidelity".to_string()),
            },
        )
        .await;
    assert!(result.success, "{}", result.message);

    let stored = project.get_task_by_id(task.id).await?.expect("task exists");
    assert_eq!(stored.status, TaskStatus::Done);
    assert_eq!(stored.title, "Mockups");
    assert_eq!(stored.description.as_deref(), Some("High fidelity"));

    let result = workspace
        .edit_task(
            &selection,
            TaskDetailsPatch {
                title: String::new(),
                description: None,
            },
        )
        .await;
    assert!(!result.success);
    assert!(result.errors.expect("field errors").get("title").is_some());
    let stored = project.get_task_by_id(task.id).await?.expect("task exists");
    assert_eq!(stored.title, "Mockups");

    let result = workspace.delete_task(&selection).await;
    assert!(result.success, "{}", result.message);
    assert!(project.get_tasks().await?.is_empty());

    // The row is gone, a second delete reports failure
    let result = workspace.delete_task(&selection).await;
    assert_eq!(result, ActionResult::failed("Failed to delete task"));

    Ok(())
}

#[tokio::test]
async fn test_comment_mutations_persist_after_save() -> anyhow::Result<()> {
    let temp_dir = tempfile::TempDir::new()?;
    let workspace_path = temp_dir.path().join("actions.taskly");

    let (project_id, kept_id) = {
        let workspace = WorkspaceDb::new(&workspace_path).await?;
        let project = create_test_project(&workspace, "Website").await;
        let kept = project.add_comment(&make_new_comment(1, "<p>Draft</p>")).await?;
        let dropped = project.add_comment(&make_new_comment(2, "<p>Spam</p>")).await?;

        let result = workspace
            .edit_comment(
                &(&kept).into(),
                CommentContentPatch {
                    content: "<p>Final</p>".to_string(),
                },
            )
            .await;
        assert!(result.success, "{}", result.message);
        let result = workspace.delete_comment(&dropped.into()).await;
        assert!(result.success, "{}", result.message);

        workspace.save_workspace().await?;
        (project.project_id(), kept.id)
    };

    let workspace = WorkspaceDb::new(&workspace_path).await?;
    let comments = workspace.get_project_repo(project_id).await?.get_comments().await?;
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].id, kept_id);
    assert_eq!(comments[0].content, "<p>Final</p>");

    Ok(())
}

#[test]
fn test_result_envelope_json() -> anyhow::Result<()> {
    let value = serde_json::to_value(ActionResult::ok("Task updated"))?;
    assert_eq!(
        value,
        serde_json::json!({ "success": true, "message": "Task updated" })
    );

    let value = serde_json::to_value(ActionResult::created("Task created", 5))?;
    assert_eq!(value["id"], 5);
    Ok(())
}

//! Integration tests for database constraint enforcement.
//!
//! Tests cover:
//! - Projects must reference an existing client (foreign key constraint)
//! - Bound repositories require an existing project

mod common;

use common::*;

fn assert_foreign_key_error(result: anyhow::Result<impl std::fmt::Debug>) {
    let error_msg = format!("{:#}", result.expect_err("should violate a foreign key"));
    assert!(
        error_msg.contains("FOREIGN KEY constraint failed")
            || error_msg.contains("FOREIGN KEY")
            || error_msg.contains("foreign key"),
        "Error should mention foreign key constraint, got: {}",
        error_msg
    );
}

#[tokio::test]
async fn test_project_requires_existing_client() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;

    let result = workspace.add_project(&make_new_project("Orphan", Some(42))).await;
    assert_foreign_key_error(result);

    assert_eq!(workspace.get_projects(PageRequest::default()).await?.total, 0);

    Ok(())
}

#[tokio::test]
async fn test_project_update_requires_existing_client() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let project = create_test_project(&workspace, "Website").await;

    let update = ProjectUpdate {
        client_id: Some(Some(42)),
        ..Default::default()
    };
    assert_foreign_key_error(project.update_project(&update).await);

    assert_eq!(project.get_project().await?.client_id, None);

    Ok(())
}

#[tokio::test]
async fn test_missing_project_is_rejected() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;

    let result: anyhow::Result<ProjectDb> = workspace.get_project_repo(42).await;
    let error_msg = format!("{:#}", result.expect_err("project 42 does not exist"));
    assert!(error_msg.contains("Project 42 not found"), "got: {}", error_msg);

    Ok(())
}

#[tokio::test]
async fn test_task_requires_existing_project() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let project = create_test_project(&workspace, "Website").await;
    let stale_repo = workspace.get_project_repo(project.project_id()).await?;

    project.delete().await?;

    assert_foreign_key_error(stale_repo.add_task(&make_new_task("Orphan")).await);
    assert_foreign_key_error(stale_repo.add_comment(&make_new_comment(1, "<p>Orphan</p>")).await);

    Ok(())
}

//! Integration tests for Task CRUD operations.
//!
//! Tests cover:
//! - Creating tasks in the default status
//! - Filtering tasks by status
//! - Updating status and details
//! - Deleting tasks

mod common;

use common::*;

#[tokio::test]
async fn test_create_and_retrieve_task() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let project = create_test_project(&workspace, "Website").await;

    let task: Task = project.add_task(&make_new_task("Wireframes")).await?;

    assert!(task.id > 0, "Task should have positive ID");
    assert_eq!(task.project_id, project.project_id());
    assert_eq!(task.title, "Wireframes");
    assert_eq!(task.description.as_deref(), Some("Wireframes description"));
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.created_at, task.updated_at);

    let fetched = project.get_task_by_id(task.id).await?.expect("task exists");
    assert_eq!(fetched.title, "Wireframes");

    Ok(())
}

#[tokio::test]
async fn test_tasks_are_scoped_to_project() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let website = create_test_project(&workspace, "Website").await;
    let campaign = create_test_project(&workspace, "Campaign").await;

    let task = website.add_task(&make_new_task("Wireframes")).await?;
    campaign.add_task(&make_new_task("Ad copy")).await?;

    assert_eq!(website.get_tasks().await?.len(), 1);
    // A task id from another project is not visible
    assert!(campaign.get_task_by_id(task.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_filter_tasks_by_status() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let project = create_test_project(&workspace, "Website").await;

    let first = project.add_task(&make_new_task("Wireframes")).await?;
    project.add_task(&make_new_task("Copy")).await?;
    let third = project.add_task(&make_new_task("Launch")).await?;

    let done = TaskUpdate {
        status: Some(TaskStatus::Done),
        ..Default::default()
    };
    project.update_task(&first, &done).await?;
    project.update_task(&third, &done).await?;

    let titles: Vec<_> = project
        .get_tasks_by_status(TaskStatus::Done)
        .await?
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, ["Wireframes", "Launch"]);
    assert_eq!(project.get_tasks_by_status(TaskStatus::Pending).await?.len(), 1);
    assert!(project.get_tasks_by_status(TaskStatus::InProgress).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_update_task_details() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let project = create_test_project(&workspace, "Website").await;
    let task = project.add_task(&make_new_task("Wireframes")).await?;

    let update = TaskUpdate {
        title: Some("Mockups".to_string()),
        description: Some(None),
        status: Some(TaskStatus::InProgress),
    };
    let updated = project.update_task(&task, &update).await?;

    assert_eq!(updated.id, task.id);
    assert_eq!(updated.title, "Mockups");
    assert_eq!(updated.description, None);
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert!(updated.updated_at >= task.updated_at);
    assert_eq!(updated.created_at, task.created_at);

    Ok(())
}

#[tokio::test]
async fn test_delete_task() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let project = create_test_project(&workspace, "Website").await;
    let task = project.add_task(&make_new_task("Wireframes")).await?;
    let task_id = task.id;

    project.delete_task(task).await?;

    assert!(project.get_task_by_id(task_id).await?.is_none());
    assert!(project.get_tasks().await?.is_empty());

    Ok(())
}

#[test]
fn test_task_status_codes() {
    for status in TaskStatus::ALL {
        let code = i64::from(status);
        assert_eq!(TaskStatus::try_from(code).ok(), Some(status));
    }
    assert!(TaskStatus::try_from(3).is_err());
    assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    assert_eq!(TaskStatus::InProgress.label(), "In progress");
}

//! Tests for the selection store.
//!
//! Tests cover:
//! - Selecting tasks and comments replaces the previous selection
//! - Patches apply only to the matching selected variant
//! - Clearing the selection
//! - Selection tokens going stale when the selection changes

mod common;

use taskly::core::selection::{
    CommentContentPatch, SelectedItem, SelectionStore, TaskDetailsPatch,
};

use common::*;

#[test]
fn test_starts_empty() {
    let store = SelectionStore::new();
    assert_eq!(store.selected(), &SelectedItem::None);
}

#[test]
fn test_select_task_then_comment_replaces_selection() {
    let mut store = SelectionStore::new();
    store.select_task(task_selection(1, "Write copy"));
    assert_eq!(store.selected().as_task().map(|t| t.id), Some(1));

    store.select_comment(comment_selection(5, "<p>Looks good</p>"));
    assert!(store.selected().as_task().is_none());
    assert_eq!(store.selected().as_comment().map(|c| c.id), Some(5));
}

#[test]
fn test_selecting_same_task_twice_keeps_one_selection() {
    let mut store = SelectionStore::new();
    store.select_task(task_selection(3, "Review"));
    store.select_task(task_selection(3, "Review"));
    assert_eq!(store.selected(), &SelectedItem::Task(task_selection(3, "Review")));
}

#[test]
fn test_update_task_status_applies_to_selected_task() {
    let mut store = SelectionStore::new();
    store.select_task(task_selection(1, "Write copy"));

    assert!(store.update_selected_task_status(TaskStatus::InProgress));

    let task = store.selected().as_task().expect("task stays selected");
    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(task.title, "Write copy");
    assert_eq!(task.id, 1);
}

#[test]
fn test_update_task_details_replaces_title_and_description() {
    let mut store = SelectionStore::new();
    let mut selection = task_selection(1, "Old title");
    selection.description = Some("Old description".to_string());
    store.select_task(selection);

    assert!(store.update_selected_task_details(TaskDetailsPatch {
        title: "New title".to_string(),
        description: None,
    }));

    let task = store.selected().as_task().expect("task stays selected");
    assert_eq!(task.title, "New title");
    assert_eq!(task.description, None);
    assert_eq!(task.status, TaskStatus::Pending);
}

#[test]
fn test_task_patch_is_ignored_while_comment_selected() {
    let mut store = SelectionStore::new();
    store.select_comment(comment_selection(2, "Hello"));

    assert!(!store.update_selected_task_status(TaskStatus::Done));
    assert!(!store.update_selected_task_details(TaskDetailsPatch {
        title: "Nope".to_string(),
        description: None,
    }));

    assert_eq!(store.selected(), &SelectedItem::Comment(comment_selection(2, "Hello")));
}

#[test]
fn test_comment_patch_is_ignored_while_task_selected() {
    let mut store = SelectionStore::new();
    store.select_task(task_selection(4, "Plan"));

    assert!(!store.update_selected_comment_content(CommentContentPatch {
        content: "Changed".to_string(),
    }));

    assert_eq!(store.selected(), &SelectedItem::Task(task_selection(4, "Plan")));
}

#[test]
fn test_patches_are_ignored_when_nothing_selected() {
    let mut store = SelectionStore::new();

    assert!(!store.update_selected_task_status(TaskStatus::Done));
    assert!(!store.update_selected_comment_content(CommentContentPatch {
        content: "Changed".to_string(),
    }));

    assert!(store.selected().is_none());
}

#[test]
fn test_update_comment_content_keeps_other_fields() {
    let mut store = SelectionStore::new();
    store.select_comment(comment_selection(9, "<p>Draft</p>"));

    assert!(store.update_selected_comment_content(CommentContentPatch {
        content: "<p>Final</p>".to_string(),
    }));

    let comment = store.selected().as_comment().expect("comment stays selected");
    assert_eq!(comment.content, "<p>Final</p>");
    assert_eq!(comment.id, 9);
    assert_eq!(comment.user_id, 7);
}

#[test]
fn test_clear_selection() {
    let mut store = SelectionStore::new();
    store.select_task(task_selection(1, "Write copy"));
    store.clear_selection();
    assert!(store.selected().is_none());

    // Clearing twice is harmless
    store.clear_selection();
    assert!(store.selected().is_none());
}

#[test]
fn test_token_goes_stale_on_selection_change() {
    let mut store = SelectionStore::new();
    store.select_task(task_selection(1, "Write copy"));
    let token = store.token();
    assert!(store.is_current(token));

    // Patches do not change which item is selected
    store.update_selected_task_status(TaskStatus::Done);
    assert!(store.is_current(token));

    // Reselecting the same task still starts a new selection
    store.select_task(task_selection(1, "Write copy"));
    assert!(!store.is_current(token));

    let token = store.token();
    store.clear_selection();
    assert!(!store.is_current(token));
}

#[test]
fn test_clearing_empty_store_keeps_token() {
    let mut store = SelectionStore::new();
    let token = store.token();
    store.clear_selection();
    assert!(store.is_current(token));
}

#[test]
fn test_selection_serializes_with_type_tag() -> anyhow::Result<()> {
    let mut store = SelectionStore::new();
    store.select_task(task_selection(1, "Write copy"));

    let value = serde_json::to_value(store.selected())?;
    assert_eq!(value["type"], "task");
    assert_eq!(value["status"], "pending");

    let value = serde_json::to_value(SelectedItem::None)?;
    assert_eq!(value["type"], "none");
    Ok(())
}

#[test]
fn test_patch_before_clear_does_not_linger() {
    let mut store = SelectionStore::new();
    store.select_task(task_selection(1, "A"));
    store.update_selected_task_details(TaskDetailsPatch {
        title: "x".to_string(),
        description: Some("y".to_string()),
    });
    store.clear_selection();
    assert_eq!(store.selected(), &SelectedItem::None);

    store.select_task(task_selection(1, "A"));
    assert_eq!(store.selected().as_task().map(|t| t.title.as_str()), Some("A"));
}

#[tokio::test]
async fn test_selecting_persisted_rows() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let project = create_test_project(&workspace, "Website").await;
    let task = project.add_task(&make_new_task("Wireframes")).await?;
    let comment = project.add_comment(&make_new_comment(3, "<p>Hi</p>")).await?;

    let mut store = SelectionStore::new();
    store.select_task(&task);
    let selected = store.selected().as_task().expect("task selected");
    assert_eq!(selected.id, task.id);
    assert_eq!(selected.project_id, project.project_id());
    assert_eq!(selected.title, task.title);
    assert_eq!(selected.description, task.description);
    assert_eq!(selected.status, task.status);

    store.select_comment(comment.clone());
    let selected = store.selected().as_comment().expect("comment selected");
    assert_eq!(selected.id, comment.id);
    assert_eq!(selected.content, comment.content);
    assert_eq!(selected.created_at, comment.created_at);
    assert_eq!(selected.user_id, 3);

    Ok(())
}

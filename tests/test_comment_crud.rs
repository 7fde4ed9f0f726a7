//! Integration tests for Comment and Briefing operations.
//!
//! Tests cover:
//! - Adding comments and listing them newest first
//! - Editing comment content
//! - Deleting comments
//! - Adding, listing and deleting briefings

mod common;

use common::*;

#[tokio::test]
async fn test_comments_are_listed_newest_first() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let project = create_test_project(&workspace, "Website").await;

    let first: Comment = project.add_comment(&make_new_comment(1, "<p>First</p>")).await?;
    let second = project.add_comment(&make_new_comment(2, "<p>Second</p>")).await?;

    assert!(first.id > 0, "Comment should have positive ID");
    assert_eq!(first.project_id, project.project_id());
    assert_eq!(first.user_id, 1);

    let ids: Vec<_> = project.get_comments().await?.iter().map(|c| c.id).collect();
    assert_eq!(ids, [second.id, first.id]);

    Ok(())
}

#[tokio::test]
async fn test_update_comment_content() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let project = create_test_project(&workspace, "Website").await;
    let comment = project.add_comment(&make_new_comment(1, "<p>Draft</p>")).await?;

    let updated = project
        .update_comment_content(&comment, "<p><b>Final</b></p>")
        .await?;

    assert_eq!(updated.id, comment.id);
    assert_eq!(updated.content, "<p><b>Final</b></p>");
    assert_eq!(updated.user_id, comment.user_id);
    assert_eq!(updated.created_at, comment.created_at);

    Ok(())
}

#[tokio::test]
async fn test_comment_of_other_project_cannot_be_edited() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let website = create_test_project(&workspace, "Website").await;
    let campaign = create_test_project(&workspace, "Campaign").await;
    let comment = website.add_comment(&make_new_comment(1, "<p>Mine</p>")).await?;

    let result = campaign.update_comment_content(&comment, "<p>Theirs</p>").await;
    assert!(result.is_err(), "Editing through another project should fail");

    let stored = website.get_comment_by_id(comment.id).await?.expect("comment exists");
    assert_eq!(stored.content, "<p>Mine</p>");

    Ok(())
}

#[tokio::test]
async fn test_delete_comment() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let project = create_test_project(&workspace, "Website").await;
    let comment = project.add_comment(&make_new_comment(1, "<p>Bye</p>")).await?;
    let comment_id = comment.id;

    project.delete_comment(comment).await?;

    assert!(project.get_comment_by_id(comment_id).await?.is_none());
    assert!(project.get_comments().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_briefings() -> anyhow::Result<()> {
    let (workspace, _temp_dir) = create_test_workspace().await;
    let project = create_test_project(&workspace, "Website").await;

    let briefing: Briefing = project
        .add_briefing(&NewBriefing {
            title: "Kickoff".to_string(),
            content: "<h1>Goals</h1><p>Ship it</p>".to_string(),
        })
        .await?;
    assert_eq!(briefing.project_id, project.project_id());
    assert_eq!(briefing.title, "Kickoff");

    let briefings = project.get_briefings().await?;
    assert_eq!(briefings.len(), 1);
    assert_eq!(briefings[0].content, "<h1>Goals</h1><p>Ship it</p>");

    project.delete_briefing(briefing).await?;
    assert!(project.get_briefings().await?.is_empty());

    Ok(())
}

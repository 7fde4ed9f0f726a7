//! The item currently shown in the detail panel.
//!
//! [`SelectionStore`] holds at most one selected task or comment. It is owned by
//! the UI session (see `gui::AppState`) and handed to whoever needs it, so each
//! test can build its own instance.
//!
//! The store mirrors server-confirmed state only: patches are issued after a
//! mutation action reports success. A patch aimed at a variant that is not
//! currently selected is dropped without error, since completions can race with
//! a new selection or a clear.

use serde::Serialize;
use time::OffsetDateTime;

use crate::core::db::{Comment, Task, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSelection {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentSelection {
    pub id: i64,
    pub project_id: i64,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub user_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectedItem {
    #[default]
    None,
    Task(TaskSelection),
    Comment(CommentSelection),
}

impl SelectedItem {
    pub fn is_none(&self) -> bool {
        matches!(self, SelectedItem::None)
    }

    pub fn as_task(&self) -> Option<&TaskSelection> {
        match self {
            SelectedItem::Task(task) => Some(task),
            SelectedItem::None | SelectedItem::Comment(_) => None,
        }
    }

    pub fn as_comment(&self) -> Option<&CommentSelection> {
        match self {
            SelectedItem::Comment(comment) => Some(comment),
            SelectedItem::None | SelectedItem::Task(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetailsPatch {
    pub title: String,
    pub description: Option<String>,
}

impl TaskDetailsPatch {
    /// Trims both fields; a blank description becomes `None`.
    pub fn normalized(self) -> Self {
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Self {
            title: self.title.trim().to_string(),
            description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContentPatch {
    pub content: String,
}

impl From<&Task> for TaskSelection {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            project_id: task.project_id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
        }
    }
}

impl From<Task> for TaskSelection {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            project_id: task.project_id,
            title: task.title,
            description: task.description,
            status: task.status,
        }
    }
}

impl From<&Comment> for CommentSelection {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            project_id: comment.project_id,
            content: comment.content.clone(),
            created_at: comment.created_at,
            user_id: comment.user_id,
        }
    }
}

impl From<Comment> for CommentSelection {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            project_id: comment.project_id,
            content: comment.content,
            created_at: comment.created_at,
            user_id: comment.user_id,
        }
    }
}

/// Generation of the store at the time the token was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionToken(u64);

#[derive(Debug, Default)]
pub struct SelectionStore {
    selected: SelectedItem,
    generation: u64,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &SelectedItem {
        &self.selected
    }

    pub fn token(&self) -> SelectionToken {
        SelectionToken(self.generation)
    }

    /// True if nothing was selected or cleared since `token` was taken.
    pub fn is_current(&self, token: SelectionToken) -> bool {
        self.generation == token.0
    }

    pub fn select_task(&mut self, task: impl Into<TaskSelection>) {
        let task = task.into();
        tracing::trace!(task_id = task.id, "task selected");
        self.replace(SelectedItem::Task(task));
    }

    pub fn select_comment(&mut self, comment: impl Into<CommentSelection>) {
        let comment = comment.into();
        tracing::trace!(comment_id = comment.id, "comment selected");
        self.replace(SelectedItem::Comment(comment));
    }

    pub fn clear_selection(&mut self) {
        if !self.selected.is_none() {
            self.replace(SelectedItem::None);
        }
    }

    pub fn update_selected_task_status(&mut self, status: TaskStatus) -> bool {
        match &mut self.selected {
            SelectedItem::Task(task) => {
                task.status = status;
                true
            }
            SelectedItem::None | SelectedItem::Comment(_) => {
                tracing::debug!(%status, "status patch ignored: no task selected");
                false
            }
        }
    }

    pub fn update_selected_task_details(&mut self, details: TaskDetailsPatch) -> bool {
        match &mut self.selected {
            SelectedItem::Task(task) => {
                task.title = details.title;
                task.description = details.description;
                true
            }
            SelectedItem::None | SelectedItem::Comment(_) => {
                tracing::debug!("details patch ignored: no task selected");
                false
            }
        }
    }

    pub fn update_selected_comment_content(&mut self, patch: CommentContentPatch) -> bool {
        match &mut self.selected {
            SelectedItem::Comment(comment) => {
                comment.content = patch.content;
                true
            }
            SelectedItem::None | SelectedItem::Task(_) => {
                tracing::debug!("content patch ignored: no comment selected");
                false
            }
        }
    }

    fn replace(&mut self, item: SelectedItem) {
        self.selected = item;
        self.generation = self.generation.wrapping_add(1);
    }
}

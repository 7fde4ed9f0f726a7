//! Detail panel for the selected task or comment.
//!
//! The panel never touches the store before a mutation is confirmed. A request
//! becomes a [`PanelTask`] that awaits the injected [`MutationActions`] and
//! comes back as [`PanelMessage::Completed`]; only then is the store patched or
//! cleared. Each pending mutation carries the [`SelectionToken`] it was issued
//! under, and a completion whose token is no longer current is discarded.

use std::{collections::VecDeque, fmt, pin::Pin};

use crate::core::actions::{ActionResult, MutationActions};
use crate::core::db::TaskStatus;
use crate::core::selection::{
    CommentContentPatch, CommentSelection, SelectedItem, SelectionStore, SelectionToken,
    TaskDetailsPatch, TaskSelection,
};

pub type PanelTask = Pin<Box<dyn Future<Output = PanelMessage> + Send + 'static>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    TaskStatus(TaskStatus),
    TaskDetails(TaskDetailsPatch),
    DeleteTask,
    CommentContent(CommentContentPatch),
    DeleteComment,
}

impl Mutation {
    fn targets_task(&self) -> bool {
        match self {
            Mutation::TaskStatus(_) | Mutation::TaskDetails(_) | Mutation::DeleteTask => true,
            Mutation::CommentContent(_) | Mutation::DeleteComment => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    pub mutation: Mutation,
    pub token: SelectionToken,
}

#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub pending: PendingMutation,
    pub result: ActionResult,
}

#[derive(Debug, Clone)]
pub enum PanelMessage {
    ChangeTaskStatus(TaskStatus),
    SaveTaskDetails(TaskDetailsPatch),
    SaveCommentContent(CommentContentPatch),
    DeleteSelected,
    Dismiss,
    DismissNotification,
    Completed(MutationOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// What the panel should draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    Placeholder,
    Task { task: TaskSelection, pending: bool },
    Comment { comment: CommentSelection, pending: bool },
}

pub struct DetailPanel<A> {
    actions: A,
    pending: Option<PendingMutation>,
    notifications: VecDeque<Notification>,
}

impl<A> fmt::Debug for DetailPanel<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetailPanel")
            .field("pending", &self.pending)
            .field("notifications", &self.notifications)
            .finish()
    }
}

impl<A: MutationActions> DetailPanel<A> {
    pub fn new(actions: A) -> Self {
        Self {
            actions,
            pending: None,
            notifications: VecDeque::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingMutation> {
        self.pending.as_ref()
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    pub fn view(&self, store: &SelectionStore) -> PanelView {
        let pending = self.is_pending();
        match store.selected() {
            SelectedItem::None => PanelView::Placeholder,
            SelectedItem::Task(task) => PanelView::Task {
                task: task.clone(),
                pending,
            },
            SelectedItem::Comment(comment) => PanelView::Comment {
                comment: comment.clone(),
                pending,
            },
        }
    }

    pub fn update(&mut self, message: PanelMessage, store: &mut SelectionStore) -> Option<PanelTask> {
        match message {
            PanelMessage::ChangeTaskStatus(status) => {
                self.dispatch(Mutation::TaskStatus(status), store)
            }
            PanelMessage::SaveTaskDetails(details) => {
                self.dispatch(Mutation::TaskDetails(details.normalized()), store)
            }
            PanelMessage::SaveCommentContent(patch) => {
                self.dispatch(Mutation::CommentContent(patch), store)
            }
            PanelMessage::DeleteSelected => match store.selected() {
                SelectedItem::Task(_) => self.dispatch(Mutation::DeleteTask, store),
                SelectedItem::Comment(_) => self.dispatch(Mutation::DeleteComment, store),
                SelectedItem::None => None,
            },
            PanelMessage::Dismiss => {
                store.clear_selection();
                None
            }
            PanelMessage::DismissNotification => {
                self.notifications.pop_front();
                None
            }
            PanelMessage::Completed(outcome) => {
                self.complete(outcome, store);
                None
            }
        }
    }

    fn dispatch(&mut self, mutation: Mutation, store: &SelectionStore) -> Option<PanelTask> {
        if let Some(pending) = &self.pending {
            tracing::debug!(mutation = ?pending.mutation, "mutation already pending, request ignored");
            return None;
        }

        let future: Pin<Box<dyn Future<Output = ActionResult> + Send>> =
            match (store.selected(), &mutation) {
                (SelectedItem::Task(task), Mutation::TaskStatus(status)) => {
                    Box::pin(self.actions.update_task_status(task, *status))
                }
                (SelectedItem::Task(task), Mutation::TaskDetails(details)) => {
                    Box::pin(self.actions.edit_task(task, details.clone()))
                }
                (SelectedItem::Task(task), Mutation::DeleteTask) => {
                    Box::pin(self.actions.delete_task(task))
                }
                (SelectedItem::Comment(comment), Mutation::CommentContent(patch)) => {
                    Box::pin(self.actions.edit_comment(comment, patch.clone()))
                }
                (SelectedItem::Comment(comment), Mutation::DeleteComment) => {
                    Box::pin(self.actions.delete_comment(comment))
                }
                (selected, mutation) => {
                    tracing::debug!(
                        ?mutation,
                        nothing_selected = selected.is_none(),
                        expects_task = mutation.targets_task(),
                        "request does not match the selected item"
                    );
                    return None;
                }
            };

        let pending = PendingMutation {
            mutation,
            token: store.token(),
        };
        self.pending = Some(pending.clone());
        Some(Box::pin(async move {
            let result = future.await;
            PanelMessage::Completed(MutationOutcome { pending, result })
        }))
    }

    /// Settles a finished mutation. Returns true if the store was patched or cleared.
    pub fn complete(&mut self, outcome: MutationOutcome, store: &mut SelectionStore) -> bool {
        let MutationOutcome { pending, result } = outcome;
        if self.pending.as_ref() == Some(&pending) {
            self.pending = None;
        }

        if !result.success {
            let message = match &result.errors {
                Some(errors) if !errors.is_empty() => format!("{}: {}", result.message, errors),
                _ => result.message,
            };
            self.notify(NotificationLevel::Error, message);
            return false;
        }
        self.notify(NotificationLevel::Success, result.message);

        if !store.is_current(pending.token) {
            tracing::debug!(mutation = ?pending.mutation, "selection changed while pending, completion discarded");
            return false;
        }
        match pending.mutation {
            Mutation::TaskStatus(status) => store.update_selected_task_status(status),
            Mutation::TaskDetails(details) => store.update_selected_task_details(details),
            Mutation::CommentContent(patch) => store.update_selected_comment_content(patch),
            Mutation::DeleteTask | Mutation::DeleteComment => {
                store.clear_selection();
                true
            }
        }
    }

    fn notify(&mut self, level: NotificationLevel, message: String) {
        self.notifications.push_back(Notification { level, message });
    }
}

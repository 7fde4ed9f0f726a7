use iced::{
    Element, Length, Task,
    widget::{button, column, row, scrollable, text, text_input},
};

use crate::{
    core::{
        db::{
            self, CommentRepository, PageRequest, Project, ProjectRepository, TaskRepository,
            TaskStatus, WorkspaceDb,
        },
        panel::{DetailPanel, NotificationLevel, PanelMessage, PanelTask, PanelView},
        selection::{CommentContentPatch, SelectedItem, TaskDetailsPatch},
        validation::plain_text,
    },
    gui::{
        AppState,
        screens::{Screen, ScreenMessage},
        widgets::{layout, status_strip},
    },
};

/// Edit fields of the detail panel, seeded from the selected item.
#[derive(Debug, Clone, Default)]
struct Draft {
    title: String,
    description: String,
    content: String,
}

impl Draft {
    fn from_selection(selected: &SelectedItem) -> Self {
        match selected {
            SelectedItem::None => Self::default(),
            SelectedItem::Task(task) => Self {
                title: task.title.clone(),
                description: task.description.clone().unwrap_or_default(),
                content: String::new(),
            },
            SelectedItem::Comment(comment) => Self {
                content: comment.content.clone(),
                ..Self::default()
            },
        }
    }
}

type ProjectContents = (Vec<db::Task>, Vec<db::Comment>);

#[derive(Debug)]
pub struct ProjectBoardScreen {
    projects: Vec<Project>,
    current_project: Option<i64>,
    tasks: Vec<db::Task>,
    comments: Vec<db::Comment>,
    panel: DetailPanel<WorkspaceDb>,
    draft: Draft,
    load_error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ProjectBoardMessage {
    OpenProject(i64),
    Loaded(i64, Result<ProjectContents, String>),
    SelectTask(db::Task),
    SelectComment(db::Comment),
    TitleChanged(String),
    DescriptionChanged(String),
    ContentChanged(String),
    SaveTaskDetails,
    SaveCommentContent,
    Panel(PanelMessage),
    SaveWorkspace,
    WorkspaceSaved(Result<(), String>),
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    CloseWorkspace,
}

type BoardMessage = ScreenMessage<ProjectBoardScreen>;

fn local(message: ProjectBoardMessage) -> BoardMessage {
    ScreenMessage::ScreenMessage(message)
}

async fn load_project(db: WorkspaceDb, project_id: i64) -> Result<ProjectContents, String> {
    let result = async {
        let project = db.get_project_repo(project_id).await?;
        let tasks = project.get_tasks().await?;
        let comments = project.get_comments().await?;
        anyhow::Ok((tasks, comments))
    }
    .await;
    result.map_err(|e| format!("{e:#}"))
}

fn perform_panel(task: PanelTask) -> Task<BoardMessage> {
    Task::perform(task, |message| local(ProjectBoardMessage::Panel(message)))
}

impl ProjectBoardScreen {
    pub async fn new(db: &WorkspaceDb) -> anyhow::Result<Self> {
        let mut projects = Vec::new();
        let mut request = PageRequest::new(1, PageRequest::MAX_PER_PAGE);
        loop {
            let page = db.get_projects(request).await?;
            let more = page.has_next();
            projects.extend(page.items);
            if !more {
                break;
            }
            request = request.next();
        }
        Ok(Self {
            projects,
            current_project: None,
            tasks: Vec::new(),
            comments: Vec::new(),
            panel: DetailPanel::new(db.clone()),
            draft: Draft::default(),
            load_error: None,
        })
    }

    fn reload(&self, state: &AppState) -> Task<BoardMessage> {
        match (&state.current_workspace, self.current_project) {
            (Some(db), Some(project_id)) => Task::perform(
                load_project(db.clone(), project_id),
                move |result| local(ProjectBoardMessage::Loaded(project_id, result)),
            ),
            _ => Task::none(),
        }
    }

    fn sidebar(&self) -> Element<'_, BoardMessage> {
        let projects = self.projects.iter().map(|project| {
            let label = if self.current_project == Some(project.id) {
                format!("> {}", project.name)
            } else {
                project.name.clone()
            };
            button(text(label))
                .width(Length::Fill)
                .on_press(local(ProjectBoardMessage::OpenProject(project.id)))
                .into()
        });
        column![
            text("Projects").size(20),
            scrollable(column(projects).spacing(4)).height(Length::Fill),
            button("Save").on_press(local(ProjectBoardMessage::SaveWorkspace)),
            button("Close workspace")
                .on_press(ScreenMessage::ParentMessage(ParentMessage::CloseWorkspace)),
        ]
        .spacing(10)
        .into()
    }

    fn lists(&self) -> Element<'_, BoardMessage> {
        if self.current_project.is_none() {
            return text("Choose a project").into();
        }
        let tasks = self.tasks.iter().map(|task| {
            button(text(format!("[{}] {}", task.status.label(), task.title)))
                .width(Length::Fill)
                .on_press(local(ProjectBoardMessage::SelectTask(task.clone())))
                .into()
        });
        let comments = self.comments.iter().map(|comment| {
            button(text(format!("user {}: {}", comment.user_id, plain_text(&comment.content))))
                .width(Length::Fill)
                .on_press(local(ProjectBoardMessage::SelectComment(comment.clone())))
                .into()
        });
        let mut content = column![
            text("Tasks").size(20),
            column(tasks).spacing(4),
            text("Comments").size(20),
            column(comments).spacing(4),
        ]
        .spacing(10);
        if let Some(error) = &self.load_error {
            content = content.push(text(error.as_str()));
        }
        scrollable(content).into()
    }

    fn detail(&self, state: &AppState) -> Element<'_, BoardMessage> {
        let panel_message = |message: PanelMessage| local(ProjectBoardMessage::Panel(message));
        let mut content = match self.panel.view(&state.selection) {
            PanelView::Placeholder => column![text("Select a task or comment to see its details")],
            PanelView::Task { task, pending } => {
                let enabled = |message: BoardMessage| (!pending).then_some(message);
                let status_buttons = row(TaskStatus::ALL.into_iter().map(|status| {
                    button(text(status.label()))
                        .on_press_maybe(
                            (status != task.status)
                                .then(|| panel_message(PanelMessage::ChangeTaskStatus(status)))
                                .and_then(enabled),
                        )
                        .into()
                }))
                .spacing(6);
                column![
                    text(task.title.clone()).size(22),
                    status_strip(task.status),
                    status_buttons,
                    text_input("Title", &self.draft.title)
                        .on_input(|value| local(ProjectBoardMessage::TitleChanged(value))),
                    text_input("Description", &self.draft.description)
                        .on_input(|value| local(ProjectBoardMessage::DescriptionChanged(value))),
                    row![
                        button("Save").on_press_maybe(enabled(local(
                            ProjectBoardMessage::SaveTaskDetails
                        ))),
                        button("Delete")
                            .on_press_maybe(enabled(panel_message(PanelMessage::DeleteSelected))),
                        button("Close").on_press(panel_message(PanelMessage::Dismiss)),
                    ]
                    .spacing(6),
                ]
            }
            PanelView::Comment { comment, pending } => {
                let enabled = |message: BoardMessage| (!pending).then_some(message);
                column![
                    text(format!("Comment by user {}", comment.user_id)).size(22),
                    text(comment.created_at.to_string()),
                    text(plain_text(&comment.content)),
                    text_input("Content", &self.draft.content)
                        .on_input(|value| local(ProjectBoardMessage::ContentChanged(value))),
                    row![
                        button("Save").on_press_maybe(enabled(local(
                            ProjectBoardMessage::SaveCommentContent
                        ))),
                        button("Delete")
                            .on_press_maybe(enabled(panel_message(PanelMessage::DeleteSelected))),
                        button("Close").on_press(panel_message(PanelMessage::Dismiss)),
                    ]
                    .spacing(6),
                ]
            }
        }
        .spacing(10);

        for notification in self.panel.notifications() {
            let prefix = match notification.level {
                NotificationLevel::Success => "OK",
                NotificationLevel::Error => "Error",
            };
            content = content.push(
                row![
                    text(format!("{prefix}: {notification}")),
                    button("x").on_press(panel_message(PanelMessage::DismissNotification)),
                ]
                .spacing(6),
            );
        }
        content.into()
    }
}

impl Screen for ProjectBoardScreen {
    type Message = ProjectBoardMessage;
    type ParentMessage = ParentMessage;

    fn view<'a>(&'a self, state: &'a AppState) -> Element<'a, ScreenMessage<Self>> {
        layout(self.sidebar(), self.lists(), self.detail(state))
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            ProjectBoardMessage::OpenProject(project_id) => {
                self.current_project = Some(project_id);
                state.selection.clear_selection();
                self.draft = Draft::default();
                self.reload(state)
            }
            ProjectBoardMessage::Loaded(project_id, result) => {
                // A slower load for a previously opened project may land late.
                if self.current_project != Some(project_id) {
                    return Task::none();
                }
                match result {
                    Ok((tasks, comments)) => {
                        self.tasks = tasks;
                        self.comments = comments;
                        self.load_error = None;
                    }
                    Err(error) => {
                        tracing::error!(project_id, %error, "failed to load project");
                        self.load_error = Some(error);
                    }
                }
                Task::none()
            }
            ProjectBoardMessage::SelectTask(task) => {
                state.selection.select_task(task);
                self.draft = Draft::from_selection(state.selection.selected());
                Task::none()
            }
            ProjectBoardMessage::SelectComment(comment) => {
                state.selection.select_comment(comment);
                self.draft = Draft::from_selection(state.selection.selected());
                Task::none()
            }
            ProjectBoardMessage::TitleChanged(value) => {
                self.draft.title = value;
                Task::none()
            }
            ProjectBoardMessage::DescriptionChanged(value) => {
                self.draft.description = value;
                Task::none()
            }
            ProjectBoardMessage::ContentChanged(value) => {
                self.draft.content = value;
                Task::none()
            }
            ProjectBoardMessage::SaveTaskDetails => {
                let details = TaskDetailsPatch {
                    title: self.draft.title.clone(),
                    description: Some(self.draft.description.clone()),
                };
                self.update(
                    ProjectBoardMessage::Panel(PanelMessage::SaveTaskDetails(details)),
                    state,
                )
            }
            ProjectBoardMessage::SaveCommentContent => {
                let patch = CommentContentPatch {
                    content: self.draft.content.clone(),
                };
                self.update(
                    ProjectBoardMessage::Panel(PanelMessage::SaveCommentContent(patch)),
                    state,
                )
            }
            ProjectBoardMessage::Panel(PanelMessage::Completed(outcome)) => {
                let succeeded = outcome.result.success;
                // A discarded completion leaves the draft alone.
                if self.panel.complete(outcome, &mut state.selection) {
                    self.draft = Draft::from_selection(state.selection.selected());
                }
                if succeeded {
                    self.reload(state)
                } else {
                    Task::none()
                }
            }
            ProjectBoardMessage::Panel(message) => {
                match self.panel.update(message, &mut state.selection) {
                    Some(task) => perform_panel(task),
                    None => Task::none(),
                }
            }
            ProjectBoardMessage::SaveWorkspace => match state.current_workspace.clone() {
                Some(db) => Task::perform(
                    async move { db.save_workspace().await.map_err(|e| format!("{e:#}")) },
                    |result| local(ProjectBoardMessage::WorkspaceSaved(result)),
                ),
                None => Task::none(),
            },
            ProjectBoardMessage::WorkspaceSaved(result) => {
                match result {
                    Ok(()) => tracing::info!("workspace saved"),
                    Err(error) => {
                        tracing::error!(%error, "failed to save workspace");
                        self.load_error = Some(error);
                    }
                }
                Task::none()
            }
        }
    }
}

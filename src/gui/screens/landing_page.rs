use std::path::PathBuf;

use iced::{
    Alignment::Center,
    Element, Task,
    widget::{button, column, container, row, text},
};
use rfd::AsyncFileDialog;

use crate::gui::{
    AppState,
    screens::{Screen, ScreenMessage},
};

const WORKSPACE_EXTENSION: &str = "taskly";

#[derive(Debug, Clone, Default)]
pub struct LandingPageScreen {
    error: Option<String>,
}

impl LandingPageScreen {
    pub fn with_error(error: String) -> Self {
        Self { error: Some(error) }
    }
}

#[derive(Debug, Clone)]
pub enum LandingPageMessage {
    OpenWorkspace,
    CreateWorkspace,
    None,
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    OpenedWorkspace(PathBuf),
}

fn picked(handle: Option<rfd::FileHandle>) -> ScreenMessage<LandingPageScreen> {
    match handle {
        Some(data) => ScreenMessage::ParentMessage(ParentMessage::OpenedWorkspace(
            data.path().to_path_buf(),
        )),
        None => ScreenMessage::ScreenMessage(LandingPageMessage::None),
    }
}

impl Screen for LandingPageScreen {
    type Message = LandingPageMessage;
    type ParentMessage = ParentMessage;

    fn view<'a>(&'a self, _state: &'a AppState) -> Element<'a, ScreenMessage<Self>> {
        let mut content = column![
            text("Taskly").size(32),
            text("Clients, projects and tasks"),
            row![
                button("Open Workspace").on_press(ScreenMessage::ScreenMessage(
                    LandingPageMessage::OpenWorkspace
                )),
                button("Create Workspace").on_press(ScreenMessage::ScreenMessage(
                    LandingPageMessage::CreateWorkspace
                )),
            ]
            .spacing(20),
        ]
        .spacing(20)
        .padding(20)
        .align_x(Center);

        if let Some(error) = &self.error {
            content = content.push(text(error.as_str()));
        }

        container(content)
            .center_x(iced::Length::Fill)
            .center_y(iced::Length::Fill)
            .into()
    }

    fn update(
        &mut self,
        message: Self::Message,
        _state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            LandingPageMessage::OpenWorkspace => Task::perform(
                AsyncFileDialog::new()
                    .add_filter("Taskly Workspace", &[WORKSPACE_EXTENSION])
                    .pick_file(),
                picked,
            ),
            LandingPageMessage::CreateWorkspace => Task::perform(
                AsyncFileDialog::new()
                    .set_title("Create New Taskly Workspace")
                    .add_filter("Taskly Workspace", &[WORKSPACE_EXTENSION])
                    .save_file(),
                picked,
            ),
            LandingPageMessage::None => Task::none(),
        }
    }
}

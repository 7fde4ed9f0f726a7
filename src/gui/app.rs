use iced::{Element, Task};

use super::{
    AppState, Message,
    screens::{Screen, ScreenData, ScreenMessage, landing_page::LandingPageScreen},
};

pub struct TasklyApp {
    screen: ScreenData,
    state: AppState,
}

impl TasklyApp {
    pub fn new() -> (Self, Task<Message>) {
        (
            Self {
                screen: ScreenData::LandingPage(LandingPageScreen::default()),
                state: AppState::default(),
            },
            Task::none(),
        )
    }

    pub fn title(&self) -> String {
        match &self.state.current_workspace {
            Some(db) => format!("Taskly - {}", db.workspace_file().display()),
            None => "Taskly".to_string(),
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        self.screen
            .update(message, &mut self.state)
            .map(|message| match message {
                ScreenMessage::ScreenMessage(message) => message,
                ScreenMessage::ParentMessage(never) => match never {},
            })
    }

    pub fn view(&self) -> Element<'_, Message> {
        self.screen
            .view(&self.state)
            .map(|message| match message {
                ScreenMessage::ScreenMessage(message) => message,
                ScreenMessage::ParentMessage(never) => match never {},
            })
    }
}

pub mod landing_page;
pub mod loading_page;
pub mod project_board;

use iced::{Element, Task};

use crate::{
    core::db::WorkspaceDb,
    gui::{AppState, Message},
};

#[derive(Debug)]
pub enum ScreenMessage<S: Screen> {
    ScreenMessage(S::Message),
    ParentMessage(S::ParentMessage),
}

impl<S: Screen> Clone for ScreenMessage<S>
where
    S::Message: Clone,
    S::ParentMessage: Clone,
{
    fn clone(&self) -> Self {
        match self {
            ScreenMessage::ScreenMessage(msg) => ScreenMessage::ScreenMessage(msg.clone()),
            ScreenMessage::ParentMessage(msg) => ScreenMessage::ParentMessage(msg.clone()),
        }
    }
}

pub trait Screen: Sized {
    type Message: std::fmt::Debug;
    type ParentMessage: std::fmt::Debug;
    fn view<'a>(&'a self, state: &'a AppState) -> Element<'a, ScreenMessage<Self>>;
    fn update(&mut self, message: Self::Message, state: &mut AppState)
    -> Task<ScreenMessage<Self>>;
}

#[derive(Debug)]
pub enum ScreenData {
    LandingPage(landing_page::LandingPageScreen),
    LoadingPage(loading_page::LoadingPageScreen),
    ProjectBoard(project_board::ProjectBoardScreen),
}

async fn open_workspace(
    path: std::path::PathBuf,
) -> anyhow::Result<(WorkspaceDb, project_board::ProjectBoardScreen)> {
    let db = WorkspaceDb::new(&path).await?;
    let board = project_board::ProjectBoardScreen::new(&db).await?;
    Ok((db, board))
}

impl Screen for ScreenData {
    type Message = Message;
    type ParentMessage = std::convert::Infallible;

    fn view<'a>(&'a self, state: &'a AppState) -> Element<'a, ScreenMessage<Self>> {
        match self {
            ScreenData::LandingPage(screen) => screen.view(state).map(Message::LandingPage),
            ScreenData::LoadingPage(screen) => screen.view(state).map(Message::LoadingPage),
            ScreenData::ProjectBoard(screen) => screen.view(state).map(Message::ProjectBoard),
        }
        .map(ScreenMessage::ScreenMessage)
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match (self, message) {
            (x, Message::ChangeScreen(screen)) => {
                *x = screen;
                Task::none()
            }
            (x, Message::OpenWorkspace(db, board)) => {
                tracing::info!(file = ?db.workspace_file(), "workspace opened");
                state.current_workspace = Some(db);
                state.selection.clear_selection();
                *x = ScreenData::ProjectBoard(board);
                Task::none()
            }
            (x, Message::OpenFailed(error)) => {
                tracing::error!(%error, "failed to open workspace");
                *x = ScreenData::LandingPage(landing_page::LandingPageScreen::with_error(error));
                Task::none()
            }
            (ScreenData::LandingPage(page), Message::LandingPage(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => page
                    .update(msg, state)
                    .map(Message::LandingPage)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(landing_page::ParentMessage::OpenedWorkspace(
                    path,
                )) => Task::done(ScreenMessage::ScreenMessage(Message::ChangeScreen(
                    ScreenData::LoadingPage(loading_page::LoadingPageScreen),
                )))
                .chain(Task::perform(open_workspace(path), |result| {
                    ScreenMessage::ScreenMessage(match result {
                        Ok((db, board)) => Message::OpenWorkspace(db, board),
                        Err(e) => Message::OpenFailed(format!("{e:#}")),
                    })
                })),
            },
            (ScreenData::ProjectBoard(page), Message::ProjectBoard(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => page
                    .update(msg, state)
                    .map(Message::ProjectBoard)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(project_board::ParentMessage::CloseWorkspace) => {
                    state.selection.clear_selection();
                    let Some(db) = state.current_workspace.take() else {
                        return Task::done(ScreenMessage::ScreenMessage(Message::ChangeScreen(
                            ScreenData::LandingPage(landing_page::LandingPageScreen::default()),
                        )));
                    };
                    Task::perform(async move { db.save_workspace().await }, |result| {
                        ScreenMessage::ScreenMessage(match result {
                            Ok(()) => Message::ChangeScreen(ScreenData::LandingPage(
                                landing_page::LandingPageScreen::default(),
                            )),
                            Err(e) => Message::OpenFailed(format!("Failed to save workspace: {e:#}")),
                        })
                    })
                }
            },
            (screen, message) => {
                tracing::debug!(?message, ?screen, "message for inactive screen dropped");
                Task::none()
            }
        }
    }
}

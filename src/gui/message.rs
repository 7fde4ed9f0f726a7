use crate::{
    core::db::WorkspaceDb,
    gui::screens::{
        ScreenData, ScreenMessage, landing_page::LandingPageScreen,
        loading_page::LoadingPageScreen, project_board::ProjectBoardScreen,
    },
};

#[derive(Debug)]
pub enum Message {
    LandingPage(ScreenMessage<LandingPageScreen>),
    LoadingPage(ScreenMessage<LoadingPageScreen>),
    ProjectBoard(ScreenMessage<ProjectBoardScreen>),
    ChangeScreen(ScreenData),
    OpenWorkspace(WorkspaceDb, ProjectBoardScreen),
    OpenFailed(String),
}

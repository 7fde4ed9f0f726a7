use crate::core::{db::WorkspaceDb, selection::SelectionStore};

/// State shared by every screen of one UI session.
#[derive(Debug, Default)]
pub struct AppState {
    pub current_workspace: Option<WorkspaceDb>,
    pub selection: SelectionStore,
}

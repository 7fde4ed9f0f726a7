pub mod core;

pub use core::actions::{ActionResult, MutationActions};
pub use core::db::WorkspaceDb;
pub use core::panel::{DetailPanel, PanelMessage, PanelView};
pub use core::selection::{SelectedItem, SelectionStore};

#[cfg(feature = "gui")]
pub mod gui;

mod app;
mod message;
mod state;
mod screens;
mod widgets;

pub use app::TasklyApp;
pub use message::Message;
pub use state::AppState;

pub fn run() -> anyhow::Result<()> {
    iced::application(TasklyApp::new, TasklyApp::update, TasklyApp::view)
        .title(TasklyApp::title)
        .run()
        .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}

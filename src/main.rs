use anyhow::Result;

mod api;
mod app;
mod chat;
mod config;
mod handler;
mod tui;
mod ui;

use app::App;
use config::Config;
use tui::EventHandler;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs stay silent unless RUST_LOG is set; the TUI owns the terminal.
    env_logger::init();

    let config = Config::load().unwrap_or_else(|_| Config::new());
    log::debug!("using backend at {}", config.base_url());

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut app = App::new(&config);
    let result = run(&mut terminal, &mut app).await;

    // Leave the terminal usable even when the loop bails out with an error
    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(app, event).await?;
        }
    }

    Ok(())
}

use anyhow::Result;
use icaptivate_core::Config;
use tracing::{info, warn};

mod app;
mod handler;
mod logging;
mod theme;
mod tui;
mod ui;

use app::App;
use theme::Theme;
use tui::{EventHandler, Tui};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging is best effort; the app runs without a log file
    let log_path = logging::init().ok();

    let config_path = Config::get_config_path().ok();
    let config = match &config_path {
        Some(path) => Config::load_from(path).unwrap_or_else(|e| {
            warn!(error = %e, path = %path.display(), "ignoring unreadable config");
            Config::new()
        }),
        None => Config::new(),
    };

    let theme = Theme::from_name(config.theme.as_deref());
    let mut app = App::new(&config, config_path, theme);
    info!(
        api_url = %app.api.base_url(),
        route = ?app.route(),
        log = ?log_path,
        "starting icaptivate"
    );

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &mut app).await;

    tui::restore()?;
    info!("exiting");
    result
}

async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }

        app.poll_generation().await;
    }

    Ok(())
}

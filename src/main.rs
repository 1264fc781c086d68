//! Binary entry point that glues the SQLite-backed contact store to the TUI:
//! resolve the configuration, start file logging, open the store, and drive
//! the Ratatui event loop until the user exits.
use anyhow::Context;
use contact_book::{init_logging, run_app, App, AppConfig, ContactController, ContactStore};
use log::info;

/// Returning a `Result` bubbles fatal initialization problems (an unwritable
/// data directory, a corrupt database) up to the terminal.
fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.log_level, &config.log_dir)?;

    let store = ContactStore::open(&config.db_path).context("failed to open contact store")?;
    let controller = ContactController::new(store).context("failed to load contacts")?;

    let mut app = App::new(controller, config.export_dir.clone());
    let result = run_app(&mut app);
    app.close().context("failed to close contact store")?;
    info!("event=app_exit module=main status=ok");
    result
}

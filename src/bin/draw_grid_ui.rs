//! Drawing grid display window.
//!
//! Launched by the `interactive-draw` server with its configuration in the
//! environment; can also be started by hand against the same state file.

use clap::Parser;
use interactive_draw::{cli::DisplayCli, config::Config, display, logging};

fn main() -> anyhow::Result<()> {
    DisplayCli::parse();

    let config = Config::from_env()?;
    // The terminal belongs to the UI, so diagnostics only go to the log file.
    logging::init(&config.log_file, logging::Console::None)?;

    if let Err(e) = display::run(&config) {
        tracing::error!("Display failed: {:?}", e);
        return Err(e);
    }
    Ok(())
}

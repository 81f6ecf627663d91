//! Display process: renders the shared grid and lets a human toggle cells.
//!
//! Two threads run here. The UI thread owns the terminal and all app state; the
//! watcher thread only polls the state file and sends `DisplayEvent`s over a
//! channel, which the UI thread applies between input events.

mod app;
mod render;
mod terminal;
mod watcher;

pub use app::{DisplayApp, WINDOW_TITLE};
pub use render::{GridWidget, TILE_WIDTH};
pub use terminal::TerminalGuard;
pub use watcher::{DisplayEvent, StateWatcher};

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::event;
use crossterm::tty::IsTty;

use crate::config::Config;
use crate::pid_file::PidFileGuard;
use crate::store::{FileGridStore, SharedGridStore};

/// How long the UI thread waits for input before checking the watcher channel.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Open the window and run until the user quits.
pub fn run(config: &Config) -> anyhow::Result<()> {
    if !std::io::stdout().is_tty() {
        anyhow::bail!("the display needs an interactive terminal on stdout");
    }

    // Lets the server find this window even when a terminal wrapper launched it.
    let _pid_guard = match PidFileGuard::create(config.pid_file.clone(), config.session.clone()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            tracing::warn!("Display pid not recorded: {:?}", e);
            None
        }
    };

    let store: SharedGridStore = Arc::new(FileGridStore::new(
        config.state_file.clone(),
        config.grid_size,
    ));
    tracing::info!(
        grid_size = config.grid_size,
        "Display watching {}",
        config.state_file.display()
    );

    let mut app = DisplayApp::new(store.clone());
    let (tx, rx) = mpsc::channel();
    let mut watcher = StateWatcher::spawn(store, config.poll_interval, tx)
        .context("starting state watcher")?;

    let mut terminal = TerminalGuard::enter(WINDOW_TITLE.trim()).context("entering terminal UI")?;
    let result = event_loop(&mut terminal, &mut app, &rx);

    // Stop polling before the window goes away.
    watcher.stop();
    drop(terminal);

    tracing::info!("Display closed");
    result
}

fn event_loop(
    terminal: &mut TerminalGuard,
    app: &mut DisplayApp,
    updates: &Receiver<DisplayEvent>,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        while let Ok(update) = updates.try_recv() {
            app.on_display_event(update);
        }

        if event::poll(INPUT_POLL)? {
            app.handle_event(event::read()?);
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

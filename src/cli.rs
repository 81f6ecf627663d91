//! Command-line surface of both binaries.
//!
//! Neither takes flags: settings come from the environment (see [`crate::config`]).
//! Parsing still runs so `--help` and `--version` work and stray arguments fail
//! instead of being silently ignored.

use clap::Parser;

const ENV_HELP: &str = "\
Environment:
  INTERACTIVE_DRAW_STATE_FILE  shared grid state file
  INTERACTIVE_DRAW_LOG_FILE    log file (default: next to the state file)
  INTERACTIVE_DRAW_GRID_SIZE   grid dimension N, 1-64 (default: 16)
  INTERACTIVE_DRAW_POLL_MS     display poll interval in ms (default: 500)
  INTERACTIVE_DRAW_UI_BIN      display executable (default: draw-grid-ui beside this one)
  INTERACTIVE_DRAW_TERMINAL    terminal prefix for the display window
  RUST_LOG                     log filter";

/// MCP drawing-grid tool server on stdio.
#[derive(Parser, Debug)]
#[command(name = "interactive-draw", version, after_help = ENV_HELP)]
pub struct ServerCli {}

/// Drawing grid display window.
#[derive(Parser, Debug)]
#[command(name = "draw-grid-ui", version, after_help = ENV_HELP)]
pub struct DisplayCli {}

//! Configuration management for interactive-draw.
//!
//! Both binaries read the same environment variables, and the command service
//! forwards them to the display process it launches so the two sides always agree
//! on the state file and the grid size:
//! - `INTERACTIVE_DRAW_STATE_FILE` - Optional. Shared grid state file. Defaults to
//!   `<tmp>/interactive-draw/board_state.json`.
//! - `INTERACTIVE_DRAW_LOG_FILE` - Optional. Log file. Defaults to `interactive_draw.log`
//!   next to the state file.
//! - `INTERACTIVE_DRAW_GRID_SIZE` - Optional. Grid dimension N. Defaults to `16`.
//! - `INTERACTIVE_DRAW_POLL_MS` - Optional. Display poll interval in milliseconds. Defaults to `500`.
//! - `INTERACTIVE_DRAW_UI_BIN` - Optional. Display executable. Defaults to `draw-grid-ui`
//!   next to the running executable.
//! - `INTERACTIVE_DRAW_TERMINAL` - Optional. Command prefix that opens a terminal window
//!   for the display (whitespace separated). Empty spawns the display directly.
//! - `INTERACTIVE_DRAW_PID_FILE` - Optional. File where the running display records its
//!   pid. Defaults to `display.pid` next to the state file.
//! - `INTERACTIVE_DRAW_SESSION` - Set by the server on each display it launches; a display
//!   started by hand has none.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const STATE_FILE_VAR: &str = "INTERACTIVE_DRAW_STATE_FILE";
pub const LOG_FILE_VAR: &str = "INTERACTIVE_DRAW_LOG_FILE";
pub const GRID_SIZE_VAR: &str = "INTERACTIVE_DRAW_GRID_SIZE";
pub const POLL_MS_VAR: &str = "INTERACTIVE_DRAW_POLL_MS";
pub const UI_BIN_VAR: &str = "INTERACTIVE_DRAW_UI_BIN";
pub const TERMINAL_VAR: &str = "INTERACTIVE_DRAW_TERMINAL";
pub const PID_FILE_VAR: &str = "INTERACTIVE_DRAW_PID_FILE";
pub const SESSION_VAR: &str = "INTERACTIVE_DRAW_SESSION";

pub const DEFAULT_GRID_SIZE: usize = 16;
/// Largest grid that still fits a wide terminal with two columns per tile.
pub const MAX_GRID_SIZE: usize = 64;
pub const DEFAULT_POLL_MS: u64 = 500;

const UI_BIN_NAME: &str = "draw-grid-ui";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Runtime configuration shared by the command service and the display process.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file both processes read and overwrite
    pub state_file: PathBuf,

    /// Diagnostic log file
    pub log_file: PathBuf,

    /// Authoritative grid dimension (N x N)
    pub grid_size: usize,

    /// How often the display checks the state file for changes
    pub poll_interval: Duration,

    /// Executable that renders the grid
    pub display_binary: PathBuf,

    /// Prefix used to open the display in its own terminal window
    pub terminal_command: Vec<String>,

    /// Sidecar where the display records its own pid, never part of the grid state
    pub pid_file: PathBuf,

    /// Session token of a display launched by the server
    pub session: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a numeric variable does not parse or
    /// falls outside its accepted range.
    pub fn from_env() -> Result<Self, ConfigError> {
        let state_file = std::env::var(STATE_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_state_file());

        let log_file = std::env::var(LOG_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_log_file(&state_file));

        let grid_size = std::env::var(GRID_SIZE_VAR)
            .ok()
            .map(|v| parse_grid_size(&v))
            .transpose()?
            .unwrap_or(DEFAULT_GRID_SIZE);

        let poll_ms = std::env::var(POLL_MS_VAR)
            .ok()
            .map(|v| parse_poll_ms(&v))
            .transpose()?
            .unwrap_or(DEFAULT_POLL_MS);

        let display_binary = std::env::var(UI_BIN_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_display_binary());

        let terminal_command = std::env::var(TERMINAL_VAR)
            .map(|v| split_command(&v))
            .unwrap_or_else(|_| default_terminal_command());

        let pid_file = std::env::var(PID_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_pid_file(&state_file));

        let session = std::env::var(SESSION_VAR).ok().filter(|v| !v.is_empty());

        Ok(Self {
            state_file,
            log_file,
            grid_size,
            poll_interval: Duration::from_millis(poll_ms),
            display_binary,
            terminal_command,
            pid_file,
            session,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(state_file: PathBuf, grid_size: usize) -> Self {
        let log_file = default_log_file(&state_file);
        let pid_file = default_pid_file(&state_file);
        Self {
            state_file,
            log_file,
            grid_size,
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
            display_binary: PathBuf::from(UI_BIN_NAME),
            terminal_command: Vec::new(),
            pid_file,
            session: None,
        }
    }

    /// Environment handed to the display process so it resolves the same settings.
    pub fn child_env(&self) -> Vec<(&'static str, String)> {
        vec![
            (STATE_FILE_VAR, self.state_file.display().to_string()),
            (LOG_FILE_VAR, self.log_file.display().to_string()),
            (GRID_SIZE_VAR, self.grid_size.to_string()),
            (POLL_MS_VAR, self.poll_interval.as_millis().to_string()),
            (PID_FILE_VAR, self.pid_file.display().to_string()),
        ]
    }
}

fn default_state_file() -> PathBuf {
    std::env::temp_dir()
        .join("interactive-draw")
        .join("board_state.json")
}

fn default_log_file(state_file: &std::path::Path) -> PathBuf {
    state_file
        .parent()
        .map(|dir| dir.join("interactive_draw.log"))
        .unwrap_or_else(|| PathBuf::from("interactive_draw.log"))
}

fn default_pid_file(state_file: &std::path::Path) -> PathBuf {
    state_file
        .parent()
        .map(|dir| dir.join("display.pid"))
        .unwrap_or_else(|| PathBuf::from("display.pid"))
}

fn default_display_binary() -> PathBuf {
    let file_name = format!("{}{}", UI_BIN_NAME, std::env::consts::EXE_SUFFIX);
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&file_name)))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

fn default_terminal_command() -> Vec<String> {
    if cfg!(target_os = "windows") {
        // `start` treats its first quoted argument as the window title
        ["cmd", "/C", "start", ""]
            .iter()
            .map(|part| part.to_string())
            .collect()
    } else if cfg!(target_os = "linux") {
        split_command("x-terminal-emulator -e")
    } else {
        Vec::new()
    }
}

fn split_command(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

fn parse_grid_size(value: &str) -> Result<usize, ConfigError> {
    let size: usize = value
        .trim()
        .parse()
        .map_err(|e| ConfigError::InvalidValue(GRID_SIZE_VAR.to_string(), format!("{}", e)))?;
    if size == 0 || size > MAX_GRID_SIZE {
        return Err(ConfigError::InvalidValue(
            GRID_SIZE_VAR.to_string(),
            format!("expected 1..={}, got {}", MAX_GRID_SIZE, size),
        ));
    }
    Ok(size)
}

fn parse_poll_ms(value: &str) -> Result<u64, ConfigError> {
    let ms: u64 = value
        .trim()
        .parse()
        .map_err(|e| ConfigError::InvalidValue(POLL_MS_VAR.to_string(), format!("{}", e)))?;
    if ms == 0 {
        return Err(ConfigError::InvalidValue(
            POLL_MS_VAR.to_string(),
            "poll interval must be positive".to_string(),
        ));
    }
    Ok(ms)
}

//! # Interactive Draw
//!
//! A drawing grid shared between an agent and a human.
//!
//! This library provides:
//! - An MCP tool server (`start_drawing_session`, `toggle_cell_color`, `get_grid_state`)
//! - A terminal display window that mirrors the grid and toggles cells on click
//! - A JSON state file that both processes read and overwrite
//!
//! ## Architecture
//!
//! The two processes share nothing but the state file:
//! 1. The server reloads the file before every tool call and writes it after a change
//! 2. The display polls the file's modification time and repaints when it moves
//! 3. A click in the display reloads the file, flips one cell and writes it back
//!
//! Writes are last-writer-wins with no locking; see [`store::FileGridStore`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use interactive_draw::{config::Config, launcher::ProcessLauncher, service::DrawService,
//!     store::FileGridStore};
//!
//! let config = Config::from_env()?;
//! let store = Arc::new(FileGridStore::new(config.state_file.clone(), config.grid_size));
//! let mut service = DrawService::new(store, Box::new(ProcessLauncher::from_config(&config)));
//! service.toggle_cell(0, 0)?;
//! println!("{}", service.get_grid());
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod grid;
pub mod launcher;
pub mod logging;
pub mod mcp;
pub mod pid_file;
pub mod service;
pub mod store;
pub mod tools;

pub use config::Config;

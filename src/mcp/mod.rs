//! Model Context Protocol transport for the drawing tools.

mod server;
pub mod types;

pub use server::{McpServer, SERVER_NAME};

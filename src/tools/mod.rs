//! Tools exposed to the agent.
//!
//! Each tool wraps one `DrawService` operation: it declares a JSON Schema for its
//! arguments, deserializes them, and returns the confirmation text.

mod drawing;

pub use drawing::{GetGridState, StartDrawingSession, ToggleCellColor};

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use crate::service::{DrawService, ServiceError};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    InvalidParams(String),

    #[error("{0}")]
    Internal(String),
}

impl From<ServiceError> for ToolError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidParams(msg) => ToolError::InvalidParams(msg),
            ServiceError::Internal(msg) => ToolError::Internal(msg),
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// `grid_size` is the store's N at the time the tools are listed.
    fn description(&self, grid_size: usize) -> String;

    fn parameters_schema(&self, grid_size: usize) -> Value;

    async fn execute(&self, args: Value, service: &mut DrawService) -> Result<String, ToolError>;
}

/// The tools served over MCP, in listing order.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry with the three drawing tools.
    pub fn drawing() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(StartDrawingSession));
        registry.register(Box::new(ToggleCellColor));
        registry.register(Box::new(GetGridState));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
    }

    /// `tools/list` entries for a grid of `grid_size`.
    pub fn definitions(&self, grid_size: usize) -> Vec<Value> {
        self.tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name(),
                    "description": tool.description(grid_size),
                    "inputSchema": tool.parameters_schema(grid_size),
                })
            })
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

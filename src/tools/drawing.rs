//! Drawing grid tools.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolError};
use crate::service::DrawService;

/// Reset the grid and open the display window.
pub struct StartDrawingSession;

#[async_trait]
impl Tool for StartDrawingSession {
    fn name(&self) -> &str {
        "start_drawing_session"
    }

    fn description(&self, _grid_size: usize) -> String {
        "Start a new Drawing Session and launch the UI. This will open a separate window with the drawing grid UI.".to_string()
    }

    fn parameters_schema(&self, _grid_size: usize) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: Value, service: &mut DrawService) -> Result<String, ToolError> {
        Ok(service.start_session()?)
    }
}

/// Flip one cell between blank and marked.
pub struct ToggleCellColor;

#[derive(Debug, Deserialize)]
struct ToggleArgs {
    row: i64,
    col: i64,
}

#[async_trait]
impl Tool for ToggleCellColor {
    fn name(&self) -> &str {
        "toggle_cell_color"
    }

    fn description(&self, grid_size: usize) -> String {
        format!(
            "Toggle the color of a cell in the drawing grid. Row and column indices range from 0 to {}. Returns a confirmation naming the new cell state.",
            grid_size.saturating_sub(1)
        )
    }

    fn parameters_schema(&self, grid_size: usize) -> Value {
        let max = grid_size.saturating_sub(1);
        json!({
            "type": "object",
            "properties": {
                "row": {
                    "type": "integer",
                    "description": format!("Row index (0-{})", max)
                },
                "col": {
                    "type": "integer",
                    "description": format!("Column index (0-{})", max)
                }
            },
            "required": ["row", "col"]
        })
    }

    async fn execute(&self, args: Value, service: &mut DrawService) -> Result<String, ToolError> {
        let ToggleArgs { row, col } = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidParams(format!("Invalid arguments: {}", e)))?;
        Ok(service.toggle_cell(row, col)?)
    }
}

/// Read the grid as text.
pub struct GetGridState;

#[async_trait]
impl Tool for GetGridState {
    fn name(&self) -> &str {
        "get_grid_state"
    }

    fn description(&self, _grid_size: usize) -> String {
        "Get the current state of the drawing grid. Returns one line per row; marked cells are 'X', blank cells are spaces.".to_string()
    }

    fn parameters_schema(&self, _grid_size: usize) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: Value, service: &mut DrawService) -> Result<String, ToolError> {
        Ok(service.get_grid())
    }
}

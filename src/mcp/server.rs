//! MCP server over newline-delimited JSON-RPC.

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::types::*;
use crate::service::DrawService;
use crate::tools::{ToolError, ToolRegistry};

pub const SERVER_NAME: &str = "interactive-draw";

/// Routes requests to tools. Requests are handled one at a time, in arrival order.
pub struct McpServer {
    registry: ToolRegistry,
    service: DrawService,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, service: DrawService) -> Self {
        Self { registry, service }
    }

    /// Serve until `input` reaches EOF, then stop the display process.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                let mut encoded = serde_json::to_string(&response)
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
                encoded.push('\n');
                output.write_all(encoded.as_bytes()).await?;
                output.flush().await?;
            }
        }

        tracing::info!("Input closed, shutting down");
        self.service.shutdown();
        Ok(())
    }

    /// Decode one line and handle it. Returns `None` for notifications.
    pub async fn handle_line(&mut self, line: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Unparseable request: {}", e);
                return Some(Response::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<Request>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(Response::error(
                id,
                INVALID_REQUEST,
                format!("Invalid request: {}", e),
            )),
        }
    }

    pub async fn handle_request(&mut self, request: Request) -> Option<Response> {
        tracing::debug!(method = %request.method, "Handling request");

        if request.is_notification() {
            // initialized, cancelled, ... need no reply
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        if request.jsonrpc.as_deref() != Some(JSONRPC_VERSION) {
            tracing::warn!(version = ?request.jsonrpc, "Rejecting request with wrong jsonrpc version");
            return Some(Response::error(
                id,
                INVALID_REQUEST,
                format!("Invalid request: jsonrpc must be \"{}\"", JSONRPC_VERSION),
            ));
        }

        let outcome = match request.method.as_str() {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({
                "tools": self.registry.definitions(self.service.grid_size())
            })),
            "tools/call" => self.call_tool(request.params).await,
            other => Err((METHOD_NOT_FOUND, format!("Method not found: {}", other))),
        };

        Some(match outcome {
            Ok(result) => Response::success(id, result),
            Err((code, message)) => Response::error(id, code, message),
        })
    }

    async fn call_tool(&mut self, params: Value) -> Result<Value, (i64, String)> {
        let params: CallToolParams = serde_json::from_value(params)
            .map_err(|e| (INVALID_PARAMS, format!("Invalid tool call: {}", e)))?;

        let tool = self
            .registry
            .get(&params.name)
            .ok_or_else(|| (INVALID_PARAMS, format!("Unknown tool: {}", params.name)))?;

        tracing::info!(tool = %params.name, "Calling tool");
        match tool.execute(params.arguments, &mut self.service).await {
            Ok(text) => Ok(json!({
                "content": [{ "type": "text", "text": text }],
                "isError": false
            })),
            Err(ToolError::InvalidParams(msg)) => Err((INVALID_PARAMS, msg)),
            Err(ToolError::Internal(msg)) => {
                tracing::error!(tool = %params.name, "Tool failed: {}", msg);
                Err((INTERNAL_ERROR, msg))
            }
        }
    }
}

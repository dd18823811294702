/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests, one per line
/// 2. Routes tool calls to the habit tracker
/// 3. Writes JSON-RPC responses, one per line

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::mcp::protocol::*;
use crate::service::{HabitTracker, TrackerError};
use crate::storage::HabitStorage;
use crate::tools::{self, ToolResponse};
use crate::ServerError;

/// MCP server that exposes one owner's habits as tools
pub struct McpServer<S, C> {
    tracker: HabitTracker<S, C>,
    initialized: bool,
}

/// Why a tool call failed
enum CallError {
    /// Arguments didn't match the tool's schema
    InvalidArguments(String),
    /// The tool ran and reported a failure
    Tool(TrackerError),
}

impl<S: HabitStorage, C: Clock> McpServer<S, C> {
    pub fn new(tracker: HabitTracker<S, C>) -> Self {
        Self {
            tracker,
            initialized: false,
        }
    }

    pub fn tracker(&self) -> &HabitTracker<S, C> {
        &self.tracker
    }

    /// Whether the client has sent its `initialized` notification
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server on stdin/stdout until stdin closes
    pub async fn run(&mut self) -> Result<(), ServerError> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        self.serve(stdin, tokio::io::stdout()).await
    }

    /// Serve line-delimited JSON-RPC from `reader` to `writer` until EOF
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Starting MCP server, waiting for JSON-RPC requests...");
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.handle_line(&line) {
                        let response_str = serde_json::to_string(&response)?;
                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;
                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Blank lines and notifications produce no response.
    pub fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(Value::Null),
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version '{}'", request.jsonrpc),
            ));
        }

        if request.is_notification() {
            self.handle_notification(&request.method);
            return None;
        }

        Some(self.handle_request(request))
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "notifications/initialized" | "initialized" => {
                self.initialized = true;
                info!("MCP client initialized");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.unwrap_or(Value::Null);
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
            ),
        }
    }

    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Habit Streak MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(id, serde_json::to_value(result))
    }

    fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                );
            }
        };

        let tracker = &self.tracker;
        let args = tool_params.arguments;
        let outcome = match tool_params.name.as_str() {
            "habit_create" => call(args, |p| tools::create_habit(tracker, p)),
            "habit_update" => call(args, |p| tools::update_habit(tracker, p)),
            "habit_toggle" => call(args, |p| tools::toggle_habit(tracker, p)),
            "habit_delete" => call(args, |p| tools::delete_habit(tracker, p)),
            "habit_list" => call(args, |p| tools::list_habits(tracker, p)),
            "habit_stats" => call(args, |p| tools::get_habit_stats(tracker, p)),
            "habit_week" => call(args, |p| tools::get_habit_week(tracker, p)),
            other => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Unknown tool: {}", other),
                );
            }
        };

        let result = match outcome {
            Ok(result) => result,
            Err(CallError::InvalidArguments(message)) => {
                return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, message);
            }
            Err(CallError::Tool(e)) => {
                warn!("Tool '{}' failed: {}", tool_params.name, e);
                ToolCallResult::error(e.to_string())
            }
        };

        respond(id, serde_json::to_value(result))
    }
}

/// Deserialize a tool's arguments, run it and package the response
fn call<P, R>(
    args: Map<String, Value>,
    tool: impl FnOnce(P) -> Result<R, TrackerError>,
) -> Result<ToolCallResult, CallError>
where
    P: DeserializeOwned,
    R: ToolResponse,
{
    let params: P = serde_json::from_value(Value::Object(args))
        .map_err(|e| CallError::InvalidArguments(format!("Invalid arguments: {}", e)))?;
    let response = tool(params).map_err(CallError::Tool)?;

    let structured = serde_json::to_value(&response).unwrap_or(Value::Null);
    Ok(ToolCallResult::success(response.message().to_string(), structured))
}

fn respond(id: Value, result: Result<Value, serde_json::Error>) -> JsonRpcResponse {
    match result {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to serialize result: {}", e),
        ),
    }
}

fn definition<P: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let schema = schemars::schema_for!(P);
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::to_value(schema).unwrap_or_else(|_| json!({ "type": "object" })),
    }
}

/// Every tool this server provides
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        definition::<tools::CreateHabitParams>(
            "habit_create",
            "Create a new habit, tracked from today",
        ),
        definition::<tools::UpdateHabitParams>(
            "habit_update",
            "Rename a habit or change its color",
        ),
        definition::<tools::ToggleHabitParams>(
            "habit_toggle",
            "Mark a habit done (or not done) for today or a given day",
        ),
        definition::<tools::DeleteHabitParams>(
            "habit_delete",
            "Delete a habit and its whole history",
        ),
        definition::<tools::ListHabitsParams>(
            "habit_list",
            "List habits with streaks, success rates and whether each was done on a day",
        ),
        definition::<tools::StatsParams>(
            "habit_stats",
            "Overall statistics, plus the statistics of one habit when an ID is given",
        ),
        definition::<tools::WeekParams>(
            "habit_week",
            "Seven-day completion grid for one habit",
        ),
    ]
}

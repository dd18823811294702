/// Model Context Protocol front end
///
/// `protocol` holds the JSON-RPC and MCP message types; `server` reads
/// requests line by line and routes tool calls to the tracker.

pub mod protocol;
pub mod server;

pub use server::{tool_definitions, McpServer};

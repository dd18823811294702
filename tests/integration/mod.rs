/// Integration tests: tracker, SQLite storage and the MCP front end together
mod mcp_session;
mod tracker_workflow;

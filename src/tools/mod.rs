/// MCP tools for habit management
///
/// This module contains all the MCP tools that external clients can call to
/// interact with the habit tracker. Each tool takes its own parameter struct
/// (whose JSON schema is advertised by `tools/list`) and returns a
/// serializable response with a human-readable message.

pub mod create;
pub mod delete;
pub mod list;
pub mod stats;
pub mod toggle;
pub mod update;
pub mod week;

// Re-export tool functions for easy access
pub use create::*;
pub use delete::*;
pub use list::*;
pub use stats::*;
pub use toggle::*;
pub use update::*;
pub use week::*;

use serde::Serialize;

use crate::domain::{parse_day_key, Day, HabitId, Swatch};
use crate::service::TrackerError;

/// A tool result: structured fields plus the text shown to the user
pub trait ToolResponse: Serialize {
    fn message(&self) -> &str;
}

/// Parse a habit ID argument
fn parse_habit_id(value: &str) -> Result<HabitId, TrackerError> {
    Ok(HabitId::from_string(value)?)
}

/// Parse an optional `YYYY-MM-DD` argument, defaulting to today
fn parse_day_or(value: Option<&str>, today: Day) -> Result<Day, TrackerError> {
    match value {
        Some(value) => Ok(parse_day_key(value)?),
        None => Ok(today),
    }
}

/// Parse an optional color argument
fn parse_color(value: Option<&str>) -> Result<Option<Swatch>, TrackerError> {
    value.map(Swatch::parse).transpose().map_err(TrackerError::from)
}

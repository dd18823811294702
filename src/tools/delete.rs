/// Tool for deleting habits
///
/// This module implements the habit_delete MCP tool. Deletion removes the
/// habit and its whole history; there is no undo.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::service::{HabitTracker, TrackerError};
use crate::storage::HabitStorage;
use super::{parse_habit_id, ToolResponse};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    /// ID of the habit to delete
    pub habit_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
    pub message: String,
}

impl ToolResponse for DeleteHabitResponse {
    fn message(&self) -> &str {
        &self.message
    }
}

pub fn delete_habit<S: HabitStorage, C: Clock>(
    tracker: &HabitTracker<S, C>,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, TrackerError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = tracker.habit(&habit_id)?;
    tracker.delete_habit(&habit_id)?;

    Ok(DeleteHabitResponse {
        success: true,
        message: format!("Deleted habit '{}' and its history", habit.name),
    })
}

/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::domain::day_key;
use crate::service::{HabitTracker, TrackerError};
use crate::storage::HabitStorage;
use super::{parse_color, ToolResponse};

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit
    pub name: String,
    /// Palette color (green, blue, purple, red, orange, yellow) or #rrggbb.
    /// Picked automatically if omitted.
    pub color: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub message: String,
}

impl ToolResponse for CreateHabitResponse {
    fn message(&self) -> &str {
        &self.message
    }
}

/// Create a new habit starting today
pub fn create_habit<S: HabitStorage, C: Clock>(
    tracker: &HabitTracker<S, C>,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, TrackerError> {
    let color = parse_color(params.color.as_deref())?;
    let habit = tracker.create_habit(&params.name, color)?;

    Ok(CreateHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        message: format!(
            "Created habit '{}' ({}), tracking from {}.\nHabit ID: {}",
            habit.name,
            habit.color.display_name(),
            day_key(habit.created_on),
            habit.id
        ),
    })
}

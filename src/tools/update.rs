/// Tool for renaming or recoloring a habit
///
/// This module implements the habit_update MCP tool. History and streaks
/// can't be edited here; use habit_toggle for that.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::domain::DomainError;
use crate::service::{HabitTracker, TrackerError};
use crate::storage::HabitStorage;
use super::{parse_color, parse_habit_id, ToolResponse};

/// Parameters for updating a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    /// ID of the habit to update
    pub habit_id: String,
    /// New name
    pub name: Option<String>,
    /// New color: palette name or #rrggbb
    pub color: Option<String>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub name: String,
    pub color: String,
    pub message: String,
}

impl ToolResponse for UpdateHabitResponse {
    fn message(&self) -> &str {
        &self.message
    }
}

/// Update a habit's name and/or color
pub fn update_habit<S: HabitStorage, C: Clock>(
    tracker: &HabitTracker<S, C>,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, TrackerError> {
    let habit_id = parse_habit_id(&params.habit_id)?;

    if params.name.is_none() && params.color.is_none() {
        return Err(DomainError::Validation {
            message: "Nothing to update: provide a name or a color".to_string()
        }.into());
    }

    let color = parse_color(params.color.as_deref())?;
    let habit = tracker.update_details(&habit_id, params.name.as_deref(), color)?;

    Ok(UpdateHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        name: habit.name.clone(),
        color: habit.color.hex().to_string(),
        message: format!("Updated habit '{}' ({})", habit.name, habit.color.display_name()),
    })
}

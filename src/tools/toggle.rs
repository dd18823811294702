/// Tool for checking off (or un-checking) a habit on a day
///
/// This module implements the habit_toggle MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::domain::day_key;
use crate::service::{HabitTracker, TrackerError};
use crate::storage::HabitStorage;
use super::{parse_day_or, parse_habit_id, ToolResponse};

/// Parameters for toggling a habit completion
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToggleHabitParams {
    /// ID of the habit
    pub habit_id: String,
    /// Day to toggle (YYYY-MM-DD). Defaults to today.
    pub date: Option<String>,
}

/// Response from toggling a habit
#[derive(Debug, Serialize)]
pub struct ToggleHabitResponse {
    pub success: bool,
    pub date: String,
    pub completed: bool,
    pub current_streak: u32,
    pub best_streak: u32,
    pub message: String,
}

impl ToolResponse for ToggleHabitResponse {
    fn message(&self) -> &str {
        &self.message
    }
}

/// Flip the completion state of a habit for one day
pub fn toggle_habit<S: HabitStorage, C: Clock>(
    tracker: &HabitTracker<S, C>,
    params: ToggleHabitParams,
) -> Result<ToggleHabitResponse, TrackerError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let day = parse_day_or(params.date.as_deref(), tracker.today())?;

    let habit = tracker.toggle_completion(&habit_id, day)?;
    let completed = habit.is_completed_on(day);

    let message = if completed {
        format!(
            "Marked '{}' done for {}. Current streak: {} day{} (best {})",
            habit.name,
            day_key(day),
            habit.current_streak,
            if habit.current_streak == 1 { "" } else { "s" },
            habit.best_streak
        )
    } else {
        format!(
            "Marked '{}' not done for {}. Current streak: {} (best {})",
            habit.name,
            day_key(day),
            habit.current_streak,
            habit.best_streak
        )
    };

    Ok(ToggleHabitResponse {
        success: true,
        date: day_key(day),
        completed,
        current_streak: habit.current_streak,
        best_streak: habit.best_streak,
        message,
    })
}

/// Tool for listing all habits
///
/// This module implements the habit_list MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{habit_success_rate, recorded_completion_percentage, HabitStats};
use crate::clock::Clock;
use crate::domain::{day_key, Day, DomainError};
use crate::service::{HabitTracker, TrackerError};
use crate::storage::HabitStorage;
use super::{parse_day_or, ToolResponse};

/// Parameters for listing habits
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Day to report completion for (YYYY-MM-DD). Defaults to today.
    pub date: Option<String>,
    /// Sort by: "created" (default), "name", "streak" or "success_rate"
    pub sort_by: Option<String>,
}

/// Information about a habit in the list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub name: String,
    pub color: String,
    pub current_streak: u32,
    pub best_streak: u32,
    pub success_rate: u8,
    pub completion_percentage: u8,
    pub completed_on_date: bool,
    pub last_completed: Option<String>,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub date: String,
    pub habits: Vec<HabitSummary>,
    pub summary: HabitStats,
    pub message: String,
}

impl ToolResponse for ListHabitsResponse {
    fn message(&self) -> &str {
        &self.message
    }
}

/// List habits with their streaks and whether they were done on a day
pub fn list_habits<S: HabitStorage, C: Clock>(
    tracker: &HabitTracker<S, C>,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, TrackerError> {
    let today = tracker.today();
    let day = parse_day_or(params.date.as_deref(), today)?;

    let mut habits: Vec<HabitSummary> = tracker
        .habits_on(day)?
        .into_iter()
        .map(|entry| {
            let habit = entry.habit;
            HabitSummary {
                habit_id: habit.id.to_string(),
                success_rate: habit_success_rate(&habit, today),
                completion_percentage: recorded_completion_percentage(&habit.completions),
                color: habit.color.hex().to_string(),
                current_streak: habit.current_streak,
                best_streak: habit.best_streak,
                completed_on_date: entry.completed,
                last_completed: habit.last_completed.map(day_key),
                name: habit.name,
            }
        })
        .collect();

    match params.sort_by.as_deref().unwrap_or("created") {
        "created" => {}
        "name" => habits.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        "streak" => habits.sort_by(|a, b| b.current_streak.cmp(&a.current_streak)),
        "success_rate" => habits.sort_by(|a, b| b.success_rate.cmp(&a.success_rate)),
        other => {
            return Err(DomainError::Validation {
                message: format!("Unknown sort order '{}'", other),
            }
            .into())
        }
    }

    let summary = tracker.snapshot().stats;
    let message = render_list(day, &habits, &summary);

    Ok(ListHabitsResponse {
        date: day_key(day),
        habits,
        summary,
        message,
    })
}

fn render_list(day: Day, habits: &[HabitSummary], summary: &HabitStats) -> String {
    if habits.is_empty() {
        return "No habits found. Create your first habit to get started!".to_string();
    }

    let lines = habits
        .iter()
        .map(|h| {
            format!(
                "{} {} ({})\n   Streak: {} days (best {}) | Success: {}% | ID: {}",
                if h.completed_on_date { "[x]" } else { "[ ]" },
                h.name,
                h.color,
                h.current_streak,
                h.best_streak,
                h.success_rate,
                h.habit_id
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Habits for {} ({} total)\n\n{}\n\nCompleted days: {} | Overall success: {}% | Best streak: {} days",
        day_key(day),
        summary.total_habits,
        lines,
        summary.total_completions,
        summary.avg_success_rate,
        summary.best_streak
    )
}

/// Tool for habit statistics
///
/// This module implements the habit_stats MCP tool: overall counters for all
/// habits, and the statistics panel for one habit when an ID is given.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{HabitStatistics, HabitStats};
use crate::clock::Clock;
use crate::service::{HabitTracker, TrackerError};
use crate::storage::HabitStorage;
use super::{parse_habit_id, ToolResponse};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct StatsParams {
    /// ID of a habit to report on (optional)
    pub habit_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub overall: HabitStats,
    /// Mean of per-habit success rates
    pub average_success_rate: u8,
    pub habit: Option<HabitStatistics>,
    pub message: String,
}

impl ToolResponse for StatsResponse {
    fn message(&self) -> &str {
        &self.message
    }
}

pub fn get_habit_stats<S: HabitStorage, C: Clock>(
    tracker: &HabitTracker<S, C>,
    params: StatsParams,
) -> Result<StatsResponse, TrackerError> {
    let habit_id = params.habit_id.as_deref().map(parse_habit_id).transpose()?;
    let overview = tracker.overview(habit_id.as_ref())?;
    let overall = overview.counters;
    let average_success_rate = overview.average_success_rate;
    let habit = overview.selected;

    let mut message = format!(
        "Habits: {} | Completed days: {} | Success rate (all days): {}% | Average habit success: {}% | Best streak: {} days",
        overall.total_habits,
        overall.total_completions,
        overall.avg_success_rate,
        average_success_rate,
        overall.best_streak
    );
    if let Some(stats) = &habit {
        message.push_str(&format!(
            "\nSelected habit: {}% success, {} of {} days completed",
            stats.success_rate, stats.completed_days, stats.total_days
        ));
    }

    Ok(StatsResponse {
        overall,
        average_success_rate,
        habit,
        message,
    })
}

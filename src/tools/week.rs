/// Tool for the weekly completion view
///
/// This module implements the habit_week MCP tool.

use chrono::Weekday;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::DayStatus;
use crate::clock::Clock;
use crate::domain::{day_key, shift_days, start_of_week, DomainError};
use crate::service::{HabitTracker, TrackerError};
use crate::storage::HabitStorage;
use super::{parse_day_or, parse_habit_id, ToolResponse};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WeekParams {
    /// ID of the habit
    pub habit_id: String,
    /// Any day inside the wanted week (YYYY-MM-DD). Defaults to today.
    pub date: Option<String>,
    /// "sunday" (default) or "monday"
    pub week_starts_on: Option<String>,
    /// Weeks to move from `date`: -1 for the previous week, 1 for the next
    pub offset_weeks: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct WeekResponse {
    pub week_start: String,
    pub days: Vec<DayStatus>,
    pub completed_count: usize,
    pub message: String,
}

impl ToolResponse for WeekResponse {
    fn message(&self) -> &str {
        &self.message
    }
}

pub fn get_habit_week<S: HabitStorage, C: Clock>(
    tracker: &HabitTracker<S, C>,
    params: WeekParams,
) -> Result<WeekResponse, TrackerError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let anchor = parse_day_or(params.date.as_deref(), tracker.today())?;
    let first_day = parse_week_start(params.week_starts_on.as_deref())?;

    let anchor = shift_days(anchor, 7 * params.offset_weeks.unwrap_or(0) as i64);
    let week_start = start_of_week(anchor, first_day);
    let view = tracker.week_view(&habit_id, week_start)?;

    let grid = view
        .iter()
        .map(|d| format!("{} {}", d.date.format("%a %d"), if d.completed { "✓" } else { "·" }))
        .collect::<Vec<_>>()
        .join(" | ");

    Ok(WeekResponse {
        week_start: day_key(week_start),
        completed_count: view.completed_count(),
        message: format!(
            "Week of {}: {}/7 days completed\n{}",
            day_key(week_start),
            view.completed_count(),
            grid
        ),
        days: view.days.to_vec(),
    })
}

fn parse_week_start(value: Option<&str>) -> Result<Weekday, TrackerError> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("sunday") => Ok(Weekday::Sun),
        Some("monday") => Ok(Weekday::Mon),
        Some(other) => Err(DomainError::Validation {
            message: format!("Weeks start on sunday or monday, not '{}'", other),
        }
        .into()),
    }
}

/// Success rates and aggregate counters
///
/// Two different averages live here on purpose. `cross_habit_average` is the
/// plain mean of per-habit success rates, while `HabitStats::avg_success_rate`
/// weights every recorded day equally across all habits. They answer different
/// questions and are reported side by side.

use serde::Serialize;
use crate::domain::{
    completed_day_count, days_between, recorded_day_count, CompletionEntry, Day, Habit,
};

/// Totals across every habit an owner has
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HabitStats {
    /// Number of habits
    pub total_habits: usize,
    /// Completed days summed over all habits
    pub total_completions: usize,
    /// Completed days / recorded days over all habits, as a percentage
    pub avg_success_rate: u8,
    /// Highest best streak of any habit
    pub best_streak: u32,
}

/// Figures for one selected habit, plus the cross-habit average
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HabitStatistics {
    pub success_rate: u8,
    pub average_success_rate: u8,
    pub completed_days: usize,
    pub total_days: u32,
}

/// Days elapsed since creation, never less than 1
pub fn total_days(created_on: Day, today: Day) -> u32 {
    let elapsed = days_between(today, created_on).max(1);
    u32::try_from(elapsed).unwrap_or(u32::MAX)
}

/// Days the habit was marked done
pub fn completed_days(habit: &Habit) -> usize {
    completed_day_count(&habit.completions)
}

/// Completed days as a percentage of days since creation, in `[0, 100]`
pub fn habit_success_rate(habit: &Habit, today: Day) -> u8 {
    percentage(completed_days(habit), total_days(habit.created_on, today) as usize)
}

/// Mean of the per-habit success rates, 0 with no habits
pub fn cross_habit_average(habits: &[Habit], today: Day) -> u8 {
    if habits.is_empty() {
        return 0;
    }
    let sum: usize = habits
        .iter()
        .map(|h| habit_success_rate(h, today) as usize)
        .sum();
    percentage(sum, habits.len() * 100)
}

/// Roll every habit up into one set of counters
pub fn aggregate_counters(habits: &[Habit]) -> HabitStats {
    let mut completed = 0;
    let mut recorded = 0;
    let mut best_streak = 0;

    for habit in habits {
        completed += completed_day_count(&habit.completions);
        recorded += recorded_day_count(&habit.completions);
        best_streak = best_streak.max(habit.best_streak);
    }

    HabitStats {
        total_habits: habits.len(),
        total_completions: completed,
        avg_success_rate: percentage(completed, recorded),
        best_streak,
    }
}

/// Statistics panel for `selected`, with the average taken over `habits`
pub fn habit_statistics(selected: &Habit, habits: &[Habit], today: Day) -> HabitStatistics {
    HabitStatistics {
        success_rate: habit_success_rate(selected, today),
        average_success_rate: cross_habit_average(habits, today),
        completed_days: completed_days(selected),
        total_days: total_days(selected.created_on, today),
    }
}

/// Share of recorded days that were completed, 0 with nothing recorded
pub fn recorded_completion_percentage(history: &[CompletionEntry]) -> u8 {
    percentage(completed_day_count(history), recorded_day_count(history))
}

/// `round(part / whole * 100)`, clamped to `[0, 100]`
fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let pct = (part as f64 / whole as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

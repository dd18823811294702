/// Streak calculation
///
/// This module defines the Streak struct holding the current and best run of
/// consecutive completed days, and the logic that derives it from a
/// completion history.

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};
use crate::domain::{days_between, CompletionEntry, Day};

/// Current and best consecutive-day streaks for a habit
///
/// `best >= current` always holds for values produced by
/// [`Streak::calculate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Consecutive completed days ending today or yesterday
    pub current: u32,
    /// Longest run of consecutive completed days ever recorded
    pub best: u32,
}

impl Streak {
    /// Calculate streaks from a completion history
    ///
    /// The history may be sparse or reconciled, in any order, and may
    /// contain several entries for the same day. A day counts as completed
    /// if any of its entries is marked completed.
    pub fn calculate(history: &[CompletionEntry], today: Day) -> Self {
        let days = Self::completed_days_newest_first(history);

        if days.is_empty() {
            return Self::default();
        }

        Self {
            current: Self::calculate_current_streak(&days, today),
            best: Self::calculate_best_streak(&days),
        }
    }

    /// Completed days, deduplicated, newest first
    fn completed_days_newest_first(history: &[CompletionEntry]) -> Vec<Day> {
        let unique: BTreeSet<Day> = history
            .iter()
            .filter(|e| e.completed)
            .map(|e| e.date)
            .collect();
        unique.into_iter().rev().collect()
    }

    /// Run ending at the most recent completed day, if that day is today or
    /// yesterday. Anything older means the streak is already broken.
    fn calculate_current_streak(days: &[Day], today: Day) -> u32 {
        let most_recent = days[0];
        if days_between(today, most_recent) > 1 {
            return 0;
        }

        let mut streak = 1;
        for pair in days.windows(2) {
            if days_between(pair[0], pair[1]) != 1 {
                break;
            }
            streak += 1;
        }
        streak
    }

    /// Longest run anywhere in the history
    fn calculate_best_streak(days: &[Day]) -> u32 {
        let mut best = 1;
        let mut run = 1;

        for pair in days.windows(2) {
            if days_between(pair[0], pair[1]) == 1 {
                run += 1;
                best = best.max(run);
            } else {
                run = 1;
            }
        }

        best
    }
}

/// Compute `{current, best}` streaks for a history relative to `today`
pub fn compute_streaks(history: &[CompletionEntry], today: Day) -> Streak {
    Streak::calculate(history, today)
}

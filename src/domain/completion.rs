/// Completion entries and read-only views over a completion history
///
/// A history is a plain slice of CompletionEntry values. Stored histories
/// hold at most one entry per day, but everything here tolerates duplicates:
/// when a day appears more than once the entry seen last wins.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::domain::Day;

/// Whether a habit was done on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionEntry {
    /// The day this entry is for
    pub date: Day,
    /// True if the habit was done that day
    pub completed: bool,
}

impl CompletionEntry {
    pub fn new(date: Day, completed: bool) -> Self {
        Self { date, completed }
    }

    /// An entry marking the day as done
    pub fn done(date: Day) -> Self {
        Self::new(date, true)
    }

    /// An entry marking the day as not done
    pub fn missed(date: Day) -> Self {
        Self::new(date, false)
    }
}

/// Collapse a history into one flag per day, ordered by day
pub fn completion_map(history: &[CompletionEntry]) -> BTreeMap<Day, bool> {
    history.iter().map(|e| (e.date, e.completed)).collect()
}

/// Was the habit done on `day`? Days with no entry count as not done.
pub fn completed_on(history: &[CompletionEntry], day: Day) -> bool {
    history
        .iter()
        .rev()
        .find(|e| e.date == day)
        .map_or(false, |e| e.completed)
}

/// Number of distinct days marked done
pub fn completed_day_count(history: &[CompletionEntry]) -> usize {
    completion_map(history).values().filter(|done| **done).count()
}

/// Number of distinct days with any entry at all
pub fn recorded_day_count(history: &[CompletionEntry]) -> usize {
    completion_map(history).len()
}

/// Latest day marked done, if any
pub fn last_completed(history: &[CompletionEntry]) -> Option<Day> {
    completion_map(history)
        .into_iter()
        .rev()
        .find_map(|(day, done)| done.then_some(day))
}

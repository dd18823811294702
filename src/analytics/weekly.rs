/// Weekly views of a completion history
///
/// A week is any 7 consecutive days starting at a caller-chosen day. Whether
/// weeks begin on Sunday or Monday is decided by the caller (see
/// `domain::start_of_week`), not here.

use serde::Serialize;
use crate::domain::{completion_map, days_between, shift_days, CompletionEntry, Day};

/// One day of a week view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayStatus {
    pub date: Day,
    pub completed: bool,
}

/// Seven consecutive days starting at `start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    pub start: Day,
    pub days: [DayStatus; 7],
}

impl WeekView {
    /// Number of days in the week marked done
    pub fn completed_count(&self) -> usize {
        self.days.iter().filter(|d| d.completed).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DayStatus> {
        self.days.iter()
    }
}

/// Project a history onto the week starting at `week_start`
///
/// Days without an entry are reported as not completed. The history itself
/// is never modified.
///
/// `week_start` must be at least six days before `Day::MAX`; later starts
/// would repeat the last representable date.
pub fn week_view(history: &[CompletionEntry], week_start: Day) -> WeekView {
    debug_assert!(
        days_between(Day::MAX, week_start) >= 6,
        "week starting {} runs past the last representable day",
        week_start
    );
    let by_day = completion_map(history);
    let days: [DayStatus; 7] = std::array::from_fn(|offset| {
        let date = shift_days(week_start, offset as i64);
        DayStatus {
            date,
            completed: by_day.get(&date).copied().unwrap_or(false),
        }
    });

    WeekView { start: week_start, days }
}

/// Start of the week before the one starting at `week_start`
pub fn previous_week(week_start: Day) -> Day {
    shift_days(week_start, -7)
}

/// Start of the week after the one starting at `week_start`
pub fn next_week(week_start: Day) -> Day {
    shift_days(week_start, 7)
}

/// Backfilling a sparse completion history against the calendar
///
/// Every day from the habit's creation day up to (but not including) today
/// must have a definite status. Days the user never touched are recorded as
/// missed. Today is left alone because it is still in progress.

use std::collections::btree_map::Entry;
use serde::Serialize;

use crate::domain::{completion_map, iterate_days, CompletionEntry, Day};

/// Result of reconciling a history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// One entry per day, ascending. Entries outside `[creation, today)`
    /// (including future-dated ones) are carried over untouched.
    pub history: Vec<CompletionEntry>,
    /// True iff at least one missed day was synthesized. Callers use this
    /// to decide whether the history needs writing back.
    pub was_modified: bool,
}

/// Produce a gap-free history covering `[creation_day, today)`.
///
/// With no known creation day there is nothing to backfill from, and the
/// input comes back exactly as given.
pub fn reconcile(
    creation_day: Option<Day>,
    today: Day,
    history: &[CompletionEntry],
) -> Reconciliation {
    let Some(creation_day) = creation_day else {
        return Reconciliation {
            history: history.to_vec(),
            was_modified: false,
        };
    };

    let mut by_day = completion_map(history);
    if by_day.len() < history.len() {
        tracing::warn!(
            "Completion history has {} duplicate day entries; keeping the last of each",
            history.len() - by_day.len()
        );
    }

    let mut synthesized = 0usize;
    for day in iterate_days(creation_day, today) {
        if let Entry::Vacant(slot) = by_day.entry(day) {
            slot.insert(false);
            synthesized += 1;
        }
    }

    if synthesized > 0 {
        tracing::debug!("Backfilled {} missed days since {}", synthesized, creation_day);
    }

    Reconciliation {
        history: by_day
            .into_iter()
            .map(|(date, completed)| CompletionEntry::new(date, completed))
            .collect(),
        was_modified: synthesized > 0,
    }
}

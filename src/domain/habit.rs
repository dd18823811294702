/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a habit a user
/// checks off day by day, along with validation and the mutations that keep
/// its cached streak fields in step with its completion history.

use serde::{Deserialize, Serialize};
use crate::domain::{
    completed_on, last_completed, reconcile, CompletionEntry, Day, DomainError, HabitId, OwnerId,
    Streak, Swatch,
};

/// Longest habit name we accept
const MAX_NAME_LEN: usize = 100;

/// A habit and its day-by-day completion history
///
/// `current_streak`, `best_streak` and `last_completed` are derived from
/// `completions`. They're stored alongside it for cheap listing and are
/// recomputed on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Who this habit belongs to
    pub owner_id: OwnerId,
    /// Display name (e.g., "Morning Run", "Read 20 pages")
    pub name: String,
    /// Color swatch shown next to the habit
    pub color: Swatch,
    /// Day the habit was created; never changes
    pub created_on: Day,
    /// Consecutive completed days ending today or yesterday
    pub current_streak: u32,
    /// Best streak ever recorded
    pub best_streak: u32,
    /// Latest completed day
    pub last_completed: Option<Day>,
    /// Completion history, ordered by day, at most one entry per day
    pub completions: Vec<CompletionEntry>,
}

/// Engine-relevant view of a habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitSnapshot {
    pub creation_day: Day,
    pub completions: Vec<CompletionEntry>,
    pub current_streak: u32,
    pub best_streak: u32,
}

impl Habit {
    /// Create a new habit with an empty history and zero streaks
    pub fn new(
        owner_id: OwnerId,
        name: String,
        color: Swatch,
        created_on: Day,
    ) -> Result<Self, DomainError> {
        let name = Self::validate_name(&name)?;
        color.validate()?;

        Ok(Self {
            id: HabitId::new(),
            owner_id,
            name,
            color,
            created_on,
            current_streak: 0,
            best_streak: 0,
            last_completed: None,
            completions: Vec::new(),
        })
    }

    /// Create a habit from existing data (used when loading from database)
    ///
    /// This constructor assumes data is already validated and is mainly used
    /// by the storage layer.
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: HabitId,
        owner_id: OwnerId,
        name: String,
        color: Swatch,
        created_on: Day,
        current_streak: u32,
        best_streak: u32,
        last_completed: Option<Day>,
        completions: Vec<CompletionEntry>,
    ) -> Self {
        Self {
            id,
            owner_id,
            name,
            color,
            created_on,
            current_streak,
            best_streak,
            last_completed,
            completions,
        }
    }

    /// Flip the completion state of `day` and recompute streaks
    ///
    /// A day with no entry becomes completed. Returns the day's new state.
    pub fn toggle_completion(&mut self, day: Day, today: Day) -> bool {
        let completed = match self.completions.iter_mut().rev().find(|e| e.date == day) {
            Some(entry) => {
                entry.completed = !entry.completed;
                entry.completed
            }
            None => {
                let at = self.completions.partition_point(|e| e.date < day);
                self.completions.insert(at, CompletionEntry::done(day));
                true
            }
        };

        self.refresh(today);
        completed
    }

    /// Backfill missed days up to yesterday and recompute streaks
    ///
    /// Returns true if days were added, i.e. the history needs saving.
    pub fn reconcile(&mut self, today: Day) -> bool {
        let result = reconcile(Some(self.created_on), today, &self.completions);
        self.completions = result.history;
        self.refresh(today);
        result.was_modified
    }

    /// Recompute the cached streak fields from the history
    pub fn refresh(&mut self, today: Day) {
        let streak = Streak::calculate(&self.completions, today);
        self.current_streak = streak.current;
        self.best_streak = streak.best;
        self.last_completed = last_completed(&self.completions);
    }

    pub fn rename(&mut self, name: &str) -> Result<(), DomainError> {
        self.name = Self::validate_name(name)?;
        Ok(())
    }

    pub fn recolor(&mut self, color: Swatch) -> Result<(), DomainError> {
        color.validate()?;
        self.color = color;
        Ok(())
    }

    pub fn is_completed_on(&self, day: Day) -> bool {
        completed_on(&self.completions, day)
    }

    /// True if the current streak is at least `min` days
    pub fn has_streak(&self, min: u32) -> bool {
        self.current_streak >= min
    }

    pub fn streak(&self) -> Streak {
        Streak {
            current: self.current_streak,
            best: self.best_streak,
        }
    }

    pub fn snapshot(&self) -> HabitSnapshot {
        HabitSnapshot {
            creation_day: self.created_on,
            completions: self.completions.clone(),
            current_streak: self.current_streak,
            best_streak: self.best_streak,
        }
    }

    /// Validate habit name, returning it trimmed
    fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::InvalidHabitName(format!(
                "Habit name cannot be longer than {} characters",
                MAX_NAME_LEN
            )));
        }

        Ok(trimmed.to_string())
    }
}

/// Storage layer for persisting habit data
///
/// This module is the durable store the tracker reads from and writes back
/// to. The engine itself never touches it. SQLite is the implementation,
/// behind the HabitStorage trait.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;
use crate::domain::{CompletionEntry, Day, Habit, HabitId, OwnerId, Swatch};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Field-level update of a stored habit
///
/// Only fields that are `Some` are written. `last_completed` is doubly
/// optional so it can be cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub color: Option<Swatch>,
    pub completions: Option<Vec<CompletionEntry>>,
    pub current_streak: Option<u32>,
    pub best_streak: Option<u32>,
    pub last_completed: Option<Option<Day>>,
}

impl HabitUpdate {
    /// History and the streak fields derived from it
    pub fn progress(habit: &Habit) -> Self {
        Self {
            completions: Some(habit.completions.clone()),
            current_streak: Some(habit.current_streak),
            best_streak: Some(habit.best_streak),
            last_completed: Some(habit.last_completed),
            ..Self::default()
        }
    }

    /// Name and color
    pub fn details(habit: &Habit) -> Self {
        Self {
            name: Some(habit.name.clone()),
            color: Some(habit.color.clone()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Trait defining the durable store for habits
///
/// Keeping this a trait lets the tracker run against SQLite in production
/// and against anything else in tests.
pub trait HabitStorage {
    /// Every habit belonging to `owner`, with its completion history
    fn fetch_habits_by_owner(&self, owner: &OwnerId) -> Result<Vec<Habit>, StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Create a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Apply a field-level update atomically
    fn update_habit(&self, habit_id: &HabitId, update: &HabitUpdate) -> Result<(), StorageError>;

    /// Delete a habit and its history. Not recoverable.
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;
}

impl<T: HabitStorage + ?Sized> HabitStorage for &T {
    fn fetch_habits_by_owner(&self, owner: &OwnerId) -> Result<Vec<Habit>, StorageError> {
        (**self).fetch_habits_by_owner(owner)
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        (**self).get_habit(habit_id)
    }

    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        (**self).create_habit(habit)
    }

    fn update_habit(&self, habit_id: &HabitId, update: &HabitUpdate) -> Result<(), StorageError> {
        (**self).update_habit(habit_id, update)
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        (**self).delete_habit(habit_id)
    }
}

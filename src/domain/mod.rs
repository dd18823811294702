/// Domain module containing the habit completion and streak engine
///
/// This module defines the core entities (Habit, CompletionEntry) and the
/// pure calendar, reconciliation and streak logic that operates on them.
/// Nothing in here reads the clock or touches storage; "today" is always
/// passed in by the caller.

pub mod calendar;
pub mod completion;
pub mod habit;
pub mod reconcile;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use calendar::*;
pub use completion::*;
pub use habit::*;
pub use reconcile::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid color: {0} (expected a palette name or #rrggbb)")]
    InvalidColor(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),
}

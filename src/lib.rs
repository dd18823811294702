/// Public library interface for the habit streak engine
///
/// The pure engine lives in `domain` and `analytics`; `service` wires it to
/// storage and a clock, and `mcp` exposes it as Model Context Protocol tools
/// over stdin/stdout.

use std::path::PathBuf;
use thiserror::Error;

pub mod analytics;
pub mod clock;
pub mod domain;
pub mod mcp;
pub mod service;
pub mod storage;
pub mod tools;

pub use analytics::{
    aggregate_counters, habit_statistics, week_view, DayStatus, HabitStatistics, HabitStats,
    WeekView,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::*;
pub use service::{HabitDay, HabitTracker, TrackerError, TrackerOverview, TrackerSnapshot};
pub use storage::{HabitStorage, HabitUpdate, SqliteStorage, StorageError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Habit streak server backed by SQLite and the system clock
pub struct HabitTrackerServer {
    tracker: HabitTracker<SqliteStorage, SystemClock>,
}

impl HabitTrackerServer {
    /// Open the database at `db_path` and serve habits for `owner`
    ///
    /// The schema is created or migrated on open.
    pub fn new(db_path: PathBuf, owner: OwnerId, calendar: Calendar) -> Result<Self, ServerError> {
        tracing::info!(
            "Initializing habit streak server with database {:?} (owner {}, UTC offset {} min)",
            db_path,
            owner,
            calendar.offset_minutes()
        );

        let storage = SqliteStorage::new(db_path)?;
        Ok(Self {
            tracker: HabitTracker::new(storage, SystemClock, calendar, owner),
        })
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// Returns once stdin is closed.
    pub async fn run(self) -> Result<(), ServerError> {
        let habits = self.tracker.load_habits()?;
        tracing::info!("Server started, found {} existing habits", habits.len());

        let mut mcp_server = mcp::McpServer::new(self.tracker);
        mcp_server.run().await
    }

    pub fn tracker(&self) -> &HabitTracker<SqliteStorage, SystemClock> {
        &self.tracker
    }
}

/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habits and their completion histories. It handles all SQL
/// queries and data conversion.

use std::path::PathBuf;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{
    day_key, parse_day_key, CompletionEntry, Day, Habit, HabitId, OwnerId, Swatch,
};
use crate::storage::{migrations, HabitStorage, HabitUpdate, StorageError};

const HABIT_COLUMNS: &str =
    "id, owner_id, name, color, created_on, current_streak, best_streak, last_completed";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) the database file and bring its schema up to date
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// A private database that lives as long as this value
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        // Completions go away with their habit
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    /// Map a habits row; completions are loaded separately
    fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
        let id_str: String = row.get(0)?;
        let id = HabitId::from_string(&id_str).map_err(|_| invalid_column(0, "Invalid UUID"))?;

        let owner_str: String = row.get(1)?;
        let owner_id = OwnerId::new(owner_str).map_err(|_| invalid_column(1, "Invalid owner"))?;

        let color_str: String = row.get(3)?;
        let color = Swatch::parse(&color_str).map_err(|_| invalid_column(3, "Invalid color"))?;

        let created_on = day_column(row, 4)?;

        let last_completed: Option<String> = row.get(7)?;
        let last_completed = last_completed
            .map(|s| parse_day_key(&s))
            .transpose()
            .map_err(|_| invalid_column(7, "Invalid date"))?;

        Ok(Habit::from_existing(
            id,
            owner_id,
            row.get(2)?, // name
            color,
            created_on,
            row.get(5)?, // current_streak
            row.get(6)?, // best_streak
            last_completed,
            Vec::new(),
        ))
    }

    /// Completion history for a habit, ordered by day
    fn load_completions(&self, habit_id: &HabitId) -> Result<Vec<CompletionEntry>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT day, completed FROM habit_completions
             WHERE habit_id = ?1 ORDER BY day",
        )?;

        let rows = stmt.query_map(params![habit_id.to_string()], |row| {
            Ok(CompletionEntry::new(day_column(row, 0)?, row.get(1)?))
        })?;

        let mut completions = Vec::new();
        for entry in rows {
            completions.push(entry?);
        }
        Ok(completions)
    }

    /// Replace a habit's completion rows inside an open transaction
    fn replace_completions(
        conn: &Connection,
        habit_id: &HabitId,
        completions: &[CompletionEntry],
    ) -> Result<(), StorageError> {
        conn.execute(
            "DELETE FROM habit_completions WHERE habit_id = ?1",
            params![habit_id.to_string()],
        )?;

        // INSERT OR REPLACE keeps the last entry if a day repeats
        let mut stmt = conn.prepare(
            "INSERT OR REPLACE INTO habit_completions (habit_id, day, completed)
             VALUES (?1, ?2, ?3)",
        )?;
        for entry in completions {
            stmt.execute(params![habit_id.to_string(), day_key(entry.date), entry.completed])?;
        }
        Ok(())
    }
}

fn invalid_column(index: usize, what: &str) -> rusqlite::Error {
    rusqlite::Error::InvalidColumnType(index, what.to_string(), rusqlite::types::Type::Text)
}

fn day_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Day> {
    let value: String = row.get(index)?;
    parse_day_key(&value).map_err(|_| invalid_column(index, "Invalid date"))
}

impl HabitStorage for SqliteStorage {
    fn fetch_habits_by_owner(&self, owner: &OwnerId) -> Result<Vec<Habit>, StorageError> {
        let sql = format!(
            "SELECT {} FROM habits WHERE owner_id = ?1 ORDER BY created_on, name, id",
            HABIT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![owner.as_str()], Self::habit_from_row)?;

        let mut habits = Vec::new();
        for habit in rows {
            let mut habit = habit?;
            habit.completions = self.load_completions(&habit.id)?;
            habits.push(habit);
        }

        tracing::debug!("Fetched {} habits for owner {}", habits.len(), owner);
        Ok(habits)
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let sql = format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS);
        let habit = self
            .conn
            .query_row(&sql, params![habit_id.to_string()], Self::habit_from_row)
            .optional()?;

        match habit {
            Some(mut habit) => {
                habit.completions = self.load_completions(habit_id)?;
                Ok(habit)
            }
            None => Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            }),
        }
    }

    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO habits (
                id, owner_id, name, color, created_on,
                current_streak, best_streak, last_completed
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                habit.id.to_string(),
                habit.owner_id.as_str(),
                habit.name,
                habit.color.hex(),
                day_key(habit.created_on),
                habit.current_streak,
                habit.best_streak,
                habit.last_completed.map(day_key),
            ],
        )?;
        Self::replace_completions(&tx, &habit.id, &habit.completions)?;
        tx.commit()?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn update_habit(&self, habit_id: &HabitId, update: &HabitUpdate) -> Result<(), StorageError> {
        let id = habit_id.to_string();
        let tx = self.conn.unchecked_transaction()?;

        let exists = tx
            .query_row("SELECT 1 FROM habits WHERE id = ?1", params![id], |_| Ok(()))
            .optional()?
            .is_some();
        if !exists {
            return Err(StorageError::HabitNotFound { habit_id: id });
        }
        if update.is_empty() {
            return Ok(());
        }

        if let Some(name) = &update.name {
            tx.execute("UPDATE habits SET name = ?2 WHERE id = ?1", params![id, name])?;
        }
        if let Some(color) = &update.color {
            tx.execute("UPDATE habits SET color = ?2 WHERE id = ?1", params![id, color.hex()])?;
        }
        if let Some(current) = update.current_streak {
            tx.execute("UPDATE habits SET current_streak = ?2 WHERE id = ?1", params![id, current])?;
        }
        if let Some(best) = update.best_streak {
            tx.execute("UPDATE habits SET best_streak = ?2 WHERE id = ?1", params![id, best])?;
        }
        if let Some(last) = update.last_completed {
            tx.execute(
                "UPDATE habits SET last_completed = ?2 WHERE id = ?1",
                params![id, last.map(day_key)],
            )?;
        }
        if let Some(completions) = &update.completions {
            Self::replace_completions(&tx, habit_id, completions)?;
        }

        tx.commit()?;
        tracing::debug!("Updated habit: {}", habit_id);
        Ok(())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let id = habit_id.to_string();
        let tx = self.conn.unchecked_transaction()?;

        tx.execute("DELETE FROM habit_completions WHERE habit_id = ?1", params![id])?;
        let rows_affected = tx.execute("DELETE FROM habits WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound { habit_id: id });
        }

        tx.commit()?;
        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }
}

/// Schema migrations for the habit database
///
/// Migrations are applied in order, each one exactly once. The highest
/// applied version is kept in `schema_version`.

use rusqlite::{Connection, OptionalExtension};
use crate::storage::StorageError;

/// One schema step: the version it brings the database to and its SQL
struct Migration {
    version: i32,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "habits and per-day completions",
    sql: "
        CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            created_on TEXT NOT NULL,
            current_streak INTEGER NOT NULL DEFAULT 0,
            best_streak INTEGER NOT NULL DEFAULT 0,
            last_completed TEXT
        );

        -- one row per habit and day
        CREATE TABLE IF NOT EXISTS habit_completions (
            habit_id TEXT NOT NULL,
            day TEXT NOT NULL,
            completed BOOLEAN NOT NULL,
            PRIMARY KEY (habit_id, day),
            FOREIGN KEY (habit_id) REFERENCES habits (id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_habits_owner ON habits (owner_id, created_on);
    ",
}];

/// Schema version this build writes
pub const CURRENT_VERSION: i32 = 1;

/// Bring the schema up to `CURRENT_VERSION`
///
/// Refuses to open a database written by a newer build.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)")?;

    let stored = stored_version(conn)?;
    if stored > CURRENT_VERSION {
        return Err(StorageError::Migration(format!(
            "Database schema version {} is newer than supported version {}",
            stored, CURRENT_VERSION
        )));
    }

    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > stored).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.unchecked_transaction()?;
    for migration in pending {
        tx.execute_batch(migration.sql).map_err(|e| {
            StorageError::Migration(format!("v{} ({}): {}", migration.version, migration.description, e))
        })?;
        tracing::info!("Applied migration v{}: {}", migration.version, migration.description);
    }
    record_version(&tx, CURRENT_VERSION)?;
    tx.commit()?;

    Ok(())
}

/// Highest applied version, 0 for a fresh database
fn stored_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0)
        })
        .optional()?
        .flatten();

    Ok(version.unwrap_or(0))
}

fn record_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("INSERT OR REPLACE INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

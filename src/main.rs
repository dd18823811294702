/// Main entry point for the habit streak MCP server
///
/// This file sets up logging, parses command line arguments, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use habit_streak::{Calendar, HabitTrackerServer, OwnerId};

/// First writable directory among the usual per-user locations
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let candidates = [
        dirs::home_dir().map(|p| p.join(".habit_streak")),
        dirs::data_dir().map(|p| p.join("habit_streak")),
        dirs::config_dir().map(|p| p.join("habit_streak")),
        std::env::current_dir().ok().map(|p| p.join(".habit_streak")),
    ];

    for dir in candidates.iter().flatten() {
        if std::fs::create_dir_all(dir).is_err() {
            continue;
        }
        let marker = dir.join(".test_write");
        if std::fs::write(&marker, "test").is_ok() {
            let _ = std::fs::remove_file(&marker);
            return Ok(dir.join("habits.db"));
        }
    }

    let temp_dir = std::env::temp_dir().join("habit_streak");
    std::fs::create_dir_all(&temp_dir)?;
    let db_path = temp_dir.join("habits.db");

    tracing::warn!("Using temporary directory for database: {}", db_path.display());
    Ok(db_path)
}

/// Command line arguments for the habit streak MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Owner whose habits this server manages
    #[arg(long, default_value = "local")]
    owner: String,

    /// Offset from UTC, in minutes, that decides where one day ends
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    utc_offset_minutes: i32,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_streak={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting habit streak MCP server");

    let owner = OwnerId::new(args.owner)?;
    let calendar = Calendar::with_offset_minutes(args.utc_offset_minutes)?;

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let server = HabitTrackerServer::new(db_path, owner, calendar)?;
    server.run().await?;

    info!("Habit streak MCP server shutdown complete");
    Ok(())
}

//! Completed-workout history backed by sqlite.
//!
//! Best-effort like the rest of the persistence: the app opens this with
//! `.ok()` and simply has no history when the database cannot be opened.

use crate::app_dirs::AppDirs;
use crate::session::SessionSummary;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};
use std::path::{Path, PathBuf};

/// One finished session as recorded in the log.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub ended_at: DateTime<Utc>,
    pub elapsed_secs: u64,
    pub intervals_completed: u32,
    pub distance_meters: f64,
    pub journey_id: String,
}

#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open (and create if needed) the history database in the app state
    /// directory.
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::history_db_path().unwrap_or_else(|| PathBuf::from("oarlog.db"));

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        Self::open(&db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ended_at TEXT NOT NULL,
                elapsed_secs INTEGER NOT NULL,
                intervals_completed INTEGER NOT NULL,
                distance_meters REAL NOT NULL,
                journey_id TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_workouts_journey ON workouts(journey_id)",
            [],
        )?;

        Ok(HistoryDb { conn })
    }

    pub fn record(&self, summary: &SessionSummary) -> Result<()> {
        let ended_at = DateTime::<Utc>::from_timestamp_millis(summary.ended_at_ms)
            .unwrap_or_else(Utc::now);

        self.conn.execute(
            r#"
            INSERT INTO workouts (ended_at, elapsed_secs, intervals_completed, distance_meters, journey_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                ended_at.to_rfc3339(),
                summary.elapsed_time,
                summary.intervals_completed,
                summary.distance_meters,
                summary.journey_id,
            ],
        )?;

        Ok(())
    }

    /// Most recent workouts, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT ended_at, elapsed_secs, intervals_completed, distance_meters, journey_id
            FROM workouts
            ORDER BY ended_at DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit], |row| {
            let ended_at_str: String = row.get(0)?;
            let ended_at = DateTime::parse_from_rfc3339(&ended_at_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        0,
                        "ended_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Utc);

            Ok(HistoryEntry {
                ended_at,
                elapsed_secs: row.get(1)?,
                intervals_completed: row.get(2)?,
                distance_meters: row.get(3)?,
                journey_id: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for entry in rows {
            entries.push(entry?);
        }

        Ok(entries)
    }

    /// Lifetime meters rowed across all recorded sessions.
    pub fn total_distance(&self) -> Result<f64> {
        let mut stmt = self
            .conn
            .prepare("SELECT COALESCE(SUM(distance_meters), 0) FROM workouts")?;
        stmt.query_row([], |row| row.get(0))
    }

    /// Meters rowed on one journey across all recorded sessions.
    pub fn journey_distance(&self, journey_id: &str) -> Result<f64> {
        let mut stmt = self.conn.prepare(
            "SELECT COALESCE(SUM(distance_meters), 0) FROM workouts WHERE journey_id = ?1",
        )?;
        stmt.query_row([journey_id], |row| row.get(0))
    }
}

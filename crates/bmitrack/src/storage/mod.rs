//! Storage layer for bmitrack.
//!
//! This module provides `SQLite`-based persistent storage for BMI records.
//! The store is append-only: records are inserted with a store-assigned id
//! and timestamp and are never updated or deleted.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::{debug, info};

use crate::bmi::Category;
use crate::error::{Error, Result};
use crate::record::{format_timestamp, parse_timestamp, BmiRecord, NewRecord};

const SELECT_COLUMNS: &str =
    "SELECT id, username, weight, height, bmi, category, timestamp FROM bmi_records";

/// Storage engine for BMI records.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Enable WAL mode
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        // Initialize schema and bring older databases up to date
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the connection, reporting any error from the final flush.
    ///
    /// Dropping a `Storage` also closes it but discards such errors.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` fails to close the connection cleanly.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, source)| source)?;
        debug!("Closed database at {}", path.display());
        Ok(())
    }

    /// Append a record, stamping it with the current time.
    ///
    /// The BMI and category are derived from the measurement here, never
    /// taken from the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn append(&self, record: &NewRecord) -> Result<BmiRecord> {
        self.append_at(record, Utc::now())
    }

    /// Append a record with an explicit timestamp.
    pub(crate) fn append_at(
        &self,
        record: &NewRecord,
        timestamp: DateTime<Utc>,
    ) -> Result<BmiRecord> {
        // Stored with microsecond precision; truncate so the returned record
        // matches what a later query reads back.
        let timestamp = timestamp.trunc_subsecs(6);
        let assessment = record.measurement.assess();

        self.conn.execute(
            r"
            INSERT INTO bmi_records (username, weight, height, bmi, category, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                record.username,
                record.measurement.weight(),
                record.measurement.height(),
                assessment.bmi,
                assessment.category.label(),
                format_timestamp(&timestamp),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted record with id {}", id);

        Ok(BmiRecord {
            id,
            username: record.username.clone(),
            weight: record.measurement.weight(),
            height: record.measurement.height(),
            bmi: assessment.bmi,
            category: assessment.category,
            timestamp,
        })
    }

    /// Get a record by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<BmiRecord>> {
        let result = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [id],
                Self::row_to_record,
            )
            .optional()?;
        Ok(result)
    }

    /// All records for `username`, oldest first.
    ///
    /// Records sharing a timestamp come back in insertion order. A user with
    /// no history yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn query_by_user(&self, username: &str) -> Result<Vec<BmiRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE username = ?1 ORDER BY timestamp ASC, id ASC"
        ))?;

        let records = stmt
            .query_map([username], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(username, count = records.len(), "Queried user history");
        Ok(records)
    }

    /// Distinct usernames with at least one record, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn usernames(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT username FROM bmi_records ORDER BY username")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Count total records in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM bmi_records", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_records = self.count()?;
        let total_users: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT username) FROM bmi_records",
            [],
            |row| row.get(0),
        )?;

        let (oldest, newest): (Option<String>, Option<String>) = self.conn.query_row(
            "SELECT MIN(timestamp), MAX(timestamp) FROM bmi_records",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        // Get database file size
        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_records,
            total_users,
            oldest_record: oldest.as_deref().and_then(parse_timestamp),
            newest_record: newest.as_deref().and_then(parse_timestamp),
            db_size_bytes,
        })
    }

    /// Convert a database row to a `BmiRecord`.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<BmiRecord> {
        let id: i64 = row.get(0)?;
        let username: String = row.get(1)?;
        let weight: f64 = row.get(2)?;
        let height: f64 = row.get(3)?;
        let bmi: f64 = row.get(4)?;
        let category_str: String = row.get(5)?;
        let timestamp_str: String = row.get(6)?;

        let category: Category = category_str.parse().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                Type::Text,
                format!("unknown category: {category_str}").into(),
            )
        })?;

        let timestamp = parse_timestamp(&timestamp_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                6,
                Type::Text,
                format!("invalid timestamp: {timestamp_str}").into(),
            )
        })?;

        Ok(BmiRecord {
            id,
            username,
            weight,
            height,
            bmi,
            category,
            timestamp,
        })
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    /// Total number of records stored.
    pub total_records: i64,
    /// Number of distinct usernames.
    pub total_users: i64,
    /// Timestamp of the oldest record.
    pub oldest_record: Option<DateTime<Utc>>,
    /// Timestamp of the newest record.
    pub newest_record: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

/// Build a `NewRecord` from raw numbers, for tests across the crate.
#[cfg(test)]
pub(crate) fn test_record(username: &str, weight: f64, height: f64) -> NewRecord {
    NewRecord::new(
        username,
        crate::bmi::Measurement::new(weight, height).expect("valid test measurement"),
    )
}

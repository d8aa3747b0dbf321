//! `SQLite` schema definitions for bmitrack.
//!
//! The `bmi_records` layout matches databases written by earlier versions of
//! the tracker, so those files open without conversion.

/// SQL statement to create the records table.
pub const CREATE_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS bmi_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    weight REAL NOT NULL,
    height REAL NOT NULL,
    bmi REAL NOT NULL,
    category TEXT NOT NULL,
    timestamp TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now') || '.000000Z')
)
";

/// SQL statement to create an index for per-user history queries.
pub const CREATE_USER_TIMESTAMP_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_bmi_records_user_timestamp ON bmi_records(username, timestamp)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_RECORDS_TABLE,
    CREATE_USER_TIMESTAMP_INDEX,
    CREATE_METADATA_TABLE,
];

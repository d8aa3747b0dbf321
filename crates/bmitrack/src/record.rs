//! Stored BMI records.
//!
//! A [`BmiRecord`] is written once by the store and never modified. The
//! derived `bmi` and `category` are kept alongside the raw inputs so history
//! survives any later change to the formula.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bmi::{Assessment, Category, Measurement};

/// Canonical storage format for timestamps.
///
/// Fixed-width with microseconds so lexicographic order equals time order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Timestamp format written by SQLite's `CURRENT_TIMESTAMP`.
pub const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One persisted BMI calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiRecord {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Who the measurement belongs to.
    pub username: String,
    /// Weight in kilograms.
    pub weight: f64,
    /// Height in meters.
    pub height: f64,
    /// Body mass index computed at insert time.
    pub bmi: f64,
    /// Classification of `bmi`.
    pub category: Category,
    /// When the store accepted the record.
    pub timestamp: DateTime<Utc>,
}

impl BmiRecord {
    /// The BMI and category for display.
    #[must_use]
    pub fn assessment(&self) -> Assessment {
        Assessment {
            bmi: self.bmi,
            category: self.category,
        }
    }
}

/// A validated record waiting to be appended.
///
/// Carries only user-supplied data; the store derives everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// Who the measurement belongs to.
    pub username: String,
    /// The validated inputs.
    pub measurement: Measurement,
}

impl NewRecord {
    /// Create a new record for `username`.
    #[must_use]
    pub fn new(username: impl Into<String>, measurement: Measurement) -> Self {
        Self {
            username: username.into(),
            measurement,
        }
    }
}

/// Format a timestamp in the canonical storage format.
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 as well as the space-separated form SQLite uses for
/// `CURRENT_TIMESTAMP`, which is always UTC.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, LEGACY_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

//! `bmitrack` - BMI history tracking with charts and CSV export
//!
//! This library records BMI measurements per user in `SQLite`, renders each
//! user's trend as a chart, exports history to CSV and collects feedback.
//! Password generation lives in the companion `bmitrack-passgen` crate.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod bmi;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod feedback;
pub mod logging;
pub mod record;
pub mod storage;
pub mod trend;

pub use app::App;
pub use bmi::{record_measurement, Assessment, Category, Measurement};
pub use config::Config;
pub use error::{Error, Result};
pub use export::{export_user, ExportOutcome};
pub use feedback::FeedbackLog;
pub use logging::init_logging;
pub use record::{BmiRecord, NewRecord};
pub use storage::{Storage, StorageStats};
pub use trend::TrendChart;

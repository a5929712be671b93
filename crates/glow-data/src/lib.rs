//! Calendar-backed mood and habit data store for Glow.
//!
//! This crate holds the synchronous core: month-keyed day records with
//! lazy month creation, the month-offset navigation math, and bulk
//! ingestion of remote year feeds. Everything network-facing lives in
//! `glow-sync`.
//!
//! # Features
//!
//! - **Day records**: mood, sleep, screen time, exercise, alcohol, diary
//! - **Month grids**: Monday-first layout padded to whole weeks
//! - **Offset navigation**: exact across year boundaries, forwards and back
//! - **Typed writes**: field dispatch with range validation
//! - **Ingestion**: per-row error isolation, idempotent re-runs
//! - **Events**: change notifications over a broadcast channel

pub mod calendar;
pub mod models;
pub mod store;

// Re-exports
pub use calendar::{
    day_grid, days_in_month, first_weekday_index, month_at_offset, offset_between,
    CalendarNavigator, GridCell, MonthKey,
};
pub use models::{
    DayField, DayRecord, FieldError, FieldValue, FlatEntry, MonthRecord, Mood, MAX_DAY_HOURS,
    MAX_EXERCISE_MINUTES,
};
pub use store::{
    Direction, IngestReport, MonthSummary, MoodStore, StoreError, StoreEvent, StoreResult,
};

use chrono::Utc;

/// Today's date, in UTC.
pub fn today() -> chrono::NaiveDate {
    Utc::now().date_naive()
}

/// Key of the month containing today.
pub fn this_month() -> MonthKey {
    MonthKey::from_date(today())
}

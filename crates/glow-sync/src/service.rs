//! The remote record service contract.

use async_trait::async_trait;
use chrono::NaiveDate;
use glow_data::{DayField, FieldValue, FlatEntry};
use thiserror::Error;

/// Errors from a remote record service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {code}: {body}")]
    Status { code: u16, body: String },
    #[error("malformed response: {0}")]
    Decode(String),
}

/// A remote store of per-day records, addressed by user name.
///
/// The read side is coarse: a whole year arrives as a flat feed of
/// dated rows. The write side is fine-grained: one field of one day
/// per push.
#[async_trait]
pub trait RecordService: Send + Sync {
    /// Every stored row for `user` in `year`.
    async fn fetch_year(&self, user: &str, year: i32) -> Result<Vec<FlatEntry>, ServiceError>;

    /// Persist one field of one day.
    async fn push_field_update(
        &self,
        user: &str,
        date: NaiveDate,
        field: DayField,
        value: &FieldValue,
    ) -> Result<(), ServiceError>;
}

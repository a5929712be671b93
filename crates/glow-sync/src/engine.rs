//! Push/pull reconciliation between the local store and a record service.
//!
//! Year feeds flow down into the store in bulk; field edits flow up one
//! at a time. Edits are local-first: the store is written before the
//! network is touched, and a failed push never rolls the local write
//! back. Failed pushes wait in a queue that is replayed only when the
//! caller asks.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use glow_data::{DayField, FieldValue, IngestReport, MoodStore, StoreError};
use thiserror::Error;

use crate::service::{RecordService, ServiceError};

/// Sync errors.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type SyncResult<T> = Result<T, SyncError>;

/// Whether a day's local state has been acknowledged by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Every local edit for the day has been pushed.
    Clean,
    /// At least one local edit for the day is still queued.
    Dirty,
}

/// A local edit awaiting a successful push.
#[derive(Debug, Clone)]
pub struct PendingEdit {
    /// Monotonic local edit order.
    pub seq: u64,
    pub date: NaiveDate,
    pub field: DayField,
    pub value: FieldValue,
}

/// Drives one user's store from a remote record service.
pub struct SyncEngine<S> {
    service: S,
    user: String,
    next_seq: u64,
    // kept in seq order: appends only, removals from the front
    pending: Vec<PendingEdit>,
}

impl<S: RecordService> SyncEngine<S> {
    pub fn new(service: S, user: impl Into<String>) -> Self {
        Self {
            service,
            user: user.into(),
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Fetch one year and merge it into the store.
    pub async fn load_year(&self, store: &mut MoodStore, year: i32) -> SyncResult<IngestReport> {
        let entries = self.service.fetch_year(&self.user, year).await?;
        tracing::debug!(user = %self.user, year, rows = entries.len(), "year feed fetched");
        Ok(store.ingest_year(year, entries))
    }

    /// Fetch an inclusive range of years, oldest first, and merge each
    /// into the store.
    pub async fn load_years(
        &self,
        store: &mut MoodStore,
        years: RangeInclusive<i32>,
    ) -> SyncResult<IngestReport> {
        let mut report = IngestReport::default();
        for year in years {
            report.merge(self.load_year(store, year).await?);
        }
        Ok(report)
    }

    /// Apply one edit locally, then push it.
    ///
    /// The local write comes first; if it fails its validation, nothing
    /// reaches the network. When the push fails, the local edit stays in
    /// place, the edit is queued for replay, and the error is returned
    /// so the caller can surface it. Nothing retries automatically.
    pub async fn push_edit(
        &mut self,
        store: &mut MoodStore,
        year: i32,
        month: u32,
        day: u32,
        field: DayField,
        value: FieldValue,
    ) -> SyncResult<()> {
        let date = store.set_field(year, month, day, field, value.clone())?;

        match self
            .service
            .push_field_update(&self.user, date, field, &value)
            .await
        {
            Ok(()) => {
                // the slot's latest value is on the server now, so any
                // older queued edit for it must not be replayed
                self.pending.retain(|p| !(p.date == date && p.field == field));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%date, %field, %err, "push failed, edit queued");
                self.queue_pending(date, field, value);
                Err(err.into())
            }
        }
    }

    fn queue_pending(&mut self, date: NaiveDate, field: DayField, value: FieldValue) {
        // one queued edit per slot, the newest wins
        self.pending.retain(|p| !(p.date == date && p.field == field));
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(PendingEdit {
            seq,
            date,
            field,
            value,
        });
    }

    /// Replay queued edits in order. Stops at the first failure, leaving
    /// that edit and everything after it queued, and returns the error.
    /// On success returns how many edits were pushed.
    pub async fn retry_pending(&mut self) -> SyncResult<usize> {
        let mut pushed = 0;
        while let Some(edit) = self.pending.first().cloned() {
            match self
                .service
                .push_field_update(&self.user, edit.date, edit.field, &edit.value)
                .await
            {
                Ok(()) => {
                    self.pending.remove(0);
                    pushed += 1;
                }
                Err(err) => {
                    tracing::warn!(date = %edit.date, field = %edit.field, %err, pushed, "replay stopped");
                    return Err(err.into());
                }
            }
        }
        if pushed > 0 {
            tracing::debug!(pushed, "pending edits replayed");
        }
        Ok(pushed)
    }

    /// Number of edits queued for replay.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Queued edits, oldest first.
    pub fn pending(&self) -> &[PendingEdit] {
        &self.pending
    }

    /// Whether a day still has queued edits.
    pub fn day_status(&self, date: NaiveDate) -> SyncStatus {
        if self.pending.iter().any(|p| p.date == date) {
            SyncStatus::Dirty
        } else {
            SyncStatus::Clean
        }
    }
}

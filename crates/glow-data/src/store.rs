//! The in-memory mood store.
//!
//! Day records live in per-month buckets keyed by [`MonthKey`]. Months
//! are created empty on first touch, by navigation or by an edit, and
//! are never removed. The store does no internal locking and takes
//! `&mut self` for every mutation; a multithreaded host puts it behind
//! its own lock.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::calendar::{days_in_month, month_at_offset, MonthKey};
use crate::models::{DayField, DayRecord, FieldError, FieldValue, FlatEntry, MonthRecord, Mood};

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("day {day} out of range for {year:04}-{month:02} ({len} days)")]
    DayOutOfRange {
        year: i32,
        month: u32,
        day: u32,
        len: u32,
    },
    #[error("invalid value: {0}")]
    Field(#[from] FieldError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Change notifications emitted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// A month bucket was created.
    MonthAdded(MonthKey),
    /// A month's records were replaced in bulk.
    MonthChanged(MonthKey),
    /// One field of one day was written.
    DayChanged { date: NaiveDate, field: DayField },
}

/// Direction for day-neighbor lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// Outcome of a bulk ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Rows that landed in a day slot.
    pub ingested: usize,
    /// Rows dropped for an unparseable or impossible date.
    pub dropped: usize,
}

impl IngestReport {
    /// Fold another report into this one.
    pub fn merge(&mut self, other: IngestReport) {
        self.ingested += other.ingested;
        self.dropped += other.dropped;
    }
}

/// Aggregates for one month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthSummary {
    /// Days with at least one field recorded.
    pub days_with_entries: u32,
    pub avg_sleep_hours: Option<f64>,
    pub avg_screen_hours: Option<f64>,
    pub total_exercise_minutes: u32,
    pub total_alcohol_units: f64,
    /// Tally of recorded moods, in [`Mood::ALL`] order, zeros omitted.
    pub mood_counts: Vec<(Mood, u32)>,
}

fn mean(sum: f64, count: u32) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(sum / f64::from(count))
    }
}

/// In-memory mood data for one user session.
#[derive(Debug)]
pub struct MoodStore {
    origin: MonthKey,
    months: BTreeMap<MonthKey, MonthRecord>,
    event_tx: broadcast::Sender<StoreEvent>,
}

impl MoodStore {
    /// Empty store anchored at an origin month.
    pub fn new(origin: MonthKey) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            origin,
            months: BTreeMap::new(),
            event_tx,
        }
    }

    pub fn origin(&self) -> MonthKey {
        self.origin
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    /// Create `count` consecutive months starting at the origin, for
    /// hosts that want a warm navigation window.
    pub fn preload(&mut self, count: u32) {
        for offset in 0..i64::from(count) {
            self.ensure_month(month_at_offset(self.origin, offset));
        }
    }

    fn ensure_month(&mut self, key: MonthKey) -> &mut MonthRecord {
        match self.months.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let record = entry.insert(MonthRecord::new(key.year, key.month));
                let _ = self.event_tx.send(StoreEvent::MonthAdded(key));
                record
            }
        }
    }

    /// The month's record, created empty on first access. Panics if
    /// `month` is outside 1 through 12; callers own that precondition.
    pub fn get_or_create_month(&mut self, year: i32, month: u32) -> &MonthRecord {
        self.ensure_month(MonthKey::new(year, month))
    }

    /// The month's record, if it has been created.
    pub fn month(&self, key: MonthKey) -> Option<&MonthRecord> {
        self.months.get(&key)
    }

    /// All created months, in calendar order.
    pub fn months(&self) -> impl Iterator<Item = (&MonthKey, &MonthRecord)> {
        self.months.iter()
    }

    pub fn month_count(&self) -> usize {
        self.months.len()
    }

    /// Snapshot of one day. Reads are total: an absent month or an
    /// out-of-range day yields an all-absent record, never an error.
    pub fn day_record(&self, year: i32, month: u32, day: u32) -> DayRecord {
        self.months
            .get(&MonthKey { year, month })
            .and_then(|m| m.day(day))
            .cloned()
            .unwrap_or_default()
    }

    /// Write one field of one day, creating the month if needed. This is
    /// the sole local mutation entry point: it validates the day number,
    /// dispatches the typed value, stamps the record's canonical date,
    /// emits [`StoreEvent::DayChanged`], and returns the stamped date.
    pub fn set_field(
        &mut self,
        year: i32,
        month: u32,
        day: u32,
        field: DayField,
        value: FieldValue,
    ) -> StoreResult<NaiveDate> {
        let key = MonthKey::new(year, month);
        let len = days_in_month(year, month);
        let date = key.date(day).ok_or(StoreError::DayOutOfRange {
            year,
            month,
            day,
            len,
        })?;

        let slot = self
            .ensure_month(key)
            .day_mut(day)
            .ok_or(StoreError::DayOutOfRange {
                year,
                month,
                day,
                len,
            })?;
        slot.set(field, value)?;
        slot.date = Some(date);

        let _ = self.event_tx.send(StoreEvent::DayChanged { date, field });
        Ok(date)
    }

    /// The adjacent real day in the given direction, rolling across
    /// month boundaries: stepping back from the 1st lands on the
    /// previous month's last day, stepping forward from the last day
    /// lands on the 1st of the next month. The month the result falls
    /// in is created if missing, so the answer always names a
    /// materialized day, never grid padding.
    pub fn neighbor_day(&mut self, date: NaiveDate, direction: Direction) -> NaiveDate {
        let neighbor = match direction {
            Direction::Prev => date.pred_opt(),
            Direction::Next => date.succ_opt(),
        }
        .unwrap();
        self.ensure_month(MonthKey::from_date(neighbor));
        neighbor
    }

    /// Whether anything has been recorded for `date`.
    pub fn has_entry(&self, date: NaiveDate) -> bool {
        self.months
            .get(&MonthKey::from_date(date))
            .and_then(|m| m.day(date.day()))
            .map(|r| !r.is_empty())
            .unwrap_or(false)
    }

    /// Merge a year feed into the store. Each row lands in the month
    /// parsed from its own date; rows whose date does not parse as a
    /// real calendar day are dropped and counted. Slots are overwritten
    /// whole, so re-ingesting the same feed is idempotent.
    pub fn ingest_year(&mut self, year: i32, entries: Vec<FlatEntry>) -> IngestReport {
        let mut report = IngestReport::default();
        let mut touched = BTreeSet::new();

        for entry in entries {
            let Some(date) = entry.parsed_date() else {
                tracing::warn!(date = %entry.date, "row with unparseable date dropped");
                report.dropped += 1;
                continue;
            };
            if date.year() != year {
                tracing::debug!(%date, year, "row outside requested year");
            }

            let key = MonthKey::from_date(date);
            let mut record = entry.into_record();
            record.date = Some(date);

            match self.ensure_month(key).day_mut(date.day()) {
                Some(slot) => {
                    *slot = record;
                    report.ingested += 1;
                    touched.insert(key);
                }
                None => {
                    tracing::warn!(%date, "no slot for day, row dropped");
                    report.dropped += 1;
                }
            }
        }

        for key in touched {
            let _ = self.event_tx.send(StoreEvent::MonthChanged(key));
        }
        tracing::debug!(
            year,
            ingested = report.ingested,
            dropped = report.dropped,
            "year feed merged"
        );
        report
    }

    /// One numeric metric across a month, one slot per day. Days without
    /// a value, and every day of an uncreated month, yield `None`.
    pub fn month_series(&self, year: i32, month: u32, field: DayField) -> Vec<Option<f64>> {
        match self.months.get(&MonthKey { year, month }) {
            Some(m) => m.days.iter().map(|d| d.metric(field)).collect(),
            None => vec![None; days_in_month(year, month) as usize],
        }
    }

    /// Aggregates for one month: averages for the hour metrics, totals
    /// for exercise and alcohol, and a mood tally.
    pub fn month_summary(&self, year: i32, month: u32) -> MonthSummary {
        let Some(month_rec) = self.months.get(&MonthKey { year, month }) else {
            return MonthSummary::default();
        };

        let mut summary = MonthSummary::default();
        let (mut sleep_sum, mut sleep_n) = (0.0, 0u32);
        let (mut screen_sum, mut screen_n) = (0.0, 0u32);
        let mut moods: HashMap<Mood, u32> = HashMap::new();

        for record in &month_rec.days {
            if !record.is_empty() {
                summary.days_with_entries += 1;
            }
            if let Some(hours) = record.sleep_hours {
                sleep_sum += hours;
                sleep_n += 1;
            }
            if let Some(hours) = record.screen_hours {
                screen_sum += hours;
                screen_n += 1;
            }
            if let Some(minutes) = record.exercise_minutes {
                summary.total_exercise_minutes += minutes;
            }
            if let Some(units) = record.alcohol_units {
                summary.total_alcohol_units += units;
            }
            if let Some(mood) = record.mood {
                *moods.entry(mood).or_insert(0) += 1;
            }
        }

        summary.avg_sleep_hours = mean(sleep_sum, sleep_n);
        summary.avg_screen_hours = mean(screen_sum, screen_n);
        summary.mood_counts = Mood::ALL
            .iter()
            .filter_map(|m| moods.get(m).map(|n| (*m, *n)))
            .collect();
        summary
    }
}

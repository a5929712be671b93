//! One user's live session: store, navigator, and sync engine wired
//! together.

use chrono::{Datelike, NaiveDate};
use glow_data::{
    CalendarNavigator, DayField, FieldValue, MonthKey, MonthRecord, MoodStore,
};

use crate::config::Config;
use crate::engine::{SyncEngine, SyncResult, SyncStatus};
use crate::service::RecordService;

/// A logged-in user's working state.
///
/// Owns the store, the month cursor, and the sync engine; hosts build
/// one per session instead of keeping globals. Month paging goes
/// through here so the cursor's month is always materialized.
pub struct Session<S> {
    store: MoodStore,
    navigator: CalendarNavigator,
    engine: SyncEngine<S>,
}

impl<S: RecordService> Session<S> {
    /// Open a session: build the store at the configured origin, preload
    /// the navigation window, pull the configured span of years from the
    /// service, and park the cursor on the current month.
    pub async fn open(config: &Config, service: S, user: impl Into<String>) -> SyncResult<Self> {
        let origin = config.calendar.origin();
        let mut store = MoodStore::new(origin);
        store.preload(config.calendar.preload_months);

        let engine = SyncEngine::new(service, user);
        let today = glow_data::today();
        let first_year = today.year() - config.sync.load_years_back as i32;
        let report = engine.load_years(&mut store, first_year..=today.year()).await?;
        tracing::info!(
            user = %engine.user(),
            ingested = report.ingested,
            dropped = report.dropped,
            "session opened"
        );

        let mut navigator = CalendarNavigator::new(origin);
        navigator.jump_to(MonthKey::from_date(today));
        let current = navigator.current();
        store.get_or_create_month(current.year, current.month);

        Ok(Self {
            store,
            navigator,
            engine,
        })
    }

    /// Month the cursor is on.
    pub fn current_month(&mut self) -> &MonthRecord {
        let key = self.navigator.current();
        self.store.get_or_create_month(key.year, key.month)
    }

    /// Step the cursor forward and materialize the month.
    pub fn next_month(&mut self) -> &MonthRecord {
        let key = self.navigator.advance();
        self.store.get_or_create_month(key.year, key.month)
    }

    /// Step the cursor back, stopping at the origin month.
    pub fn prev_month(&mut self) -> &MonthRecord {
        let key = self.navigator.retreat();
        self.store.get_or_create_month(key.year, key.month)
    }

    /// Edit one field of one day and push it to the server. The local
    /// write sticks even when the push fails; the error comes back so
    /// the host can offer a retry.
    pub async fn edit_day(
        &mut self,
        year: i32,
        month: u32,
        day: u32,
        field: DayField,
        value: FieldValue,
    ) -> SyncResult<()> {
        self.engine
            .push_edit(&mut self.store, year, month, day, field, value)
            .await
    }

    /// Replay queued pushes, oldest first.
    pub async fn retry_pending(&mut self) -> SyncResult<usize> {
        self.engine.retry_pending().await
    }

    /// Whether a day still has unpushed edits.
    pub fn day_status(&self, date: NaiveDate) -> SyncStatus {
        self.engine.day_status(date)
    }

    /// Number of edits waiting for a successful push.
    pub fn pending_count(&self) -> usize {
        self.engine.pending_count()
    }

    pub fn store(&self) -> &MoodStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MoodStore {
        &mut self.store
    }

    pub fn navigator(&self) -> &CalendarNavigator {
        &self.navigator
    }
}

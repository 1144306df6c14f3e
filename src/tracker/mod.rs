//! Reading event log and per-day statistics. Recording a reading is the
//! one place a scripture read drives the streak engine.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Local};

use crate::app::Result;
use crate::domain::{millis, ReadingProgress, ReadingStats};
use crate::store::Store;
use crate::streak::StreakEngine;

pub const DEFAULT_HISTORY_RETENTION_DAYS: i64 = 90;

pub struct ReadingTracker {
    store: Arc<dyn Store + Send + Sync>,
    streak: Arc<StreakEngine>,
    retention_days: i64,
}

impl ReadingTracker {
    pub fn new(store: Arc<dyn Store + Send + Sync>, streak: Arc<StreakEngine>) -> Self {
        Self::with_retention(store, streak, DEFAULT_HISTORY_RETENTION_DAYS)
    }

    pub fn with_retention(
        store: Arc<dyn Store + Send + Sync>,
        streak: Arc<StreakEngine>,
        retention_days: i64,
    ) -> Self {
        Self {
            store,
            streak,
            retention_days,
        }
    }

    /// Append one reading event and advance the streak. The event is logged
    /// first; a streak failure after that still surfaces to the caller.
    #[allow(clippy::too_many_arguments)]
    pub async fn record(
        &self,
        translation: &str,
        book_number: i32,
        book_name: &str,
        chapter: i32,
        verse: Option<i32>,
        duration_seconds: i32,
        now: DateTime<Local>,
    ) -> Result<ReadingProgress> {
        let mut event = ReadingProgress {
            id: 0,
            translation: translation.to_string(),
            book_number,
            book_name: book_name.to_string(),
            chapter,
            verse,
            read_at: millis(now),
            duration_seconds,
        };
        event.id = self.store.add_reading(&event)?;
        self.streak.record_reading_event(now).await?;
        Ok(event)
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<ReadingProgress>> {
        self.store.recent_readings(limit)
    }

    pub fn last_reading(&self) -> Result<Option<ReadingProgress>> {
        self.store.last_reading()
    }

    /// Distinct chapters/books, total seconds and session count for the
    /// local day of `now`.
    pub fn today_stats(&self, now: DateTime<Local>) -> Result<ReadingStats> {
        let start = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .and_then(|dt| dt.and_local_timezone(Local).single())
            .map(millis)
            .unwrap_or_else(|| millis(now));
        let end = start + Duration::days(1).num_milliseconds();

        let readings = self.store.readings_between(start, end)?;
        let total = self.store.total_reading_seconds_between(start, end)?;

        let chapters: HashSet<(String, i32, i32)> = readings
            .iter()
            .map(|r| (r.translation.clone(), r.book_number, r.chapter))
            .collect();
        let books: HashSet<(String, i32)> = readings
            .iter()
            .map(|r| (r.translation.clone(), r.book_number))
            .collect();

        Ok(ReadingStats {
            chapters_read: chapters.len(),
            books_read: books.len(),
            total_reading_seconds: total,
            sessions: readings.len(),
        })
    }

    /// Lifetime distinct-day count, computed from the log itself (the
    /// streak record keeps its own incremental counter).
    pub fn total_days_read(&self) -> Result<i64> {
        self.store.total_days_read()
    }

    /// Drop events older than the retention horizon.
    pub fn prune(&self, now: DateTime<Local>) -> Result<usize> {
        let cutoff = millis(now) - Duration::days(self.retention_days).num_milliseconds();
        let deleted = self.store.delete_readings_before(cutoff)?;
        if deleted > 0 {
            tracing::info!("Pruned {} old reading events", deleted);
        }
        Ok(deleted)
    }
}

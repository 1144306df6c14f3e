//! Single-writer engine over the streak singleton.
//!
//! The pure day-boundary transitions live on [`StreakRecord`]; this module
//! adds persistence and the writer discipline: every read-modify-write of
//! the singleton row happens under one internal mutex, so concurrent
//! reading events (or a reading event racing a reconcile) cannot lose an
//! update.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveDate};
use tokio::sync::Mutex;

use crate::app::{Result, SelahError};
use crate::domain::{StreakRecord, StreakStatus};
use crate::store::Store;

pub struct StreakEngine {
    store: Arc<dyn Store + Send + Sync>,
    writer: Mutex<()>,
}

impl StreakEngine {
    pub fn new(store: Arc<dyn Store + Send + Sync>) -> Self {
        Self {
            store,
            writer: Mutex::new(()),
        }
    }

    /// Record one qualifying reading event. Idempotent within a local day.
    pub async fn record_reading_event(&self, now: DateTime<Local>) -> Result<StreakRecord> {
        let _guard = self.writer.lock().await;
        let current = self.load()?;
        let updated = current.advance(now);
        if updated != current {
            self.store.put_streak(&updated)?;
            tracing::debug!(
                "streak advanced: {} -> {} (longest {})",
                current.current_streak,
                updated.current_streak,
                updated.longest_streak
            );
        }
        Ok(updated)
    }

    /// Periodic re-evaluation: break a streak whose last read day is older
    /// than yesterday. Creates the default record on first access. Never
    /// touches `longest_streak` or `total_days_read`; idempotent.
    pub async fn reconcile(&self, now: DateTime<Local>) -> Result<StreakRecord> {
        let _guard = self.writer.lock().await;
        let current = match self.store.get_streak()? {
            Some(record) => record,
            None => {
                let fresh = StreakRecord::default();
                self.store.put_streak(&fresh)?;
                return Ok(fresh);
            }
        };
        verify(&current)?;

        let settled = current.settle(now);
        if settled != current {
            self.store.put_streak(&settled)?;
            tracing::info!(
                "streak of {} broken (last read {} days stale)",
                current.current_streak,
                days_stale(&current, now)
            );
        }
        Ok(settled)
    }

    /// Read-only status projection; never mutates the record.
    pub async fn current_status(&self, now: DateTime<Local>) -> Result<StreakStatus> {
        Ok(self.load()?.status(now))
    }

    pub async fn get(&self) -> Result<StreakRecord> {
        self.load()
    }

    /// The local days covered by the current run, oldest first.
    pub async fn streak_history(&self, now: DateTime<Local>) -> Result<Vec<NaiveDate>> {
        let record = self.load()?;
        if record.current_streak <= 0 {
            return Ok(Vec::new());
        }
        let Some(start) = crate::domain::day_of(record.streak_start_date) else {
            return Ok(Vec::new());
        };
        let today = now.date_naive();
        let mut days = Vec::new();
        let mut day = start;
        while day <= today && days.len() < record.current_streak as usize {
            days.push(day);
            day += Duration::days(1);
        }
        Ok(days)
    }

    /// Zero the current run, keeping the high-water mark and lifetime count.
    pub async fn reset(&self) -> Result<StreakRecord> {
        let _guard = self.writer.lock().await;
        let current = self.load()?;
        let reset = StreakRecord {
            current_streak: 0,
            ..current
        };
        self.store.put_streak(&reset)?;
        Ok(reset)
    }

    fn load(&self) -> Result<StreakRecord> {
        let record = self.store.get_streak()?.unwrap_or_default();
        verify(&record)?;
        Ok(record)
    }
}

fn verify(record: &StreakRecord) -> Result<()> {
    if record.longest_streak < record.current_streak {
        tracing::warn!(
            "streak invariant breach: longest {} < current {}",
            record.longest_streak,
            record.current_streak
        );
        return Err(SelahError::InvalidState(format!(
            "longest_streak {} < current_streak {}",
            record.longest_streak, record.current_streak
        )));
    }
    Ok(())
}

fn days_stale(record: &StreakRecord, now: DateTime<Local>) -> i64 {
    crate::domain::day_of(record.last_read_date)
        .map(|d| (now.date_naive() - d).num_days())
        .unwrap_or(0)
}

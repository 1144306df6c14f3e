//! The streak state machine, expressed as pure transition functions over the
//! singleton record. All I/O and writer serialization live in
//! [`crate::streak::StreakEngine`]; everything here is a function of
//! (record, now) and nothing else.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::day::{day_of, millis};

/// Fixed ascending ladder of streak achievement targets.
pub const MILESTONES: [i32; 9] = [7, 14, 21, 30, 60, 90, 100, 180, 365];

/// The single streak row. `last_read_date` and `streak_start_date` are epoch
/// milliseconds with 0 meaning "never"; `streak_start_date` is meaningless
/// while `current_streak == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StreakRecord {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_read_date: i64,
    pub streak_start_date: i64,
    pub total_days_read: i32,
}

impl StreakRecord {
    /// Apply one qualifying reading event. Idempotent within a local
    /// calendar day: repeat reads on the same day leave the record unchanged.
    pub fn advance(&self, now: DateTime<Local>) -> StreakRecord {
        let today = now.date_naive();
        let now_ms = millis(now);

        match day_of(self.last_read_date) {
            Some(last_day) if last_day == today => self.clone(),
            Some(last_day) if (today - last_day).num_days() == 1 => {
                let current = self.current_streak + 1;
                StreakRecord {
                    current_streak: current,
                    longest_streak: self.longest_streak.max(current),
                    last_read_date: now_ms,
                    streak_start_date: self.streak_start_date,
                    total_days_read: self.total_days_read + 1,
                }
            }
            // Gap of two or more days, or first-ever read: a fresh run of 1.
            _ => StreakRecord {
                current_streak: 1,
                longest_streak: self.longest_streak.max(1),
                last_read_date: now_ms,
                streak_start_date: now_ms,
                total_days_read: self.total_days_read + 1,
            },
        }
    }

    /// Periodic re-evaluation: zero a streak whose last read day fell behind
    /// yesterday. Never touches `longest_streak` or `total_days_read`, and
    /// applying it twice with the same `now` is a no-op the second time.
    pub fn settle(&self, now: DateTime<Local>) -> StreakRecord {
        let today = now.date_naive();
        match day_of(self.last_read_date) {
            Some(last_day) if (today - last_day).num_days() > 1 => StreakRecord {
                current_streak: 0,
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    pub fn has_read_today(&self, now: DateTime<Local>) -> bool {
        day_of(self.last_read_date) == Some(now.date_naive())
    }

    /// Active means the run is alive: read today or yesterday.
    pub fn is_active(&self, now: DateTime<Local>) -> bool {
        if self.current_streak == 0 {
            return false;
        }
        match day_of(self.last_read_date) {
            Some(last_day) => (now.date_naive() - last_day).num_days() <= 1,
            None => false,
        }
    }

    /// Smallest milestone strictly above the current streak; the streak
    /// itself once past the top of the ladder.
    pub fn next_milestone(&self) -> i32 {
        MILESTONES
            .iter()
            .copied()
            .find(|&m| m > self.current_streak)
            .unwrap_or(self.current_streak)
    }

    pub fn days_until_milestone(&self) -> i32 {
        MILESTONES
            .iter()
            .copied()
            .find(|&m| m > self.current_streak)
            .map(|m| m - self.current_streak)
            .unwrap_or(0)
    }

    pub fn status(&self, now: DateTime<Local>) -> StreakStatus {
        StreakStatus {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            total_days_read: self.total_days_read,
            is_active: self.is_active(now),
            has_read_today: self.has_read_today(now),
            next_milestone: self.next_milestone(),
            days_until_milestone: self.days_until_milestone(),
        }
    }
}

/// Read-only projection handed to callers; never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakStatus {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_days_read: i32,
    pub is_active: bool,
    pub has_read_today: bool,
    pub next_milestone: i32,
    pub days_until_milestone: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn record_read_on(day: DateTime<Local>, current: i32, longest: i32, total: i32) -> StreakRecord {
        StreakRecord {
            current_streak: current,
            longest_streak: longest,
            last_read_date: millis(day),
            streak_start_date: millis(day),
            total_days_read: total,
        }
    }

    #[test]
    fn first_read_starts_a_run() {
        let now = at(2024, 5, 1, 9);
        let r = StreakRecord::default().advance(now);
        assert_eq!(r.current_streak, 1);
        assert_eq!(r.longest_streak, 1);
        assert_eq!(r.total_days_read, 1);
        assert_eq!(r.streak_start_date, millis(now));
        assert_eq!(r.last_read_date, millis(now));
    }

    #[test]
    fn same_day_read_is_idempotent() {
        let morning = at(2024, 5, 1, 8);
        let r1 = StreakRecord::default().advance(morning);
        let evening = at(2024, 5, 1, 22);
        let r2 = r1.advance(evening);
        assert_eq!(r1, r2);
        let r3 = r2.advance(evening);
        assert_eq!(r2, r3);
    }

    #[test]
    fn consecutive_day_increments() {
        let d1 = at(2024, 5, 1, 9);
        let base = record_read_on(d1, 3, 5, 10);
        let r = base.advance(at(2024, 5, 2, 7));
        assert_eq!(r.current_streak, 4);
        assert_eq!(r.longest_streak, 5);
        assert_eq!(r.total_days_read, 11);
        // The run start is preserved across an increment.
        assert_eq!(r.streak_start_date, base.streak_start_date);
    }

    #[test]
    fn consecutive_day_raises_high_water_mark() {
        let base = record_read_on(at(2024, 5, 1, 9), 5, 5, 5);
        let r = base.advance(at(2024, 5, 2, 9));
        assert_eq!(r.current_streak, 6);
        assert_eq!(r.longest_streak, 6);
    }

    #[test]
    fn gap_resets_but_preserves_longest() {
        let base = record_read_on(at(2024, 5, 1, 9), 4, 9, 20);
        let now = at(2024, 5, 3, 9);
        let r = base.advance(now);
        assert_eq!(r.current_streak, 1);
        assert_eq!(r.longest_streak, 9);
        assert_eq!(r.total_days_read, 21);
        assert_eq!(r.streak_start_date, millis(now));
    }

    #[test]
    fn late_night_to_early_morning_counts_as_consecutive() {
        let late = Local.with_ymd_and_hms(2024, 5, 1, 23, 50, 0).unwrap();
        let base = record_read_on(late, 1, 1, 1);
        let early = Local.with_ymd_and_hms(2024, 5, 2, 0, 5, 0).unwrap();
        let r = base.advance(early);
        assert_eq!(r.current_streak, 2);
    }

    #[test]
    fn longest_is_always_at_least_current() {
        let mut r = StreakRecord::default();
        let days = [1, 2, 3, 5, 6, 7, 8, 12];
        for d in days {
            r = r.advance(at(2024, 5, d, 10));
            assert!(r.longest_streak >= r.current_streak);
        }
        assert_eq!(r.longest_streak, 4);
        assert_eq!(r.total_days_read, 8);
    }

    #[test]
    fn settle_zeroes_an_abandoned_run() {
        let base = record_read_on(at(2024, 5, 1, 9), 6, 6, 6);
        let r = base.settle(at(2024, 5, 4, 9));
        assert_eq!(r.current_streak, 0);
        assert_eq!(r.longest_streak, 6);
        assert_eq!(r.total_days_read, 6);
        assert_eq!(r.last_read_date, base.last_read_date);
    }

    #[test]
    fn settle_leaves_live_runs_alone() {
        let base = record_read_on(at(2024, 5, 3, 9), 2, 4, 8);
        // Read today.
        assert_eq!(base.settle(at(2024, 5, 3, 23)), base);
        // Read yesterday: still at risk, not broken.
        assert_eq!(base.settle(at(2024, 5, 4, 6)), base);
    }

    #[test]
    fn settle_is_idempotent() {
        let base = record_read_on(at(2024, 5, 1, 9), 6, 6, 6);
        let now = at(2024, 5, 10, 12);
        let once = base.settle(now);
        let twice = once.settle(now);
        assert_eq!(once, twice);
    }

    #[test]
    fn settle_ignores_uninitialized_record() {
        let r = StreakRecord::default().settle(at(2024, 5, 10, 12));
        assert_eq!(r, StreakRecord::default());
    }

    #[test]
    fn read_after_settle_starts_fresh_run() {
        let base = record_read_on(at(2024, 5, 1, 9), 6, 6, 6);
        let now = at(2024, 5, 4, 9);
        let settled = base.settle(now);
        let r = settled.advance(now);
        assert_eq!(r.current_streak, 1);
        assert_eq!(r.streak_start_date, millis(now));
        assert_eq!(r.total_days_read, 7);
        assert_eq!(r.longest_streak, 6);
    }

    #[test]
    fn projections() {
        let now = at(2024, 5, 2, 9);
        let today = record_read_on(now, 3, 5, 3);
        assert!(today.is_active(now));
        assert!(today.has_read_today(now));

        let yesterday = record_read_on(at(2024, 5, 1, 9), 3, 5, 3);
        assert!(yesterday.is_active(now));
        assert!(!yesterday.has_read_today(now));

        let stale = record_read_on(at(2024, 4, 28, 9), 3, 5, 3);
        assert!(!stale.is_active(now));

        assert!(!StreakRecord::default().is_active(now));
        assert!(!StreakRecord::default().has_read_today(now));
    }

    #[test]
    fn milestone_ladder() {
        let r = |c| StreakRecord {
            current_streak: c,
            ..Default::default()
        };
        assert_eq!(r(0).next_milestone(), 7);
        assert_eq!(r(0).days_until_milestone(), 7);
        assert_eq!(r(7).next_milestone(), 14);
        assert_eq!(r(7).days_until_milestone(), 7);
        assert_eq!(r(29).next_milestone(), 30);
        assert_eq!(r(29).days_until_milestone(), 1);
        assert_eq!(r(100).next_milestone(), 180);
        assert_eq!(r(365).next_milestone(), 365);
        assert_eq!(r(365).days_until_milestone(), 0);
        assert_eq!(r(400).next_milestone(), 400);
        assert_eq!(r(400).days_until_milestone(), 0);
    }

    #[test]
    fn end_to_end_scenario() {
        // Day 1 read, day 2 read, skip day 3, day 4 read, reconcile day 6.
        let mut r = StreakRecord::default();
        r = r.advance(at(2024, 6, 1, 9));
        assert_eq!((r.current_streak, r.longest_streak), (1, 1));
        r = r.advance(at(2024, 6, 2, 9));
        assert_eq!((r.current_streak, r.longest_streak), (2, 2));
        r = r.advance(at(2024, 6, 4, 9));
        assert_eq!((r.current_streak, r.longest_streak), (1, 2));
        assert!(r.is_active(at(2024, 6, 4, 10)));
        r = r.settle(at(2024, 6, 6, 9));
        assert_eq!((r.current_streak, r.longest_streak), (0, 2));
        assert!(!r.is_active(at(2024, 6, 6, 9)));
        assert_eq!(r.total_days_read, 3);
    }
}

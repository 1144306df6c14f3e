pub mod book;
pub mod day;
pub mod devotional;
pub mod reading;
pub mod streak;
pub mod verse;

pub use book::{Book, Testament};
pub use day::{date_key, day_of, millis};
pub use devotional::Devotional;
pub use reading::{Favorite, ReadingProgress, ReadingStats};
pub use streak::{StreakRecord, StreakStatus, MILESTONES};
pub use verse::{Chapter, Verse};

use crate::app::SelahError;

/// Result of a cache-then-network retrieval, emitted as a sequence:
/// `Loading` first, then at most one stale `Success`, then a terminal
/// `Success` or `Error`.
#[derive(Debug)]
pub enum FetchState<T> {
    Loading,
    Success(T),
    Error(SelahError),
}

impl<T> FetchState<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchState::Success(_))
    }
}

use serde::{Deserialize, Serialize};

/// One row of the append-only reading log. `verse` is `None` when a whole
/// chapter was read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingProgress {
    pub id: i64,
    pub translation: String,
    pub book_number: i32,
    pub book_name: String,
    pub chapter: i32,
    pub verse: Option<i32>,
    pub read_at: i64,
    pub duration_seconds: i32,
}

/// Aggregate over one local day of the reading log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadingStats {
    pub chapters_read: usize,
    pub books_read: usize,
    pub total_reading_seconds: i64,
    pub sessions: usize,
}

impl ReadingStats {
    pub fn formatted_reading_time(&self) -> String {
        let hours = self.total_reading_seconds / 3600;
        let minutes = (self.total_reading_seconds % 3600) / 60;
        if hours > 0 {
            format!("{hours}h {minutes}m")
        } else if minutes > 0 {
            format!("{minutes}m")
        } else {
            "< 1m".to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub translation: String,
    pub book_number: i32,
    pub book_name: String,
    pub chapter: i32,
    pub verse: i32,
    pub text: String,
    pub saved_at: i64,
}

impl Favorite {
    pub fn reference(&self) -> String {
        format!("{} {}:{}", self.book_name, self.chapter, self.verse)
    }
}

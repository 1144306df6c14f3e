pub mod sqlite;

use crate::app::Result;
use crate::domain::{Book, Devotional, Favorite, ReadingProgress, StreakRecord, Verse};

pub use sqlite::SqliteStore;

pub trait Store {
    // Cached books
    fn upsert_books(&self, books: &[Book]) -> Result<()>;
    fn get_book(&self, translation: &str, book_number: i32) -> Result<Option<Book>>;
    fn get_books(&self, translation: &str) -> Result<Vec<Book>>;
    fn delete_books(&self, translation: &str) -> Result<()>;
    fn delete_stale_books(&self, cutoff_ms: i64) -> Result<usize>;

    // Cached verses
    fn upsert_verse(&self, verse: &Verse) -> Result<()>;
    fn upsert_verses(&self, verses: &[Verse]) -> Result<()>;
    fn get_chapter_verses(&self, translation: &str, book: i32, chapter: i32) -> Result<Vec<Verse>>;
    fn get_verse(
        &self,
        translation: &str,
        book: i32,
        chapter: i32,
        verse: i32,
    ) -> Result<Option<Verse>>;
    fn search_verses(&self, query: &str, translation: &str) -> Result<Vec<Verse>>;
    fn replace_chapter_verses(
        &self,
        translation: &str,
        book: i32,
        chapter: i32,
        verses: &[Verse],
    ) -> Result<()>;
    fn delete_stale_verses(&self, cutoff_ms: i64) -> Result<usize>;
    fn chapter_verse_count(&self, translation: &str, book: i32, chapter: i32) -> Result<i64>;

    // Streak singleton
    fn get_streak(&self) -> Result<Option<StreakRecord>>;
    fn put_streak(&self, record: &StreakRecord) -> Result<()>;

    // Reading log
    fn add_reading(&self, reading: &ReadingProgress) -> Result<i64>;
    fn recent_readings(&self, limit: usize) -> Result<Vec<ReadingProgress>>;
    fn last_reading(&self) -> Result<Option<ReadingProgress>>;
    fn readings_between(&self, start_ms: i64, end_ms: i64) -> Result<Vec<ReadingProgress>>;
    fn total_reading_seconds_between(&self, start_ms: i64, end_ms: i64) -> Result<i64>;
    fn total_days_read(&self) -> Result<i64>;
    fn delete_readings_before(&self, cutoff_ms: i64) -> Result<usize>;

    // Devotionals
    fn upsert_devotional(&self, devotional: &Devotional) -> Result<()>;
    fn get_devotional(&self, date: &str) -> Result<Option<Devotional>>;
    fn recent_devotionals(&self, limit: usize) -> Result<Vec<Devotional>>;
    fn mark_devotional_read(&self, date: &str) -> Result<bool>;
    fn next_unread_devotional(&self) -> Result<Option<Devotional>>;
    fn devotional_read_count(&self) -> Result<i64>;
    fn delete_devotionals_before(&self, date: &str) -> Result<usize>;

    // Favorites
    fn add_favorite(&self, favorite: &Favorite) -> Result<()>;
    fn remove_favorite(&self, translation: &str, book: i32, chapter: i32, verse: i32)
        -> Result<bool>;
    fn is_favorite(&self, translation: &str, book: i32, chapter: i32, verse: i32) -> Result<bool>;
    fn list_favorites(&self) -> Result<Vec<Favorite>>;
}

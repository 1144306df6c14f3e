use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{Result, SelahError};
use crate::domain::{Book, Devotional, Favorite, ReadingProgress, StreakRecord, Testament, Verse};
use crate::store::Store;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| SelahError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| SelahError::InvalidState(format!("store lock poisoned: {e}")))
    }

    fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
        let book_number: i32 = row.get(1)?;
        let testament: String = row.get(4)?;
        Ok(Book {
            translation: row.get(0)?,
            book_number,
            name: row.get(2)?,
            chapters: row.get(3)?,
            testament: Testament::from_str_or_book(&testament, book_number),
            cached_at: row.get(5)?,
        })
    }

    fn verse_from_row(row: &Row<'_>) -> rusqlite::Result<Verse> {
        Ok(Verse {
            translation: row.get(0)?,
            book_number: row.get(1)?,
            book_name: row.get(2)?,
            chapter: row.get(3)?,
            verse: row.get(4)?,
            text: row.get(5)?,
            cached_at: row.get(6)?,
        })
    }

    fn reading_from_row(row: &Row<'_>) -> rusqlite::Result<ReadingProgress> {
        Ok(ReadingProgress {
            id: row.get(0)?,
            translation: row.get(1)?,
            book_number: row.get(2)?,
            book_name: row.get(3)?,
            chapter: row.get(4)?,
            verse: row.get(5)?,
            read_at: row.get(6)?,
            duration_seconds: row.get(7)?,
        })
    }

    fn devotional_from_row(row: &Row<'_>) -> rusqlite::Result<Devotional> {
        Ok(Devotional {
            date: row.get(0)?,
            title: row.get(1)?,
            verse_reference: row.get(2)?,
            verse_text: row.get(3)?,
            body: row.get(4)?,
            prayer: row.get(5)?,
            is_read: row.get::<_, i32>(6)? != 0,
            created_at: row.get(7)?,
        })
    }

    fn favorite_from_row(row: &Row<'_>) -> rusqlite::Result<Favorite> {
        Ok(Favorite {
            translation: row.get(0)?,
            book_number: row.get(1)?,
            book_name: row.get(2)?,
            chapter: row.get(3)?,
            verse: row.get(4)?,
            text: row.get(5)?,
            saved_at: row.get(6)?,
        })
    }
}

const BOOK_COLS: &str = "translation, book_number, book_name, chapters, testament, cached_at";
const VERSE_COLS: &str = "translation, book_number, book_name, chapter, verse, text, cached_at";
const READING_COLS: &str =
    "id, translation, book_number, book_name, chapter, verse, read_at, duration_seconds";
const DEVOTIONAL_COLS: &str =
    "date, title, verse_reference, verse_text, body, prayer, is_read, created_at";
const FAVORITE_COLS: &str = "translation, book_number, book_name, chapter, verse, text, saved_at";

impl Store for SqliteStore {
    fn upsert_books(&self, books: &[Book]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        for book in books {
            tx.execute(
                "INSERT INTO books (translation, book_number, book_name, chapters, testament, cached_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(translation, book_number) DO UPDATE SET
                     book_name = ?3, chapters = ?4, testament = ?5, cached_at = ?6",
                params![
                    book.translation,
                    book.book_number,
                    book.name,
                    book.chapters,
                    book.testament.as_str(),
                    book.cached_at
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn get_book(&self, translation: &str, book_number: i32) -> Result<Option<Book>> {
        let conn = self.conn()?;
        let result = conn
            .query_row(
                &format!("SELECT {BOOK_COLS} FROM books WHERE translation = ?1 AND book_number = ?2"),
                params![translation, book_number],
                Self::book_from_row,
            )
            .optional()?;
        Ok(result)
    }

    fn get_books(&self, translation: &str) -> Result<Vec<Book>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {BOOK_COLS} FROM books WHERE translation = ?1 ORDER BY book_number"
        ))?;
        let books = stmt
            .query_map(params![translation], Self::book_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(books)
    }

    fn delete_books(&self, translation: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM books WHERE translation = ?1", params![translation])?;
        Ok(())
    }

    fn delete_stale_books(&self, cutoff_ms: i64) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM books WHERE cached_at < ?1", params![cutoff_ms])?;
        Ok(deleted)
    }

    fn upsert_verse(&self, verse: &Verse) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO verses (translation, book_number, book_name, chapter, verse, text, cached_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(translation, book_number, chapter, verse) DO UPDATE SET
                 book_name = ?3, text = ?6, cached_at = ?7",
            params![
                verse.translation,
                verse.book_number,
                verse.book_name,
                verse.chapter,
                verse.verse,
                verse.text,
                verse.cached_at
            ],
        )?;
        Ok(())
    }

    fn upsert_verses(&self, verses: &[Verse]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        for verse in verses {
            tx.execute(
                "INSERT INTO verses (translation, book_number, book_name, chapter, verse, text, cached_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(translation, book_number, chapter, verse) DO UPDATE SET
                     book_name = ?3, text = ?6, cached_at = ?7",
                params![
                    verse.translation,
                    verse.book_number,
                    verse.book_name,
                    verse.chapter,
                    verse.verse,
                    verse.text,
                    verse.cached_at
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn get_chapter_verses(&self, translation: &str, book: i32, chapter: i32) -> Result<Vec<Verse>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {VERSE_COLS} FROM verses
             WHERE translation = ?1 AND book_number = ?2 AND chapter = ?3
             ORDER BY verse ASC"
        ))?;
        let verses = stmt
            .query_map(params![translation, book, chapter], Self::verse_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(verses)
    }

    fn get_verse(
        &self,
        translation: &str,
        book: i32,
        chapter: i32,
        verse: i32,
    ) -> Result<Option<Verse>> {
        let conn = self.conn()?;
        let result = conn
            .query_row(
                &format!(
                    "SELECT {VERSE_COLS} FROM verses
                     WHERE translation = ?1 AND book_number = ?2 AND chapter = ?3 AND verse = ?4"
                ),
                params![translation, book, chapter, verse],
                Self::verse_from_row,
            )
            .optional()?;
        Ok(result)
    }

    fn search_verses(&self, query: &str, translation: &str) -> Result<Vec<Verse>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {VERSE_COLS} FROM verses
             WHERE translation = ?1 AND text LIKE '%' || ?2 || '%'
             ORDER BY book_number, chapter, verse"
        ))?;
        let verses = stmt
            .query_map(params![translation, query], Self::verse_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(verses)
    }

    fn replace_chapter_verses(
        &self,
        translation: &str,
        book: i32,
        chapter: i32,
        verses: &[Verse],
    ) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM verses WHERE translation = ?1 AND book_number = ?2 AND chapter = ?3",
            params![translation, book, chapter],
        )?;
        for verse in verses {
            tx.execute(
                "INSERT INTO verses (translation, book_number, book_name, chapter, verse, text, cached_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(translation, book_number, chapter, verse) DO UPDATE SET
                     book_name = ?3, text = ?6, cached_at = ?7",
                params![
                    verse.translation,
                    verse.book_number,
                    verse.book_name,
                    verse.chapter,
                    verse.verse,
                    verse.text,
                    verse.cached_at
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn delete_stale_verses(&self, cutoff_ms: i64) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM verses WHERE cached_at < ?1", params![cutoff_ms])?;
        Ok(deleted)
    }

    fn chapter_verse_count(&self, translation: &str, book: i32, chapter: i32) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM verses
             WHERE translation = ?1 AND book_number = ?2 AND chapter = ?3",
            params![translation, book, chapter],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn get_streak(&self) -> Result<Option<StreakRecord>> {
        let conn = self.conn()?;
        let result = conn
            .query_row(
                "SELECT current_streak, longest_streak, last_read_date, streak_start_date, total_days_read
                 FROM streak WHERE id = 1",
                [],
                |row| {
                    Ok(StreakRecord {
                        current_streak: row.get(0)?,
                        longest_streak: row.get(1)?,
                        last_read_date: row.get(2)?,
                        streak_start_date: row.get(3)?,
                        total_days_read: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    fn put_streak(&self, record: &StreakRecord) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO streak (id, current_streak, longest_streak, last_read_date, streak_start_date, total_days_read)
             VALUES (1, ?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                 current_streak = ?1, longest_streak = ?2, last_read_date = ?3,
                 streak_start_date = ?4, total_days_read = ?5",
            params![
                record.current_streak,
                record.longest_streak,
                record.last_read_date,
                record.streak_start_date,
                record.total_days_read
            ],
        )?;
        Ok(())
    }

    fn add_reading(&self, reading: &ReadingProgress) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO reading_history (translation, book_number, book_name, chapter, verse, read_at, duration_seconds)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                reading.translation,
                reading.book_number,
                reading.book_name,
                reading.chapter,
                reading.verse,
                reading.read_at,
                reading.duration_seconds
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn recent_readings(&self, limit: usize) -> Result<Vec<ReadingProgress>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {READING_COLS} FROM reading_history ORDER BY read_at DESC LIMIT ?1"
        ))?;
        let readings = stmt
            .query_map(params![limit as i64], Self::reading_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(readings)
    }

    fn last_reading(&self) -> Result<Option<ReadingProgress>> {
        let conn = self.conn()?;
        let result = conn
            .query_row(
                &format!("SELECT {READING_COLS} FROM reading_history ORDER BY read_at DESC LIMIT 1"),
                [],
                Self::reading_from_row,
            )
            .optional()?;
        Ok(result)
    }

    fn readings_between(&self, start_ms: i64, end_ms: i64) -> Result<Vec<ReadingProgress>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {READING_COLS} FROM reading_history
             WHERE read_at >= ?1 AND read_at < ?2 ORDER BY read_at DESC"
        ))?;
        let readings = stmt
            .query_map(params![start_ms, end_ms], Self::reading_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(readings)
    }

    fn total_reading_seconds_between(&self, start_ms: i64, end_ms: i64) -> Result<i64> {
        let conn = self.conn()?;
        let total: Option<i64> = conn.query_row(
            "SELECT SUM(duration_seconds) FROM reading_history WHERE read_at >= ?1 AND read_at < ?2",
            params![start_ms, end_ms],
            |row| row.get(0),
        )?;
        Ok(total.unwrap_or(0))
    }

    fn total_days_read(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT DATE(read_at / 1000, 'unixepoch', 'localtime')) FROM reading_history",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn delete_readings_before(&self, cutoff_ms: i64) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM reading_history WHERE read_at < ?1",
            params![cutoff_ms],
        )?;
        Ok(deleted)
    }

    fn upsert_devotional(&self, devotional: &Devotional) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO devotionals (date, title, verse_reference, verse_text, body, prayer, is_read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(date) DO UPDATE SET
                 title = ?2, verse_reference = ?3, verse_text = ?4, body = ?5,
                 prayer = ?6, is_read = ?7",
            params![
                devotional.date,
                devotional.title,
                devotional.verse_reference,
                devotional.verse_text,
                devotional.body,
                devotional.prayer,
                devotional.is_read as i32,
                devotional.created_at
            ],
        )?;
        Ok(())
    }

    fn get_devotional(&self, date: &str) -> Result<Option<Devotional>> {
        let conn = self.conn()?;
        let result = conn
            .query_row(
                &format!("SELECT {DEVOTIONAL_COLS} FROM devotionals WHERE date = ?1"),
                params![date],
                Self::devotional_from_row,
            )
            .optional()?;
        Ok(result)
    }

    fn recent_devotionals(&self, limit: usize) -> Result<Vec<Devotional>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {DEVOTIONAL_COLS} FROM devotionals ORDER BY date DESC LIMIT ?1"
        ))?;
        let devotionals = stmt
            .query_map(params![limit as i64], Self::devotional_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(devotionals)
    }

    fn mark_devotional_read(&self, date: &str) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE devotionals SET is_read = 1 WHERE date = ?1",
            params![date],
        )?;
        Ok(changed > 0)
    }

    fn next_unread_devotional(&self) -> Result<Option<Devotional>> {
        let conn = self.conn()?;
        let result = conn
            .query_row(
                &format!(
                    "SELECT {DEVOTIONAL_COLS} FROM devotionals WHERE is_read = 0 ORDER BY date ASC LIMIT 1"
                ),
                [],
                Self::devotional_from_row,
            )
            .optional()?;
        Ok(result)
    }

    fn devotional_read_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM devotionals WHERE is_read = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn delete_devotionals_before(&self, date: &str) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM devotionals WHERE date < ?1", params![date])?;
        Ok(deleted)
    }

    fn add_favorite(&self, favorite: &Favorite) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO favorites (translation, book_number, book_name, chapter, verse, text, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(translation, book_number, chapter, verse) DO UPDATE SET
                 book_name = ?3, text = ?6, saved_at = ?7",
            params![
                favorite.translation,
                favorite.book_number,
                favorite.book_name,
                favorite.chapter,
                favorite.verse,
                favorite.text,
                favorite.saved_at
            ],
        )?;
        Ok(())
    }

    fn remove_favorite(
        &self,
        translation: &str,
        book: i32,
        chapter: i32,
        verse: i32,
    ) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM favorites
             WHERE translation = ?1 AND book_number = ?2 AND chapter = ?3 AND verse = ?4",
            params![translation, book, chapter, verse],
        )?;
        Ok(deleted > 0)
    }

    fn is_favorite(&self, translation: &str, book: i32, chapter: i32, verse: i32) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM favorites
             WHERE translation = ?1 AND book_number = ?2 AND chapter = ?3 AND verse = ?4",
            params![translation, book, chapter, verse],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn list_favorites(&self) -> Result<Vec<Favorite>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {FAVORITE_COLS} FROM favorites ORDER BY saved_at DESC"
        ))?;
        let favorites = stmt
            .query_map([], Self::favorite_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(favorites)
    }
}

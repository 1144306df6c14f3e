use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verse {
    pub translation: String,
    pub book_number: i32,
    pub book_name: String,
    pub chapter: i32,
    pub verse: i32,
    pub text: String,
    pub cached_at: i64,
}

impl Verse {
    /// Human-readable reference, e.g. "Juan 3:16".
    pub fn reference(&self) -> String {
        format!("{} {}:{}", self.book_name, self.chapter, self.verse)
    }
}

/// A chapter is not persisted as a row; it is the aggregate of the cached
/// verses sharing (translation, book, chapter), ordered by verse number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub translation: String,
    pub book_number: i32,
    pub book_name: String,
    pub chapter: i32,
    pub verses: Vec<Verse>,
}

impl Chapter {
    pub fn from_verses(
        translation: &str,
        book_number: i32,
        book_name: &str,
        chapter: i32,
        mut verses: Vec<Verse>,
    ) -> Self {
        verses.sort_by_key(|v| v.verse);
        Self {
            translation: translation.to_string(),
            book_number,
            book_name: book_name.to_string(),
            chapter,
            verses,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}

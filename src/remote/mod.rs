pub mod http;

use async_trait::async_trait;
use serde::Deserialize;

use crate::app::Result;

pub use http::HttpBibleApi;

/// Wire shape of a translation entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationDto {
    pub short_name: String,
    pub full_name: String,
    pub language: String,
    #[serde(default)]
    pub direction: Option<String>,
}

/// Wire shape of a book entry.
#[derive(Debug, Clone, Deserialize)]
pub struct BookDto {
    #[serde(rename = "bookid")]
    pub book_id: i32,
    pub name: String,
    pub chapters: i32,
}

/// Wire shape of a verse, both inside a chapter payload and standalone.
#[derive(Debug, Clone, Deserialize)]
pub struct VerseDto {
    #[serde(default)]
    pub book: Option<i32>,
    #[serde(default, rename = "bookname")]
    pub book_name: Option<String>,
    #[serde(default)]
    pub chapter: Option<i32>,
    pub verse: i32,
    pub text: String,
}

/// The remote scripture source. One logical call per operation; no retry
/// here, failed calls surface as errors for the caller's scheduler.
#[async_trait]
pub trait BibleApi {
    async fn translations(&self) -> Result<Vec<TranslationDto>>;
    async fn books(&self, translation: &str) -> Result<Vec<BookDto>>;
    async fn chapter(&self, translation: &str, book: i32, chapter: i32) -> Result<Vec<VerseDto>>;
    async fn verse(
        &self,
        translation: &str,
        book: i32,
        chapter: i32,
        verse: i32,
    ) -> Result<VerseDto>;
    async fn random_verse(&self, translation: &str) -> Result<VerseDto>;
}

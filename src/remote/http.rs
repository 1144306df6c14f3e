use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::Result;
use crate::remote::{BibleApi, BookDto, TranslationDto, VerseDto};

pub const DEFAULT_BASE_URL: &str = "https://bolls.life/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct HttpBibleApi {
    client: Client,
    base_url: String,
}

impl HttpBibleApi {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent("selah/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let response = response.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

impl Default for HttpBibleApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BibleApi for HttpBibleApi {
    async fn translations(&self) -> Result<Vec<TranslationDto>> {
        self.get_json("get-translations/").await
    }

    async fn books(&self, translation: &str) -> Result<Vec<BookDto>> {
        self.get_json(&format!("get-books/{translation}/")).await
    }

    async fn chapter(&self, translation: &str, book: i32, chapter: i32) -> Result<Vec<VerseDto>> {
        self.get_json(&format!("get-text/{translation}/{book}/{chapter}/"))
            .await
    }

    async fn verse(
        &self,
        translation: &str,
        book: i32,
        chapter: i32,
        verse: i32,
    ) -> Result<VerseDto> {
        self.get_json(&format!("get-text/{translation}/{book}/{chapter}/{verse}/"))
            .await
    }

    async fn random_verse(&self, translation: &str) -> Result<VerseDto> {
        self.get_json(&format!("get-random-verse/{translation}/"))
            .await
    }
}

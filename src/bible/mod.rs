//! Cache-then-network scripture retrieval.
//!
//! Reads are served from the SQLite cache first; the remote source is
//! consulted afterwards and its result upserted, so stale content is
//! preferred over an error whenever any cached rows exist. Errors surface
//! only on a cold cache miss. Eviction is a pure-TTL sweep, independent of
//! access patterns.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::app::{Result, SelahError};
use crate::domain::{millis, Book, Chapter, FetchState, Testament, Verse};
use crate::remote::{BibleApi, BookDto, VerseDto};
use crate::store::Store;

pub const DEFAULT_CACHE_RETENTION_DAYS: i64 = 7;

pub struct BibleRepository {
    store: Arc<dyn Store + Send + Sync>,
    api: Arc<dyn BibleApi + Send + Sync>,
    retention_days: i64,
}

impl BibleRepository {
    pub fn new(store: Arc<dyn Store + Send + Sync>, api: Arc<dyn BibleApi + Send + Sync>) -> Self {
        Self::with_retention(store, api, DEFAULT_CACHE_RETENTION_DAYS)
    }

    pub fn with_retention(
        store: Arc<dyn Store + Send + Sync>,
        api: Arc<dyn BibleApi + Send + Sync>,
        retention_days: i64,
    ) -> Self {
        Self {
            store,
            api,
            retention_days,
        }
    }

    /// Stale-while-revalidate chapter read. Emits `Loading`, then the cached
    /// chapter if any verses exist, then the fresh chapter after a successful
    /// fetch. A remote failure is emitted only when the cache held nothing.
    /// Dropping the receiver stops further emissions for this call only.
    pub fn get_chapter(
        &self,
        translation: &str,
        book: i32,
        chapter: i32,
    ) -> UnboundedReceiver<FetchState<Chapter>> {
        let (tx, rx) = mpsc::unbounded();
        let store = self.store.clone();
        let api = self.api.clone();
        let translation = translation.to_string();

        tokio::spawn(async move {
            emit(&tx, FetchState::Loading);

            let book_name = cached_book_name(&store, &translation, book);
            let cached = match store.get_chapter_verses(&translation, book, chapter) {
                Ok(verses) => verses,
                Err(e) => {
                    emit(&tx, FetchState::Error(e));
                    return;
                }
            };
            let cache_hit = !cached.is_empty();
            if cache_hit {
                let stale = Chapter::from_verses(&translation, book, &book_name, chapter, cached);
                emit(&tx, FetchState::Success(stale));
            }

            match fetch_and_store_chapter(&store, &api, &translation, book, &book_name, chapter)
                .await
            {
                Ok(fresh) => emit(&tx, FetchState::Success(fresh)),
                Err(e) if cache_hit => {
                    // The stale emission already satisfied the caller.
                    tracing::debug!("chapter refresh failed, serving cache: {}", e);
                }
                Err(e) => emit(&tx, FetchState::Error(e)),
            }
        });

        rx
    }

    /// Single-shot chapter read: cache if non-empty, otherwise one remote
    /// fetch, otherwise the fetch error.
    pub async fn get_chapter_sync(
        &self,
        translation: &str,
        book: i32,
        chapter: i32,
    ) -> Result<Chapter> {
        let book_name = cached_book_name(&self.store, translation, book);
        let cached = self.store.get_chapter_verses(translation, book, chapter)?;
        if !cached.is_empty() {
            return Ok(Chapter::from_verses(translation, book, &book_name, chapter, cached));
        }

        fetch_and_store_chapter(&self.store, &self.api, translation, book, &book_name, chapter)
            .await
    }

    /// Forced remote fetch; replaces the chapter's verses wholesale in a
    /// single store transaction scoped to this exact chapter.
    pub async fn refresh_chapter(&self, translation: &str, book: i32, chapter: i32) -> Result<()> {
        let dtos = self.api.chapter(translation, book, chapter).await?;
        let book_name = cached_book_name(&self.store, translation, book);
        let verses = map_verses(&dtos, translation, book, &book_name, chapter, Local::now());
        self.store.replace_chapter_verses(translation, book, chapter, &verses)?;
        tracing::info!(
            "Refreshed {} {}:{} ({} verses)",
            translation,
            book,
            chapter,
            verses.len()
        );
        Ok(())
    }

    /// Cache-first single verse.
    pub async fn get_verse(
        &self,
        translation: &str,
        book: i32,
        chapter: i32,
        verse: i32,
    ) -> Result<Verse> {
        if let Some(cached) = self.store.get_verse(translation, book, chapter, verse)? {
            return Ok(cached);
        }

        let dto = self.api.verse(translation, book, chapter, verse).await?;
        let book_name = match cached_book_name(&self.store, translation, book) {
            name if name.is_empty() => dto.book_name.clone().unwrap_or_default(),
            name => name,
        };
        let mapped = Verse {
            translation: translation.to_string(),
            book_number: book,
            book_name,
            chapter,
            verse,
            text: dto.text,
            cached_at: millis(Local::now()),
        };
        self.store.upsert_verse(&mapped)?;
        Ok(mapped)
    }

    /// A random verse straight from the remote; never cached since it is
    /// not requested by key.
    pub async fn get_random_verse(&self, translation: &str) -> Result<Verse> {
        let dto = self.api.random_verse(translation).await?;
        Ok(Verse {
            translation: translation.to_string(),
            book_number: dto.book.unwrap_or(0),
            book_name: dto.book_name.clone().unwrap_or_default(),
            chapter: dto.chapter.unwrap_or(0),
            verse: dto.verse,
            text: dto.text,
            cached_at: 0,
        })
    }

    /// Stale-while-revalidate book list for a translation.
    pub fn get_books(&self, translation: &str) -> UnboundedReceiver<FetchState<Vec<Book>>> {
        let (tx, rx) = mpsc::unbounded();
        let store = self.store.clone();
        let api = self.api.clone();
        let translation = translation.to_string();

        tokio::spawn(async move {
            emit(&tx, FetchState::Loading);

            let cached = match store.get_books(&translation) {
                Ok(books) => books,
                Err(e) => {
                    emit(&tx, FetchState::Error(e));
                    return;
                }
            };
            let cache_hit = !cached.is_empty();
            if cache_hit {
                emit(&tx, FetchState::Success(cached));
            }

            match fetch_and_store_books(&store, &api, &translation).await {
                Ok(fresh) => emit(&tx, FetchState::Success(fresh)),
                Err(e) if cache_hit => {
                    tracing::debug!("book list refresh failed, serving cache: {}", e);
                }
                Err(e) => emit(&tx, FetchState::Error(e)),
            }
        });

        rx
    }

    pub async fn get_books_sync(&self, translation: &str) -> Result<Vec<Book>> {
        let cached = self.store.get_books(translation)?;
        if !cached.is_empty() {
            return Ok(cached);
        }
        fetch_and_store_books(&self.store, &self.api, translation).await
    }

    pub async fn get_book(&self, translation: &str, book_number: i32) -> Result<Book> {
        if let Some(cached) = self.store.get_book(translation, book_number)? {
            return Ok(cached);
        }
        // Book lists arrive whole; fill the cache, then look again.
        self.get_books_sync(translation).await?;
        self.store
            .get_book(translation, book_number)?
            .ok_or_else(|| {
                SelahError::NotFound(format!("book {book_number} in {translation}"))
            })
    }

    /// Forced book-list refresh: delete-then-insert for the translation.
    pub async fn refresh_books(&self, translation: &str) -> Result<()> {
        let dtos = self.api.books(translation).await?;
        self.store.delete_books(translation)?;
        let books = map_books(&dtos, translation, Local::now());
        self.store.upsert_books(&books)?;
        Ok(())
    }

    /// Cache-only substring search over stored verses.
    pub fn search_verses(&self, query: &str, translation: &str) -> Result<Vec<Verse>> {
        self.store.search_verses(query, translation)
    }

    pub fn cached_chapter_count(&self, translation: &str, book: i32, chapter: i32) -> Result<i64> {
        self.store.chapter_verse_count(translation, book, chapter)
    }

    /// TTL eviction sweep: drop cached books and verses older than the
    /// retention horizon. Maintenance path, never invoked per-read.
    pub fn evict_stale(&self, now: DateTime<Local>) -> Result<(usize, usize)> {
        let cutoff = millis(now) - Duration::days(self.retention_days).num_milliseconds();
        let verses = self.store.delete_stale_verses(cutoff)?;
        let books = self.store.delete_stale_books(cutoff)?;
        if verses > 0 || books > 0 {
            tracing::info!("Evicted {} stale verses, {} stale books", verses, books);
        }
        Ok((books, verses))
    }
}

fn emit<T>(tx: &UnboundedSender<FetchState<T>>, state: FetchState<T>) {
    // A closed channel means the caller abandoned this call; nothing to do.
    let _ = tx.unbounded_send(state);
}

fn cached_book_name(store: &Arc<dyn Store + Send + Sync>, translation: &str, book: i32) -> String {
    store
        .get_book(translation, book)
        .ok()
        .flatten()
        .map(|b| b.name)
        .unwrap_or_default()
}

async fn fetch_and_store_chapter(
    store: &Arc<dyn Store + Send + Sync>,
    api: &Arc<dyn BibleApi + Send + Sync>,
    translation: &str,
    book: i32,
    book_name: &str,
    chapter: i32,
) -> Result<Chapter> {
    let dtos = api.chapter(translation, book, chapter).await?;
    let verses = map_verses(&dtos, translation, book, book_name, chapter, Local::now());
    store.upsert_verses(&verses)?;
    Ok(Chapter::from_verses(translation, book, book_name, chapter, verses))
}

async fn fetch_and_store_books(
    store: &Arc<dyn Store + Send + Sync>,
    api: &Arc<dyn BibleApi + Send + Sync>,
    translation: &str,
) -> Result<Vec<Book>> {
    let dtos = api.books(translation).await?;
    let books = map_books(&dtos, translation, Local::now());
    store.upsert_books(&books)?;
    Ok(books)
}

fn map_verses(
    dtos: &[VerseDto],
    translation: &str,
    book: i32,
    book_name: &str,
    chapter: i32,
    now: DateTime<Local>,
) -> Vec<Verse> {
    let cached_at = millis(now);
    dtos.iter()
        .map(|dto| Verse {
            translation: translation.to_string(),
            book_number: book,
            book_name: book_name.to_string(),
            chapter,
            verse: dto.verse,
            text: dto.text.clone(),
            cached_at,
        })
        .collect()
}

fn map_books(dtos: &[BookDto], translation: &str, now: DateTime<Local>) -> Vec<Book> {
    let cached_at = millis(now);
    dtos.iter()
        .map(|dto| Book {
            translation: translation.to_string(),
            book_number: dto.book_id,
            name: dto.name.clone(),
            chapters: dto.chapters,
            testament: Testament::of_book(dto.book_id),
            cached_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::StreamExt;

    use crate::store::SqliteStore;

    /// Scripted remote: either serves a fixed chapter/book list or fails
    /// every call.
    struct FakeApi {
        fail: bool,
        verses: Vec<VerseDto>,
        books: Vec<BookDto>,
    }

    impl FakeApi {
        fn serving() -> Self {
            Self {
                fail: false,
                verses: vec![
                    VerseDto {
                        book: Some(43),
                        book_name: Some("Juan".into()),
                        chapter: Some(3),
                        verse: 16,
                        text: "Porque de tal manera amó Dios al mundo...".into(),
                    },
                    VerseDto {
                        book: Some(43),
                        book_name: Some("Juan".into()),
                        chapter: Some(3),
                        verse: 17,
                        text: "Porque no envió Dios a su Hijo...".into(),
                    },
                ],
                books: vec![
                    BookDto {
                        book_id: 1,
                        name: "Génesis".into(),
                        chapters: 50,
                    },
                    BookDto {
                        book_id: 43,
                        name: "Juan".into(),
                        chapters: 21,
                    },
                ],
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                verses: Vec::new(),
                books: Vec::new(),
            }
        }

        fn check(&self) -> Result<()> {
            if self.fail {
                Err(SelahError::Other("remote unavailable".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl BibleApi for FakeApi {
        async fn translations(&self) -> Result<Vec<crate::remote::TranslationDto>> {
            self.check()?;
            Ok(Vec::new())
        }

        async fn books(&self, _translation: &str) -> Result<Vec<BookDto>> {
            self.check()?;
            Ok(self.books.clone())
        }

        async fn chapter(&self, _t: &str, _b: i32, _c: i32) -> Result<Vec<VerseDto>> {
            self.check()?;
            Ok(self.verses.clone())
        }

        async fn verse(&self, _t: &str, _b: i32, _c: i32, verse: i32) -> Result<VerseDto> {
            self.check()?;
            self.verses
                .iter()
                .find(|v| v.verse == verse)
                .cloned()
                .ok_or_else(|| SelahError::NotFound(format!("verse {verse}")))
        }

        async fn random_verse(&self, _translation: &str) -> Result<VerseDto> {
            self.check()?;
            Ok(self.verses[0].clone())
        }
    }

    fn repo(api: FakeApi) -> (BibleRepository, Arc<SqliteStore>) {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let repo = BibleRepository::new(store.clone(), Arc::new(api));
        (repo, store)
    }

    fn cached_verse(n: i32, text: &str) -> Verse {
        Verse {
            translation: "RVR1960".into(),
            book_number: 43,
            book_name: "Juan".into(),
            chapter: 3,
            verse: n,
            text: text.into(),
            cached_at: millis(Local::now()),
        }
    }

    #[tokio::test]
    async fn cold_cache_fetches_and_persists() {
        let (repo, store) = repo(FakeApi::serving());
        let states: Vec<_> = repo.get_chapter("RVR1960", 43, 3).collect().await;

        assert_eq!(states.len(), 2);
        assert!(matches!(states[0], FetchState::Loading));
        match &states[1] {
            FetchState::Success(chapter) => assert_eq!(chapter.verses.len(), 2),
            other => panic!("expected success, got {other:?}"),
        }
        assert_eq!(store.chapter_verse_count("RVR1960", 43, 3).unwrap(), 2);
    }

    #[tokio::test]
    async fn warm_cache_emits_stale_then_fresh() {
        let (repo, store) = repo(FakeApi::serving());
        store.upsert_verses(&[cached_verse(16, "texto viejo")]).unwrap();

        let states: Vec<_> = repo.get_chapter("RVR1960", 43, 3).collect().await;
        assert_eq!(states.len(), 3);
        assert!(matches!(states[0], FetchState::Loading));
        match (&states[1], &states[2]) {
            (FetchState::Success(stale), FetchState::Success(fresh)) => {
                assert_eq!(stale.verses.len(), 1);
                assert_eq!(fresh.verses.len(), 2);
            }
            other => panic!("expected two successes, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn warm_cache_swallows_remote_failure() {
        let (repo, store) = repo(FakeApi::failing());
        store.upsert_verses(&[cached_verse(16, "texto")]).unwrap();

        let states: Vec<_> = repo.get_chapter("RVR1960", 43, 3).collect().await;
        assert_eq!(states.len(), 2);
        assert!(matches!(states[0], FetchState::Loading));
        assert!(states[1].is_success());
    }

    #[tokio::test]
    async fn cold_miss_surfaces_error() {
        let (repo, _store) = repo(FakeApi::failing());
        let states: Vec<_> = repo.get_chapter("RVR1960", 43, 3).collect().await;
        assert_eq!(states.len(), 2);
        assert!(matches!(states[0], FetchState::Loading));
        assert!(matches!(states[1], FetchState::Error(_)));
    }

    #[tokio::test]
    async fn sync_read_prefers_cache_over_network() {
        let (repo, store) = repo(FakeApi::failing());
        store.upsert_verses(&[cached_verse(16, "texto")]).unwrap();

        let chapter = repo.get_chapter_sync("RVR1960", 43, 3).await.unwrap();
        assert_eq!(chapter.verses.len(), 1);

        assert!(repo.get_chapter_sync("RVR1960", 43, 4).await.is_err());
    }

    #[tokio::test]
    async fn refresh_is_idempotent_per_verse_key() {
        let (repo, store) = repo(FakeApi::serving());
        repo.refresh_chapter("RVR1960", 43, 3).await.unwrap();
        repo.refresh_chapter("RVR1960", 43, 3).await.unwrap();
        assert_eq!(store.chapter_verse_count("RVR1960", 43, 3).unwrap(), 2);
    }

    #[tokio::test]
    async fn refresh_replaces_only_the_target_chapter() {
        let (repo, store) = repo(FakeApi::serving());
        let mut other_chapter = cached_verse(1, "otro capítulo");
        other_chapter.chapter = 4;
        store.upsert_verses(&[other_chapter]).unwrap();

        repo.refresh_chapter("RVR1960", 43, 3).await.unwrap();
        assert_eq!(store.chapter_verse_count("RVR1960", 43, 4).unwrap(), 1);
    }

    #[tokio::test]
    async fn books_map_testament_from_number() {
        let (repo, _store) = repo(FakeApi::serving());
        let books = repo.get_books_sync("RVR1960").await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].testament, Testament::Old);
        assert_eq!(books[1].testament, Testament::New);
    }

    #[tokio::test]
    async fn get_book_fills_cache_on_miss() {
        let (repo, store) = repo(FakeApi::serving());
        let book = repo.get_book("RVR1960", 43).await.unwrap();
        assert_eq!(book.name, "Juan");
        assert_eq!(store.get_books("RVR1960").unwrap().len(), 2);

        assert!(matches!(
            repo.get_book("RVR1960", 99).await,
            Err(SelahError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn single_verse_cache_first() {
        let (repo, store) = repo(FakeApi::serving());
        let verse = repo.get_verse("RVR1960", 43, 3, 16).await.unwrap();
        assert_eq!(verse.verse, 16);
        // Second read is served from cache even if the remote dies.
        let repo2 = BibleRepository::new(store.clone(), Arc::new(FakeApi::failing()));
        let again = repo2.get_verse("RVR1960", 43, 3, 16).await.unwrap();
        assert_eq!(again.text, verse.text);
    }

    #[tokio::test]
    async fn eviction_is_pure_ttl() {
        let (repo, store) = repo(FakeApi::serving());
        let now = Local::now();
        let mut old = cached_verse(16, "viejo");
        old.cached_at = millis(now) - Duration::days(8).num_milliseconds();
        let fresh = cached_verse(17, "fresco");
        store.upsert_verses(&[old, fresh]).unwrap();

        let (books, verses) = repo.evict_stale(now).unwrap();
        assert_eq!((books, verses), (0, 1));
        let left = store.get_chapter_verses("RVR1960", 43, 3).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].verse, 17);
    }
}

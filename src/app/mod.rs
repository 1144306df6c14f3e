pub mod error;

pub use error::{Result, SelahError};

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;

use crate::bible::BibleRepository;
use crate::config::Config;
use crate::devotional::DevotionalProvider;
use crate::remote::{BibleApi, HttpBibleApi};
use crate::store::{SqliteStore, Store};
use crate::streak::StreakEngine;
use crate::tracker::ReadingTracker;

/// Wires the store, the remote source and the engines together. The store
/// is shared; the streak engine is the only component that needs writer
/// discipline and it carries that internally.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn Store + Send + Sync>,
    pub bible: BibleRepository,
    pub streak: Arc<StreakEngine>,
    pub tracker: ReadingTracker,
    pub devotionals: DevotionalProvider,
}

impl AppContext {
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };
        let store: Arc<dyn Store + Send + Sync> = Arc::new(SqliteStore::new(&db_path)?);
        let api: Arc<dyn BibleApi + Send + Sync> = Arc::new(HttpBibleApi::with_base_url(
            &config.api_base_url,
            config.http_timeout_secs,
        ));
        Ok(Self::wire(config, store, api))
    }

    pub fn in_memory(config: Config, api: Arc<dyn BibleApi + Send + Sync>) -> Result<Self> {
        let store: Arc<dyn Store + Send + Sync> = Arc::new(SqliteStore::in_memory()?);
        Ok(Self::wire(config, store, api))
    }

    fn wire(
        config: Config,
        store: Arc<dyn Store + Send + Sync>,
        api: Arc<dyn BibleApi + Send + Sync>,
    ) -> Self {
        let bible =
            BibleRepository::with_retention(store.clone(), api, config.cache_retention_days);
        let streak = Arc::new(StreakEngine::new(store.clone()));
        let tracker = ReadingTracker::with_retention(
            store.clone(),
            streak.clone(),
            config.history_retention_days,
        );
        let devotionals =
            DevotionalProvider::with_retention(store.clone(), config.devotional_retention_days);

        Self {
            config,
            store,
            bible,
            streak,
            tracker,
            devotionals,
        }
    }

    /// The maintenance pass a periodic scheduler would run: settle the
    /// streak, evict stale cache rows, prune aged history and devotionals.
    pub async fn sweep(&self) -> Result<()> {
        let now = Local::now();
        self.streak.reconcile(now).await?;
        self.bible.evict_stale(now)?;
        self.tracker.prune(now)?;
        self.devotionals.prune(now)?;
        Ok(())
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| SelahError::Config("Could not find data directory".into()))?;
        let selah_dir = data_dir.join("selah");
        std::fs::create_dir_all(&selah_dir)?;
        Ok(selah_dir.join("selah.db"))
    }
}

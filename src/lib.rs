//! # Selah
//!
//! An offline-first devotional scripture reader: cached scripture with
//! stale-while-revalidate retrieval, a daily reading streak, reading
//! statistics and generated devotionals.
//!
//! ## Architecture
//!
//! ```text
//! Remote (BibleApi) ─┐
//!                    ├─ BibleRepository ── cache-then-network reads
//! Store (SQLite) ────┤
//!                    ├─ StreakEngine ───── single-writer streak singleton
//!                    ├─ ReadingTracker ─── event log + stats, drives streak
//!                    └─ DevotionalProvider daily fetch-or-generate
//! ```
//!
//! Reads prefer stale cached content over errors; a remote failure only
//! surfaces on a cold cache miss. The streak advances at most once per
//! local calendar day and is settled by the periodic `sweep` maintenance
//! pass.

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires the store, the remote source and
/// the engines together.
pub mod app;

/// Cache-then-network scripture retrieval.
pub mod bible;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/selah/config.toml`.
pub mod config;

/// Daily devotional content (fetch-or-generate per date).
pub mod devotional;

/// Core domain models.
///
/// - [`Book`](domain::Book) / [`Testament`](domain::Testament)
/// - [`Verse`](domain::Verse) and the derived [`Chapter`](domain::Chapter)
/// - [`StreakRecord`](domain::StreakRecord) with its pure day-boundary transitions
/// - [`FetchState`](domain::FetchState), the cache-then-network emission
pub mod domain;

/// Remote scripture source.
///
/// - [`BibleApi`](remote::BibleApi): async trait over the four fetch operations
/// - [`HttpBibleApi`](remote::HttpBibleApi): reqwest implementation
pub mod remote;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): rusqlite implementation
pub mod store;

/// The streak engine (single-writer discipline over the singleton row).
pub mod streak;

/// Reading event log and statistics.
pub mod tracker;

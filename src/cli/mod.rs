pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "selah")]
#[command(about = "Offline-first devotional scripture reader", long_about = None)]
pub struct Cli {
    /// Translation to use (defaults to the configured one)
    #[arg(short, long, global = true)]
    pub translation: Option<String>,

    /// Database path override
    #[arg(long, global = true)]
    pub db: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the books of a translation
    Books,
    /// Read a chapter (records a reading event unless --no-track)
    Chapter {
        /// Book number (1-66)
        book: i32,
        /// Chapter number
        chapter: i32,
        /// Do not record a reading event
        #[arg(long)]
        no_track: bool,
    },
    /// Show a single verse
    Verse {
        book: i32,
        chapter: i32,
        verse: i32,
    },
    /// Show a random verse
    Random,
    /// Search cached verses
    Search {
        /// Substring to look for
        query: String,
    },
    /// Show or manage the reading streak
    Streak {
        #[command(subcommand)]
        action: Option<StreakAction>,
    },
    /// Show the devotional for a date (today by default)
    Devotional {
        /// Date in YYYY-MM-DD form
        #[arg(short, long)]
        date: Option<String>,
        /// Mark it as read
        #[arg(long)]
        mark_read: bool,
    },
    /// Manage favorite verses
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Today's reading statistics
    Stats,
    /// Maintenance: settle the streak, evict stale cache, prune history
    Sweep,
}

#[derive(Subcommand)]
pub enum StreakAction {
    /// Zero the current run (longest streak and lifetime days are kept)
    Reset,
    /// List the days of the current run
    History,
}

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// List saved verses
    List,
    /// Save a verse
    Add {
        book: i32,
        chapter: i32,
        verse: i32,
    },
    /// Remove a saved verse
    Remove {
        book: i32,
        chapter: i32,
        verse: i32,
    },
}

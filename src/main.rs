use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use selah::app::AppContext;
use selah::cli::{commands, Cli, Commands, FavoritesAction, StreakAction};
use selah::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let translation = cli
        .translation
        .clone()
        .unwrap_or_else(|| config.default_translation.clone());
    let ctx = AppContext::new(config, cli.db.clone())?;

    match cli.command {
        Commands::Books => {
            commands::list_books(&ctx, &translation).await?;
        }
        Commands::Chapter {
            book,
            chapter,
            no_track,
        } => {
            commands::show_chapter(&ctx, &translation, book, chapter, !no_track).await?;
        }
        Commands::Verse {
            book,
            chapter,
            verse,
        } => {
            commands::show_verse(&ctx, &translation, book, chapter, verse).await?;
        }
        Commands::Random => {
            commands::show_random_verse(&ctx, &translation).await?;
        }
        Commands::Search { query } => {
            commands::search(&ctx, &translation, &query)?;
        }
        Commands::Streak { action } => match action {
            None => commands::show_streak(&ctx).await?,
            Some(StreakAction::Reset) => commands::reset_streak(&ctx).await?,
            Some(StreakAction::History) => commands::streak_history(&ctx).await?,
        },
        Commands::Devotional { date, mark_read } => {
            commands::show_devotional(&ctx, date.as_deref(), mark_read)?;
        }
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::list_favorites(&ctx)?,
            FavoritesAction::Add {
                book,
                chapter,
                verse,
            } => commands::add_favorite(&ctx, &translation, book, chapter, verse).await?,
            FavoritesAction::Remove {
                book,
                chapter,
                verse,
            } => commands::remove_favorite(&ctx, &translation, book, chapter, verse)?,
        },
        Commands::Stats => {
            commands::show_stats(&ctx)?;
        }
        Commands::Sweep => {
            commands::sweep(&ctx).await?;
        }
    }

    Ok(())
}

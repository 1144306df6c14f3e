use chrono::{Local, NaiveDate};

use crate::app::{AppContext, Result, SelahError};
use crate::domain::{millis, Favorite, Testament};

pub async fn list_books(ctx: &AppContext, translation: &str) -> Result<()> {
    let books = ctx.bible.get_books_sync(translation).await?;
    if books.is_empty() {
        println!("No books available for {translation}.");
        return Ok(());
    }
    for book in books {
        let testament = match book.testament {
            Testament::Old => "AT",
            Testament::New => "NT",
        };
        println!(
            "{:>2}. {} ({} capítulos) [{}]",
            book.book_number, book.name, book.chapters, testament
        );
    }
    Ok(())
}

pub async fn show_chapter(
    ctx: &AppContext,
    translation: &str,
    book: i32,
    chapter: i32,
    track: bool,
) -> Result<()> {
    let result = ctx.bible.get_chapter_sync(translation, book, chapter).await?;

    let heading = if result.book_name.is_empty() {
        format!("Libro {book} {chapter}")
    } else {
        format!("{} {}", result.book_name, chapter)
    };
    if result.is_empty() {
        println!("Sin versículos para {heading} ({translation}).");
        return Ok(());
    }
    println!("{heading} ({translation})\n");
    for verse in &result.verses {
        println!("{:>3}  {}", verse.verse, verse.text);
    }

    if track {
        let progress = ctx
            .tracker
            .record(
                translation,
                book,
                &result.book_name,
                chapter,
                None,
                0,
                Local::now(),
            )
            .await?;
        let status = ctx.streak.current_status(Local::now()).await?;
        println!(
            "\nLectura registrada ({}). Racha: {} día(s), próxima meta en {}.",
            progress.id, status.current_streak, status.days_until_milestone
        );
    }
    Ok(())
}

pub async fn show_verse(
    ctx: &AppContext,
    translation: &str,
    book: i32,
    chapter: i32,
    verse: i32,
) -> Result<()> {
    let v = ctx.bible.get_verse(translation, book, chapter, verse).await?;
    println!("{} ({})\n{}", v.reference(), translation, v.text);
    Ok(())
}

pub async fn show_random_verse(ctx: &AppContext, translation: &str) -> Result<()> {
    let v = ctx.bible.get_random_verse(translation).await?;
    println!("{} ({})\n{}", v.reference(), translation, v.text);
    Ok(())
}

pub fn search(ctx: &AppContext, translation: &str, query: &str) -> Result<()> {
    let hits = ctx.bible.search_verses(query, translation)?;
    if hits.is_empty() {
        println!("No cached verses match \"{query}\".");
        return Ok(());
    }
    for v in hits {
        println!("{}  {}", v.reference(), v.text);
    }
    Ok(())
}

pub async fn show_streak(ctx: &AppContext) -> Result<()> {
    let status = ctx.streak.current_status(Local::now()).await?;
    println!("Racha actual:   {} día(s)", status.current_streak);
    println!("Racha más larga: {} día(s)", status.longest_streak);
    println!("Días leídos:    {}", status.total_days_read);
    println!(
        "Estado:         {}",
        if status.has_read_today {
            "leído hoy"
        } else if status.is_active {
            "activa (falta leer hoy)"
        } else {
            "inactiva"
        }
    );
    if status.days_until_milestone > 0 {
        println!(
            "Próxima meta:   {} días (faltan {})",
            status.next_milestone, status.days_until_milestone
        );
    }
    Ok(())
}

pub async fn reset_streak(ctx: &AppContext) -> Result<()> {
    let record = ctx.streak.reset().await?;
    println!(
        "Racha reiniciada. Mejor marca conservada: {} día(s).",
        record.longest_streak
    );
    Ok(())
}

pub async fn streak_history(ctx: &AppContext) -> Result<()> {
    let days = ctx.streak.streak_history(Local::now()).await?;
    if days.is_empty() {
        println!("Sin racha activa.");
        return Ok(());
    }
    for day in days {
        println!("{day}");
    }
    Ok(())
}

pub fn show_devotional(ctx: &AppContext, date: Option<&str>, mark_read: bool) -> Result<()> {
    let date = match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| SelahError::Other(format!("invalid date: {s} (expected YYYY-MM-DD)")))?,
        None => Local::now().date_naive(),
    };

    let devotional = ctx.devotionals.get_or_generate(date)?;
    println!("{} — {}\n", devotional.date, devotional.title);
    println!("{}\n{}\n", devotional.verse_reference, devotional.verse_text);
    println!("{}", devotional.body);
    if let Some(prayer) = &devotional.prayer {
        println!("\nOración: {prayer}");
    }

    if mark_read {
        ctx.devotionals.mark_read(date)?;
        println!("\nMarcado como leído.");
    }
    Ok(())
}

pub async fn add_favorite(
    ctx: &AppContext,
    translation: &str,
    book: i32,
    chapter: i32,
    verse: i32,
) -> Result<()> {
    let v = ctx.bible.get_verse(translation, book, chapter, verse).await?;
    ctx.store.add_favorite(&Favorite {
        translation: v.translation.clone(),
        book_number: v.book_number,
        book_name: v.book_name.clone(),
        chapter: v.chapter,
        verse: v.verse,
        text: v.text.clone(),
        saved_at: millis(Local::now()),
    })?;
    println!("Guardado: {}", v.reference());
    Ok(())
}

pub fn remove_favorite(
    ctx: &AppContext,
    translation: &str,
    book: i32,
    chapter: i32,
    verse: i32,
) -> Result<()> {
    if ctx.store.remove_favorite(translation, book, chapter, verse)? {
        println!("Eliminado.");
    } else {
        println!("No estaba guardado.");
    }
    Ok(())
}

pub fn list_favorites(ctx: &AppContext) -> Result<()> {
    let favorites = ctx.store.list_favorites()?;
    if favorites.is_empty() {
        println!("Sin versículos guardados.");
        return Ok(());
    }
    for f in favorites {
        println!("{} ({})  {}", f.reference(), f.translation, f.text);
    }
    Ok(())
}

pub fn show_stats(ctx: &AppContext) -> Result<()> {
    let stats = ctx.tracker.today_stats(Local::now())?;
    println!("Hoy: {} sesión(es), {} capítulo(s), {} libro(s), {}",
        stats.sessions,
        stats.chapters_read,
        stats.books_read,
        stats.formatted_reading_time()
    );
    println!("Días leídos en total: {}", ctx.tracker.total_days_read()?);
    Ok(())
}

pub async fn sweep(ctx: &AppContext) -> Result<()> {
    ctx.sweep().await?;
    println!("Mantenimiento completado.");
    Ok(())
}

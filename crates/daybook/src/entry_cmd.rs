use anyhow::{Result, bail};
use daybook_core::{EntryDraft, EntryFilter, Mood, parse_date_key};
use serde_json::json;

use crate::cli::{EntryCommands, OutputFormat};
use crate::context::AppContext;
use crate::input;
use crate::output::{date_label, print_entry_table, print_json};

pub(crate) async fn handle_entry(
    ctx: &AppContext,
    cmd: EntryCommands,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        EntryCommands::Add { text, mood } => handle_add(ctx, text, mood, format).await,
        EntryCommands::List { search, date } => handle_list(ctx, search, date, format).await,
        EntryCommands::Show { id } => handle_show(ctx, &id, format).await,
        EntryCommands::Edit { id, text, mood } => handle_edit(ctx, &id, text, mood).await,
        EntryCommands::Delete { id, yes } => handle_delete(ctx, &id, yes).await,
    }
}

async fn handle_add(
    ctx: &AppContext,
    text: Option<String>,
    mood: Option<Mood>,
    format: OutputFormat,
) -> Result<()> {
    let text = input::read_entry_text(text)?;
    let mood = mood.unwrap_or(ctx.config.journal.default_mood);
    let draft = EntryDraft::new(text, mood)?;
    let mut book = ctx.journal().await?;
    let id = book.save(draft.text(), mood).await?;

    match format {
        OutputFormat::Json => print_json(&json!({ "id": id, "streak": book.streak() }))?,
        OutputFormat::Text => {
            println!("{id}");
            eprintln!("Saved {} entry. Streak: {}", mood.label(), streak_text(book.streak()));
        }
    }
    Ok(())
}

async fn handle_list(
    ctx: &AppContext,
    search: Option<String>,
    date: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let date = date.as_deref().map(parse_date_key).transpose()?;
    let filter = EntryFilter::new(search, date);
    let book = ctx.journal().await?;
    let entries = book.filtered(&filter);

    if format == OutputFormat::Json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        if filter.is_active() {
            eprintln!("No entries match.");
        } else {
            eprintln!("No entries yet. Write one with 'daybook entry add'.");
        }
        return Ok(());
    }
    print_entry_table(&entries);
    Ok(())
}

async fn handle_show(ctx: &AppContext, id: &str, format: OutputFormat) -> Result<()> {
    let book = ctx.journal().await?;
    let entry = book.resolve(id)?;

    match format {
        OutputFormat::Json => print_json(entry)?,
        OutputFormat::Text => {
            println!(
                "{} {}  {}  ({})",
                entry.mood.emoji(),
                entry.mood.label(),
                date_label(entry.created_at),
                entry.id
            );
            println!(
                "{}",
                entry
                    .created_at
                    .with_timezone(&chrono::Local)
                    .format("%A, %B %-d, %Y at %H:%M")
            );
            println!();
            println!("{}", entry.text);
        }
    }
    Ok(())
}

async fn handle_edit(
    ctx: &AppContext,
    id: &str,
    text: Option<String>,
    mood: Option<Mood>,
) -> Result<()> {
    if text.is_none() && mood.is_none() {
        bail!("Nothing to change: pass --text and/or --mood");
    }
    if let Some(text) = text.as_deref() {
        EntryDraft::new(text, mood.unwrap_or(ctx.config.journal.default_mood))?;
    }
    let mut book = ctx.journal().await?;
    let entry = book.resolve(id)?;
    let entry_id = entry.id.clone();
    let text = text.unwrap_or_else(|| entry.text.clone());
    let mood = mood.unwrap_or(entry.mood);

    book.update(&entry_id, &text, mood).await?;
    eprintln!("Updated entry {entry_id}");
    Ok(())
}

async fn handle_delete(ctx: &AppContext, id: &str, yes: bool) -> Result<()> {
    let mut book = ctx.journal().await?;
    let entry = book.resolve(id)?;
    let entry_id = entry.id.clone();
    let question = format!(
        "Delete the {} entry from {}?",
        entry.mood.label(),
        date_label(entry.created_at)
    );
    if !input::confirm(&question, yes)? {
        eprintln!("Kept entry {entry_id}");
        return Ok(());
    }
    book.delete(&entry_id).await?;
    eprintln!("Deleted entry {entry_id}");
    Ok(())
}

pub(crate) async fn handle_streak(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let book = ctx.journal().await?;
    match format {
        OutputFormat::Json => print_json(&json!({ "streak": book.streak() })),
        OutputFormat::Text => {
            println!("{}", streak_text(book.streak()));
            Ok(())
        }
    }
}

pub(crate) async fn handle_stats(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let book = ctx.journal().await?;
    let counts = book.mood_counts();
    let total = book.entries().len();

    if format == OutputFormat::Json {
        return print_json(&json!({
            "total": total,
            "streak": book.streak(),
            "moods": counts,
        }));
    }
    if total == 0 {
        eprintln!("No entries yet.");
        return Ok(());
    }

    let mut rows: Vec<(Mood, usize)> = counts.into_iter().collect();
    rows.sort_by(|(a_mood, a), (b_mood, b)| b.cmp(a).then(a_mood.cmp(b_mood)));
    for (mood, count) in rows {
        println!(
            "{} {:<9} {:>4}  {}",
            mood.emoji(),
            mood.label(),
            count,
            "#".repeat(bar_width(count, total))
        );
    }
    println!("{total} entries, {}", streak_text(book.streak()));
    Ok(())
}

fn streak_text(streak: u32) -> String {
    format!("{streak} day streak")
}

/// Bar length out of 30 columns, at least 1 for any nonzero count.
fn bar_width(count: usize, total: usize) -> usize {
    if total == 0 || count == 0 {
        return 0;
    }
    (count * 30 / total).max(1)
}

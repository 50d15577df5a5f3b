use anyhow::Result;
use daybook_core::{TodoDraft, TodoView};
use serde_json::json;

use crate::cli::{OutputFormat, TodoCommands};
use crate::context::AppContext;
use crate::input;
use crate::output::{print_json, truncate};

pub(crate) async fn handle_todo(
    ctx: &AppContext,
    cmd: TodoCommands,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        TodoCommands::Add { text } => handle_add(ctx, &text, format).await,
        TodoCommands::List { completed } => handle_list(ctx, completed, format).await,
        TodoCommands::Toggle { id } => handle_toggle(ctx, &id, format).await,
        TodoCommands::Delete { id, yes } => handle_delete(ctx, &id, yes).await,
    }
}

async fn handle_add(ctx: &AppContext, text: &str, format: OutputFormat) -> Result<()> {
    let draft = TodoDraft::new(text)?;
    let mut board = ctx.todo_board().await?;
    let id = board.add(draft.text()).await?;
    match format {
        OutputFormat::Json => print_json(&json!({ "id": id }))?,
        OutputFormat::Text => {
            println!("{id}");
            let counts = board.counts();
            eprintln!("Added. {} active task(s).", counts.active);
        }
    }
    Ok(())
}

async fn handle_list(ctx: &AppContext, completed: bool, format: OutputFormat) -> Result<()> {
    let board = ctx.todo_board().await?;
    let view = TodoView::from_show_completed(completed);
    let items = board.visible(view);
    let counts = board.counts();

    if format == OutputFormat::Json {
        return print_json(&json!({ "counts": counts, "items": items }));
    }

    println!(
        "Active ({})  Completed ({})",
        counts.active, counts.completed
    );
    if items.is_empty() {
        match view {
            TodoView::Active => eprintln!("No active tasks."),
            TodoView::Completed => eprintln!("No completed tasks."),
        }
        return Ok(());
    }
    for item in items {
        let check = if item.completed { "[x]" } else { "[ ]" };
        println!("{check} {:<26}  {}", item.id, truncate(&item.text, 60));
    }
    Ok(())
}

async fn handle_toggle(ctx: &AppContext, id: &str, format: OutputFormat) -> Result<()> {
    let mut board = ctx.todo_board().await?;
    let item = board.resolve(id)?;
    let (todo_id, text) = (item.id.clone(), item.text.clone());
    let completed = board.toggle(&todo_id).await?;

    match format {
        OutputFormat::Json => print_json(&json!({ "id": todo_id, "completed": completed }))?,
        OutputFormat::Text => {
            let verb = if completed { "Completed" } else { "Reopened" };
            eprintln!("{verb}: {}", truncate(&text, 60));
        }
    }
    Ok(())
}

async fn handle_delete(ctx: &AppContext, id: &str, yes: bool) -> Result<()> {
    let mut board = ctx.todo_board().await?;
    let item = board.resolve(id)?;
    let (todo_id, text) = (item.id.clone(), item.text.clone());
    if !input::confirm(&format!("Delete task \"{}\"?", truncate(&text, 40)), yes)? {
        eprintln!("Kept task {todo_id}");
        return Ok(());
    }
    board.delete(&todo_id).await?;
    eprintln!("Deleted task {todo_id}");
    Ok(())
}

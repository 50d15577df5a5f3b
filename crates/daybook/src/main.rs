use anyhow::Result;
use clap::Parser;

mod auth_cmds;
mod calendar_cmd;
mod cli;
mod cli_entry;
mod cli_todo;
mod config_cmds;
mod context;
mod entry_cmd;
mod error_hints;
mod input;
mod output;
mod todo_cmd;

use cli::{Cli, Commands, ConfigCommands, OutputFormat};
use context::AppContext;

#[tokio::main]
async fn main() {
    // Initialize tracing (output to stderr, initialize only once)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    match run(cli.command, cli.format).await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            if let Some(hint) = error_hints::suggest_fix(&err) {
                eprintln!("{hint}");
            }
            std::process::exit(1);
        }
    }
}

async fn run(command: Commands, format: OutputFormat) -> Result<i32> {
    // Config commands must work even when the config itself is broken.
    if let Commands::Config { cmd } = command {
        match cmd {
            ConfigCommands::Init { force } => config_cmds::handle_config_init(force)?,
            ConfigCommands::Show => config_cmds::handle_config_show(format)?,
            ConfigCommands::Path => config_cmds::handle_config_path()?,
        }
        return Ok(0);
    }

    let ctx = AppContext::load()?;
    match command {
        Commands::SignUp { email, password } => {
            return auth_cmds::handle_sign_up(&ctx, email, password, format).await;
        }
        Commands::SignIn { email, password } => {
            return auth_cmds::handle_sign_in(&ctx, email, password, format).await;
        }
        Commands::Unlock => return auth_cmds::handle_unlock(&ctx, format).await,
        Commands::SignOut => auth_cmds::handle_sign_out(&ctx)?,
        Commands::Whoami => auth_cmds::handle_whoami(&ctx, format)?,
        Commands::Lock => auth_cmds::handle_lock(&ctx)?,
        Commands::Entry { cmd } => entry_cmd::handle_entry(&ctx, cmd, format).await?,
        Commands::Streak => entry_cmd::handle_streak(&ctx, format).await?,
        Commands::Stats => entry_cmd::handle_stats(&ctx, format).await?,
        Commands::Calendar { month, select } => {
            calendar_cmd::handle_calendar(&ctx, month, select, format).await?
        }
        Commands::Todo { cmd } => todo_cmd::handle_todo(&ctx, cmd, format).await?,
        Commands::Config { .. } => {}
    }
    Ok(0)
}

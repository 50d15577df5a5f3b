use clap::{Parser, Subcommand, ValueEnum};

pub use crate::cli_entry::EntryCommands;
pub use crate::cli_todo::TodoCommands;

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Daybook: a private mood journal with streaks, calendar and todos")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for CLI responses
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and sign in
    SignUp {
        #[arg(long)]
        email: String,

        /// Password; read from stdin if omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign in with email and password
    SignIn {
        #[arg(long)]
        email: String,

        /// Password; read from stdin if omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out and forget the session
    SignOut,

    /// Show who is signed in
    Whoami,

    /// Pass the biometric lock
    Unlock,

    /// Lock the journal until the next unlock
    Lock,

    /// Write, browse and edit journal entries
    Entry {
        #[command(subcommand)]
        cmd: EntryCommands,
    },

    /// Show the current run of consecutive journaling days
    Streak,

    /// Count entries per mood
    Stats,

    /// Month view with the day's mood on each date
    Calendar {
        /// Month to show (YYYY-MM, default: current month)
        #[arg(long)]
        month: Option<String>,

        /// Highlight a date and list its entries (YYYY-MM-DD)
        #[arg(long)]
        select: Option<String>,
    },

    /// Manage the todo list
    Todo {
        #[command(subcommand)]
        cmd: TodoCommands,
    },

    /// Show/manage configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a commented default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show the effective configuration (secrets masked)
    Show,
    /// Print the config file location
    Path,
}

//! CLI subcommands for the `daybook entry` command group.

use clap::Subcommand;
use daybook_core::Mood;

#[derive(Subcommand)]
pub enum EntryCommands {
    /// Write a new entry
    Add {
        /// Entry text; reads from stdin if omitted
        text: Option<String>,

        /// How you feel (default: journal.default_mood)
        #[arg(short, long, value_enum)]
        mood: Option<Mood>,
    },

    /// List entries, newest first
    List {
        /// Match text or mood name, case-insensitive
        #[arg(short, long)]
        search: Option<String>,

        /// Only entries written on this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show one entry in full
    Show {
        /// Entry id or unique prefix
        id: String,
    },

    /// Change an entry's text and/or mood
    Edit {
        /// Entry id or unique prefix
        id: String,

        #[arg(short, long)]
        text: Option<String>,

        #[arg(short, long, value_enum)]
        mood: Option<Mood>,
    },

    /// Delete an entry
    Delete {
        /// Entry id or unique prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

//! CLI subcommands for the `daybook todo` command group.

use clap::Subcommand;

#[derive(Subcommand)]
pub enum TodoCommands {
    /// Add a task
    Add {
        /// Task text
        text: String,
    },

    /// List active tasks (or completed ones)
    List {
        /// Show completed tasks instead of active ones
        #[arg(long)]
        completed: bool,
    },

    /// Mark a task done, or not done again
    Toggle {
        /// Task id or unique prefix
        id: String,
    },

    /// Delete a task
    Delete {
        /// Task id or unique prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

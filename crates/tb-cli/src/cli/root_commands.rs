use clap::{Args, Subcommand};

use crate::cli::subcommands::{AuthCommands, TaskCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Sign in, sign out, and inspect the current identity.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Create, list, and move tasks.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Show the task board.
    Board(BoardArgs),
}

#[derive(Clone, Debug, Args)]
pub struct BoardArgs {
    /// Keep printing the board on every change until Ctrl-C.
    #[arg(short, long)]
    pub watch: bool,
}

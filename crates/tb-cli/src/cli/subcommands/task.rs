use std::path::PathBuf;

use clap::{Args, Subcommand};
use tb_core::enums::Bucket;

/// Task commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Create a task.
    Create(TaskCreateArgs),
    /// List tasks on the board.
    List {
        /// Only tasks in this bucket: todo, in-progress, completed.
        #[arg(long)]
        bucket: Option<Bucket>,
    },
    /// Move a task to another bucket.
    Move {
        id: String,
        /// Destination bucket: todo, in-progress, completed.
        #[arg(long)]
        to: Bucket,
    },
    /// Change a task's details. Status changes use `move` or `complete`.
    Edit(TaskEditArgs),
    /// Mark a task completed.
    Complete { id: String },
    /// Delete a task.
    Delete { id: String },
}

/// Raw form input. Validation happens on submit so every problem is
/// reported at once.
#[derive(Clone, Debug, Args)]
pub struct TaskCreateArgs {
    #[arg(long, default_value = "")]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Work or Personal.
    #[arg(long, default_value = "")]
    pub category: String,
    /// Due date, YYYY-MM-DD.
    #[arg(long, default_value = "")]
    pub due: String,
    /// ToDo, "In Progress", or Completed.
    #[arg(long, default_value = "")]
    pub status: String,
    /// File to attach (jpg, png, or pdf, up to 5 MB).
    #[arg(long)]
    pub attachment: Option<PathBuf>,
}

/// Only the given fields change.
#[derive(Clone, Debug, Args)]
pub struct TaskEditArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    /// New description; pass "" to clear it.
    #[arg(long)]
    pub description: Option<String>,
    /// Work or Personal.
    #[arg(long)]
    pub category: Option<String>,
    /// New due date, YYYY-MM-DD.
    #[arg(long)]
    pub due: Option<String>,
}

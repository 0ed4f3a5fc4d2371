mod auth;
mod task;

pub use auth::{AuthCommands, AuthLoginArgs};
pub use task::{TaskCommands, TaskCreateArgs, TaskEditArgs};

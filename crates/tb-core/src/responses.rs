//! CLI response types returned as JSON by `taskbuddy` commands.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Task;
use crate::enums::Bucket;
use crate::identity::UserIdentity;

/// One column of the rendered board.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BoardColumn {
    pub bucket: Bucket,
    pub title: String,
    pub count: usize,
    pub tasks: Vec<Task>,
}

/// Response from `taskbuddy board` and the task mutation commands.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BoardResponse {
    pub owner: UserIdentity,
    /// Revision of the last snapshot applied to the board.
    pub revision: u64,
    pub columns: Vec<BoardColumn>,
}

/// Response from `taskbuddy task create`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskCreateResponse {
    pub task_id: String,
    pub dismissed: bool,
}

/// Response from `taskbuddy auth status` and `taskbuddy auth login`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    pub user: Option<UserIdentity>,
    pub signed_in_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

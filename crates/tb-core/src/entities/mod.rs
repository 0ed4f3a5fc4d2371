//! Entity structs for TaskBuddy domain objects.
//!
//! `Task` maps to the `tasks` table in the libSQL database. All structs derive
//! `Serialize` and `Deserialize` for JSON roundtrip; `JsonSchema` is derived
//! for schema validation of CLI output.

mod task;

pub use task::{NewTask, Task, TaskField};

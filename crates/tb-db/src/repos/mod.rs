//! Repository modules adding CRUD methods to `TaskService` via `impl TaskService` blocks.

pub mod task;

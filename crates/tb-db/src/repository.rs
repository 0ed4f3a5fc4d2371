//! The task collection seam consumed by the board and the creation form.

use async_trait::async_trait;
use tb_core::entities::{NewTask, Task, TaskField};

use crate::error::DatabaseError;
use crate::subscription::Subscription;

/// Document collection of tasks keyed by owner.
///
/// Writes never return the new state; it arrives on every open
/// [`Subscription`] for the owner as a full snapshot.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Open a live subscription to the owner's tasks. The current snapshot is
    /// delivered first.
    async fn subscribe(&self, owner_id: &str) -> Result<Subscription, DatabaseError>;

    /// Store a new task and return its assigned id.
    async fn create(&self, owner_id: &str, task: NewTask) -> Result<String, DatabaseError>;

    /// Overwrite one field of an existing task.
    async fn update_field(
        &self,
        owner_id: &str,
        task_id: &str,
        field: TaskField,
    ) -> Result<(), DatabaseError>;

    async fn delete(&self, owner_id: &str, task_id: &str) -> Result<(), DatabaseError>;

    /// One-shot read of the owner's tasks in creation order.
    async fn list(&self, owner_id: &str) -> Result<Vec<Task>, DatabaseError>;

    async fn get(&self, owner_id: &str, task_id: &str) -> Result<Task, DatabaseError>;

    /// Number of open subscriptions for the owner.
    fn subscriber_count(&self, owner_id: &str) -> usize;
}

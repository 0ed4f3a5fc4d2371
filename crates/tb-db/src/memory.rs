//! In-memory task repository.
//!
//! Same observable behavior as [`crate::TaskService`] without storage. Every
//! write is recorded, and the next write can be made to fail, so board and
//! form behavior can be checked without a database.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tb_core::entities::{NewTask, Task, TaskField};
use tb_core::ids::{PREFIX_TASK, format_id};

use crate::error::DatabaseError;
use crate::repository::TaskRepository;
use crate::subscription::{SnapshotHub, Subscription};

/// A write received by the repository, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryCall {
    Create { owner_id: String, task: NewTask },
    UpdateField {
        owner_id: String,
        task_id: String,
        field: TaskField,
    },
    Delete { owner_id: String, task_id: String },
}

#[derive(Debug, Default)]
struct State {
    tasks: Vec<Task>,
    next_id: u32,
    calls: Vec<RepositoryCall>,
    fail_next: Option<String>,
}

#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    state: Mutex<State>,
    hub: SnapshotHub,
}

impl InMemoryTaskRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert tasks as-is (any status, any owner) and publish.
    pub fn seed(&self, tasks: impl IntoIterator<Item = Task>) {
        let mut owners = Vec::new();
        {
            let mut state = self.state();
            for task in tasks {
                if !owners.contains(&task.owner_id) {
                    owners.push(task.owner_id.clone());
                }
                state.tasks.push(task);
            }
        }
        for owner_id in owners {
            self.publish(&owner_id);
        }
    }

    /// Make the next write fail with `DatabaseError::Query(message)`.
    pub fn fail_next_write(&self, message: impl Into<String>) {
        self.state().fail_next = Some(message.into());
    }

    /// Every write received so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<RepositoryCall> {
        self.state().calls.clone()
    }

    /// End every open subscription. Their `next()` returns `None`.
    pub fn close_subscriptions(&self) {
        self.hub.close(None);
    }

    fn owned(&self, owner_id: &str) -> Vec<Task> {
        self.state()
            .tasks
            .iter()
            .filter(|task| task.owner_id == owner_id)
            .cloned()
            .collect()
    }

    fn publish(&self, owner_id: &str) {
        let tasks = self.owned(owner_id);
        self.hub.publish(owner_id, tasks);
    }

    /// Record the call and consume an injected failure, if any.
    fn begin_write(&self, call: RepositoryCall) -> Result<MutexGuard<'_, State>, DatabaseError> {
        let mut state = self.state();
        state.calls.push(call);
        match state.fail_next.take() {
            Some(message) => Err(DatabaseError::Query(message)),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn subscribe(&self, owner_id: &str) -> Result<Subscription, DatabaseError> {
        Ok(self.hub.subscribe(owner_id, self.owned(owner_id)))
    }

    async fn create(&self, owner_id: &str, task: NewTask) -> Result<String, DatabaseError> {
        let id = {
            let mut state = self.begin_write(RepositoryCall::Create {
                owner_id: owner_id.to_string(),
                task: task.clone(),
            })?;
            state.next_id += 1;
            let id = format_id(PREFIX_TASK, state.next_id.to_be_bytes());
            state
                .tasks
                .push(task.into_task(id.clone(), owner_id.to_string(), Utc::now()));
            id
        };
        self.publish(owner_id);
        Ok(id)
    }

    async fn update_field(
        &self,
        owner_id: &str,
        task_id: &str,
        field: TaskField,
    ) -> Result<(), DatabaseError> {
        {
            let mut state = self.begin_write(RepositoryCall::UpdateField {
                owner_id: owner_id.to_string(),
                task_id: task_id.to_string(),
                field: field.clone(),
            })?;
            let task = state
                .tasks
                .iter_mut()
                .find(|task| task.id == task_id && task.owner_id == owner_id)
                .ok_or_else(|| DatabaseError::NotFound {
                    id: task_id.to_string(),
                })?;
            field.apply_to(task);
        }
        self.publish(owner_id);
        Ok(())
    }

    async fn delete(&self, owner_id: &str, task_id: &str) -> Result<(), DatabaseError> {
        {
            let mut state = self.begin_write(RepositoryCall::Delete {
                owner_id: owner_id.to_string(),
                task_id: task_id.to_string(),
            })?;
            let before = state.tasks.len();
            state
                .tasks
                .retain(|task| !(task.id == task_id && task.owner_id == owner_id));
            if state.tasks.len() == before {
                return Err(DatabaseError::NotFound {
                    id: task_id.to_string(),
                });
            }
        }
        self.publish(owner_id);
        Ok(())
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<Task>, DatabaseError> {
        Ok(self.owned(owner_id))
    }

    async fn get(&self, owner_id: &str, task_id: &str) -> Result<Task, DatabaseError> {
        self.owned(owner_id)
            .into_iter()
            .find(|task| task.id == task_id)
            .ok_or_else(|| DatabaseError::NotFound {
                id: task_id.to_string(),
            })
    }

    fn subscriber_count(&self, owner_id: &str) -> usize {
        self.hub.subscriber_count(owner_id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tb_core::enums::TaskStatus;

    use super::*;
    use crate::test_support::helpers::new_task;

    const OWNER: &str = "usr-0000000b";

    #[tokio::test]
    async fn create_assigns_sequential_ids_and_records_call() {
        let repo = InMemoryTaskRepository::new();
        let first = repo
            .create(OWNER, new_task("One", TaskStatus::ToDo))
            .await
            .unwrap();
        let second = repo
            .create(OWNER, new_task("Two", TaskStatus::ToDo))
            .await
            .unwrap();
        assert_eq!(first, "tsk-00000001");
        assert_eq!(second, "tsk-00000002");
        assert_eq!(repo.calls().len(), 2);
    }

    #[tokio::test]
    async fn injected_failure_hits_one_write_only() {
        let repo = InMemoryTaskRepository::new();
        repo.fail_next_write("offline");
        let err = repo
            .create(OWNER, new_task("Lost", TaskStatus::ToDo))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Query(m) if m == "offline"));
        assert!(repo.list(OWNER).await.unwrap().is_empty());

        repo.create(OWNER, new_task("Kept", TaskStatus::ToDo))
            .await
            .unwrap();
        assert_eq!(repo.list(OWNER).await.unwrap().len(), 1);
        assert_eq!(repo.calls().len(), 2);
    }

    #[tokio::test]
    async fn update_and_delete_publish() {
        let repo = InMemoryTaskRepository::new();
        let id = repo
            .create(OWNER, new_task("T1", TaskStatus::ToDo))
            .await
            .unwrap();
        let mut sub = repo.subscribe(OWNER).await.unwrap();
        assert_eq!(sub.next().await.unwrap().tasks.len(), 1);

        repo.update_field(OWNER, &id, TaskField::Status(TaskStatus::Completed))
            .await
            .unwrap();
        assert_eq!(
            sub.next().await.unwrap().tasks[0].status,
            TaskStatus::Completed
        );

        repo.delete(OWNER, &id).await.unwrap();
        assert!(sub.next().await.unwrap().tasks.is_empty());
    }

    #[tokio::test]
    async fn writes_to_missing_tasks_fail() {
        let repo = InMemoryTaskRepository::new();
        assert!(matches!(
            repo.delete(OWNER, "tsk-00000009").await,
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(matches!(
            repo.update_field(OWNER, "tsk-00000009", TaskField::Title("x".into()))
                .await,
            Err(DatabaseError::NotFound { .. })
        ));
    }
}

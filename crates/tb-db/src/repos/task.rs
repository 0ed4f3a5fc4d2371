//! Task repository: CRUD plus snapshot publication.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use tb_core::entities::{NewTask, Task, TaskField};
use tb_core::ids::PREFIX_TASK;

use crate::error::DatabaseError;
use crate::helpers::{DATE_FORMAT, get_opt_string, parse_date, parse_datetime, parse_from_str};
use crate::repository::TaskRepository;
use crate::service::TaskService;
use crate::subscription::Subscription;
use crate::updates::task::TaskUpdate;

const SELECT_COLS: &str = "id, owner_id, title, description, category, due_date, status, \
     attachment_name, attachment_type, created_at";

fn row_to_task(row: &libsql::Row) -> Result<Task, DatabaseError> {
    Ok(Task {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: get_opt_string(row, 3)?,
        category: parse_from_str(&row.get::<String>(4)?)?,
        due_date: parse_date(&row.get::<String>(5)?)?,
        status: row.get::<String>(6)?.into(),
        attachment_name: get_opt_string(row, 7)?,
        attachment_type: get_opt_string(row, 8)?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl TaskService {
    pub async fn create_task(&self, owner_id: &str, new: NewTask) -> Result<Task, DatabaseError> {
        let _gate = self.write_gate().await;
        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let created_at = parse_datetime(&stamp)?;
        let id = self.db().generate_id(PREFIX_TASK).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO tasks ({SELECT_COLS}, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                ),
                libsql::params![
                    id.as_str(),
                    owner_id,
                    new.title.as_str(),
                    new.description.as_deref(),
                    new.category.as_str(),
                    new.due_date.format(DATE_FORMAT).to_string(),
                    new.status.as_str(),
                    new.attachment_name.as_deref(),
                    new.attachment_type.as_deref(),
                    stamp.as_str(),
                    stamp.as_str()
                ],
            )
            .await?;

        tracing::debug!(owner_id, task_id = %id, "task created");
        self.publish(owner_id).await;
        Ok(new.into_task(id, owner_id.to_string(), created_at))
    }

    pub async fn get_task(&self, owner_id: &str, task_id: &str) -> Result<Task, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM tasks WHERE id = ?1 AND owner_id = ?2"),
                [task_id, owner_id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
            id: task_id.to_string(),
        })?;
        row_to_task(&row)
    }

    /// The owner's tasks ordered by creation time, insertion order on ties.
    pub async fn list_tasks(&self, owner_id: &str) -> Result<Vec<Task>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM tasks WHERE owner_id = ?1
                     ORDER BY created_at, rowid"
                ),
                [owner_id],
            )
            .await?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(row_to_task(&row)?);
        }
        Ok(tasks)
    }

    pub async fn update_task(
        &self,
        owner_id: &str,
        task_id: &str,
        update: TaskUpdate,
    ) -> Result<(), DatabaseError> {
        let _gate = self.write_gate().await;
        if update.is_empty() {
            self.get_task(owner_id, task_id).await?;
            return Ok(());
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        for (idx, (column, value)) in update.assignments().into_iter().enumerate() {
            sets.push(format!("{column} = ?{}", idx + 1));
            params.push(value);
        }
        let mut idx = params.len() + 1;
        sets.push(format!("updated_at = ?{idx}"));
        params.push(
            Utc::now()
                .to_rfc3339_opts(SecondsFormat::Micros, true)
                .into(),
        );
        idx += 1;
        params.push(task_id.into());
        params.push(owner_id.into());

        let sql = format!(
            "UPDATE tasks SET {} WHERE id = ?{idx} AND owner_id = ?{}",
            sets.join(", "),
            idx + 1
        );
        let changed = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                id: task_id.to_string(),
            });
        }

        tracing::debug!(owner_id, task_id, ?update, "task updated");
        self.publish(owner_id).await;
        Ok(())
    }

    pub async fn delete_task(&self, owner_id: &str, task_id: &str) -> Result<(), DatabaseError> {
        let _gate = self.write_gate().await;
        let changed = self
            .db()
            .conn()
            .execute(
                "DELETE FROM tasks WHERE id = ?1 AND owner_id = ?2",
                [task_id, owner_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                id: task_id.to_string(),
            });
        }

        tracing::debug!(owner_id, task_id, "task deleted");
        self.publish(owner_id).await;
        Ok(())
    }

    /// Push the owner's current tasks to their subscribers.
    ///
    /// Runs after the write has committed, so a failed re-read is logged and
    /// subscribers keep their previous snapshot.
    async fn publish(&self, owner_id: &str) {
        if !self.hub().has_subscribers(owner_id) {
            return;
        }
        match self.list_tasks(owner_id).await {
            Ok(tasks) => self.hub().publish(owner_id, tasks),
            Err(error) => {
                tracing::warn!(owner_id, %error, "write committed but snapshot re-read failed");
            }
        }
    }
}

#[async_trait]
impl TaskRepository for TaskService {
    async fn subscribe(&self, owner_id: &str) -> Result<Subscription, DatabaseError> {
        let _gate = self.write_gate().await;
        if self.hub().subscribed_owners().is_empty() {
            self.mark_seen_version().await?;
        }
        let current = self.list_tasks(owner_id).await?;
        Ok(self.hub().subscribe(owner_id, current))
    }

    async fn create(&self, owner_id: &str, task: NewTask) -> Result<String, DatabaseError> {
        Ok(self.create_task(owner_id, task).await?.id)
    }

    async fn update_field(
        &self,
        owner_id: &str,
        task_id: &str,
        field: TaskField,
    ) -> Result<(), DatabaseError> {
        self.update_task(owner_id, task_id, field.into()).await
    }

    async fn delete(&self, owner_id: &str, task_id: &str) -> Result<(), DatabaseError> {
        self.delete_task(owner_id, task_id).await
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<Task>, DatabaseError> {
        self.list_tasks(owner_id).await
    }

    async fn get(&self, owner_id: &str, task_id: &str) -> Result<Task, DatabaseError> {
        self.get_task(owner_id, task_id).await
    }

    fn subscriber_count(&self, owner_id: &str) -> usize {
        self.hub().subscriber_count(owner_id)
    }
}

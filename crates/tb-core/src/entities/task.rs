use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Category, TaskStatus};

/// A personal task owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub due_date: NaiveDate,
    #[schemars(with = "String")]
    pub status: TaskStatus,
    pub attachment_name: Option<String>,
    pub attachment_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated fields for a task about to be created.
///
/// The repository assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub due_date: NaiveDate,
    #[schemars(with = "String")]
    pub status: TaskStatus,
    pub attachment_name: Option<String>,
    pub attachment_type: Option<String>,
}

impl NewTask {
    /// Materialize the stored task once the repository has assigned identity.
    #[must_use]
    pub fn into_task(self, id: String, owner_id: String, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            owner_id,
            title: self.title,
            description: self.description,
            category: self.category,
            due_date: self.due_date,
            status: self.status,
            attachment_name: self.attachment_name,
            attachment_type: self.attachment_type,
            created_at,
        }
    }
}

/// A single-field update. `created_at` and `owner_id` are never updatable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum TaskField {
    Status(TaskStatus),
    Title(String),
    Description(Option<String>),
    Category(Category),
    DueDate(NaiveDate),
}

impl TaskField {
    /// Column name the field is stored under.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::Title(_) => "title",
            Self::Description(_) => "description",
            Self::Category(_) => "category",
            Self::DueDate(_) => "due_date",
        }
    }

    /// Apply the update to an in-memory task.
    pub fn apply_to(&self, task: &mut Task) {
        match self {
            Self::Status(status) => task.status = status.clone(),
            Self::Title(title) => task.title.clone_from(title),
            Self::Description(description) => task.description.clone_from(description),
            Self::Category(category) => task.category = *category,
            Self::DueDate(due_date) => task.due_date = *due_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Task {
        NewTask {
            title: "Write report".into(),
            description: None,
            category: Category::Work,
            due_date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            status: TaskStatus::ToDo,
            attachment_name: None,
            attachment_type: None,
        }
        .into_task("tsk-00000001".into(), "usr-00000001".into(), Utc::now())
    }

    #[test]
    fn status_field_update_applies() {
        let mut task = sample();
        TaskField::Status(TaskStatus::Completed).apply_to(&mut task);
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn field_serializes_as_tagged_pair() {
        let json = serde_json::to_value(TaskField::Status(TaskStatus::InProgress)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "field": "status", "value": "In Progress" })
        );
        assert_eq!(TaskField::DueDate(sample().due_date).name(), "due_date");
    }
}

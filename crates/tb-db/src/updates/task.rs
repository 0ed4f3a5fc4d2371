//! Task update builder.

use chrono::NaiveDate;
use serde::Serialize;
use tb_core::entities::TaskField;
use tb_core::enums::{Category, TaskStatus};

use crate::helpers::DATE_FORMAT;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }

    /// `(column, value)` pairs for every set field, in column order.
    #[must_use]
    pub fn assignments(&self) -> Vec<(&'static str, libsql::Value)> {
        let mut sets = Vec::new();
        if let Some(title) = &self.title {
            sets.push(("title", title.clone().into()));
        }
        if let Some(description) = &self.description {
            sets.push((
                "description",
                description.clone().map_or(libsql::Value::Null, Into::into),
            ));
        }
        if let Some(category) = self.category {
            sets.push(("category", category.as_str().into()));
        }
        if let Some(due_date) = self.due_date {
            sets.push(("due_date", due_date.format(DATE_FORMAT).to_string().into()));
        }
        if let Some(status) = &self.status {
            sets.push(("status", status.as_str().into()));
        }
        sets
    }
}

impl From<TaskField> for TaskUpdate {
    fn from(field: TaskField) -> Self {
        let builder = TaskUpdateBuilder::new();
        match field {
            TaskField::Status(status) => builder.status(status),
            TaskField::Title(title) => builder.title(title),
            TaskField::Description(description) => builder.description(description),
            TaskField::Category(category) => builder.category(category),
            TaskField::DueDate(due_date) => builder.due_date(due_date),
        }
        .build()
    }
}

#[derive(Debug, Default)]
pub struct TaskUpdateBuilder(TaskUpdate);

impl TaskUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TaskUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.0.category = Some(category);
        self
    }

    #[must_use]
    pub const fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.0.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn build(self) -> TaskUpdate {
        self.0
    }
}

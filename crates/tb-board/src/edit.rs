//! Editing the details of an existing task.
//!
//! [`TaskEdit`] carries only the fields the user changed. Values follow the
//! creation form's rules. Status changes go through the board.

use tb_auth::SessionContext;
use tb_core::entities::TaskField;
use tb_db::{DatabaseError, TaskRepository};
use thiserror::Error;

use crate::form::{
    FormErrors, check_category, check_description, check_due_date, check_title,
    normalize_description,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub title: Option<String>,
    /// A blank value clears the description.
    pub description: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error("nothing to change")]
    Empty,

    #[error("invalid task: {0}")]
    Invalid(#[from] FormErrors),

    #[error("failed to update {field}")]
    Repository {
        field: &'static str,
        #[source]
        source: DatabaseError,
    },
}

impl TaskEdit {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
    }

    /// Validate every given value and build one update per field.
    ///
    /// # Errors
    ///
    /// `EditError::Empty` when no field is given, or `EditError::Invalid`
    /// with all failing rules.
    pub fn fields(&self) -> Result<Vec<TaskField>, EditError> {
        if self.is_empty() {
            return Err(EditError::Empty);
        }

        let mut errors = FormErrors::default();
        let mut fields = Vec::new();
        if let Some(title) = self.title.as_deref().and_then(|raw| check_title(raw, &mut errors)) {
            fields.push(TaskField::Title(title));
        }
        if let Some(raw) = self.description.as_deref() {
            check_description(raw, &mut errors);
            fields.push(TaskField::Description(normalize_description(raw)));
        }
        if let Some(category) = self
            .category
            .as_deref()
            .and_then(|raw| check_category(raw, &mut errors))
        {
            fields.push(TaskField::Category(category));
        }
        if let Some(due_date) = self
            .due_date
            .as_deref()
            .and_then(|raw| check_due_date(raw, &mut errors))
        {
            fields.push(TaskField::DueDate(due_date));
        }

        if errors.is_empty() {
            Ok(fields)
        } else {
            Err(errors.into())
        }
    }

    /// Validate, then write each changed field of `task_id`.
    ///
    /// Fields are written in order and the first failure stops the edit;
    /// earlier fields stay written. Returns the number of fields written.
    ///
    /// # Errors
    ///
    /// Validation errors without touching the repository, or
    /// `EditError::Repository` naming the field that failed.
    pub async fn apply(
        &self,
        session: &SessionContext,
        task_id: &str,
        repository: &dyn TaskRepository,
    ) -> Result<usize, EditError> {
        let fields = self.fields()?;
        let owner_id = session.owner_id();
        for field in &fields {
            if let Err(source) = repository.update_field(owner_id, task_id, field.clone()).await {
                tracing::error!(
                    owner_id,
                    task_id,
                    field = field.name(),
                    %source,
                    "task edit failed"
                );
                return Err(EditError::Repository {
                    field: field.name(),
                    source,
                });
            }
        }
        tracing::debug!(owner_id, task_id, changed = fields.len(), "task edited");
        Ok(fields.len())
    }
}

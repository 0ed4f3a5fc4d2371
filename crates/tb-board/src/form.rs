//! Task creation form.
//!
//! [`TaskForm`] holds raw input. [`TaskForm::validate`] reports every failing
//! rule at once; [`TaskForm::submit`] only reaches the repository when
//! validation passes, and then issues exactly one create.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tb_auth::SessionContext;
use tb_core::entities::NewTask;
use tb_core::enums::{Category, TaskStatus};
use tb_db::{DatabaseError, TaskRepository};
use thiserror::Error;

/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 300;

/// Largest accepted attachment, in bytes (5 MiB).
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

/// Attachment content types the form accepts.
pub const ALLOWED_ATTACHMENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "application/pdf"];

/// Input format of the due date.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Metadata of a file picked for upload. Only name and type are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentInput {
    pub name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub due_date: String,
    pub status: String,
    pub attachment: Option<AttachmentInput>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Title,
    Description,
    Category,
    DueDate,
    Status,
    Attachment,
}

impl FormField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Category => "category",
            Self::DueDate => "due_date",
            Self::Status => "status",
            Self::Attachment => "attachment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

/// Every failing rule of one validation pass, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub(crate) fn push(&mut self, field: FormField, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Messages reported for `field`.
    #[must_use]
    pub fn messages(&self, field: FormField) -> Vec<&'static str> {
        self.errors
            .iter()
            .filter(|error| error.field == field)
            .map(|error| error.message)
            .collect()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field.as_str(), error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("invalid task: {0}")]
    Invalid(#[from] FormErrors),

    #[error("failed to create task: {0}")]
    Repository(#[from] DatabaseError),
}

/// What the dialog should do after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Dismiss { task_id: String },
}

// ---------------------------------------------------------------------------
// Validation and submission
// ---------------------------------------------------------------------------

impl TaskForm {
    /// Check every field and build the creation payload.
    ///
    /// # Errors
    ///
    /// Returns all failing rules together.
    pub fn validate(&self) -> Result<NewTask, FormErrors> {
        let mut errors = FormErrors::default();
        let title = check_title(&self.title, &mut errors);
        check_description(&self.description, &mut errors);
        let category = check_category(&self.category, &mut errors);
        let due_date = check_due_date(&self.due_date, &mut errors);

        let status = match self.status.trim() {
            "" => {
                errors.push(FormField::Status, "status required");
                None
            }
            raw => {
                let parsed = TaskStatus::parse_known(raw);
                if parsed.is_none() {
                    errors.push(FormField::Status, "invalid status");
                }
                parsed
            }
        };

        if let Some(attachment) = &self.attachment {
            if attachment.size_bytes > MAX_ATTACHMENT_BYTES {
                errors.push(FormField::Attachment, "file size exceeds 5MB");
            }
            if !ALLOWED_ATTACHMENT_TYPES.contains(&attachment.content_type.as_str()) {
                errors.push(FormField::Attachment, "unsupported file format");
            }
        }

        match (title, category, due_date, status) {
            (Some(title), Some(category), Some(due_date), Some(status)) if errors.is_empty() => {
                Ok(NewTask {
                    title,
                    description: normalize_description(&self.description),
                    category,
                    due_date,
                    status,
                    attachment_name: self.attachment.as_ref().map(|a| a.name.clone()),
                    attachment_type: self.attachment.as_ref().map(|a| a.content_type.clone()),
                })
            }
            _ => Err(errors),
        }
    }

    /// Validate, then create the task for the session's user.
    ///
    /// Does not wait for the live subscription; the new task reaches the
    /// board with the next snapshot.
    ///
    /// # Errors
    ///
    /// `SubmitError::Invalid` without touching the repository, or
    /// `SubmitError::Repository` if the create failed.
    pub async fn submit(
        &self,
        session: &SessionContext,
        repository: &dyn TaskRepository,
    ) -> Result<FormOutcome, SubmitError> {
        let task = self.validate()?;
        match repository.create(session.owner_id(), task).await {
            Ok(task_id) => {
                tracing::debug!(owner_id = session.owner_id(), %task_id, "task submitted");
                Ok(FormOutcome::Dismiss { task_id })
            }
            Err(error) => {
                tracing::error!(owner_id = session.owner_id(), %error, "task creation failed");
                Err(SubmitError::Repository(error))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Field rules shared with the edit path
// ---------------------------------------------------------------------------

pub(crate) fn check_title(raw: &str, errors: &mut FormErrors) -> Option<String> {
    let title = raw.trim();
    if title.is_empty() {
        errors.push(FormField::Title, "title required");
        return None;
    }
    Some(title.to_string())
}

pub(crate) fn check_description(raw: &str, errors: &mut FormErrors) {
    if raw.chars().count() > MAX_DESCRIPTION_CHARS {
        errors.push(
            FormField::Description,
            "description cannot exceed 300 characters",
        );
    }
}

/// Blank descriptions are stored as absent.
pub(crate) fn normalize_description(raw: &str) -> Option<String> {
    Some(raw.trim()).filter(|d| !d.is_empty()).map(str::to_string)
}

pub(crate) fn check_category(raw: &str, errors: &mut FormErrors) -> Option<Category> {
    match raw.trim() {
        "" => {
            errors.push(FormField::Category, "category required");
            None
        }
        raw => raw.parse::<Category>().map_or_else(
            |_| {
                errors.push(FormField::Category, "invalid category");
                None
            },
            Some,
        ),
    }
}

pub(crate) fn check_due_date(raw: &str, errors: &mut FormErrors) -> Option<NaiveDate> {
    match raw.trim() {
        "" => {
            errors.push(FormField::DueDate, "due date required");
            None
        }
        raw => NaiveDate::parse_from_str(raw, DUE_DATE_FORMAT).map_or_else(
            |_| {
                errors.push(FormField::DueDate, "invalid date");
                None
            },
            Some,
        ),
    }
}

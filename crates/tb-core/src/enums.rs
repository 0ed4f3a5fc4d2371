//! Status, category, and bucket enums for TaskBuddy.
//!
//! Task statuses are stored using their display names (`"ToDo"`,
//! `"In Progress"`, `"Completed"`). Stored data is not trusted to use only
//! those names, so [`TaskStatus`] keeps any other value verbatim in
//! [`TaskStatus::Other`] instead of failing to deserialize. The board uses
//! [`Bucket::for_status`] to route tasks and drops anything it cannot place.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Status of a task. Drives bucket placement on the board.
///
/// ```text
/// ToDo ⇄ In Progress ⇄ Completed   (any bucket to any bucket via drag-drop)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Completed,
    /// A stored value outside the three known statuses.
    Other(String),
}

impl TaskStatus {
    /// The three statuses a task may be created with or moved to.
    pub const KNOWN: [Self; 3] = [Self::ToDo, Self::InProgress, Self::Completed];

    /// Return the string representation used in storage.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ToDo => "ToDo",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Other(raw) => raw,
        }
    }

    /// Whether this is one of the three known statuses.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Parse one of the known statuses, ignoring ASCII case.
    ///
    /// Returns `None` for anything else (including the empty string).
    #[must_use]
    pub fn parse_known(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::KNOWN
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw))
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        Self::parse_known(&raw).unwrap_or(Self::Other(raw))
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Category tag of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Category {
    Work,
    Personal,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
        }
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        [Self::Work, Self::Personal]
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "category",
                value: raw.to_string(),
                expected: "Work, Personal",
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Bucket
// ---------------------------------------------------------------------------

/// One of the three columns of the task board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    Todo,
    InProgress,
    Completed,
}

impl Bucket {
    /// All buckets in board display order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Completed];

    /// Route a status to its bucket. Unknown statuses have no bucket.
    #[must_use]
    pub fn for_status(status: &TaskStatus) -> Option<Self> {
        match status {
            TaskStatus::ToDo => Some(Self::Todo),
            TaskStatus::InProgress => Some(Self::InProgress),
            TaskStatus::Completed => Some(Self::Completed),
            TaskStatus::Other(_) => None,
        }
    }

    /// The status a task must carry to live in this bucket.
    #[must_use]
    pub fn status(self) -> TaskStatus {
        match self {
            Self::Todo => TaskStatus::ToDo,
            Self::InProgress => TaskStatus::InProgress,
            Self::Completed => TaskStatus::Completed,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Column heading shown on the board.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::InProgress => "In-Progress",
            Self::Completed => "Completed",
        }
    }
}

impl FromStr for Bucket {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "bucket",
                value: raw.to_string(),
                expected: "todo, in-progress, completed",
            })
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(status_todo, TaskStatus, TaskStatus::ToDo, "ToDo");
    test_serde_roundtrip!(
        status_in_progress,
        TaskStatus,
        TaskStatus::InProgress,
        "In Progress"
    );
    test_serde_roundtrip!(
        status_completed,
        TaskStatus,
        TaskStatus::Completed,
        "Completed"
    );
    test_serde_roundtrip!(
        status_other,
        TaskStatus,
        TaskStatus::Other("Archived".into()),
        "Archived"
    );
    test_serde_roundtrip!(category_work, Category, Category::Work, "Work");
    test_serde_roundtrip!(category_personal, Category, Category::Personal, "Personal");
    test_serde_roundtrip!(bucket_todo, Bucket, Bucket::Todo, "todo");
    test_serde_roundtrip!(bucket_in_progress, Bucket, Bucket::InProgress, "in-progress");

    #[test]
    fn unknown_status_is_preserved_verbatim() {
        let status: TaskStatus = serde_json::from_str("\"Archived\"").unwrap();
        assert_eq!(status, TaskStatus::Other("Archived".into()));
        assert!(!status.is_known());
        assert_eq!(Bucket::for_status(&status), None);
    }

    #[test]
    fn parse_known_ignores_case_and_whitespace() {
        assert_eq!(TaskStatus::parse_known(" in progress "), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse_known("TODO"), Some(TaskStatus::ToDo));
        assert_eq!(TaskStatus::parse_known(""), None);
        assert_eq!(TaskStatus::parse_known("Archived"), None);
    }

    #[test]
    fn bucket_status_mapping_is_bijective() {
        for bucket in Bucket::ALL {
            assert_eq!(Bucket::for_status(&bucket.status()), Some(bucket));
        }
        for status in TaskStatus::KNOWN {
            let bucket = Bucket::for_status(&status).unwrap();
            assert_eq!(bucket.status(), status);
        }
    }

    #[test]
    fn bucket_parses_aliases() {
        assert_eq!("in_progress".parse::<Bucket>().unwrap(), Bucket::InProgress);
        assert_eq!("In Progress".parse::<Bucket>().unwrap(), Bucket::InProgress);
        assert_eq!("completed".parse::<Bucket>().unwrap(), Bucket::Completed);
        assert!("done".parse::<Bucket>().is_err());
    }

    #[test]
    fn category_rejects_unknown() {
        assert_eq!("work".parse::<Category>().unwrap(), Category::Work);
        let err = "Errands".parse::<Category>().unwrap_err();
        assert!(err.to_string().contains("Invalid category 'Errands'"));
    }
}

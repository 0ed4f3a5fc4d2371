//! Shared test utilities for tb-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use chrono::NaiveDate;
    use tb_core::entities::NewTask;
    use tb_core::enums::{Category, TaskStatus};

    use crate::TaskBuddyDb;
    use crate::service::TaskService;

    /// Create an in-memory `TaskService`.
    pub async fn test_service() -> TaskService {
        let db = TaskBuddyDb::open_local(":memory:").await.unwrap();
        TaskService::from_db(db)
    }

    /// A valid creation payload with a PDF attachment.
    pub fn new_task(title: &str, status: TaskStatus) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: Some("details".into()),
            category: Category::Work,
            due_date: NaiveDate::from_ymd_opt(2026, 11, 30).unwrap(),
            status,
            attachment_name: Some("brief.pdf".into()),
            attachment_type: Some("application/pdf".into()),
        }
    }
}

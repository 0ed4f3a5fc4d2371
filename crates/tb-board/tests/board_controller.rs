//! Board controller against live repositories.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use pretty_assertions::assert_eq;
use tb_auth::SessionContext;
use tb_board::{BoardController, BoardError, BoardUpdate, WriteOp};
use tb_core::entities::{NewTask, Task, TaskField};
use tb_core::enums::{Bucket, Category, TaskStatus};
use tb_core::identity::UserIdentity;
use tb_db::{InMemoryTaskRepository, RepositoryCall, TaskRepository, TaskService};

const OWNER: &str = "usr-0000ada0";

fn session() -> SessionContext {
    SessionContext::begin(UserIdentity {
        user_id: OWNER.into(),
        display_name: "Ada".into(),
        photo_url: None,
    })
}

fn payload(title: &str, status: TaskStatus) -> NewTask {
    NewTask {
        title: title.into(),
        description: None,
        category: Category::Work,
        due_date: NaiveDate::from_ymd_opt(2026, 11, 15).unwrap(),
        status,
        attachment_name: None,
        attachment_type: None,
    }
}

fn titles(controller: &BoardController, bucket: Bucket) -> Vec<String> {
    controller
        .board()
        .bucket(bucket)
        .iter()
        .map(|t| t.title.clone())
        .collect()
}

/// Repository holding `todo=[A, B]`, plus the ids of A and B.
async fn repo_with_a_and_b() -> (Arc<InMemoryTaskRepository>, String, String) {
    let repo = Arc::new(InMemoryTaskRepository::new());
    let a = repo.create(OWNER, payload("A", TaskStatus::ToDo)).await.unwrap();
    let b = repo.create(OWNER, payload("B", TaskStatus::ToDo)).await.unwrap();
    (repo, a, b)
}

async fn open(repo: &Arc<InMemoryTaskRepository>) -> BoardController {
    let session = session();
    let repository: Arc<dyn TaskRepository> = repo.clone();
    let mut controller = BoardController::open(Some(&session), repository)
        .await
        .unwrap();
    controller.ready().await.unwrap();
    controller
}

fn update_calls(repo: &InMemoryTaskRepository) -> Vec<RepositoryCall> {
    repo.calls()
        .into_iter()
        .filter(|call| !matches!(call, RepositoryCall::Create { .. }))
        .collect()
}

#[tokio::test]
async fn no_session_never_subscribes() {
    let repo = Arc::new(InMemoryTaskRepository::new());
    let repository: Arc<dyn TaskRepository> = repo.clone();
    let result = BoardController::open(None, repository).await;
    assert!(matches!(result, Err(BoardError::Unauthenticated)));
    assert_eq!(repo.subscriber_count(OWNER), 0);
}

#[tokio::test]
async fn first_snapshot_fills_the_board() {
    let (repo, _, _) = repo_with_a_and_b().await;
    repo.seed([Task {
        id: "tsk-0000dead".into(),
        owner_id: OWNER.into(),
        title: "Old".into(),
        description: None,
        category: Category::Personal,
        due_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        status: TaskStatus::Other("Archived".into()),
        attachment_name: None,
        attachment_type: None,
        created_at: Utc::now(),
    }]);

    let controller = open(&repo).await;
    assert_eq!(titles(&controller, Bucket::Todo), vec!["A", "B"]);
    assert_eq!(controller.board().len(), 2);
    assert_eq!(controller.board().locate("tsk-0000dead"), None);
    assert!(controller.revision() >= 1);
}

#[tokio::test]
async fn move_is_optimistic_and_writes_once() {
    let (repo, a, _) = repo_with_a_and_b().await;
    let mut controller = open(&repo).await;

    assert!(controller.move_task(&a, Bucket::Todo, Bucket::InProgress));
    assert_eq!(titles(&controller, Bucket::Todo), vec!["B"]);
    assert_eq!(titles(&controller, Bucket::InProgress), vec!["A"]);

    let outcomes = controller.settle_writes().await;
    assert!(matches!(
        outcomes.as_slice(),
        [BoardUpdate::WriteSettled { op: WriteOp::UpdateStatus(TaskStatus::InProgress), .. }]
    ));
    assert_eq!(
        update_calls(&repo),
        vec![RepositoryCall::UpdateField {
            owner_id: OWNER.into(),
            task_id: a.clone(),
            field: TaskField::Status(TaskStatus::InProgress),
        }]
    );
    assert_eq!(repo.get(OWNER, &a).await.unwrap().status, TaskStatus::InProgress);
}

#[tokio::test]
async fn stale_move_issues_no_write() {
    let (repo, a, _) = repo_with_a_and_b().await;
    let mut controller = open(&repo).await;

    assert!(!controller.move_task(&a, Bucket::Completed, Bucket::InProgress));
    assert_eq!(controller.in_flight(), 0);
    assert!(update_calls(&repo).is_empty());
    assert_eq!(titles(&controller, Bucket::Todo), vec!["A", "B"]);
}

#[tokio::test]
async fn checkbox_completes_task() {
    let repo = Arc::new(InMemoryTaskRepository::new());
    let t1 = repo.create(OWNER, payload("T1", TaskStatus::ToDo)).await.unwrap();
    let mut controller = open(&repo).await;

    assert!(controller.complete_task(&t1, Bucket::Todo));
    assert_eq!(titles(&controller, Bucket::Completed), vec!["T1"]);
    controller.settle_writes().await;

    assert_eq!(
        update_calls(&repo),
        vec![RepositoryCall::UpdateField {
            owner_id: OWNER.into(),
            task_id: t1,
            field: TaskField::Status(TaskStatus::Completed),
        }]
    );
}

#[tokio::test]
async fn delete_removes_locally_and_in_repository() {
    let (repo, a, _) = repo_with_a_and_b().await;
    let mut controller = open(&repo).await;

    assert!(controller.delete_task(&a, Bucket::Todo));
    assert_eq!(titles(&controller, Bucket::Todo), vec!["B"]);
    let outcomes = controller.settle_writes().await;
    assert!(matches!(
        outcomes.as_slice(),
        [BoardUpdate::WriteSettled { op: WriteOp::Delete, .. }]
    ));
    assert_eq!(repo.list(OWNER).await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_write_keeps_local_state_until_next_snapshot() {
    let (repo, a, _) = repo_with_a_and_b().await;
    let mut controller = open(&repo).await;

    repo.fail_next_write("network down");
    controller.move_task(&a, Bucket::Todo, Bucket::Completed);
    let outcomes = controller.settle_writes().await;
    assert!(matches!(
        outcomes.as_slice(),
        [BoardUpdate::WriteFailed { task_id, .. }] if *task_id == a
    ));
    assert_eq!(titles(&controller, Bucket::Completed), vec!["A"]);

    repo.create(OWNER, payload("C", TaskStatus::ToDo)).await.unwrap();
    assert!(matches!(
        controller.next_event().await,
        BoardUpdate::Snapshot { .. }
    ));
    assert_eq!(titles(&controller, Bucket::Todo), vec!["A", "B", "C"]);
    assert!(controller.board().bucket(Bucket::Completed).is_empty());
}

#[tokio::test]
async fn close_releases_subscription_once() {
    let (repo, _, _) = repo_with_a_and_b().await;
    let controller = open(&repo).await;
    assert_eq!(repo.subscriber_count(OWNER), 1);
    controller.close();
    assert_eq!(repo.subscriber_count(OWNER), 0);
}

#[tokio::test]
async fn dropping_controller_releases_subscription() {
    let (repo, _, _) = repo_with_a_and_b().await;
    let controller = open(&repo).await;
    drop(controller);
    assert_eq!(repo.subscriber_count(OWNER), 0);
}

#[tokio::test]
async fn closed_source_is_reported() {
    let (repo, _, _) = repo_with_a_and_b().await;
    let mut controller = open(&repo).await;
    repo.close_subscriptions();

    assert!(matches!(
        controller.next_event().await,
        BoardUpdate::SubscriptionClosed
    ));
    assert!(!controller.is_live());
    assert!(matches!(
        controller.next_event().await,
        BoardUpdate::SubscriptionClosed
    ));
}

#[tokio::test]
async fn works_against_libsql_service() {
    let service = Arc::new(TaskService::new_local(":memory:").await.unwrap());
    let a = service
        .create(OWNER, payload("A", TaskStatus::ToDo))
        .await
        .unwrap();
    let session = session();
    let repository: Arc<dyn TaskRepository> = service.clone();
    let mut controller = BoardController::open(Some(&session), repository)
        .await
        .unwrap();
    controller.ready().await.unwrap();

    controller.move_task(&a, Bucket::Todo, Bucket::InProgress);
    controller.settle_writes().await;
    assert_eq!(
        service.get(OWNER, &a).await.unwrap().status,
        TaskStatus::InProgress
    );

    let revision = controller.revision();
    service
        .update_field(OWNER, &a, TaskField::Status(TaskStatus::Completed))
        .await
        .unwrap();
    loop {
        if let BoardUpdate::Snapshot { revision: r } = controller.next_event().await {
            if controller.board().locate(&a) == Some(Bucket::Completed) {
                assert!(r > revision);
                break;
            }
        }
    }
    controller.close();
    assert_eq!(service.subscriber_count(OWNER), 0);
}

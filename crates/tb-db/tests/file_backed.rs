//! `TaskService` over a database file: persistence across reopen and live
//! snapshots observed through the repository trait.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tb_core::entities::{NewTask, TaskField};
use tb_core::enums::{Category, TaskStatus};
use tb_db::{TaskRepository, TaskService};
use tokio_stream::StreamExt;

const OWNER: &str = "usr-00c0ffee";

fn payload(title: &str, status: TaskStatus) -> NewTask {
    NewTask {
        title: title.into(),
        description: None,
        category: Category::Personal,
        due_date: NaiveDate::from_ymd_opt(2026, 12, 24).unwrap(),
        status,
        attachment_name: None,
        attachment_type: None,
    }
}

#[tokio::test]
async fn tasks_survive_reopen() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("taskbuddy.db");
    let path = path.to_str().unwrap();

    let id = {
        let svc = TaskService::new_local(path).await.unwrap();
        svc.create(OWNER, payload("Wrap presents", TaskStatus::ToDo))
            .await
            .unwrap()
    };

    let svc = TaskService::new_local(path).await.unwrap();
    let task = svc.get(OWNER, &id).await.unwrap();
    assert_eq!(task.title, "Wrap presents");
    assert_eq!(task.category, Category::Personal);
}

#[rstest]
#[case(TaskStatus::ToDo)]
#[case(TaskStatus::InProgress)]
#[case(TaskStatus::Completed)]
#[tokio::test]
async fn status_updates_are_stored(#[case] status: TaskStatus) {
    let svc = TaskService::new_local(":memory:").await.unwrap();
    let id = svc
        .create(OWNER, payload("Move me", TaskStatus::ToDo))
        .await
        .unwrap();
    svc.update_field(OWNER, &id, TaskField::Status(status.clone()))
        .await
        .unwrap();
    assert_eq!(svc.get(OWNER, &id).await.unwrap().status, status);
}

#[tokio::test]
async fn concurrent_writers_end_on_latest_state() {
    let svc: Arc<dyn TaskRepository> = Arc::new(TaskService::new_local(":memory:").await.unwrap());
    let mut stream = svc.subscribe(OWNER).await.unwrap().into_stream();

    let mut handles = Vec::new();
    for n in 0..5 {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(async move {
            svc.create(OWNER, payload(&format!("Task {n}"), TaskStatus::ToDo))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let mut latest = stream.next().await.unwrap();
    while latest.tasks.len() < 5 {
        latest = stream.next().await.unwrap();
    }
    assert_eq!(latest.tasks.len(), svc.list(OWNER).await.unwrap().len());
}

async fn shared_file() -> (tempfile::TempDir, TaskService, TaskService) {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("taskbuddy.db");
    let path = path.to_str().unwrap().to_string();
    let watcher = TaskService::new_local(&path).await.unwrap();
    let writer = TaskService::new_local(&path).await.unwrap();
    (tmp, watcher, writer)
}

#[tokio::test]
async fn writes_from_another_connection_reach_subscribers() {
    let (_tmp, watcher, writer) = shared_file().await;
    let mut sub = watcher.subscribe(OWNER).await.unwrap();
    assert!(sub.next().await.unwrap().tasks.is_empty());

    assert!(!watcher.sync_external_writes().await.unwrap());
    let id = writer
        .create(OWNER, payload("From elsewhere", TaskStatus::ToDo))
        .await
        .unwrap();
    assert!(watcher.sync_external_writes().await.unwrap());

    let snapshot = sub.next().await.unwrap();
    assert_eq!(snapshot.revision, 2);
    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.tasks[0].id, id);
}

#[tokio::test]
async fn own_writes_and_other_owners_do_not_republish() {
    let (_tmp, watcher, writer) = shared_file().await;
    let mut sub = watcher.subscribe(OWNER).await.unwrap();
    sub.next().await.unwrap();

    watcher
        .create(OWNER, payload("Local", TaskStatus::ToDo))
        .await
        .unwrap();
    assert_eq!(sub.next().await.unwrap().revision, 2);
    assert!(!watcher.sync_external_writes().await.unwrap());

    writer
        .create("usr-someone-else", payload("Not yours", TaskStatus::ToDo))
        .await
        .unwrap();
    assert!(!watcher.sync_external_writes().await.unwrap());
    assert_eq!(watcher.list(OWNER).await.unwrap().len(), 1);
}

#[tokio::test]
async fn follow_external_writes_delivers_without_manual_sync() {
    let (_tmp, watcher, writer) = shared_file().await;
    let mut sub = watcher.subscribe(OWNER).await.unwrap();
    sub.next().await.unwrap();

    let observed = async {
        writer
            .create(OWNER, payload("Polled in", TaskStatus::InProgress))
            .await
            .unwrap();
        sub.next().await.unwrap()
    };
    let snapshot = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::select! {
            () = watcher.follow_external_writes(Duration::from_millis(10)) => {
                panic!("polling stopped")
            }
            snapshot = observed => snapshot,
        }
    })
    .await
    .expect("external write should be published");

    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.tasks[0].status, TaskStatus::InProgress);
}

//! Board controller: the reducer wired to a live task repository.
//!
//! One controller serves one board. Snapshots and local gestures both go
//! through [`reduce`]; `&mut self` serializes them, so the board needs no
//! lock. Repository writes run on spawned tasks and report back through a
//! channel, so a slow write never holds up snapshot delivery.

use std::fmt;
use std::sync::Arc;

use tb_auth::SessionContext;
use tb_core::entities::TaskField;
use tb_core::enums::{Bucket, TaskStatus};
use tb_db::{DatabaseError, Subscription, TaskRepository, TaskSnapshot};
use tokio::sync::mpsc;

use crate::board::{Board, BoardEvent, Effect, reduce};
use crate::error::BoardError;
use crate::guard::{Navigation, Route, guard};

/// Repository write issued for a gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    UpdateStatus(TaskStatus),
    Delete,
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpdateStatus(status) => write!(f, "set status to {status}"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// What changed after [`BoardController::next_event`].
#[derive(Debug)]
pub enum BoardUpdate {
    /// A snapshot was applied; the board now matches the repository.
    Snapshot { revision: u64 },
    WriteSettled { task_id: String, op: WriteOp },
    /// A write failed. The board keeps its optimistic state until the next
    /// snapshot.
    WriteFailed {
        task_id: String,
        op: WriteOp,
        error: DatabaseError,
    },
    /// The live subscription ended. No more snapshots will arrive.
    SubscriptionClosed,
}

struct WriteOutcome {
    task_id: String,
    op: WriteOp,
    result: Result<(), DatabaseError>,
}

enum Next {
    Outcome(Option<WriteOutcome>),
    Snapshot(Option<TaskSnapshot>),
}

pub struct BoardController {
    owner_id: String,
    repository: Arc<dyn TaskRepository>,
    subscription: Option<Subscription>,
    board: Board,
    revision: u64,
    in_flight: usize,
    outcomes_tx: mpsc::UnboundedSender<WriteOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<WriteOutcome>,
}

impl BoardController {
    /// Open the board for the signed-in user.
    ///
    /// The board starts empty; the first snapshot arrives via
    /// [`Self::next_event`].
    ///
    /// # Errors
    ///
    /// `BoardError::Unauthenticated` without a session (nothing is
    /// subscribed), or `BoardError::Repository` if subscribing fails.
    pub async fn open(
        session: Option<&SessionContext>,
        repository: Arc<dyn TaskRepository>,
    ) -> Result<Self, BoardError> {
        let navigation = guard(Route::Dashboard, session.map(SessionContext::identity));
        let (Navigation::Render(_), Some(session)) = (navigation, session) else {
            return Err(BoardError::Unauthenticated);
        };
        let owner_id = session.owner_id().to_string();
        let subscription = repository.subscribe(&owner_id).await?;
        tracing::debug!(%owner_id, "board opened");

        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Ok(Self {
            owner_id,
            repository,
            subscription: Some(subscription),
            board: Board::new(),
            revision: 0,
            in_flight: 0,
            outcomes_tx,
            outcomes_rx,
        })
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Revision of the last applied snapshot, 0 before the first.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Writes dispatched but not yet reported.
    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Whether the live subscription is still open.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.subscription.is_some()
    }

    /// Wait for the next snapshot or write outcome, whichever comes first.
    pub async fn next_event(&mut self) -> BoardUpdate {
        let next = match self.subscription.as_mut() {
            Some(subscription) => tokio::select! {
                biased;
                outcome = self.outcomes_rx.recv(), if self.in_flight > 0 => Next::Outcome(outcome),
                snapshot = subscription.next() => Next::Snapshot(snapshot),
            },
            None if self.in_flight > 0 => Next::Outcome(self.outcomes_rx.recv().await),
            None => return BoardUpdate::SubscriptionClosed,
        };

        match next {
            Next::Outcome(Some(outcome)) => self.settle(outcome),
            Next::Snapshot(Some(snapshot)) => self.apply_snapshot(snapshot),
            Next::Outcome(None) | Next::Snapshot(None) => {
                tracing::debug!(owner_id = %self.owner_id, "task subscription closed");
                self.subscription = None;
                BoardUpdate::SubscriptionClosed
            }
        }
    }

    /// Wait until the first snapshot has been applied.
    ///
    /// Write outcomes arriving meanwhile are discarded.
    ///
    /// # Errors
    ///
    /// `BoardError::SubscriptionClosed` if the subscription ends first.
    pub async fn ready(&mut self) -> Result<u64, BoardError> {
        loop {
            match self.next_event().await {
                BoardUpdate::Snapshot { revision } => return Ok(revision),
                BoardUpdate::SubscriptionClosed => return Err(BoardError::SubscriptionClosed),
                BoardUpdate::WriteSettled { .. } | BoardUpdate::WriteFailed { .. } => {}
            }
        }
    }

    /// Wait for every in-flight write to report.
    ///
    /// Snapshots arriving meanwhile are applied as usual.
    pub async fn settle_writes(&mut self) -> Vec<BoardUpdate> {
        let mut outcomes = Vec::new();
        while self.in_flight > 0 {
            match self.next_event().await {
                BoardUpdate::Snapshot { .. } | BoardUpdate::SubscriptionClosed => {}
                update => outcomes.push(update),
            }
        }
        outcomes
    }

    /// Drag-drop `task_id` from `from` to `to`. Returns whether anything moved.
    pub fn move_task(&mut self, task_id: &str, from: Bucket, to: Bucket) -> bool {
        self.dispatch(BoardEvent::Move {
            task_id: task_id.to_string(),
            from,
            to,
        })
    }

    /// Tick the completion checkbox of a task sitting in `from`.
    pub fn complete_task(&mut self, task_id: &str, from: Bucket) -> bool {
        self.dispatch(BoardEvent::Complete {
            task_id: task_id.to_string(),
            from,
        })
    }

    pub fn delete_task(&mut self, task_id: &str, bucket: Bucket) -> bool {
        self.dispatch(BoardEvent::Delete {
            task_id: task_id.to_string(),
            bucket,
        })
    }

    /// Release the live subscription.
    pub fn close(mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        tracing::debug!(owner_id = %self.owner_id, "board closed");
    }

    fn apply_snapshot(&mut self, snapshot: TaskSnapshot) -> BoardUpdate {
        let received = snapshot.tasks.len();
        self.board = reduce(&self.board, BoardEvent::Snapshot(snapshot.tasks)).board;
        self.revision = snapshot.revision;
        tracing::debug!(
            owner_id = %self.owner_id,
            revision = snapshot.revision,
            received,
            shown = self.board.len(),
            "snapshot applied"
        );
        BoardUpdate::Snapshot {
            revision: snapshot.revision,
        }
    }

    fn dispatch(&mut self, event: BoardEvent) -> bool {
        let reduction = reduce(&self.board, event);
        self.board = reduction.board;
        let applied = !reduction.effects.is_empty();
        for effect in reduction.effects {
            self.spawn_write(effect);
        }
        applied
    }

    fn spawn_write(&mut self, effect: Effect) {
        let repository = Arc::clone(&self.repository);
        let owner_id = self.owner_id.clone();
        let outcomes = self.outcomes_tx.clone();
        self.in_flight += 1;
        tracing::debug!(%owner_id, task_id = effect.task_id(), "dispatching write");

        tokio::spawn(async move {
            let (task_id, op, result) = match effect {
                Effect::UpdateStatus { task_id, status } => {
                    let result = repository
                        .update_field(&owner_id, &task_id, TaskField::Status(status.clone()))
                        .await;
                    (task_id, WriteOp::UpdateStatus(status), result)
                }
                Effect::Delete { task_id } => {
                    let result = repository.delete(&owner_id, &task_id).await;
                    (task_id, WriteOp::Delete, result)
                }
            };
            let _ = outcomes.send(WriteOutcome {
                task_id,
                op,
                result,
            });
        });
    }

    fn settle(&mut self, outcome: WriteOutcome) -> BoardUpdate {
        self.in_flight = self.in_flight.saturating_sub(1);
        let WriteOutcome {
            task_id,
            op,
            result,
        } = outcome;
        match result {
            Ok(()) => BoardUpdate::WriteSettled { task_id, op },
            Err(error) => {
                tracing::warn!(
                    owner_id = %self.owner_id,
                    %task_id,
                    %op,
                    %error,
                    "task write failed, board shows local state until the next snapshot"
                );
                BoardUpdate::WriteFailed { task_id, op, error }
            }
        }
    }
}

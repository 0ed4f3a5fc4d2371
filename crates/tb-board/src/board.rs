//! The three-column task board and its reducer.
//!
//! Board state only changes through [`reduce`], which is pure: given the same
//! board and event it returns the same board and effects. Snapshots rebuild
//! the board from scratch, so applying one twice, out of order, or after any
//! number of local gestures always lands on the partition derived from the
//! repository. Local gestures update the board immediately and describe the
//! repository write they need as an [`Effect`].

use tb_core::entities::Task;
use tb_core::enums::{Bucket, TaskStatus};
use tb_core::responses::BoardColumn;

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Partition of the known tasks into three ordered buckets.
///
/// Every task appears in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    buckets: [Vec<Task>; 3],
}

const fn slot(bucket: Bucket) -> usize {
    match bucket {
        Bucket::Todo => 0,
        Bucket::InProgress => 1,
        Bucket::Completed => 2,
    }
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the partition for a full snapshot, keeping snapshot order within
    /// each bucket. Tasks with an unrecognized status are left out.
    #[must_use]
    pub fn from_snapshot(tasks: Vec<Task>) -> Self {
        let mut board = Self::new();
        for task in tasks {
            match Bucket::for_status(&task.status) {
                Some(bucket) => board.buckets[slot(bucket)].push(task),
                None => tracing::warn!(
                    task_id = %task.id,
                    status = %task.status,
                    "dropping task with unrecognized status"
                ),
            }
        }
        board
    }

    /// Tasks in `bucket`, in display order.
    #[must_use]
    pub fn bucket(&self, bucket: Bucket) -> &[Task] {
        &self.buckets[slot(bucket)]
    }

    #[must_use]
    pub fn count(&self, bucket: Bucket) -> usize {
        self.bucket(bucket).len()
    }

    /// Total number of displayed tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Which bucket holds `task_id`, if any.
    #[must_use]
    pub fn locate(&self, task_id: &str) -> Option<Bucket> {
        Bucket::ALL
            .into_iter()
            .find(|bucket| self.position(*bucket, task_id).is_some())
    }

    #[must_use]
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.buckets.iter().flatten().find(|task| task.id == task_id)
    }

    /// Columns in display order, for rendering.
    #[must_use]
    pub fn columns(&self) -> Vec<BoardColumn> {
        Bucket::ALL
            .into_iter()
            .map(|bucket| BoardColumn {
                bucket,
                title: bucket.title().to_string(),
                count: self.count(bucket),
                tasks: self.bucket(bucket).to_vec(),
            })
            .collect()
    }

    fn position(&self, bucket: Bucket, task_id: &str) -> Option<usize> {
        self.bucket(bucket).iter().position(|task| task.id == task_id)
    }

    fn take(&mut self, bucket: Bucket, task_id: &str) -> Option<Task> {
        let index = self.position(bucket, task_id)?;
        Some(self.buckets[slot(bucket)].remove(index))
    }
}

// ---------------------------------------------------------------------------
// Reducer
// ---------------------------------------------------------------------------

/// Input to the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// Full replacement from the live subscription.
    Snapshot(Vec<Task>),
    /// Drag-drop of a task between buckets.
    Move {
        task_id: String,
        from: Bucket,
        to: Bucket,
    },
    /// Checkbox completion, same as a move to `Completed`.
    Complete { task_id: String, from: Bucket },
    Delete { task_id: String, bucket: Bucket },
}

/// Repository write requested by a local gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    UpdateStatus { task_id: String, status: TaskStatus },
    Delete { task_id: String },
}

impl Effect {
    #[must_use]
    pub fn task_id(&self) -> &str {
        match self {
            Self::UpdateStatus { task_id, .. } | Self::Delete { task_id } => task_id,
        }
    }
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    pub board: Board,
    pub effects: Vec<Effect>,
}

impl Reduction {
    fn unchanged(board: &Board) -> Self {
        Self {
            board: board.clone(),
            effects: Vec::new(),
        }
    }
}

/// Apply `event` to `board`.
#[must_use]
pub fn reduce(board: &Board, event: BoardEvent) -> Reduction {
    match event {
        BoardEvent::Snapshot(tasks) => Reduction {
            board: Board::from_snapshot(tasks),
            effects: Vec::new(),
        },
        BoardEvent::Move { task_id, from, to } => move_task(board, &task_id, from, to),
        BoardEvent::Complete { task_id, from } => {
            move_task(board, &task_id, from, Bucket::Completed)
        }
        BoardEvent::Delete { task_id, bucket } => delete_task(board, &task_id, bucket),
    }
}

fn move_task(board: &Board, task_id: &str, from: Bucket, to: Bucket) -> Reduction {
    if from == to {
        return Reduction::unchanged(board);
    }
    let mut next = board.clone();
    let Some(mut task) = next.take(from, task_id) else {
        tracing::debug!(task_id, %from, "move ignored, task not in source bucket");
        return Reduction::unchanged(board);
    };
    let status = to.status();
    task.status = status.clone();
    next.buckets[slot(to)].push(task);
    Reduction {
        board: next,
        effects: vec![Effect::UpdateStatus {
            task_id: task_id.to_string(),
            status,
        }],
    }
}

fn delete_task(board: &Board, task_id: &str, bucket: Bucket) -> Reduction {
    let mut next = board.clone();
    if next.take(bucket, task_id).is_none() {
        tracing::debug!(task_id, %bucket, "delete ignored, task not in bucket");
        return Reduction::unchanged(board);
    }
    Reduction {
        board: next,
        effects: vec![Effect::Delete {
            task_id: task_id.to_string(),
        }],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

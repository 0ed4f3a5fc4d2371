//! Live snapshot subscriptions.
//!
//! Each owner with at least one subscriber has a `watch` channel holding the
//! latest full snapshot of their tasks. A [`Subscription`] sees the current
//! snapshot first and then every later one; intermediate snapshots may be
//! skipped when the reader falls behind, which is fine because each one is a
//! full replacement.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tb_core::entities::Task;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Full state of one owner's task collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSnapshot {
    pub owner_id: String,
    /// Increases by one with every published snapshot for this feed.
    pub revision: u64,
    /// Tasks in creation order.
    pub tasks: Vec<Task>,
}

/// Subscriber table shared by the repository implementations.
#[derive(Debug, Default)]
pub(crate) struct SnapshotHub {
    feeds: Mutex<HashMap<String, watch::Sender<TaskSnapshot>>>,
}

impl SnapshotHub {
    fn feeds(&self) -> MutexGuard<'_, HashMap<String, watch::Sender<TaskSnapshot>>> {
        self.feeds.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a subscription. `current` seeds the feed if nobody else listens.
    pub(crate) fn subscribe(&self, owner_id: &str, current: Vec<Task>) -> Subscription {
        let mut feeds = self.feeds();
        let receiver = match feeds.get(owner_id) {
            Some(sender) if sender.receiver_count() > 0 => sender.subscribe(),
            _ => {
                let (sender, receiver) = watch::channel(TaskSnapshot {
                    owner_id: owner_id.to_string(),
                    revision: 1,
                    tasks: current,
                });
                feeds.insert(owner_id.to_string(), sender);
                receiver
            }
        };
        drop(feeds);
        tracing::debug!(owner_id, "subscription opened");
        Subscription {
            owner_id: owner_id.to_string(),
            receiver,
            delivered_initial: false,
            released: false,
        }
    }

    pub(crate) fn has_subscribers(&self, owner_id: &str) -> bool {
        self.subscriber_count(owner_id) > 0
    }

    /// Replace the owner's snapshot and wake every subscriber.
    pub(crate) fn publish(&self, owner_id: &str, tasks: Vec<Task>) {
        let mut feeds = self.feeds();
        let Some(sender) = feeds.get(owner_id) else {
            return;
        };
        if sender.receiver_count() == 0 {
            feeds.remove(owner_id);
            return;
        }
        sender.send_modify(|snapshot| {
            snapshot.revision += 1;
            snapshot.tasks = tasks;
        });
        tracing::debug!(
            owner_id,
            revision = sender.borrow().revision,
            "snapshot published"
        );
    }

    /// Like [`Self::publish`], but leaves the feed alone when `tasks` equals
    /// the current snapshot. Returns whether subscribers were woken.
    pub(crate) fn publish_if_changed(&self, owner_id: &str, tasks: Vec<Task>) -> bool {
        let feeds = self.feeds();
        let Some(sender) = feeds.get(owner_id) else {
            return false;
        };
        let changed = sender.send_if_modified(|snapshot| {
            if snapshot.tasks == tasks {
                return false;
            }
            snapshot.revision += 1;
            snapshot.tasks = tasks;
            true
        });
        if changed {
            tracing::debug!(
                owner_id,
                revision = sender.borrow().revision,
                "snapshot published after external write"
            );
        }
        changed
    }

    /// Owners with at least one open subscription.
    pub(crate) fn subscribed_owners(&self) -> Vec<String> {
        self.feeds()
            .iter()
            .filter(|(_, sender)| sender.receiver_count() > 0)
            .map(|(owner_id, _)| owner_id.clone())
            .collect()
    }

    pub(crate) fn subscriber_count(&self, owner_id: &str) -> usize {
        self.feeds()
            .get(owner_id)
            .map_or(0, watch::Sender::receiver_count)
    }

    /// End every subscription of `owner_id`, or of every owner when `None`.
    pub(crate) fn close(&self, owner_id: Option<&str>) {
        let mut feeds = self.feeds();
        match owner_id {
            Some(owner_id) => {
                feeds.remove(owner_id);
            }
            None => feeds.clear(),
        }
    }
}

/// Cancellable live sequence of full snapshots for one owner.
///
/// Released exactly once: by [`Subscription::unsubscribe`], which consumes
/// it, or on drop.
#[derive(Debug)]
pub struct Subscription {
    owner_id: String,
    receiver: watch::Receiver<TaskSnapshot>,
    delivered_initial: bool,
    released: bool,
}

impl Subscription {
    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Wait for the next snapshot. The current one is returned first.
    ///
    /// Returns `None` once the source has closed.
    pub async fn next(&mut self) -> Option<TaskSnapshot> {
        if !self.delivered_initial {
            self.delivered_initial = true;
            return Some(self.receiver.borrow_and_update().clone());
        }
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Release the subscription.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Convert into a stream of snapshots, current one first.
    ///
    /// Dropping the stream releases the subscription.
    #[must_use]
    pub fn into_stream(mut self) -> WatchStream<TaskSnapshot> {
        self.released = true;
        WatchStream::new(self.receiver.clone())
    }

    fn release(&mut self) {
        if std::mem::replace(&mut self.released, true) {
            return;
        }
        tracing::debug!(owner_id = %self.owner_id, "subscription released");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

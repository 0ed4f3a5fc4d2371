//! libSQL-backed task repository.
//!
//! `TaskService` wraps `TaskBuddyDb` and the subscriber table. Repo methods
//! are implemented as `impl TaskService` blocks under `repos/`.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::MissedTickBehavior;

use crate::TaskBuddyDb;
use crate::error::DatabaseError;
use crate::subscription::SnapshotHub;

/// Task storage with live snapshots.
///
/// Every mutation follows this protocol:
/// 1. Take the write gate
/// 2. Execute SQL
/// 3. Re-read the owner's tasks and publish them, if anyone is subscribed
/// 4. Release the gate
///
/// The gate keeps published snapshots in mutation order.
///
/// Writes from other connections (another `taskbuddy` process) are not seen
/// by the protocol above. [`TaskService::follow_external_writes`] picks them
/// up by polling `PRAGMA data_version`.
pub struct TaskService {
    db: TaskBuddyDb,
    hub: SnapshotHub,
    write_gate: Mutex<()>,
    seen_version: AtomicI64,
}

impl TaskService {
    /// Create a service over a local database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = TaskBuddyDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `TaskBuddyDb`.
    #[must_use]
    pub fn from_db(db: TaskBuddyDb) -> Self {
        Self {
            db,
            hub: SnapshotHub::default(),
            write_gate: Mutex::new(()),
            seen_version: AtomicI64::new(0),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &TaskBuddyDb {
        &self.db
    }

    pub(crate) const fn hub(&self) -> &SnapshotHub {
        &self.hub
    }

    pub(crate) async fn write_gate(&self) -> MutexGuard<'_, ()> {
        self.write_gate.lock().await
    }

    /// Record the current data version as seen. Call with the write gate held
    /// and before the first subscription opens; later subscribers must not
    /// hide a pending change from earlier ones.
    pub(crate) async fn mark_seen_version(&self) -> Result<(), DatabaseError> {
        let version = self.db.data_version().await?;
        self.seen_version.store(version, Ordering::Release);
        Ok(())
    }

    /// Republish every subscribed owner if another connection committed since
    /// the last check. Owners whose tasks did not change get no snapshot.
    ///
    /// Returns whether any subscriber was woken.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the version check or a re-read fails.
    pub async fn sync_external_writes(&self) -> Result<bool, DatabaseError> {
        let owners = self.hub.subscribed_owners();
        if owners.is_empty() {
            return Ok(false);
        }

        let _gate = self.write_gate().await;
        let version = self.db.data_version().await?;
        if self.seen_version.load(Ordering::Acquire) == version {
            return Ok(false);
        }

        let mut woken = false;
        for owner_id in &owners {
            let tasks = self.list_tasks(owner_id).await?;
            woken |= self.hub.publish_if_changed(owner_id, tasks);
        }
        self.seen_version.store(version, Ordering::Release);
        tracing::debug!(version, owners = owners.len(), woken, "external writes checked");
        Ok(woken)
    }

    /// Run [`Self::sync_external_writes`] every `period`. Failed checks are
    /// logged and retried on the next tick.
    ///
    /// Never completes; drive it alongside a long-lived subscription and drop
    /// the future to stop polling.
    pub async fn follow_external_writes(&self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if let Err(error) = self.sync_external_writes().await {
                tracing::warn!(%error, "checking for external writes failed");
            }
        }
    }

    /// End all open subscriptions. Their `next()` returns `None`.
    pub fn close_subscriptions(&self) {
        self.hub.close(None);
    }
}

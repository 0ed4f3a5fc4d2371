//! # tb-db
//!
//! Task repository for TaskBuddy.
//!
//! [`TaskRepository`] is the collection the board and the creation form talk
//! to: create, live-subscribe, update one field, delete. Two implementations:
//!
//! - [`service::TaskService`]: libSQL local database (`libsql` crate, v0.9.29)
//!   that publishes a full snapshot to every subscriber of an owner after each
//!   successful mutation.
//! - [`memory::InMemoryTaskRepository`]: same semantics without storage, with
//!   call recording and failure injection for tests.

pub mod error;
pub mod helpers;
pub mod memory;
mod migrations;
pub mod repos;
pub mod repository;
pub mod service;
pub mod subscription;
mod test_support;
pub mod updates;

pub use error::DatabaseError;
pub use memory::{InMemoryTaskRepository, RepositoryCall};
pub use repository::TaskRepository;
pub use service::TaskService;
pub use subscription::{Subscription, TaskSnapshot};

use std::time::Duration;

use libsql::Builder;

/// How long a statement waits on a lock held by another connection.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database handle for TaskBuddy state.
///
/// Wraps a libSQL database and connection and generates prefixed IDs.
pub struct TaskBuddyDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl TaskBuddyDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        let tb_db = Self { db, conn };
        tb_db.run_migrations().await?;
        Ok(tb_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// `PRAGMA data_version` for this connection. The value changes whenever
    /// another connection, in this process or another, commits to the file.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the pragma fails.
    pub async fn data_version(&self) -> Result<i64, DatabaseError> {
        let mut rows = self.conn.query("PRAGMA data_version", ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// Generate a prefixed ID via libSQL. Returns e.g. `"tsk-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

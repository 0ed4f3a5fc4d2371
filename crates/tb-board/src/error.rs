use tb_db::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    /// The board was requested without a signed-in session.
    #[error("not authenticated, run `taskbuddy auth login`")]
    Unauthenticated,

    /// The live subscription ended before a snapshot arrived.
    #[error("task subscription closed")]
    SubscriptionClosed,

    #[error(transparent)]
    Repository(#[from] DatabaseError),
}

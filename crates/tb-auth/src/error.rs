use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated, run `taskbuddy auth login`")]
    NotAuthenticated,

    #[error("sign-in cancelled")]
    Cancelled,

    #[error("sign-in rejected: {0}")]
    Rejected(String),

    #[error("session store error: {0}")]
    SessionStore(String),
}

pub mod auth;
pub mod board;
pub mod dispatch;
pub mod shared;
pub mod task;

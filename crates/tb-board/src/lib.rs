//! # tb-board
//!
//! Client-side task lifecycle for TaskBuddy.
//!
//! - [`board`]: the three-column board and its deterministic reducer
//! - [`controller`]: drives the reducer against a live [`tb_db::TaskRepository`]
//! - [`form`]: task creation form validation and submission
//! - [`edit`]: changing the details of an existing task
//! - [`guard`]: navigation guard in front of the board

pub mod board;
pub mod controller;
pub mod edit;
pub mod error;
pub mod form;
pub mod guard;

pub use board::{Board, BoardEvent, Effect, Reduction, reduce};
pub use controller::{BoardController, BoardUpdate, WriteOp};
pub use edit::{EditError, TaskEdit};
pub use error::BoardError;
pub use form::{AttachmentInput, FieldError, FormErrors, FormField, FormOutcome, SubmitError, TaskForm};
pub use guard::{Navigation, Route, guard, navigate};

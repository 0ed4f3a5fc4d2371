pub mod attachment;
pub mod board;

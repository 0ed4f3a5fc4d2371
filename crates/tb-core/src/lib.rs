//! # tb-core
//!
//! Core types, ID prefixes, and error types for TaskBuddy.
//!
//! This crate provides the foundational types shared across all TaskBuddy crates:
//! - The `Task` entity and its creation/update payloads
//! - Status, category, and bucket enums with their wire names
//! - ID prefix constants
//! - The authenticated user identity passed between crates
//! - Cross-cutting error types
//! - CLI response types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod responses;

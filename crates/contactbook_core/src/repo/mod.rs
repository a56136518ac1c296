//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Keep SQL for `contact_groups` and `contacts` behind use-case traits.
//! - Report semantic failures (`*NotFound`, `Duplicate`, `MissingGroup`)
//!   instead of raw SQLite codes.
//!
//! # Invariants
//! - Repositories are only built over migrated connections.

pub mod contact_repo;
mod error;
pub mod group_repo;
mod schema_guard;

pub use error::{RepoError, RepoResult, UniqueField};

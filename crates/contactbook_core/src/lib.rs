//! Core domain logic for the contact book.
//! Groups and contacts: validation, persistence and command outcomes.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{parse_group_selection, Contact, ContactDraft, ContactId, ContactInput};
pub use model::group::{Group, GroupChoices, GroupId, GroupInput};
pub use model::validation::{FieldError, FieldRule, FormField, ValidationErrors};
pub use repo::contact_repo::{ContactRepository, SqliteContactRepository};
pub use repo::group_repo::{
    GroupDeletePolicy, GroupDeletion, GroupRepository, SqliteGroupRepository,
};
pub use repo::{RepoError, RepoResult, UniqueField};
pub use service::command::{CommandError, CommandResult, Confirmation};
pub use service::contact_service::ContactService;
pub use service::group_service::GroupService;

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Shared command outcome and error types.
//!
//! # Invariants
//! - Every documented failure maps to a named `CommandError` variant; only
//!   storage faults fall through to `Repo`.
//! - Logged outcomes carry ids and error codes only, never field values.

use crate::model::contact::ContactId;
use crate::model::group::GroupId;
use crate::model::validation::{FieldError, FieldRule, FormField, ValidationErrors};
use crate::repo::{RepoError, UniqueField};
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Successful command result with its confirmation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation<T> {
    pub record: T,
    pub message: &'static str,
}

impl<T> Confirmation<T> {
    pub(crate) fn new(record: T, message: &'static str) -> Self {
        Self { record, message }
    }
}

/// Failure of a group or contact command.
#[derive(Debug)]
pub enum CommandError {
    /// Submitted fields failed validation; nothing was written.
    Validation(ValidationErrors),
    GroupNotFound(GroupId),
    ContactNotFound(ContactId),
    /// Phone or email already belongs to another contact.
    UniquenessConflict(UniqueField),
    /// Delete refused because contacts still reference the group.
    GroupInUse { group_id: GroupId, contacts: u64 },
    /// Storage or schema failure.
    Repo(RepoError),
}

impl CommandError {
    /// Whether the request layer should answer "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::GroupNotFound(_) | Self::ContactNotFound(_))
    }

    /// Field-level errors the caller can re-prompt with.
    ///
    /// Uniqueness conflicts are reported against the colliding field.
    pub fn field_errors(&self) -> Option<ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors.clone()),
            Self::UniquenessConflict(field) => Some(ValidationErrors::from(FieldError::new(
                field.form_field(),
                FieldRule::Duplicate,
            ))),
            _ => None,
        }
    }

    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::GroupNotFound(_) | Self::ContactNotFound(_) => "not_found",
            Self::UniquenessConflict(_) => "duplicate_value",
            Self::GroupInUse { .. } => "group_in_use",
            Self::Repo(_) => "storage_failed",
        }
    }
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "validation failed: {errors}"),
            Self::GroupNotFound(id) => write!(f, "group not found: {id}"),
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::UniquenessConflict(field) => {
                write!(f, "{field} is already used by another contact")
            }
            Self::GroupInUse { group_id, contacts } => write!(
                f,
                "group {group_id} still has {contacts} contact(s); reassign or remove them first"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for CommandError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CommandError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::GroupNotFound(id) => Self::GroupNotFound(id),
            RepoError::ContactNotFound(id) => Self::ContactNotFound(id),
            RepoError::Duplicate(field) => Self::UniquenessConflict(field),
            // Group vanished between the choice query and the write.
            RepoError::MissingGroup(_) => Self::Validation(ValidationErrors::from(
                FieldError::new(FormField::GroupId, FieldRule::InvalidChoice),
            )),
            RepoError::GroupInUse { group_id, contacts } => {
                Self::GroupInUse { group_id, contacts }
            }
            other => Self::Repo(other),
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Emits one `event=<event>` record for a finished command.
pub(crate) fn log_outcome<T>(event: &str, target: Option<i64>, result: &CommandResult<T>) {
    let target = target.map_or_else(|| "-".to_string(), |id| id.to_string());
    match result {
        Ok(_) => info!("event={event} module=service status=ok id={target}"),
        Err(CommandError::Repo(err)) => warn!(
            "event={event} module=service status=error id={target} error_code=storage_failed error={err}"
        ),
        Err(err) => warn!(
            "event={event} module=service status=error id={target} error_code={}",
            err.code()
        ),
    }
}

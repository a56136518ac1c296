//! Repository error type and SQLite constraint classification.

use crate::db::DbError;
use crate::model::contact::ContactId;
use crate::model::group::GroupId;
use crate::model::validation::FormField;
use rusqlite::{ffi, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Contact column guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Phone,
    Email,
}

impl UniqueField {
    pub fn form_field(self) -> FormField {
        match self {
            Self::Phone => FormField::Phone,
            Self::Email => FormField::Email,
        }
    }
}

impl Display for UniqueField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.form_field().as_str())
    }
}

/// Errors from group and contact repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    GroupNotFound(GroupId),
    ContactNotFound(ContactId),
    /// Write collided with another contact's phone or email.
    Duplicate(UniqueField),
    /// Write referenced a group that does not exist.
    MissingGroup(GroupId),
    /// Group delete refused while contacts still reference it.
    GroupInUse { group_id: GroupId, contacts: u64 },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row violates model invariants.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::GroupNotFound(id) => write!(f, "group not found: {id}"),
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::Duplicate(field) => write!(f, "duplicate contact {field}"),
            Self::MissingGroup(id) => write!(f, "referenced group does not exist: {id}"),
            Self::GroupInUse { group_id, contacts } => write!(
                f,
                "group {group_id} is still referenced by {contacts} contact(s)"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "contact book repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "contact book repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "contact book repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Constraint family a failed contact write tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContactConstraint {
    Unique(UniqueField),
    ForeignKey,
}

/// Maps a SQLite constraint failure on `contacts` to its semantic kind.
///
/// Returns `None` for anything that is not a recognised contact constraint.
pub(crate) fn classify_contact_constraint(err: &rusqlite::Error) -> Option<ContactConstraint> {
    let rusqlite::Error::SqliteFailure(failure, message) = err else {
        return None;
    };
    if failure.code != ErrorCode::ConstraintViolation {
        return None;
    }

    match failure.extended_code {
        ffi::SQLITE_CONSTRAINT_UNIQUE => message
            .as_deref()
            .and_then(unique_field_from_message)
            .map(ContactConstraint::Unique),
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(ContactConstraint::ForeignKey),
        _ => None,
    }
}

// SQLite reports e.g. "UNIQUE constraint failed: contacts.phone".
fn unique_field_from_message(message: &str) -> Option<UniqueField> {
    let columns = message.rsplit_once(':').map_or(message, |(_, tail)| tail);
    columns
        .split(',')
        .map(str::trim)
        .find_map(|column| match column {
            "contacts.phone" => Some(UniqueField::Phone),
            "contacts.email" => Some(UniqueField::Email),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::{unique_field_from_message, UniqueField};

    #[test]
    fn unique_message_names_the_column() {
        assert_eq!(
            unique_field_from_message("UNIQUE constraint failed: contacts.phone"),
            Some(UniqueField::Phone)
        );
        assert_eq!(
            unique_field_from_message("UNIQUE constraint failed: contacts.email"),
            Some(UniqueField::Email)
        );
        assert_eq!(
            unique_field_from_message("UNIQUE constraint failed: other.code"),
            None
        );
    }
}

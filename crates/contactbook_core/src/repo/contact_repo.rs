//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist `contacts` rows and read them back by id.
//! - Translate storage constraint failures into semantic errors.
//! - Serve the group choice set contacts are validated against.
//!
//! # Invariants
//! - Uniqueness of `phone`/`email` is left to the storage constraint; an
//!   update never collides with the row being updated.
//! - Writes referencing a missing group fail with `MissingGroup`.

use crate::model::contact::{Contact, ContactDraft, ContactId};
use crate::model::group::{GroupChoices, GroupId};
use crate::repo::error::{
    classify_contact_constraint, ContactConstraint, RepoError, RepoResult,
};
use crate::repo::schema_guard::ensure_table_ready;
use rusqlite::{params, Connection, Row};

const CONTACT_SELECT_SQL: &str = "SELECT id, name, phone, email, group_id FROM contacts";

/// Repository interface for contact persistence.
pub trait ContactRepository {
    /// Inserts a contact and returns it with its assigned id.
    fn create_contact(&self, draft: &ContactDraft) -> RepoResult<Contact>;
    /// Overwrites every field of an existing contact.
    fn update_contact(&self, id: ContactId, draft: &ContactDraft) -> RepoResult<Contact>;
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    /// Lists all contacts by id ascending.
    fn list_contacts(&self) -> RepoResult<Vec<Contact>>;
    fn delete_contact(&self, id: ContactId) -> RepoResult<()>;
    /// Current groups as `(id, name)` ordered by name.
    fn group_choices(&self) -> RepoResult<GroupChoices>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Wraps a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "contacts",
            &["id", "name", "phone", "email", "group_id"],
        )?;
        ensure_table_ready(conn, "contact_groups", &["id", "name"])?;
        Ok(Self { conn })
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn create_contact(&self, draft: &ContactDraft) -> RepoResult<Contact> {
        self.conn
            .execute(
                "INSERT INTO contacts (name, phone, email, group_id)
                 VALUES (?1, ?2, ?3, ?4);",
                params![draft.name, draft.phone, draft.email, draft.group_id],
            )
            .map_err(|err| map_write_error(err, draft.group_id))?;

        Ok(contact_from_draft(self.conn.last_insert_rowid(), draft))
    }

    fn update_contact(&self, id: ContactId, draft: &ContactDraft) -> RepoResult<Contact> {
        let changed = self
            .conn
            .execute(
                "UPDATE contacts
                 SET
                    name = ?2,
                    phone = ?3,
                    email = ?4,
                    group_id = ?5
                 WHERE id = ?1;",
                params![id, draft.name, draft.phone, draft.email, draft.group_id],
            )
            .map_err(|err| map_write_error(err, draft.group_id))?;

        if changed == 0 {
            return Err(RepoError::ContactNotFound(id));
        }

        Ok(contact_from_draft(id, draft))
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }
        Ok(None)
    }

    fn list_contacts(&self) -> RepoResult<Vec<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }
        Ok(contacts)
    }

    fn delete_contact(&self, id: ContactId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::ContactNotFound(id));
        }
        Ok(())
    }

    fn group_choices(&self) -> RepoResult<GroupChoices> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM contact_groups ORDER BY name ASC, id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut choices = Vec::new();
        while let Some(row) = rows.next()? {
            choices.push((row.get::<_, GroupId>(0)?, row.get::<_, String>(1)?));
        }
        Ok(GroupChoices::new(choices))
    }
}

fn map_write_error(err: rusqlite::Error, group_id: GroupId) -> RepoError {
    match classify_contact_constraint(&err) {
        Some(ContactConstraint::Unique(field)) => RepoError::Duplicate(field),
        Some(ContactConstraint::ForeignKey) => RepoError::MissingGroup(group_id),
        None => err.into(),
    }
}

fn contact_from_draft(id: ContactId, draft: &ContactDraft) -> Contact {
    Contact {
        id,
        name: draft.name.clone(),
        phone: draft.phone.clone(),
        email: draft.email.clone(),
        group_id: draft.group_id,
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    Ok(Contact {
        id: row.get("id")?,
        name: row.get("name")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        group_id: row.get("group_id")?,
    })
}

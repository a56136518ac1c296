//! Group repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist `contact_groups` rows and answer id lookups.
//! - Apply the chosen delete policy for groups that still have contacts.
//!
//! # Invariants
//! - Multi-statement deletes run in one `IMMEDIATE` transaction.
//! - `Unguarded` deletes restore the connection's `foreign_keys` setting
//!   whether or not the delete succeeds.

use crate::model::group::{Group, GroupId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema_guard::ensure_table_ready;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const GROUP_SELECT_SQL: &str = "SELECT id, name FROM contact_groups";

/// How delete-group treats contacts that still reference the group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupDeletePolicy {
    /// Refuse with `GroupInUse` while any contact references the group.
    #[default]
    Block,
    /// Delete referencing contacts together with the group.
    Cascade,
    /// Delete the group regardless, leaving referencing contacts dangling.
    Unguarded,
}

impl GroupDeletePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Cascade => "cascade",
            Self::Unguarded => "unguarded",
        }
    }

    /// Parses `block|cascade|unguarded` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "block" => Some(Self::Block),
            "cascade" => Some(Self::Cascade),
            "unguarded" => Some(Self::Unguarded),
            _ => None,
        }
    }
}

/// Result of a completed group delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDeletion {
    /// The group as it was before removal.
    pub group: Group,
    /// Contacts removed alongside the group (`Cascade` only).
    pub removed_contacts: u64,
    /// Contacts left referencing the removed group (`Unguarded` only).
    pub dangling_contacts: u64,
}

/// Repository interface for group persistence.
pub trait GroupRepository {
    /// Inserts a group and returns it with its assigned id.
    fn create_group(&self, name: &str) -> RepoResult<Group>;
    /// Overwrites the group name in place.
    fn update_group(&self, id: GroupId, name: &str) -> RepoResult<Group>;
    fn get_group(&self, id: GroupId) -> RepoResult<Option<Group>>;
    /// Lists all groups by id ascending.
    fn list_groups(&self) -> RepoResult<Vec<Group>>;
    /// Removes one group according to `policy`.
    fn delete_group(&self, id: GroupId, policy: GroupDeletePolicy) -> RepoResult<GroupDeletion>;
}

/// SQLite-backed group repository.
pub struct SqliteGroupRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGroupRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - Schema version/table/column mismatches are rejected up front.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "contact_groups", &["id", "name"])?;
        ensure_table_ready(conn, "contacts", &["id", "group_id"])?;
        Ok(Self { conn })
    }

    fn delete_in_transaction(
        &self,
        id: GroupId,
        policy: GroupDeletePolicy,
    ) -> RepoResult<GroupDeletion> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let group = load_group(&tx, id)?.ok_or(RepoError::GroupNotFound(id))?;
        let referencing = count_group_contacts(&tx, id)?;

        let mut deletion = GroupDeletion {
            group,
            removed_contacts: 0,
            dangling_contacts: 0,
        };
        match policy {
            GroupDeletePolicy::Block if referencing > 0 => {
                return Err(RepoError::GroupInUse {
                    group_id: id,
                    contacts: referencing,
                });
            }
            GroupDeletePolicy::Block => {}
            GroupDeletePolicy::Cascade => {
                let removed = tx.execute("DELETE FROM contacts WHERE group_id = ?1;", [id])?;
                deletion.removed_contacts = removed as u64;
            }
            GroupDeletePolicy::Unguarded => {
                deletion.dangling_contacts = referencing;
            }
        }

        tx.execute("DELETE FROM contact_groups WHERE id = ?1;", [id])?;
        tx.commit()?;
        Ok(deletion)
    }

    fn delete_unguarded(&self, id: GroupId) -> RepoResult<GroupDeletion> {
        let foreign_keys: i64 = self
            .conn
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
        self.conn.execute_batch("PRAGMA foreign_keys = OFF;")?;

        let outcome = self.delete_in_transaction(id, GroupDeletePolicy::Unguarded);
        let restored = self
            .conn
            .execute_batch(&format!("PRAGMA foreign_keys = {foreign_keys};"));

        let deletion = outcome?;
        restored?;
        Ok(deletion)
    }
}

impl GroupRepository for SqliteGroupRepository<'_> {
    fn create_group(&self, name: &str) -> RepoResult<Group> {
        self.conn
            .execute("INSERT INTO contact_groups (name) VALUES (?1);", [name])?;
        Ok(Group {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    fn update_group(&self, id: GroupId, name: &str) -> RepoResult<Group> {
        let changed = self.conn.execute(
            "UPDATE contact_groups SET name = ?2 WHERE id = ?1;",
            params![id, name],
        )?;
        if changed == 0 {
            return Err(RepoError::GroupNotFound(id));
        }

        Ok(Group {
            id,
            name: name.to_string(),
        })
    }

    fn get_group(&self, id: GroupId) -> RepoResult<Option<Group>> {
        load_group(self.conn, id)
    }

    fn list_groups(&self) -> RepoResult<Vec<Group>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GROUP_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut groups = Vec::new();
        while let Some(row) = rows.next()? {
            groups.push(parse_group_row(row)?);
        }
        Ok(groups)
    }

    fn delete_group(&self, id: GroupId, policy: GroupDeletePolicy) -> RepoResult<GroupDeletion> {
        match policy {
            GroupDeletePolicy::Unguarded => self.delete_unguarded(id),
            GroupDeletePolicy::Block | GroupDeletePolicy::Cascade => {
                self.delete_in_transaction(id, policy)
            }
        }
    }
}

fn load_group(conn: &Connection, id: GroupId) -> RepoResult<Option<Group>> {
    let group = conn
        .query_row(
            &format!("{GROUP_SELECT_SQL} WHERE id = ?1;"),
            [id],
            |row| Ok((row.get::<_, GroupId>("id")?, row.get::<_, String>("name")?)),
        )
        .optional()?;
    Ok(group.map(|(id, name)| Group { id, name }))
}

fn count_group_contacts(conn: &Connection, id: GroupId) -> RepoResult<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM contacts WHERE group_id = ?1;",
        [id],
        |row| row.get(0),
    )?;
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative contact count `{count}`")))
}

fn parse_group_row(row: &Row<'_>) -> RepoResult<Group> {
    Ok(Group {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

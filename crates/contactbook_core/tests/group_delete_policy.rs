use contactbook_core::db::open_db_in_memory;
use contactbook_core::{
    CommandError, ContactInput, ContactService, GroupDeletePolicy, GroupId, GroupInput,
    GroupService, SqliteContactRepository, SqliteGroupRepository,
};
use rusqlite::Connection;

fn group_service(
    conn: &Connection,
    policy: GroupDeletePolicy,
) -> GroupService<SqliteGroupRepository<'_>> {
    GroupService::with_delete_policy(SqliteGroupRepository::try_new(conn).unwrap(), policy)
}

fn contact_service(conn: &Connection) -> ContactService<SqliteContactRepository<'_>> {
    ContactService::new(SqliteContactRepository::try_new(conn).unwrap())
}

// Friends(1) with Ann; Work(2) with Bob.
fn seed(conn: &Connection) -> (GroupId, GroupId) {
    let groups = group_service(conn, GroupDeletePolicy::Block);
    let friends = groups.create_group(&GroupInput::new("Friends")).unwrap().record.id;
    let work = groups.create_group(&GroupInput::new("Work")).unwrap().record.id;
    let contacts = contact_service(conn);
    contacts
        .create_contact(&ContactInput::new("Ann", "5551234567", "ann@x.com", friends))
        .unwrap();
    contacts
        .create_contact(&ContactInput::new("Bob", "5559876543", "bob@x.com", work))
        .unwrap();
    (friends, work)
}

fn foreign_keys_enabled(conn: &Connection) -> bool {
    conn.query_row("PRAGMA foreign_keys;", [], |row| row.get::<_, i64>(0))
        .unwrap()
        == 1
}

#[test]
fn default_policy_blocks_groups_in_use() {
    let conn = open_db_in_memory().unwrap();
    let (friends, _) = seed(&conn);
    let groups = GroupService::new(SqliteGroupRepository::try_new(&conn).unwrap());
    assert_eq!(groups.delete_policy(), GroupDeletePolicy::Block);

    let err = groups.delete_group(friends).unwrap_err();
    assert!(matches!(
        err,
        CommandError::GroupInUse {
            group_id,
            contacts: 1
        } if group_id == friends
    ));
    assert!(groups.get_group(friends).is_ok());
    assert_eq!(contact_service(&conn).list_contacts().unwrap().len(), 2);
}

#[test]
fn block_allows_deleting_after_contacts_move() {
    let conn = open_db_in_memory().unwrap();
    let (friends, work) = seed(&conn);
    let contacts = contact_service(&conn);
    let ann = contacts.list_contacts().unwrap().remove(0);
    contacts
        .update_contact(ann.id, &ContactInput::new("Ann", "5551234567", "ann@x.com", work))
        .unwrap();

    let groups = group_service(&conn, GroupDeletePolicy::Block);
    groups.delete_group(friends).unwrap();
    assert!(groups.get_group(friends).unwrap_err().is_not_found());
}

#[test]
fn cascade_removes_referencing_contacts_only() {
    let conn = open_db_in_memory().unwrap();
    let (friends, work) = seed(&conn);
    let groups = group_service(&conn, GroupDeletePolicy::Cascade);

    let deleted = groups.delete_group(friends).unwrap();
    assert_eq!(deleted.record.removed_contacts, 1);
    assert_eq!(deleted.record.dangling_contacts, 0);

    let remaining = contact_service(&conn).list_contacts().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].group_id, work);
}

#[test]
fn unguarded_delete_leaves_dangling_contacts_and_restores_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let (friends, _) = seed(&conn);
    let groups = group_service(&conn, GroupDeletePolicy::Unguarded);

    let deleted = groups.delete_group(friends).unwrap();
    assert_eq!(deleted.record.dangling_contacts, 1);
    assert_eq!(deleted.record.removed_contacts, 0);
    assert!(groups
        .list_groups()
        .unwrap()
        .iter()
        .all(|group| group.id != friends));

    let contacts = contact_service(&conn);
    let ann = contacts
        .list_contacts()
        .unwrap()
        .into_iter()
        .find(|contact| contact.name == "Ann")
        .unwrap();
    assert_eq!(ann.group_id, friends);
    assert!(foreign_keys_enabled(&conn));

    // The dangling contact must be reassigned before it can be saved again.
    let err = contacts
        .update_contact(ann.id, &ContactInput::new("Ann", "5551234567", "ann@x.com", friends))
        .unwrap_err();
    assert!(err.field_errors().is_some());
}

#[test]
fn unguarded_delete_of_missing_group_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let groups = group_service(&conn, GroupDeletePolicy::Unguarded);

    assert!(groups.delete_group(5).unwrap_err().is_not_found());
    assert!(foreign_keys_enabled(&conn));
}

#[test]
fn policy_names_parse_case_insensitively() {
    for policy in [
        GroupDeletePolicy::Block,
        GroupDeletePolicy::Cascade,
        GroupDeletePolicy::Unguarded,
    ] {
        assert_eq!(
            GroupDeletePolicy::parse(&policy.as_str().to_uppercase()),
            Some(policy)
        );
    }
    assert_eq!(GroupDeletePolicy::parse("restrict"), None);
}

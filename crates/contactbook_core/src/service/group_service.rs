//! Group commands.
//!
//! # Invariants
//! - update/delete check the target exists before anything else.
//! - Nothing is written unless the submitted name validates.

use crate::model::group::{Group, GroupId, GroupInput};
use crate::repo::group_repo::{GroupDeletePolicy, GroupDeletion, GroupRepository};
use crate::service::command::{log_outcome, CommandError, CommandResult, Confirmation};
use log::warn;

pub const GROUP_SAVED: &str = "Group saved successfully";
pub const GROUP_UPDATED: &str = "Group updated successfully";
pub const GROUP_DELETED: &str = "Group deleted successfully";

/// Group command facade over a repository.
pub struct GroupService<R: GroupRepository> {
    repo: R,
    delete_policy: GroupDeletePolicy,
}

impl<R: GroupRepository> GroupService<R> {
    /// Creates a service that blocks deleting groups still in use.
    pub fn new(repo: R) -> Self {
        Self::with_delete_policy(repo, GroupDeletePolicy::default())
    }

    pub fn with_delete_policy(repo: R, delete_policy: GroupDeletePolicy) -> Self {
        Self {
            repo,
            delete_policy,
        }
    }

    pub fn delete_policy(&self) -> GroupDeletePolicy {
        self.delete_policy
    }

    pub fn list_groups(&self) -> CommandResult<Vec<Group>> {
        Ok(self.repo.list_groups()?)
    }

    /// Loads one group, e.g. to prefill an edit form.
    pub fn get_group(&self, id: GroupId) -> CommandResult<Group> {
        self.repo
            .get_group(id)?
            .ok_or(CommandError::GroupNotFound(id))
    }

    pub fn create_group(&self, input: &GroupInput) -> CommandResult<Confirmation<Group>> {
        let result = self.create_group_inner(input);
        log_outcome(
            "group_create",
            result.as_ref().ok().map(|done| done.record.id),
            &result,
        );
        result
    }

    pub fn update_group(
        &self,
        id: GroupId,
        input: &GroupInput,
    ) -> CommandResult<Confirmation<Group>> {
        let result = self.update_group_inner(id, input);
        log_outcome("group_update", Some(id), &result);
        result
    }

    /// Deletes a group under the configured [`GroupDeletePolicy`].
    pub fn delete_group(&self, id: GroupId) -> CommandResult<Confirmation<GroupDeletion>> {
        let result = self
            .repo
            .delete_group(id, self.delete_policy)
            .map_err(CommandError::from)
            .map(|deletion| Confirmation::new(deletion, GROUP_DELETED));

        if let Ok(done) = &result {
            if done.record.dangling_contacts > 0 {
                warn!(
                    "event=group_delete module=service status=dangling id={id} policy={} contacts={}",
                    self.delete_policy.as_str(),
                    done.record.dangling_contacts
                );
            }
        }
        log_outcome("group_delete", Some(id), &result);
        result
    }

    fn create_group_inner(&self, input: &GroupInput) -> CommandResult<Confirmation<Group>> {
        input.validate()?;
        let group = self.repo.create_group(&input.name)?;
        Ok(Confirmation::new(group, GROUP_SAVED))
    }

    fn update_group_inner(
        &self,
        id: GroupId,
        input: &GroupInput,
    ) -> CommandResult<Confirmation<Group>> {
        self.get_group(id)?;
        input.validate()?;
        let group = self.repo.update_group(id, &input.name)?;
        Ok(Confirmation::new(group, GROUP_UPDATED))
    }
}

//! Contact commands.
//!
//! # Responsibility
//! - Validate contact field sets against a freshly queried group choice set.
//! - Surface storage uniqueness collisions as `UniquenessConflict`.
//!
//! # Invariants
//! - Group choices are re-read for every create/update, never cached.
//! - update/delete check the target exists before validating.

use crate::model::contact::{Contact, ContactId, ContactInput};
use crate::model::group::GroupChoices;
use crate::repo::contact_repo::ContactRepository;
use crate::service::command::{log_outcome, CommandError, CommandResult, Confirmation};

pub const CONTACT_SAVED: &str = "Contact saved successfully";
pub const CONTACT_UPDATED: &str = "Contact updated successfully";
pub const CONTACT_DELETED: &str = "Contact deleted successfully";

/// Contact command facade over a repository.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_contacts(&self) -> CommandResult<Vec<Contact>> {
        Ok(self.repo.list_contacts()?)
    }

    /// Loads one contact, e.g. to prefill an edit form.
    pub fn get_contact(&self, id: ContactId) -> CommandResult<Contact> {
        self.repo
            .get_contact(id)?
            .ok_or(CommandError::ContactNotFound(id))
    }

    /// Groups a contact may currently be assigned to, ordered by name.
    pub fn group_choices(&self) -> CommandResult<GroupChoices> {
        Ok(self.repo.group_choices()?)
    }

    pub fn create_contact(&self, input: &ContactInput) -> CommandResult<Confirmation<Contact>> {
        let result = self.create_contact_inner(input);
        log_outcome(
            "contact_create",
            result.as_ref().ok().map(|done| done.record.id),
            &result,
        );
        result
    }

    pub fn update_contact(
        &self,
        id: ContactId,
        input: &ContactInput,
    ) -> CommandResult<Confirmation<Contact>> {
        let result = self.update_contact_inner(id, input);
        log_outcome("contact_update", Some(id), &result);
        result
    }

    /// Deletes one contact; no other rows are touched.
    pub fn delete_contact(&self, id: ContactId) -> CommandResult<Confirmation<ContactId>> {
        let result = self
            .repo
            .delete_contact(id)
            .map(|()| Confirmation::new(id, CONTACT_DELETED))
            .map_err(CommandError::from);
        log_outcome("contact_delete", Some(id), &result);
        result
    }

    fn create_contact_inner(&self, input: &ContactInput) -> CommandResult<Confirmation<Contact>> {
        let choices = self.repo.group_choices()?;
        let draft = input.validate(&choices)?;
        let contact = self.repo.create_contact(&draft)?;
        Ok(Confirmation::new(contact, CONTACT_SAVED))
    }

    fn update_contact_inner(
        &self,
        id: ContactId,
        input: &ContactInput,
    ) -> CommandResult<Confirmation<Contact>> {
        self.get_contact(id)?;
        let choices = self.repo.group_choices()?;
        let draft = input.validate(&choices)?;
        let contact = self.repo.update_contact(id, &draft)?;
        Ok(Confirmation::new(contact, CONTACT_UPDATED))
    }
}

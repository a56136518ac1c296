//! Group domain model.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes.
//! - `name` is 2..=200 characters once persisted through the command layer.

use crate::model::validation::{required_length, FormField, ValidationErrors};
use serde::{Deserialize, Serialize};

/// Storage-assigned group identifier.
pub type GroupId = i64;

pub const GROUP_NAME_MIN_CHARS: usize = 2;
pub const GROUP_NAME_MAX_CHARS: usize = 200;

/// A named category contacts belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}

/// Submitted field set for create-group and update-group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GroupInput {
    pub name: String,
}

impl GroupInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Checks the name field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            FormField::Name,
            required_length(&self.name, GROUP_NAME_MIN_CHARS, GROUP_NAME_MAX_CHARS),
        );
        errors.into_result()
    }
}

/// `(id, name)` pairs a contact's group must be chosen from.
///
/// Built by a fresh query right before a contact command validates, so the
/// set reflects groups as they exist at that moment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupChoices {
    choices: Vec<(GroupId, String)>,
}

impl GroupChoices {
    pub fn new(choices: Vec<(GroupId, String)>) -> Self {
        Self { choices }
    }

    pub fn contains(&self, id: GroupId) -> bool {
        self.choices.iter().any(|(choice_id, _)| *choice_id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &str)> {
        self.choices.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::{GroupChoices, GroupInput};
    use crate::model::validation::{FieldRule, FormField};

    #[test]
    fn group_name_boundaries() {
        assert!(GroupInput::new("ab").validate().is_ok());
        assert!(GroupInput::new("x".repeat(200)).validate().is_ok());

        for bad in ["", " ", "a"] {
            let errors = GroupInput::new(bad).validate().unwrap_err();
            assert!(errors.for_field(FormField::Name).is_some(), "{bad:?}");
        }
        let errors = GroupInput::new("x".repeat(201)).validate().unwrap_err();
        assert_eq!(
            errors.for_field(FormField::Name),
            Some(FieldRule::Length { min: 2, max: 200 })
        );
    }

    #[test]
    fn choices_membership() {
        let choices = GroupChoices::new(vec![(3, "Family".to_string()), (1, "Work".to_string())]);
        assert!(choices.contains(1));
        assert!(!choices.contains(2));
        assert_eq!(choices.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![3, 1]);
    }
}

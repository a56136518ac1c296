//! Contact domain model.
//!
//! # Responsibility
//! - Define the persisted contact record and its submitted field set.
//! - Validate the field set against a group choice context.
//!
//! # Invariants
//! - `phone` and `email` are unique across contacts (enforced by storage).
//! - `group_id` references an existing group when written.

use crate::model::group::{GroupChoices, GroupId};
use crate::model::validation::{
    required_email, required_length, FieldError, FieldRule, FormField, ValidationErrors,
};
use serde::{Deserialize, Serialize};

/// Storage-assigned contact identifier.
pub type ContactId = i64;

pub const CONTACT_NAME_MIN_CHARS: usize = 2;
pub const CONTACT_NAME_MAX_CHARS: usize = 200;
pub const PHONE_MIN_CHARS: usize = 10;
pub const PHONE_MAX_CHARS: usize = 12;

/// A person record belonging to exactly one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub group_id: GroupId,
}

/// Submitted field set for create-contact and update-contact.
///
/// `group_id` is `None` when the form carried no group selection. It is
/// already an integer here; raw form values go through
/// [`parse_group_selection`] first, so a non-integer selection is reported
/// as a `group_id` field error instead of a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub group_id: Option<GroupId>,
}

/// Field values that passed validation and are ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub group_id: GroupId,
}

impl ContactInput {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        group_id: GroupId,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
            group_id: Some(group_id),
        }
    }

    /// Validates every field; `choices` is the group set queried for this
    /// command.
    pub fn validate(&self, choices: &GroupChoices) -> Result<ContactDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            FormField::Name,
            required_length(&self.name, CONTACT_NAME_MIN_CHARS, CONTACT_NAME_MAX_CHARS),
        );
        errors.check(
            FormField::Phone,
            required_length(&self.phone, PHONE_MIN_CHARS, PHONE_MAX_CHARS),
        );
        errors.check(FormField::Email, required_email(&self.email));

        let group_id = match self.group_id {
            None => {
                errors.push(FormField::GroupId, FieldRule::Required);
                None
            }
            Some(id) if !choices.contains(id) => {
                errors.push(FormField::GroupId, FieldRule::InvalidChoice);
                None
            }
            Some(id) => Some(id),
        };

        match group_id {
            Some(group_id) if errors.is_empty() => Ok(ContactDraft {
                name: self.name.clone(),
                phone: self.phone.clone(),
                email: self.email.clone(),
                group_id,
            }),
            _ => Err(errors),
        }
    }
}

/// Coerces a raw group selection. Blank is no selection; anything that is not
/// an integer id is not a valid choice.
pub fn parse_group_selection(raw: &str) -> Result<Option<GroupId>, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<GroupId>()
        .map(Some)
        .map_err(|_| FieldError::new(FormField::GroupId, FieldRule::InvalidChoice))
}

impl From<&Contact> for ContactInput {
    fn from(value: &Contact) -> Self {
        Self {
            name: value.name.clone(),
            phone: value.phone.clone(),
            email: value.email.clone(),
            group_id: Some(value.group_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_group_selection, ContactInput};
    use crate::model::group::GroupChoices;
    use crate::model::validation::{FieldRule, FormField};

    fn choices() -> GroupChoices {
        GroupChoices::new(vec![(1, "Friends".to_string())])
    }

    #[test]
    fn valid_input_becomes_draft() {
        let draft = ContactInput::new("Ann", "5551234567", "ann@x.com", 1)
            .validate(&choices())
            .unwrap();
        assert_eq!(draft.group_id, 1);
        assert_eq!(draft.phone, "5551234567");
    }

    #[test]
    fn every_failing_field_is_reported() {
        let input = ContactInput {
            name: "A".to_string(),
            phone: "123".to_string(),
            email: "not-an-email".to_string(),
            group_id: Some(9),
        };
        let errors = input.validate(&choices()).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.for_field(FormField::Phone),
            Some(FieldRule::Length { min: 10, max: 12 })
        );
        assert_eq!(
            errors.for_field(FormField::Email),
            Some(FieldRule::EmailFormat)
        );
        assert_eq!(
            errors.for_field(FormField::GroupId),
            Some(FieldRule::InvalidChoice)
        );
    }

    #[test]
    fn missing_group_is_required_error() {
        let input = ContactInput {
            group_id: None,
            ..ContactInput::new("Ann", "555123456789", "ann@x.com", 1)
        };
        let errors = input.validate(&choices()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.for_field(FormField::GroupId),
            Some(FieldRule::Required)
        );
    }

    #[test]
    fn phone_longer_than_twelve_is_rejected() {
        let errors = ContactInput::new("Ann", "5551234567890", "ann@x.com", 1)
            .validate(&choices())
            .unwrap_err();
        assert!(errors.for_field(FormField::Phone).is_some());
    }

    #[test]
    fn phone_length_window_is_ten_to_twelve() {
        for phone in ["5551234567", "55512345678", "555123456789"] {
            assert!(ContactInput::new("Ann", phone, "ann@x.com", 1)
                .validate(&choices())
                .is_ok());
        }
        let errors = ContactInput::new("Ann", "555123456", "ann@x.com", 1)
            .validate(&choices())
            .unwrap_err();
        assert_eq!(
            errors.for_field(FormField::Phone),
            Some(FieldRule::Length { min: 10, max: 12 })
        );
    }

    #[test]
    fn contact_name_accepts_up_to_two_hundred_chars() {
        let draft = ContactInput::new("n".repeat(200), "5551234567", "ann@x.com", 1)
            .validate(&choices())
            .unwrap();
        assert_eq!(draft.name.chars().count(), 200);

        let errors = ContactInput::new("n".repeat(201), "5551234567", "ann@x.com", 1)
            .validate(&choices())
            .unwrap_err();
        assert_eq!(
            errors.for_field(FormField::Name),
            Some(FieldRule::Length { min: 2, max: 200 })
        );
    }

    #[test]
    fn raw_group_selection_is_coerced_to_an_id() {
        assert_eq!(parse_group_selection(" 7 "), Ok(Some(7)));
        assert_eq!(parse_group_selection(""), Ok(None));
        let err = parse_group_selection("friends").unwrap_err();
        assert_eq!(err.field, FormField::GroupId);
        assert_eq!(err.rule, FieldRule::InvalidChoice);
    }

    #[test]
    fn typed_input_rejects_non_integer_group_on_decode() {
        let decoded: ContactInput = serde_json::from_str(
            r#"{"name":"Ann","phone":"5551234567","email":"ann@x.com","group_id":null}"#,
        )
        .unwrap();
        assert_eq!(
            decoded.validate(&choices()).unwrap_err().for_field(FormField::GroupId),
            Some(FieldRule::Required)
        );

        let undecodable = serde_json::from_str::<ContactInput>(
            r#"{"name":"Ann","phone":"5551234567","email":"ann@x.com","group_id":"friends"}"#,
        );
        assert!(undecodable.is_err());
    }
}

//! Field-level validation primitives shared by group and contact inputs.
//!
//! # Responsibility
//! - Name the form fields and the rules they can fail.
//! - Collect every failing field into one `ValidationErrors` set.
//!
//! # Invariants
//! - At most one error is recorded per field (first failing rule wins).
//! - Rule order per field is: required, then length/format/choice.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMAIL_MAX_CHARS: usize = 254;
const EMAIL_LOCAL_MAX_CHARS: usize = 64;
const DOMAIN_LABEL_MAX_CHARS: usize = 63;

// Domain label lengths are checked in `is_valid_email`.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[\p{L}\p{N}!#$%&'*+/=?^_`{|}~-]+(?:\.[\p{L}\p{N}!#$%&'*+/=?^_`{|}~-]+)*@(?:[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?\.)+(?:\p{L}{2,}|xn--[A-Za-z0-9-]*[A-Za-z0-9])$",
    )
    .expect("valid email regex")
});

/// Submitted form field identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Phone,
    Email,
    GroupId,
}

impl FormField {
    /// Stable field key as submitted by forms.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::GroupId => "group_id",
        }
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule a field value failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FieldRule {
    /// Missing, empty, or whitespace only.
    Required,
    /// Character count outside `min..=max`.
    Length { min: usize, max: usize },
    /// Not a syntactically valid email address.
    EmailFormat,
    /// Group id not in the current choice set.
    InvalidChoice,
    /// Value already used by another contact.
    Duplicate,
}

impl Display for FieldRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => f.write_str("This field is required."),
            Self::Length { min, max } => {
                write!(f, "Field must be between {min} and {max} characters long.")
            }
            Self::EmailFormat => f.write_str("Invalid email address."),
            Self::InvalidChoice => f.write_str("Not a valid choice."),
            Self::Duplicate => f.write_str("This value is already in use."),
        }
    }
}

/// One failing field with the rule it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FormField,
    #[serde(flatten)]
    pub rule: FieldRule,
}

impl FieldError {
    pub fn new(field: FormField, rule: FieldRule) -> Self {
        Self { field, rule }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.rule)
    }
}

/// Structured error set returned when an input fails validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `rule` for `field` unless the field already failed.
    pub fn push(&mut self, field: FormField, rule: FieldRule) {
        if self.for_field(field).is_none() {
            self.errors.push(FieldError::new(field, rule));
        }
    }

    /// Records the outcome of a field check.
    pub fn check(&mut self, field: FormField, outcome: Result<(), FieldRule>) {
        if let Err(rule) = outcome {
            self.push(field, rule);
        }
    }

    pub fn for_field(&self, field: FormField) -> Option<FieldRule> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.rule)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(())` when nothing failed, otherwise the collected set.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(value: FieldError) -> Self {
        Self {
            errors: vec![value],
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Required text with a character-count window.
///
/// Presence is judged on the trimmed value; length on the value as submitted.
pub fn required_length(value: &str, min: usize, max: usize) -> Result<(), FieldRule> {
    require_text(value)?;
    let chars = value.chars().count();
    if chars < min || chars > max {
        return Err(FieldRule::Length { min, max });
    }
    Ok(())
}

/// Required text that must parse as an email address.
pub fn required_email(value: &str) -> Result<(), FieldRule> {
    require_text(value)?;
    if is_valid_email(value) {
        Ok(())
    } else {
        Err(FieldRule::EmailFormat)
    }
}

/// Syntactic email check: dot-atom local part, DNS-label domain, letter or
/// punycode TLD. Unicode letters and digits are allowed in both halves.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().count() > EMAIL_MAX_CHARS {
        return false;
    }
    match value.rsplit_once('@') {
        Some((local, domain)) if local.chars().count() <= EMAIL_LOCAL_MAX_CHARS => {
            domain
                .split('.')
                .all(|label| label.chars().count() <= DOMAIN_LABEL_MAX_CHARS)
                && EMAIL_RE.is_match(value)
        }
        _ => false,
    }
}

fn require_text(value: &str) -> Result<(), FieldRule> {
    if value.trim().is_empty() {
        Err(FieldRule::Required)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        is_valid_email, required_email, required_length, FieldRule, FormField, ValidationErrors,
    };

    #[test]
    fn required_length_checks_presence_before_length() {
        assert_eq!(required_length("   ", 2, 200), Err(FieldRule::Required));
        assert_eq!(
            required_length("a", 2, 200),
            Err(FieldRule::Length { min: 2, max: 200 })
        );
        assert_eq!(required_length("ab", 2, 200), Ok(()));
    }

    #[test]
    fn required_length_counts_characters_not_bytes() {
        assert_eq!(required_length("éé", 2, 2), Ok(()));
        assert_eq!(
            required_length(&"ü".repeat(201), 2, 200),
            Err(FieldRule::Length { min: 2, max: 200 })
        );
    }

    #[test]
    fn email_syntax_accepts_common_addresses() {
        assert!(is_valid_email("ann@x.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("ann@x"));
        assert!(!is_valid_email("ann.x.com"));
        assert!(!is_valid_email("ann..b@x.com"));
        assert!(!is_valid_email("ann@-x.com"));
        assert!(!is_valid_email(&format!("{}@x.com", "a".repeat(65))));
        assert!(is_valid_email(&format!("{}@x.com", "a".repeat(64))));
        assert!(!is_valid_email(&format!("ann@{}.com", "b".repeat(64))));
        assert!(!is_valid_email(&format!("ann@{}.com", "b".repeat(250))));
        assert_eq!(required_email(""), Err(FieldRule::Required));
        assert_eq!(required_email("nope"), Err(FieldRule::EmailFormat));
    }

    #[test]
    fn email_syntax_accepts_international_addresses() {
        assert!(is_valid_email("ann@bücher.de"));
        assert!(is_valid_email("jörg@x.com"));
        assert!(is_valid_email("ann@example.xn--p1ai"));
        assert!(is_valid_email("用户@例子.广告"));
        assert!(!is_valid_email("ann@example.xn--"));
        assert!(!is_valid_email("jörg@x.c0m"));
        assert!(!is_valid_email("ann@bücher-.de"));
    }

    #[test]
    fn first_failing_rule_wins_per_field() {
        let mut errors = ValidationErrors::new();
        errors.push(FormField::Phone, FieldRule::Required);
        errors.push(FormField::Phone, FieldRule::Duplicate);
        errors.push(FormField::Email, FieldRule::EmailFormat);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.for_field(FormField::Phone), Some(FieldRule::Required));
        assert_eq!(
            errors.to_string(),
            "phone: This field is required.; email: Invalid email address."
        );
    }
}

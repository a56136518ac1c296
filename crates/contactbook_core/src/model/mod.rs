//! Contact book domain model.
//!
//! # Responsibility
//! - Define the persisted `Group` and `Contact` records.
//! - Define typed command inputs and their field-level validation.
//!
//! # Invariants
//! - Ids are integers assigned by storage.
//! - Inputs are validated field by field; no reflective binding.

pub mod contact;
pub mod group;
pub mod validation;

//! Command layer for groups and contacts.
//!
//! # Responsibility
//! - Validate submitted field sets, then issue one persistence unit of work.
//! - Return confirmations or structured `CommandError`s to the request layer.

pub mod command;
pub mod contact_service;
pub mod group_service;

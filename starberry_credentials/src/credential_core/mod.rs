//! Credential types of social login providers.
//!
//! Records, field definitions, picture transforms, the access policy and the
//! registry that assembles them into schema type sets.

pub mod access;
pub mod config;
pub mod fields;
pub mod picture;
pub mod registry;
pub mod types;

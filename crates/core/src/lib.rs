//! Domain rules for the labelflow annotation workflow.
//!
//! Everything in this crate is pure: no database, no HTTP. The db and api
//! crates build on these types and functions.

pub mod analytics;
pub mod capabilities;
pub mod error;
pub mod roles;
pub mod status;
pub mod types;
pub mod workflow;

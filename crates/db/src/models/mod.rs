//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - Request bodies (`Deserialize`) where an endpoint accepts one

pub mod analytics;
pub mod annotation;
pub mod data_sample;
pub mod project;
pub mod review;
pub mod user;

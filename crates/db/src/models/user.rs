//! User (actor) models.

use labelflow_core::error::CoreError;
use labelflow_core::roles::Role;
use labelflow_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Parse the stored role name.
    pub fn role(&self) -> Result<Role, CoreError> {
        self.role.parse()
    }
}

/// DTO for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub role: Role,
}

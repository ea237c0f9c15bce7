//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;
use crate::department::Department;

/// A user known to the directory.
///
/// Credentials live with the authentication provider; this record only
/// carries what authorization and routing need.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name, also used as the holder/distributee key.
    pub name: String,
    /// Email address (optional).
    pub email: Option<String>,
    pub department: Department,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a user record with a fresh id.
    pub fn new(
        name: impl Into<String>,
        email: Option<String>,
        department: Department,
        role: UserRole,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email,
            department,
            role,
            created_at: Utc::now(),
        }
    }

    /// Check if this user can review forwards for `department`.
    pub fn administers(&self, department: Department) -> bool {
        match self.role {
            UserRole::Superadmin => true,
            UserRole::Admin => self.department == department,
            UserRole::User => false,
        }
    }
}

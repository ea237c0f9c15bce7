//! The authenticated caller.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use filetrack_entity::{Department, User, UserRole};

/// Identity supplied by the authentication layer and trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub name: String,
    pub department: Department,
    pub role: UserRole,
}

impl Principal {
    pub fn is_superadmin(&self) -> bool {
        self.role.is_superadmin()
    }

    /// Admin or superadmin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Superadmin, or an admin whose department is `department`.
    pub fn administers(&self, department: Department) -> bool {
        match self.role {
            UserRole::Superadmin => true,
            UserRole::Admin => self.department == department,
            UserRole::User => false,
        }
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            department: user.department,
            role: user.role,
        }
    }
}

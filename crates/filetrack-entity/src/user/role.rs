//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use filetrack_core::AppError;

/// Roles available to the authorization policy.
///
/// Ordered by privilege level: Superadmin > Admin > User.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular employee.
    User,
    /// Department administrator.
    Admin,
    /// Unrestricted administrator.
    Superadmin,
}

impl UserRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Superadmin => 3,
            Self::Admin => 2,
            Self::User => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &UserRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Admins and superadmins.
    pub fn is_admin(&self) -> bool {
        self.has_at_least(&Self::Admin)
    }

    pub fn is_superadmin(&self) -> bool {
        matches!(self, Self::Superadmin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::Superadmin),
            _ => Err(AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: user, admin, superadmin"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_ordering() {
        assert!(UserRole::Superadmin.has_at_least(&UserRole::Admin));
        assert!(UserRole::Admin.has_at_least(&UserRole::Admin));
        assert!(!UserRole::User.has_at_least(&UserRole::Admin));
        assert!(UserRole::Superadmin.is_admin());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("SUPERADMIN".parse::<UserRole>().unwrap(), UserRole::Superadmin);
        assert!("manager".parse::<UserRole>().is_err());
    }
}

//! Department enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use filetrack_core::AppError;

/// The fixed set of departments files are routed between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "department")]
pub enum Department {
    #[sqlx(rename = "Administration")]
    Administration,
    #[sqlx(rename = "Finance")]
    Finance,
    #[serde(rename = "HR")]
    #[sqlx(rename = "HR")]
    Hr,
    #[serde(rename = "IT")]
    #[sqlx(rename = "IT")]
    It,
    #[sqlx(rename = "Procurement")]
    Procurement,
    #[sqlx(rename = "Legal")]
    Legal,
}

impl Department {
    /// Every department, in display order.
    pub const ALL: [Department; 6] = [
        Self::Administration,
        Self::Finance,
        Self::Hr,
        Self::It,
        Self::Procurement,
        Self::Legal,
    ];

    /// Return the department's display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administration => "Administration",
            Self::Finance => "Finance",
            Self::Hr => "HR",
            Self::It => "IT",
            Self::Procurement => "Procurement",
            Self::Legal => "Legal",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| {
                AppError::invalid_field("department", format!("Invalid department: '{s}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_names() {
        assert_eq!("HR".parse::<Department>().unwrap(), Department::Hr);
        assert_eq!("IT".parse::<Department>().unwrap(), Department::It);
        assert_eq!(Department::Finance.to_string(), "Finance");
    }

    #[test]
    fn test_rejects_unknown() {
        assert!("Marketing".parse::<Department>().is_err());
        assert!("hr".parse::<Department>().is_err());
    }

    #[test]
    fn test_serde_uses_display_name() {
        assert_eq!(serde_json::to_string(&Department::Hr).unwrap(), "\"HR\"");
        let parsed: Department = serde_json::from_str("\"Legal\"").unwrap();
        assert_eq!(parsed, Department::Legal);
    }
}

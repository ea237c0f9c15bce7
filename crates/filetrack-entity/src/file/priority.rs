//! Priority enumeration shared by files and forwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use filetrack_core::AppError;

/// Priority of a file or forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "priority")]
pub enum Priority {
    #[default]
    #[sqlx(rename = "Normal")]
    Normal,
    #[sqlx(rename = "Urgent")]
    Urgent,
    #[sqlx(rename = "Important")]
    Important,
    #[sqlx(rename = "Critical")]
    Critical,
}

impl Priority {
    /// Every priority, in declaration order.
    pub const ALL: [Priority; 4] = [Self::Normal, Self::Urgent, Self::Important, Self::Critical];

    /// Urgent and Critical items are flagged as urgent.
    pub fn is_urgent(&self) -> bool {
        matches!(self, Self::Urgent | Self::Critical)
    }

    /// Return the priority as a display string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Urgent => "Urgent",
            Self::Important => "Important",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                AppError::invalid_field(
                    "priority",
                    format!(
                        "Invalid priority: '{s}'. Expected one of: Normal, Urgent, Important, Critical"
                    ),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency() {
        assert!(Priority::Urgent.is_urgent());
        assert!(Priority::Critical.is_urgent());
        assert!(!Priority::Important.is_urgent());
        assert!(!Priority::Normal.is_urgent());
    }

    #[test]
    fn test_from_str_rejects_legacy_values() {
        assert_eq!("Critical".parse::<Priority>().unwrap(), Priority::Critical);
        let err = "Emergency".parse::<Priority>().unwrap_err();
        assert_eq!(err.kind, filetrack_core::ErrorKind::Validation);
    }
}

//! File status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use filetrack_core::AppError;

/// Lifecycle status of a file.
///
/// This is independent of any forward's status; the workflow engine keeps
/// the two in step at approval and receipt only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "file_status")]
pub enum FileStatus {
    #[sqlx(rename = "Created")]
    Created,
    #[sqlx(rename = "Received")]
    Received,
    #[serde(rename = "On Hold")]
    #[sqlx(rename = "On Hold")]
    OnHold,
    #[sqlx(rename = "Released")]
    Released,
    #[sqlx(rename = "Complete")]
    Complete,
}

impl FileStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [FileStatus; 5] = [
        Self::Created,
        Self::Received,
        Self::OnHold,
        Self::Released,
        Self::Complete,
    ];

    /// Return the status as a display string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Received => "Received",
            Self::OnHold => "On Hold",
            Self::Released => "Released",
            Self::Complete => "Complete",
        }
    }

    /// Icon used on the movement recorded for a manual status change.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Received => "📥",
            Self::Released => "📤",
            Self::Complete => "✅",
            _ => "🕒",
        }
    }

    /// `Complete` cannot be left through a manual update.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::invalid_field("status", format!("Invalid file status: '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_hold_round_trips_through_display_name() {
        assert_eq!("On Hold".parse::<FileStatus>().unwrap(), FileStatus::OnHold);
        assert_eq!(serde_json::to_string(&FileStatus::OnHold).unwrap(), "\"On Hold\"");
    }

    #[test]
    fn test_icons() {
        assert_eq!(FileStatus::Released.icon(), "📤");
        assert_eq!(FileStatus::OnHold.icon(), "🕒");
    }
}

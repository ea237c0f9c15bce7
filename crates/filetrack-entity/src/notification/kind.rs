//! Notification kind and priority enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use filetrack_core::AppError;

use crate::file::Priority;

/// The event that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FileCreated,
    FileReceived,
    FileForwarded,
    FileCompleted,
    FileUrgent,
    System,
    UserManagement,
    ForwardStatus,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 8] = [
        Self::FileCreated,
        Self::FileReceived,
        Self::FileForwarded,
        Self::FileCompleted,
        Self::FileUrgent,
        Self::System,
        Self::UserManagement,
        Self::ForwardStatus,
    ];

    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileCreated => "file_created",
            Self::FileReceived => "file_received",
            Self::FileForwarded => "file_forwarded",
            Self::FileCompleted => "file_completed",
            Self::FileUrgent => "file_urgent",
            Self::System => "system",
            Self::UserManagement => "user_management",
            Self::ForwardStatus => "forward_status",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                AppError::invalid_field("type", format!("Invalid notification type: '{s}'"))
            })
    }
}

/// Display priority of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl NotificationPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl From<Priority> for NotificationPriority {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Normal => Self::Normal,
            Priority::Important => Self::High,
            Priority::Urgent | Priority::Critical => Self::Urgent,
        }
    }
}

impl fmt::Display for NotificationPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationPriority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(AppError::invalid_field(
                "priority",
                format!("Invalid notification priority: '{s}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_mapping() {
        assert_eq!(NotificationPriority::from(Priority::Normal), NotificationPriority::Normal);
        assert_eq!(NotificationPriority::from(Priority::Important), NotificationPriority::High);
        assert_eq!(NotificationPriority::from(Priority::Urgent), NotificationPriority::Urgent);
        assert_eq!(NotificationPriority::from(Priority::Critical), NotificationPriority::Urgent);
    }

    #[test]
    fn test_kind_serde() {
        assert_eq!(
            serde_json::to_string(&NotificationKind::ForwardStatus).unwrap(),
            "\"forward_status\""
        );
        assert_eq!("file_forwarded".parse::<NotificationKind>().unwrap(), NotificationKind::FileForwarded);
    }
}

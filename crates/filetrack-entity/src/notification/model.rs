//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::{NotificationKind, NotificationPriority};

/// A notification delivered to a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user.
    pub recipient_id: Uuid,
    pub recipient_name: String,
    pub recipient_email: Option<String>,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub file_code: Option<String>,
    pub forward_id: Option<Uuid>,
    pub is_read: bool,
    pub is_urgent: bool,
    pub icon: String,
    pub priority: NotificationPriority,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    /// When the notification expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Check if the notification has expired as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }
}

/// Data for persisting a notification for a resolved recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub recipient_name: String,
    pub recipient_email: Option<String>,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub file_code: Option<String>,
    pub forward_id: Option<Uuid>,
    pub is_urgent: bool,
    pub icon: String,
    pub priority: NotificationPriority,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewNotification {
    /// Materialize an unread notification created now.
    pub fn into_notification(self) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient_id: self.recipient_id,
            recipient_name: self.recipient_name,
            recipient_email: self.recipient_email,
            title: self.title,
            message: self.message,
            kind: self.kind,
            file_code: self.file_code,
            forward_id: self.forward_id,
            is_read: false,
            is_urgent: self.is_urgent,
            icon: self.icon,
            priority: self.priority,
            created_at: Utc::now(),
            read_at: None,
            expires_at: self.expires_at,
        }
    }
}

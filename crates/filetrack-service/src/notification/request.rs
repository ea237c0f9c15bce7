//! Messages handed to the notification outbox.

use uuid::Uuid;

use filetrack_entity::{Department, NotificationKind, NotificationPriority};

use super::email::EmailTemplate;

/// Who a message is for. Resolved through the user directory when the
/// message is delivered, not when it is queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Id(Uuid),
    Name(String),
    NameInDepartment(String, Department),
}

/// An in-app notification, optionally with an email alongside.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub recipient: Recipient,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub file_code: Option<String>,
    pub forward_id: Option<Uuid>,
    pub is_urgent: bool,
    pub priority: NotificationPriority,
    pub icon: String,
    pub email: Option<EmailTemplate>,
}

impl NotificationRequest {
    pub fn new(
        recipient: Recipient,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            recipient,
            title: title.into(),
            message: message.into(),
            kind,
            file_code: None,
            forward_id: None,
            is_urgent: false,
            priority: NotificationPriority::Normal,
            icon: "📢".to_string(),
            email: None,
        }
    }

    pub fn file(mut self, file_code: impl Into<String>) -> Self {
        self.file_code = Some(file_code.into());
        self
    }

    pub fn forward(mut self, forward_id: Uuid) -> Self {
        self.forward_id = Some(forward_id);
        self
    }

    pub fn urgency(mut self, is_urgent: bool, priority: NotificationPriority) -> Self {
        self.is_urgent = is_urgent;
        self.priority = priority;
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_email(mut self, template: EmailTemplate) -> Self {
        self.email = Some(template);
        self
    }
}

/// One unit of outbox work.
#[derive(Debug, Clone)]
pub enum OutboxMessage {
    /// Persist a notification (and send its email, if any).
    Notify(NotificationRequest),
    /// Send an email with no in-app notification.
    Email {
        recipient: Recipient,
        template: EmailTemplate,
    },
}

impl From<NotificationRequest> for OutboxMessage {
    fn from(request: NotificationRequest) -> Self {
        Self::Notify(request)
    }
}

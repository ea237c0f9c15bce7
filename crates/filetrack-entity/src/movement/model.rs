//! Movement entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::action::MovementAction;

/// One append-only audit record of an action taken on a file.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: Uuid,
    pub file_code: String,
    /// The acting user.
    #[serde(rename = "user")]
    pub user_name: String,
    pub action: String,
    pub remarks: Option<String>,
    pub icon: Option<String>,
    pub sent_by: Option<String>,
    pub sent_through: Option<String>,
    pub recipient_name: Option<String>,
    pub datetime: DateTime<Utc>,
}

/// Data for appending a movement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMovement {
    pub file_code: String,
    pub user_name: String,
    pub action: String,
    pub remarks: Option<String>,
    pub icon: Option<String>,
    pub sent_by: Option<String>,
    pub sent_through: Option<String>,
    pub recipient_name: Option<String>,
}

impl NewMovement {
    /// Start a record for one of the workflow's own actions.
    pub fn for_action(
        file_code: impl Into<String>,
        user_name: impl Into<String>,
        action: MovementAction,
    ) -> Self {
        Self {
            file_code: file_code.into(),
            user_name: user_name.into(),
            action: action.label().to_string(),
            icon: Some(action.icon().to_string()),
            ..Default::default()
        }
    }

    pub fn remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    pub fn sent_by(mut self, sent_by: impl Into<String>) -> Self {
        self.sent_by = Some(sent_by.into());
        self
    }

    pub fn sent_through(mut self, sent_through: impl Into<String>) -> Self {
        self.sent_through = Some(sent_through.into());
        self
    }

    pub fn recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient_name = Some(recipient.into());
        self
    }

    /// Materialize the record with a fresh id and the current time.
    pub fn into_movement(self) -> Movement {
        Movement {
            id: Uuid::new_v4(),
            file_code: self.file_code,
            user_name: self.user_name,
            action: self.action,
            remarks: self.remarks,
            icon: self.icon,
            sent_by: self.sent_by,
            sent_through: self.sent_through,
            recipient_name: self.recipient_name,
            datetime: Utc::now(),
        }
    }
}

/// Administrative correction of an existing movement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovementCorrection {
    pub action: Option<String>,
    pub remarks: Option<String>,
    pub icon: Option<String>,
    pub sent_by: Option<String>,
    pub sent_through: Option<String>,
    pub recipient_name: Option<String>,
}

impl Movement {
    /// Apply an administrative correction in place.
    pub fn apply(&mut self, correction: &MovementCorrection) {
        if let Some(action) = &correction.action {
            self.action = action.clone();
        }
        if let Some(remarks) = &correction.remarks {
            self.remarks = Some(remarks.clone());
        }
        if let Some(icon) = &correction.icon {
            self.icon = Some(icon.clone());
        }
        if let Some(sent_by) = &correction.sent_by {
            self.sent_by = Some(sent_by.clone());
        }
        if let Some(sent_through) = &correction.sent_through {
            self.sent_through = Some(sent_through.clone());
        }
        if let Some(recipient) = &correction.recipient_name {
            self.recipient_name = Some(recipient.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_action_sets_label_and_icon() {
        let movement = NewMovement::for_action("THDC-F-2026-0001", "Hana", MovementAction::AdminRejected)
            .remarks("Admin Hana rejected: wrong department")
            .recipient("Uma")
            .into_movement();
        assert_eq!(movement.action, "Admin Rejected");
        assert_eq!(movement.icon.as_deref(), Some("❌"));
        assert_eq!(movement.recipient_name.as_deref(), Some("Uma"));
    }
}

//! Forward entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ForwardStatus;
use crate::department::Department;
use crate::file::Priority;

/// A request to route a file to another department.
///
/// A forward references its file by code. `recipient_name` and
/// `recipient_department` name the department admin the request was routed
/// to; the sender's intended addressee is kept in the `original_*` fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Forward {
    pub id: Uuid,
    pub file_code: String,
    pub recipient_department: Department,
    pub recipient_name: String,
    pub original_recipient_name: String,
    pub original_recipient_department: Department,
    pub sent_by: String,
    pub sent_through: Option<String>,
    pub priority: Priority,
    pub status: ForwardStatus,
    pub remarks: Option<String>,
    /// Always `priority.is_urgent()`.
    pub is_urgent: bool,
    pub sent_at: DateTime<Utc>,
    pub received_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub admin_approved_by: Option<String>,
    pub admin_approval_date: Option<DateTime<Utc>>,
    pub admin_remarks: Option<String>,
    /// The employee the admin distributed the file to.
    pub distributed_to: Option<String>,
    pub distribution_date: Option<DateTime<Utc>>,
}

impl Forward {
    /// Build a new pending forward routed to a department admin.
    pub fn new(input: NewForward) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_code: input.file_code,
            recipient_department: input.admin_department,
            recipient_name: input.admin_name,
            original_recipient_name: input.intended_recipient_name,
            original_recipient_department: input.intended_recipient_department,
            sent_by: input.sent_by,
            sent_through: input.sent_through,
            priority: input.priority,
            status: ForwardStatus::PendingAdminReview,
            remarks: input.remarks,
            is_urgent: input.priority.is_urgent(),
            sent_at: Utc::now(),
            received_at: None,
            completed_at: None,
            admin_approved_by: None,
            admin_approval_date: None,
            admin_remarks: None,
            distributed_to: None,
            distribution_date: None,
        }
    }

    /// Whether `name` is the employee this forward was distributed to.
    pub fn is_distributed_to(&self, name: &str) -> bool {
        self.distributed_to.as_deref() == Some(name)
    }

    /// Apply a set of changes in place, keeping `is_urgent` derived.
    pub fn apply(&mut self, changes: &ForwardChanges) {
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(sent_through) = &changes.sent_through {
            self.sent_through = Some(sent_through.clone());
        }
        if let Some(remarks) = &changes.remarks {
            self.remarks = Some(remarks.clone());
        }
        if let Some(by) = &changes.admin_approved_by {
            self.admin_approved_by = Some(by.clone());
        }
        if let Some(date) = changes.admin_approval_date {
            self.admin_approval_date = Some(date);
        }
        if let Some(remarks) = &changes.admin_remarks {
            self.admin_remarks = Some(remarks.clone());
        }
        if let Some(to) = &changes.distributed_to {
            self.distributed_to = Some(to.clone());
        }
        if let Some(date) = changes.distribution_date {
            self.distribution_date = Some(date);
        }
        if let Some(at) = changes.received_at {
            self.received_at = Some(at);
        }
        if let Some(at) = changes.completed_at {
            self.completed_at = Some(at);
        }
        self.is_urgent = self.priority.is_urgent();
    }
}

/// Input for creating a forward once the department admin is resolved.
#[derive(Debug, Clone)]
pub struct NewForward {
    pub file_code: String,
    pub intended_recipient_name: String,
    pub intended_recipient_department: Department,
    pub admin_name: String,
    pub admin_department: Department,
    pub sent_by: String,
    pub sent_through: Option<String>,
    pub priority: Priority,
    pub remarks: Option<String>,
}

/// A partial update of a forward; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForwardChanges {
    pub status: Option<ForwardStatus>,
    pub priority: Option<Priority>,
    pub sent_through: Option<String>,
    pub remarks: Option<String>,
    pub admin_approved_by: Option<String>,
    pub admin_approval_date: Option<DateTime<Utc>>,
    pub admin_remarks: Option<String>,
    pub distributed_to: Option<String>,
    pub distribution_date: Option<DateTime<Utc>>,
    pub received_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(priority: Priority) -> Forward {
        Forward::new(NewForward {
            file_code: "THDC-F-2026-0001".into(),
            intended_recipient_name: "Alice".into(),
            intended_recipient_department: Department::Hr,
            admin_name: "Hana".into(),
            admin_department: Department::Hr,
            sent_by: "Uma".into(),
            sent_through: None,
            priority,
            remarks: None,
        })
    }

    #[test]
    fn test_new_is_pending_and_routed_to_admin() {
        let forward = sample(Priority::Critical);
        assert_eq!(forward.status, ForwardStatus::PendingAdminReview);
        assert_eq!(forward.recipient_name, "Hana");
        assert_eq!(forward.original_recipient_name, "Alice");
        assert!(forward.is_urgent);
    }

    #[test]
    fn test_apply_recomputes_urgency() {
        let mut forward = sample(Priority::Urgent);
        forward.apply(&ForwardChanges {
            priority: Some(Priority::Important),
            ..Default::default()
        });
        assert!(!forward.is_urgent);
        forward.apply(&ForwardChanges {
            priority: Some(Priority::Critical),
            ..Default::default()
        });
        assert!(forward.is_urgent);
    }
}

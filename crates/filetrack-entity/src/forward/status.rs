//! Forward status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use filetrack_core::AppError;

/// Lifecycle status of a forward.
///
/// ```text
/// Pending Admin Review -> Distributed to Employee -> Received -> Completed
/// Pending Admin Review -> Rejected
/// ```
///
/// `Admin Approved` and `In Transit` are reserved: they are accepted when
/// reading and filtering but no transition produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "forward_status")]
pub enum ForwardStatus {
    #[serde(rename = "Pending Admin Review")]
    #[sqlx(rename = "Pending Admin Review")]
    PendingAdminReview,
    #[serde(rename = "Admin Approved")]
    #[sqlx(rename = "Admin Approved")]
    AdminApproved,
    #[serde(rename = "Distributed to Employee")]
    #[sqlx(rename = "Distributed to Employee")]
    DistributedToEmployee,
    #[serde(rename = "In Transit")]
    #[sqlx(rename = "In Transit")]
    InTransit,
    #[sqlx(rename = "Received")]
    Received,
    #[sqlx(rename = "Completed")]
    Completed,
    #[sqlx(rename = "Rejected")]
    Rejected,
}

impl ForwardStatus {
    /// Every status, including the reserved ones.
    pub const ALL: [ForwardStatus; 7] = [
        Self::PendingAdminReview,
        Self::AdminApproved,
        Self::DistributedToEmployee,
        Self::InTransit,
        Self::Received,
        Self::Completed,
        Self::Rejected,
    ];

    /// Return the status as a display string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingAdminReview => "Pending Admin Review",
            Self::AdminApproved => "Admin Approved",
            Self::DistributedToEmployee => "Distributed to Employee",
            Self::InTransit => "In Transit",
            Self::Received => "Received",
            Self::Completed => "Completed",
            Self::Rejected => "Rejected",
        }
    }

    /// Completed and Rejected forwards accept no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    /// Whether the workflow can move a forward from `self` to `next`.
    pub fn can_transition_to(&self, next: ForwardStatus) -> bool {
        matches!(
            (self, next),
            (Self::PendingAdminReview, Self::DistributedToEmployee)
                | (Self::PendingAdminReview, Self::Rejected)
                | (Self::DistributedToEmployee, Self::Received)
                | (Self::Received, Self::Completed)
        )
    }
}

impl fmt::Display for ForwardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForwardStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                AppError::invalid_field("status", format!("Invalid forward status: '{s}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_cannot_skip_distribution() {
        let pending = ForwardStatus::PendingAdminReview;
        assert!(!pending.can_transition_to(ForwardStatus::Received));
        assert!(!pending.can_transition_to(ForwardStatus::Completed));
        assert!(pending.can_transition_to(ForwardStatus::DistributedToEmployee));
        assert!(pending.can_transition_to(ForwardStatus::Rejected));
    }

    #[test]
    fn test_reserved_states_are_unreachable() {
        for from in ForwardStatus::ALL {
            assert!(!from.can_transition_to(ForwardStatus::AdminApproved));
            assert!(!from.can_transition_to(ForwardStatus::InTransit));
        }
    }

    #[test]
    fn test_terminal_states_have_no_exit() {
        for to in ForwardStatus::ALL {
            assert!(!ForwardStatus::Completed.can_transition_to(to));
            assert!(!ForwardStatus::Rejected.can_transition_to(to));
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "Distributed to Employee".parse::<ForwardStatus>().unwrap(),
            ForwardStatus::DistributedToEmployee
        );
        assert!("Delivered".parse::<ForwardStatus>().is_err());
    }
}

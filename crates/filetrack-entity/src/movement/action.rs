//! The action vocabulary written by the workflow.

use std::fmt;

/// Actions the workflow records on the ledger.
///
/// Stored as free text, so manual entries may use other labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementAction {
    Created,
    Released,
    ForwardedToAdmin,
    AdminApprovedAndDistributed,
    AdminRejected,
    FileReceived,
    FileCompleted,
}

impl MovementAction {
    /// The label stored in `movements.action`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Released => "Released",
            Self::ForwardedToAdmin => "Forwarded to Admin",
            Self::AdminApprovedAndDistributed => "Admin Approved & Distributed",
            Self::AdminRejected => "Admin Rejected",
            Self::FileReceived => "File Received",
            Self::FileCompleted => "File Completed",
        }
    }

    /// Display icon.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Created => "📄",
            Self::Released => "📤",
            Self::ForwardedToAdmin => "📤",
            Self::AdminApprovedAndDistributed => "✅",
            Self::AdminRejected => "❌",
            Self::FileReceived => "📥",
            Self::FileCompleted => "✅",
        }
    }
}

impl fmt::Display for MovementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

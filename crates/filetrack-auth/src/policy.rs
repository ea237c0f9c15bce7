//! Department/role-scoped authorization policy.
//!
//! A pure, total predicate: every combination of role, department and
//! ownership yields [`PolicyDecision::Allow`] or a specific
//! [`DenyReason`]. Rules are evaluated in this order:
//!
//! 1. a superadmin may act on anything;
//! 2. an admin may act on entities of their own department (a forward's
//!    recipient department, a file's department);
//! 3. anyone may create files, forward a file they hold, and receive or
//!    complete a forward distributed to them;
//! 4. everything else is denied.
//!
//! Receiving and completing are personal: only the distributee may do
//! either, whatever their role.

use std::fmt;

use filetrack_core::{AppError, AppResult};
use filetrack_entity::{Department, File, Forward};

use crate::principal::Principal;

/// What the caller is trying to do, with the entity it targets.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    CreateFile,
    ForwardFile(&'a File),
    ReleaseFile(&'a File),
    UpdateFile(&'a File),
    DeleteFile(&'a File),
    ApproveForward(&'a Forward),
    RejectForward(&'a Forward),
    ReceiveForward(&'a Forward),
    CompleteForward(&'a Forward),
    UpdateForward(&'a Forward),
    DeleteForward(&'a Forward),
    /// List the files of a department.
    ViewDepartmentFiles(Department),
    /// See a department's review queue and forward statistics.
    ViewDepartmentForwards(Department),
    /// List another user's created files.
    ViewCreatorFiles(&'a str),
    ViewReceivedFiles,
    ManageMovements,
    CreateNotification,
}

/// Why an action was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The role can never perform the action.
    RoleMismatch(&'static str),
    /// An admin acting outside their department.
    DepartmentMismatch(&'static str),
    /// The caller does not hold, own or receive the entity.
    OwnershipMismatch(&'static str),
}

impl DenyReason {
    /// The message surfaced to callers.
    pub fn message(&self) -> &'static str {
        match self {
            Self::RoleMismatch(m) | Self::DepartmentMismatch(m) | Self::OwnershipMismatch(m) => m,
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of a policy check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    Deny(DenyReason),
}

impl PolicyDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Convert into a result, mapping a denial to an authorization error.
    pub fn into_result(self) -> AppResult<()> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(AppError::authorization(reason.message())),
        }
    }
}

use DenyReason::{DepartmentMismatch, OwnershipMismatch, RoleMismatch};
use PolicyDecision::{Allow, Deny};

/// Admin-of-department check shared by most rules.
///
/// `owner_allowed` lets a non-admin (or an admin of another department)
/// through when they own the entity; otherwise the admin gets the
/// department reason and a plain user gets `non_admin`.
fn department_rule(
    actor: &Principal,
    department: Department,
    owner_allowed: bool,
    dept_reason: &'static str,
    non_admin: DenyReason,
) -> PolicyDecision {
    if actor.administers(department) || owner_allowed {
        Allow
    } else if actor.is_admin() {
        Deny(DepartmentMismatch(dept_reason))
    } else {
        Deny(non_admin)
    }
}

/// Decide whether `actor` may perform `action`.
pub fn can_transition(actor: &Principal, action: &Action<'_>) -> PolicyDecision {
    match *action {
        Action::CreateFile => Allow,

        Action::ForwardFile(file) => {
            if actor.is_superadmin()
                || file.is_held_by(&actor.name)
                || actor.administers(file.department)
            {
                Allow
            } else {
                Deny(OwnershipMismatch("You can only forward files you currently hold"))
            }
        }

        Action::ReleaseFile(file) => department_rule(
            actor,
            file.department,
            false,
            "Not authorized to release files for this department",
            RoleMismatch("Only admins can release files"),
        ),

        Action::UpdateFile(file) => department_rule(
            actor,
            file.department,
            file.is_held_by(&actor.name),
            "Not authorized to update files for this department",
            OwnershipMismatch("You can only update files you currently hold"),
        ),

        Action::DeleteFile(file) => department_rule(
            actor,
            file.department,
            false,
            "Not authorized to delete files for this department",
            RoleMismatch("Only admins can delete files"),
        ),

        Action::ApproveForward(forward) => department_rule(
            actor,
            forward.recipient_department,
            false,
            "Not authorized to approve forwards for this department",
            RoleMismatch("Only department admins can approve forwards"),
        ),

        Action::RejectForward(forward) => department_rule(
            actor,
            forward.recipient_department,
            false,
            "Not authorized to reject forwards for this department",
            RoleMismatch("Only department admins can reject forwards"),
        ),

        Action::ReceiveForward(forward) => {
            if forward.is_distributed_to(&actor.name) {
                Allow
            } else {
                Deny(OwnershipMismatch("You are not authorized to receive this file"))
            }
        }

        Action::CompleteForward(forward) => {
            if forward.is_distributed_to(&actor.name) {
                Allow
            } else {
                Deny(OwnershipMismatch("You are not authorized to complete this file"))
            }
        }

        Action::UpdateForward(forward) => department_rule(
            actor,
            forward.recipient_department,
            forward.sent_by == actor.name,
            "Not authorized to modify forwards for this department",
            OwnershipMismatch("You can only modify forwards you sent"),
        ),

        Action::DeleteForward(forward) => department_rule(
            actor,
            forward.recipient_department,
            forward.sent_by == actor.name,
            "Not authorized to delete forwards for this department",
            OwnershipMismatch("You can only delete forwards you sent"),
        ),

        Action::ViewDepartmentFiles(department) => {
            if actor.is_superadmin() || actor.department == department {
                Allow
            } else {
                Deny(DepartmentMismatch(
                    "Not authorized to view files for this department",
                ))
            }
        }

        Action::ViewDepartmentForwards(department) => department_rule(
            actor,
            department,
            false,
            "Not authorized to view forwards for this department",
            RoleMismatch("Only admins can view department forwards"),
        ),

        Action::ViewCreatorFiles(creator) => {
            if actor.is_admin() || actor.name == creator {
                Allow
            } else {
                Deny(OwnershipMismatch("You can only view your own files"))
            }
        }

        Action::ViewReceivedFiles => admin_only(actor, "Only admins can view received files"),
        Action::ManageMovements => admin_only(actor, "Only admins can modify movement records"),
        Action::CreateNotification => admin_only(actor, "Only admins can create notifications"),
    }
}

fn admin_only(actor: &Principal, reason: &'static str) -> PolicyDecision {
    if actor.is_admin() {
        Allow
    } else {
        Deny(RoleMismatch(reason))
    }
}

/// [`can_transition`] as a result, logging denials.
pub fn authorize(actor: &Principal, action: &Action<'_>) -> AppResult<()> {
    let decision = can_transition(actor, action);
    if let Deny(reason) = &decision {
        tracing::debug!(actor = %actor.name, role = %actor.role, %reason, "Policy denied action");
    }
    decision.into_result()
}

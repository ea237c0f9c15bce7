//! Role-scoped visibility for list and search queries.
//!
//! A superadmin sees everything. A user sees the files they hold, were
//! assigned, created or requested. An admin sees every file of their
//! department plus the ones they hold or were assigned.

use filetrack_database::filter::{FileScopeTerm, ForwardScopeTerm};

use crate::context::RequestContext;

/// The file scope for the caller; `None` means unrestricted.
pub fn file_scope(ctx: &RequestContext) -> Option<Vec<FileScopeTerm>> {
    if ctx.is_superadmin() {
        return None;
    }
    let name = ctx.actor().to_string();
    let terms = if ctx.is_admin() {
        vec![
            FileScopeTerm::Department(ctx.department()),
            FileScopeTerm::CurrentHolder(name.clone()),
            FileScopeTerm::AssignedTo(name),
        ]
    } else {
        vec![
            FileScopeTerm::CurrentHolder(name.clone()),
            FileScopeTerm::AssignedTo(name.clone()),
            FileScopeTerm::CreatedBy(name.clone()),
            FileScopeTerm::Requisitioner(name),
        ]
    };
    Some(terms)
}

/// The forward scope for the caller; `None` means unrestricted.
///
/// Admins see forwards routed to their department; everyone sees the
/// forwards they sent and the ones distributed to them.
pub fn forward_scope(ctx: &RequestContext) -> Option<Vec<ForwardScopeTerm>> {
    if ctx.is_superadmin() {
        return None;
    }
    let name = ctx.actor().to_string();
    let mut terms = vec![
        ForwardScopeTerm::SentBy(name.clone()),
        ForwardScopeTerm::DistributedTo(name),
    ];
    if ctx.is_admin() {
        terms.insert(0, ForwardScopeTerm::RecipientDepartment(ctx.department()));
    }
    Some(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetrack_auth::Principal;
    use filetrack_entity::{Department, UserRole};
    use uuid::Uuid;

    fn ctx(role: UserRole) -> RequestContext {
        RequestContext::new(Principal {
            id: Uuid::new_v4(),
            name: "Hana".into(),
            department: Department::Hr,
            role,
        })
    }

    #[test]
    fn test_superadmin_is_unrestricted() {
        assert!(file_scope(&ctx(UserRole::Superadmin)).is_none());
        assert!(forward_scope(&ctx(UserRole::Superadmin)).is_none());
    }

    #[test]
    fn test_admin_scope_includes_department() {
        let scope = file_scope(&ctx(UserRole::Admin)).unwrap();
        assert!(scope.contains(&FileScopeTerm::Department(Department::Hr)));
        assert!(scope.contains(&FileScopeTerm::CurrentHolder("Hana".into())));
    }

    #[test]
    fn test_user_scope_has_no_department() {
        let scope = file_scope(&ctx(UserRole::User)).unwrap();
        assert!(
            !scope
                .iter()
                .any(|term| matches!(term, FileScopeTerm::Department(_)))
        );
        let forwards = forward_scope(&ctx(UserRole::User)).unwrap();
        assert_eq!(forwards.len(), 2);
    }
}

//! Resolution of the admin who reviews forwards for a department.

use std::sync::Arc;

use async_trait::async_trait;

use filetrack_core::AppResult;
use filetrack_database::UserDirectory;
use filetrack_entity::{Department, User};

/// Picks the reviewing admin for a department.
#[async_trait]
pub trait AdminResolver: Send + Sync {
    /// The admin for `department`, or `None` when the department has none.
    async fn resolve(&self, department: Department) -> AppResult<Option<User>>;
}

/// Chooses the earliest-registered admin or superadmin of the department.
#[derive(Clone)]
pub struct FirstAdminResolver {
    users: Arc<dyn UserDirectory>,
}

impl FirstAdminResolver {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }
}

impl std::fmt::Debug for FirstAdminResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirstAdminResolver").finish_non_exhaustive()
    }
}

#[async_trait]
impl AdminResolver for FirstAdminResolver {
    async fn resolve(&self, department: Department) -> AppResult<Option<User>> {
        self.users.find_admin_for_department(department).await
    }
}

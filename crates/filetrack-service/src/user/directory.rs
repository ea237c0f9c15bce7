//! Employee lookups for the distribution picker.

use std::sync::Arc;

use filetrack_auth::{Action, authorize};
use filetrack_core::AppResult;
use filetrack_database::UserDirectory;
use filetrack_entity::{Department, User};

use crate::context::RequestContext;

#[derive(Clone)]
pub struct DirectoryService {
    users: Arc<dyn UserDirectory>,
}

impl std::fmt::Debug for DirectoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryService").finish_non_exhaustive()
    }
}

impl DirectoryService {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Users of `department`, ordered by name.
    ///
    /// Open to the department's admins, who pick a distributee from it.
    pub async fn employees(&self, ctx: &RequestContext, department: Department) -> AppResult<Vec<User>> {
        authorize(&ctx.principal, &Action::ViewDepartmentForwards(department))?;
        self.users.list_by_department(department).await
    }
}

//! Request context carrying the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use filetrack_auth::Principal;
use filetrack_entity::{Department, UserRole};

/// Context for the current authenticated request.
///
/// Built by the API layer from verified token claims and passed into
/// every service method so each operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated caller.
    pub principal: Principal,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            request_time: Utc::now(),
        }
    }

    /// The caller's display name, as recorded on files and movements.
    pub fn actor(&self) -> &str {
        &self.principal.name
    }

    pub fn department(&self) -> Department {
        self.principal.department
    }

    pub fn role(&self) -> UserRole {
        self.principal.role
    }

    /// Returns whether the caller is an admin or superadmin.
    pub fn is_admin(&self) -> bool {
        self.principal.is_admin()
    }

    pub fn is_superadmin(&self) -> bool {
        self.principal.is_superadmin()
    }
}

impl From<Principal> for RequestContext {
    fn from(principal: Principal) -> Self {
        Self::new(principal)
    }
}

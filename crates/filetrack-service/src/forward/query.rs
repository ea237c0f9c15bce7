//! Forward listings and per-department statistics.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use filetrack_auth::{Action, authorize};
use filetrack_core::types::pagination::{PageRequest, PageResponse};
use filetrack_core::{AppError, AppResult};
use filetrack_database::filter::{ForwardFilter, ForwardScopeTerm};
use filetrack_database::{FileStore, ForwardStore};
use filetrack_entity::{Department, Forward, ForwardStatus};

use crate::context::RequestContext;
use crate::scope::forward_scope;

/// Caller-supplied filters for [`ForwardQueryService::list`].
#[derive(Debug, Clone, Default)]
pub struct ForwardQuery {
    pub status: Option<ForwardStatus>,
    pub urgent: Option<bool>,
    pub department: Option<Department>,
}

/// Forward counts for one recipient department.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentForwardStats {
    pub total_forwards: u64,
    pub pending_admin_review: u64,
    pub admin_approved: u64,
    pub distributed_to_employee: u64,
    pub received: u64,
    pub completed: u64,
    pub rejected: u64,
    pub urgent_forwards: u64,
    pub today_forwards: u64,
    pub this_week_forwards: u64,
}

/// Read-only projections over forwards.
#[derive(Clone)]
pub struct ForwardQueryService {
    forwards: Arc<dyn ForwardStore>,
    files: Arc<dyn FileStore>,
}

impl std::fmt::Debug for ForwardQueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwardQueryService").finish_non_exhaustive()
    }
}

impl ForwardQueryService {
    pub fn new(forwards: Arc<dyn ForwardStore>, files: Arc<dyn FileStore>) -> Self {
        Self { forwards, files }
    }

    fn scoped(ctx: &RequestContext) -> ForwardFilter {
        ForwardFilter {
            scope: forward_scope(ctx),
            ..Default::default()
        }
    }

    /// Forwards visible to the caller, most recently sent first.
    pub async fn list(&self, ctx: &RequestContext, query: ForwardQuery) -> AppResult<Vec<Forward>> {
        let filter = ForwardFilter {
            status: query.status,
            urgent: query.urgent,
            recipient_department: query.department,
            ..Self::scoped(ctx)
        };
        self.forwards.list(&filter).await
    }

    /// Every forward of one file. The file must exist.
    pub async fn for_file(&self, ctx: &RequestContext, file_code: &str) -> AppResult<Vec<Forward>> {
        if self.files.find_by_code(file_code).await?.is_none() {
            return Err(AppError::not_found("File not found"));
        }
        let filter = ForwardFilter {
            file_code: Some(file_code.to_string()),
            ..Self::scoped(ctx)
        };
        self.forwards.list(&filter).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Forward> {
        self.forwards
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Forward not found"))
    }

    /// The review queue of a department, newest first.
    pub async fn pending_for_department(
        &self,
        ctx: &RequestContext,
        department: Department,
    ) -> AppResult<Vec<Forward>> {
        authorize(&ctx.principal, &Action::ViewDepartmentForwards(department))?;
        let filter = ForwardFilter {
            recipient_department: Some(department),
            status: Some(ForwardStatus::PendingAdminReview),
            ..Default::default()
        };
        self.forwards.list(&filter).await
    }

    /// All forwards routed to a department, one page at a time.
    pub async fn department_forwards(
        &self,
        ctx: &RequestContext,
        department: Department,
        status: Option<ForwardStatus>,
        urgent_only: bool,
        page: PageRequest,
    ) -> AppResult<PageResponse<Forward>> {
        authorize(&ctx.principal, &Action::ViewDepartmentForwards(department))?;
        let filter = ForwardFilter {
            recipient_department: Some(department),
            status,
            urgent: urgent_only.then_some(true),
            ..Default::default()
        };
        self.forwards.list_page(&filter, &page).await
    }

    pub async fn urgent(&self, ctx: &RequestContext) -> AppResult<Vec<Forward>> {
        let filter = ForwardFilter {
            urgent: Some(true),
            ..Self::scoped(ctx)
        };
        self.forwards.list(&filter).await
    }

    pub async fn by_status(&self, ctx: &RequestContext, status: ForwardStatus) -> AppResult<Vec<Forward>> {
        let filter = ForwardFilter {
            status: Some(status),
            ..Self::scoped(ctx)
        };
        self.forwards.list(&filter).await
    }

    /// Forwards the caller sent.
    pub async fn sent(&self, ctx: &RequestContext) -> AppResult<Vec<Forward>> {
        let filter = ForwardFilter {
            scope: Some(vec![ForwardScopeTerm::SentBy(ctx.actor().to_string())]),
            ..Default::default()
        };
        self.forwards.list(&filter).await
    }

    /// Forwards distributed to the caller.
    pub async fn incoming(&self, ctx: &RequestContext) -> AppResult<Vec<Forward>> {
        let filter = ForwardFilter {
            scope: Some(vec![ForwardScopeTerm::DistributedTo(
                ctx.actor().to_string(),
            )]),
            ..Default::default()
        };
        self.forwards.list(&filter).await
    }

    pub async fn department_stats(
        &self,
        ctx: &RequestContext,
        department: Department,
    ) -> AppResult<DepartmentForwardStats> {
        authorize(&ctx.principal, &Action::ViewDepartmentForwards(department))?;
        let filter = ForwardFilter {
            recipient_department: Some(department),
            ..Default::default()
        };
        let forwards = self.forwards.list(&filter).await?;
        Ok(department_stats(&forwards))
    }
}

fn department_stats(forwards: &[Forward]) -> DepartmentForwardStats {
    let now = Utc::now();
    let today = now.date_naive();
    let week_ago = now - Duration::days(7);
    let count = |status: ForwardStatus| forwards.iter().filter(|f| f.status == status).count() as u64;

    DepartmentForwardStats {
        total_forwards: forwards.len() as u64,
        pending_admin_review: count(ForwardStatus::PendingAdminReview),
        admin_approved: count(ForwardStatus::AdminApproved),
        distributed_to_employee: count(ForwardStatus::DistributedToEmployee),
        received: count(ForwardStatus::Received),
        completed: count(ForwardStatus::Completed),
        rejected: count(ForwardStatus::Rejected),
        urgent_forwards: forwards.iter().filter(|f| f.is_urgent).count() as u64,
        today_forwards: forwards
            .iter()
            .filter(|f| f.sent_at.date_naive() == today)
            .count() as u64,
        this_week_forwards: forwards.iter().filter(|f| f.sent_at >= week_ago).count() as u64,
    }
}

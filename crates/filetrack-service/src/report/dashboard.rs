//! Dashboard statistics derived from the file, forward and movement stores.
//!
//! Every figure is recomputed from current store state over the caller's
//! visibility scope; nothing here writes.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;

use filetrack_core::AppResult;
use filetrack_database::filter::{FileFilter, ForwardFilter, MovementFilter};
use filetrack_database::{FileStore, ForwardStore, MovementStore, UserDirectory};
use filetrack_entity::{
    Department, File, FileKind, FileStatus, Forward, ForwardStatus, Movement, Priority,
};

use crate::context::RequestContext;
use crate::scope::{file_scope, forward_scope};

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_files: u64,
    pub files_today: u64,
    pub pending_files: u64,
    pub completed_files: u64,
    pub urgent_files: u64,
    pub digital_files: u64,
    pub physical_files: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentBreakdown {
    pub department: Department,
    pub count: u64,
    pub pending: u64,
    pub completed: u64,
    pub urgent: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: FileStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentForwardCounts {
    pub total: u64,
    pub pending_admin_review: u64,
    pub distributed: u64,
    pub completed: u64,
    pub urgent: u64,
}

/// Forward counts per status, including the reserved ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardingStats {
    pub total_forwards: u64,
    pub pending_admin_review: u64,
    pub admin_approved: u64,
    pub distributed_to_employee: u64,
    pub in_transit_forwards: u64,
    pub received_forwards: u64,
    pub completed_forwards: u64,
    pub rejected_forwards: u64,
    pub urgent_forwards: u64,
    pub by_department: BTreeMap<Department, DepartmentForwardCounts>,
}

/// Files created and currently held by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub name: String,
    pub department: Department,
    pub files_created: u64,
    pub files_received: u64,
}

/// Builds dashboard projections.
#[derive(Clone)]
pub struct ReportService {
    files: Arc<dyn FileStore>,
    forwards: Arc<dyn ForwardStore>,
    movements: Arc<dyn MovementStore>,
    users: Arc<dyn UserDirectory>,
}

impl std::fmt::Debug for ReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportService").finish_non_exhaustive()
    }
}

impl ReportService {
    pub fn new(
        files: Arc<dyn FileStore>,
        forwards: Arc<dyn ForwardStore>,
        movements: Arc<dyn MovementStore>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            files,
            forwards,
            movements,
            users,
        }
    }

    async fn visible_files(
        &self,
        ctx: &RequestContext,
        department: Option<Department>,
    ) -> AppResult<Vec<File>> {
        let filter = FileFilter {
            scope: file_scope(ctx),
            department,
            ..Default::default()
        };
        self.files.list(&filter).await
    }

    pub async fn dashboard_stats(
        &self,
        ctx: &RequestContext,
        department: Option<Department>,
    ) -> AppResult<DashboardStats> {
        let files = self.visible_files(ctx, department).await?;
        let today = Utc::now().date_naive();

        Ok(DashboardStats {
            total_files: files.len() as u64,
            files_today: count_where(&files, |f| f.created_at.date_naive() == today),
            pending_files: count_where(&files, |f| f.status == FileStatus::OnHold),
            completed_files: count_where(&files, |f| f.status == FileStatus::Complete),
            urgent_files: count_where(&files, |f| f.priority.is_urgent()),
            digital_files: count_where(&files, |f| f.kind == FileKind::Digital),
            physical_files: count_where(&files, |f| f.kind == FileKind::Physical),
        })
    }

    /// Counts per department, every department listed.
    pub async fn department_breakdown(&self, ctx: &RequestContext) -> AppResult<Vec<DepartmentBreakdown>> {
        let files = self.visible_files(ctx, None).await?;
        Ok(Department::ALL
            .into_iter()
            .map(|department| {
                let in_dept: Vec<&File> =
                    files.iter().filter(|f| f.department == department).collect();
                DepartmentBreakdown {
                    department,
                    count: in_dept.len() as u64,
                    pending: in_dept
                        .iter()
                        .filter(|f| f.status == FileStatus::OnHold)
                        .count() as u64,
                    completed: in_dept
                        .iter()
                        .filter(|f| f.status == FileStatus::Complete)
                        .count() as u64,
                    urgent: in_dept.iter().filter(|f| f.priority.is_urgent()).count() as u64,
                }
            })
            .collect())
    }

    pub async fn status_distribution(&self, ctx: &RequestContext) -> AppResult<Vec<StatusCount>> {
        let files = self.visible_files(ctx, None).await?;
        Ok(FileStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: files.iter().filter(|f| f.status == status).count() as u64,
            })
            .collect())
    }

    pub async fn priority_distribution(&self, ctx: &RequestContext) -> AppResult<Vec<PriorityCount>> {
        let files = self.visible_files(ctx, None).await?;
        Ok(Priority::ALL
            .into_iter()
            .map(|priority| PriorityCount {
                priority,
                count: files.iter().filter(|f| f.priority == priority).count() as u64,
            })
            .collect())
    }

    pub async fn forwarding_stats(&self, ctx: &RequestContext) -> AppResult<ForwardingStats> {
        let filter = ForwardFilter {
            scope: forward_scope(ctx),
            ..Default::default()
        };
        let forwards = self.forwards.list(&filter).await?;
        Ok(forwarding_stats(&forwards))
    }

    /// Per-user file counts over the caller's visible files. Superadmins
    /// see every user, admins their department, users themselves.
    pub async fn user_stats(&self, ctx: &RequestContext) -> AppResult<Vec<UserStats>> {
        let departments: Vec<Department> = if ctx.is_superadmin() {
            Department::ALL.to_vec()
        } else {
            vec![ctx.department()]
        };
        let (files, directory) = futures::try_join!(
            self.visible_files(ctx, None),
            futures::future::try_join_all(
                departments
                    .into_iter()
                    .map(|department| self.users.list_by_department(department)),
            )
        )?;

        Ok(directory
            .into_iter()
            .flatten()
            .filter(|user| ctx.is_admin() || user.name == ctx.actor())
            .map(|user| UserStats {
                files_created: count_where(&files, |f| f.created_by == user.name),
                files_received: count_where(&files, |f| f.current_holder == user.name),
                name: user.name,
                department: user.department,
            })
            .collect())
    }

    /// The latest movements on files the caller can see.
    pub async fn recent_activity(&self, ctx: &RequestContext, limit: u64) -> AppResult<Vec<Movement>> {
        self.visible_movements(ctx, MovementFilter::default(), Some(limit))
            .await
    }

    /// Movements of the last `days` days, newest first.
    pub async fn timeline(&self, ctx: &RequestContext, days: i64) -> AppResult<Vec<Movement>> {
        let filter = MovementFilter {
            since: Some(Utc::now() - Duration::days(days.max(0))),
            ..Default::default()
        };
        self.visible_movements(ctx, filter, None).await
    }

    async fn visible_movements(
        &self,
        ctx: &RequestContext,
        filter: MovementFilter,
        limit: Option<u64>,
    ) -> AppResult<Vec<Movement>> {
        if ctx.is_superadmin() {
            return self.movements.list(&filter, limit).await;
        }
        let (files, movements) = futures::try_join!(
            self.visible_files(ctx, None),
            self.movements.list(&filter, None)
        )?;
        let codes: HashSet<String> = files.into_iter().map(|f| f.code).collect();
        let visible = movements
            .into_iter()
            .filter(|m| codes.contains(&m.file_code));
        Ok(match limit {
            Some(limit) => visible.take(limit as usize).collect(),
            None => visible.collect(),
        })
    }
}

fn count_where<T>(items: &[T], pred: impl Fn(&T) -> bool) -> u64 {
    items.iter().filter(|item| pred(item)).count() as u64
}

fn forwarding_stats(forwards: &[Forward]) -> ForwardingStats {
    let count = |status: ForwardStatus| forwards.iter().filter(|f| f.status == status).count() as u64;

    let by_department = Department::ALL
        .into_iter()
        .map(|department| {
            let in_dept: Vec<&Forward> = forwards
                .iter()
                .filter(|f| f.recipient_department == department)
                .collect();
            let count = |status: ForwardStatus| in_dept.iter().filter(|f| f.status == status).count() as u64;
            let counts = DepartmentForwardCounts {
                total: in_dept.len() as u64,
                pending_admin_review: count(ForwardStatus::PendingAdminReview),
                distributed: count(ForwardStatus::DistributedToEmployee),
                completed: count(ForwardStatus::Completed),
                urgent: in_dept.iter().filter(|f| f.is_urgent).count() as u64,
            };
            (department, counts)
        })
        .collect();

    ForwardingStats {
        total_forwards: forwards.len() as u64,
        pending_admin_review: count(ForwardStatus::PendingAdminReview),
        admin_approved: count(ForwardStatus::AdminApproved),
        distributed_to_employee: count(ForwardStatus::DistributedToEmployee),
        in_transit_forwards: count(ForwardStatus::InTransit),
        received_forwards: count(ForwardStatus::Received),
        completed_forwards: count(ForwardStatus::Completed),
        rejected_forwards: count(ForwardStatus::Rejected),
        urgent_forwards: forwards.iter().filter(|f| f.is_urgent).count() as u64,
        by_department,
    }
}

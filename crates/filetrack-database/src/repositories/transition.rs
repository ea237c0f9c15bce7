//! Transactional forward transitions.

use async_trait::async_trait;
use sqlx::PgPool;

use filetrack_core::error::{AppError, ErrorKind};
use filetrack_core::result::AppResult;
use filetrack_entity::{File, Forward, ForwardStatus};

use crate::store::{CommittedTransition, TransitionCommit, TransitionStore, stale_forward};

/// Applies a forward transition and its file update in one transaction.
#[derive(Debug, Clone)]
pub struct TransitionRepository {
    pool: PgPool,
}

impl TransitionRepository {
    /// Create a new transition repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

#[async_trait]
impl TransitionStore for TransitionRepository {
    async fn commit(&self, commit: TransitionCommit) -> AppResult<CommittedTransition> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let actual: Option<ForwardStatus> =
            sqlx::query_scalar("SELECT status FROM forwards WHERE id = $1 FOR UPDATE")
                .bind(commit.forward_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err("Failed to lock forward"))?;
        match actual {
            None => return Err(AppError::not_found("Forward not found")),
            Some(actual) if actual != commit.expected => return Err(stale_forward(actual)),
            Some(_) => {}
        }

        let changes = &commit.forward;
        let forward = sqlx::query_as::<_, Forward>(
            "UPDATE forwards SET \
             status = COALESCE($3, status), \
             priority = COALESCE($4, priority), \
             is_urgent = COALESCE($4, priority) IN ('Urgent', 'Critical'), \
             sent_through = COALESCE($5, sent_through), \
             remarks = COALESCE($6, remarks), \
             admin_approved_by = COALESCE($7, admin_approved_by), \
             admin_approval_date = COALESCE($8, admin_approval_date), \
             admin_remarks = COALESCE($9, admin_remarks), \
             distributed_to = COALESCE($10, distributed_to), \
             distribution_date = COALESCE($11, distribution_date), \
             received_at = COALESCE($12, received_at), \
             completed_at = COALESCE($13, completed_at) \
             WHERE id = $1 AND status = $2 RETURNING *",
        )
        .bind(commit.forward_id)
        .bind(commit.expected)
        .bind(changes.status)
        .bind(changes.priority)
        .bind(&changes.sent_through)
        .bind(&changes.remarks)
        .bind(&changes.admin_approved_by)
        .bind(changes.admin_approval_date)
        .bind(&changes.admin_remarks)
        .bind(&changes.distributed_to)
        .bind(changes.distribution_date)
        .bind(changes.received_at)
        .bind(changes.completed_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err("Failed to update forward"))?
        .ok_or_else(|| stale_forward(commit.expected))?;

        let file = match &commit.file {
            Some(update) => {
                let c = &update.changes;
                let file = sqlx::query_as::<_, File>(
                    "UPDATE files SET \
                     title = COALESCE($2, title), \
                     department = COALESCE($3, department), \
                     status = COALESCE($4, status), \
                     priority = COALESCE($5, priority), \
                     current_holder = COALESCE($6, current_holder), \
                     assigned_to = COALESCE($7, assigned_to), \
                     remarks = COALESCE($8, remarks), \
                     updated_at = NOW() \
                     WHERE code = $1 RETURNING *",
                )
                .bind(&update.code)
                .bind(&c.title)
                .bind(c.department)
                .bind(c.status)
                .bind(c.priority)
                .bind(&c.current_holder)
                .bind(&c.assigned_to)
                .bind(&c.remarks)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err("Failed to update file"))?
                // Dropping `tx` here rolls the forward update back.
                .ok_or_else(|| AppError::not_found("File not found"))?;
                Some(file)
            }
            None => None,
        };

        tx.commit()
            .await
            .map_err(db_err("Failed to commit transition"))?;

        Ok(CommittedTransition { forward, file })
    }
}

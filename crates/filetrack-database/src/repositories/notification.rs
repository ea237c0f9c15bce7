//! Notification repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use filetrack_core::error::{AppError, ErrorKind};
use filetrack_core::result::AppResult;
use filetrack_core::types::pagination::{PageRequest, PageResponse};
use filetrack_entity::Notification;

use crate::filter::NotificationFilter;
use crate::store::NotificationStore;

/// Repository for notification CRUD operations.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_conditions(qb: &mut QueryBuilder<'_, Postgres>, filter: &NotificationFilter) {
    qb.push(" WHERE recipient_id = ")
        .push_bind(filter.recipient_id)
        .push(" AND (expires_at IS NULL OR expires_at > ")
        .push_bind(filter.now)
        .push(")");
    if filter.unread_only {
        qb.push(" AND is_read = FALSE");
    }
    if let Some(kind) = filter.kind {
        qb.push(" AND kind = ").push_bind(kind);
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn insert(&self, n: &Notification) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO notifications (id, recipient_id, recipient_name, recipient_email, title, \
             message, kind, file_code, forward_id, is_read, is_urgent, icon, priority, created_at, \
             read_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(n.id)
        .bind(n.recipient_id)
        .bind(&n.recipient_name)
        .bind(&n.recipient_email)
        .bind(&n.title)
        .bind(&n.message)
        .bind(n.kind)
        .bind(&n.file_code)
        .bind(n.forward_id)
        .bind(n.is_read)
        .bind(n.is_urgent)
        .bind(&n.icon)
        .bind(n.priority)
        .bind(n.created_at)
        .bind(n.read_at)
        .bind(n.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
        })?;
        Ok(())
    }

    async fn find(&self, id: Uuid, recipient_id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE id = $1 AND recipient_id = $2",
        )
        .bind(id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find notification", e))
    }

    async fn list_page(
        &self,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM notifications");
        push_conditions(&mut count, filter);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
            })?;

        let mut select = QueryBuilder::new("SELECT * FROM notifications");
        push_conditions(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let notifs = select
            .build_query_as::<Notification>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
            })?;

        Ok(PageResponse::new(
            notifs,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn unread_count(&self, recipient_id: Uuid, now: DateTime<Utc>) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = FALSE \
             AND (expires_at IS NULL OR expires_at > $2)",
        )
        .bind(recipient_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))?;
        Ok(count as u64)
    }

    async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = TRUE, read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1 AND recipient_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid, recipient_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient_id = $2")
            .bind(id)
            .bind(recipient_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE expires_at IS NOT NULL AND expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge notifications", e)
            })?;
        Ok(result.rows_affected())
    }
}

//! Forward repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use filetrack_core::error::{AppError, ErrorKind};
use filetrack_core::result::AppResult;
use filetrack_core::types::pagination::{PageRequest, PageResponse};
use filetrack_entity::Forward;

use crate::filter::{ForwardFilter, ForwardScopeTerm};
use crate::store::ForwardStore;

use super::map_write_error;

/// Repository for the `forwards` table.
#[derive(Debug, Clone)]
pub struct ForwardRepository {
    pool: PgPool,
}

impl ForwardRepository {
    /// Create a new forward repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_conditions(qb: &mut QueryBuilder<'_, Postgres>, filter: &ForwardFilter) {
    qb.push(" WHERE TRUE");

    if let Some(scope) = &filter.scope {
        if scope.is_empty() {
            qb.push(" AND FALSE");
        } else {
            qb.push(" AND (");
            for (i, term) in scope.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                match term {
                    ForwardScopeTerm::RecipientDepartment(dept) => {
                        qb.push("recipient_department = ").push_bind(*dept)
                    }
                    ForwardScopeTerm::SentBy(name) => qb.push("sent_by = ").push_bind(name.clone()),
                    ForwardScopeTerm::DistributedTo(name) => {
                        qb.push("distributed_to = ").push_bind(name.clone())
                    }
                };
            }
            qb.push(")");
        }
    }
    if let Some(code) = &filter.file_code {
        qb.push(" AND file_code = ").push_bind(code.clone());
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(urgent) = filter.urgent {
        qb.push(" AND is_urgent = ").push_bind(urgent);
    }
    if let Some(dept) = filter.recipient_department {
        qb.push(" AND recipient_department = ").push_bind(dept);
    }
    if let Some(since) = filter.sent_since {
        qb.push(" AND sent_at >= ").push_bind(since);
    }
}

#[async_trait]
impl ForwardStore for ForwardRepository {
    async fn insert(&self, forward: &Forward) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO forwards (id, file_code, recipient_department, recipient_name, \
             original_recipient_name, original_recipient_department, sent_by, sent_through, \
             priority, status, remarks, is_urgent, sent_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(forward.id)
        .bind(&forward.file_code)
        .bind(forward.recipient_department)
        .bind(&forward.recipient_name)
        .bind(&forward.original_recipient_name)
        .bind(forward.original_recipient_department)
        .bind(&forward.sent_by)
        .bind(&forward.sent_through)
        .bind(forward.priority)
        .bind(forward.status)
        .bind(&forward.remarks)
        .bind(forward.is_urgent)
        .bind(forward.sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create forward"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Forward>> {
        sqlx::query_as::<_, Forward>("SELECT * FROM forwards WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find forward", e))
    }

    async fn list(&self, filter: &ForwardFilter) -> AppResult<Vec<Forward>> {
        let mut qb = QueryBuilder::new("SELECT * FROM forwards");
        push_conditions(&mut qb, filter);
        qb.push(" ORDER BY sent_at DESC");
        qb.build_query_as::<Forward>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list forwards", e))
    }

    async fn list_page(
        &self,
        filter: &ForwardFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Forward>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM forwards");
        push_conditions(&mut count, filter);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count forwards", e)
            })?;

        let mut select = QueryBuilder::new("SELECT * FROM forwards");
        push_conditions(&mut select, filter);
        select
            .push(" ORDER BY sent_at DESC LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let forwards = select
            .build_query_as::<Forward>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list forwards", e))?;

        Ok(PageResponse::new(
            forwards,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM forwards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete forward", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}

//! Movement ledger repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use filetrack_core::error::{AppError, ErrorKind};
use filetrack_core::result::AppResult;
use filetrack_entity::Movement;
use filetrack_entity::movement::MovementCorrection;

use crate::filter::MovementFilter;
use crate::store::MovementStore;

/// Repository for the append-only `movements` table.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: PgPool,
}

impl MovementRepository {
    /// Create a new movement repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovementStore for MovementRepository {
    async fn append(&self, movement: &Movement) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO movements (id, file_code, user_name, action, remarks, icon, sent_by, \
             sent_through, recipient_name, datetime) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(movement.id)
        .bind(&movement.file_code)
        .bind(&movement.user_name)
        .bind(&movement.action)
        .bind(&movement.remarks)
        .bind(&movement.icon)
        .bind(&movement.sent_by)
        .bind(&movement.sent_through)
        .bind(&movement.recipient_name)
        .bind(movement.datetime)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record movement", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Movement>> {
        sqlx::query_as::<_, Movement>("SELECT * FROM movements WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find movement", e))
    }

    async fn list(&self, filter: &MovementFilter, limit: Option<u64>) -> AppResult<Vec<Movement>> {
        let mut qb = QueryBuilder::new("SELECT * FROM movements WHERE TRUE");
        if let Some(code) = &filter.file_code {
            qb.push(" AND file_code = ").push_bind(code.clone());
        }
        if let Some(action) = &filter.action {
            qb.push(" AND action = ").push_bind(action.clone());
        }
        if let Some(user) = &filter.user_name {
            qb.push(" AND user_name = ").push_bind(user.clone());
        }
        if let Some(since) = filter.since {
            qb.push(" AND datetime >= ").push_bind(since);
        }
        qb.push(" ORDER BY datetime DESC");
        if let Some(limit) = limit {
            qb.push(" LIMIT ").push_bind(limit as i64);
        }
        qb.build_query_as::<Movement>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list movements", e))
    }

    async fn correct(&self, id: Uuid, correction: &MovementCorrection) -> AppResult<Movement> {
        sqlx::query_as::<_, Movement>(
            "UPDATE movements SET \
             action = COALESCE($2, action), \
             remarks = COALESCE($3, remarks), \
             icon = COALESCE($4, icon), \
             sent_by = COALESCE($5, sent_by), \
             sent_through = COALESCE($6, sent_through), \
             recipient_name = COALESCE($7, recipient_name) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&correction.action)
        .bind(&correction.remarks)
        .bind(&correction.icon)
        .bind(&correction.sent_by)
        .bind(&correction.sent_through)
        .bind(&correction.recipient_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to correct movement", e))?
        .ok_or_else(|| AppError::not_found("Movement not found"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM movements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete movement", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}

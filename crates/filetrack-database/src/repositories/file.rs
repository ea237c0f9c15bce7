//! File repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use filetrack_core::error::{AppError, ErrorKind};
use filetrack_core::result::AppResult;
use filetrack_core::types::pagination::{PageRequest, PageResponse};
use filetrack_entity::File;
use filetrack_entity::file::FileChanges;

use crate::filter::{FileFilter, FileScopeTerm, like_pattern};
use crate::store::FileStore;

use super::map_write_error;

/// Repository for the `files` table.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append the `WHERE` clause for `filter`.
fn push_conditions(qb: &mut QueryBuilder<'_, Postgres>, filter: &FileFilter) {
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
                    FileScopeTerm::Department(dept) => qb.push("department = ").push_bind(*dept),
                    FileScopeTerm::CurrentHolder(name) => {
                        qb.push("current_holder = ").push_bind(name.clone())
                    }
                    FileScopeTerm::AssignedTo(name) => qb.push("assigned_to = ").push_bind(name.clone()),
                    FileScopeTerm::CreatedBy(name) => qb.push("created_by = ").push_bind(name.clone()),
                    FileScopeTerm::Requisitioner(name) => {
                        qb.push("requisitioner = ").push_bind(name.clone())
                    }
                };
            }
            qb.push(")");
        }
    }
    if let Some(dept) = filter.department {
        qb.push(" AND department = ").push_bind(dept);
    }
    if !filter.statuses.is_empty() {
        qb.push(" AND status IN (");
        let mut separated = qb.separated(", ");
        for status in &filter.statuses {
            separated.push_bind(*status);
        }
        separated.push_unseparated(")");
    }
    if let Some(status) = filter.exclude_status {
        qb.push(" AND status <> ").push_bind(status);
    }
    if let Some(priority) = filter.priority {
        qb.push(" AND priority = ").push_bind(priority);
    }
    if let Some(kind) = filter.kind {
        qb.push(" AND kind = ").push_bind(kind);
    }
    if let Some(creator) = &filter.created_by {
        qb.push(" AND created_by = ").push_bind(creator.clone());
    }
    if let Some(since) = filter.created_since {
        qb.push(" AND created_at >= ").push_bind(since);
    }
    if let Some(term) = filter.search_term() {
        let pattern = like_pattern(term);
        qb.push(" AND (code ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR requisitioner ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl FileStore for FileRepository {
    async fn insert(&self, file: &File) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO files (id, code, title, department, status, priority, kind, requisitioner, \
             current_holder, assigned_to, created_by, remarks, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(file.id)
        .bind(&file.code)
        .bind(&file.title)
        .bind(file.department)
        .bind(file.status)
        .bind(file.priority)
        .bind(file.kind)
        .bind(&file.requisitioner)
        .bind(&file.current_holder)
        .bind(&file.assigned_to)
        .bind(&file.created_by)
        .bind(&file.remarks)
        .bind(file.created_at)
        .bind(file.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create file"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find file by code", e)
            })
    }

    async fn list(&self, filter: &FileFilter) -> AppResult<Vec<File>> {
        let mut qb = QueryBuilder::new("SELECT * FROM files");
        push_conditions(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC");
        qb.build_query_as::<File>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn list_page(
        &self,
        filter: &FileFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<File>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM files");
        push_conditions(&mut count, filter);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count files", e))?;

        let mut select = QueryBuilder::new("SELECT * FROM files");
        push_conditions(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let files = select
            .build_query_as::<File>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))?;

        Ok(PageResponse::new(
            files,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn update(&self, id: Uuid, changes: &FileChanges) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET \
             title = COALESCE($2, title), \
             department = COALESCE($3, department), \
             status = COALESCE($4, status), \
             priority = COALESCE($5, priority), \
             current_holder = COALESCE($6, current_holder), \
             assigned_to = COALESCE($7, assigned_to), \
             remarks = COALESCE($8, remarks), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&changes.title)
        .bind(changes.department)
        .bind(changes.status)
        .bind(changes.priority)
        .bind(&changes.current_holder)
        .bind(&changes.assigned_to)
        .bind(&changes.remarks)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file", e))?
        .ok_or_else(|| AppError::not_found("File not found"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn codes_with_prefix(&self, code_prefix: &str) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT code FROM files WHERE code LIKE $1 \
             UNION SELECT file_code FROM movements WHERE file_code LIKE $1",
        )
        .bind(format!("{}%", code_prefix.replace('%', "\\%").replace('_', "\\_")))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read file codes", e))
    }
}

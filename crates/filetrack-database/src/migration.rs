//! Embedded schema migrations (`migrations/` at the workspace root).

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use filetrack_core::error::{AppError, ErrorKind};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every migration the database has not seen yet.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let available = MIGRATOR.iter().count();
    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, format!("Migration failed: {e}"), e)
    })?;
    info!(available, "Schema is up to date");
    Ok(())
}

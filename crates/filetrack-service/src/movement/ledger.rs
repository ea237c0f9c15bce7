//! Append-only record of file events with administrative correction.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use filetrack_auth::{Action, authorize};
use filetrack_core::{AppError, AppResult};
use filetrack_database::filter::MovementFilter;
use filetrack_database::{FileStore, MovementStore};
use filetrack_entity::Movement;
use filetrack_entity::movement::{MovementCorrection, NewMovement};

use crate::context::RequestContext;

/// A manually recorded movement.
#[derive(Debug, Clone, Default)]
pub struct AddMovement {
    pub action: String,
    pub remarks: Option<String>,
    pub icon: Option<String>,
    pub sent_by: Option<String>,
    pub sent_through: Option<String>,
    pub recipient_name: Option<String>,
}

/// The movement ledger.
///
/// Workflow transitions record through [`MovementLedger::record`], which
/// never fails the caller. Corrections and deletions are admin-only.
#[derive(Clone)]
pub struct MovementLedger {
    movements: Arc<dyn MovementStore>,
    files: Arc<dyn FileStore>,
}

impl std::fmt::Debug for MovementLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovementLedger").finish_non_exhaustive()
    }
}

impl MovementLedger {
    pub fn new(movements: Arc<dyn MovementStore>, files: Arc<dyn FileStore>) -> Self {
        Self { movements, files }
    }

    /// Append an entry, returning its id.
    pub async fn append(&self, entry: NewMovement) -> AppResult<Uuid> {
        if entry.action.trim().is_empty() {
            return Err(AppError::invalid_field("action", "Action is required"));
        }
        let movement = entry.into_movement();
        self.movements.append(&movement).await?;
        Ok(movement.id)
    }

    /// Best-effort append for workflow side effects.
    ///
    /// A failed write is logged and swallowed; the transition that
    /// triggered it has already committed.
    pub async fn record(&self, entry: NewMovement) -> Option<Uuid> {
        let file_code = entry.file_code.clone();
        let action = entry.action.clone();
        match self.append(entry).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(
                    file_code = %file_code,
                    action = %action,
                    error = %e,
                    "Failed to record movement"
                );
                None
            }
        }
    }

    /// Movements matching `filter`, newest first.
    pub async fn list(&self, filter: &MovementFilter, limit: Option<u64>) -> AppResult<Vec<Movement>> {
        self.movements.list(filter, limit).await
    }

    /// The history of one file, newest first.
    pub async fn for_file(&self, file_code: &str) -> AppResult<Vec<Movement>> {
        let filter = MovementFilter {
            file_code: Some(file_code.to_string()),
            ..Default::default()
        };
        self.movements.list(&filter, None).await
    }

    /// Record a movement by hand against an existing file.
    pub async fn add(
        &self,
        ctx: &RequestContext,
        file_code: &str,
        input: AddMovement,
    ) -> AppResult<Movement> {
        if self.files.find_by_code(file_code).await?.is_none() {
            return Err(AppError::not_found("File not found"));
        }
        let action = input.action.trim();
        if action.is_empty() {
            return Err(AppError::invalid_field("action", "Action is required"));
        }

        let movement = NewMovement {
            file_code: file_code.to_string(),
            user_name: ctx.actor().to_string(),
            action: action.to_string(),
            remarks: input.remarks,
            icon: input.icon.or_else(|| Some("📄".to_string())),
            sent_by: input.sent_by,
            sent_through: input.sent_through,
            recipient_name: input.recipient_name,
        }
        .into_movement();
        self.movements.append(&movement).await?;

        info!(file_code = %file_code, action = %movement.action, user = %ctx.actor(), "Movement added");
        Ok(movement)
    }

    /// Correct a recorded movement.
    pub async fn correct(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        correction: MovementCorrection,
    ) -> AppResult<Movement> {
        authorize(&ctx.principal, &Action::ManageMovements)?;
        if correction
            .action
            .as_deref()
            .is_some_and(|a| a.trim().is_empty())
        {
            return Err(AppError::invalid_field("action", "Action cannot be empty"));
        }
        if self.movements.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found("Movement not found"));
        }
        let movement = self.movements.correct(id, &correction).await?;
        info!(movement_id = %id, user = %ctx.actor(), "Movement corrected");
        Ok(movement)
    }

    /// Delete a recorded movement.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        authorize(&ctx.principal, &Action::ManageMovements)?;
        if !self.movements.delete(id).await? {
            return Err(AppError::not_found("Movement not found"));
        }
        info!(movement_id = %id, user = %ctx.actor(), "Movement deleted");
        Ok(())
    }
}

//! File creation, lookup, update and deletion.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use filetrack_auth::{Action, authorize};
use filetrack_core::{AppError, AppResult, ErrorKind};
use filetrack_database::FileStore;
use filetrack_database::store::current_year;
use filetrack_entity::file::FileChanges;
use filetrack_entity::movement::NewMovement;
use filetrack_entity::{Department, File, FileKind, FileStatus, MovementAction, Priority};

use crate::context::RequestContext;
use crate::movement::MovementLedger;

/// Input for [`FileService::create`].
#[derive(Debug, Clone)]
pub struct CreateFileInput {
    pub title: String,
    pub department: Department,
    pub priority: Priority,
    pub is_digital: bool,
    pub remarks: Option<String>,
}

/// Input for [`FileService::update`]. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateFileInput {
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub remarks: Option<String>,
    pub status: Option<FileStatus>,
}

/// Manages file records outside the forwarding workflow.
#[derive(Clone)]
pub struct FileService {
    files: Arc<dyn FileStore>,
    ledger: MovementLedger,
    code_prefix: String,
}

impl std::fmt::Debug for FileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileService")
            .field("code_prefix", &self.code_prefix)
            .finish_non_exhaustive()
    }
}

impl FileService {
    pub fn new(files: Arc<dyn FileStore>, ledger: MovementLedger, code_prefix: impl Into<String>) -> Self {
        Self {
            files,
            ledger,
            code_prefix: code_prefix.into(),
        }
    }

    /// Creates a file held by its creator.
    ///
    /// The code is the next free sequence for the current year. If another
    /// request takes the same code first, one fresh code is tried before
    /// giving up with `Conflict`.
    pub async fn create(&self, ctx: &RequestContext, input: CreateFileInput) -> AppResult<File> {
        authorize(&ctx.principal, &Action::CreateFile)?;
        let title = input.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_field("title", "Title is required"));
        }

        let year = current_year();
        let mut attempt = 0;
        let file = loop {
            let code = self.files.next_code(&self.code_prefix, year).await?;
            let file = new_file(ctx, code, title, &input);
            match self.files.insert(&file).await {
                Ok(()) => break file,
                Err(e) if e.kind == ErrorKind::Conflict && attempt == 0 => {
                    warn!(file_code = %file.code, "File code taken, retrying with a fresh sequence");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        self.ledger
            .record(
                NewMovement::for_action(&file.code, ctx.actor(), MovementAction::Created)
                    .remarks(non_empty(input.remarks.as_deref()).unwrap_or("File created")),
            )
            .await;

        info!(file_code = %file.code, created_by = %ctx.actor(), "File created");
        Ok(file)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<File> {
        self.files
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    pub async fn get_by_code(&self, code: &str) -> AppResult<File> {
        self.files
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Updates title, priority, remarks or status.
    ///
    /// A status change appends a movement labelled with the new status.
    /// A `Complete` file keeps its status.
    pub async fn update(&self, ctx: &RequestContext, id: Uuid, input: UpdateFileInput) -> AppResult<File> {
        let file = self.get(id).await?;
        authorize(&ctx.principal, &Action::UpdateFile(&file))?;

        if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AppError::invalid_field("title", "Title cannot be empty"));
        }
        let status_change = input.status.filter(|status| *status != file.status);
        if status_change.is_some() && file.status.is_terminal() {
            return Err(AppError::invalid_state(
                "File is complete and its status cannot be changed",
                file.status,
            ));
        }

        let changes = FileChanges {
            title: input.title.map(|t| t.trim().to_string()),
            priority: input.priority,
            remarks: input.remarks.clone(),
            status: status_change,
            ..Default::default()
        };
        if changes.is_empty() {
            return Ok(file);
        }
        let updated = self.files.update(file.id, &changes).await?;

        if let Some(status) = status_change {
            let remarks = non_empty(input.remarks.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Status changed to {status}"));
            self.ledger
                .record(NewMovement {
                    file_code: updated.code.clone(),
                    user_name: ctx.actor().to_string(),
                    action: status.to_string(),
                    remarks: Some(remarks),
                    icon: Some(status.icon().to_string()),
                    ..Default::default()
                })
                .await;
        }

        info!(file_code = %updated.code, user = %ctx.actor(), "File updated");
        Ok(updated)
    }

    /// Deletes a file. Admins only, within their department.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let file = self.get(id).await?;
        authorize(&ctx.principal, &Action::DeleteFile(&file))?;
        if !self.files.delete(file.id).await? {
            return Err(AppError::not_found("File not found"));
        }
        info!(file_code = %file.code, user = %ctx.actor(), "File deleted");
        Ok(())
    }
}

fn new_file(ctx: &RequestContext, code: String, title: &str, input: &CreateFileInput) -> File {
    let now = Utc::now();
    File {
        id: Uuid::new_v4(),
        code,
        title: title.to_string(),
        department: input.department,
        status: FileStatus::Created,
        priority: input.priority,
        kind: FileKind::from_digital(input.is_digital),
        requisitioner: ctx.actor().to_string(),
        current_holder: ctx.actor().to_string(),
        assigned_to: None,
        created_by: ctx.actor().to_string(),
        remarks: input.remarks.clone(),
        created_at: now,
        updated_at: now,
    }
}

/// `Some` only for text with something other than whitespace.
pub(crate) fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

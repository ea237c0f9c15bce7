//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::FileKind;
use super::priority::Priority;
use super::status::FileStatus;
use crate::department::Department;

/// A tracked file (document or requisition).
///
/// `code` is assigned once at creation and never changes; forwards and
/// movements refer to the file by code.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// Human-readable code, `PREFIX-F-<year>-<sequence>`.
    pub code: String,
    /// Short title.
    pub title: String,
    /// Department the file currently belongs to.
    pub department: Department,
    /// Current lifecycle status.
    pub status: FileStatus,
    /// Priority.
    pub priority: Priority,
    /// Physical or digital.
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// Who requested the file.
    pub requisitioner: String,
    /// Name of the user currently holding the file.
    pub current_holder: String,
    /// Name of the user the file was last assigned to.
    pub assigned_to: Option<String>,
    /// Name of the creating user.
    pub created_by: String,
    /// Free-text remarks.
    pub remarks: Option<String>,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Check whether `name` currently holds or is assigned the file.
    pub fn is_held_by(&self, name: &str) -> bool {
        self.current_holder == name || self.assigned_to.as_deref() == Some(name)
    }

    /// Apply a set of changes in place and bump `updated_at`.
    pub fn apply(&mut self, changes: &FileChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(department) = changes.department {
            self.department = department;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(holder) = &changes.current_holder {
            self.current_holder = holder.clone();
        }
        if let Some(assigned_to) = &changes.assigned_to {
            self.assigned_to = Some(assigned_to.clone());
        }
        if let Some(remarks) = &changes.remarks {
            self.remarks = Some(remarks.clone());
        }
        self.updated_at = Utc::now();
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// Pre-generated file code.
    pub code: String,
    /// Title.
    pub title: String,
    /// Owning department.
    pub department: Department,
    /// Priority.
    pub priority: Priority,
    /// Physical or digital.
    pub kind: FileKind,
    /// Acting user, recorded as requisitioner, creator and holder.
    pub created_by: String,
    /// Remarks.
    pub remarks: Option<String>,
}

/// A partial update of a file; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileChanges {
    pub title: Option<String>,
    pub department: Option<Department>,
    pub status: Option<FileStatus>,
    pub priority: Option<Priority>,
    pub current_holder: Option<String>,
    pub assigned_to: Option<String>,
    pub remarks: Option<String>,
}

impl FileChanges {
    /// Whether the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.department.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.current_holder.is_none()
            && self.assigned_to.is_none()
            && self.remarks.is_none()
    }
}

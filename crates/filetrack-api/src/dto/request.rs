//! Request DTOs with validation.
//!
//! Enumerated fields arrive as strings and are parsed into the closed
//! domain enums here, so an unknown value is rejected with the name of
//! the offending field.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use filetrack_core::AppResult;
use filetrack_core::error::AppError;
use filetrack_entity::movement::MovementCorrection;
use filetrack_entity::{
    Department, FileKind, FileStatus, ForwardStatus, NotificationKind, NotificationPriority,
    Priority,
};
use filetrack_service::file::{CreateFileInput, FileQuery, UpdateFileInput};
use filetrack_service::forward::{CreateForwardInput, ForwardQuery, UpdateForwardInput};
use filetrack_service::movement::AddMovement;
use filetrack_service::notification::CreateNotification;

/// Parses an optional enumerated value; empty strings count as absent.
pub fn parse_opt<T>(value: Option<&str>) -> AppResult<Option<T>>
where
    T: FromStr<Err = AppError>,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.parse().map(Some),
        None => Ok(None),
    }
}

/// Create file request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    pub department: String,
    pub priority: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub remarks: Option<String>,
}

impl CreateFileRequest {
    pub fn into_input(self) -> AppResult<CreateFileInput> {
        let kind = parse_opt::<FileKind>(self.kind.as_deref())?.unwrap_or(FileKind::Digital);
        Ok(CreateFileInput {
            title: self.title,
            department: self.department.trim().parse()?,
            priority: parse_opt(self.priority.as_deref())?.unwrap_or(Priority::Normal),
            is_digital: kind == FileKind::Digital,
            remarks: self.remarks,
        })
    }
}

/// Update file request body. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileRequest {
    #[validate(length(max = 255))]
    pub title: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

impl UpdateFileRequest {
    pub fn into_input(self) -> AppResult<UpdateFileInput> {
        Ok(UpdateFileInput {
            title: self.title,
            priority: parse_opt(self.priority.as_deref())?,
            status: parse_opt(self.status.as_deref())?,
            remarks: self.remarks,
        })
    }
}

/// Direct release request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseFileRequest {
    #[validate(length(min = 1, message = "Assigned to is required"))]
    pub assigned_to: String,
    pub remarks: Option<String>,
}

/// `GET /api/files` filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListParams {
    pub department: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub search: Option<String>,
}

impl FileListParams {
    pub fn into_query(self) -> AppResult<FileQuery> {
        Ok(FileQuery {
            department: parse_opt(self.department.as_deref())?,
            status: parse_opt(self.status.as_deref())?,
            priority: parse_opt(self.priority.as_deref())?,
            kind: parse_opt(self.kind.as_deref())?,
            search: self.search.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// `GET /api/files/search` parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub department: Option<String>,
}

/// `GET /api/files/mine` parameters: a comma-separated status list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MyFilesParams {
    pub status: Option<String>,
}

impl MyFilesParams {
    pub fn statuses(&self) -> AppResult<Vec<FileStatus>> {
        self.status
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

/// Forward creation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateForwardRequest {
    #[validate(length(min = 1, message = "File code is required"))]
    pub file_code: String,
    pub recipient_department: String,
    #[validate(length(min = 1, message = "Recipient name is required"))]
    pub recipient_name: String,
    pub priority: Option<String>,
    pub sent_through: Option<String>,
    pub remarks: Option<String>,
}

impl CreateForwardRequest {
    pub fn into_input(self) -> AppResult<CreateForwardInput> {
        let department = self.recipient_department.trim();
        if department.is_empty() {
            return Err(AppError::invalid_field(
                "recipientDepartment",
                "Recipient department is required",
            ));
        }
        Ok(CreateForwardInput {
            file_code: self.file_code,
            recipient_department: department.parse()?,
            recipient_name: self.recipient_name,
            priority: parse_opt(self.priority.as_deref())?.unwrap_or(Priority::Normal),
            sent_through: self.sent_through,
            remarks: self.remarks,
        })
    }
}

/// Approval request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApproveForwardRequest {
    #[validate(length(min = 1, message = "Employee name is required"))]
    pub distributed_to: String,
    pub admin_remarks: Option<String>,
}

/// Rejection request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RejectForwardRequest {
    #[validate(length(min = 1, message = "Rejection reason is required"))]
    pub rejection_reason: String,
}

/// Completion request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteForwardRequest {
    pub remarks: Option<String>,
}

/// Forward edit request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateForwardRequest {
    pub priority: Option<String>,
    pub sent_through: Option<String>,
    pub remarks: Option<String>,
}

impl UpdateForwardRequest {
    pub fn into_input(self) -> AppResult<UpdateForwardInput> {
        Ok(UpdateForwardInput {
            priority: parse_opt(self.priority.as_deref())?,
            sent_through: self.sent_through,
            remarks: self.remarks,
        })
    }
}

/// `GET /api/forwards` filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardListParams {
    pub status: Option<String>,
    pub urgent: Option<bool>,
    pub department: Option<String>,
}

impl ForwardListParams {
    pub fn into_query(self) -> AppResult<ForwardQuery> {
        Ok(ForwardQuery {
            status: parse_opt(self.status.as_deref())?,
            urgent: self.urgent,
            department: parse_opt(self.department.as_deref())?,
        })
    }
}

/// `GET /api/forwards/department/{department}` filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentForwardParams {
    pub status: Option<String>,
    #[serde(default)]
    pub urgent: bool,
}

impl DepartmentForwardParams {
    pub fn status(&self) -> AppResult<Option<ForwardStatus>> {
        parse_opt(self.status.as_deref())
    }
}

/// Manual movement request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddMovementRequest {
    #[validate(length(min = 1, message = "File code is required"))]
    pub file_code: String,
    #[validate(length(min = 1, message = "Action is required"))]
    pub action: String,
    pub remarks: Option<String>,
    pub icon: Option<String>,
    pub sent_by: Option<String>,
    pub sent_through: Option<String>,
    pub recipient_name: Option<String>,
}

impl AddMovementRequest {
    pub fn into_parts(self) -> (String, AddMovement) {
        (
            self.file_code,
            AddMovement {
                action: self.action,
                remarks: self.remarks,
                icon: self.icon,
                sent_by: self.sent_by,
                sent_through: self.sent_through,
                recipient_name: self.recipient_name,
            },
        )
    }
}

/// Movement correction request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CorrectMovementRequest {
    pub action: Option<String>,
    pub remarks: Option<String>,
    pub icon: Option<String>,
    pub sent_by: Option<String>,
    pub sent_through: Option<String>,
    pub recipient_name: Option<String>,
}

impl From<CorrectMovementRequest> for MovementCorrection {
    fn from(req: CorrectMovementRequest) -> Self {
        Self {
            action: req.action,
            remarks: req.remarks,
            icon: req.icon,
            sent_by: req.sent_by,
            sent_through: req.sent_through,
            recipient_name: req.recipient_name,
        }
    }
}

/// `GET /api/movements` filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementListParams {
    pub limit: Option<u64>,
    pub file_code: Option<String>,
    pub action: Option<String>,
    pub user: Option<String>,
}

/// `GET /api/notifications` filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListParams {
    #[serde(default)]
    pub unread_only: bool,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl NotificationListParams {
    pub fn kind(&self) -> AppResult<Option<NotificationKind>> {
        parse_opt(self.kind.as_deref())
    }
}

/// Admin notification request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub recipient_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub file_code: Option<String>,
    pub forward_id: Option<Uuid>,
    #[serde(default)]
    pub is_urgent: bool,
    pub priority: Option<String>,
    pub icon: Option<String>,
}

impl CreateNotificationRequest {
    pub fn into_input(self) -> AppResult<CreateNotification> {
        Ok(CreateNotification {
            recipient_id: self.recipient_id,
            title: self.title,
            message: self.message,
            kind: parse_opt(self.kind.as_deref())?.unwrap_or(NotificationKind::System),
            file_code: self.file_code,
            forward_id: self.forward_id,
            is_urgent: self.is_urgent,
            priority: parse_opt(self.priority.as_deref())?
                .unwrap_or(NotificationPriority::Normal),
            icon: self.icon,
        })
    }
}

/// Dashboard department filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentParam {
    pub department: Option<String>,
}

impl DepartmentParam {
    pub fn department(&self) -> AppResult<Option<Department>> {
        parse_opt(self.department.as_deref())
    }
}

/// `limit` for the recent-activity feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitParam {
    pub limit: Option<u64>,
}

/// `days` for the movement timeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaysParam {
    pub days: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_priority_is_rejected_with_field() {
        let req = CreateForwardRequest {
            file_code: "THDC-F-2026-0001".into(),
            recipient_department: "HR".into(),
            recipient_name: "Alice".into(),
            priority: Some("Whenever".into()),
            sent_through: None,
            remarks: None,
        };
        let err = req.into_input().unwrap_err();
        assert_eq!(err.kind, filetrack_core::ErrorKind::Validation);
        assert_eq!(err.details.unwrap()["field"], "priority");
    }

    #[test]
    fn test_missing_department_is_named() {
        let req = CreateForwardRequest {
            file_code: "THDC-F-2026-0001".into(),
            recipient_department: " ".into(),
            recipient_name: "Alice".into(),
            priority: None,
            sent_through: None,
            remarks: None,
        };
        let err = req.into_input().unwrap_err();
        assert_eq!(err.details.unwrap()["field"], "recipientDepartment");
    }

    #[test]
    fn test_status_list_parses_each_entry() {
        let params = MyFilesParams {
            status: Some("Received, Released".into()),
        };
        assert_eq!(
            params.statuses().unwrap(),
            vec![FileStatus::Received, FileStatus::Released]
        );
        assert!(MyFilesParams::default().statuses().unwrap().is_empty());
    }

    #[test]
    fn test_empty_title_fails_validation() {
        let req = CreateFileRequest {
            title: String::new(),
            department: "IT".into(),
            priority: None,
            kind: None,
            remarks: None,
        };
        assert!(req.validate().is_err());
    }
}

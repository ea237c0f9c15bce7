//! Storage seams consumed by the service layer.
//!
//! Every trait has a PostgreSQL implementation in [`crate::repositories`]
//! and an in-memory one in [`crate::memory`].

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

use filetrack_core::types::pagination::{PageRequest, PageResponse};
use filetrack_core::{AppError, AppResult};
use filetrack_entity::file::FileChanges;
use filetrack_entity::forward::ForwardChanges;
use filetrack_entity::movement::MovementCorrection;
use filetrack_entity::{Department, File, Forward, ForwardStatus, Movement, Notification, User};

use crate::filter::{FileFilter, ForwardFilter, MovementFilter, NotificationFilter};

/// File entity store.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Insert a new file. A duplicate code yields `Conflict`.
    async fn insert(&self, file: &File) -> AppResult<()>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>>;

    async fn find_by_code(&self, code: &str) -> AppResult<Option<File>>;

    /// Files matching `filter`, newest first.
    async fn list(&self, filter: &FileFilter) -> AppResult<Vec<File>>;

    /// One page of files matching `filter`, newest first.
    async fn list_page(&self, filter: &FileFilter, page: &PageRequest)
    -> AppResult<PageResponse<File>>;

    /// Apply `changes` and return the updated row.
    async fn update(&self, id: Uuid, changes: &FileChanges) -> AppResult<File>;

    /// Delete a file. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Every code starting with `code_prefix` that was ever issued: codes
    /// of live files plus codes still referenced by the movement ledger.
    async fn codes_with_prefix(&self, code_prefix: &str) -> AppResult<Vec<String>>;

    /// Next code for `prefix` in `year`: one past the highest sequence
    /// issued that year, so a deleted file's code is never reused.
    async fn next_code(&self, prefix: &str, year: i32) -> AppResult<String> {
        let year_prefix = format!("{prefix}-F-{year}-");
        let existing = self.codes_with_prefix(&year_prefix).await?;
        Ok(format_code(&year_prefix, next_sequence(&year_prefix, &existing)))
    }
}

fn next_sequence(year_prefix: &str, codes: &[String]) -> u32 {
    codes
        .iter()
        .filter_map(|code| code.strip_prefix(year_prefix)?.parse::<u32>().ok())
        .max()
        .map_or(1, |highest| highest.saturating_add(1))
}

fn format_code(year_prefix: &str, sequence: u32) -> String {
    format!("{year_prefix}{sequence:04}")
}

/// The current calendar year, used for code generation.
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Forward entity store. Status changes go through [`TransitionStore`].
#[async_trait]
pub trait ForwardStore: Send + Sync {
    async fn insert(&self, forward: &Forward) -> AppResult<()>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Forward>>;

    /// Forwards matching `filter`, most recently sent first.
    async fn list(&self, filter: &ForwardFilter) -> AppResult<Vec<Forward>>;

    async fn list_page(
        &self,
        filter: &ForwardFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Forward>>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Append-only movement ledger.
#[async_trait]
pub trait MovementStore: Send + Sync {
    async fn append(&self, movement: &Movement) -> AppResult<()>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Movement>>;

    /// Movements matching `filter`, newest first, at most `limit` rows.
    async fn list(&self, filter: &MovementFilter, limit: Option<u64>) -> AppResult<Vec<Movement>>;

    /// Administrative correction.
    async fn correct(&self, id: Uuid, correction: &MovementCorrection) -> AppResult<Movement>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Notification store. Every query is scoped to a recipient.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert(&self, notification: &Notification) -> AppResult<()>;

    async fn find(&self, id: Uuid, recipient_id: Uuid) -> AppResult<Option<Notification>>;

    /// Notifications matching `filter`, newest first.
    async fn list_page(
        &self,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    async fn unread_count(&self, recipient_id: Uuid, now: DateTime<Utc>) -> AppResult<u64>;

    /// Mark one notification read and return it.
    async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> AppResult<Option<Notification>>;

    /// Mark every unread notification read. Returns the number changed.
    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64>;

    async fn delete(&self, id: Uuid, recipient_id: Uuid) -> AppResult<bool>;

    /// Remove notifications that expired before `now`.
    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// The user directory collaborator.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn insert(&self, user: &User) -> AppResult<()>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>>;

    async fn find_by_name_in_department(
        &self,
        name: &str,
        department: Department,
    ) -> AppResult<Option<User>>;

    /// The earliest-registered admin or superadmin of `department`.
    async fn find_admin_for_department(&self, department: Department) -> AppResult<Option<User>>;

    /// Users of `department`, ordered by name.
    async fn list_by_department(&self, department: Department) -> AppResult<Vec<User>>;
}

/// The file side of a transition.
#[derive(Debug, Clone)]
pub struct FileUpdate {
    pub code: String,
    pub changes: FileChanges,
}

/// A forward transition applied as one unit.
///
/// The forward is updated only if its status still equals `expected`;
/// the optional file update commits or rolls back with it.
#[derive(Debug, Clone)]
pub struct TransitionCommit {
    pub forward_id: Uuid,
    pub expected: ForwardStatus,
    pub forward: ForwardChanges,
    pub file: Option<FileUpdate>,
}

/// The rows as they stand after a committed transition.
#[derive(Debug, Clone)]
pub struct CommittedTransition {
    pub forward: Forward,
    pub file: Option<File>,
}

/// Atomic compare-and-swap over a forward and its file.
#[async_trait]
pub trait TransitionStore: Send + Sync {
    /// Apply `commit`.
    ///
    /// Fails with `NotFound` when the forward or file is missing and with
    /// `InvalidState` (carrying the actual status) when the forward is no
    /// longer in `expected`. Nothing is written on failure.
    async fn commit(&self, commit: TransitionCommit) -> AppResult<CommittedTransition>;
}

/// Error for a forward whose status moved under the caller.
pub(crate) fn stale_forward(actual: ForwardStatus) -> AppError {
    AppError::invalid_state("Forward status changed concurrently", actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_code_pads_to_four() {
        assert_eq!(format_code("THDC-F-2026-", 7), "THDC-F-2026-0007");
        assert_eq!(format_code("THDC-F-2026-", 12345), "THDC-F-2026-12345");
    }

    #[test]
    fn test_next_sequence_follows_highest_code() {
        let prefix = "THDC-F-2026-";
        assert_eq!(next_sequence(prefix, &[]), 1);

        let codes: Vec<String> = ["THDC-F-2026-0001", "THDC-F-2026-0005", "THDC-F-2026-junk"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(next_sequence(prefix, &codes), 6);
    }
}

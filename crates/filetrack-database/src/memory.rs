//! In-memory store using a Tokio `RwLock` for single-node deployments.
//!
//! One [`MemoryStore`] implements every store trait over shared state, so
//! a transition can update a forward and its file under a single write
//! lock. Data does not survive a restart.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use filetrack_core::types::pagination::{PageRequest, PageResponse};
use filetrack_core::{AppError, AppResult};
use filetrack_entity::file::FileChanges;
use filetrack_entity::movement::MovementCorrection;
use filetrack_entity::{Department, File, Forward, Movement, Notification, User};

use crate::filter::{FileFilter, ForwardFilter, MovementFilter, NotificationFilter};
use crate::store::{
    CommittedTransition, FileStore, ForwardStore, MovementStore, NotificationStore,
    TransitionCommit, TransitionStore, UserDirectory, stale_forward,
};

/// Internal state, each collection in insertion order.
#[derive(Debug, Default)]
struct InnerState {
    files: Vec<File>,
    forwards: Vec<Forward>,
    movements: Vec<Movement>,
    notifications: Vec<Notification>,
    users: Vec<User>,
}

/// In-memory implementation of every store trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<InnerState>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first by `key`; equal keys keep the later insertion first.
fn newest_first<T: Clone>(items: &[T], keep: impl Fn(&T) -> bool, key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = items.iter().rev().filter(|i| keep(i)).cloned().collect();
    out.sort_by_key(|item| std::cmp::Reverse(key(item)));
    out
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn insert(&self, file: &File) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.files.iter().any(|f| f.code == file.code) {
            return Err(AppError::conflict(format!(
                "File code already exists: {}",
                file.code
            )));
        }
        state.files.push(file.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        let state = self.state.read().await;
        Ok(state.files.iter().find(|f| f.id == id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<File>> {
        let state = self.state.read().await;
        Ok(state.files.iter().find(|f| f.code == code).cloned())
    }

    async fn list(&self, filter: &FileFilter) -> AppResult<Vec<File>> {
        let state = self.state.read().await;
        Ok(newest_first(&state.files, |f| filter.matches(f), |f| f.created_at))
    }

    async fn list_page(
        &self,
        filter: &FileFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<File>> {
        let files = FileStore::list(self, filter).await?;
        Ok(page.slice(files))
    }

    async fn update(&self, id: Uuid, changes: &FileChanges) -> AppResult<File> {
        let mut state = self.state.write().await;
        let file = state
            .files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        file.apply(changes);
        Ok(file.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.files.len();
        state.files.retain(|f| f.id != id);
        Ok(state.files.len() != before)
    }

    async fn codes_with_prefix(&self, code_prefix: &str) -> AppResult<Vec<String>> {
        let state = self.state.read().await;
        let live = state.files.iter().map(|f| &f.code);
        let recorded = state.movements.iter().map(|m| &m.file_code);
        let mut codes: Vec<String> = live
            .chain(recorded)
            .filter(|code| code.starts_with(code_prefix))
            .cloned()
            .collect();
        codes.sort();
        codes.dedup();
        Ok(codes)
    }
}

#[async_trait]
impl ForwardStore for MemoryStore {
    async fn insert(&self, forward: &Forward) -> AppResult<()> {
        self.state.write().await.forwards.push(forward.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Forward>> {
        let state = self.state.read().await;
        Ok(state.forwards.iter().find(|f| f.id == id).cloned())
    }

    async fn list(&self, filter: &ForwardFilter) -> AppResult<Vec<Forward>> {
        let state = self.state.read().await;
        Ok(newest_first(&state.forwards, |f| filter.matches(f), |f| f.sent_at))
    }

    async fn list_page(
        &self,
        filter: &ForwardFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Forward>> {
        let forwards = ForwardStore::list(self, filter).await?;
        Ok(page.slice(forwards))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.forwards.len();
        state.forwards.retain(|f| f.id != id);
        Ok(state.forwards.len() != before)
    }
}

#[async_trait]
impl MovementStore for MemoryStore {
    async fn append(&self, movement: &Movement) -> AppResult<()> {
        self.state.write().await.movements.push(movement.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Movement>> {
        let state = self.state.read().await;
        Ok(state.movements.iter().find(|m| m.id == id).cloned())
    }

    async fn list(&self, filter: &MovementFilter, limit: Option<u64>) -> AppResult<Vec<Movement>> {
        let state = self.state.read().await;
        let mut movements = newest_first(&state.movements, |m| filter.matches(m), |m| m.datetime);
        if let Some(limit) = limit {
            movements.truncate(limit as usize);
        }
        Ok(movements)
    }

    async fn correct(&self, id: Uuid, correction: &MovementCorrection) -> AppResult<Movement> {
        let mut state = self.state.write().await;
        let movement = state
            .movements
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::not_found("Movement not found"))?;
        movement.apply(correction);
        Ok(movement.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.movements.len();
        state.movements.retain(|m| m.id != id);
        Ok(state.movements.len() != before)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert(&self, notification: &Notification) -> AppResult<()> {
        self.state
            .write()
            .await
            .notifications
            .push(notification.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid, recipient_id: Uuid) -> AppResult<Option<Notification>> {
        let state = self.state.read().await;
        Ok(state
            .notifications
            .iter()
            .find(|n| n.id == id && n.recipient_id == recipient_id)
            .cloned())
    }

    async fn list_page(
        &self,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let state = self.state.read().await;
        let items = newest_first(&state.notifications, |n| filter.matches(n), |n| n.created_at);
        Ok(page.slice(items))
    }

    async fn unread_count(&self, recipient_id: Uuid, now: DateTime<Utc>) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read && !n.is_expired_at(now))
            .count() as u64)
    }

    async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> AppResult<Option<Notification>> {
        let mut state = self.state.write().await;
        let Some(notification) = state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == recipient_id)
        else {
            return Ok(None);
        };
        if !notification.is_read {
            notification.is_read = true;
            notification.read_at = Some(Utc::now());
        }
        Ok(Some(notification.clone()))
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let mut changed = 0;
        for n in state
            .notifications
            .iter_mut()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
        {
            n.is_read = true;
            n.read_at = Some(now);
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete(&self, id: Uuid, recipient_id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.notifications.len();
        state
            .notifications
            .retain(|n| !(n.id == id && n.recipient_id == recipient_id));
        Ok(state.notifications.len() != before)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let before = state.notifications.len();
        state.notifications.retain(|n| !n.is_expired_at(now));
        Ok((before - state.notifications.len()) as u64)
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn insert(&self, user: &User) -> AppResult<()> {
        self.state.write().await.users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.name == name).cloned())
    }

    async fn find_by_name_in_department(
        &self,
        name: &str,
        department: Department,
    ) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|u| u.name == name && u.department == department)
            .cloned())
    }

    async fn find_admin_for_department(&self, department: Department) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|u| u.department == department && u.role.is_admin())
            .cloned())
    }

    async fn list_by_department(&self, department: Department) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state
            .users
            .iter()
            .filter(|u| u.department == department)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }
}

#[async_trait]
impl TransitionStore for MemoryStore {
    async fn commit(&self, commit: TransitionCommit) -> AppResult<CommittedTransition> {
        let mut state = self.state.write().await;

        let forward_idx = state
            .forwards
            .iter()
            .position(|f| f.id == commit.forward_id)
            .ok_or_else(|| AppError::not_found("Forward not found"))?;
        let actual = state.forwards[forward_idx].status;
        if actual != commit.expected {
            return Err(stale_forward(actual));
        }

        // Resolve the file before writing anything so a miss leaves no trace.
        let file_idx = match &commit.file {
            Some(update) => Some(
                state
                    .files
                    .iter()
                    .position(|f| f.code == update.code)
                    .ok_or_else(|| AppError::not_found("File not found"))?,
            ),
            None => None,
        };

        state.forwards[forward_idx].apply(&commit.forward);
        let forward = state.forwards[forward_idx].clone();

        let file = match (file_idx, &commit.file) {
            (Some(idx), Some(update)) => {
                state.files[idx].apply(&update.changes);
                Some(state.files[idx].clone())
            }
            _ => None,
        };

        Ok(CommittedTransition { forward, file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetrack_core::ErrorKind;
    use filetrack_entity::forward::{ForwardChanges, NewForward};
    use filetrack_entity::movement::NewMovement;
    use filetrack_entity::{FileKind, FileStatus, ForwardStatus, MovementAction, Priority, UserRole};

    use crate::store::FileUpdate;

    fn sample_file(code: &str) -> File {
        let now = Utc::now();
        File {
            id: Uuid::new_v4(),
            code: code.to_string(),
            title: "Budget".into(),
            department: Department::Finance,
            status: FileStatus::Created,
            priority: Priority::Normal,
            kind: FileKind::Digital,
            requisitioner: "Uma".into(),
            current_holder: "Uma".into(),
            assigned_to: None,
            created_by: "Uma".into(),
            remarks: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_forward(code: &str) -> Forward {
        Forward::new(NewForward {
            file_code: code.to_string(),
            intended_recipient_name: "Alice".into(),
            intended_recipient_department: Department::Hr,
            admin_name: "Hana".into(),
            admin_department: Department::Hr,
            sent_by: "Uma".into(),
            sent_through: None,
            priority: Priority::Normal,
            remarks: None,
        })
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts() {
        let store = MemoryStore::new();
        FileStore::insert(&store, &sample_file("THDC-F-2026-0001"))
            .await
            .unwrap();
        let err = FileStore::insert(&store, &sample_file("THDC-F-2026-0001"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_next_code_follows_highest_sequence_of_the_year() {
        let store = MemoryStore::new();
        assert_eq!(
            store.next_code("THDC", 2026).await.unwrap(),
            "THDC-F-2026-0001"
        );
        FileStore::insert(&store, &sample_file("THDC-F-2026-0002"))
            .await
            .unwrap();
        FileStore::insert(&store, &sample_file("THDC-F-2025-0009"))
            .await
            .unwrap();
        assert_eq!(
            store.next_code("THDC", 2026).await.unwrap(),
            "THDC-F-2026-0003"
        );
    }

    #[tokio::test]
    async fn test_next_code_never_reuses_a_deleted_code() {
        let store = MemoryStore::new();
        let file = sample_file("THDC-F-2026-0004");
        FileStore::insert(&store, &file).await.unwrap();
        let created = NewMovement::for_action(&file.code, "Uma", MovementAction::Created)
            .into_movement();
        MovementStore::append(&store, &created).await.unwrap();
        assert!(FileStore::delete(&store, file.id).await.unwrap());

        assert_eq!(
            store.next_code("THDC", 2026).await.unwrap(),
            "THDC-F-2026-0005"
        );
    }

    #[tokio::test]
    async fn test_commit_rejects_stale_status_without_writing() {
        let store = MemoryStore::new();
        let file = sample_file("THDC-F-2026-0001");
        FileStore::insert(&store, &file).await.unwrap();
        let forward = sample_forward(&file.code);
        ForwardStore::insert(&store, &forward).await.unwrap();

        let commit = TransitionCommit {
            forward_id: forward.id,
            expected: ForwardStatus::PendingAdminReview,
            forward: ForwardChanges {
                status: Some(ForwardStatus::DistributedToEmployee),
                distributed_to: Some("Alice".into()),
                ..Default::default()
            },
            file: Some(FileUpdate {
                code: file.code.clone(),
                changes: FileChanges {
                    current_holder: Some("Alice".into()),
                    status: Some(FileStatus::Released),
                    ..Default::default()
                },
            }),
        };

        store.commit(commit.clone()).await.unwrap();
        let err = store.commit(commit).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);
        assert_eq!(
            err.details.unwrap()["currentStatus"],
            "Distributed to Employee"
        );
    }

    #[tokio::test]
    async fn test_commit_missing_file_leaves_forward_untouched() {
        let store = MemoryStore::new();
        let forward = sample_forward("THDC-F-2026-0404");
        ForwardStore::insert(&store, &forward).await.unwrap();

        let err = store
            .commit(TransitionCommit {
                forward_id: forward.id,
                expected: ForwardStatus::PendingAdminReview,
                forward: ForwardChanges {
                    status: Some(ForwardStatus::DistributedToEmployee),
                    ..Default::default()
                },
                file: Some(FileUpdate {
                    code: forward.file_code.clone(),
                    changes: FileChanges::default(),
                }),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let stored = ForwardStore::find_by_id(&store, forward.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ForwardStatus::PendingAdminReview);
    }

    #[tokio::test]
    async fn test_admin_resolution_picks_first_admin() {
        let store = MemoryStore::new();
        let user = User::new("Alice", None, Department::Hr, UserRole::User);
        let admin = User::new("Hana", None, Department::Hr, UserRole::Admin);
        let later = User::new("Hugo", None, Department::Hr, UserRole::Superadmin);
        for u in [&user, &admin, &later] {
            UserDirectory::insert(&store, u).await.unwrap();
        }
        let found = store
            .find_admin_for_department(Department::Hr)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "Hana");
        assert!(
            store
                .find_admin_for_department(Department::Legal)
                .await
                .unwrap()
                .is_none()
        );
    }
}

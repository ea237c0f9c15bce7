//! Query filters shared by every store implementation.
//!
//! Each filter is evaluated twice: as SQL by the PostgreSQL repositories
//! and as a plain predicate (`matches`) by the in-memory store. The two
//! must agree.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use filetrack_entity::{
    Department, File, FileKind, FileStatus, Forward, ForwardStatus, Movement, Notification,
    NotificationKind, Priority,
};

/// One alternative of a role scope; a file is visible if any term matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileScopeTerm {
    Department(Department),
    CurrentHolder(String),
    AssignedTo(String),
    CreatedBy(String),
    Requisitioner(String),
}

impl FileScopeTerm {
    fn matches(&self, file: &File) -> bool {
        match self {
            Self::Department(dept) => file.department == *dept,
            Self::CurrentHolder(name) => file.current_holder == *name,
            Self::AssignedTo(name) => file.assigned_to.as_deref() == Some(name.as_str()),
            Self::CreatedBy(name) => file.created_by == *name,
            Self::Requisitioner(name) => file.requisitioner == *name,
        }
    }
}

/// Filter over files.
///
/// `scope` is the OR of its terms and is ANDed with every other field.
/// `None` means unrestricted; an empty scope matches nothing.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    pub scope: Option<Vec<FileScopeTerm>>,
    pub department: Option<Department>,
    /// Any of these statuses; empty means any status.
    pub statuses: Vec<FileStatus>,
    pub exclude_status: Option<FileStatus>,
    pub priority: Option<Priority>,
    pub kind: Option<FileKind>,
    pub created_by: Option<String>,
    pub created_since: Option<DateTime<Utc>>,
    /// Case-insensitive substring over code, title and requisitioner.
    pub search: Option<String>,
}

impl FileFilter {
    pub fn matches(&self, file: &File) -> bool {
        if let Some(scope) = &self.scope {
            if !scope.iter().any(|term| term.matches(file)) {
                return false;
            }
        }
        if self.department.is_some_and(|d| d != file.department) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&file.status) {
            return false;
        }
        if self.exclude_status == Some(file.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != file.priority) {
            return false;
        }
        if self.kind.is_some_and(|k| k != file.kind) {
            return false;
        }
        if let Some(creator) = &self.created_by {
            if file.created_by != *creator {
                return false;
            }
        }
        if self.created_since.is_some_and(|since| file.created_at < since) {
            return false;
        }
        if let Some(search) = self.search_term() {
            let needle = search.to_lowercase();
            let hit = [&file.code, &file.title, &file.requisitioner]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    /// The trimmed search term, if one was supplied.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// One alternative of a forward visibility scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardScopeTerm {
    RecipientDepartment(Department),
    SentBy(String),
    DistributedTo(String),
}

impl ForwardScopeTerm {
    fn matches(&self, forward: &Forward) -> bool {
        match self {
            Self::RecipientDepartment(dept) => forward.recipient_department == *dept,
            Self::SentBy(name) => forward.sent_by == *name,
            Self::DistributedTo(name) => forward.distributed_to.as_deref() == Some(name.as_str()),
        }
    }
}

/// Filter over forwards; same scope semantics as [`FileFilter`].
#[derive(Debug, Clone, Default)]
pub struct ForwardFilter {
    pub scope: Option<Vec<ForwardScopeTerm>>,
    pub file_code: Option<String>,
    pub status: Option<ForwardStatus>,
    pub urgent: Option<bool>,
    pub recipient_department: Option<Department>,
    pub sent_since: Option<DateTime<Utc>>,
}

impl ForwardFilter {
    pub fn matches(&self, forward: &Forward) -> bool {
        if let Some(scope) = &self.scope {
            if !scope.iter().any(|term| term.matches(forward)) {
                return false;
            }
        }
        if let Some(code) = &self.file_code {
            if forward.file_code != *code {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != forward.status) {
            return false;
        }
        if self.urgent.is_some_and(|u| u != forward.is_urgent) {
            return false;
        }
        if self
            .recipient_department
            .is_some_and(|d| d != forward.recipient_department)
        {
            return false;
        }
        if self.sent_since.is_some_and(|since| forward.sent_at < since) {
            return false;
        }
        true
    }
}

/// Filter over the movement ledger.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    pub file_code: Option<String>,
    pub action: Option<String>,
    pub user_name: Option<String>,
    pub since: Option<DateTime<Utc>>,
}

impl MovementFilter {
    pub fn matches(&self, movement: &Movement) -> bool {
        self.file_code
            .as_ref()
            .is_none_or(|code| movement.file_code == *code)
            && self.action.as_ref().is_none_or(|a| movement.action == *a)
            && self
                .user_name
                .as_ref()
                .is_none_or(|u| movement.user_name == *u)
            && self.since.is_none_or(|since| movement.datetime >= since)
    }
}

/// Filter over one recipient's notifications. Expired rows never match.
#[derive(Debug, Clone)]
pub struct NotificationFilter {
    pub recipient_id: Uuid,
    pub unread_only: bool,
    pub kind: Option<NotificationKind>,
    pub now: DateTime<Utc>,
}

impl NotificationFilter {
    pub fn for_recipient(recipient_id: Uuid) -> Self {
        Self {
            recipient_id,
            unread_only: false,
            kind: None,
            now: Utc::now(),
        }
    }

    pub fn matches(&self, notification: &Notification) -> bool {
        notification.recipient_id == self.recipient_id
            && !(self.unread_only && notification.is_read)
            && self.kind.is_none_or(|k| k == notification.kind)
            && !notification.is_expired_at(self.now)
    }
}

/// Escape `%`, `_` and `\` for use inside an `ILIKE` pattern.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

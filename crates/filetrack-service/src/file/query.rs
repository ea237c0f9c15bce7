//! Role-scoped file listings and search.

use std::sync::Arc;

use filetrack_auth::{Action, authorize};
use filetrack_core::types::pagination::{PageRequest, PageResponse};
use filetrack_core::{AppError, AppResult};
use filetrack_database::FileStore;
use filetrack_database::filter::{FileFilter, FileScopeTerm};
use filetrack_entity::{Department, File, FileKind, FileStatus, Priority};

use crate::context::RequestContext;
use crate::scope::file_scope;

/// Caller-supplied filters, ANDed with the caller's scope.
#[derive(Debug, Clone, Default)]
pub struct FileQuery {
    pub department: Option<Department>,
    pub status: Option<FileStatus>,
    pub priority: Option<Priority>,
    pub kind: Option<FileKind>,
    pub search: Option<String>,
}

impl FileQuery {
    fn into_filter(self, ctx: &RequestContext) -> FileFilter {
        FileFilter {
            scope: file_scope(ctx),
            department: self.department,
            statuses: self.status.into_iter().collect(),
            priority: self.priority,
            kind: self.kind,
            search: self.search,
            ..Default::default()
        }
    }
}

/// Read-only projections over the file store.
#[derive(Clone)]
pub struct FileQueryService {
    files: Arc<dyn FileStore>,
}

impl std::fmt::Debug for FileQueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileQueryService").finish_non_exhaustive()
    }
}

impl FileQueryService {
    pub fn new(files: Arc<dyn FileStore>) -> Self {
        Self { files }
    }

    /// Files visible to the caller, newest first.
    pub async fn list(&self, ctx: &RequestContext, query: FileQuery) -> AppResult<Vec<File>> {
        self.files.list(&query.into_filter(ctx)).await
    }

    pub async fn list_page(
        &self,
        ctx: &RequestContext,
        query: FileQuery,
        page: PageRequest,
    ) -> AppResult<PageResponse<File>> {
        self.files.list_page(&query.into_filter(ctx), &page).await
    }

    /// Every file of `department`. Superadmins may ask for any department.
    pub async fn by_department(&self, ctx: &RequestContext, department: Department) -> AppResult<Vec<File>> {
        authorize(&ctx.principal, &Action::ViewDepartmentFiles(department))?;
        let filter = FileFilter {
            department: Some(department),
            ..Default::default()
        };
        self.files.list(&filter).await
    }

    /// Case-insensitive search over code, title and requisitioner.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        term: &str,
        department: Option<Department>,
    ) -> AppResult<Vec<File>> {
        if term.trim().is_empty() {
            return Err(AppError::invalid_field("q", "Search query is required"));
        }
        let query = FileQuery {
            department,
            search: Some(term.to_string()),
            ..Default::default()
        };
        self.list(ctx, query).await
    }

    /// Every file that has left the `Created` state. Admins only.
    pub async fn received(&self, ctx: &RequestContext) -> AppResult<Vec<File>> {
        authorize(&ctx.principal, &Action::ViewReceivedFiles)?;
        let filter = FileFilter {
            exclude_status: Some(FileStatus::Created),
            ..Default::default()
        };
        self.files.list(&filter).await
    }

    /// Files created or requested by `creator`.
    ///
    /// An admin looking at someone else only sees their own department.
    pub async fn by_creator(&self, ctx: &RequestContext, creator: &str) -> AppResult<Vec<File>> {
        authorize(&ctx.principal, &Action::ViewCreatorFiles(creator))?;
        let department = (ctx.is_admin() && !ctx.is_superadmin() && ctx.actor() != creator)
            .then(|| ctx.department());
        let filter = FileFilter {
            scope: Some(vec![
                FileScopeTerm::CreatedBy(creator.to_string()),
                FileScopeTerm::Requisitioner(creator.to_string()),
            ]),
            department,
            ..Default::default()
        };
        self.files.list(&filter).await
    }

    /// Files the caller holds or was assigned, optionally in `statuses`.
    pub async fn my_files(&self, ctx: &RequestContext, statuses: Vec<FileStatus>) -> AppResult<Vec<File>> {
        let name = ctx.actor().to_string();
        let filter = FileFilter {
            scope: Some(vec![
                FileScopeTerm::CurrentHolder(name.clone()),
                FileScopeTerm::AssignedTo(name),
            ]),
            statuses,
            ..Default::default()
        };
        self.files.list(&filter).await
    }
}

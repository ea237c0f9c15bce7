//! # filetrack-service
//!
//! Business logic for FileTrack. The forwarding workflow engine drives
//! files between departments; the movement ledger and the notification
//! outbox record and announce what it did; query services project the
//! stores through each caller's visibility scope.
//!
//! Services follow constructor injection: every dependency is handed in
//! at construction time behind an `Arc`.

pub mod admin_resolver;
pub mod context;
pub mod file;
pub mod forward;
pub mod movement;
pub mod notification;
pub mod report;
pub mod scope;
pub mod user;

use std::sync::Arc;

use filetrack_core::config::AppConfig;
use filetrack_database::Stores;

pub use admin_resolver::{AdminResolver, FirstAdminResolver};
pub use context::RequestContext;
pub use file::{FileQueryService, FileService};
pub use forward::{ForwardQueryService, WorkflowEngine};
pub use movement::MovementLedger;
pub use notification::{
    LogMailer, Mailer, NotificationDispatcher, NotificationService, QueuedDispatcher,
};
pub use report::ReportService;
pub use user::DirectoryService;

/// Every service, wired over one set of stores.
#[derive(Debug, Clone)]
pub struct Services {
    pub files: FileService,
    pub file_queries: FileQueryService,
    pub workflow: WorkflowEngine,
    pub forward_queries: ForwardQueryService,
    pub movements: MovementLedger,
    pub notifications: Arc<NotificationService>,
    pub reports: ReportService,
    pub directory: DirectoryService,
}

impl Services {
    pub fn new(
        stores: &Stores,
        config: &AppConfig,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        let ledger = MovementLedger::new(stores.movements.clone(), stores.files.clone());
        let admins: Arc<dyn AdminResolver> =
            Arc::new(FirstAdminResolver::new(stores.users.clone()));

        Self {
            files: FileService::new(
                stores.files.clone(),
                ledger.clone(),
                config.workflow.code_prefix.clone(),
            ),
            file_queries: FileQueryService::new(stores.files.clone()),
            workflow: WorkflowEngine::new(stores, admins, ledger.clone(), dispatcher),
            forward_queries: ForwardQueryService::new(
                stores.forwards.clone(),
                stores.files.clone(),
            ),
            movements: ledger,
            notifications: Arc::new(NotificationService::new(
                stores.notifications.clone(),
                stores.users.clone(),
                config.notifications.expiry_days,
            )),
            reports: ReportService::new(
                stores.files.clone(),
                stores.forwards.clone(),
                stores.movements.clone(),
                stores.users.clone(),
            ),
            directory: DirectoryService::new(stores.users.clone()),
        }
    }
}

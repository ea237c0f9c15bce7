//! # filetrack-database
//!
//! Store traits consumed by the service layer, their PostgreSQL
//! implementations, and a single-node in-memory store.

pub mod connection;
pub mod filter;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

use std::sync::Arc;

use sqlx::PgPool;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{
    CommittedTransition, FileStore, FileUpdate, ForwardStore, MovementStore, NotificationStore,
    TransitionCommit, TransitionStore, UserDirectory,
};

use repositories::{
    FileRepository, ForwardRepository, MovementRepository, NotificationRepository,
    TransitionRepository, UserRepository,
};

/// Every store the services need, behind trait objects.
#[derive(Clone)]
pub struct Stores {
    pub files: Arc<dyn FileStore>,
    pub forwards: Arc<dyn ForwardStore>,
    pub movements: Arc<dyn MovementStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub users: Arc<dyn UserDirectory>,
    pub transitions: Arc<dyn TransitionStore>,
}

impl Stores {
    /// Stores backed by PostgreSQL.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            files: Arc::new(FileRepository::new(pool.clone())),
            forwards: Arc::new(ForwardRepository::new(pool.clone())),
            movements: Arc::new(MovementRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            transitions: Arc::new(TransitionRepository::new(pool)),
        }
    }

    /// Stores sharing one [`MemoryStore`].
    pub fn memory(store: MemoryStore) -> Self {
        let shared = Arc::new(store);
        Self {
            files: shared.clone(),
            forwards: shared.clone(),
            movements: shared.clone(),
            notifications: shared.clone(),
            users: shared.clone(),
            transitions: shared,
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

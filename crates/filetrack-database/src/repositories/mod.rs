//! PostgreSQL implementations of the store traits.

pub mod file;
pub mod forward;
pub mod movement;
pub mod notification;
pub mod transition;
pub mod user;

pub use file::FileRepository;
pub use forward::ForwardRepository;
pub use movement::MovementRepository;
pub use notification::NotificationRepository;
pub use transition::TransitionRepository;
pub use user::UserRepository;

use filetrack_core::error::{AppError, ErrorKind};

/// Map a sqlx error, turning unique violations into `Conflict`.
pub(crate) fn map_write_error(e: sqlx::Error, context: &str) -> AppError {
    let is_unique = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if is_unique {
        AppError::with_source(ErrorKind::Conflict, format!("{context}: duplicate key"), e)
    } else {
        AppError::with_source(ErrorKind::Database, context.to_string(), e)
    }
}

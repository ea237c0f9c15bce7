//! # filetrack-entity
//!
//! Domain entity models for FileTrack. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.
//!
//! The closed vocabularies (department, status, priority, role) are Rust
//! enums mirrored by PostgreSQL enum types, so a value outside the set is
//! rejected at the boundary instead of being coerced.

pub mod department;
pub mod file;
pub mod forward;
pub mod movement;
pub mod notification;
pub mod user;

pub use department::Department;
pub use file::{File, FileKind, FileStatus, Priority};
pub use forward::{Forward, ForwardStatus};
pub use movement::{Movement, MovementAction};
pub use notification::{Notification, NotificationKind, NotificationPriority};
pub use user::{User, UserRole};

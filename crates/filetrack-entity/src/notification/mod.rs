//! Notification domain entities.

pub mod kind;
pub mod model;

pub use kind::{NotificationKind, NotificationPriority};
pub use model::{NewNotification, Notification};

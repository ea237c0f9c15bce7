//! Notifications: the outbox that delivers workflow alerts and the
//! per-user inbox service.

pub mod dispatcher;
pub mod email;
pub mod mailer;
pub mod request;
pub mod service;

pub use dispatcher::{NotificationDispatcher, QueuedDispatcher};
pub use email::{EmailMessage, EmailTemplate};
pub use mailer::{LogMailer, Mailer};
pub use request::{NotificationRequest, OutboxMessage, Recipient};
pub use service::{CreateNotification, NotificationListing, NotificationService};

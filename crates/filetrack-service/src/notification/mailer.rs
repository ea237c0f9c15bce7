//! Outbound email seam.

use async_trait::async_trait;
use tracing::info;

use filetrack_core::AppResult;

use super::email::EmailMessage;

/// Delivers rendered email. Errors are swallowed by the dispatcher.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;
}

/// Writes each message to the log instead of a mail relay.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        info!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            "Email dispatched"
        );
        Ok(())
    }
}

//! Notification outbox configuration.

use serde::{Deserialize, Serialize};

/// Notification dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Capacity of the in-process outbox queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Days after which a notification expires.
    #[serde(default = "default_expiry_days")]
    pub expiry_days: i64,
    /// Interval between purges of expired notifications, in seconds.
    #[serde(default = "default_purge_interval")]
    pub purge_interval_seconds: u64,
    /// Whether emails are handed to the mailer.
    #[serde(default)]
    pub email_enabled: bool,
    /// Sender address used on outgoing emails.
    #[serde(default = "default_from_address")]
    pub from_address: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            expiry_days: default_expiry_days(),
            purge_interval_seconds: default_purge_interval(),
            email_enabled: false,
            from_address: default_from_address(),
        }
    }
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_expiry_days() -> i64 {
    30
}

fn default_purge_interval() -> u64 {
    3600
}

fn default_from_address() -> String {
    "filetrack@localhost".to_string()
}

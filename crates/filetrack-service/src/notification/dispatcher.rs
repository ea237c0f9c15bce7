//! Notification outbox.
//!
//! Workflow transitions enqueue [`OutboxMessage`]s after they commit. A
//! single background worker resolves recipients, persists notification
//! rows and sends email. Nothing it does is reported back to the caller:
//! every failure is logged and the message dropped.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use filetrack_core::AppResult;
use filetrack_core::config::NotificationConfig;
use filetrack_database::{NotificationStore, UserDirectory};
use filetrack_entity::User;
use filetrack_entity::notification::NewNotification;

use super::email::EmailTemplate;
use super::mailer::Mailer;
use super::request::{NotificationRequest, OutboxMessage, Recipient};

/// Fire-and-forget sink for workflow side effects.
pub trait NotificationDispatcher: Send + Sync {
    /// Queue `message` without waiting for delivery.
    fn dispatch(&self, message: OutboxMessage);
}

enum Envelope {
    Message(OutboxMessage),
    Flush(oneshot::Sender<()>),
}

/// Bounded-queue dispatcher backed by one worker task.
pub struct QueuedDispatcher {
    sender: mpsc::Sender<Envelope>,
    shutdown: watch::Sender<bool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for QueuedDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedDispatcher")
            .field("capacity", &self.sender.max_capacity())
            .finish_non_exhaustive()
    }
}

impl QueuedDispatcher {
    /// Spawn the worker on the current Tokio runtime.
    pub fn start(
        users: Arc<dyn UserDirectory>,
        notifications: Arc<dyn NotificationStore>,
        mailer: Arc<dyn Mailer>,
        config: NotificationConfig,
    ) -> Arc<Self> {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let (shutdown, shutdown_rx) = watch::channel(false);
        let worker = OutboxWorker {
            users,
            notifications,
            mailer,
            config,
        };
        let handle = tokio::spawn(worker.run(receiver, shutdown_rx));

        Arc::new(Self {
            sender,
            shutdown,
            worker: Mutex::new(Some(handle)),
        })
    }

    /// Wait until every message queued before this call has been handled.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.sender.send(Envelope::Flush(done)).await.is_ok() {
            let _ = wait.await;
        }
    }

    /// Stop accepting messages, drain the queue and join the worker.
    pub async fn shutdown(&self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.worker.lock().await.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Notification worker ended abnormally");
            }
        }
    }
}

impl NotificationDispatcher for QueuedDispatcher {
    fn dispatch(&self, message: OutboxMessage) {
        match self.sender.try_send(Envelope::Message(message)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Notification outbox full, dropping message");
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Notification outbox closed, dropping message");
            }
        }
    }
}

struct OutboxWorker {
    users: Arc<dyn UserDirectory>,
    notifications: Arc<dyn NotificationStore>,
    mailer: Arc<dyn Mailer>,
    config: NotificationConfig,
}

impl OutboxWorker {
    async fn run(self, mut receiver: mpsc::Receiver<Envelope>, mut shutdown: watch::Receiver<bool>) {
        info!(capacity = self.config.queue_capacity, "Notification worker started");

        loop {
            tokio::select! {
                biased;
                envelope = receiver.recv() => match envelope {
                    Some(envelope) => self.process(envelope).await,
                    None => break,
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        receiver.close();
        let mut drained = 0usize;
        while let Some(envelope) = receiver.recv().await {
            self.process(envelope).await;
            drained += 1;
        }
        info!(drained, "Notification worker stopped");
    }

    async fn process(&self, envelope: Envelope) {
        match envelope {
            Envelope::Message(message) => self.handle(message).await,
            Envelope::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    async fn handle(&self, message: OutboxMessage) {
        let result = match message {
            OutboxMessage::Notify(request) => self.deliver(request).await,
            OutboxMessage::Email {
                recipient,
                template,
            } => self.email_only(&recipient, &template).await,
        };
        if let Err(e) = result {
            warn!(error = %e, "Failed to deliver notification");
        }
    }

    async fn deliver(&self, request: NotificationRequest) -> AppResult<()> {
        let Some(user) = self.resolve(&request.recipient).await? else {
            warn!(recipient = ?request.recipient, "Notification recipient not found");
            return Ok(());
        };

        let notification = NewNotification {
            recipient_id: user.id,
            recipient_name: user.name.clone(),
            recipient_email: user.email.clone(),
            title: request.title,
            message: request.message,
            kind: request.kind,
            file_code: request.file_code,
            forward_id: request.forward_id,
            is_urgent: request.is_urgent,
            icon: request.icon,
            priority: request.priority,
            expires_at: Some(Utc::now() + Duration::days(self.config.expiry_days)),
        }
        .into_notification();
        self.notifications.insert(&notification).await?;
        debug!(
            notification_id = %notification.id,
            recipient = %user.name,
            kind = %notification.kind,
            "Notification stored"
        );

        if let Some(template) = &request.email {
            self.send_email(&user, template).await;
        }
        Ok(())
    }

    async fn email_only(&self, recipient: &Recipient, template: &EmailTemplate) -> AppResult<()> {
        match self.resolve(recipient).await? {
            Some(user) => self.send_email(&user, template).await,
            None => warn!(recipient = ?recipient, "Email recipient not found"),
        }
        Ok(())
    }

    async fn resolve(&self, recipient: &Recipient) -> AppResult<Option<User>> {
        match recipient {
            Recipient::Id(id) => self.users.find_by_id(*id).await,
            Recipient::Name(name) => self.users.find_by_name(name).await,
            Recipient::NameInDepartment(name, department) => {
                self.users
                    .find_by_name_in_department(name, *department)
                    .await
            }
        }
    }

    async fn send_email(&self, user: &User, template: &EmailTemplate) {
        if !self.config.email_enabled {
            debug!(recipient = %user.name, "Email disabled, skipping");
            return;
        }
        let Some(address) = user.email.as_deref() else {
            debug!(recipient = %user.name, "Recipient has no email address");
            return;
        };
        let message = template.render(&self.config.from_address, address);
        if let Err(e) = self.mailer.send(&message).await {
            warn!(recipient = %user.name, subject = %message.subject, error = %e, "Failed to send email");
        }
    }
}

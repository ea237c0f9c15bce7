//! Notification inbox: listing, read state, and admin-created notices.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use filetrack_auth::{Action, authorize};
use filetrack_core::types::pagination::{PageRequest, PageResponse};
use filetrack_core::{AppError, AppResult};
use filetrack_database::filter::NotificationFilter;
use filetrack_database::{NotificationStore, UserDirectory};
use filetrack_entity::notification::NewNotification;
use filetrack_entity::{Notification, NotificationKind, NotificationPriority};

use crate::context::RequestContext;

/// One page of the caller's inbox with their unread total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListing {
    pub page: PageResponse<Notification>,
    pub unread_count: u64,
}

/// Input for an admin-created notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub recipient_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub file_code: Option<String>,
    pub forward_id: Option<Uuid>,
    pub is_urgent: bool,
    pub priority: NotificationPriority,
    pub icon: Option<String>,
}

/// Manages the caller's notifications. Every read and write is scoped to
/// the authenticated recipient.
#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationStore>,
    users: Arc<dyn UserDirectory>,
    expiry_days: i64,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("expiry_days", &self.expiry_days)
            .finish_non_exhaustive()
    }
}

impl NotificationService {
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        users: Arc<dyn UserDirectory>,
        expiry_days: i64,
    ) -> Self {
        Self {
            notifications,
            users,
            expiry_days,
        }
    }

    /// Lists notifications for the current user.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
        unread_only: bool,
        kind: Option<NotificationKind>,
    ) -> AppResult<NotificationListing> {
        let filter = NotificationFilter {
            unread_only,
            kind,
            ..NotificationFilter::for_recipient(ctx.principal.id)
        };
        let page = self.notifications.list_page(&filter, &page).await?;
        let unread_count = self.unread_count(ctx).await?;
        Ok(NotificationListing { page, unread_count })
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.notifications
            .unread_count(ctx.principal.id, Utc::now())
            .await
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Notification> {
        self.notifications
            .find(id, ctx.principal.id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))
    }

    /// Marks a notification as read.
    pub async fn mark_read(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Notification> {
        self.notifications
            .mark_read(id, ctx.principal.id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))
    }

    /// Marks all notifications as read for the current user.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let count = self.notifications.mark_all_read(ctx.principal.id).await?;
        info!(user = %ctx.actor(), count, "Marked notifications read");
        Ok(count)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        if !self.notifications.delete(id, ctx.principal.id).await? {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }

    /// Creates a notification for any user. Admin only.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateNotification,
    ) -> AppResult<Notification> {
        authorize(&ctx.principal, &Action::CreateNotification)?;
        if input.title.trim().is_empty() {
            return Err(AppError::invalid_field("title", "Title is required"));
        }
        if input.message.trim().is_empty() {
            return Err(AppError::invalid_field("message", "Message is required"));
        }

        let recipient = self
            .users
            .find_by_id(input.recipient_id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipient not found"))?;

        let notification = NewNotification {
            recipient_id: recipient.id,
            recipient_name: recipient.name.clone(),
            recipient_email: recipient.email.clone(),
            title: input.title,
            message: input.message,
            kind: input.kind,
            file_code: input.file_code,
            forward_id: input.forward_id,
            is_urgent: input.is_urgent,
            icon: input.icon.unwrap_or_else(|| "📢".to_string()),
            priority: input.priority,
            expires_at: Some(Utc::now() + Duration::days(self.expiry_days)),
        }
        .into_notification();
        self.notifications.insert(&notification).await?;

        info!(
            notification_id = %notification.id,
            recipient = %recipient.name,
            created_by = %ctx.actor(),
            "Notification created"
        );
        Ok(notification)
    }

    /// Removes expired notifications for every user.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        let removed = self.notifications.purge_expired(Utc::now()).await?;
        if removed > 0 {
            info!(removed, "Purged expired notifications");
        }
        Ok(removed)
    }

    /// Run [`Self::purge_expired`] every `interval` until `cancel` flips.
    pub fn spawn_purge_task(
        self: Arc<Self>,
        interval: StdDuration,
        mut cancel: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.purge_expired().await {
                            warn!(error = %e, "Notification purge failed");
                        }
                    }
                    changed = cancel.changed() => {
                        if changed.is_err() || *cancel.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("Notification purge task stopped");
        })
    }
}

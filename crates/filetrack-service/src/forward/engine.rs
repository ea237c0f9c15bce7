//! The forwarding workflow engine.
//!
//! A forward moves through
//!
//! ```text
//! Pending Admin Review -> Distributed to Employee -> Received -> Completed
//! Pending Admin Review -> Rejected
//! ```
//!
//! Each transition validates its input, authorizes the caller, checks the
//! current status, then commits the forward and file changes in one
//! compare-and-swap. Only after the commit does it append the movement
//! and queue notifications; neither can undo the transition.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use filetrack_auth::{Action, authorize};
use filetrack_core::{AppError, AppResult, ErrorKind};
use filetrack_database::{
    FileStore, FileUpdate, ForwardStore, Stores, TransitionCommit, TransitionStore, UserDirectory,
};
use filetrack_entity::file::FileChanges;
use filetrack_entity::forward::{ForwardChanges, NewForward};
use filetrack_entity::movement::NewMovement;
use filetrack_entity::{
    Department, File, FileStatus, Forward, ForwardStatus, MovementAction, Priority, User,
};

use super::notices;
use crate::admin_resolver::AdminResolver;
use crate::context::RequestContext;
use crate::file::service::non_empty;
use crate::movement::MovementLedger;
use crate::notification::NotificationDispatcher;

/// Input for [`WorkflowEngine::create_forward`].
#[derive(Debug, Clone)]
pub struct CreateForwardInput {
    pub file_code: String,
    pub recipient_department: Department,
    /// The employee the sender intends the file for.
    pub recipient_name: String,
    pub priority: Priority,
    pub sent_through: Option<String>,
    pub remarks: Option<String>,
}

/// Input for [`WorkflowEngine::update_forward`].
#[derive(Debug, Clone, Default)]
pub struct UpdateForwardInput {
    pub priority: Option<Priority>,
    pub sent_through: Option<String>,
    pub remarks: Option<String>,
}

/// The result of a transition with the message shown to the caller.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    pub data: T,
    pub message: String,
}

impl<T> Outcome<T> {
    fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
        }
    }
}

/// Orchestrates forward transitions and direct release.
#[derive(Clone)]
pub struct WorkflowEngine {
    files: Arc<dyn FileStore>,
    forwards: Arc<dyn ForwardStore>,
    transitions: Arc<dyn TransitionStore>,
    users: Arc<dyn UserDirectory>,
    admins: Arc<dyn AdminResolver>,
    ledger: MovementLedger,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl std::fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine").finish_non_exhaustive()
    }
}

impl WorkflowEngine {
    pub fn new(
        stores: &Stores,
        admins: Arc<dyn AdminResolver>,
        ledger: MovementLedger,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            files: stores.files.clone(),
            forwards: stores.forwards.clone(),
            transitions: stores.transitions.clone(),
            users: stores.users.clone(),
            admins,
            ledger,
            dispatcher,
        }
    }

    /// Route a file to the admin of another department for review.
    ///
    /// The file itself is not changed until the admin approves.
    pub async fn create_forward(
        &self,
        ctx: &RequestContext,
        input: CreateForwardInput,
    ) -> AppResult<Outcome<Forward>> {
        if input.file_code.trim().is_empty() {
            return Err(AppError::invalid_field("fileCode", "File code is required"));
        }
        let recipient_name = input.recipient_name.trim();
        if recipient_name.is_empty() {
            return Err(AppError::invalid_field(
                "recipientName",
                "Recipient name is required",
            ));
        }

        let file = self.file_by_code(input.file_code.trim()).await?;
        authorize(&ctx.principal, &Action::ForwardFile(&file))?;

        let department = input.recipient_department;
        let admin = self.admins.resolve(department).await?.ok_or_else(|| {
            AppError::not_found(format!("No admin found for department: {department}"))
        })?;

        let forward = Forward::new(NewForward {
            file_code: file.code.clone(),
            intended_recipient_name: recipient_name.to_string(),
            intended_recipient_department: department,
            admin_name: admin.name.clone(),
            admin_department: department,
            sent_by: ctx.actor().to_string(),
            sent_through: input.sent_through.clone(),
            priority: input.priority,
            remarks: input.remarks.clone(),
        });
        self.forwards.insert(&forward).await?;

        info!(
            forward_id = %forward.id,
            file_code = %forward.file_code,
            recipient_department = %department,
            admin = %admin.name,
            "Forward created"
        );

        let mut movement =
            NewMovement::for_action(&file.code, ctx.actor(), MovementAction::ForwardedToAdmin)
                .remarks(
                    non_empty(input.remarks.as_deref())
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Forwarded to {department} Admin for review")),
                )
                .sent_by(ctx.actor())
                .recipient(&admin.name);
        movement.sent_through = input.sent_through;
        self.ledger.record(movement).await;

        self.dispatcher
            .dispatch(notices::forward_created(&forward, &file, &admin));

        Ok(Outcome::new(
            forward,
            format!("File forwarded to {department} Admin for review"),
        ))
    }

    /// Approve a pending forward and hand the file to `distributed_to`.
    ///
    /// The file moves to the forward's department, is held by the
    /// distributee, and becomes `Released`, together with the forward.
    pub async fn approve(
        &self,
        ctx: &RequestContext,
        forward_id: Uuid,
        distributed_to: &str,
        admin_remarks: Option<String>,
    ) -> AppResult<Outcome<Forward>> {
        let distributed_to = distributed_to.trim();
        if distributed_to.is_empty() {
            return Err(AppError::invalid_field(
                "distributedTo",
                "Employee name is required",
            ));
        }

        let forward = self.forward(forward_id).await?;
        authorize(&ctx.principal, &Action::ApproveForward(&forward))?;
        let message = "Forward is not pending admin review";
        require_status(&forward, ForwardStatus::PendingAdminReview, message)?;
        let distributee = self
            .member_of(distributed_to, forward.recipient_department, "distributedTo")
            .await?;
        let distributed_to = distributee.name.as_str();

        let remarks = non_empty(admin_remarks.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Approved and distributed to {distributed_to}"));
        let now = Utc::now();
        let committed = self
            .transitions
            .commit(TransitionCommit {
                forward_id,
                expected: ForwardStatus::PendingAdminReview,
                forward: ForwardChanges {
                    status: Some(ForwardStatus::DistributedToEmployee),
                    admin_approved_by: Some(ctx.actor().to_string()),
                    admin_approval_date: Some(now),
                    admin_remarks: Some(remarks.clone()),
                    distributed_to: Some(distributed_to.to_string()),
                    distribution_date: Some(now),
                    ..Default::default()
                },
                file: Some(FileUpdate {
                    code: forward.file_code.clone(),
                    changes: FileChanges {
                        current_holder: Some(distributed_to.to_string()),
                        status: Some(FileStatus::Released),
                        department: Some(forward.recipient_department),
                        ..Default::default()
                    },
                }),
            })
            .await
            .map_err(|e| restate(e, message))?;
        let forward = committed.forward;

        info!(
            forward_id = %forward.id,
            file_code = %forward.file_code,
            admin = %ctx.actor(),
            distributed_to = %distributed_to,
            "Forward approved and distributed"
        );

        self.ledger
            .record(
                NewMovement::for_action(
                    &forward.file_code,
                    ctx.actor(),
                    MovementAction::AdminApprovedAndDistributed,
                )
                .remarks(format!(
                    "Admin {} approved and distributed to {distributed_to}",
                    ctx.actor()
                ))
                .sent_by(ctx.actor())
                .sent_through("Admin Distribution")
                .recipient(distributed_to),
            )
            .await;

        if let Some(file) = &committed.file {
            self.dispatcher.dispatch(notices::distributed_to_employee(
                &forward,
                file,
                ctx.actor(),
                distributed_to,
                &remarks,
            ));
        }
        self.dispatcher
            .dispatch(notices::approved_for_sender(&forward, distributed_to));

        Ok(Outcome::new(
            forward,
            format!("File approved and distributed to {distributed_to}"),
        ))
    }

    /// Reject a pending forward. The file stays where it is.
    pub async fn reject(
        &self,
        ctx: &RequestContext,
        forward_id: Uuid,
        reason: &str,
    ) -> AppResult<Outcome<Forward>> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::invalid_field(
                "rejectionReason",
                "Rejection reason is required",
            ));
        }

        let forward = self.forward(forward_id).await?;
        authorize(&ctx.principal, &Action::RejectForward(&forward))?;
        let message = "Forward is not pending admin review";
        require_status(&forward, ForwardStatus::PendingAdminReview, message)?;

        let committed = self
            .transitions
            .commit(TransitionCommit {
                forward_id,
                expected: ForwardStatus::PendingAdminReview,
                forward: ForwardChanges {
                    status: Some(ForwardStatus::Rejected),
                    admin_approved_by: Some(ctx.actor().to_string()),
                    admin_approval_date: Some(Utc::now()),
                    admin_remarks: Some(format!("Rejected: {reason}")),
                    ..Default::default()
                },
                file: None,
            })
            .await
            .map_err(|e| restate(e, message))?;
        let forward = committed.forward;

        info!(
            forward_id = %forward.id,
            file_code = %forward.file_code,
            admin = %ctx.actor(),
            "Forward rejected"
        );

        self.ledger
            .record(
                NewMovement::for_action(
                    &forward.file_code,
                    ctx.actor(),
                    MovementAction::AdminRejected,
                )
                .remarks(format!("Admin {} rejected: {reason}", ctx.actor()))
                .sent_by(ctx.actor())
                .sent_through("Admin Review")
                .recipient(&forward.sent_by),
            )
            .await;

        self.dispatcher
            .dispatch(notices::rejected_for_sender(&forward, ctx.actor(), reason));

        Ok(Outcome::new(forward, "Forward rejected successfully"))
    }

    /// The distributee takes possession of the file.
    pub async fn receive(&self, ctx: &RequestContext, forward_id: Uuid) -> AppResult<Outcome<Forward>> {
        let forward = self.forward(forward_id).await?;
        authorize(&ctx.principal, &Action::ReceiveForward(&forward))?;
        let message = "File is not ready to be received";
        require_status(&forward, ForwardStatus::DistributedToEmployee, message)?;

        let committed = self
            .transitions
            .commit(TransitionCommit {
                forward_id,
                expected: ForwardStatus::DistributedToEmployee,
                forward: ForwardChanges {
                    status: Some(ForwardStatus::Received),
                    received_at: Some(Utc::now()),
                    ..Default::default()
                },
                file: Some(FileUpdate {
                    code: forward.file_code.clone(),
                    changes: FileChanges {
                        status: Some(FileStatus::Received),
                        current_holder: Some(ctx.actor().to_string()),
                        assigned_to: Some(ctx.actor().to_string()),
                        ..Default::default()
                    },
                }),
            })
            .await
            .map_err(|e| restate(e, message))?;
        let forward = committed.forward;

        info!(
            forward_id = %forward.id,
            file_code = %forward.file_code,
            user = %ctx.actor(),
            "Forward received"
        );

        self.ledger
            .record(
                NewMovement::for_action(&forward.file_code, ctx.actor(), MovementAction::FileReceived)
                    .remarks(format!("File received by {}", ctx.actor()))
                    .sent_by("System")
                    .sent_through("Direct")
                    .recipient(ctx.actor()),
            )
            .await;

        if let Some(file) = &committed.file {
            if let Some(notice) = notices::received_for_admin(&forward, file, ctx.actor()) {
                self.dispatcher.dispatch(notice);
            }
        }

        Ok(Outcome::new(forward, "File marked as received successfully"))
    }

    /// The distributee finishes with the file.
    ///
    /// Only the forward becomes `Completed`; the file keeps its status.
    pub async fn complete(
        &self,
        ctx: &RequestContext,
        forward_id: Uuid,
        remarks: Option<String>,
    ) -> AppResult<Outcome<Forward>> {
        let forward = self.forward(forward_id).await?;
        authorize(&ctx.principal, &Action::CompleteForward(&forward))?;
        let message = "File must be received before it can be completed";
        require_status(&forward, ForwardStatus::Received, message)?;

        let committed = self
            .transitions
            .commit(TransitionCommit {
                forward_id,
                expected: ForwardStatus::Received,
                forward: ForwardChanges {
                    status: Some(ForwardStatus::Completed),
                    completed_at: Some(Utc::now()),
                    ..Default::default()
                },
                file: None,
            })
            .await
            .map_err(|e| restate(e, message))?;
        let forward = committed.forward;

        info!(
            forward_id = %forward.id,
            file_code = %forward.file_code,
            user = %ctx.actor(),
            "Forward completed"
        );

        self.ledger
            .record(
                NewMovement::for_action(
                    &forward.file_code,
                    ctx.actor(),
                    MovementAction::FileCompleted,
                )
                .remarks(
                    non_empty(remarks.as_deref())
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("File completed by {}", ctx.actor())),
                )
                .sent_by(ctx.actor())
                .sent_through("Direct")
                .recipient(ctx.actor()),
            )
            .await;

        for notice in notices::completed(&forward, ctx.actor()) {
            self.dispatcher.dispatch(notice);
        }

        Ok(Outcome::new(forward, "File marked as completed successfully"))
    }

    /// Hand a file straight to `assigned_to` without a forward.
    pub async fn release(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        assigned_to: &str,
        remarks: Option<String>,
    ) -> AppResult<Outcome<File>> {
        let assigned_to = assigned_to.trim();
        if assigned_to.is_empty() {
            return Err(AppError::invalid_field(
                "assignedTo",
                "Assigned to is required",
            ));
        }

        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        authorize(&ctx.principal, &Action::ReleaseFile(&file))?;
        let assignee = self
            .member_of(assigned_to, file.department, "assignedTo")
            .await?;
        let assigned_to = assignee.name.as_str();

        let file = self
            .files
            .update(
                file.id,
                &FileChanges {
                    status: Some(FileStatus::Released),
                    current_holder: Some(assigned_to.to_string()),
                    assigned_to: Some(assigned_to.to_string()),
                    ..Default::default()
                },
            )
            .await?;

        info!(
            file_code = %file.code,
            released_by = %ctx.actor(),
            assigned_to = %assigned_to,
            "File released"
        );

        let remarks = non_empty(remarks.as_deref());
        self.ledger
            .record(
                NewMovement::for_action(&file.code, ctx.actor(), MovementAction::Released)
                    .remarks(
                        remarks
                            .map(str::to_string)
                            .unwrap_or_else(|| format!("File released to {assigned_to}")),
                    )
                    .sent_by(ctx.actor())
                    .sent_through("Direct Release")
                    .recipient(assigned_to),
            )
            .await;

        let email_remarks = remarks
            .map(str::to_string)
            .unwrap_or_else(|| format!("Released to {assigned_to}"));
        self.dispatcher.dispatch(notices::released(
            &file,
            ctx.actor(),
            assigned_to,
            &email_remarks,
        ));

        Ok(Outcome::new(file, format!("File released to {assigned_to}")))
    }

    /// Edit the priority, delivery method or remarks of an open forward.
    pub async fn update_forward(
        &self,
        ctx: &RequestContext,
        forward_id: Uuid,
        input: UpdateForwardInput,
    ) -> AppResult<Forward> {
        let forward = self.forward(forward_id).await?;
        authorize(&ctx.principal, &Action::UpdateForward(&forward))?;
        if forward.status.is_terminal() {
            return Err(AppError::invalid_state(
                "Forward can no longer be modified",
                forward.status,
            ));
        }

        let committed = self
            .transitions
            .commit(TransitionCommit {
                forward_id,
                expected: forward.status,
                forward: ForwardChanges {
                    priority: input.priority,
                    sent_through: input.sent_through,
                    remarks: input.remarks,
                    ..Default::default()
                },
                file: None,
            })
            .await?;

        info!(forward_id = %forward_id, user = %ctx.actor(), "Forward updated");
        Ok(committed.forward)
    }

    pub async fn delete_forward(&self, ctx: &RequestContext, forward_id: Uuid) -> AppResult<()> {
        let forward = self.forward(forward_id).await?;
        authorize(&ctx.principal, &Action::DeleteForward(&forward))?;
        if !self.forwards.delete(forward_id).await? {
            return Err(AppError::not_found("Forward not found"));
        }
        info!(forward_id = %forward_id, file_code = %forward.file_code, user = %ctx.actor(), "Forward deleted");
        Ok(())
    }

    async fn forward(&self, id: Uuid) -> AppResult<Forward> {
        self.forwards
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Forward not found"))
    }

    async fn file_by_code(&self, code: &str) -> AppResult<File> {
        self.files
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// The user called `name` in `department`. A file is only ever held by
    /// someone who works where it is filed.
    async fn member_of(&self, name: &str, department: Department, field: &str) -> AppResult<User> {
        self.users
            .find_by_name_in_department(name, department)
            .await?
            .ok_or_else(|| {
                AppError::invalid_field(field, format!("{name} is not an employee of {department}"))
            })
    }
}

fn require_status(forward: &Forward, expected: ForwardStatus, message: &str) -> AppResult<()> {
    if forward.status == expected {
        Ok(())
    } else {
        Err(AppError::invalid_state(message, forward.status))
    }
}

/// Replace the store's generic stale-status message with the
/// transition's own, keeping the reported status.
fn restate(err: AppError, message: &str) -> AppError {
    if err.kind == ErrorKind::InvalidState {
        AppError {
            message: message.to_string(),
            ..err
        }
    } else {
        err
    }
}

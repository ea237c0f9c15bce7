//! Notifications emitted by workflow transitions.

use chrono::Utc;

use filetrack_entity::{File, Forward, NotificationKind, NotificationPriority, User};

use crate::notification::{EmailTemplate, NotificationRequest, OutboxMessage, Recipient};

fn about(forward: &Forward, request: NotificationRequest) -> NotificationRequest {
    request
        .file(&forward.file_code)
        .forward(forward.id)
        .urgency(forward.is_urgent, NotificationPriority::from(forward.priority))
}

/// To the reviewing admin when a forward is created.
pub fn forward_created(forward: &Forward, file: &File, admin: &User) -> OutboxMessage {
    let request = NotificationRequest::new(
        Recipient::Id(admin.id),
        NotificationKind::FileForwarded,
        "New Forward Request",
        format!(
            "You have a new forward request from {} for file {}.",
            forward.sent_by, forward.file_code
        ),
    )
    .with_email(EmailTemplate::FileForwarded {
        file_code: file.code.clone(),
        file_title: file.title.clone(),
        priority: forward.priority,
        department: forward.recipient_department,
        sent_by: forward.sent_by.clone(),
        recipient_name: forward.recipient_name.clone(),
        sent_through: forward.sent_through.clone(),
        sent_at: forward.sent_at,
        remarks: forward.remarks.clone(),
    });
    about(forward, request).into()
}

/// To the distributee on approval.
pub fn distributed_to_employee(
    forward: &Forward,
    file: &File,
    admin_name: &str,
    distributed_to: &str,
    remarks: &str,
) -> OutboxMessage {
    let request = NotificationRequest::new(
        Recipient::NameInDepartment(distributed_to.to_string(), forward.recipient_department),
        NotificationKind::ForwardStatus,
        "File Distributed to You",
        format!(
            "Admin {admin_name} has distributed file {} to you.",
            forward.file_code
        ),
    )
    .icon("📋")
    .with_email(EmailTemplate::FileReleased {
        file_code: file.code.clone(),
        file_title: file.title.clone(),
        released_to: distributed_to.to_string(),
        released_by: admin_name.to_string(),
        released_at: Utc::now(),
        remarks: Some(remarks.to_string()),
    });
    about(forward, request).into()
}

/// To the sender on approval.
pub fn approved_for_sender(forward: &Forward, distributed_to: &str) -> OutboxMessage {
    let request = NotificationRequest::new(
        Recipient::Name(forward.sent_by.clone()),
        NotificationKind::ForwardStatus,
        "Forward Approved & Distributed",
        format!(
            "Your forward request for file {} has been approved and distributed to {distributed_to}.",
            forward.file_code
        ),
    )
    .icon("✅");
    about(forward, request).into()
}

/// To the sender on rejection.
pub fn rejected_for_sender(forward: &Forward, admin_name: &str, reason: &str) -> OutboxMessage {
    let request = NotificationRequest::new(
        Recipient::Name(forward.sent_by.clone()),
        NotificationKind::ForwardStatus,
        "Forward Rejected",
        format!(
            "Your forward request for file {} has been rejected by {admin_name}. Reason: {reason}",
            forward.file_code
        ),
    )
    .icon("❌");
    about(forward, request).into()
}

/// To the approving admin when the distributee receives the file.
pub fn received_for_admin(forward: &Forward, file: &File, receiver: &str) -> Option<OutboxMessage> {
    let admin = forward.admin_approved_by.as_ref()?;
    let request = NotificationRequest::new(
        Recipient::Name(admin.clone()),
        NotificationKind::ForwardStatus,
        "File Received by Employee",
        format!("File {} has been received by {receiver}.", forward.file_code),
    )
    .icon("📥")
    .with_email(EmailTemplate::FileReceived {
        file_code: file.code.clone(),
        file_title: file.title.clone(),
        received_by: receiver.to_string(),
        received_at: forward.received_at.unwrap_or_else(Utc::now),
    });
    Some(about(forward, request).into())
}

/// To the approving admin and the sender on completion.
pub fn completed(forward: &Forward, completer: &str) -> Vec<OutboxMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(admin) = &forward.admin_approved_by {
        let request = NotificationRequest::new(
            Recipient::Name(admin.clone()),
            NotificationKind::ForwardStatus,
            "File Completed by Employee",
            format!("File {} has been completed by {completer}.", forward.file_code),
        )
        .icon("✅");
        messages.push(about(forward, request).into());
    }
    let request = NotificationRequest::new(
        Recipient::Name(forward.sent_by.clone()),
        NotificationKind::ForwardStatus,
        "Forward Completed",
        format!(
            "Your forward request for file {} has been completed by {completer}.",
            forward.file_code
        ),
    )
    .icon("✅");
    messages.push(about(forward, request).into());
    messages
}

/// Email-only notice to the assignee of a direct release.
pub fn released(file: &File, released_by: &str, assigned_to: &str, remarks: &str) -> OutboxMessage {
    OutboxMessage::Email {
        recipient: Recipient::Name(assigned_to.to_string()),
        template: EmailTemplate::FileReleased {
            file_code: file.code.clone(),
            file_title: file.title.clone(),
            released_to: assigned_to.to_string(),
            released_by: released_by.to_string(),
            released_at: Utc::now(),
            remarks: Some(remarks.to_string()),
        },
    }
}

//! Plain-text email templates for workflow events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use filetrack_entity::{Department, Priority};

const FOOTER: &str = "This is an automated notification from the File Tracking System.\n\
Please do not reply to this email.";

/// A rendered message ready for a [`crate::notification::Mailer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// The event an email describes, with the data the template needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EmailTemplate {
    /// Sent to the reviewing admin when a forward is created.
    FileForwarded {
        file_code: String,
        file_title: String,
        priority: Priority,
        department: Department,
        sent_by: String,
        recipient_name: String,
        sent_through: Option<String>,
        sent_at: DateTime<Utc>,
        remarks: Option<String>,
    },
    /// Sent to the new holder on approval or direct release.
    FileReleased {
        file_code: String,
        file_title: String,
        released_to: String,
        released_by: String,
        released_at: DateTime<Utc>,
        remarks: Option<String>,
    },
    /// Sent to the approving admin when the distributee receives.
    FileReceived {
        file_code: String,
        file_title: String,
        received_by: String,
        received_at: DateTime<Utc>,
    },
}

impl EmailTemplate {
    pub fn subject(&self) -> String {
        match self {
            Self::FileForwarded {
                file_code,
                file_title,
                ..
            } => format!("📤 File Forwarded: {file_code} - {file_title}"),
            Self::FileReleased {
                file_code,
                file_title,
                ..
            } => format!("📤 File Released: {file_code} - {file_title}"),
            Self::FileReceived {
                file_code,
                file_title,
                ..
            } => format!("📥 File Received: {file_code} - {file_title}"),
        }
    }

    pub fn body(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        match self {
            Self::FileForwarded {
                file_code,
                file_title,
                priority,
                department,
                sent_by,
                recipient_name,
                sent_through,
                sent_at,
                remarks,
            } => {
                lines.push("File Details".into());
                lines.push(format!("File Code: {file_code}"));
                lines.push(format!("Title: {file_title}"));
                lines.push(format!("Priority: {priority}"));
                lines.push(format!("Department: {department}"));
                lines.push(String::new());
                lines.push("Forward Details".into());
                lines.push(format!("Sent By: {sent_by}"));
                lines.push(format!("Sent To: {recipient_name}"));
                lines.push(format!(
                    "Sent Through: {}",
                    sent_through.as_deref().unwrap_or("-")
                ));
                lines.push(format!("Sent At: {}", sent_at.format("%Y-%m-%d %H:%M UTC")));
                push_remarks(&mut lines, "Remarks", remarks.as_deref());
                lines.push(String::new());
                lines.push(
                    "Action Required: Please review this file and take necessary action.".into(),
                );
            }
            Self::FileReleased {
                file_code,
                file_title,
                released_to,
                released_by,
                released_at,
                remarks,
            } => {
                lines.push("File Details".into());
                lines.push(format!("File Code: {file_code}"));
                lines.push(format!("Title: {file_title}"));
                lines.push(format!("Released To: {released_to}"));
                lines.push(format!("Released By: {released_by}"));
                lines.push(format!(
                    "Released At: {}",
                    released_at.format("%Y-%m-%d %H:%M UTC")
                ));
                push_remarks(&mut lines, "Release Remarks", remarks.as_deref());
                lines.push(String::new());
                lines.push(
                    "File Available: The file has been released to you and is now available \
                     in your \"Received Files\" section."
                        .into(),
                );
            }
            Self::FileReceived {
                file_code,
                file_title,
                received_by,
                received_at,
            } => {
                lines.push("File Details".into());
                lines.push(format!("File Code: {file_code}"));
                lines.push(format!("Title: {file_title}"));
                lines.push(format!("Received By: {received_by}"));
                lines.push(format!(
                    "Received At: {}",
                    received_at.format("%Y-%m-%d %H:%M UTC")
                ));
                lines.push(String::new());
                lines.push(
                    "Status Updated: The file has been successfully received and is now in \
                     your possession."
                        .into(),
                );
            }
        }
        lines.push(String::new());
        lines.push(FOOTER.to_string());
        lines.join("\n")
    }

    /// Render for delivery to `to`.
    pub fn render(&self, from: &str, to: &str) -> EmailMessage {
        EmailMessage {
            from: from.to_string(),
            to: to.to_string(),
            subject: self.subject(),
            body: self.body(),
        }
    }
}

fn push_remarks(lines: &mut Vec<String>, heading: &str, remarks: Option<&str>) {
    if let Some(remarks) = remarks.filter(|r| !r.trim().is_empty()) {
        lines.push(String::new());
        lines.push(heading.to_string());
        lines.push(format!("\"{remarks}\""));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_subject_and_body() {
        let template = EmailTemplate::FileForwarded {
            file_code: "THDC-F-2026-0001".into(),
            file_title: "Budget".into(),
            priority: Priority::Critical,
            department: Department::Hr,
            sent_by: "Uma".into(),
            recipient_name: "Hana".into(),
            sent_through: None,
            sent_at: Utc::now(),
            remarks: Some("please check".into()),
        };
        let message = template.render("filetrack@localhost", "hana@example.com");
        assert_eq!(message.subject, "📤 File Forwarded: THDC-F-2026-0001 - Budget");
        assert!(message.body.contains("Priority: Critical"));
        assert!(message.body.contains("\"please check\""));
        assert_eq!(message.to, "hana@example.com");
    }

    #[test]
    fn test_release_without_remarks_omits_section() {
        let template = EmailTemplate::FileReleased {
            file_code: "THDC-F-2026-0002".into(),
            file_title: "Payroll".into(),
            released_to: "Alice".into(),
            released_by: "Hana".into(),
            released_at: Utc::now(),
            remarks: None,
        };
        assert_eq!(template.subject(), "📤 File Released: THDC-F-2026-0002 - Payroll");
        assert!(!template.body().contains("Release Remarks"));
    }
}

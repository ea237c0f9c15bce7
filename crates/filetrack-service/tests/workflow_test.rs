//! End-to-end forwarding workflow over the in-memory store.

use std::sync::Arc;

use filetrack_auth::Principal;
use filetrack_core::config::AppConfig;
use filetrack_core::types::pagination::PageRequest;
use filetrack_core::{AppError, ErrorKind};
use filetrack_database::store::current_year;
use filetrack_database::{MemoryStore, Stores, UserDirectory};
use filetrack_entity::{
    Department, File, FileStatus, Forward, ForwardStatus, Movement, Priority, User, UserRole,
};
use filetrack_service::file::{CreateFileInput, FileQuery, UpdateFileInput};
use filetrack_service::forward::{CreateForwardInput, UpdateForwardInput};
use filetrack_service::{LogMailer, QueuedDispatcher, RequestContext, Services};

struct Harness {
    services: Services,
    dispatcher: Arc<QueuedDispatcher>,
    uma: User,
    tom: User,
    ivan: User,
    hana: User,
    alice: User,
    bob: User,
    sam: User,
}

impl Harness {
    async fn new() -> Self {
        let stores = Stores::memory(MemoryStore::new());
        let config = AppConfig::default();

        let users = [
            User::new("Uma", Some("uma@example.com".into()), Department::It, UserRole::User),
            User::new("Tom", None, Department::It, UserRole::User),
            User::new("Ivan", None, Department::It, UserRole::Admin),
            User::new("Hana", Some("hana@example.com".into()), Department::Hr, UserRole::Admin),
            User::new("Alice", None, Department::Hr, UserRole::User),
            User::new("Bob", None, Department::Hr, UserRole::User),
            User::new("Sam", None, Department::Administration, UserRole::Superadmin),
        ];
        for user in &users {
            stores.users.insert(user).await.unwrap();
        }
        let [uma, tom, ivan, hana, alice, bob, sam] = users;

        let dispatcher = QueuedDispatcher::start(
            stores.users.clone(),
            stores.notifications.clone(),
            Arc::new(LogMailer),
            config.notifications.clone(),
        );
        let services = Services::new(&stores, &config, dispatcher.clone());

        Self {
            services,
            dispatcher,
            uma,
            tom,
            ivan,
            hana,
            alice,
            bob,
            sam,
        }
    }

    async fn create_file(&self, owner: &User, title: &str) -> File {
        self.services
            .files
            .create(
                &ctx(owner),
                CreateFileInput {
                    title: title.into(),
                    department: owner.department,
                    priority: Priority::Normal,
                    is_digital: true,
                    remarks: None,
                },
            )
            .await
            .unwrap()
    }

    async fn forward_to_hr(&self, sender: &User, file: &File, priority: Priority) -> Forward {
        self.services
            .workflow
            .create_forward(
                &ctx(sender),
                CreateForwardInput {
                    file_code: file.code.clone(),
                    recipient_department: Department::Hr,
                    recipient_name: "Alice".into(),
                    priority,
                    sent_through: Some("Courier".into()),
                    remarks: None,
                },
            )
            .await
            .unwrap()
            .data
    }

    async fn history(&self, file: &File) -> Vec<Movement> {
        self.services.movements.for_file(&file.code).await.unwrap()
    }

    async fn reload(&self, file: &File) -> File {
        self.services.files.get(file.id).await.unwrap()
    }
}

fn ctx(user: &User) -> RequestContext {
    RequestContext::new(Principal::from(user))
}

fn current_status(err: &AppError) -> String {
    err.details.as_ref().unwrap()["currentStatus"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_scenario_a_create_and_forward() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    assert_eq!(file.status, FileStatus::Created);
    assert_eq!(file.current_holder, "Uma");
    assert_eq!(file.department, Department::It);

    let forward = h.forward_to_hr(&h.uma, &file, Priority::Critical).await;
    assert_eq!(forward.status, ForwardStatus::PendingAdminReview);
    assert_eq!(forward.recipient_name, "Hana");
    assert_eq!(forward.recipient_department, Department::Hr);
    assert_eq!(forward.original_recipient_name, "Alice");
    assert!(forward.is_urgent);

    let unchanged = h.reload(&file).await;
    assert_eq!(unchanged.status, FileStatus::Created);
    assert_eq!(unchanged.current_holder, "Uma");
    assert_eq!(unchanged.department, Department::It);

    let history = h.history(&file).await;
    assert_eq!(history[0].action, "Forwarded to Admin");
    assert_eq!(history[0].recipient_name.as_deref(), Some("Hana"));
    assert_eq!(
        history[0].remarks.as_deref(),
        Some("Forwarded to HR Admin for review")
    );
}

#[tokio::test]
async fn test_scenario_b_approve_moves_file_atomically() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    let forward = h.forward_to_hr(&h.uma, &file, Priority::Normal).await;

    let outcome = h
        .services
        .workflow
        .approve(&ctx(&h.hana), forward.id, "Alice", None)
        .await
        .unwrap();
    assert_eq!(outcome.message, "File approved and distributed to Alice");
    assert_eq!(outcome.data.status, ForwardStatus::DistributedToEmployee);
    assert_eq!(outcome.data.distributed_to.as_deref(), Some("Alice"));
    assert_eq!(outcome.data.admin_approved_by.as_deref(), Some("Hana"));

    let file = h.reload(&file).await;
    assert_eq!(file.status, FileStatus::Released);
    assert_eq!(file.current_holder, "Alice");
    assert_eq!(file.department, Department::Hr);
}

#[tokio::test]
async fn test_scenario_c_only_distributee_can_receive() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    let forward = h.forward_to_hr(&h.uma, &file, Priority::Normal).await;
    h.services
        .workflow
        .approve(&ctx(&h.hana), forward.id, "Alice", None)
        .await
        .unwrap();

    let err = h
        .services
        .workflow
        .receive(&ctx(&h.bob), forward.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert_eq!(err.message, "You are not authorized to receive this file");

    // Superadmins cannot receive on someone's behalf either.
    let err = h
        .services
        .workflow
        .receive(&ctx(&h.sam), forward.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_scenario_d_receive_then_complete_leaves_file_received() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    let forward = h.forward_to_hr(&h.uma, &file, Priority::Normal).await;
    h.services
        .workflow
        .approve(&ctx(&h.hana), forward.id, "Alice", None)
        .await
        .unwrap();

    let received = h
        .services
        .workflow
        .receive(&ctx(&h.alice), forward.id)
        .await
        .unwrap();
    assert_eq!(received.data.status, ForwardStatus::Received);
    assert!(received.data.received_at.is_some());
    let after_receive = h.reload(&file).await;
    assert_eq!(after_receive.status, FileStatus::Received);
    assert_eq!(after_receive.current_holder, "Alice");
    assert_eq!(after_receive.assigned_to.as_deref(), Some("Alice"));

    let completed = h
        .services
        .workflow
        .complete(&ctx(&h.alice), forward.id, Some("Done".into()))
        .await
        .unwrap();
    assert_eq!(completed.data.status, ForwardStatus::Completed);
    assert_eq!(completed.message, "File marked as completed successfully");
    assert_eq!(h.reload(&file).await.status, FileStatus::Received);

    let history = h.history(&file).await;
    assert_eq!(history[0].action, "File Completed");
    assert_eq!(history[0].remarks.as_deref(), Some("Done"));
}

#[tokio::test]
async fn test_scenario_e_reject_returns_to_sender() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    let forward = h.forward_to_hr(&h.uma, &file, Priority::Urgent).await;

    let outcome = h
        .services
        .workflow
        .reject(&ctx(&h.hana), forward.id, "wrong department")
        .await
        .unwrap();
    assert_eq!(outcome.data.status, ForwardStatus::Rejected);
    assert_eq!(
        outcome.data.admin_remarks.as_deref(),
        Some("Rejected: wrong department")
    );

    let history = h.history(&file).await;
    assert_eq!(history[0].action, "Admin Rejected");
    assert_eq!(history[0].recipient_name.as_deref(), Some("Uma"));

    let file_after = h.reload(&file).await;
    assert_eq!(file_after.status, FileStatus::Created);
    assert_eq!(file_after.current_holder, "Uma");
    assert_eq!(file_after.department, Department::It);
}

#[tokio::test]
async fn test_reject_requires_reason() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    let forward = h.forward_to_hr(&h.uma, &file, Priority::Normal).await;

    let err = h
        .services
        .workflow
        .reject(&ctx(&h.hana), forward.id, "   ")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.details.unwrap()["field"], "rejectionReason");
}

#[tokio::test]
async fn test_complete_before_receive_is_invalid_state() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    let forward = h.forward_to_hr(&h.uma, &file, Priority::Normal).await;
    h.services
        .workflow
        .approve(&ctx(&h.hana), forward.id, "Alice", None)
        .await
        .unwrap();

    let err = h
        .services
        .workflow
        .complete(&ctx(&h.alice), forward.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
    assert_eq!(err.message, "File must be received before it can be completed");
    assert_eq!(current_status(&err), "Distributed to Employee");
}

#[tokio::test]
async fn test_pending_forward_cannot_skip_to_received_or_completed() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    let forward = h.forward_to_hr(&h.uma, &file, Priority::Normal).await;

    assert!(
        h.services
            .workflow
            .receive(&ctx(&h.alice), forward.id)
            .await
            .is_err()
    );
    assert!(
        h.services
            .workflow
            .complete(&ctx(&h.alice), forward.id, None)
            .await
            .is_err()
    );
    let current = h.services.forward_queries.get(forward.id).await.unwrap();
    assert_eq!(current.status, ForwardStatus::PendingAdminReview);
}

#[tokio::test]
async fn test_second_approval_is_refused() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    let forward = h.forward_to_hr(&h.uma, &file, Priority::Normal).await;
    h.services
        .workflow
        .approve(&ctx(&h.hana), forward.id, "Alice", None)
        .await
        .unwrap();

    let err = h
        .services
        .workflow
        .approve(&ctx(&h.hana), forward.id, "Bob", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
    assert_eq!(err.message, "Forward is not pending admin review");
    assert_eq!(h.reload(&file).await.current_holder, "Alice");
}

#[tokio::test]
async fn test_concurrent_approvals_commit_once() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    let forward = h.forward_to_hr(&h.uma, &file, Priority::Normal).await;

    let hana = ctx(&h.hana);
    let sam = ctx(&h.sam);
    let (first, second) = tokio::join!(
        h.services.workflow.approve(&hana, forward.id, "Alice", None),
        h.services.workflow.approve(&sam, forward.id, "Bob", None),
    );
    assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
    let loser = first.err().or(second.err()).unwrap();
    assert_eq!(loser.kind, ErrorKind::InvalidState);
    assert_eq!(current_status(&loser), "Distributed to Employee");

    let approvals = h
        .history(&file)
        .await
        .into_iter()
        .filter(|m| m.action == "Admin Approved & Distributed")
        .count();
    assert_eq!(approvals, 1);
}

#[tokio::test]
async fn test_admin_of_other_department_cannot_approve() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    let forward = h.forward_to_hr(&h.uma, &file, Priority::Normal).await;

    let err = h
        .services
        .workflow
        .approve(&ctx(&h.ivan), forward.id, "Alice", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert_eq!(
        err.message,
        "Not authorized to approve forwards for this department"
    );

    let err = h
        .services
        .workflow
        .approve(&ctx(&h.alice), forward.id, "Alice", None)
        .await
        .unwrap_err();
    assert_eq!(err.message, "Only department admins can approve forwards");

    h.services
        .workflow
        .approve(&ctx(&h.sam), forward.id, "Alice", None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_forward_requires_holder_and_department_admin() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;

    let err = h
        .services
        .workflow
        .create_forward(
            &ctx(&h.bob),
            CreateForwardInput {
                file_code: file.code.clone(),
                recipient_department: Department::Hr,
                recipient_name: "Alice".into(),
                priority: Priority::Normal,
                sent_through: None,
                remarks: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let err = h
        .services
        .workflow
        .create_forward(
            &ctx(&h.uma),
            CreateForwardInput {
                file_code: file.code.clone(),
                recipient_department: Department::Legal,
                recipient_name: "Lee".into(),
                priority: Priority::Normal,
                sent_through: None,
                remarks: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message, "No admin found for department: Legal");

    let err = h
        .services
        .workflow
        .create_forward(
            &ctx(&h.uma),
            CreateForwardInput {
                file_code: "THDC-F-1999-0001".into(),
                recipient_department: Department::Hr,
                recipient_name: "Alice".into(),
                priority: Priority::Normal,
                sent_through: None,
                remarks: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_every_transition_appends_one_movement() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    assert_eq!(h.history(&file).await.len(), 1);

    let forward = h.forward_to_hr(&h.uma, &file, Priority::Normal).await;
    assert_eq!(h.history(&file).await.len(), 2);

    h.services
        .workflow
        .approve(&ctx(&h.hana), forward.id, "Alice", None)
        .await
        .unwrap();
    assert_eq!(h.history(&file).await.len(), 3);

    h.services
        .workflow
        .receive(&ctx(&h.alice), forward.id)
        .await
        .unwrap();
    assert_eq!(h.history(&file).await.len(), 4);

    h.services
        .workflow
        .complete(&ctx(&h.alice), forward.id, None)
        .await
        .unwrap();
    let history = h.history(&file).await;
    assert_eq!(history.len(), 5);
    assert!(history.iter().all(|m| !m.action.is_empty()));

    let actions: Vec<&str> = history.iter().rev().map(|m| m.action.as_str()).collect();
    assert_eq!(
        actions,
        [
            "Created",
            "Forwarded to Admin",
            "Admin Approved & Distributed",
            "File Received",
            "File Completed"
        ]
    );
}

#[tokio::test]
async fn test_codes_increase_within_year() {
    let h = Harness::new().await;
    let year = current_year();
    for seq in 1..=3 {
        let file = h.create_file(&h.uma, &format!("File {seq}")).await;
        assert_eq!(file.code, format!("THDC-F-{year}-{seq:04}"));
    }
}

#[tokio::test]
async fn test_deleted_codes_are_not_reissued() {
    let h = Harness::new().await;
    let year = current_year();
    let mut files = Vec::new();
    for seq in 1..=5 {
        files.push(h.create_file(&h.uma, &format!("File {seq}")).await);
    }
    for file in &files[1..] {
        h.services.files.delete(&ctx(&h.ivan), file.id).await.unwrap();
    }

    let next = h.create_file(&h.uma, "File 6").await;
    assert_eq!(next.code, format!("THDC-F-{year}-0006"));
    assert!(files.iter().all(|f| f.code < next.code));
    assert_eq!(h.history(&next).await.len(), 1);
}

#[tokio::test]
async fn test_update_forward_recomputes_urgency() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    let forward = h.forward_to_hr(&h.uma, &file, Priority::Normal).await;
    assert!(!forward.is_urgent);

    let updated = h
        .services
        .workflow
        .update_forward(
            &ctx(&h.uma),
            forward.id,
            UpdateForwardInput {
                priority: Some(Priority::Urgent),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.is_urgent);
    assert_eq!(updated.status, ForwardStatus::PendingAdminReview);

    let err = h
        .services
        .workflow
        .update_forward(&ctx(&h.bob), forward.id, UpdateForwardInput::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_terminal_forward_cannot_be_modified() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    let forward = h.forward_to_hr(&h.uma, &file, Priority::Normal).await;
    h.services
        .workflow
        .reject(&ctx(&h.hana), forward.id, "duplicate")
        .await
        .unwrap();

    let err = h
        .services
        .workflow
        .update_forward(
            &ctx(&h.uma),
            forward.id,
            UpdateForwardInput {
                priority: Some(Priority::Critical),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
    assert_eq!(current_status(&err), "Rejected");
}

#[tokio::test]
async fn test_direct_release() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Server rack").await;

    let err = h
        .services
        .workflow
        .release(&ctx(&h.uma), file.id, "Tom", None)
        .await
        .unwrap_err();
    assert_eq!(err.message, "Only admins can release files");

    let err = h
        .services
        .workflow
        .release(&ctx(&h.hana), file.id, "Tom", None)
        .await
        .unwrap_err();
    assert_eq!(
        err.message,
        "Not authorized to release files for this department"
    );

    let outcome = h
        .services
        .workflow
        .release(&ctx(&h.ivan), file.id, "Tom", None)
        .await
        .unwrap();
    assert_eq!(outcome.message, "File released to Tom");
    assert_eq!(outcome.data.status, FileStatus::Released);
    assert_eq!(outcome.data.current_holder, "Tom");
    assert_eq!(outcome.data.assigned_to.as_deref(), Some("Tom"));

    let history = h.history(&file).await;
    assert_eq!(history[0].action, "Released");
    assert_eq!(history[0].sent_through.as_deref(), Some("Direct Release"));
    assert_eq!(history[0].remarks.as_deref(), Some("File released to Tom"));
}

#[tokio::test]
async fn test_release_requires_employee_of_file_department() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Server rack").await;

    for name in ["Bob", "Phantom"] {
        let err = h
            .services
            .workflow
            .release(&ctx(&h.ivan), file.id, name, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.details.as_ref().unwrap()["field"], "assignedTo");
        assert_eq!(err.message, format!("{name} is not an employee of IT"));
    }

    let file = h.reload(&file).await;
    assert_eq!(file.status, FileStatus::Created);
    assert_eq!(file.current_holder, "Uma");
    assert_eq!(h.history(&file).await.len(), 1);
}

#[tokio::test]
async fn test_approve_requires_employee_of_recipient_department() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    let forward = h.forward_to_hr(&h.uma, &file, Priority::Normal).await;

    for name in ["Nobody", "Tom"] {
        let err = h
            .services
            .workflow
            .approve(&ctx(&h.hana), forward.id, name, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.details.as_ref().unwrap()["field"], "distributedTo");
        assert_eq!(err.message, format!("{name} is not an employee of HR"));
    }

    let unchanged = h.services.forward_queries.get(forward.id).await.unwrap();
    assert_eq!(unchanged.status, ForwardStatus::PendingAdminReview);
    let file = h.reload(&file).await;
    assert_eq!(file.status, FileStatus::Created);
    assert_eq!(file.current_holder, "Uma");

    // Still open for a valid distributee.
    h.services
        .workflow
        .approve(&ctx(&h.hana), forward.id, "Alice", None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_notifications_follow_the_workflow() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    let forward = h.forward_to_hr(&h.uma, &file, Priority::Critical).await;
    h.dispatcher.flush().await;

    let inbox = h
        .services
        .notifications
        .list(&ctx(&h.hana), PageRequest::default(), false, None)
        .await
        .unwrap();
    assert_eq!(inbox.unread_count, 1);
    let notice = &inbox.page.items[0];
    assert_eq!(notice.title, "New Forward Request");
    assert_eq!(
        notice.message,
        format!(
            "You have a new forward request from Uma for file {}.",
            file.code
        )
    );
    assert!(notice.is_urgent);
    assert_eq!(notice.forward_id, Some(forward.id));

    h.services
        .workflow
        .approve(&ctx(&h.hana), forward.id, "Alice", Some("Handle today".into()))
        .await
        .unwrap();
    h.dispatcher.flush().await;

    let alice_inbox = h
        .services
        .notifications
        .list(&ctx(&h.alice), PageRequest::default(), true, None)
        .await
        .unwrap();
    assert_eq!(alice_inbox.page.items[0].title, "File Distributed to You");
    assert_eq!(alice_inbox.page.items[0].icon, "📋");

    let uma_inbox = h
        .services
        .notifications
        .list(&ctx(&h.uma), PageRequest::default(), false, None)
        .await
        .unwrap();
    assert_eq!(
        uma_inbox.page.items[0].title,
        "Forward Approved & Distributed"
    );

    h.services
        .workflow
        .receive(&ctx(&h.alice), forward.id)
        .await
        .unwrap();
    h.services
        .workflow
        .complete(&ctx(&h.alice), forward.id, None)
        .await
        .unwrap();
    h.dispatcher.flush().await;

    let hana_count = h
        .services
        .notifications
        .unread_count(&ctx(&h.hana))
        .await
        .unwrap();
    // New request, received, completed.
    assert_eq!(hana_count, 3);

    let marked = h
        .services
        .notifications
        .mark_all_read(&ctx(&h.hana))
        .await
        .unwrap();
    assert_eq!(marked, 3);
    assert_eq!(
        h.services
            .notifications
            .unread_count(&ctx(&h.hana))
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_shutdown_drains_queued_notifications() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    h.forward_to_hr(&h.uma, &file, Priority::Normal).await;
    h.dispatcher.shutdown().await;

    let count = h
        .services
        .notifications
        .unread_count(&ctx(&h.hana))
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_file_listing_is_role_scoped() {
    let h = Harness::new().await;
    let uma_file = h.create_file(&h.uma, "Network upgrade").await;
    h.create_file(&h.alice, "Leave policy").await;

    let uma_sees = h
        .services
        .file_queries
        .list(&ctx(&h.uma), FileQuery::default())
        .await
        .unwrap();
    assert_eq!(uma_sees.len(), 1);
    assert_eq!(uma_sees[0].code, uma_file.code);

    let hana_sees = h
        .services
        .file_queries
        .list(&ctx(&h.hana), FileQuery::default())
        .await
        .unwrap();
    assert_eq!(hana_sees.len(), 1);
    assert_eq!(hana_sees[0].title, "Leave policy");

    let sam_sees = h
        .services
        .file_queries
        .list(&ctx(&h.sam), FileQuery::default())
        .await
        .unwrap();
    assert_eq!(sam_sees.len(), 2);

    // Search is ANDed with the scope.
    let hits = h
        .services
        .file_queries
        .search(&ctx(&h.hana), "network", None)
        .await
        .unwrap();
    assert!(hits.is_empty());
    let hits = h
        .services
        .file_queries
        .search(&ctx(&h.sam), "NETWORK", None)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);

    let err = h
        .services
        .file_queries
        .search(&ctx(&h.sam), "", None)
        .await
        .unwrap_err();
    assert_eq!(err.message, "Search query is required");
}

#[tokio::test]
async fn test_manual_status_change_is_recorded() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;

    let updated = h
        .services
        .files
        .update(
            &ctx(&h.uma),
            file.id,
            UpdateFileInput {
                status: Some(FileStatus::OnHold),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, FileStatus::OnHold);
    let history = h.history(&file).await;
    assert_eq!(history[0].action, "On Hold");
    assert_eq!(history[0].icon.as_deref(), Some("🕒"));
    assert_eq!(history[0].remarks.as_deref(), Some("Status changed to On Hold"));

    h.services
        .files
        .update(
            &ctx(&h.uma),
            file.id,
            UpdateFileInput {
                status: Some(FileStatus::Complete),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let err = h
        .services
        .files
        .update(
            &ctx(&h.uma),
            file.id,
            UpdateFileInput {
                status: Some(FileStatus::Received),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);

    let err = h
        .services
        .files
        .update(&ctx(&h.bob), file.id, UpdateFileInput::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_user_stats_are_scoped() {
    let h = Harness::new().await;
    let routed = h.create_file(&h.uma, "Network upgrade").await;
    h.create_file(&h.uma, "Laptop request").await;
    h.create_file(&h.ivan, "Firewall").await;
    let forward = h.forward_to_hr(&h.uma, &routed, Priority::Normal).await;
    h.services
        .workflow
        .approve(&ctx(&h.hana), forward.id, "Alice", None)
        .await
        .unwrap();

    let counts = |rows: Vec<filetrack_service::report::UserStats>| -> Vec<(String, u64, u64)> {
        rows.into_iter()
            .map(|r| (r.name, r.files_created, r.files_received))
            .collect()
    };
    let row = |name: &str, created: u64, received: u64| (name.to_string(), created, received);

    let all = h.services.reports.user_stats(&ctx(&h.sam)).await.unwrap();
    assert_eq!(
        counts(all),
        [
            row("Sam", 0, 0),
            row("Alice", 0, 1),
            row("Bob", 0, 0),
            row("Hana", 0, 0),
            row("Ivan", 1, 1),
            row("Tom", 0, 0),
            row("Uma", 2, 1),
        ]
    );

    // The routed file now belongs to HR, outside Ivan's view.
    let it = h.services.reports.user_stats(&ctx(&h.ivan)).await.unwrap();
    assert_eq!(
        counts(it),
        [row("Ivan", 1, 1), row("Tom", 0, 0), row("Uma", 1, 1)]
    );

    let own = h.services.reports.user_stats(&ctx(&h.uma)).await.unwrap();
    assert_eq!(counts(own), [row("Uma", 2, 1)]);
}

#[tokio::test]
async fn test_dashboard_counts_follow_store_state() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    h.create_file(&h.ivan, "Firewall").await;
    let forward = h.forward_to_hr(&h.uma, &file, Priority::Critical).await;

    let stats = h
        .services
        .reports
        .dashboard_stats(&ctx(&h.sam), None)
        .await
        .unwrap();
    assert_eq!(stats.total_files, 2);
    assert_eq!(stats.files_today, 2);
    assert_eq!(stats.digital_files, 2);

    let forwarding = h
        .services
        .reports
        .forwarding_stats(&ctx(&h.sam))
        .await
        .unwrap();
    assert_eq!(forwarding.total_forwards, 1);
    assert_eq!(forwarding.pending_admin_review, 1);
    assert_eq!(forwarding.urgent_forwards, 1);
    assert_eq!(forwarding.by_department[&Department::Hr].total, 1);

    h.services
        .workflow
        .approve(&ctx(&h.hana), forward.id, "Alice", None)
        .await
        .unwrap();
    let statuses = h
        .services
        .reports
        .status_distribution(&ctx(&h.sam))
        .await
        .unwrap();
    let released = statuses
        .iter()
        .find(|s| s.status == FileStatus::Released)
        .unwrap();
    assert_eq!(released.count, 1);

    let dept = h
        .services
        .forward_queries
        .department_stats(&ctx(&h.hana), Department::Hr)
        .await
        .unwrap();
    assert_eq!(dept.distributed_to_employee, 1);
    assert_eq!(dept.today_forwards, 1);

    let err = h
        .services
        .forward_queries
        .department_stats(&ctx(&h.ivan), Department::Hr)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_recent_activity_is_scoped_to_visible_files() {
    let h = Harness::new().await;
    h.create_file(&h.uma, "Network upgrade").await;
    h.create_file(&h.alice, "Leave policy").await;

    let uma_activity = h
        .services
        .reports
        .recent_activity(&ctx(&h.uma), 10)
        .await
        .unwrap();
    assert_eq!(uma_activity.len(), 1);
    assert_eq!(uma_activity[0].user_name, "Uma");

    let all = h
        .services
        .reports
        .recent_activity(&ctx(&h.sam), 1)
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].user_name, "Alice");
}

#[tokio::test]
async fn test_movement_corrections_are_admin_only() {
    let h = Harness::new().await;
    let file = h.create_file(&h.uma, "Network upgrade").await;
    let movement = h.history(&file).await.remove(0);

    let err = h
        .services
        .movements
        .delete(&ctx(&h.uma), movement.id)
        .await
        .unwrap_err();
    assert_eq!(err.message, "Only admins can modify movement records");

    h.services
        .movements
        .delete(&ctx(&h.ivan), movement.id)
        .await
        .unwrap();
    assert!(h.history(&file).await.is_empty());
}

#[tokio::test]
async fn test_employee_directory() {
    let h = Harness::new().await;
    let employees = h
        .services
        .directory
        .employees(&ctx(&h.hana), Department::Hr)
        .await
        .unwrap();
    let names: Vec<&str> = employees.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["Alice", "Bob", "Hana"]);
}

//! HTTP-level tests: the router over an in-memory store.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use filetrack_api::{AppState, build_router};
use filetrack_auth::JwtEncoder;
use filetrack_core::config::AppConfig;
use filetrack_database::{MemoryStore, Stores, UserDirectory};
use filetrack_entity::{Department, User, UserRole};
use filetrack_service::{LogMailer, QueuedDispatcher, Services};

struct TestApp {
    router: Router,
    dispatcher: Arc<QueuedDispatcher>,
    encoder: JwtEncoder,
    users: Vec<User>,
}

impl TestApp {
    async fn new() -> Self {
        let config = AppConfig::default();
        let stores = Stores::memory(MemoryStore::new());

        let users = vec![
            User::new("Uma", None, Department::It, UserRole::User),
            User::new("Ivan", None, Department::It, UserRole::Admin),
            User::new("Hana", None, Department::Hr, UserRole::Admin),
            User::new("Alice", None, Department::Hr, UserRole::User),
            User::new("Bob", None, Department::Hr, UserRole::User),
        ];
        for user in &users {
            stores.users.insert(user).await.unwrap();
        }

        let dispatcher = QueuedDispatcher::start(
            stores.users.clone(),
            stores.notifications.clone(),
            Arc::new(LogMailer),
            config.notifications.clone(),
        );
        let services = Services::new(&stores, &config, dispatcher.clone());
        let encoder = JwtEncoder::new(&config.auth);
        let router = build_router(AppState::new(config, services));

        Self {
            router,
            dispatcher,
            encoder,
            users,
        }
    }

    fn token(&self, name: &str) -> String {
        let user = self.users.iter().find(|u| u.name == name).unwrap();
        self.encoder.issue(user).unwrap().0
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        as_user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(name) = as_user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(name)));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_file(&self, as_user: &str, title: &str, department: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/files",
                Some(as_user),
                Some(json!({ "title": title, "department": department })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"].clone()
    }

    async fn forward_to_hr(&self, as_user: &str, code: &str, priority: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/forwards",
                Some(as_user),
                Some(json!({
                    "fileCode": code,
                    "recipientDepartment": "HR",
                    "recipientName": "Alice",
                    "priority": priority,
                    "sentThrough": "Courier"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "File forwarded to HR Admin for review");
        body["data"].clone()
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/api/files", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_unknown_route_uses_envelope() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/api/nothing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_forwarding_workflow_over_http() {
    let app = TestApp::new().await;
    let file = app.create_file("Uma", "Network upgrade", "IT").await;
    let code = file["code"].as_str().unwrap().to_string();
    assert_eq!(file["status"], "Created");

    let forward = app.forward_to_hr("Uma", &code, "Critical").await;
    let id = forward["id"].as_str().unwrap().to_string();
    assert_eq!(forward["status"], "Pending Admin Review");
    assert_eq!(forward["isUrgent"], true);
    assert_eq!(forward["recipientName"], "Hana");

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/forwards/{id}/approve"),
            Some("Hana"),
            Some(json!({ "distributedTo": "Alice" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "File approved and distributed to Alice");
    assert_eq!(body["data"]["status"], "Distributed to Employee");

    let (status, body) = app
        .send(Method::GET, &format!("/api/files/code/{code}"), Some("Alice"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Released");
    assert_eq!(body["data"]["currentHolder"], "Alice");
    assert_eq!(body["data"]["department"], "HR");

    let (status, body) = app
        .send(Method::POST, &format!("/api/forwards/{id}/receive"), Some("Bob"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
    assert_eq!(body["message"], "You are not authorized to receive this file");

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/forwards/{id}/complete"),
            Some("Alice"),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_STATE");
    assert_eq!(body["details"]["currentStatus"], "Distributed to Employee");

    let (status, _) = app
        .send(Method::POST, &format!("/api/forwards/{id}/receive"), Some("Alice"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/forwards/{id}/complete"),
            Some("Alice"),
            Some(json!({ "remarks": "Done" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Completed");

    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/movements/file/{code}"),
            Some("Uma"),
            None,
        )
        .await;
    assert_eq!(body["count"], 5);
    assert_eq!(body["data"][0]["action"], "File Completed");
    assert_eq!(body["data"][0]["user"], "Alice");
}

#[tokio::test]
async fn test_invalid_enum_is_rejected_at_boundary() {
    let app = TestApp::new().await;
    let file = app.create_file("Uma", "Network upgrade", "IT").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/forwards",
            Some("Uma"),
            Some(json!({
                "fileCode": file["code"],
                "recipientDepartment": "HR",
                "recipientName": "Alice",
                "priority": "Whenever"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["details"]["field"], "priority");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/files",
            Some("Uma"),
            Some(json!({ "title": "x", "department": "Marketing" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "department");
}

#[tokio::test]
async fn test_empty_rejection_reason_fails_validation() {
    let app = TestApp::new().await;
    let file = app.create_file("Uma", "Network upgrade", "IT").await;
    let forward = app
        .forward_to_hr("Uma", file["code"].as_str().unwrap(), "Normal")
        .await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/forwards/{}/reject", forward["id"].as_str().unwrap()),
            Some("Hana"),
            Some(json!({ "rejectionReason": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Rejection reason is required");
}

#[tokio::test]
async fn test_file_listing_paginates_on_request() {
    let app = TestApp::new().await;
    app.create_file("Uma", "First", "IT").await;
    app.create_file("Uma", "Second", "IT").await;

    let (status, body) = app
        .send(Method::GET, "/api/files?page=1&limit=1", Some("Uma"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["title"], "Second");
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["totalPages"], 2);
    assert_eq!(body["pagination"]["totalItems"], 2);
    assert_eq!(body["pagination"]["itemsPerPage"], 1);

    let (_, body) = app.send(Method::GET, "/api/files", Some("Uma"), None).await;
    assert_eq!(body["count"], 2);
    assert!(body.get("pagination").is_none());

    let (_, body) = app.send(Method::GET, "/api/files", Some("Alice"), None).await;
    assert_eq!(body["count"], 0);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/files?page={}&limit=1", u64::MAX),
            Some("Uma"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["pagination"]["totalItems"], 2);
}

#[tokio::test]
async fn test_notifications_inbox() {
    let app = TestApp::new().await;
    let file = app.create_file("Uma", "Network upgrade", "IT").await;
    app.forward_to_hr("Uma", file["code"].as_str().unwrap(), "Urgent")
        .await;
    app.dispatcher.flush().await;

    let (status, body) = app
        .send(Method::GET, "/api/notifications", Some("Hana"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["unreadCount"], 1);
    let notice = &body["data"]["notifications"][0];
    assert_eq!(notice["title"], "New Forward Request");
    assert_eq!(notice["type"], "file_forwarded");
    assert_eq!(notice["isUrgent"], true);

    let id = notice["id"].as_str().unwrap().to_string();
    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/notifications/{id}/read"),
            Some("Hana"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isRead"], true);

    // Another user cannot see it.
    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/notifications/{id}"),
            Some("Alice"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app
        .send(Method::GET, "/api/notifications/unread-count", Some("Hana"), None)
        .await;
    assert_eq!(body["data"]["count"], 0);
}

#[tokio::test]
async fn test_employees_for_department_admin() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(Method::GET, "/api/users/employees/HR", Some("Hana"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);

    let (status, _) = app
        .send(Method::GET, "/api/users/employees/HR", Some("Ivan"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_dashboard_stats_are_scoped() {
    let app = TestApp::new().await;
    app.create_file("Uma", "Network upgrade", "IT").await;
    app.create_file("Alice", "Leave policy", "HR").await;

    let (status, body) = app
        .send(Method::GET, "/api/dashboard/stats", Some("Uma"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalFiles"], 1);

    let (_, body) = app
        .send(Method::GET, "/api/dashboard/forwarding", Some("Hana"), None)
        .await;
    assert_eq!(body["data"]["totalForwards"], 0);
}

#[tokio::test]
async fn test_user_stats_endpoint() {
    let app = TestApp::new().await;
    app.create_file("Alice", "Leave policy", "HR").await;

    let (status, body) = app
        .send(Method::GET, "/api/dashboard/user-stats", Some("Hana"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["data"][0]["name"], "Alice");
    assert_eq!(body["data"][0]["department"], "HR");
    assert_eq!(body["data"][0]["filesCreated"], 1);
    assert_eq!(body["data"][0]["filesReceived"], 1);

    let (_, body) = app
        .send(Method::GET, "/api/dashboard/user-stats", Some("Bob"), None)
        .await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "Bob");
    assert_eq!(body["data"][0]["filesCreated"], 0);
}

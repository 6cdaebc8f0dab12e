//! Gateways over the real HTTP transport against a mock backend.

use std::sync::Arc;

use serde_json::json;
use taskhub_auth::{AuthService, MemorySessionStore, Session};
use taskhub_client::{
    ApiClient, ApiErrorKind, HttpTransport, ListSource, ResourceGateway,
};
use taskhub_core::{ListDescriptor, ProjectId, StatusDialect, TaskId, TaskPatch, TaskStatus};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn api(server: &MockServer, dialect: StatusDialect) -> ApiClient {
    let base = format!("{}/api", server.uri());
    let store = MemorySessionStore::with_session(Session {
        access_token: "old".into(),
        refresh_token: Some("r".into()),
        user: None,
    });
    let auth = Arc::new(AuthService::new(
        reqwest::Client::new(),
        base.clone(),
        Arc::new(store),
    ));
    let transport = HttpTransport::new(reqwest::Client::new(), base, auth);
    ApiClient::new(Arc::new(transport), dialect)
}

#[tokio::test]
async fn search_descriptor_sends_only_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(query_param("search", "homepage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"tasks": [{"_id": "t1", "title": "Design Homepage Layout"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = api(&server, StatusDialect::Standard)
        .tasks()
        .list(&ListDescriptor::new().with_search("homepage"))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default();
    assert_eq!(query, "search=homepage");
}

#[tokio::test]
async fn backend_message_array_is_joined() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false, "message": ["A", "B"]
        })))
        .mount(&server)
        .await;

    let err = api(&server, StatusDialect::Standard)
        .projects()
        .create(&taskhub_core::ProjectDraft {
            name: "Website".into(),
            description: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "A, B");
    assert_eq!(err.kind, ApiErrorKind::Rejected);
}

#[tokio::test]
async fn expired_token_is_refreshed_transparently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/p1"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "data": {"accessToken": "fresh"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects/p1"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "data": {"_id": "p1", "name": "Website", "status": "active"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let project = api(&server, StatusDialect::Standard)
        .projects()
        .get(&ProjectId::from("p1"))
        .await
        .unwrap();
    assert_eq!(project.name, "Website");
}

#[tokio::test]
async fn failed_refresh_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = api(&server, StatusDialect::Standard)
        .tasks()
        .list(&ListDescriptor::new())
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn legacy_dialect_status_update() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/tasks/1"))
        .respond_with(|req: &Request| {
            let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
            ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"id": 1, "title": "Nav", "status": body["status"]}
            }))
        })
        .expect(1)
        .mount(&server)
        .await;

    let task = api(&server, StatusDialect::Legacy)
        .tasks()
        .update(&TaskId::from(1), &TaskPatch::status(TaskStatus::Completed))
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::Completed);

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent, json!({"status": "done"}));
}

//! HTTP 传输层对接模拟后端

use std::sync::Arc;
use std::time::Duration;

use roster_console::backend::requests::{CreateEnrollment, DeleteEnrollment};
use roster_console::backend::{BackendClient, Ensured, HttpTransport};
use roster_console::config::BackendConfig;
use roster_console::errors::RosterError;
use roster_console::models::directory::entities::PersonRole;
use serde_json::json;
use wiremock::matchers::{bearer_token, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, timeout_ms: u64) -> BackendClient {
    let config = BackendConfig {
        base_url: format!("{}/api/", server.uri()),
        api_token: "secret-token".to_string(),
        institution_id: "inst-1".to_string(),
        timeout_ms,
        ..Default::default()
    };
    let transport = HttpTransport::new(&config).expect("transport");
    BackendClient::new(Arc::new(transport), config.institution_id.clone())
}

fn enrollment() -> CreateEnrollment {
    CreateEnrollment {
        user_id: "u1".into(),
        course_id: "c1".into(),
        class_id: Some("s1".into()),
        role: PersonRole::Student,
    }
}

#[tokio::test]
async fn list_people_sends_token_and_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("includeArchived", "true"))
        .and(query_param("role", "TEACHER"))
        .and(bearer_token("secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [
                {"id": "u1", "name": "Ada", "email": "ada@x.com", "role": "TEACHER"},
                {"id": "u2", "email": "bob@x.com", "role": "TEACHER", "archivedAt": "2025-01-01T00:00:00Z"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let people = client_for(&server, 2_000)
        .list_people(Some(PersonRole::Teacher))
        .await
        .expect("list");

    assert_eq!(people.len(), 2);
    assert_eq!(people[0].display_name(), "Ada");
    assert!(people[1].archived_at.is_some());
}

#[tokio::test]
async fn create_user_carries_institution_and_maps_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(body_partial_json(json!({
            "institutionId": "inst-1",
            "role": "STUDENT",
            "email": "dup@x.com"
        })))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "User already exists"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, 2_000)
        .create_user(PersonRole::Student, None, "dup@x.com".into())
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert!(err.message().contains("already exists"));
}

#[tokio::test]
async fn already_exists_message_is_a_conflict_even_on_400() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/enrollments"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Enrollment already exists"})),
        )
        .mount(&server)
        .await;

    let ensured = client_for(&server, 2_000)
        .ensure_enrolled(enrollment())
        .await
        .expect("idempotent enroll");
    assert_eq!(ensured, Ensured::AlreadySatisfied);
}

#[tokio::test]
async fn missing_enrollment_counts_as_removed() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/enrollments"))
        .and(body_partial_json(json!({"userId": "u1", "classId": "s1"})))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let ensured = client_for(&server, 2_000)
        .ensure_unenrolled(DeleteEnrollment::ByMember {
            user_id: "u1".into(),
            class_id: "s1".into(),
        })
        .await
        .expect("idempotent unenroll");
    assert_eq!(ensured, Ensured::AlreadySatisfied);
}

#[tokio::test]
async fn server_error_keeps_upstream_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "database offline"})))
        .mount(&server)
        .await;

    let err = client_for(&server, 2_000).list_courses().await.unwrap_err();
    assert!(matches!(err, RosterError::Upstream(_)));
    assert!(err.message().contains("database offline"));
    assert!(err.message().contains("500"));
}

#[tokio::test]
async fn slow_backend_becomes_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sections"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, 100).list_sections().await.unwrap_err();
    assert!(matches!(err, RosterError::UpstreamTimeout(_)));
}

#[tokio::test]
async fn empty_body_on_delete_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/sections"))
        .and(body_partial_json(json!({"sectionId": "s9"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server, 2_000)
        .delete_section("s9".into())
        .await
        .expect("delete");
}

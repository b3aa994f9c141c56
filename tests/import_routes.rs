//! 导入路由端到端：会话 -> 解析 -> 预览 -> 编辑 -> 清除 / 提交

use std::sync::Arc;

use actix_web::{App, test, web};
use roster_console::backend::{BackendClient, HttpTransport};
use roster_console::cache::{MembershipCache, StagingCache};
use roster_console::config::{BackendConfig, StagingConfig};
use roster_console::routes;
use roster_console::utils::{json_error_handler, query_error_handler};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> BackendClient {
    let config = BackendConfig {
        base_url: server.uri(),
        timeout_ms: 2_000,
        ..Default::default()
    };
    let transport = HttpTransport::new(&config).expect("transport");
    BackendClient::new(Arc::new(transport), "inst-1")
}

macro_rules! console_app {
    ($client:expr) => {{
        let staging_config = StagingConfig::default();
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new($client))
                .app_data(web::Data::new(StagingCache::from_config(&staging_config)))
                .app_data(web::Data::new(MembershipCache::from_config(&staging_config)))
                .configure(routes::configure_import_routes)
                .configure(routes::configure_membership_routes)
                .configure(routes::configure_roster_routes)
                .configure(routes::configure_admin_routes),
        )
        .await
    }};
}

#[actix_web::test]
async fn staged_teacher_import_roundtrip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("role", "TEACHER"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "u1", "name": "Old", "email": "old@x.com", "role": "TEACHER"}
        ])))
        .mount(&server)
        .await;
    let app = console_app!(backend(&server));

    // 分配会话
    let req = test::TestRequest::post()
        .uri("/api/v1/imports/sessions")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    let session = body["data"]["sessionId"].as_str().expect("session id").to_string();

    // 粘贴文本：新建、已存在、邮箱错误、批内重复
    let text = "name,email\nAda,ada@x.com\nOld,OLD@x.com\nBad,not-an-email\nAda Again,ADA@x.com";
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/imports/{session}/teachers/parse"))
        .set_json(json!({ "text": text }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    let preview = &body["data"];
    assert_eq!(preview["rows"].as_array().map(Vec::len), Some(4));
    assert_eq!(preview["rows"][0]["status"], "new");
    assert_eq!(preview["rows"][1]["status"], "exists");
    assert_eq!(preview["rows"][2]["status"], "invalid-email");
    assert_eq!(preview["rows"][3]["status"], "duplicate");
    assert_eq!(preview["counts"]["total"], 4);
    assert_eq!(preview["errorCount"], 2);

    // 修正第 3 行邮箱
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/imports/{session}/teachers/rows/2"))
        .set_json(json!({ "field": "email", "value": "bad@x.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["rows"][2]["status"], "new");
    assert_eq!(body["data"]["errorCount"], 1);

    // 越界行
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/imports/{session}/teachers/rows/9"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    // 其他目标不共享暂存
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/imports/{session}/students"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["rows"].as_array().map(Vec::len), Some(0));

    // 取消
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/imports/{session}/teachers"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/imports/{session}/teachers"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["counts"]["total"], 0);

    // 清除后提交没有可提交的行
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/imports/{session}/teachers/commit"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn empty_paste_is_rejected() {
    let server = MockServer::start().await;
    let app = console_app!(backend(&server));
    let session = uuid::Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/imports/{session}/courses/parse"))
        .set_json(json!({ "text": "  \n\n " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn malformed_path_parameters_are_rejected() {
    let server = MockServer::start().await;
    let app = console_app!(backend(&server));

    let req = test::TestRequest::get()
        .uri("/api/v1/imports/not-a-uuid/teachers")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let session = uuid::Uuid::new_v4();
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/imports/{session}/admins"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn template_download_is_header_only_csv() {
    let server = MockServer::start().await;
    let app = console_app!(backend(&server));

    let req = test::TestRequest::get()
        .uri("/api/v1/imports/templates/courses")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"));
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), b"code,name\n");
}

#[actix_web::test]
async fn deleting_a_section_requires_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "s0", "courseId": "c1", "name": "__default__"}
        ])))
        .mount(&server)
        .await;
    let app = console_app!(backend(&server));

    let req = test::TestRequest::delete()
        .uri("/api/v1/sections/s0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3000);

    // 默认班级不可删除
    let req = test::TestRequest::delete()
        .uri("/api/v1/sections/s0?confirm=true")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3001);
}

macro_rules! new_session {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/imports/sessions")
            .to_request();
        let body: Value = test::call_and_read_body_json($app, req).await;
        body["data"]["sessionId"].as_str().expect("session id").to_string()
    }};
}

#[actix_web::test]
async fn committing_students_keeps_going_after_a_failed_row() {
    let server = MockServer::start().await;
    // 解析时读取已有学生一次，提交后刷新一次
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("role", "STUDENT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_partial_json(json!({"email": "c@x.com"})))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "database offline"})))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_partial_json(json!({"role": "STUDENT", "institutionId": "inst-1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "user": {"id": "u-new", "email": "new@x.com", "role": "STUDENT"}
        })))
        .expect(4)
        .mount(&server)
        .await;
    let app = console_app!(backend(&server));
    let session = new_session!(&app);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/imports/{session}/students/parse"))
        .set_json(json!({ "text": "email\na@x.com\nb@x.com\nc@x.com\nd@x.com\ne@x.com" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["counts"]["total"], 5);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/imports/{session}/students/commit"))
        .set_json(json!({ "strategy": "per_row" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert_eq!(data["report"]["createdCount"], 4);
    assert_eq!(data["report"]["skippedCount"], 0);
    let errors = data["report"]["errors"].as_array().expect("errors");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].as_str().unwrap().starts_with("Row 3 (c@x.com)"));
    assert!(errors[0].as_str().unwrap().contains("database offline"));
    assert_eq!(data["errorSummary"].as_array().map(Vec::len), Some(1));
    assert_eq!(data["refreshed"]["collection"], "people");

    // 暂存行已清空，最近一次结果仍可见
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/imports/{session}/students"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["rows"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["data"]["counts"]["total"], 0);
    assert_eq!(body["data"]["lastReport"]["createdCount"], 4);
}

#[actix_web::test]
async fn commit_error_summary_is_capped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/courses"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "down"})))
        .expect(7)
        .mount(&server)
        .await;
    let app = console_app!(backend(&server));
    let session = new_session!(&app);

    let text = (1..=7)
        .map(|i| format!("C{i},Course {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/imports/{session}/courses/parse"))
        .set_json(json!({ "text": text }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/imports/{session}/courses/commit"))
        .set_json(json!({ "strategy": "per_row" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let data = &body["data"];
    assert_eq!(data["report"]["createdCount"], 0);
    assert_eq!(data["report"]["errors"].as_array().map(Vec::len), Some(7));
    let summary = data["errorSummary"].as_array().expect("summary");
    assert_eq!(summary.len(), 6);
    assert_eq!(summary[5], "+2 more");
}

#[actix_web::test]
async fn membership_commit_applies_plan_and_refreshes_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "s1", "courseId": "c1", "name": "A",
             "enrollments": [{"userId": "u-old", "role": "STUDENT"}]},
            {"id": "s2", "courseId": "c1", "name": "B"}
        ])))
        .mount(&server)
        .await;
    // 提交前解析邮箱一次，提交后重新聚合一次
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "u-old", "email": "old@x.com", "role": "STUDENT"},
            {"id": "u-new", "email": "new@x.com", "role": "STUDENT"}
        ])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "c1", "code": "MATH1", "name": "Algebra"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/exams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/enrollments"))
        .and(body_partial_json(json!({"userId": "u-old", "classId": "s1"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/enrollments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;
    let app = console_app!(backend(&server));
    let session = uuid::Uuid::new_v4();
    let base = format!("/api/v1/courses/c1/membership/{session}");

    // s1 的期望成员只有 u-new：移除 u-old、加入 u-new
    let req = test::TestRequest::put()
        .uri(&format!("{base}/sections/s1"))
        .set_json(json!({ "role": "STUDENT", "intended": ["u-new"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // u-old 调入 s2
    let req = test::TestRequest::put()
        .uri(&format!("{base}/sections/s2"))
        .set_json(json!({ "role": "STUDENT", "add": ["u-old"] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["pendingOperations"], 3);

    let req = test::TestRequest::post()
        .uri(&format!("{base}/commit"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert_eq!(data["report"]["removed"], 1);
    assert_eq!(data["report"]["added"], 2);
    assert_eq!(data["report"]["errors"].as_array().map(Vec::len), Some(0));
    assert!(!data["detail"].is_null());

    // 计划已清空，再次提交没有可保存的变更
    let req = test::TestRequest::get().uri(&base).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["pendingOperations"], 0);

    let req = test::TestRequest::post()
        .uri(&format!("{base}/commit"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

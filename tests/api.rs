use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use driveboard::auth::{SessionKeys, hash_password};
use driveboard::server::{AppState, create_router};
use driveboard::store::{SqliteStore, Store};
use driveboard::types::{Admin, AuditAction};

const ADMIN_EMAIL: &str = "admin@jmi.ac.in";
const ADMIN_PASSWORD: &str = "admin123";

struct TestApp {
    _temp_dir: TempDir,
    store: Arc<SqliteStore>,
    router: Router,
}

fn test_app() -> TestApp {
    let temp_dir = TempDir::new().expect("create temp dir");
    let store =
        Arc::new(SqliteStore::new(temp_dir.path().join("driveboard.db")).expect("open store"));
    store.initialize().expect("initialize schema");

    store
        .create_admin(&Admin {
            id: Uuid::new_v4().to_string(),
            name: "SPC Admin".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password_hash: hash_password(ADMIN_PASSWORD).expect("hash password"),
            phone: Some("+91-9876543210".to_string()),
            is_active: true,
            created_at: Utc::now(),
        })
        .expect("seed admin");

    let state = Arc::new(AppState {
        store: store.clone(),
        sessions: SessionKeys::new("test-secret"),
        secure_cookies: false,
    });

    TestApp {
        router: create_router(state, &[]),
        store,
        _temp_dir: temp_dir,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> axum::response::Response {
    app.router
        .clone()
        .oneshot(request)
        .await
        .expect("send request")
}

async fn request(
    app: &TestApp,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = send(app, request).await;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse body")
    };

    (status, value)
}

async fn login_admin(app: &TestApp) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/admin/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("admin token").to_string()
}

async fn login_student(app: &TestApp, name: &str, branch: &str) -> (String, Value) {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/student/login",
        None,
        Some(json!({ "name": name, "branch": branch })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("student token").to_string();
    (token, body)
}

#[tokio::test]
async fn health_check_is_public() {
    let app = test_app();

    let (status, body) = request(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = test_app();

    let (status, body) = request(&app, "GET", "/api/nonexistent", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn admin_login_returns_token_and_cookie() {
    let app = test_app();

    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/admin/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }).to_string(),
        ))
        .unwrap();
    let response = send(&app, req).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["email"], ADMIN_EMAIL);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn admin_login_failures_are_indistinguishable() {
    let app = test_app();

    let (wrong_pw_status, wrong_pw_body) = request(
        &app,
        "POST",
        "/api/auth/admin/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": "wrong" })),
    )
    .await;
    let (unknown_status, unknown_body) = request(
        &app,
        "POST",
        "/api/auth/admin/login",
        None,
        Some(json!({ "email": "nobody@jmi.ac.in", "password": ADMIN_PASSWORD })),
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body, unknown_body);
}

#[tokio::test]
async fn admin_login_requires_both_fields() {
    let app = test_app();

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/admin/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn student_login_always_creates_a_fresh_session() {
    let app = test_app();

    let (first_token, first_body) = login_student(&app, "Ayesha Khan", "CSE").await;
    let (_, second_body) = login_student(&app, "Ayesha Khan", "CSE").await;

    // Two identical logins get two distinct session ids.
    assert_ne!(first_body["user"]["id"], second_body["user"]["id"]);
    assert_eq!(first_body["user"]["role"], "student");
    assert_eq!(first_body["user"]["branch"], "CSE");

    let (status, me) = request(&app, "GET", "/api/auth/me", Some(&first_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["name"], "Ayesha Khan");
    assert_eq!(me["user"]["role"], "student");
}

#[tokio::test]
async fn student_login_requires_name_and_branch() {
    let app = test_app();

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/student/login",
        None,
        Some(json!({ "name": "Ayesha Khan" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn me_requires_a_session() {
    let app = test_app();

    let (status, _) = request(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(&app, "GET", "/api/auth/me", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cookie_takes_precedence_over_bearer_header() {
    let app = test_app();
    let admin_token = login_admin(&app).await;
    let (student_token, _) = login_student(&app, "Ayesha Khan", "CSE").await;

    let req = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("token={student_token}"))
        .header(header::AUTHORIZATION, format!("Bearer {admin_token}"))
        .body(Body::empty())
        .unwrap();
    let response = send(&app, req).await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["user"]["role"], "student");
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let app = test_app();

    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, req).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("removal cookie")
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn listing_requires_authentication() {
    let app = test_app();

    for path in ["/api/upcoming", "/api/ongoing", "/api/completed"] {
        let (status, _) = request(&app, "GET", path, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
async fn students_cannot_mutate() {
    let app = test_app();
    let (student_token, _) = login_student(&app, "Ayesha Khan", "CSE").await;

    let payload = json!({ "name": "Microsoft", "jd": "SDE-1", "status": "round" });
    let (status, _) = request(
        &app,
        "POST",
        "/api/ongoing",
        Some(&student_token),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The same payload from an admin succeeds and shows up in the listing.
    let admin_token = login_admin(&app).await;
    let (status, created) = request(
        &app,
        "POST",
        "/api/ongoing",
        Some(&admin_token),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, listed) = request(&app, "GET", "/api/ongoing", Some(&student_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["name"].as_str())
        .collect();
    assert!(names.contains(&"Microsoft"));
    assert_eq!(listed[0]["id"], created["id"]);
}

#[tokio::test]
async fn upcoming_round_trip_is_ordered_by_tentative_date() {
    let app = test_app();
    let admin_token = login_admin(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/upcoming",
        Some(&admin_token),
        Some(json!({ "name": "Infosys", "tentativeDate": "2026-03-22" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, created) = request(
        &app,
        "POST",
        "/api/upcoming",
        Some(&admin_token),
        Some(json!({
            "name": "Google India",
            "tentativeDate": "2026-03-15",
            "info": "Eligibility: CS/IT branches, CGPA >= 7.5"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Google India");

    let (status, listed) = request(&app, "GET", "/api/upcoming", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["name"], "Google India");
    assert_eq!(listed[1]["name"], "Infosys");
    // Listings are enriched with the creating admin's name and email.
    assert_eq!(listed[0]["admin"]["name"], "SPC Admin");
    assert_eq!(listed[0]["admin"]["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn upcoming_create_requires_name_and_date() {
    let app = test_app();
    let admin_token = login_admin(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/upcoming",
        Some(&admin_token),
        Some(json!({ "name": "Google India" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &app,
        "POST",
        "/api/upcoming",
        Some(&admin_token),
        Some(json!({ "name": "Google India", "tentativeDate": "sometime soon" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn gform_drive_defaults_round_fields_to_zero() {
    let app = test_app();
    let admin_token = login_admin(&app).await;

    let (status, created) = request(
        &app,
        "POST",
        "/api/ongoing",
        Some(&admin_token),
        Some(json!({
            "name": "TCS Digital",
            "jd": "Role: Digital Engineer",
            "status": "gform",
            "gformLink": "https://forms.google.com/example-tcs"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "gform");
    assert_eq!(created["roundNumber"], 0);
    assert_eq!(created["totalRounds"], 0);

    let (status, listed) = request(&app, "GET", "/api/ongoing", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        listed[0]["gformLink"],
        "https://forms.google.com/example-tcs"
    );
}

#[tokio::test]
async fn invalid_status_is_rejected() {
    let app = test_app();
    let admin_token = login_admin(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/ongoing",
        Some(&admin_token),
        Some(json!({ "name": "Microsoft", "jd": "SDE-1", "status": "paused" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn partial_update_distinguishes_absent_and_cleared() {
    let app = test_app();
    let admin_token = login_admin(&app).await;

    let (_, created) = request(
        &app,
        "POST",
        "/api/ongoing",
        Some(&admin_token),
        Some(json!({
            "name": "Microsoft",
            "jd": "SDE-1",
            "status": "round",
            "currentRound": "Technical Interview Round 2",
            "roundNumber": 2,
            "totalRounds": 4
        })),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    // Setting a numeric field to 0 is an update, not an omission.
    let (status, updated) = request(
        &app,
        "PUT",
        &format!("/api/ongoing/{id}"),
        Some(&admin_token),
        Some(json!({ "totalRounds": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["totalRounds"], 0);
    assert_eq!(updated["name"], "Microsoft");
    assert_eq!(updated["roundNumber"], 2);
    assert_eq!(updated["currentRound"], "Technical Interview Round 2");

    // An explicit null clears; an absent key leaves the value alone.
    let (status, updated) = request(
        &app,
        "PUT",
        &format!("/api/ongoing/{id}"),
        Some(&admin_token),
        Some(json!({ "currentRound": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["currentRound"], Value::Null);
    assert_eq!(updated["roundNumber"], 2);

    // An empty payload changes nothing.
    let (status, updated) = request(
        &app,
        "PUT",
        &format!("/api/ongoing/{id}"),
        Some(&admin_token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Microsoft");
    assert_eq!(updated["roundNumber"], 2);
}

#[tokio::test]
async fn completed_selected_count_can_be_updated_to_zero() {
    let app = test_app();
    let admin_token = login_admin(&app).await;

    let (status, created) = request(
        &app,
        "POST",
        "/api/completed",
        Some(&admin_token),
        Some(json!({
            "name": "Wipro",
            "jd": "Role: Project Engineer",
            "spcMemberName": "Ahmed Khan",
            "selectedCount": 12
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["selectedCount"], 12);
    let id = created["id"].as_str().unwrap();

    let (status, updated) = request(
        &app,
        "PUT",
        &format!("/api/completed/{id}"),
        Some(&admin_token),
        Some(json!({ "selectedCount": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["selectedCount"], 0);
    assert_eq!(updated["spcMemberName"], "Ahmed Khan");
}

#[tokio::test]
async fn every_mutation_leaves_exactly_one_audit_record() {
    let app = test_app();
    let admin_token = login_admin(&app).await;

    let (_, created) = request(
        &app,
        "POST",
        "/api/upcoming",
        Some(&admin_token),
        Some(json!({ "name": "Google India", "tentativeDate": "2026-03-15" })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (_, updated) = request(
        &app,
        "PUT",
        &format!("/api/upcoming/{id}"),
        Some(&admin_token),
        Some(json!({ "info": "CGPA >= 7.5" })),
    )
    .await;

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/upcoming/{id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let entries = app.store.list_audit(10).expect("list audit");
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.table_name == "upcoming_companies"));
    assert!(entries.iter().all(|e| e.record_id == id));

    let create = entries
        .iter()
        .find(|e| e.action == AuditAction::Create)
        .expect("create entry");
    assert!(create.old_data.is_none());
    assert_eq!(
        create.new_data.as_ref().and_then(|v| v["name"].as_str()),
        Some("Google India")
    );

    let update = entries
        .iter()
        .find(|e| e.action == AuditAction::Update)
        .expect("update entry");
    assert_eq!(update.old_data, create.new_data);
    assert_eq!(update.new_data, Some(updated));

    let delete = entries
        .iter()
        .find(|e| e.action == AuditAction::Delete)
        .expect("delete entry");
    assert_eq!(delete.old_data, update.new_data);
    assert!(delete.new_data.is_none());
}

#[tokio::test]
async fn failed_mutations_leave_no_audit_record() {
    let app = test_app();
    let admin_token = login_admin(&app).await;

    let missing = Uuid::new_v4().to_string();
    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/upcoming/{missing}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        &app,
        "PUT",
        &format!("/api/ongoing/{missing}"),
        Some(&admin_token),
        Some(json!({ "name": "Ghost Corp" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        &app,
        "POST",
        "/api/completed",
        Some(&admin_token),
        Some(json!({ "name": "Wipro" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(app.store.list_audit(10).expect("list audit").is_empty());
}

//! Integration tests: full board flows through the HTTP surface.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use fleet_api::auth::AdminGate;
use fleet_api::server::{self, AppState};
use fleet_engine::{BoardEngine, EngineConfig};
use fleet_persist::InMemoryBackend;
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;
use tower::util::ServiceExt;

fn test_app() -> axum::Router {
    app_with_gate(AdminGate::disabled())
}

fn app_with_gate(gate: AdminGate) -> axum::Router {
    let engine = Arc::new(BoardEngine::new(
        Arc::new(InMemoryBackend::new()),
        EngineConfig::default(),
    ));
    server::router(Arc::new(AppState { engine, gate }))
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(res: axum::response::Response) -> serde_json::Value {
    let body = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn add_student(app: &axum::Router, name: &str) -> String {
    let req = post_json("/board/add", json!({ "full_name": name, "actor": "Admin" }));
    let res = app.clone().oneshot(req).await.unwrap();
    let j = body_json(res).await;
    assert_eq!(j["code"], 200);
    j["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn add_then_roster_lists_the_student() {
    let app = test_app();
    let id = add_student(&app, "Alex Smith").await;

    let res = app.clone().oneshot(get("/board/roster")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let j = body_json(res).await;
    assert_eq!(j["code"], 200);
    let roster = j["data"].as_array().unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0]["id"], id);
    assert_eq!(roster[0]["status"], "Active");
}

#[tokio::test]
async fn board_then_release_flow() {
    let app = test_app();
    let id = add_student(&app, "Alex Smith").await;

    let req = post_json(
        "/board/pirate",
        json!({ "student_id": id, "actor": "Admin" }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    let j = body_json(res).await;
    assert_eq!(j["code"], 200);
    assert_eq!(j["data"]["status"], "PirateShip");
    assert_eq!(j["data"]["days_left"], 14);

    let req = post_json(
        "/board/release",
        json!({ "student_id": id, "actor": "Admin" }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    let j = body_json(res).await;
    assert_eq!(j["code"], 200);
    assert_eq!(j["data"]["status"], "Active");
    assert!(j["data"]["days_left"].is_null());
}

#[tokio::test]
async fn invalid_window_is_a_400_envelope() {
    let app = test_app();
    let id = add_student(&app, "Alex Smith").await;

    let req = post_json(
        "/board/pirate",
        json!({
            "student_id": id,
            "start": "2026-03-10T00:00:00Z",
            "end": "2026-03-01T00:00:00Z",
            "actor": "Admin"
        }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    // Envelope carries the error; transport stays 200.
    assert_eq!(res.status(), StatusCode::OK);
    let j = body_json(res).await;
    assert_eq!(j["code"], 400);
}

#[tokio::test]
async fn unknown_student_is_a_404_envelope() {
    let app = test_app();
    let req = post_json(
        "/board/release",
        json!({ "student_id": "ghost", "actor": "Admin" }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    let j = body_json(res).await;
    assert_eq!(j["code"], 404);
}

#[tokio::test]
async fn undo_reverses_the_last_mutation() {
    let app = test_app();
    let id = add_student(&app, "Alex Smith").await;

    let req = post_json(
        "/board/pirate",
        json!({ "student_id": id, "actor": "Admin" }),
    );
    app.clone().oneshot(req).await.unwrap();

    let req = post_json("/board/undo", json!({ "actor": "Admin" }));
    let res = app.clone().oneshot(req).await.unwrap();
    let j = body_json(res).await;
    assert_eq!(j["code"], 200);
    assert_eq!(j["data"]["status"], "Active");

    // The slot is single-shot.
    let req = post_json("/board/undo", json!({ "actor": "Admin" }));
    let res = app.clone().oneshot(req).await.unwrap();
    let j = body_json(res).await;
    assert_eq!(j["code"], 404);
}

#[tokio::test]
async fn audit_lists_newest_first_per_student() {
    let app = test_app();
    let id = add_student(&app, "Alex Smith").await;
    let other = add_student(&app, "Blair Jones").await;

    let req = post_json(
        "/board/pirate",
        json!({ "student_id": id, "actor": "Admin" }),
    );
    app.clone().oneshot(req).await.unwrap();

    let res = app
        .clone()
        .oneshot(get(&format!("/board/audit?student_id={}", id)))
        .await
        .unwrap();
    let j = body_json(res).await;
    assert_eq!(j["code"], 200);
    let records = j["data"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["action"], "Moved to Pirate Ship");
    assert_eq!(records[1]["action"], "Student Added");
    assert!(records.iter().all(|r| r["student_id"] != other));
}

#[tokio::test]
async fn roster_filters_by_name_status_and_urgency() {
    let app = test_app();
    let alex = add_student(&app, "Alex Smith").await;
    add_student(&app, "Blair Jones").await;

    // Two days left: urgent.
    let req = post_json(
        "/board/pirate",
        json!({
            "student_id": alex,
            "end": (chrono::Utc::now() + chrono::Duration::days(2)).to_rfc3339(),
            "actor": "Admin"
        }),
    );
    app.clone().oneshot(req).await.unwrap();

    let res = app.clone().oneshot(get("/board/roster?q=alex")).await.unwrap();
    let j = body_json(res).await;
    assert_eq!(j["data"].as_array().unwrap().len(), 1);

    let res = app
        .clone()
        .oneshot(get("/board/roster?status=pirate"))
        .await
        .unwrap();
    let j = body_json(res).await;
    assert_eq!(j["data"].as_array().unwrap().len(), 1);
    assert_eq!(j["data"][0]["id"], alex);

    let res = app
        .clone()
        .oneshot(get("/board/roster?urgent=true"))
        .await
        .unwrap();
    let j = body_json(res).await;
    assert_eq!(j["data"].as_array().unwrap().len(), 1);

    let res = app
        .clone()
        .oneshot(get("/board/roster?status=bogus"))
        .await
        .unwrap();
    let j = body_json(res).await;
    assert_eq!(j["code"], 400);
}

#[tokio::test]
async fn csv_export_renders_the_roster() {
    let app = test_app();
    add_student(&app, "Alex Smith").await;

    let res = app
        .clone()
        .oneshot(get("/board/export.csv"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "text/csv; charset=utf-8"
    );
    let body = res.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(body.to_vec()).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Name,House,Status,Pirate Start,Pirate End,Days Left,Notes")
    );
    assert!(lines.next().unwrap().contains("\"Alex Smith\""));
}

#[tokio::test]
async fn csv_export_rejects_bad_filters() {
    let app = test_app();
    add_student(&app, "Alex Smith").await;

    let res = app
        .clone()
        .oneshot(get("/board/export.csv?status=bogus"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let j = body_json(res).await;
    assert_eq!(j["code"], 400);
}

#[tokio::test]
async fn extend_with_absurd_delta_is_a_400_envelope() {
    let app = test_app();
    let id = add_student(&app, "Alex Smith").await;

    let req = post_json(
        "/board/pirate",
        json!({ "student_id": id, "actor": "Admin" }),
    );
    app.clone().oneshot(req).await.unwrap();

    let req = post_json(
        "/board/extend",
        json!({ "student_id": id, "days": i64::MAX, "actor": "Admin" }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let j = body_json(res).await;
    assert_eq!(j["code"], 400);

    // The window is untouched.
    let res = app.clone().oneshot(get("/board/roster")).await.unwrap();
    let j = body_json(res).await;
    assert_eq!(j["data"][0]["days_left"], 14);
}

#[tokio::test]
async fn bulk_reports_how_many_changed() {
    let app = test_app();
    let a = add_student(&app, "Alex Smith").await;
    let b = add_student(&app, "Blair Jones").await;

    let req = post_json(
        "/board/bulk",
        json!({
            "student_ids": [a, b, "ghost"],
            "op": { "kind": "board" },
            "actor": "Admin"
        }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    let j = body_json(res).await;
    assert_eq!(j["code"], 200);
    assert_eq!(j["data"]["mutated"], 2);
}

#[tokio::test]
async fn admin_gate_blocks_unauthenticated_mutations() {
    let app = app_with_gate(AdminGate::with_token("hunter2"));

    let req = post_json(
        "/board/add",
        json!({ "full_name": "Alex Smith", "actor": "Admin" }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    let j = body_json(res).await;
    assert_eq!(j["code"], 401);

    // Reads stay open.
    let res = app.clone().oneshot(get("/board/roster")).await.unwrap();
    let j = body_json(res).await;
    assert_eq!(j["code"], 200);

    let req = Request::builder()
        .method("POST")
        .uri("/board/add")
        .header("content-type", "application/json")
        .header("x-admin-token", "hunter2")
        .body(Body::from(
            json!({ "full_name": "Alex Smith", "actor": "Admin" }).to_string(),
        ))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    let j = body_json(res).await;
    assert_eq!(j["code"], 200);
}

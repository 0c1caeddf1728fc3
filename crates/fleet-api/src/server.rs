//! Axum router and handlers.
//!
//! Every JSON route answers HTTP 200 with a `BaseResponse` envelope; the
//! `code` field carries the application-level result. The CSV export is the
//! one raw (non-envelope) route.

use crate::auth::AdminGate;
use crate::export::render_csv;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use fleet_engine::{BoardEngine, Commit, UndoOutcome, DEFAULT_BOARD_DAYS};
use fleet_types::{
    AddStudentRequest, AuditListData, BaseResponse, BoardError, BoardRequest, BulkRequest,
    BulkResult, CustomEndRequest, ExtendRequest, NotesRequest, ReleaseRequest, RemoveRequest,
    Status, Student, StudentView, UndoRequest,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub struct AppState {
    pub engine: Arc<BoardEngine>,
    pub gate: AdminGate,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/board/roster", get(handle_roster))
        .route("/board/add", post(handle_add))
        .route("/board/pirate", post(handle_board))
        .route("/board/release", post(handle_release))
        .route("/board/extend", post(handle_extend))
        .route("/board/custom-end", post(handle_custom_end))
        .route("/board/notes", post(handle_notes))
        .route("/board/remove", post(handle_remove))
        .route("/board/bulk", post(handle_bulk))
        .route("/board/undo", post(handle_undo))
        .route("/board/audit", get(handle_audit))
        .route("/board/export.csv", get(handle_export))
        .route("/health", get(handle_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn error_response<T>(e: &BoardError) -> BaseResponse<T> {
    let code = match e {
        BoardError::NotFound(_) => 404,
        BoardError::InvalidWindow { .. }
        | BoardError::NotEligible(_)
        | BoardError::InvalidName
        | BoardError::EmptyActor => 400,
    };
    BaseResponse::error(code, e.to_string())
}

fn denied<T>() -> BaseResponse<T> {
    BaseResponse::error(401, "admin token required")
}

fn commit_response(commit: Commit) -> BaseResponse<StudentView> {
    let message = match &commit.persist_warning {
        Some(warning) => format!("Saved in memory; persistence failed: {}", warning),
        None => "Success".to_string(),
    };
    BaseResponse {
        code: 200,
        message,
        data: commit.student.map(|s| StudentView::at(s, Utc::now())),
    }
}

#[derive(Debug, Deserialize)]
pub struct RosterQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub urgent: Option<bool>,
}

fn parse_status(raw: &str) -> Option<Status> {
    match raw.to_ascii_lowercase().replace(['_', ' ', '-'], "").as_str() {
        "active" => Some(Status::Active),
        "pirate" | "pirateship" => Some(Status::PirateShip),
        _ => None,
    }
}

/// Shared roster filter for the list route and the CSV export. `urgent`
/// keeps only boarded students with three or fewer days left.
fn filter_views(students: Vec<Student>, query: &RosterQuery) -> Result<Vec<StudentView>, String> {
    let now = Utc::now();
    let wanted = match &query.status {
        Some(raw) => match parse_status(raw) {
            Some(s) => Some(s),
            None => return Err(format!("unknown status filter: {}", raw)),
        },
        None => None,
    };
    let needle = query
        .q
        .as_deref()
        .map(str::to_lowercase)
        .filter(|q| !q.is_empty());

    let mut views = Vec::new();
    for student in students {
        if let Some(ref q) = needle {
            if !student.full_name.to_lowercase().contains(q.as_str()) {
                continue;
            }
        }
        if let Some(status) = wanted {
            if student.status != status {
                continue;
            }
        }
        let view = StudentView::at(student, now);
        if query.urgent == Some(true) && !view.days_left.is_some_and(|d| d <= 3) {
            continue;
        }
        views.push(view);
    }
    Ok(views)
}

async fn handle_roster(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RosterQuery>,
) -> Json<BaseResponse<Vec<StudentView>>> {
    let students = state.engine.list().await;
    match filter_views(students, &query) {
        Ok(views) => Json(BaseResponse::ok("Success", views)),
        Err(msg) => Json(BaseResponse::error(400, msg)),
    }
}

async fn handle_add(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AddStudentRequest>,
) -> Json<BaseResponse<StudentView>> {
    if !state.gate.allows(&headers) {
        return Json(denied());
    }
    match state
        .engine
        .add_student(&req.full_name, req.house, &req.actor)
        .await
    {
        Ok(commit) => Json(commit_response(commit)),
        Err(e) => Json(error_response(&e)),
    }
}

async fn handle_board(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<BoardRequest>,
) -> Json<BaseResponse<StudentView>> {
    if !state.gate.allows(&headers) {
        return Json(denied());
    }
    let start = req.start.unwrap_or_else(Utc::now);
    let end = req
        .end
        .unwrap_or_else(|| start + chrono::Duration::days(DEFAULT_BOARD_DAYS));
    match state
        .engine
        .board(&req.student_id, start, end, req.notes.as_deref(), &req.actor)
        .await
    {
        Ok(commit) => Json(commit_response(commit)),
        Err(e) => Json(error_response(&e)),
    }
}

async fn handle_release(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ReleaseRequest>,
) -> Json<BaseResponse<StudentView>> {
    if !state.gate.allows(&headers) {
        return Json(denied());
    }
    match state.engine.release(&req.student_id, &req.actor).await {
        Ok(commit) => Json(commit_response(commit)),
        Err(e) => Json(error_response(&e)),
    }
}

async fn handle_extend(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ExtendRequest>,
) -> Json<BaseResponse<StudentView>> {
    if !state.gate.allows(&headers) {
        return Json(denied());
    }
    match state
        .engine
        .extend(&req.student_id, req.days, &req.actor)
        .await
    {
        Ok(commit) => Json(commit_response(commit)),
        Err(e) => Json(error_response(&e)),
    }
}

async fn handle_custom_end(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CustomEndRequest>,
) -> Json<BaseResponse<StudentView>> {
    if !state.gate.allows(&headers) {
        return Json(denied());
    }
    match state
        .engine
        .set_custom_end(&req.student_id, req.new_end, &req.actor)
        .await
    {
        Ok(commit) => Json(commit_response(commit)),
        Err(e) => Json(error_response(&e)),
    }
}

async fn handle_notes(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<NotesRequest>,
) -> Json<BaseResponse<StudentView>> {
    if !state.gate.allows(&headers) {
        return Json(denied());
    }
    match state
        .engine
        .update_notes(&req.student_id, &req.notes, &req.actor)
        .await
    {
        Ok(commit) => Json(commit_response(commit)),
        Err(e) => Json(error_response(&e)),
    }
}

async fn handle_remove(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<RemoveRequest>,
) -> Json<BaseResponse<StudentView>> {
    if !state.gate.allows(&headers) {
        return Json(denied());
    }
    match state.engine.remove_student(&req.student_id, &req.actor).await {
        Ok(commit) => Json(commit_response(commit)),
        Err(e) => Json(error_response(&e)),
    }
}

async fn handle_bulk(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<BulkRequest>,
) -> Json<BaseResponse<BulkResult>> {
    if !state.gate.allows(&headers) {
        return Json(denied());
    }
    match state
        .engine
        .bulk(&req.student_ids, &req.op, &req.actor)
        .await
    {
        Ok(mutated) => Json(BaseResponse::ok("Success", BulkResult { mutated })),
        Err(e) => Json(error_response(&e)),
    }
}

async fn handle_undo(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<UndoRequest>,
) -> Json<BaseResponse<StudentView>> {
    if !state.gate.allows(&headers) {
        return Json(denied());
    }
    match state.engine.undo(&req.actor).await {
        Ok(UndoOutcome::Undone(commit)) => {
            let message = match &commit.persist_warning {
                Some(warning) => format!("Undone; persistence failed: {}", warning),
                None => "Undo applied".to_string(),
            };
            Json(BaseResponse {
                code: 200,
                message,
                data: commit.student.map(|s| StudentView::at(s, Utc::now())),
            })
        }
        Ok(UndoOutcome::Empty) => Json(BaseResponse::error(404, "nothing to undo")),
        Ok(UndoOutcome::Expired) => Json(BaseResponse::error(410, "undo window expired")),
        Err(e) => Json(error_response(&e)),
    }
}

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

async fn handle_audit(
    State(state): State<Arc<AppState>>,
    Query(q): Query<AuditQuery>,
) -> Json<BaseResponse<AuditListData>> {
    let records = state.engine.audit(q.student_id.as_deref(), q.limit).await;
    Json(BaseResponse::ok("Success", AuditListData { records }))
}

async fn handle_export(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RosterQuery>,
) -> Response {
    let students = state.engine.list().await;
    match filter_views(students, &query) {
        Ok(views) => {
            let headers = [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"fleet-board.csv\"",
                ),
            ];
            (headers, render_csv(&views)).into_response()
        }
        // The one non-envelope route rejects at the transport level too.
        Err(msg) => (
            StatusCode::BAD_REQUEST,
            Json(BaseResponse::<Vec<StudentView>>::error(400, msg)),
        )
            .into_response(),
    }
}

async fn handle_health() -> &'static str {
    "ok"
}

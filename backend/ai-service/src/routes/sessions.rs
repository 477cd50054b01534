use crate::{error::AppError, services::session::ContextUpdate, state::AppState};
use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// GET /api/ai/history/{session_id}
/// Conversation history, most-recent-last; empty for unknown sessions.
#[get("/api/ai/history/{session_id}")]
pub async fn get_history(
    state: web::Data<AppState>,
    session_id: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let session_id = session_id.into_inner();
    let messages = state.sessions.get_history(&session_id, query.limit);
    Ok(HttpResponse::Ok().json(json!({
        "session_id": session_id,
        "count": messages.len(),
        "messages": messages,
    })))
}

/// GET /api/ai/context/{session_id}
/// Context snapshot; defaults for unknown sessions.
#[get("/api/ai/context/{session_id}")]
pub async fn get_context(
    state: web::Data<AppState>,
    session_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let context = state.sessions.get_context(&session_id);
    Ok(HttpResponse::Ok().json(context))
}

/// POST /api/ai/context/{session_id}
/// Merge a partial context update into a live session.
#[post("/api/ai/context/{session_id}")]
pub async fn update_context(
    state: web::Data<AppState>,
    session_id: web::Path<String>,
    body: web::Json<ContextUpdate>,
) -> Result<HttpResponse, AppError> {
    state
        .sessions
        .update_context(&session_id, body.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// GET /api/ai/session/{session_id}/export
/// Full session snapshot for analysis.
#[get("/api/ai/session/{session_id}/export")]
pub async fn export_session(
    state: web::Data<AppState>,
    session_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let export = state
        .sessions
        .export_session(&session_id)
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(export))
}

/// DELETE /api/ai/session/{session_id}
#[delete("/api/ai/session/{session_id}")]
pub async fn clear_session(
    state: web::Data<AppState>,
    session_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    if !state.sessions.clear(&session_id) {
        return Err(AppError::NotFound);
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

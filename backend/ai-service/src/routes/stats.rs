use crate::{error::AppError, state::AppState};
use actix_web::{get, web, HttpResponse};
use serde_json::json;

/// GET /health
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": state.config.service.service_name,
    }))
}

/// GET /api/ai/stats
/// Store-wide memory and recommender statistics.
#[get("/api/ai/stats")]
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "memory": state.sessions.memory_stats(),
        "recommender": state.engine.stats(),
    }))
}

/// GET /api/ai/stats/{session_id}
#[get("/api/ai/stats/{session_id}")]
pub async fn session_stats(
    state: web::Data<AppState>,
    session_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let report = state
        .sessions
        .session_stats(&session_id)
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(report))
}

use crate::{
    error::AppError, models::ContentType, services::session::ContextSnapshot, state::AppState,
};
use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

const DEFAULT_LIMIT: usize = 5;

#[derive(Deserialize)]
pub struct RecommendationsRequest {
    pub message: String,
    pub session_id: Option<String>,
    pub user_id: Option<String>,
    pub monument_id: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct PersonalizedQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct SeenRequest {
    pub user_id: String,
}

/// POST /api/ai/recommendations
/// Ranked recommendations for a message, enriched with session context.
#[post("/api/ai/recommendations")]
pub async fn recommend(
    state: web::Data<AppState>,
    body: web::Json<RecommendationsRequest>,
) -> Result<HttpResponse, AppError> {
    if body.message.trim().is_empty() {
        return Err(AppError::BadRequest("message must not be empty".into()));
    }

    let mut context = match &body.session_id {
        Some(session_id) => state.sessions.get_context(session_id),
        None => ContextSnapshot::default(),
    };
    // An explicit monument hint overrides the session's current monument
    if let Some(monument_id) = &body.monument_id {
        context.current_monument = Some(monument_id.clone());
    }

    let limit = body.limit.unwrap_or(DEFAULT_LIMIT);
    let recommendations =
        state
            .engine
            .recommend(&body.message, &context, body.user_id.as_deref(), limit);

    Ok(HttpResponse::Ok().json(json!({
        "count": recommendations.len(),
        "recommendations": recommendations,
    })))
}

/// GET /api/ai/recommendations/{user_id}
/// Categorized personalized recommendations for a known user.
#[get("/api/ai/recommendations/{user_id}")]
pub async fn personalized(
    state: web::Data<AppState>,
    user_id: web::Path<String>,
    query: web::Query<PersonalizedQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let categorized = state.engine.personalized(
        &user_id,
        &ContextSnapshot::default(),
        &ContentType::all(),
        limit,
    );
    Ok(HttpResponse::Ok().json(categorized))
}

/// POST /api/ai/content/{content_id}/seen
/// Mark catalog content as consumed by a user.
#[post("/api/ai/content/{content_id}/seen")]
pub async fn mark_seen(
    state: web::Data<AppState>,
    content_id: web::Path<String>,
    body: web::Json<SeenRequest>,
) -> Result<HttpResponse, AppError> {
    let item = state.catalog.get(&content_id).ok_or(AppError::NotFound)?;
    state.profiles.record_completion(&body.user_id, item);
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

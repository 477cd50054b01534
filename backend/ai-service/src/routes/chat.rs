use crate::{error::AppError, services::chat::ChatResponse, state::AppState};
use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
    pub monument_id: Option<String>,
    pub location: Option<String>,
}

#[derive(Serialize)]
pub struct ChatEnvelope {
    pub session_id: String,
    #[serde(flatten)]
    pub response: ChatResponse,
}

/// POST /api/ai/chat
/// One conversational turn; allocates a session id when none is supplied.
#[post("/api/ai/chat")]
pub async fn chat(
    state: web::Data<AppState>,
    body: web::Json<ChatRequest>,
) -> Result<HttpResponse, AppError> {
    if body.message.trim().is_empty() {
        return Err(AppError::BadRequest("message must not be empty".into()));
    }

    let session_id = body
        .session_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut metadata: HashMap<String, serde_json::Value> = HashMap::new();
    if let Some(monument_id) = &body.monument_id {
        metadata.insert("monument_id".to_string(), json!(monument_id));
    }
    if let Some(location) = &body.location {
        metadata.insert("location".to_string(), json!(location));
    }
    let metadata = (!metadata.is_empty()).then_some(metadata);

    let response = state
        .chat
        .process_message(&body.message, &session_id, metadata)
        .await;

    Ok(HttpResponse::Ok().json(ChatEnvelope {
        session_id,
        response,
    }))
}

use actix_web::{test, web, App};
use ai_service::{
    config::Config,
    models::{ContentType, RecallSource, Role},
    routes,
    services::{
        generation::{GenerateText, GenerationError, GenerationParams},
        recommendation::FactorWeights,
        session::ContextSnapshot,
        Catalog, ChatService, RecommendationEngine, SessionStore, UserProfileStore,
    },
    state::AppState,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

struct StubGenerator;

#[async_trait]
impl GenerateText for StubGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        Ok("The Taj Mahal was built by Shah Jahan in memory of Mumtaz Mahal.".to_string())
    }
}

fn build_state() -> AppState {
    let config = Arc::new(Config::from_env());
    let catalog = Arc::new(Catalog::seeded());
    let sessions = Arc::new(SessionStore::default());
    let profiles = Arc::new(UserProfileStore::new());
    let engine = Arc::new(RecommendationEngine::new(
        catalog.clone(),
        profiles.clone(),
        FactorWeights::default(),
    ));
    let chat = Arc::new(ChatService::new(
        sessions.clone(),
        Arc::new(StubGenerator),
        GenerationParams::default(),
    ));
    AppState {
        config,
        sessions,
        profiles,
        catalog,
        engine,
        chat,
    }
}

#[actix_web::test]
async fn test_session_context_feeds_recommendations() {
    let state = build_state();

    state
        .sessions
        .add_message("s1", Role::User, "Hello", None);
    state.sessions.add_message("s1", Role::Ai, "Hi!", None);
    let metadata: HashMap<String, serde_json::Value> =
        [("monument_id".to_string(), serde_json::json!("hampi"))]
            .into_iter()
            .collect();
    state
        .sessions
        .add_message("s1", Role::User, "Tell me about Hampi", Some(metadata));

    let context = state.sessions.get_context("s1");
    assert_eq!(context.monuments_discussed, vec!["hampi".to_string()]);
    assert_eq!(context.current_monument.as_deref(), Some("hampi"));

    // The session's monument triggers the cultural-similarity strategy
    let recommendations =
        state
            .engine
            .recommend("more like this", &context, None, 10);
    assert!(recommendations
        .iter()
        .any(|r| r.algorithm == RecallSource::CulturalSimilarity
            && r.item.monument.as_deref() == Some("hampi")));
}

#[actix_web::test]
async fn test_history_bound_and_output_limit_hold_together() {
    let state = build_state();

    for i in 0..200 {
        state
            .sessions
            .add_message("s1", Role::User, &format!("message {i} about hampi"), None);
    }
    assert!(state.sessions.get_history("s1", None).len() <= 50);

    let context = state.sessions.get_context("s1");
    for limit in [0, 2, 5, 9, 50] {
        let recommendations =
            state
                .engine
                .recommend("mythology legends and stories", &context, None, limit);
        assert!(recommendations.len() <= limit);
    }
}

#[actix_web::test]
async fn test_diversification_cap_on_crowded_candidates() {
    let state = build_state();
    // Strong story/mythology signal plus a monument: plenty of candidates
    let context = ContextSnapshot::with_monument("taj_mahal");
    let recommendations = state.engine.recommend(
        "tell me an epic mythology legend story about history and architecture",
        &context,
        None,
        4,
    );

    assert_eq!(recommendations.len(), 4);
    // limit 4 -> max one entry per content type in the greedy pass; with
    // four types available the final list stays fully diverse
    let mut counts: HashMap<ContentType, usize> = HashMap::new();
    for recommendation in &recommendations {
        *counts.entry(recommendation.content_type).or_insert(0) += 1;
    }
    assert!(counts.values().all(|count| *count <= 1));
}

#[actix_web::test]
async fn test_profile_decay_across_recommend_calls() {
    let state = build_state();
    let context = ContextSnapshot::default();

    state
        .engine
        .recommend("an epic mythology legend", &context, Some("u1"), 5);
    let first = state.profiles.get("u1").unwrap().interests["mythology"];

    state
        .engine
        .recommend("a mythology myth", &context, Some("u1"), 5);
    let second = state.profiles.get("u1").unwrap().interests["mythology"];

    // Both snapshots sit strictly between zero and the raw extracted
    // weights (>= 1.0): blending, never replacement
    assert!(first > 0.0 && first < 1.0);
    assert!(second > first);
    assert!(second < 1.0);
    assert_eq!(
        state.profiles.get("u1").unwrap().interaction_history.len(),
        2
    );
}

#[actix_web::test]
async fn test_chat_endpoint_round_trip() {
    let state = build_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .service(routes::chat::chat)
            .service(routes::sessions::get_history)
            .service(routes::sessions::get_context),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/api/ai/chat")
        .set_json(serde_json::json!({
            "message": "Tell me about Taj Mahal",
            "session_id": "s-http",
            "monument_id": "taj_mahal"
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["session_id"], "s-http");
    assert_eq!(body["intent"], "story_request");
    assert!(body["response"].as_str().unwrap().contains("Taj Mahal"));
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 3);

    let request = test::TestRequest::get()
        .uri("/api/ai/history/s-http")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["count"], 2);

    let request = test::TestRequest::get()
        .uri("/api/ai/context/s-http")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["current_monument"], "taj_mahal");
    assert_eq!(body["monuments_discussed"][0], "taj mahal");
}

#[actix_web::test]
async fn test_chat_endpoint_rejects_empty_message() {
    let state = build_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(routes::chat::chat),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/api/ai/chat")
        .set_json(serde_json::json!({ "message": "   " }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_recommendations_endpoint_with_session_context() {
    let state = build_state();
    state.sessions.add_message(
        "s2",
        Role::User,
        "I love Hampi",
        Some(
            [("monument_id".to_string(), serde_json::json!("hampi"))]
                .into_iter()
                .collect(),
        ),
    );

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(routes::recommendations::recommend)
            .service(routes::recommendations::personalized),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/api/ai/recommendations")
        .set_json(serde_json::json!({
            "message": "show me mythology stories",
            "session_id": "s2",
            "user_id": "u-http",
            "limit": 5
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;

    let count = body["count"].as_u64().unwrap();
    assert!(count > 0 && count <= 5);
    let recommendations = body["recommendations"].as_array().unwrap();
    assert!(recommendations
        .iter()
        .any(|r| r["algorithm"] == "cultural_similarity"));

    // The call above updated u-http's profile; categorized output follows
    let request = test::TestRequest::get()
        .uri("/api/ai/recommendations/u-http?limit=2")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert!(body["story"].as_array().unwrap().len() <= 2);
    assert!(body
        .as_object()
        .unwrap()
        .contains_key("treasure_hunt"));
}

#[actix_web::test]
async fn test_stats_and_seen_endpoints() {
    let state = build_state();
    state
        .sessions
        .add_message("s3", Role::User, "hello hampi", None);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .service(routes::stats::stats)
            .service(routes::stats::session_stats)
            .service(routes::recommendations::mark_seen),
    )
    .await;

    let request = test::TestRequest::get().uri("/api/ai/stats").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["memory"]["active_sessions"], 1);
    assert_eq!(body["recommender"]["total_content_items"], 9);

    let request = test::TestRequest::get()
        .uri("/api/ai/stats/unknown-session")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);

    let request = test::TestRequest::post()
        .uri("/api/ai/content/hunt_1/seen")
        .set_json(serde_json::json!({ "user_id": "u1" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());
    let profile = state.profiles.get("u1").unwrap();
    assert!(profile.completed_hunts.contains("hunt_1"));
}

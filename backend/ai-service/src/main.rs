use actix_web::{web, App, HttpServer};
use ai_service::{
    config::Config,
    logging, routes,
    services::{
        generation::{GenerationParams, HttpGenerationClient},
        Catalog, ChatService, RecommendationEngine, SessionStore, UserProfileStore,
    },
    state::AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    logging::init_tracing();
    let config = Arc::new(Config::from_env());

    info!(
        "Starting {} on HTTP:{}",
        config.service.service_name, config.service.http_port
    );

    // Shared stores: constructed once, passed by reference everywhere
    let catalog = Arc::new(Catalog::seeded());
    let sessions = Arc::new(SessionStore::new(
        config.memory.max_conversation_history,
        config.memory.session_timeout_secs,
    ));
    let profiles = Arc::new(UserProfileStore::new());
    let engine = Arc::new(RecommendationEngine::new(
        catalog.clone(),
        profiles.clone(),
        config.recommendation.factor_weights(),
    ));

    let generator = Arc::new(HttpGenerationClient::new(
        &config.generation.api_url,
        config.generation.api_key.clone(),
        &config.generation.model,
        config.generation.timeout_secs,
    ));
    if !generator.is_enabled() {
        warn!("GENERATION_API_KEY not set - serving fallback responses only");
    }
    let chat = Arc::new(ChatService::new(
        sessions.clone(),
        generator,
        GenerationParams {
            temperature: config.generation.temperature,
            max_output_tokens: config.generation.max_tokens,
        },
    ));

    let state = AppState {
        config: config.clone(),
        sessions: sessions.clone(),
        profiles,
        catalog,
        engine,
        chat,
    };

    // Periodic expiry sweep; add_message re-creates sessions that race it
    let sweep_sessions = sessions.clone();
    let sweep_interval = Duration::from_secs(config.memory.cleanup_interval_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.tick().await; // first tick completes immediately
        loop {
            ticker.tick().await;
            sweep_sessions.sweep_expired();
        }
    });

    let bind_addr = format!("0.0.0.0:{}", config.service.http_port);
    info!(%bind_addr, "HTTP server listening");

    HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .service(routes::chat::chat)
            .service(routes::sessions::get_history)
            .service(routes::sessions::get_context)
            .service(routes::sessions::update_context)
            .service(routes::sessions::export_session)
            .service(routes::sessions::clear_session)
            .service(routes::recommendations::recommend)
            .service(routes::recommendations::personalized)
            .service(routes::recommendations::mark_seen)
            .service(routes::stats::stats)
            .service(routes::stats::session_stats)
            .service(routes::stats::health)
    })
    .bind(&bind_addr)?
    .run()
    .await
}

use crate::config::Config;
use crate::services::{
    Catalog, ChatService, RecommendationEngine, SessionStore, UserProfileStore,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub profiles: Arc<UserProfileStore>,
    pub catalog: Arc<Catalog>,
    pub engine: Arc<RecommendationEngine>,
    pub chat: Arc<ChatService>,
}

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use config::Config;
pub use services::{Catalog, ChatService, RecommendationEngine, SessionStore, UserProfileStore};
pub use state::AppState;

use crate::services::recommendation::FactorWeights;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub memory: MemoryConfig,
    pub recommendation: RecommendationConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub http_port: u16,
    pub service_name: String,
}

#[derive(Debug, Clone)]
pub struct MemoryConfig {
    pub max_conversation_history: usize,
    pub session_timeout_secs: i64,
    pub cleanup_interval_secs: u64,
}

#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    pub user_history: f32,
    pub cultural_interest: f32,
    pub location_proximity: f32,
    pub trending_content: f32,
}

impl RecommendationConfig {
    pub fn factor_weights(&self) -> FactorWeights {
        FactorWeights {
            user_history: self.user_history,
            cultural_interest: self.cultural_interest,
            location_proximity: self.location_proximity,
            trending_content: self.trending_content,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Config {
            service: ServiceConfig {
                http_port: env::var("HTTP_PORT")
                    .unwrap_or_else(|_| "8013".to_string())
                    .parse()
                    .expect("HTTP_PORT must be a valid u16"),
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "cultural-guide-service".to_string()),
            },
            memory: MemoryConfig {
                max_conversation_history: env::var("MAX_CONVERSATION_HISTORY")
                    .unwrap_or_else(|_| "50".to_string())
                    .parse()
                    .expect("MAX_CONVERSATION_HISTORY must be a valid usize"),
                session_timeout_secs: env::var("SESSION_TIMEOUT")
                    .unwrap_or_else(|_| "3600".to_string())
                    .parse()
                    .expect("SESSION_TIMEOUT must be a valid i64"),
                cleanup_interval_secs: env::var("SESSION_CLEANUP_INTERVAL")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()
                    .expect("SESSION_CLEANUP_INTERVAL must be a valid u64"),
            },
            recommendation: RecommendationConfig {
                user_history: env::var("FACTOR_USER_HISTORY")
                    .unwrap_or_else(|_| "0.3".to_string())
                    .parse()
                    .expect("FACTOR_USER_HISTORY must be a valid f32"),
                cultural_interest: env::var("FACTOR_CULTURAL_INTEREST")
                    .unwrap_or_else(|_| "0.4".to_string())
                    .parse()
                    .expect("FACTOR_CULTURAL_INTEREST must be a valid f32"),
                location_proximity: env::var("FACTOR_LOCATION_PROXIMITY")
                    .unwrap_or_else(|_| "0.2".to_string())
                    .parse()
                    .expect("FACTOR_LOCATION_PROXIMITY must be a valid f32"),
                trending_content: env::var("FACTOR_TRENDING_CONTENT")
                    .unwrap_or_else(|_| "0.1".to_string())
                    .parse()
                    .expect("FACTOR_TRENDING_CONTENT must be a valid f32"),
            },
            generation: GenerationConfig {
                api_url: env::var("GENERATION_API_URL").unwrap_or_else(|_| {
                    "https://generativelanguage.googleapis.com/v1beta".to_string()
                }),
                api_key: env::var("GENERATION_API_KEY").ok(),
                model: env::var("GENERATION_MODEL")
                    .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
                timeout_secs: env::var("GENERATION_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("GENERATION_TIMEOUT_SECS must be a valid u64"),
                temperature: env::var("AI_TEMPERATURE")
                    .unwrap_or_else(|_| "0.7".to_string())
                    .parse()
                    .expect("AI_TEMPERATURE must be a valid f32"),
                max_tokens: env::var("AI_MAX_TOKENS")
                    .unwrap_or_else(|_| "800".to_string())
                    .parse()
                    .expect("AI_MAX_TOKENS must be a valid u32"),
            },
        }
    }
}

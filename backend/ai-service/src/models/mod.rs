use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Ai,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Ai => "ai",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Story,
    Experience,
    Monument,
    TreasureHunt,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Story => "story",
            ContentType::Experience => "experience",
            ContentType::Monument => "monument",
            ContentType::TreasureHunt => "treasure_hunt",
        }
    }

    /// Interest-vector key the extractor emits for this type. The treasure
    /// hunt vocabulary is keyed "hunt", so both sides bind through here.
    pub fn preference_key(&self) -> &'static str {
        match self {
            ContentType::Story => "prefers_story",
            ContentType::Experience => "prefers_experience",
            ContentType::Monument => "prefers_monument",
            ContentType::TreasureHunt => "prefers_hunt",
        }
    }

    pub fn all() -> [ContentType; 4] {
        [
            ContentType::Story,
            ContentType::Experience,
            ContentType::Monument,
            ContentType::TreasureHunt,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Scalar position on the difficulty axis, compared against the
    /// extractor's `difficulty_preference`.
    pub fn score(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.3,
            Difficulty::Medium => 0.6,
            Difficulty::Hard => 0.9,
        }
    }
}

/// One catalog entry. Immutable after catalog construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub content_type: ContentType,
    pub title: String,
    pub themes: Vec<String>,
    pub difficulty: Difficulty,
    pub duration_minutes: Option<u32>,
    pub popularity: f32,
    pub cultural_significance: f32,
    /// Monument the item belongs to, if any (catalog monument id).
    pub monument: Option<String>,
    pub location: Option<String>,
}

/// Weighted interest signals extracted from free text. Keys are theme names,
/// `prefers_<type>` markers and the `difficulty_preference` scalar.
pub type InterestVector = HashMap<String, f32>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecallSource {
    ContentBased,
    Collaborative,
    Trending,
    CulturalSimilarity,
    Personalized,
    Fallback,
}

impl RecallSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecallSource::ContentBased => "content_based",
            RecallSource::Collaborative => "collaborative",
            RecallSource::Trending => "trending",
            RecallSource::CulturalSimilarity => "cultural_similarity",
            RecallSource::Personalized => "personalized",
            RecallSource::Fallback => "fallback",
        }
    }
}

/// Raw output of one recall strategy, before merge/scoring.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub item: ContentItem,
    pub raw_score: f32,
    pub reason: String,
    pub source: RecallSource,
}

/// Final ranked entry returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub content_id: String,
    pub content_type: ContentType,
    pub title: String,
    /// Score assigned by the recall strategy.
    pub score: f32,
    /// Score after algorithm weighting and freshness bonus.
    pub final_score: f32,
    pub reason: String,
    pub algorithm: RecallSource,
    pub item: ContentItem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub content_id: String,
    pub content_type: ContentType,
    pub trend_score: f32,
}

#[derive(Debug, Clone, Default)]
pub struct RecallStats {
    pub content_based_count: i32,
    pub collaborative_count: i32,
    pub trending_count: i32,
    pub cultural_count: i32,
    pub total_candidates: i32,
    pub final_count: i32,
}

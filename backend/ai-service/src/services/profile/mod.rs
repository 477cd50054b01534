// ============================================
// User Profile Store
// ============================================
//
// Process-lifetime per-user aggregates: exponentially decayed interests,
// visited monuments, completed hunts, content-type preferences and a
// bounded interaction history. Profiles are created lazily on first
// reference and mutated only through this store.

use crate::models::{ContentItem, ContentType, InterestVector};
use crate::services::session::ContextSnapshot;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Exponential blend: stored = stored * DECAY + incoming * LEARNING_RATE.
/// History dominates; a single interaction nudges, never overwrites.
pub const INTEREST_DECAY: f32 = 0.9;
pub const INTEREST_LEARNING_RATE: f32 = 0.1;

const MAX_INTERACTION_HISTORY: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct InteractionRecord {
    pub timestamp: DateTime<Utc>,
    pub interests: InterestVector,
    pub context: ContextSnapshot,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserProfile {
    pub interests: InterestVector,
    pub visited_monuments: HashSet<String>,
    pub completed_hunts: HashSet<String>,
    pub preferred_content_types: HashMap<ContentType, f32>,
    pub seen_content: HashSet<String>,
    pub interaction_history: Vec<InteractionRecord>,
    pub cultural_preferences: HashMap<String, f32>,
}

pub struct UserProfileStore {
    profiles: DashMap<String, UserProfile>,
}

impl UserProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: DashMap::new(),
        }
    }

    pub fn get(&self, user_id: &str) -> Option<UserProfile> {
        self.profiles.get(user_id).map(|profile| profile.clone())
    }

    /// Lazily create and return the profile for a user.
    pub fn get_or_create(&self, user_id: &str) -> UserProfile {
        self.profiles
            .entry(user_id.to_string())
            .or_default()
            .clone()
    }

    /// Fold one interaction into the profile: blend the interest vector,
    /// learn content-type preferences from the `prefers_<type>` keys,
    /// record a visited monument from the context, and append a bounded
    /// history record.
    pub fn record_interaction(
        &self,
        user_id: &str,
        interests: &InterestVector,
        context: &ContextSnapshot,
    ) {
        let mut profile = self.profiles.entry(user_id.to_string()).or_default();

        for (key, weight) in interests {
            let stored = profile.interests.entry(key.clone()).or_insert(0.0);
            *stored = *stored * INTEREST_DECAY + weight * INTEREST_LEARNING_RATE;
        }

        for content_type in ContentType::all() {
            if let Some(weight) = interests.get(content_type.preference_key()) {
                let stored = profile
                    .preferred_content_types
                    .entry(content_type)
                    .or_insert(0.0);
                *stored = *stored * INTEREST_DECAY + weight * INTEREST_LEARNING_RATE;
            }
        }

        if let Some(monument) = &context.current_monument {
            profile.visited_monuments.insert(monument.clone());
        }

        profile.interaction_history.push(InteractionRecord {
            timestamp: Utc::now(),
            interests: interests.clone(),
            context: context.clone(),
        });
        let len = profile.interaction_history.len();
        if len > MAX_INTERACTION_HISTORY {
            profile.interaction_history.drain(..len - MAX_INTERACTION_HISTORY);
        }

        debug!(user_id = user_id, "Recorded interaction");
    }

    /// Mark content as consumed. Treasure hunts also count as completed.
    pub fn record_completion(&self, user_id: &str, item: &ContentItem) {
        let mut profile = self.profiles.entry(user_id.to_string()).or_default();
        profile.seen_content.insert(item.id.clone());
        if item.content_type == ContentType::TreasureHunt {
            profile.completed_hunts.insert(item.id.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for UserProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

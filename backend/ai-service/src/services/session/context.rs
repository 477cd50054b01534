use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// Closed vocabularies scanned against lower-cased user text. Matching is
// substring containment, not word-boundary tokenization; partial-word hits
// are accepted behavior.
const MONUMENT_VOCABULARY: &[&str] = &[
    "taj mahal",
    "red fort",
    "hampi",
    "qutub minar",
    "gateway of india",
];

const STORY_TYPE_VOCABULARY: &[&str] = &[
    "history",
    "mythology",
    "folklore",
    "horror",
    "legend",
    "ghost",
];

const TOPIC_VOCABULARY: &[&str] = &[
    "architecture",
    "culture",
    "tradition",
    "festival",
    "religion",
    "art",
];

/// Derived per-session context. Internal representation keeps hash sets;
/// `snapshot()` renders them as sorted sequences at the boundary.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub topics: HashSet<String>,
    pub monuments_discussed: HashSet<String>,
    pub story_types_requested: HashSet<String>,
    pub current_monument: Option<String>,
    pub current_location: Option<String>,
    pub user_preferences: HashMap<String, serde_json::Value>,
}

impl SessionContext {
    /// Scan one user message for vocabulary hits and fold them into the
    /// context sets.
    pub fn scan_user_text(&mut self, content: &str) {
        let lower = content.to_lowercase();

        for monument in MONUMENT_VOCABULARY {
            if lower.contains(monument) {
                self.monuments_discussed.insert((*monument).to_string());
            }
        }
        for story_type in STORY_TYPE_VOCABULARY {
            if lower.contains(story_type) {
                self.story_types_requested.insert((*story_type).to_string());
            }
        }
        for topic in TOPIC_VOCABULARY {
            if lower.contains(topic) {
                self.topics.insert((*topic).to_string());
            }
        }
    }

    /// Merge a partial update: set-typed fields by union, scalar fields by
    /// replacement, preference entries by insertion.
    pub fn apply(&mut self, update: ContextUpdate) {
        if let Some(topics) = update.topics {
            self.topics.extend(topics);
        }
        if let Some(monuments) = update.monuments_discussed {
            self.monuments_discussed.extend(monuments);
        }
        if let Some(story_types) = update.story_types_requested {
            self.story_types_requested.extend(story_types);
        }
        if let Some(monument) = update.current_monument {
            self.current_monument = Some(monument);
        }
        if let Some(location) = update.current_location {
            self.current_location = Some(location);
        }
        if let Some(preferences) = update.user_preferences {
            self.user_preferences.extend(preferences);
        }
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            topics: sorted(&self.topics),
            monuments_discussed: sorted(&self.monuments_discussed),
            story_types_requested: sorted(&self.story_types_requested),
            current_monument: self.current_monument.clone(),
            current_location: self.current_location.clone(),
            user_preferences: self.user_preferences.clone(),
        }
    }
}

fn sorted(set: &HashSet<String>) -> Vec<String> {
    let mut values: Vec<String> = set.iter().cloned().collect();
    values.sort();
    values
}

/// Transport-neutral context view: sets rendered as sorted sequences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub topics: Vec<String>,
    pub monuments_discussed: Vec<String>,
    pub story_types_requested: Vec<String>,
    pub current_monument: Option<String>,
    pub current_location: Option<String>,
    #[serde(default)]
    pub user_preferences: HashMap<String, serde_json::Value>,
}

impl ContextSnapshot {
    /// Snapshot carrying only a monument hint, for callers without a session.
    pub fn with_monument(monument: &str) -> Self {
        Self {
            current_monument: Some(monument.to_string()),
            ..Self::default()
        }
    }
}

/// Partial context update accepted from callers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextUpdate {
    pub topics: Option<Vec<String>>,
    pub monuments_discussed: Option<Vec<String>>,
    pub story_types_requested: Option<Vec<String>>,
    pub current_monument: Option<String>,
    pub current_location: Option<String>,
    pub user_preferences: Option<HashMap<String, serde_json::Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_detects_vocabulary() {
        let mut context = SessionContext::default();
        context.scan_user_text("Tell me about Hampi and its architecture");

        assert!(context.monuments_discussed.contains("hampi"));
        assert!(context.topics.contains("architecture"));
        assert!(context.story_types_requested.is_empty());
    }

    #[test]
    fn test_scan_substring_false_positive_is_accepted() {
        let mut context = SessionContext::default();
        // "artifact" contains "art" - substring matching by design
        context.scan_user_text("show me an artifact");
        assert!(context.topics.contains("art"));
    }

    #[test]
    fn test_apply_merges_sets_and_replaces_scalars() {
        let mut context = SessionContext::default();
        context.topics.insert("culture".to_string());
        context.current_monument = Some("hampi".to_string());

        context.apply(ContextUpdate {
            topics: Some(vec!["art".to_string()]),
            current_monument: Some("taj_mahal".to_string()),
            ..ContextUpdate::default()
        });

        assert!(context.topics.contains("culture"));
        assert!(context.topics.contains("art"));
        assert_eq!(context.current_monument.as_deref(), Some("taj_mahal"));
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let mut context = SessionContext::default();
        context.scan_user_text("ghost legend mythology");
        let snapshot = context.snapshot();

        let mut expected = snapshot.story_types_requested.clone();
        expected.sort();
        assert_eq!(snapshot.story_types_requested, expected);
    }
}

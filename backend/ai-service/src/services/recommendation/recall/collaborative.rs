use super::{sort_descending, RecallSignals, RecallStrategy};
use crate::models::{Candidate, ContentType, RecallSource};
use crate::services::catalog::Catalog;
use anyhow::Result;
use std::sync::Arc;

const POPULARITY_DISCOUNT: f32 = 0.8;

/// Collaborative filtering stand-in: recommends popular unseen items of the
/// user's strongest preferred content type. Inactive without a profile that
/// has learned type preferences.
pub struct CollaborativeStrategy {
    catalog: Arc<Catalog>,
}

impl CollaborativeStrategy {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Highest-weighted preferred type; ties broken by type name so the
    /// choice is stable across runs.
    fn preferred_type(preferences: &std::collections::HashMap<ContentType, f32>) -> Option<ContentType> {
        let mut ranked: Vec<(&ContentType, &f32)> = preferences.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.as_str().cmp(b.0.as_str()))
        });
        ranked.first().map(|(content_type, _)| **content_type)
    }
}

impl RecallStrategy for CollaborativeStrategy {
    fn recall(&self, signals: &RecallSignals<'_>, limit: usize) -> Result<Vec<Candidate>> {
        let Some(profile) = signals.profile else {
            return Ok(Vec::new());
        };
        let Some(preferred) = Self::preferred_type(&profile.preferred_content_types) else {
            return Ok(Vec::new());
        };

        let mut candidates: Vec<Candidate> = self
            .catalog
            .items()
            .iter()
            .filter(|item| {
                item.content_type == preferred && !profile.seen_content.contains(&item.id)
            })
            .map(|item| Candidate {
                item: item.clone(),
                raw_score: item.popularity * POPULARITY_DISCOUNT,
                reason: "Similar users also liked this".to_string(),
                source: RecallSource::Collaborative,
            })
            .collect();

        sort_descending(&mut candidates);
        candidates.truncate(limit);
        Ok(candidates)
    }

    fn source(&self) -> RecallSource {
        RecallSource::Collaborative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InterestVector;
    use crate::services::profile::UserProfile;
    use crate::services::session::ContextSnapshot;

    fn profile_preferring(content_type: ContentType) -> UserProfile {
        let mut profile = UserProfile::default();
        profile.preferred_content_types.insert(content_type, 0.4);
        profile
    }

    #[test]
    fn test_inactive_without_profile() {
        let strategy = CollaborativeStrategy::new(Arc::new(Catalog::seeded()));
        let interests = InterestVector::new();
        let context = ContextSnapshot::default();
        let signals = RecallSignals {
            interests: &interests,
            context: &context,
            profile: None,
        };
        assert!(strategy.recall(&signals, 5).unwrap().is_empty());
    }

    #[test]
    fn test_recommends_unseen_items_of_preferred_type() {
        let strategy = CollaborativeStrategy::new(Arc::new(Catalog::seeded()));
        let mut profile = profile_preferring(ContentType::Story);
        profile.seen_content.insert("story_1".to_string());

        let interests = InterestVector::new();
        let context = ContextSnapshot::default();
        let signals = RecallSignals {
            interests: &interests,
            context: &context,
            profile: Some(&profile),
        };

        let candidates = strategy.recall(&signals, 5).unwrap();
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.item.content_type == ContentType::Story));
        assert!(candidates.iter().all(|c| c.item.id != "story_1"));
        // popularity * 0.8, descending
        assert!((candidates[0].raw_score - 0.85 * 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_preferred_type_tie_break_is_stable() {
        let mut preferences = std::collections::HashMap::new();
        preferences.insert(ContentType::Story, 0.3);
        preferences.insert(ContentType::Experience, 0.3);
        // "experience" < "story" lexicographically
        assert_eq!(
            CollaborativeStrategy::preferred_type(&preferences),
            Some(ContentType::Experience)
        );
    }
}

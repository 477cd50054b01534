use super::{sort_descending, RecallSignals, RecallStrategy};
use crate::models::{Candidate, ContentItem, InterestVector, RecallSource};
use crate::services::catalog::Catalog;
use crate::services::interest::{DIFFICULTY_KEY, DIFFICULTY_MEDIUM};
use crate::utils::cap_score;
use anyhow::Result;
use std::sync::Arc;

const THEME_WEIGHT: f32 = 0.3;
const TYPE_WEIGHT: f32 = 0.4;
const DIFFICULTY_WEIGHT: f32 = 0.2;
const POPULARITY_WEIGHT: f32 = 0.1;

/// Candidates below this similarity are not relevant enough to surface.
const RELEVANCE_THRESHOLD: f32 = 0.3;

/// Content-based filtering: scores every catalog item against the interest
/// vector extracted from the current message.
pub struct ContentBasedStrategy {
    catalog: Arc<Catalog>,
}

impl ContentBasedStrategy {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    fn similarity(interests: &InterestVector, item: &ContentItem) -> f32 {
        let mut score = 0.0;

        for theme in &item.themes {
            if let Some(weight) = interests.get(theme) {
                score += weight * THEME_WEIGHT;
            }
        }

        if let Some(weight) = interests.get(item.content_type.preference_key()) {
            score += weight * TYPE_WEIGHT;
        }

        let preference = interests
            .get(DIFFICULTY_KEY)
            .copied()
            .unwrap_or(DIFFICULTY_MEDIUM);
        let difficulty_match = 1.0 - (item.difficulty.score() - preference).abs();
        score += difficulty_match * DIFFICULTY_WEIGHT;

        score += item.popularity * POPULARITY_WEIGHT;

        cap_score(score)
    }
}

impl RecallStrategy for ContentBasedStrategy {
    fn recall(&self, signals: &RecallSignals<'_>, limit: usize) -> Result<Vec<Candidate>> {
        let mut candidates: Vec<Candidate> = self
            .catalog
            .items()
            .iter()
            .filter_map(|item| {
                let score = Self::similarity(signals.interests, item);
                (score > RELEVANCE_THRESHOLD).then(|| Candidate {
                    item: item.clone(),
                    raw_score: score,
                    reason: "Based on your interests".to_string(),
                    source: RecallSource::ContentBased,
                })
            })
            .collect();

        sort_descending(&mut candidates);
        candidates.truncate(limit);
        Ok(candidates)
    }

    fn source(&self) -> RecallSource {
        RecallSource::ContentBased
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::interest;
    use crate::services::session::ContextSnapshot;

    fn signals<'a>(
        interests: &'a InterestVector,
        context: &'a ContextSnapshot,
    ) -> RecallSignals<'a> {
        RecallSignals {
            interests,
            context,
            profile: None,
        }
    }

    #[test]
    fn test_similarity_is_capped() {
        let catalog = Catalog::seeded();
        let item = catalog.get("story_1").unwrap();
        let mut interests = InterestVector::new();
        interests.insert("love".to_string(), 5.0);
        interests.insert("architecture".to_string(), 5.0);
        assert_eq!(ContentBasedStrategy::similarity(&interests, item), 1.0);
    }

    #[test]
    fn test_low_relevance_items_are_discarded() {
        let catalog = Arc::new(Catalog::seeded());
        let strategy = ContentBasedStrategy::new(catalog);

        // No thematic or type signal: only difficulty + popularity remain,
        // which stays at or below the threshold for every item
        let interests = interest::extract("hmm");
        let context = ContextSnapshot::default();
        let candidates = strategy.recall(&signals(&interests, &context), 10).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_story_preference_surfaces_stories_first() {
        let catalog = Arc::new(Catalog::seeded());
        let strategy = ContentBasedStrategy::new(catalog);

        let interests = interest::extract("tell me about taj mahal");
        let context = ContextSnapshot::default();
        let candidates = strategy.recall(&signals(&interests, &context), 10).unwrap();

        assert!(!candidates.is_empty());
        assert_eq!(
            candidates[0].item.content_type,
            crate::models::ContentType::Story
        );
        // Truncation respects the limit
        let truncated = strategy.recall(&signals(&interests, &context), 1).unwrap();
        assert_eq!(truncated.len(), 1);
    }
}

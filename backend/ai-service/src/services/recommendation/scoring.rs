use crate::models::{Candidate, RecallSource, Recommendation};
use std::collections::HashSet;

/// Per-algorithm factor weights applied when merging candidate lists.
/// Loaded from configuration; defaults mirror the shipped factor table.
#[derive(Debug, Clone)]
pub struct FactorWeights {
    pub user_history: f32,
    pub cultural_interest: f32,
    pub location_proximity: f32,
    pub trending_content: f32,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            user_history: 0.3,
            cultural_interest: 0.4,
            location_proximity: 0.2,
            trending_content: 0.1,
        }
    }
}

/// Weight for algorithms outside the factor table.
const DEFAULT_ALGORITHM_WEIGHT: f32 = 0.25;

/// Flat bonus every surviving candidate receives.
const FRESHNESS_BONUS: f32 = 0.1;

impl FactorWeights {
    fn for_source(&self, source: &RecallSource) -> f32 {
        match source {
            RecallSource::ContentBased => self.cultural_interest,
            RecallSource::Collaborative => self.user_history,
            RecallSource::Trending => self.trending_content,
            RecallSource::CulturalSimilarity => self.location_proximity,
            RecallSource::Personalized | RecallSource::Fallback => DEFAULT_ALGORITHM_WEIGHT,
        }
    }
}

/// Merges candidate lists: drops duplicate content ids (first occurrence
/// wins, so generator order decides), applies algorithm weights plus the
/// freshness bonus, and sorts descending by final score.
pub struct ScoringLayer {
    weights: FactorWeights,
}

impl ScoringLayer {
    pub fn new(weights: FactorWeights) -> Self {
        Self { weights }
    }

    pub fn score_and_rank(&self, candidates: Vec<Candidate>) -> Vec<Recommendation> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut recommendations: Vec<Recommendation> = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            if !seen.insert(candidate.item.id.clone()) {
                continue;
            }
            let weight = self.weights.for_source(&candidate.source);
            let final_score = candidate.raw_score * weight + FRESHNESS_BONUS;
            recommendations.push(Recommendation {
                content_id: candidate.item.id.clone(),
                content_type: candidate.item.content_type,
                title: candidate.item.title.clone(),
                score: candidate.raw_score,
                final_score,
                reason: candidate.reason,
                algorithm: candidate.source,
                item: candidate.item,
            });
        }

        recommendations.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::Catalog;

    fn candidate(id: &str, score: f32, source: RecallSource) -> Candidate {
        let catalog = Catalog::seeded();
        Candidate {
            item: catalog.get(id).expect("catalog id").clone(),
            raw_score: score,
            reason: "test".to_string(),
            source,
        }
    }

    #[test]
    fn test_first_occurrence_wins_on_duplicates() {
        let layer = ScoringLayer::new(FactorWeights::default());
        let merged = layer.score_and_rank(vec![
            candidate("story_1", 0.5, RecallSource::ContentBased),
            candidate("story_1", 0.9, RecallSource::Trending),
            candidate("exp_1", 0.4, RecallSource::Trending),
        ]);

        assert_eq!(merged.len(), 2);
        let story = merged.iter().find(|r| r.content_id == "story_1").unwrap();
        assert_eq!(story.algorithm, RecallSource::ContentBased);
        assert_eq!(story.score, 0.5);
    }

    #[test]
    fn test_algorithm_weights_and_freshness_bonus() {
        let layer = ScoringLayer::new(FactorWeights::default());
        let merged = layer.score_and_rank(vec![
            candidate("story_1", 0.5, RecallSource::ContentBased),
            candidate("exp_1", 0.5, RecallSource::Trending),
            candidate("hunt_1", 0.5, RecallSource::CulturalSimilarity),
            candidate("mon_1", 0.5, RecallSource::Collaborative),
        ]);

        let score_of = |id: &str| {
            merged
                .iter()
                .find(|r| r.content_id == id)
                .unwrap()
                .final_score
        };
        assert!((score_of("story_1") - (0.5 * 0.4 + 0.1)).abs() < 1e-6);
        assert!((score_of("mon_1") - (0.5 * 0.3 + 0.1)).abs() < 1e-6);
        assert!((score_of("hunt_1") - (0.5 * 0.2 + 0.1)).abs() < 1e-6);
        assert!((score_of("exp_1") - (0.5 * 0.1 + 0.1)).abs() < 1e-6);

        // Sorted descending by final score
        assert_eq!(merged[0].content_id, "story_1");
        assert_eq!(merged[3].content_id, "exp_1");
    }

    #[test]
    fn test_unlisted_algorithm_gets_default_weight() {
        let layer = ScoringLayer::new(FactorWeights::default());
        let merged = layer.score_and_rank(vec![candidate(
            "story_1",
            0.8,
            RecallSource::Personalized,
        )]);
        assert!((merged[0].final_score - (0.8 * 0.25 + 0.1)).abs() < 1e-6);
    }
}

mod collaborative;
mod content_based;
mod cultural_similarity;
mod trending;

use crate::models::{Candidate, InterestVector, RecallSource, RecallStats};
use crate::services::catalog::Catalog;
use crate::services::profile::UserProfile;
use crate::services::session::ContextSnapshot;
use anyhow::Result;
use std::sync::Arc;

pub use collaborative::CollaborativeStrategy;
pub use content_based::ContentBasedStrategy;
pub use cultural_similarity::CulturalSimilarityStrategy;
pub use trending::TrendingStrategy;

/// Inputs shared by every candidate generator.
pub struct RecallSignals<'a> {
    pub interests: &'a InterestVector,
    pub context: &'a ContextSnapshot,
    pub profile: Option<&'a UserProfile>,
}

/// One candidate-generation algorithm.
pub trait RecallStrategy: Send + Sync {
    fn recall(&self, signals: &RecallSignals<'_>, limit: usize) -> Result<Vec<Candidate>>;
    fn source(&self) -> RecallSource;
}

/// Runs all strategies in their fixed order. The order is load-bearing:
/// duplicate content ids are resolved downstream by first occurrence, so
/// earlier strategies win.
pub struct RecallLayer {
    strategies: Vec<Box<dyn RecallStrategy>>,
}

impl RecallLayer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let strategies: Vec<Box<dyn RecallStrategy>> = vec![
            Box::new(ContentBasedStrategy::new(catalog.clone())),
            Box::new(CollaborativeStrategy::new(catalog.clone())),
            Box::new(TrendingStrategy::new(catalog.clone())),
            Box::new(CulturalSimilarityStrategy::new(catalog)),
        ];
        Self { strategies }
    }

    #[cfg(test)]
    pub(crate) fn with_strategies(strategies: Vec<Box<dyn RecallStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn recall_candidates(
        &self,
        signals: &RecallSignals<'_>,
        limit: usize,
    ) -> Result<(Vec<Candidate>, RecallStats)> {
        let mut all_candidates = Vec::new();
        let mut stats = RecallStats::default();

        for strategy in &self.strategies {
            let candidates = strategy.recall(signals, limit)?;
            match strategy.source() {
                RecallSource::ContentBased => {
                    stats.content_based_count = candidates.len() as i32
                }
                RecallSource::Collaborative => {
                    stats.collaborative_count = candidates.len() as i32
                }
                RecallSource::Trending => stats.trending_count = candidates.len() as i32,
                RecallSource::CulturalSimilarity => {
                    stats.cultural_count = candidates.len() as i32
                }
                _ => {}
            }
            all_candidates.extend(candidates);
        }

        stats.total_candidates = all_candidates.len() as i32;
        Ok((all_candidates, stats))
    }
}

/// Descending by raw score; NaN sorts last. Ties keep insertion order, so
/// output stays deterministic for a fixed catalog.
pub(crate) fn sort_descending(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.raw_score
            .partial_cmp(&a.raw_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

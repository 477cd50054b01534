use super::{sort_descending, RecallSignals, RecallStrategy};
use crate::models::{Candidate, RecallSource};
use crate::services::catalog::Catalog;
use anyhow::Result;
use std::sync::Arc;

/// Cultural-similarity recall: everything tied to the monument the session
/// is currently focused on, ranked by cultural significance. Inactive
/// without a monument in context.
pub struct CulturalSimilarityStrategy {
    catalog: Arc<Catalog>,
}

impl CulturalSimilarityStrategy {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl RecallStrategy for CulturalSimilarityStrategy {
    fn recall(&self, signals: &RecallSignals<'_>, limit: usize) -> Result<Vec<Candidate>> {
        let Some(monument) = signals.context.current_monument.as_deref() else {
            return Ok(Vec::new());
        };

        let mut candidates: Vec<Candidate> = self
            .catalog
            .items()
            .iter()
            .filter(|item| item.monument.as_deref() == Some(monument))
            .map(|item| Candidate {
                item: item.clone(),
                raw_score: item.cultural_significance,
                reason: format!("Related to {monument}"),
                source: RecallSource::CulturalSimilarity,
            })
            .collect();

        sort_descending(&mut candidates);
        candidates.truncate(limit);
        Ok(candidates)
    }

    fn source(&self) -> RecallSource {
        RecallSource::CulturalSimilarity
    }
}

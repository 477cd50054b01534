use super::{RecallSignals, RecallStrategy};
use crate::models::{Candidate, RecallSource};
use crate::services::catalog::Catalog;
use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

/// Trending recall: resolves the catalog's fixed trending list. Kept to
/// half the requested limit so trending never crowds out personalization.
pub struct TrendingStrategy {
    catalog: Arc<Catalog>,
}

impl TrendingStrategy {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl RecallStrategy for TrendingStrategy {
    fn recall(&self, _signals: &RecallSignals<'_>, limit: usize) -> Result<Vec<Candidate>> {
        let candidates: Vec<Candidate> = self
            .catalog
            .trending()
            .iter()
            .take(limit / 2)
            .filter_map(|entry| match self.catalog.get(&entry.content_id) {
                Some(item) => Some(Candidate {
                    item: item.clone(),
                    raw_score: entry.trend_score,
                    reason: "Trending now".to_string(),
                    source: RecallSource::Trending,
                }),
                None => {
                    warn!(content_id = %entry.content_id, "Trending entry missing from catalog");
                    None
                }
            })
            .collect();

        Ok(candidates)
    }

    fn source(&self) -> RecallSource {
        RecallSource::Trending
    }
}

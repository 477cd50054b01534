use crate::models::{ContentType, Recommendation};
use std::collections::HashMap;

/// Diversity pass over the merged, score-sorted list. A greedy walk caps
/// each content type at `max(1, limit / 4)` slots; remaining slots are then
/// backfilled in score order with the caps lifted.
pub struct DiversityLayer;

impl DiversityLayer {
    pub fn new() -> Self {
        Self
    }

    pub fn diversify(
        &self,
        recommendations: Vec<Recommendation>,
        limit: usize,
    ) -> Vec<Recommendation> {
        if recommendations.len() <= limit {
            return recommendations;
        }

        let max_per_type = std::cmp::max(1, limit / 4);
        let mut type_counts: HashMap<ContentType, usize> = HashMap::new();
        let mut taken = vec![false; recommendations.len()];
        let mut selected: Vec<Recommendation> = Vec::with_capacity(limit);

        for (idx, recommendation) in recommendations.iter().enumerate() {
            if selected.len() >= limit {
                break;
            }
            let count = type_counts.entry(recommendation.content_type).or_insert(0);
            if *count < max_per_type {
                *count += 1;
                taken[idx] = true;
                selected.push(recommendation.clone());
            }
        }

        // Backfill: caps no longer apply, score order preserved
        if selected.len() < limit {
            for (idx, recommendation) in recommendations.iter().enumerate() {
                if selected.len() >= limit {
                    break;
                }
                if !taken[idx] {
                    selected.push(recommendation.clone());
                }
            }
        }

        selected
    }
}

impl Default for DiversityLayer {
    fn default() -> Self {
        Self::new()
    }
}

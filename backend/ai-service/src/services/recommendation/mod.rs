// ============================================
// Recommendation Engine
// ============================================
//
// Pipeline: interest extraction -> four recall strategies -> merge/dedup/
// weight -> diversity pass -> bounded result list. The public entry point
// never fails: any internal error degrades to the most-popular fallback
// list, and the user-profile update is skipped on that path.

pub mod diversity;
pub mod recall;
pub mod scoring;

pub use diversity::DiversityLayer;
pub use recall::{RecallLayer, RecallSignals};
pub use scoring::{FactorWeights, ScoringLayer};

use crate::models::{ContentType, RecallSource, Recommendation};
use crate::services::catalog::Catalog;
use crate::services::interest;
use crate::services::profile::{UserProfile, UserProfileStore};
use crate::services::session::ContextSnapshot;
use crate::utils::cap_score;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Serialize)]
pub struct RecommenderStats {
    pub total_content_items: usize,
    pub content_by_type: BTreeMap<String, usize>,
    pub active_users: usize,
    pub trending_items: usize,
}

pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    profiles: Arc<UserProfileStore>,
    recall: RecallLayer,
    scoring: ScoringLayer,
    diversity: DiversityLayer,
}

impl RecommendationEngine {
    pub fn new(
        catalog: Arc<Catalog>,
        profiles: Arc<UserProfileStore>,
        weights: FactorWeights,
    ) -> Self {
        let recall = RecallLayer::new(catalog.clone());
        Self {
            catalog,
            profiles,
            recall,
            scoring: ScoringLayer::new(weights),
            diversity: DiversityLayer::new(),
        }
    }

    /// Ranked, diversified recommendations for a message. At most `limit`
    /// entries; never fails. With a `user_id`, the profile is consulted by
    /// the collaborative strategy and updated after a successful run.
    pub fn recommend(
        &self,
        text: &str,
        context: &ContextSnapshot,
        user_id: Option<&str>,
        limit: usize,
    ) -> Vec<Recommendation> {
        match self.recommend_inner(text, context, user_id, limit) {
            Ok(recommendations) => recommendations,
            Err(err) => {
                error!(error = %err, "Recommendation pipeline failed, serving fallback");
                self.fallback(limit)
            }
        }
    }

    fn recommend_inner(
        &self,
        text: &str,
        context: &ContextSnapshot,
        user_id: Option<&str>,
        limit: usize,
    ) -> anyhow::Result<Vec<Recommendation>> {
        let interests = interest::extract(text);
        let profile = user_id.and_then(|id| self.profiles.get(id));

        let signals = RecallSignals {
            interests: &interests,
            context,
            profile: profile.as_ref(),
        };
        let (candidates, mut stats) = self.recall.recall_candidates(&signals, limit)?;

        let ranked = self.scoring.score_and_rank(candidates);
        let final_list = self.diversity.diversify(ranked, limit);
        stats.final_count = final_list.len() as i32;

        // Profile update runs only on the success path
        if let Some(user_id) = user_id {
            self.profiles.record_interaction(user_id, &interests, context);
        }

        info!(
            content_based = stats.content_based_count,
            collaborative = stats.collaborative_count,
            trending = stats.trending_count,
            cultural = stats.cultural_count,
            total = stats.total_candidates,
            served = stats.final_count,
            "Recall completed"
        );
        Ok(final_list)
    }

    /// Most-popular catalog items, used when the pipeline fails.
    pub fn fallback(&self, limit: usize) -> Vec<Recommendation> {
        let mut recommendations: Vec<Recommendation> = self
            .catalog
            .items()
            .iter()
            .map(|item| Recommendation {
                content_id: item.id.clone(),
                content_type: item.content_type,
                title: item.title.clone(),
                score: item.popularity,
                final_score: item.popularity,
                reason: "Popular content".to_string(),
                algorithm: RecallSource::Fallback,
                item: item.clone(),
            })
            .collect();
        recommendations.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        recommendations.truncate(limit);
        recommendations
    }

    /// Categorized per-type recommendations for a known user, scored from
    /// the profile's decayed interests plus catalog priors.
    pub fn personalized(
        &self,
        user_id: &str,
        context: &ContextSnapshot,
        content_types: &[ContentType],
        limit: usize,
    ) -> BTreeMap<ContentType, Vec<Recommendation>> {
        let profile = self.profiles.get_or_create(user_id);
        let mut categorized = BTreeMap::new();

        for content_type in content_types {
            let mut recommendations: Vec<Recommendation> = self
                .catalog
                .items()
                .iter()
                .filter(|item| item.content_type == *content_type)
                .map(|item| {
                    let score = Self::personalized_score(item, &profile, context);
                    Recommendation {
                        content_id: item.id.clone(),
                        content_type: item.content_type,
                        title: item.title.clone(),
                        score,
                        final_score: score,
                        reason: format!(
                            "Personalized {} recommendation",
                            content_type.as_str()
                        ),
                        algorithm: RecallSource::Personalized,
                        item: item.clone(),
                    }
                })
                .collect();
            recommendations.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            recommendations.truncate(limit);
            categorized.insert(*content_type, recommendations);
        }

        debug!(user_id = user_id, "Generated personalized recommendations");
        categorized
    }

    fn personalized_score(
        item: &crate::models::ContentItem,
        profile: &UserProfile,
        context: &ContextSnapshot,
    ) -> f32 {
        let mut score = 0.0;

        for theme in &item.themes {
            if let Some(weight) = profile.interests.get(theme) {
                score += weight * 0.4;
            }
        }
        score += item.cultural_significance * 0.3;
        score += item.popularity * 0.2;

        if context.current_monument.is_some()
            && context.current_monument.as_deref() == item.monument.as_deref()
        {
            score += 0.3;
        }

        cap_score(score)
    }

    pub fn stats(&self) -> RecommenderStats {
        let content_by_type: BTreeMap<String, usize> = self
            .catalog
            .counts_by_type()
            .into_iter()
            .map(|(content_type, count)| (content_type.as_str().to_string(), count))
            .collect();
        RecommenderStats {
            total_content_items: self.catalog.len(),
            content_by_type,
            active_users: self.profiles.len(),
            trending_items: self.catalog.trending().len(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_recall_layer(mut self, recall: RecallLayer) -> Self {
        self.recall = recall;
        self
    }
}

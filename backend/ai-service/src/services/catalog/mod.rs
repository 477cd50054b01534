// ============================================
// Content Catalog
// ============================================
//
// Immutable in-memory catalog of cultural content: stories, experiences,
// monuments and treasure hunts, plus a fixed trending list. Read-only after
// construction, shared via Arc without locking.

use crate::models::{ContentItem, ContentType, Difficulty, TrendingEntry};
use std::collections::HashMap;

pub struct Catalog {
    items: Vec<ContentItem>,
    by_id: HashMap<String, usize>,
    trending: Vec<TrendingEntry>,
}

impl Catalog {
    pub fn new(items: Vec<ContentItem>, trending: Vec<TrendingEntry>) -> Self {
        let by_id = items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.id.clone(), idx))
            .collect();
        Self {
            items,
            by_id,
            trending,
        }
    }

    /// Reference catalog shipped with the service.
    pub fn seeded() -> Self {
        let items = vec![
            item(
                "story_1",
                ContentType::Story,
                "The Legend of Taj Mahal",
                &["love", "architecture", "mughal"],
                Difficulty::Easy,
                Some(8),
                0.9,
                0.95,
                Some("taj_mahal"),
                None,
            ),
            item(
                "story_2",
                ContentType::Story,
                "Hanuman's Adventures in Hampi",
                &["devotion", "strength", "ramayana"],
                Difficulty::Medium,
                Some(12),
                0.85,
                0.9,
                Some("hampi"),
                None,
            ),
            item(
                "story_3",
                ContentType::Story,
                "Ghost Stories of Red Fort",
                &["mystery", "paranormal", "history"],
                Difficulty::Medium,
                Some(10),
                0.75,
                0.7,
                Some("red_fort"),
                None,
            ),
            item(
                "exp_1",
                ContentType::Experience,
                "Virtual Tour of Taj Mahal",
                &["architecture", "immersive", "educational"],
                Difficulty::Easy,
                Some(15),
                0.88,
                0.85,
                Some("taj_mahal"),
                None,
            ),
            item(
                "exp_2",
                ContentType::Experience,
                "AR Reconstruction of Hampi",
                &["history", "reconstruction", "interactive"],
                Difficulty::Medium,
                Some(20),
                0.82,
                0.9,
                Some("hampi"),
                None,
            ),
            item(
                "mon_1",
                ContentType::Monument,
                "Taj Mahal",
                &["architecture", "love", "mughal", "unesco"],
                Difficulty::Easy,
                None,
                0.95,
                0.98,
                Some("taj_mahal"),
                Some("Agra"),
            ),
            item(
                "mon_2",
                ContentType::Monument,
                "Hampi Ruins",
                &["history", "ruins", "vijayanagara", "unesco"],
                Difficulty::Medium,
                None,
                0.8,
                0.95,
                Some("hampi"),
                Some("Karnataka"),
            ),
            item(
                "hunt_1",
                ContentType::TreasureHunt,
                "Mysteries of Taj Mahal",
                &["puzzle", "history", "architecture"],
                Difficulty::Medium,
                Some(30),
                0.75,
                0.8,
                Some("taj_mahal"),
                None,
            ),
            item(
                "hunt_2",
                ContentType::TreasureHunt,
                "Hanuman's Trail in Hampi",
                &["mythology", "adventure", "exploration"],
                Difficulty::Hard,
                Some(45),
                0.7,
                0.85,
                Some("hampi"),
                None,
            ),
        ];

        let trending = vec![
            TrendingEntry {
                content_id: "story_1".to_string(),
                content_type: ContentType::Story,
                trend_score: 0.9,
            },
            TrendingEntry {
                content_id: "exp_1".to_string(),
                content_type: ContentType::Experience,
                trend_score: 0.85,
            },
            TrendingEntry {
                content_id: "hunt_1".to_string(),
                content_type: ContentType::TreasureHunt,
                trend_score: 0.8,
            },
        ];

        Self::new(items, trending)
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn get(&self, content_id: &str) -> Option<&ContentItem> {
        self.by_id.get(content_id).map(|idx| &self.items[*idx])
    }

    pub fn trending(&self) -> &[TrendingEntry] {
        &self.trending
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item counts per content type, for stats reporting.
    pub fn counts_by_type(&self) -> HashMap<ContentType, usize> {
        let mut counts = HashMap::new();
        for item in &self.items {
            *counts.entry(item.content_type).or_insert(0) += 1;
        }
        counts
    }
}

#[allow(clippy::too_many_arguments)]
fn item(
    id: &str,
    content_type: ContentType,
    title: &str,
    themes: &[&str],
    difficulty: Difficulty,
    duration_minutes: Option<u32>,
    popularity: f32,
    cultural_significance: f32,
    monument: Option<&str>,
    location: Option<&str>,
) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        content_type,
        title: title.to_string(),
        themes: themes.iter().map(|theme| theme.to_string()).collect(),
        difficulty,
        duration_minutes,
        popularity,
        cultural_significance,
        monument: monument.map(|m| m.to_string()),
        location: location.map(|l| l.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_catalog() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.trending().len(), 3);

        let story = catalog.get("story_1").expect("story_1 present");
        assert_eq!(story.content_type, ContentType::Story);
        assert_eq!(story.monument.as_deref(), Some("taj_mahal"));
    }

    #[test]
    fn test_trending_entries_resolve() {
        let catalog = Catalog::seeded();
        for entry in catalog.trending() {
            let item = catalog.get(&entry.content_id).expect("trending id resolves");
            assert_eq!(item.content_type, entry.content_type);
        }
    }

    #[test]
    fn test_counts_by_type() {
        let catalog = Catalog::seeded();
        let counts = catalog.counts_by_type();
        assert_eq!(counts[&ContentType::Story], 3);
        assert_eq!(counts[&ContentType::Experience], 2);
        assert_eq!(counts[&ContentType::Monument], 2);
        assert_eq!(counts[&ContentType::TreasureHunt], 2);
    }
}

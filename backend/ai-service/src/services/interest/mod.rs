// ============================================
// Interest Extractor
// ============================================
//
// Stateless mapping from free text to a weighted interest vector. All
// classification is table-driven: theme vocabularies, content-type
// vocabularies and a difficulty axis. Matching is lower-cased substring
// containment; repeated keyword hits accumulate and no normalization is
// applied, so individual keys are unbounded.

use crate::models::InterestVector;
use crate::utils::contains_any;

/// Weight added per matching theme keyword.
pub const THEME_INCREMENT: f32 = 0.5;
/// Weight added per matching content-type keyword.
pub const TYPE_INCREMENT: f32 = 0.3;

pub const DIFFICULTY_KEY: &str = "difficulty_preference";
pub const DIFFICULTY_EASY: f32 = 0.3;
pub const DIFFICULTY_MEDIUM: f32 = 0.6;
pub const DIFFICULTY_HARD: f32 = 0.9;

const THEME_KEYWORDS: &[(&str, &[&str])] = &[
    ("mythology", &["myth", "legend", "god", "goddess", "divine", "epic"]),
    ("history", &["history", "historical", "ancient", "past", "built", "emperor"]),
    ("architecture", &["architecture", "design", "building", "construction", "style"]),
    ("mystery", &["mystery", "secret", "hidden", "ghost", "haunted", "paranormal"]),
    ("culture", &["culture", "tradition", "custom", "festival", "ritual"]),
    ("adventure", &["adventure", "explore", "journey", "quest", "discovery"]),
    ("art", &["art", "sculpture", "painting", "craft", "artistic"]),
    ("religion", &["religious", "spiritual", "temple", "worship", "sacred"]),
];

const CONTENT_TYPE_KEYWORDS: &[(&str, &[&str])] = &[
    ("prefers_story", &["story", "tell", "narrative", "tale"]),
    ("prefers_experience", &["experience", "virtual", "immersive", "see", "tour"]),
    ("prefers_hunt", &["game", "puzzle", "challenge", "treasure", "hunt", "quiz"]),
    ("prefers_monument", &["monument", "place", "visit", "location", "site"]),
];

// Easy vocabulary wins over hard when both are present.
const EASY_WORDS: &[&str] = &["easy", "simple", "basic"];
const HARD_WORDS: &[&str] = &["challenging", "complex", "advanced"];

/// Extract a weighted interest vector from free text.
pub fn extract(text: &str) -> InterestVector {
    let lower = text.to_lowercase();
    let mut interests = InterestVector::new();

    for (theme, keywords) in THEME_KEYWORDS {
        for keyword in *keywords {
            if lower.contains(keyword) {
                *interests.entry((*theme).to_string()).or_insert(0.0) += THEME_INCREMENT;
            }
        }
    }

    for (preference, keywords) in CONTENT_TYPE_KEYWORDS {
        for keyword in *keywords {
            if lower.contains(keyword) {
                *interests.entry((*preference).to_string()).or_insert(0.0) += TYPE_INCREMENT;
            }
        }
    }

    let difficulty = if contains_any(&lower, EASY_WORDS) {
        DIFFICULTY_EASY
    } else if contains_any(&lower, HARD_WORDS) {
        DIFFICULTY_HARD
    } else {
        DIFFICULTY_MEDIUM
    };
    interests.insert(DIFFICULTY_KEY.to_string(), difficulty);

    interests
}

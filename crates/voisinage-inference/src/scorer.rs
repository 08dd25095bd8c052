//! Keyword category scorer.
//!
//! Scores free text against the static [`CATEGORY_KEYWORDS`] table and turns
//! the scores into a [`CategoryDetectionResult`].

use tracing::trace;

use voisinage_core::defaults::{
    CATEGORY_MAX_ALTERNATIVES, CATEGORY_REASON_TERMS, KEYWORD_AMBIGUITY_RATIO,
    KEYWORD_FALLBACK_CONFIDENCE, KEYWORD_LOW_CONFIDENCE,
};
use voisinage_core::{
    clamp_confidence, Category, CategoryAlternative, CategoryDetectionResult,
    CategoryKeywordEntry, CATEGORY_KEYWORDS,
};

const KEYWORD_POINTS: i32 = 3;
const SYNONYM_POINTS: i32 = 2;
const EXCLUSION_PENALTY: i32 = 2;

/// Score and matched terms for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScore {
    pub category: Category,
    pub score: u32,
    /// Matched keywords first, then synonyms, in table order.
    pub matched: Vec<&'static str>,
}

/// Score one table entry against already-lowercased text.
pub fn score_entry(entry: &CategoryKeywordEntry, text: &str) -> CategoryScore {
    let mut score = 0i32;
    let mut matched = Vec::new();

    for keyword in entry.keywords.iter().filter(|k| text.contains(**k)) {
        score += KEYWORD_POINTS;
        matched.push(*keyword);
    }
    for synonym in entry.synonyms.iter().filter(|s| text.contains(**s)) {
        score += SYNONYM_POINTS;
        matched.push(*synonym);
    }
    let excluded = entry.exclusions.iter().filter(|e| text.contains(**e)).count() as i32;
    score -= excluded * EXCLUSION_PENALTY;

    CategoryScore {
        category: entry.category,
        score: score.max(0) as u32,
        matched,
    }
}

/// Score every category for a title/description pair, in table order.
pub fn score_categories(title: &str, description: &str) -> Vec<CategoryScore> {
    let text = format!("{} {}", title, description).to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .map(|entry| score_entry(entry, &text))
        .collect()
}

/// Detect the most likely category of a listing from its text.
///
/// Ties go to the earliest category in [`Category::ALL`] order; when nothing
/// matches the result is [`Category::Other`] with the fallback confidence.
pub fn score_text(title: &str, description: &str) -> CategoryDetectionResult {
    let scores = score_categories(title, description);
    let total: u32 = scores.iter().map(|s| s.score).sum();

    if total == 0 {
        return CategoryDetectionResult {
            category: Category::Other,
            confidence: KEYWORD_FALLBACK_CONFIDENCE,
            alternatives: Vec::new(),
            suggestions: vec![
                "Describe the item with specific words (type, brand, use) so it can be categorized"
                    .to_string(),
            ],
        };
    }

    // Stable sort keeps table order among equal scores.
    let mut ranked: Vec<&CategoryScore> = scores.iter().filter(|s| s.score > 0).collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    let winner = ranked[0];
    let confidence = clamp_confidence(winner.score as f32 / total as f32);

    let alternatives: Vec<CategoryAlternative> = ranked
        .iter()
        .skip(1)
        .take(CATEGORY_MAX_ALTERNATIVES)
        .map(|s| CategoryAlternative {
            category: s.category,
            confidence: clamp_confidence(s.score as f32 / total as f32),
            reason: match_reason(&s.matched),
        })
        .collect();

    let mut suggestions = Vec::new();
    if confidence < KEYWORD_LOW_CONFIDENCE {
        suggestions.push(
            "Add details to the title or description to make the category clearer".to_string(),
        );
    }
    if let Some(runner_up) = alternatives.first() {
        if runner_up.confidence >= confidence * KEYWORD_AMBIGUITY_RATIO {
            suggestions.push(format!(
                "The item could also belong to \"{}\"; check which fits best",
                runner_up.category
            ));
        }
    }

    trace!(
        subsystem = "inference",
        component = "keyword_scorer",
        category = %winner.category,
        score = winner.score,
        total,
        confidence,
        "Keyword scoring complete"
    );

    CategoryDetectionResult {
        category: winner.category,
        confidence,
        alternatives,
        suggestions,
    }
}

fn match_reason(matched: &[&str]) -> String {
    let terms: Vec<&str> = matched.iter().take(CATEGORY_REASON_TERMS).copied().collect();
    format!("Matched keywords: {}", terms.join(", "))
}

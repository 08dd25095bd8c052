//! Category fusion: reconcile the vision model's guess with keyword scoring.
//!
//! | AI confidence | Condition on keyword confidence | Outcome |
//! |---------------|----------------------------------|---------|
//! | > 0.8         | none                              | AI category, keyword alternatives |
//! | 0.5 ..= 0.8   | text > ai + 0.2                   | keyword category, AI first alternative |
//! | < 0.5         | text > 0.3                        | keyword category, AI first alternative |
//! | otherwise     |                                   | AI category, keyword alternatives, verify hint |

use tracing::debug;

use voisinage_core::defaults::{
    CATEGORY_MAX_ALTERNATIVES, FUSION_LOW_AI_TEXT_MIN, FUSION_MEDIUM_AI_FROM,
    FUSION_OVERRIDE_MARGIN, FUSION_TRUST_AI_ABOVE,
};
use voisinage_core::{clamp_confidence, Category, CategoryAlternative, CategoryDetectionResult};

use crate::scorer::score_text;

const REASON_MEDIUM_AI: &str = "AI with medium confidence";
const REASON_LOW_AI: &str = "AI with low confidence";
const REASON_KEYWORDS: &str = "Keyword analysis of title and description";
const VERIFY_SUGGESTION: &str = "Automatic detection is uncertain; please verify the category";

/// Which branch of the fusion table produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionDecision {
    TrustAi,
    OverrideMediumAi,
    OverrideLowAi,
    KeepAiUnverified,
}

/// Pick the fusion branch for a pair of (already clamped) confidences.
pub fn decide(ai_confidence: f32, text_confidence: f32) -> FusionDecision {
    if ai_confidence > FUSION_TRUST_AI_ABOVE {
        FusionDecision::TrustAi
    } else if ai_confidence >= FUSION_MEDIUM_AI_FROM
        && text_confidence > ai_confidence + FUSION_OVERRIDE_MARGIN
    {
        FusionDecision::OverrideMediumAi
    } else if ai_confidence < FUSION_MEDIUM_AI_FROM && text_confidence > FUSION_LOW_AI_TEXT_MIN {
        FusionDecision::OverrideLowAi
    } else {
        FusionDecision::KeepAiUnverified
    }
}

/// Combine the remote classifier's category with keyword scoring.
///
/// Pure and deterministic for identical inputs.
pub fn fuse_category(
    ai_category: Category,
    ai_confidence: f32,
    title: &str,
    description: &str,
) -> CategoryDetectionResult {
    let text = score_text(title, description);
    let ai_confidence = clamp_confidence(ai_confidence);
    let decision = decide(ai_confidence, text.confidence);

    debug!(
        subsystem = "inference",
        component = "category_fusion",
        ai_category = %ai_category,
        ai_confidence,
        text_category = %text.category,
        text_confidence = text.confidence,
        decision = ?decision,
        "Fusing category signals"
    );

    match decision {
        FusionDecision::TrustAi => CategoryDetectionResult {
            category: ai_category,
            confidence: ai_confidence,
            alternatives: keyword_alternatives(&text, ai_category),
            suggestions: Vec::new(),
        },
        FusionDecision::OverrideMediumAi | FusionDecision::OverrideLowAi => {
            let reason = if decision == FusionDecision::OverrideMediumAi {
                REASON_MEDIUM_AI
            } else {
                REASON_LOW_AI
            };
            let mut alternatives = Vec::with_capacity(CATEGORY_MAX_ALTERNATIVES);
            if ai_category != text.category {
                alternatives.push(CategoryAlternative {
                    category: ai_category,
                    confidence: ai_confidence,
                    reason: reason.to_string(),
                });
            }
            alternatives.extend(
                text.alternatives
                    .iter()
                    .filter(|a| a.category != ai_category)
                    .cloned(),
            );
            alternatives.truncate(CATEGORY_MAX_ALTERNATIVES);

            CategoryDetectionResult {
                category: text.category,
                confidence: text.confidence,
                alternatives,
                suggestions: text.suggestions,
            }
        }
        FusionDecision::KeepAiUnverified => {
            let mut suggestions = text.suggestions.clone();
            suggestions.push(VERIFY_SUGGESTION.to_string());
            CategoryDetectionResult {
                category: ai_category,
                confidence: ai_confidence,
                alternatives: keyword_alternatives(&text, ai_category),
                suggestions,
            }
        }
    }
}

/// Keyword winner plus its alternatives, without the AI category, best first.
fn keyword_alternatives(
    text: &CategoryDetectionResult,
    ai_category: Category,
) -> Vec<CategoryAlternative> {
    let mut alternatives = Vec::with_capacity(CATEGORY_MAX_ALTERNATIVES);
    // An all-zero keyword result carries no information worth surfacing.
    if text.category != ai_category && text.category != Category::Other {
        alternatives.push(CategoryAlternative {
            category: text.category,
            confidence: text.confidence,
            reason: REASON_KEYWORDS.to_string(),
        });
    }
    alternatives.extend(
        text.alternatives
            .iter()
            .filter(|a| a.category != ai_category)
            .cloned(),
    );
    alternatives.truncate(CATEGORY_MAX_ALTERNATIVES);
    alternatives
}

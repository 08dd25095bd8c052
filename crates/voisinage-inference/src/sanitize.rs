//! Validation of raw model output into an [`AIAnalysisResult`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use voisinage_core::defaults::{
    BRAND_MAX_CHARS, DEFAULT_CONFIDENCE, DESCRIPTION_MAX_CHARS, ESTIMATED_VALUE_MAX,
    FALLBACK_TITLE, TAGS_MAX, TAG_MAX_CHARS, TITLE_MAX_CHARS,
};
use voisinage_core::{clamp_confidence, AIAnalysisResult, Category, Condition, Error, Result};

use crate::fusion::fuse_category;

/// Model output before validation. Every field is optional and loosely typed
/// because models drift from the requested schema.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawAnalysis {
    pub title: Option<Value>,
    pub description: Option<Value>,
    pub category: Option<Value>,
    pub condition: Option<Value>,
    pub brand: Option<Value>,
    pub model: Option<Value>,
    pub estimated_value: Option<Value>,
    pub tags: Option<Value>,
    pub confidence: Option<Value>,
}

impl RawAnalysis {
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| Error::Analysis(format!("unexpected analysis shape: {}", e)))
    }
}

/// Truncate to at most `max` characters, on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}

fn optional_text(value: Option<Value>, max: usize) -> Option<String> {
    let text = match value? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let text = text.trim();
    let lowered = text.to_lowercase();
    if text.is_empty() || matches!(lowered.as_str(), "null" | "unknown" | "n/a" | "inconnu") {
        return None;
    }
    Some(truncate_chars(text, max))
}

/// First signed decimal in a string; a comma is accepted as decimal separator.
static NUMBER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:[.,]\d+)?").expect("valid number regex"));

fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        // "25,50 €" and "~30 EUR" keep their amount; "20-30 €" takes the lower bound.
        Value::String(s) => NUMBER_TOKEN
            .find(s)
            .and_then(|m| m.as_str().replace(',', ".").parse().ok()),
        _ => None,
    }
}

fn estimated_value(value: Option<Value>) -> Option<f64> {
    let number = number_from(&value?)?;
    (number.is_finite() && (0.0..=ESTIMATED_VALUE_MAX).contains(&number)).then_some(number)
}

fn confidence(value: Option<Value>) -> f32 {
    value
        .as_ref()
        .and_then(number_from)
        .map(|n| clamp_confidence(n as f32))
        .unwrap_or(DEFAULT_CONFIDENCE)
}

fn tags(value: Option<Value>) -> Vec<String> {
    let raw: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let tag = truncate_chars(tag.trim(), TAG_MAX_CHARS).to_lowercase();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
        if tags.len() == TAGS_MAX {
            break;
        }
    }
    tags
}

/// Clamp and coerce every field, without category fusion.
pub fn sanitize(raw: RawAnalysis) -> AIAnalysisResult {
    let title = optional_text(raw.title, TITLE_MAX_CHARS)
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());
    let description = optional_text(raw.description, DESCRIPTION_MAX_CHARS).unwrap_or_default();

    AIAnalysisResult {
        title,
        description,
        category: optional_text(raw.category, usize::MAX)
            .as_deref()
            .map(Category::coerce)
            .unwrap_or(Category::Other),
        condition: optional_text(raw.condition, usize::MAX)
            .as_deref()
            .map(Condition::coerce)
            .unwrap_or_default(),
        brand: optional_text(raw.brand, BRAND_MAX_CHARS),
        model: optional_text(raw.model, BRAND_MAX_CHARS),
        estimated_value: estimated_value(raw.estimated_value),
        tags: tags(raw.tags),
        confidence: confidence(raw.confidence),
        category_confidence: None,
        category_alternatives: None,
        category_suggestions: None,
    }
}

/// Sanitize, then run category fusion against the generated text.
pub fn finalize(raw: RawAnalysis) -> AIAnalysisResult {
    let mut result = sanitize(raw);
    let fused = fuse_category(
        result.category,
        result.confidence,
        &result.title,
        &result.description,
    );

    debug!(
        subsystem = "inference",
        component = "sanitize",
        raw_category = %result.category,
        category = %fused.category,
        confidence = fused.confidence,
        "Analysis finalized"
    );

    result.category = fused.category;
    result.category_confidence = Some(fused.confidence);
    result.category_alternatives = Some(fused.alternatives);
    result.category_suggestions = Some(fused.suggestions);
    result
}

//! Prompt sent with every item photo.

use voisinage_core::Category;

/// Instruction asking the model for the structured item description.
pub fn analysis_prompt() -> String {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    format!(
        r#"You help neighbors list items they want to give, lend or exchange.
Look at the photo and describe the main item.

Answer with a single JSON object and nothing else, using exactly these fields:
{{
  "title": "short title, max 100 characters",
  "description": "2-3 sentences describing the item, max 1000 characters",
  "category": "one of: {categories}",
  "condition": "one of: excellent, good, fair, poor",
  "brand": "brand name or null",
  "model": "model name or null",
  "estimated_value": "second-hand value in euros as a number, or null",
  "tags": ["up to 10 short lowercase keywords"],
  "confidence": "your confidence in the category, between 0 and 1"
}}

Write the title, description and tags in the language most likely used by the item's owner (default: French)."#,
        categories = categories.join(", ")
    )
}

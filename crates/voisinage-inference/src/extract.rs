//! Pull a JSON object out of free-form model output.
//!
//! Models asked for JSON still wrap it in prose or markdown fences from time
//! to time. Parsing tries, in order: the whole content, the first fenced
//! block, then the first balanced `{...}` span.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use voisinage_core::{Error, Result};

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)```").expect("valid fenced block regex")
});

/// Return the first balanced `{...}` span, honoring string literals and
/// escapes so braces inside strings do not count.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse the JSON object contained in a model response.
pub fn extract_json_object(content: &str) -> Result<Value> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(Error::Analysis("model returned an empty response".to_string()));
    }

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    let candidate = FENCED_BLOCK
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    let object = first_json_object(candidate)
        .or_else(|| first_json_object(trimmed))
        .ok_or_else(|| Error::Analysis("no JSON object found in model response".to_string()))?;

    match serde_json::from_str::<Value>(object) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(Error::Analysis("model response is not a JSON object".to_string())),
        Err(e) => Err(Error::Analysis(format!("invalid JSON in model response: {}", e))),
    }
}
